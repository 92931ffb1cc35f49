//! Register map and bitfield wrappers for the DS3231.
//!
//! Every device register is modeled as a newtype over its raw byte with
//! `bitfield!`-generated field accessors. The wrappers never validate BCD
//! contents; they only name the bits. Conversions to and from the raw byte
//! go through `From`, generated by `from_register_u8!`.

use bitfield::bitfield;

/// Register addresses. The address byte written at the start of every
/// transaction selects the first register of the transfer.
#[allow(unused)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Seconds (0-59)
    Seconds = 0x00,
    /// Minutes (0-59)
    Minutes = 0x01,
    /// Hours (0-23 or 1-12 with meridiem)
    Hours = 0x02,
    /// Day of week (1-7)
    Day = 0x03,
    /// Day of month (1-31)
    Date = 0x04,
    /// Month (1-12) and century flag
    Month = 0x05,
    /// Year (0-99)
    Year = 0x06,
    /// Alarm 1 seconds
    Alarm1Seconds = 0x07,
    /// Alarm 1 minutes
    Alarm1Minutes = 0x08,
    /// Alarm 1 hours
    Alarm1Hours = 0x09,
    /// Alarm 1 day/date
    Alarm1DayDate = 0x0A,
    /// Alarm 2 minutes
    Alarm2Minutes = 0x0B,
    /// Alarm 2 hours
    Alarm2Hours = 0x0C,
    /// Alarm 2 day/date
    Alarm2DayDate = 0x0D,
    /// Control
    Control = 0x0E,
    /// Status
    Status = 0x0F,
    /// Aging offset (signed trim)
    AgingOffset = 0x10,
    /// Temperature, integer part
    TempMsb = 0x11,
    /// Temperature, fractional part
    TempLsb = 0x12,
}

/// Hour register format selector (bit 6 of the hours byte).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeRepresentation {
    /// 24-hour format (0-23)
    TwentyFourHour = 0,
    /// 12-hour format (1-12 plus AM/PM)
    TwelveHour = 1,
}
impl From<u8> for TimeRepresentation {
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => TimeRepresentation::TwentyFourHour,
            1 => TimeRepresentation::TwelveHour,
            _ => panic!("Invalid value for TimeRepresentation: {}", v),
        }
    }
}
impl From<TimeRepresentation> for u8 {
    fn from(v: TimeRepresentation) -> Self {
        v as u8
    }
}

/// Oscillator control (EOSC, control register bit 7, inverted sense).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oscillator {
    /// Oscillator runs on battery power
    Enabled = 0,
    /// Oscillator stops when main power is removed
    Disabled = 1,
}
impl From<u8> for Oscillator {
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => Oscillator::Enabled,
            1 => Oscillator::Disabled,
            _ => panic!("Invalid value for Oscillator: {}", v),
        }
    }
}
impl From<Oscillator> for u8 {
    fn from(v: Oscillator) -> Self {
        v as u8
    }
}

/// INT/SQW pin function (INTCN, control register bit 2).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptControl {
    /// Square wave output on the INT/SQW pin
    SquareWave = 0,
    /// Alarm interrupt output on the INT/SQW pin
    Interrupt = 1,
}
impl From<u8> for InterruptControl {
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => InterruptControl::SquareWave,
            1 => InterruptControl::Interrupt,
            _ => panic!("Invalid value for InterruptControl: {}", v),
        }
    }
}
impl From<InterruptControl> for u8 {
    fn from(v: InterruptControl) -> Self {
        v as u8
    }
}

/// Square wave output frequency (RS2/RS1, control register bits 4-3).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SquareWaveFrequency {
    /// 1 Hz
    Hz1 = 0b00,
    /// 1.024 kHz
    Hz1024 = 0b01,
    /// 4.096 kHz
    Hz4096 = 0b10,
    /// 8.192 kHz
    Hz8192 = 0b11,
}
impl From<u8> for SquareWaveFrequency {
    /// # Panics
    /// Panics if the value is not a 2-bit frequency code.
    fn from(v: u8) -> Self {
        match v {
            0b00 => SquareWaveFrequency::Hz1,
            0b01 => SquareWaveFrequency::Hz1024,
            0b10 => SquareWaveFrequency::Hz4096,
            0b11 => SquareWaveFrequency::Hz8192,
            _ => panic!("Invalid value for SquareWaveFrequency: {}", v),
        }
    }
}
impl From<SquareWaveFrequency> for u8 {
    fn from(v: SquareWaveFrequency) -> Self {
        v as u8
    }
}

/// DY/DT selector in an alarm day/date register (bit 6): whether the low
/// bits match the day of the week or the day of the month.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DayDateSelect {
    /// Match the day of the month (1-31, BCD)
    Date = 0,
    /// Match the day of the week (1-7)
    Day = 1,
}
impl From<u8> for DayDateSelect {
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => DayDateSelect::Date,
            1 => DayDateSelect::Day,
            _ => panic!("Invalid value for DayDateSelect: {}", v),
        }
    }
}
impl From<DayDateSelect> for u8 {
    fn from(v: DayDateSelect) -> Self {
        v as u8
    }
}

// Generates the From<u8> and Into<u8> implementations for a register
// wrapper so other modules never need the tuple constructor.
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// Seconds register, two BCD nibbles.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Seconds(u8);
    impl Debug;
    /// Tens digit
    pub tens, set_tens: 6, 4;
    /// Units digit
    pub units, set_units: 3, 0;
}
from_register_u8!(Seconds);

bitfield! {
    /// Minutes register, two BCD nibbles.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Minutes(u8);
    impl Debug;
    /// Tens digit
    pub tens, set_tens: 6, 4;
    /// Units digit
    pub units, set_units: 3, 0;
}
from_register_u8!(Minutes);

bitfield! {
    /// Hours register. Bit 6 selects the representation; in 12-hour mode
    /// bit 5 is the meridiem flag and the tens digit narrows to bit 4, in
    /// 24-hour mode bit 5 is the twenty-hours digit.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Hours(u8);
    impl Debug;
    /// 12/24-hour representation selector
    pub from into TimeRepresentation, representation, set_representation: 6, 6;
    /// PM flag (12-hour) or twenty-hours digit (24-hour)
    pub pm_or_twenty, set_pm_or_twenty: 5, 5;
    /// Tens digit (one bit; twenty-hours carries the rest in 24-hour mode)
    pub tens, set_tens: 4, 4;
    /// Units digit
    pub units, set_units: 3, 0;
}
from_register_u8!(Hours);

bitfield! {
    /// Day-of-week register, 1-7 in the low three bits.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Day(u8);
    impl Debug;
    /// Day ordinal
    pub day, set_day: 2, 0;
}
from_register_u8!(Day);

bitfield! {
    /// Day-of-month register, two BCD nibbles.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Date(u8);
    impl Debug;
    /// Tens digit
    pub tens, set_tens: 5, 4;
    /// Units digit
    pub units, set_units: 3, 0;
}
from_register_u8!(Date);

bitfield! {
    /// Month register: century rollover flag in bit 7, month in BCD below.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Month(u8);
    impl Debug;
    /// Century rollover flag
    pub century, set_century: 7;
    /// Tens digit
    pub tens, set_tens: 4, 4;
    /// Units digit
    pub units, set_units: 3, 0;
}
from_register_u8!(Month);

bitfield! {
    /// Year register, two BCD nibbles (00-99).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Year(u8);
    impl Debug;
    /// Tens digit
    pub tens, set_tens: 7, 4;
    /// Units digit
    pub units, set_units: 3, 0;
}
from_register_u8!(Year);

bitfield! {
    /// Control register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control(u8);
    impl Debug;
    /// Oscillator enable (inverted sense, EOSC)
    pub from into Oscillator, oscillator_enable, set_oscillator_enable: 7, 7;
    /// Square wave output while on battery power (BBSQW)
    pub battery_backed_square_wave, set_battery_backed_square_wave: 6;
    /// Force a temperature conversion (CONV)
    pub convert_temperature, set_convert_temperature: 5;
    /// Square wave frequency (RS2/RS1)
    pub from into SquareWaveFrequency, square_wave_frequency, set_square_wave_frequency: 4, 3;
    /// INT/SQW pin function (INTCN)
    pub from into InterruptControl, interrupt_control, set_interrupt_control: 2, 2;
    /// Alarm 2 interrupt enable (A2IE)
    pub alarm2_interrupt_enable, set_alarm2_interrupt_enable: 1;
    /// Alarm 1 interrupt enable (A1IE)
    pub alarm1_interrupt_enable, set_alarm1_interrupt_enable: 0;
}
from_register_u8!(Control);

bitfield! {
    /// Status register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Status(u8);
    impl Debug;
    /// Oscillator stop flag (OSF)
    pub oscillator_stop_flag, set_oscillator_stop_flag: 7;
    /// 32 kHz output enable (EN32kHz)
    pub enable_32khz_output, set_enable_32khz_output: 3;
    /// Busy flag (BSY)
    pub busy, set_busy: 2;
    /// Alarm 2 fired flag (A2F)
    pub alarm2_flag, set_alarm2_flag: 1;
    /// Alarm 1 fired flag (A1F)
    pub alarm1_flag, set_alarm1_flag: 0;
}
from_register_u8!(Status);

bitfield! {
    /// Aging offset register, signed oscillator trim.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AgingOffset(u8);
    impl Debug;
    /// Trim value (-128 to +127)
    pub i8, aging_offset, set_aging_offset: 7, 0;
}
from_register_u8!(AgingOffset);

bitfield! {
    /// Temperature register, integer part, read-only on the device.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Temperature(u8);
    impl Debug;
    /// Degrees Celsius (-128 to +127)
    pub i8, temperature, set_temperature: 7, 0;
}
from_register_u8!(Temperature);

bitfield! {
    /// Temperature register, fractional part in quarter degrees.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct TemperatureFraction(u8);
    impl Debug;
    /// Quarter-degree count (0-3)
    pub quarters, set_quarters: 7, 6;
}
from_register_u8!(TemperatureFraction);

// Alarm registers share the time-register layouts, with the per-field
// don't-care mask bit in bit 7 and the DY/DT selector in the day/date byte.

bitfield! {
    /// Alarm seconds register (Alarm 1 only).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmSeconds(u8);
    impl Debug;
    /// Don't-care mask (A1M1)
    pub mask, set_mask: 7;
    /// Tens digit
    pub tens, set_tens: 6, 4;
    /// Units digit
    pub units, set_units: 3, 0;
}
from_register_u8!(AlarmSeconds);

bitfield! {
    /// Alarm minutes register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmMinutes(u8);
    impl Debug;
    /// Don't-care mask (A1M2/A2M2)
    pub mask, set_mask: 7;
    /// Tens digit
    pub tens, set_tens: 6, 4;
    /// Units digit
    pub units, set_units: 3, 0;
}
from_register_u8!(AlarmMinutes);

bitfield! {
    /// Alarm hours register, hour bits laid out as in [`Hours`].
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmHours(u8);
    impl Debug;
    /// Don't-care mask (A1M3/A2M3)
    pub mask, set_mask: 7;
    /// 12/24-hour representation selector
    pub from into TimeRepresentation, representation, set_representation: 6, 6;
    /// PM flag (12-hour) or twenty-hours digit (24-hour)
    pub pm_or_twenty, set_pm_or_twenty: 5, 5;
    /// Tens digit
    pub tens, set_tens: 4, 4;
    /// Units digit
    pub units, set_units: 3, 0;
}
from_register_u8!(AlarmHours);

bitfield! {
    /// Alarm day/date register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmDayDate(u8);
    impl Debug;
    /// Don't-care mask (A1M4/A2M4)
    pub mask, set_mask: 7;
    /// Day-of-week vs day-of-month selector (DY/DT)
    pub from into DayDateSelect, day_date_select, set_day_date_select: 6, 6;
    /// Tens digit of the date; unused in day-of-week mode
    pub tens, set_tens: 5, 4;
    /// Day ordinal or units digit of the date
    pub day_or_date, set_day_or_date: 3, 0;
}
from_register_u8!(AlarmDayDate);

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Status(osf={} 32khz={} bsy={} a2f={} a1f={})",
            self.oscillator_stop_flag(),
            self.enable_32khz_output(),
            self.busy(),
            self.alarm2_flag(),
            self.alarm1_flag()
        );
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Control {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Control({=u8:x} a2ie={} a1ie={})",
            u8::from(*self),
            self.alarm2_interrupt_enable(),
            self.alarm1_interrupt_enable()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bcd_registers_split_nibbles() {
        let seconds = Seconds::from(0x45);
        assert_eq!(seconds.tens(), 4);
        assert_eq!(seconds.units(), 5);
        assert_eq!(u8::from(seconds), 0x45);

        let minutes = Minutes::from(0x59);
        assert_eq!(minutes.tens(), 5);
        assert_eq!(minutes.units(), 9);

        let date = Date::from(0x31);
        assert_eq!(date.tens(), 3);
        assert_eq!(date.units(), 1);

        let year = Year::from(0x99);
        assert_eq!(year.tens(), 9);
        assert_eq!(year.units(), 9);
    }

    #[test]
    fn hours_register_modes() {
        // 23:00 in 24-hour mode: twenty-hours bit carries the 2
        let hours = Hours::from(0x23);
        assert_eq!(hours.representation(), TimeRepresentation::TwentyFourHour);
        assert_eq!(hours.pm_or_twenty(), 1);
        assert_eq!(hours.tens(), 0);
        assert_eq!(hours.units(), 3);

        // 11 PM in 12-hour mode: 0x40 mode | 0x20 PM | 0x11 BCD
        let hours = Hours::from(0x71);
        assert_eq!(hours.representation(), TimeRepresentation::TwelveHour);
        assert_eq!(hours.pm_or_twenty(), 1);
        assert_eq!(hours.tens(), 1);
        assert_eq!(hours.units(), 1);

        // 8 AM in 12-hour mode
        let hours = Hours::from(0x48);
        assert_eq!(hours.representation(), TimeRepresentation::TwelveHour);
        assert_eq!(hours.pm_or_twenty(), 0);
        assert_eq!(hours.units(), 8);
    }

    #[test]
    fn month_register_carries_century() {
        let month = Month::from(0x12);
        assert!(!month.century());
        assert_eq!(month.tens(), 1);
        assert_eq!(month.units(), 2);

        let month = Month::from(0x81);
        assert!(month.century());
        assert_eq!(month.tens(), 0);
        assert_eq!(month.units(), 1);
    }

    #[test]
    fn control_register_fields() {
        let control = Control::from(0x00);
        assert_eq!(control.oscillator_enable(), Oscillator::Enabled);
        assert_eq!(control.square_wave_frequency(), SquareWaveFrequency::Hz1);
        assert_eq!(control.interrupt_control(), InterruptControl::SquareWave);
        assert!(!control.alarm1_interrupt_enable());
        assert!(!control.alarm2_interrupt_enable());

        // 0b0001_1101: 8.192 kHz, interrupt mode, alarm 1 enabled
        let control = Control::from(0x1D);
        assert_eq!(control.square_wave_frequency(), SquareWaveFrequency::Hz8192);
        assert_eq!(control.interrupt_control(), InterruptControl::Interrupt);
        assert!(control.alarm1_interrupt_enable());
        assert!(!control.alarm2_interrupt_enable());
    }

    #[test]
    fn status_register_flags() {
        let status = Status::from(0x83);
        assert!(status.oscillator_stop_flag());
        assert!(status.alarm1_flag());
        assert!(status.alarm2_flag());
        assert!(!status.busy());

        let mut status = Status::from(0x83);
        status.set_alarm1_flag(false);
        assert_eq!(u8::from(status), 0x82);
    }

    #[test]
    fn alarm_registers_carry_mask_bits() {
        let seconds = AlarmSeconds::from(0x80);
        assert!(seconds.mask());
        assert_eq!(seconds.tens(), 0);
        assert_eq!(seconds.units(), 0);

        let seconds = AlarmSeconds::from(0x35);
        assert!(!seconds.mask());
        assert_eq!(seconds.tens(), 3);
        assert_eq!(seconds.units(), 5);

        let minutes = AlarmMinutes::from(0xD7);
        assert!(minutes.mask());
        assert_eq!(minutes.tens(), 5);
        assert_eq!(minutes.units(), 7);
    }

    #[test]
    fn alarm_day_date_selector() {
        // day-of-week mode, day 3, mask set
        let day_date = AlarmDayDate::from(0xC3);
        assert!(day_date.mask());
        assert_eq!(day_date.day_date_select(), DayDateSelect::Day);
        assert_eq!(day_date.day_or_date(), 3);

        // date mode, 15th, mask clear
        let day_date = AlarmDayDate::from(0x15);
        assert!(!day_date.mask());
        assert_eq!(day_date.day_date_select(), DayDateSelect::Date);
        assert_eq!(day_date.tens(), 1);
        assert_eq!(day_date.day_or_date(), 5);
    }

    #[test]
    fn signed_registers() {
        let aging = AgingOffset::from(0xF6);
        assert_eq!(aging.aging_offset(), -10);

        let temp = Temperature::from(0x19);
        assert_eq!(temp.temperature(), 25);

        let frac = TemperatureFraction::from(0xC0);
        assert_eq!(frac.quarters(), 0b11);
    }

    #[test]
    fn raw_byte_round_trip() {
        for &value in &[0x00u8, 0x37, 0x80, 0xC3, 0xFF] {
            assert_eq!(u8::from(Seconds::from(value)), value);
            assert_eq!(u8::from(Hours::from(value)), value);
            assert_eq!(u8::from(Month::from(value)), value);
            assert_eq!(u8::from(Control::from(value)), value);
            assert_eq!(u8::from(Status::from(value)), value);
            assert_eq!(u8::from(AlarmSeconds::from(value)), value);
            assert_eq!(u8::from(AlarmHours::from(value)), value);
            assert_eq!(u8::from(AlarmDayDate::from(value)), value);
        }
    }

    #[test]
    #[should_panic(expected = "Invalid value for DayDateSelect: 2")]
    fn invalid_day_date_select() {
        let _ = DayDateSelect::from(2);
    }
}
