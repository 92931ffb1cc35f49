//! Platform-agnostic driver for the DS3231 battery-backed real-time clock.
//!
//! The driver speaks to the device over any [`embedded_hal::i2c::I2c`]
//! implementation and works at the register level: time is read and written
//! as a [`Timestamp`] (the decoded image of the seven time registers,
//! two-digit year and all), alarms are armed from an [`Alarm1Spec`] or
//! [`Alarm2Spec`] naming which fields must match, and the alarm
//! interrupt-enable and fired flags are flipped by read-modify-write so the
//! neighbouring control/status bits are left untouched.
//!
//! Every bus operation is blocking and either succeeds fully or returns the
//! transport error unchanged; there are no retries and no partial results.
//! The codecs do not validate caller-supplied field values (keeping fields
//! BCD-representable is the caller's contract), and values read back from
//! the device are decoded arithmetically without range checks.
//!
//! # Example
//!
//! ```rust,ignore
//! use ds3231_rtc::{Alarm, Alarm1Match, Alarm1Spec, Ds3231, DEVICE_ADDRESS};
//!
//! let mut rtc = Ds3231::new(i2c, DEVICE_ADDRESS);
//!
//! // Arm alarm 1 for 06:00:00 daily and route it to the INT pin.
//! let time = rtc.time()?;
//! rtc.set_alarm1(&Alarm1Spec {
//!     mode: Alarm1Match::HoursMinutesSeconds,
//!     at: Timestamp { seconds: 0, minutes: 0, hour: Hour::TwentyFourHour(6), ..time },
//! })?;
//! rtc.clear_alarm_flag(Alarm::One)?;
//! rtc.set_alarm_interrupt(Alarm::One, true)?;
//! ```
//!
//! # Features
//!
//! - `async`: an `embedded-hal-async` twin of the driver in [`asynch`]
//! - `log`: debug tracing through the `log` crate
//! - `defmt`: `defmt::Format` implementations for the public types

#![no_std]

pub mod alarm;
mod registers;
mod timestamp;

#[cfg(feature = "async")]
pub mod asynch;

pub use alarm::{Alarm1Match, Alarm1Spec, Alarm2Match, Alarm2Spec};
pub use registers::{
    AgingOffset, AlarmDayDate, AlarmHours, AlarmMinutes, AlarmSeconds, Control, Date, Day,
    DayDateSelect, Hours, InterruptControl, Minutes, Month, Oscillator, RegAddr, Seconds,
    SquareWaveFrequency, Status, Temperature, TemperatureFraction, TimeRepresentation, Year,
};
pub use timestamp::{Hour, Timestamp, TimestampError};

use embedded_hal::i2c::I2c;
use paste::paste;

use crate::alarm::{Alarm1Registers, Alarm2Registers};
use crate::timestamp::ClockRegisters;

cfg_if::cfg_if! {
    if #[cfg(feature = "log")] {
        use log::debug;
    } else if #[cfg(feature = "defmt")] {
        use defmt::debug;
    }
}

/// Factory-fixed 7-bit bus address of the DS3231.
pub const DEVICE_ADDRESS: u8 = 0x68;

/// Driver errors.
///
/// The only failure the driver produces is the transport reporting a
/// bus-level fault; it is passed through without sub-classification.
#[derive(Debug)]
pub enum Error<E> {
    /// The underlying I2C transaction failed.
    I2c(E),
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::I2c(e)
    }
}

/// Alarm channel selector for the interrupt and flag operations.
///
/// The channel number is also the channel's bit position offset in the
/// control and status registers (A1IE/A1F in bit 0, A2IE/A2F in bit 1).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm {
    /// Alarm 1, seconds granularity.
    One,
    /// Alarm 2, minute granularity.
    Two,
}

/// Control-register configuration applied by [`Ds3231::configure`].
///
/// Covers the oscillator and INT/SQW pin behaviour. The alarm
/// interrupt-enable bits are deliberately not part of it; they are driven
/// by [`Ds3231::set_alarm_interrupt`] and preserved across `configure`.
pub struct Config {
    /// Square wave output frequency.
    pub square_wave_frequency: SquareWaveFrequency,
    /// INT/SQW pin function: square wave or alarm interrupt.
    pub interrupt_control: InterruptControl,
    /// Keep the square wave running on battery power.
    pub battery_backed_square_wave: bool,
    /// Run the oscillator on battery power.
    pub oscillator_enable: Oscillator,
}

/// DS3231 driver over a blocking I2C bus.
///
/// Holds nothing but the bus handle and the device address it was
/// constructed with; the device's registers are the only durable state.
/// The driver assumes it is the sole bus user for the duration of each
/// call and performs no locking of its own. Read-modify-write operations
/// are not atomic across calls: two contexts clearing different alarm
/// flags through the same register can lose one update unless the caller
/// serializes access.
pub struct Ds3231<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Ds3231<I2C> {
    /// Creates a driver instance for the device at `address`.
    ///
    /// The DS3231 itself always answers at [`DEVICE_ADDRESS`]; the address
    /// is a parameter so several instances on different buses (or a mock
    /// transport) can coexist.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Consumes the driver and releases the bus handle.
    #[must_use]
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Reads `buf.len()` registers starting at `reg`.
    ///
    /// One transaction: the address byte is written with the bus held
    /// open, then the registers are read with the stop condition on the
    /// final byte. On failure nothing of the partial read is exposed.
    fn read_registers(&mut self, reg: RegAddr, buf: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        self.i2c.write_read(self.address, &[reg as u8], buf)?;
        Ok(())
    }

    /// Writes `frame` (address byte plus payload) as one transaction.
    ///
    /// The device may latch a prefix of the payload if the transaction
    /// fails partway; no rollback is attempted.
    fn write_registers(&mut self, frame: &[u8]) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(self.address, frame)?;
        Ok(())
    }

    /// Reads one register, applies `mutate`, writes the result back.
    ///
    /// Not a compare-and-swap: another bus master (or another call racing
    /// from an interrupt context) between the read and the write loses its
    /// update.
    fn modify_register<F>(&mut self, reg: RegAddr, mutate: F) -> Result<(), Error<I2C::Error>>
    where
        F: FnOnce(u8) -> u8,
    {
        let mut data = [0];
        self.read_registers(reg, &mut data)?;
        self.write_registers(&[reg as u8, mutate(data[0])])
    }

    /// Programs the control register from `config`, preserving the alarm
    /// interrupt-enable bits.
    pub fn configure(&mut self, config: &Config) -> Result<(), Error<I2C::Error>> {
        let mut control = self.control()?;
        control.set_oscillator_enable(config.oscillator_enable);
        control.set_battery_backed_square_wave(config.battery_backed_square_wave);
        control.set_square_wave_frequency(config.square_wave_frequency);
        control.set_interrupt_control(config.interrupt_control);
        #[cfg(any(feature = "log", feature = "defmt"))]
        debug!("DS3231: writing control register {}", u8::from(control));
        self.set_control(control)
    }

    /// Reads the current time: one 7-byte read of the time block, decoded.
    pub fn time(&mut self) -> Result<Timestamp, Error<I2C::Error>> {
        let mut data = [0; 7];
        self.read_registers(RegAddr::Seconds, &mut data)?;
        Ok(ClockRegisters::from(data).into_timestamp())
    }

    /// Sets the time: one 8-byte write (address plus the encoded block).
    pub fn set_time(&mut self, timestamp: &Timestamp) -> Result<(), Error<I2C::Error>> {
        let data: [u8; 7] = (&ClockRegisters::from_timestamp(timestamp)).into();
        self.write_registers(&[
            RegAddr::Seconds as u8,
            data[0],
            data[1],
            data[2],
            data[3],
            data[4],
            data[5],
            data[6],
        ])
    }

    /// Programs the Alarm 1 register block in a single write.
    pub fn set_alarm1(&mut self, spec: &Alarm1Spec) -> Result<(), Error<I2C::Error>> {
        let data: [u8; 4] = (&Alarm1Registers::from_spec(spec)).into();
        self.write_registers(&[
            RegAddr::Alarm1Seconds as u8,
            data[0],
            data[1],
            data[2],
            data[3],
        ])
    }

    /// Programs the Alarm 2 register block in a single write.
    pub fn set_alarm2(&mut self, spec: &Alarm2Spec) -> Result<(), Error<I2C::Error>> {
        let data: [u8; 3] = (&Alarm2Registers::from_spec(spec)).into();
        self.write_registers(&[RegAddr::Alarm2Minutes as u8, data[0], data[1], data[2]])
    }

    /// Enables or disables the alarm interrupt for one channel by
    /// read-modify-write on the control register.
    pub fn set_alarm_interrupt(
        &mut self,
        alarm: Alarm,
        enabled: bool,
    ) -> Result<(), Error<I2C::Error>> {
        self.modify_register(RegAddr::Control, |raw| {
            let mut control = Control::from(raw);
            match alarm {
                Alarm::One => control.set_alarm1_interrupt_enable(enabled),
                Alarm::Two => control.set_alarm2_interrupt_enable(enabled),
            }
            control.into()
        })
    }

    /// Clears one channel's fired flag by read-modify-write on the status
    /// register; every other status bit is written back unchanged.
    pub fn clear_alarm_flag(&mut self, alarm: Alarm) -> Result<(), Error<I2C::Error>> {
        self.modify_register(RegAddr::Status, |raw| {
            let mut status = Status::from(raw);
            match alarm {
                Alarm::One => status.set_alarm1_flag(false),
                Alarm::Two => status.set_alarm2_flag(false),
            }
            status.into()
        })
    }

    /// Returns whether one channel's fired flag is set, from a single
    /// status read. The flag is left set; use
    /// [`clear_alarm_flag`](Self::clear_alarm_flag) to rearm.
    pub fn alarm_fired(&mut self, alarm: Alarm) -> Result<bool, Error<I2C::Error>> {
        let status = self.status()?;
        Ok(match alarm {
            Alarm::One => status.alarm1_flag(),
            Alarm::Two => status.alarm2_flag(),
        })
    }
}

// Single-register get/set pairs, one per mapped register.
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        impl<I2C: I2c> Ds3231<I2C> {
            $(
                paste! {
                    #[doc = concat!("Reads the ", stringify!($name), " register.")]
                    pub fn $name(&mut self) -> Result<$typ, Error<I2C::Error>> {
                        let mut data = [0];
                        self.read_registers($regaddr, &mut data)?;
                        Ok(<$typ>::from(data[0]))
                    }

                    #[doc = concat!("Writes the ", stringify!($name), " register.")]
                    pub fn [<set_ $name>](&mut self, value: $typ) -> Result<(), Error<I2C::Error>> {
                        self.write_registers(&[$regaddr as u8, value.into()])
                    }
                }
            )+
        }
    }
}

impl_register_access!(
    (second, RegAddr::Seconds, Seconds),
    (minute, RegAddr::Minutes, Minutes),
    (hour, RegAddr::Hours, Hours),
    (day, RegAddr::Day, Day),
    (date, RegAddr::Date, Date),
    (month, RegAddr::Month, Month),
    (year, RegAddr::Year, Year),
    (alarm1_second, RegAddr::Alarm1Seconds, AlarmSeconds),
    (alarm1_minute, RegAddr::Alarm1Minutes, AlarmMinutes),
    (alarm1_hour, RegAddr::Alarm1Hours, AlarmHours),
    (alarm1_day_date, RegAddr::Alarm1DayDate, AlarmDayDate),
    (alarm2_minute, RegAddr::Alarm2Minutes, AlarmMinutes),
    (alarm2_hour, RegAddr::Alarm2Hours, AlarmHours),
    (alarm2_day_date, RegAddr::Alarm2DayDate, AlarmDayDate),
    (control, RegAddr::Control, Control),
    (status, RegAddr::Status, Status),
    (aging_offset, RegAddr::AgingOffset, AgingOffset),
    (temperature, RegAddr::TempMsb, Temperature),
    (temperature_fraction, RegAddr::TempLsb, TemperatureFraction)
);
