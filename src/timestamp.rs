//! Time codec: decoded timestamp values and their 7-byte register image.
//!
//! [`Timestamp`] is the decoded form of the DS3231 time block exactly as the
//! device stores it: two-digit year plus century flag, an opaque 1-7 weekday
//! ordinal, and an hour that is either a 24-hour value or a 12-hour value
//! with a meridiem flag. The codec packs and unpacks BCD without validating
//! field ranges; values the device cannot represent are a caller contract
//! violation, and out-of-range tens digits read back from the device are
//! passed through arithmetically.
//!
//! Conversion to and from chrono's `NaiveDateTime` lives here as well,
//! covering the device's representable window of 2000-01-01 through
//! 2199-12-31.

use core::cmp::Ordering;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::{Date, Day, Hours, Minutes, Month, Seconds, TimeRepresentation, Year};

/// Hour of day in the representation the device register uses.
///
/// The meridiem flag exists only in the 12-hour variant, so a 24-hour value
/// can never carry (or be asked for) an AM/PM state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hour {
    /// 24-hour representation, 0-23.
    TwentyFourHour(u8),
    /// 12-hour representation, 1-12 plus meridiem.
    TwelveHour {
        /// Hour value (1-12)
        hour: u8,
        /// Post-meridiem flag
        is_pm: bool,
    },
}

impl Hour {
    /// The representation bit this hour encodes with.
    #[must_use]
    pub fn representation(&self) -> TimeRepresentation {
        match self {
            Hour::TwentyFourHour(_) => TimeRepresentation::TwentyFourHour,
            Hour::TwelveHour { .. } => TimeRepresentation::TwelveHour,
        }
    }

    /// The bare hour number, without representation or meridiem.
    #[must_use]
    pub fn number(&self) -> u8 {
        match self {
            Hour::TwentyFourHour(hour) => *hour,
            Hour::TwelveHour { hour, .. } => *hour,
        }
    }
}

/// Decoded contents of the seven time registers.
///
/// A plain value object: built by the caller or decoded from a register
/// read, never mutated by the driver. Field ranges are the device's
/// (two-digit year, weekday 1-7 with no calendar meaning attached) and are
/// not checked by the codec.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    /// Seconds (0-59)
    pub seconds: u8,
    /// Minutes (0-59)
    pub minutes: u8,
    /// Hour of day
    pub hour: Hour,
    /// Day of week (1-7, device-defined ordinal)
    pub day: u8,
    /// Day of month (1-31)
    pub date: u8,
    /// Month (1-12)
    pub month: u8,
    /// Two-digit year (0-99)
    pub year: u8,
    /// Century rollover flag stored alongside the month
    pub century: bool,
}

impl Timestamp {
    /// Orders `self` relative to `other` (`Less` means `self` sorts first).
    ///
    /// The order is lexicographic over the device's register fields, most
    /// significant first: century, year, month, day of month, day of week,
    /// hour number, minutes, seconds. Two quirks are intentional and match
    /// the device field layout rather than wall-clock chronology: the
    /// weekday ordinal participates even though it is not a calendar
    /// quantity, and the hour is compared as a bare number with the
    /// representation and meridiem flags ignored.
    #[must_use]
    pub fn compare(&self, other: &Timestamp) -> Ordering {
        let key = |t: &Timestamp| {
            (
                t.century,
                t.year,
                t.month,
                t.date,
                t.day,
                t.hour.number(),
                t.minutes,
                t.seconds,
            )
        };
        key(self).cmp(&key(other))
    }

    /// Converts a `NaiveDateTime` into a device timestamp.
    ///
    /// The weekday is mapped with 1 = Sunday, and years 2100-2199 set the
    /// century flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the year falls outside 2000-2199.
    pub fn from_datetime(
        datetime: &NaiveDateTime,
        representation: TimeRepresentation,
    ) -> Result<Self, TimestampError> {
        let year = datetime.year();
        if year < 2000 {
            return Err(TimestampError::YearBefore2000);
        }
        if year > 2199 {
            return Err(TimestampError::YearAfter2199);
        }
        let mut offset = year - 2000;
        let century = offset >= 100;
        if century {
            offset -= 100;
        }

        let hour24 = datetime.hour() as u8;
        let hour = match representation {
            TimeRepresentation::TwentyFourHour => Hour::TwentyFourHour(hour24),
            TimeRepresentation::TwelveHour => {
                let (hour, is_pm) = match hour24 {
                    0 => (12, false),
                    1..=11 => (hour24, false),
                    12 => (12, true),
                    _ => (hour24 - 12, true),
                };
                Hour::TwelveHour { hour, is_pm }
            }
        };

        Ok(Timestamp {
            seconds: datetime.second() as u8,
            minutes: datetime.minute() as u8,
            hour,
            day: datetime.weekday().num_days_from_sunday() as u8 + 1,
            date: datetime.day() as u8,
            month: datetime.month() as u8,
            year: offset as u8,
            century,
        })
    }

    /// Converts the timestamp into a `NaiveDateTime`.
    ///
    /// The weekday ordinal is not consulted; the calendar date alone
    /// determines the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the fields do not form a real calendar
    /// date/time.
    pub fn to_datetime(&self) -> Result<NaiveDateTime, TimestampError> {
        let hour24 = match self.hour {
            Hour::TwentyFourHour(hour) => hour,
            Hour::TwelveHour { hour: 12, is_pm: false } => 0,
            Hour::TwelveHour { hour: 12, is_pm: true } => 12,
            Hour::TwelveHour { hour, is_pm: false } => hour,
            Hour::TwelveHour { hour, is_pm: true } => hour + 12,
        };
        let year = 2000 + i32::from(self.year) + if self.century { 100 } else { 0 };

        NaiveDate::from_ymd_opt(year, u32::from(self.month), u32::from(self.date))
            .and_then(|d| {
                d.and_hms_opt(
                    u32::from(hour24),
                    u32::from(self.minutes),
                    u32::from(self.seconds),
                )
            })
            .ok_or(TimestampError::InvalidDateTime)
    }
}

/// Errors from conversions between [`Timestamp`] and `NaiveDateTime`.
///
/// Never produced by the register codec or by any bus operation.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimestampError {
    /// The fields do not form a representable calendar date/time.
    InvalidDateTime,
    /// Years before 2000 are outside the device window.
    YearBefore2000,
    /// Years after 2199 are outside the device window.
    YearAfter2199,
}

/// Packs an hour into the register bit layout.
///
/// 24-hour values spread the tens digit across the ten-hours bit and the
/// twenty-hours bit; 12-hour values use the ten-hours bit alone and put the
/// meridiem in bit 5.
pub(crate) fn encode_hours(hour: Hour) -> Hours {
    let mut value = Hours::default();
    value.set_representation(hour.representation());
    match hour {
        Hour::TwentyFourHour(h) => {
            value.set_units(h % 10);
            value.set_tens((h / 10) & 0x01);
            value.set_pm_or_twenty((h / 10) >> 1);
        }
        Hour::TwelveHour { hour: h, is_pm } => {
            value.set_units(h % 10);
            value.set_tens(h / 10);
            value.set_pm_or_twenty(u8::from(is_pm));
        }
    }
    value
}

// The representation bit is read first: it decides whether bit 5 is a
// meridiem flag or the twenty-hours digit.
fn decode_hours(value: Hours) -> Hour {
    let low = 10 * value.tens() + value.units();
    match value.representation() {
        TimeRepresentation::TwentyFourHour => Hour::TwentyFourHour(low + 20 * value.pm_or_twenty()),
        TimeRepresentation::TwelveHour => Hour::TwelveHour {
            hour: low,
            is_pm: value.pm_or_twenty() != 0,
        },
    }
}

/// Register image of the time block: the seven bytes at address 0x00.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct ClockRegisters {
    seconds: Seconds,
    minutes: Minutes,
    hours: Hours,
    day: Day,
    date: Date,
    month: Month,
    year: Year,
}

impl ClockRegisters {
    /// Encodes a timestamp into its register image.
    pub(crate) fn from_timestamp(ts: &Timestamp) -> Self {
        let mut seconds = Seconds::default();
        seconds.set_units(ts.seconds % 10);
        seconds.set_tens(ts.seconds / 10);

        let mut minutes = Minutes::default();
        minutes.set_units(ts.minutes % 10);
        minutes.set_tens(ts.minutes / 10);

        let hours = encode_hours(ts.hour);

        let mut day = Day::default();
        day.set_day(ts.day & 0x07);

        let mut date = Date::default();
        date.set_units(ts.date % 10);
        date.set_tens(ts.date / 10);

        let mut month = Month::default();
        month.set_century(ts.century);
        month.set_units(ts.month % 10);
        month.set_tens(ts.month / 10);

        let mut year = Year::default();
        year.set_units(ts.year % 10);
        year.set_tens(ts.year / 10);

        ClockRegisters {
            seconds,
            minutes,
            hours,
            day,
            date,
            month,
            year,
        }
    }

    /// Decodes the register image into a timestamp.
    ///
    /// Tens digits are combined arithmetically without range checks; a
    /// corrupt register reads back as an out-of-range field value rather
    /// than an error. The century flag is read before the month nibbles and
    /// the hour representation before the hour nibbles.
    pub(crate) fn into_timestamp(self) -> Timestamp {
        let century = self.month.century();
        Timestamp {
            seconds: 10 * self.seconds.tens() + self.seconds.units(),
            minutes: 10 * self.minutes.tens() + self.minutes.units(),
            hour: decode_hours(self.hours),
            day: self.day.day(),
            date: 10 * self.date.tens() + self.date.units(),
            month: 10 * self.month.tens() + self.month.units(),
            year: 10 * self.year.tens() + self.year.units(),
            century,
        }
    }
}

impl From<[u8; 7]> for ClockRegisters {
    fn from(data: [u8; 7]) -> Self {
        ClockRegisters {
            seconds: Seconds::from(data[0]),
            minutes: Minutes::from(data[1]),
            hours: Hours::from(data[2]),
            day: Day::from(data[3]),
            date: Date::from(data[4]),
            month: Month::from(data[5]),
            year: Year::from(data[6]),
        }
    }
}

impl From<&ClockRegisters> for [u8; 7] {
    fn from(regs: &ClockRegisters) -> [u8; 7] {
        [
            regs.seconds.into(),
            regs.minutes.into(),
            regs.hours.into(),
            regs.day.into(),
            regs.date.into(),
            regs.month.into(),
            regs.year.into(),
        ]
    }
}
