//! Alarm codec: match policies and their register-block encodings.
//!
//! Each alarm channel fires when the live clock matches the programmed
//! reference in a fixed set of fields. Which fields take part is the match
//! mode; the device expresses "this field does not take part" with the
//! don't-care bit (bit 7) of the field's alarm register, and distinguishes
//! day-of-week from day-of-month matching with the DY/DT bit.
//!
//! The mode sets nest strictly (seconds ⊂ minutes+seconds ⊂
//! hours+minutes+seconds ⊂ day/date+time for Alarm 1; the same without
//! seconds for Alarm 2). Every mode is encoded by its own match arm naming
//! exactly the registers it programs, so each variant's field set can be
//! checked in isolation.
//!
//! Alarm registers are write-only from the driver's point of view: a
//! programmed spec is never read back.

use crate::timestamp::encode_hours;
use crate::{AlarmDayDate, AlarmHours, AlarmMinutes, AlarmSeconds, DayDateSelect, Hour, Timestamp};

/// Alarm 1 match modes, seconds granularity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm1Match {
    /// Fire once per second; no field takes part.
    EverySecond,
    /// Fire when the seconds match.
    Seconds,
    /// Fire when minutes and seconds match.
    MinutesSeconds,
    /// Fire when hours, minutes and seconds match (daily).
    HoursMinutesSeconds,
    /// Fire when the day of month and the time match (monthly).
    DateHoursMinutesSeconds,
    /// Fire when the day of week and the time match (weekly).
    DayHoursMinutesSeconds,
}

/// Alarm 2 match modes, minute granularity (fires at seconds 00).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm2Match {
    /// Fire once per minute; no field takes part.
    EveryMinute,
    /// Fire when the minutes match.
    Minutes,
    /// Fire when hours and minutes match (daily).
    HoursMinutes,
    /// Fire when the day of month and the time match (monthly).
    DateHoursMinutes,
    /// Fire when the day of week and the time match (weekly).
    DayHoursMinutes,
}

/// An Alarm 1 request: the match mode plus the reference time supplying
/// the matched field values. Fields of `at` outside the mode's set are
/// ignored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alarm1Spec {
    /// Which fields of `at` must match.
    pub mode: Alarm1Match,
    /// Reference time.
    pub at: Timestamp,
}

/// An Alarm 2 request, as [`Alarm1Spec`] without seconds granularity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alarm2Spec {
    /// Which fields of `at` must match.
    pub mode: Alarm2Match,
    /// Reference time.
    pub at: Timestamp,
}

// A register excluded from the match carries only its don't-care bit; an
// included register carries the BCD value with the don't-care bit clear.

fn masked_seconds() -> AlarmSeconds {
    AlarmSeconds::from(0x80)
}

fn masked_minutes() -> AlarmMinutes {
    AlarmMinutes::from(0x80)
}

fn masked_hours() -> AlarmHours {
    AlarmHours::from(0x80)
}

fn masked_day_date() -> AlarmDayDate {
    AlarmDayDate::from(0x80)
}

fn match_seconds(seconds: u8) -> AlarmSeconds {
    let mut value = AlarmSeconds::default();
    value.set_units(seconds % 10);
    value.set_tens(seconds / 10);
    value
}

fn match_minutes(minutes: u8) -> AlarmMinutes {
    let mut value = AlarmMinutes::default();
    value.set_units(minutes % 10);
    value.set_tens(minutes / 10);
    value
}

// Hour bits reuse the time codec's layout; the alarm register only adds
// the don't-care bit on top, which stays clear here.
fn match_hours(hour: Hour) -> AlarmHours {
    AlarmHours::from(u8::from(encode_hours(hour)))
}

fn match_date(date: u8) -> AlarmDayDate {
    let mut value = AlarmDayDate::default();
    value.set_day_date_select(DayDateSelect::Date);
    value.set_day_or_date(date % 10);
    value.set_tens(date / 10);
    value
}

fn match_day(day: u8) -> AlarmDayDate {
    let mut value = AlarmDayDate::default();
    value.set_day_date_select(DayDateSelect::Day);
    value.set_day_or_date(day & 0x07);
    value
}

/// Register image of the Alarm 1 block: the four bytes at address 0x07.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Alarm1Registers {
    seconds: AlarmSeconds,
    minutes: AlarmMinutes,
    hours: AlarmHours,
    day_date: AlarmDayDate,
}

impl Alarm1Registers {
    /// Encodes a spec into the register block. One arm per mode; each arm
    /// names every register it programs at match state, the rest are
    /// masked.
    pub(crate) fn from_spec(spec: &Alarm1Spec) -> Self {
        let at = &spec.at;
        match spec.mode {
            Alarm1Match::EverySecond => Alarm1Registers {
                seconds: masked_seconds(),
                minutes: masked_minutes(),
                hours: masked_hours(),
                day_date: masked_day_date(),
            },
            Alarm1Match::Seconds => Alarm1Registers {
                seconds: match_seconds(at.seconds),
                minutes: masked_minutes(),
                hours: masked_hours(),
                day_date: masked_day_date(),
            },
            Alarm1Match::MinutesSeconds => Alarm1Registers {
                seconds: match_seconds(at.seconds),
                minutes: match_minutes(at.minutes),
                hours: masked_hours(),
                day_date: masked_day_date(),
            },
            Alarm1Match::HoursMinutesSeconds => Alarm1Registers {
                seconds: match_seconds(at.seconds),
                minutes: match_minutes(at.minutes),
                hours: match_hours(at.hour),
                day_date: masked_day_date(),
            },
            Alarm1Match::DateHoursMinutesSeconds => Alarm1Registers {
                seconds: match_seconds(at.seconds),
                minutes: match_minutes(at.minutes),
                hours: match_hours(at.hour),
                day_date: match_date(at.date),
            },
            Alarm1Match::DayHoursMinutesSeconds => Alarm1Registers {
                seconds: match_seconds(at.seconds),
                minutes: match_minutes(at.minutes),
                hours: match_hours(at.hour),
                day_date: match_day(at.day),
            },
        }
    }
}

impl From<&Alarm1Registers> for [u8; 4] {
    fn from(regs: &Alarm1Registers) -> [u8; 4] {
        [
            regs.seconds.into(),
            regs.minutes.into(),
            regs.hours.into(),
            regs.day_date.into(),
        ]
    }
}

/// Register image of the Alarm 2 block: the three bytes at address 0x0B.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Alarm2Registers {
    minutes: AlarmMinutes,
    hours: AlarmHours,
    day_date: AlarmDayDate,
}

impl Alarm2Registers {
    /// Encodes a spec into the register block, one arm per mode.
    pub(crate) fn from_spec(spec: &Alarm2Spec) -> Self {
        let at = &spec.at;
        match spec.mode {
            Alarm2Match::EveryMinute => Alarm2Registers {
                minutes: masked_minutes(),
                hours: masked_hours(),
                day_date: masked_day_date(),
            },
            Alarm2Match::Minutes => Alarm2Registers {
                minutes: match_minutes(at.minutes),
                hours: masked_hours(),
                day_date: masked_day_date(),
            },
            Alarm2Match::HoursMinutes => Alarm2Registers {
                minutes: match_minutes(at.minutes),
                hours: match_hours(at.hour),
                day_date: masked_day_date(),
            },
            Alarm2Match::DateHoursMinutes => Alarm2Registers {
                minutes: match_minutes(at.minutes),
                hours: match_hours(at.hour),
                day_date: match_date(at.date),
            },
            Alarm2Match::DayHoursMinutes => Alarm2Registers {
                minutes: match_minutes(at.minutes),
                hours: match_hours(at.hour),
                day_date: match_day(at.day),
            },
        }
    }
}

impl From<&Alarm2Registers> for [u8; 3] {
    fn from(regs: &Alarm2Registers) -> [u8; 3] {
        [regs.minutes.into(), regs.hours.into(), regs.day_date.into()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hour;

    fn reference() -> Timestamp {
        Timestamp {
            seconds: 45,
            minutes: 30,
            hour: Hour::TwentyFourHour(15),
            day: 3,
            date: 21,
            month: 6,
            year: 24,
            century: false,
        }
    }

    fn alarm1_bytes(mode: Alarm1Match, at: Timestamp) -> [u8; 4] {
        (&Alarm1Registers::from_spec(&Alarm1Spec { mode, at })).into()
    }

    fn alarm2_bytes(mode: Alarm2Match, at: Timestamp) -> [u8; 3] {
        (&Alarm2Registers::from_spec(&Alarm2Spec { mode, at })).into()
    }

    #[test]
    fn alarm1_every_second_masks_everything() {
        assert_eq!(
            alarm1_bytes(Alarm1Match::EverySecond, reference()),
            [0x80, 0x80, 0x80, 0x80]
        );
    }

    #[test]
    fn alarm1_daily_time_match() {
        // match 06:00:00 daily: day/date masked, time fields zero
        let at = Timestamp {
            seconds: 0,
            minutes: 0,
            hour: Hour::TwentyFourHour(6),
            ..reference()
        };
        assert_eq!(
            alarm1_bytes(Alarm1Match::HoursMinutesSeconds, at),
            [0x00, 0x00, 0x06, 0x80]
        );
    }

    #[test]
    fn alarm1_mask_bits_mark_excluded_fields() {
        let at = reference();

        assert_eq!(
            alarm1_bytes(Alarm1Match::Seconds, at),
            [0x45, 0x80, 0x80, 0x80]
        );
        assert_eq!(
            alarm1_bytes(Alarm1Match::MinutesSeconds, at),
            [0x45, 0x30, 0x80, 0x80]
        );
        assert_eq!(
            alarm1_bytes(Alarm1Match::HoursMinutesSeconds, at),
            [0x45, 0x30, 0x15, 0x80]
        );
    }

    #[test]
    fn alarm1_nesting_preserves_shared_bytes() {
        // a coarser mode must encode every shared field byte identically
        let at = reference();
        let seconds = alarm1_bytes(Alarm1Match::Seconds, at);
        let minutes_seconds = alarm1_bytes(Alarm1Match::MinutesSeconds, at);
        let time = alarm1_bytes(Alarm1Match::HoursMinutesSeconds, at);
        let date_time = alarm1_bytes(Alarm1Match::DateHoursMinutesSeconds, at);

        assert_eq!(seconds[0], minutes_seconds[0]);
        assert_eq!(seconds[0], time[0]);
        assert_eq!(seconds[0], date_time[0]);

        assert_eq!(minutes_seconds[1], time[1]);
        assert_eq!(minutes_seconds[1], date_time[1]);

        assert_eq!(time[2], date_time[2]);
    }

    #[test]
    fn alarm1_date_and_day_selector() {
        let at = reference();

        // date match: DY/DT clear, BCD date
        let bytes = alarm1_bytes(Alarm1Match::DateHoursMinutesSeconds, at);
        assert_eq!(bytes[3], 0x21);

        // day match: DY/DT set, 3-bit ordinal
        let bytes = alarm1_bytes(Alarm1Match::DayHoursMinutesSeconds, at);
        assert_eq!(bytes[3], 0x43);
    }

    #[test]
    fn alarm1_hours_reuse_time_codec_layout() {
        let at = Timestamp {
            hour: Hour::TwelveHour {
                hour: 11,
                is_pm: true,
            },
            ..reference()
        };
        let bytes = alarm1_bytes(Alarm1Match::HoursMinutesSeconds, at);
        assert_eq!(bytes[2], 0x71); // 0x40 mode | 0x20 PM | 0x11 BCD
    }

    #[test]
    fn alarm2_every_minute_masks_everything() {
        assert_eq!(
            alarm2_bytes(Alarm2Match::EveryMinute, reference()),
            [0x80, 0x80, 0x80]
        );
    }

    #[test]
    fn alarm2_mask_bits_mark_excluded_fields() {
        let at = reference();

        assert_eq!(alarm2_bytes(Alarm2Match::Minutes, at), [0x30, 0x80, 0x80]);
        assert_eq!(
            alarm2_bytes(Alarm2Match::HoursMinutes, at),
            [0x30, 0x15, 0x80]
        );
        assert_eq!(
            alarm2_bytes(Alarm2Match::DateHoursMinutes, at),
            [0x30, 0x15, 0x21]
        );
        assert_eq!(
            alarm2_bytes(Alarm2Match::DayHoursMinutes, at),
            [0x30, 0x15, 0x43]
        );
    }

    #[test]
    fn alarm2_nesting_preserves_shared_bytes() {
        let at = reference();
        let minutes = alarm2_bytes(Alarm2Match::Minutes, at);
        let time = alarm2_bytes(Alarm2Match::HoursMinutes, at);
        let day_time = alarm2_bytes(Alarm2Match::DayHoursMinutes, at);

        assert_eq!(minutes[0], time[0]);
        assert_eq!(minutes[0], day_time[0]);
        assert_eq!(time[1], day_time[1]);
    }

    #[test]
    fn day_ordinal_is_masked_to_three_bits() {
        let at = Timestamp {
            day: 0x0F,
            ..reference()
        };
        let bytes = alarm1_bytes(Alarm1Match::DayHoursMinutesSeconds, at);
        assert_eq!(bytes[3] & 0x0F, 0x07);
    }
}
