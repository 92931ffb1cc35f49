//! # DS3231 Deep-Sleep Alarm Demo
//!
//! Exercises the DS3231 driver across low-power sleep cycles on an ESP32.
//! Each cycle:
//!
//! 1. Reads the current time and clears a pending Alarm 1 flag.
//! 2. Arms Alarm 1 for the next whole minute and enables its interrupt so
//!    the INT/SQW pin falls when it fires.
//! 3. Enters deep sleep with the INT/SQW pin as the wake source.
//!
//! Waking from deep sleep resets the chip, so the cycle restarts from
//! `main`: the same shape as a dormant-until-pin loop, with the alarm
//! state living entirely on the RTC.
//!
//! ## Hardware Connections
//! - **SDA**: GPIO21
//! - **SCL**: GPIO22
//! - **SQW/INT**: GPIO27 (RTC-capable input, pulled up externally)
//!
//! On first power-up the clock is seeded with a fixed date; on later wakes
//! the battery-backed time is left alone.

#![no_std]
#![no_main]

use chrono::NaiveDate;
use ds3231_rtc::{
    Alarm, Alarm1Match, Alarm1Spec, Config, Ds3231, InterruptControl, Oscillator,
    SquareWaveFrequency, TimeRepresentation, Timestamp, DEVICE_ADDRESS,
};
use esp_backtrace as _;
use esp_hal::{
    clock::CpuClock,
    gpio::Input,
    i2c::master::{Config as I2cConfig, I2c},
    main,
    rtc_cntl::{
        sleep::{Ext0WakeupSource, WakeupLevel},
        Rtc,
    },
    time::Rate,
};
use log::info;

#[main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("DS3231 deep-sleep alarm demo starting...");

    let i2c_config = I2cConfig::default().with_frequency(Rate::from_khz(100));
    let i2c = I2c::new(peripherals.I2C0, i2c_config)
        .unwrap()
        .with_sda(peripherals.GPIO21)
        .with_scl(peripherals.GPIO22);

    let mut rtc3231 = Ds3231::new(i2c, DEVICE_ADDRESS);

    // Route the INT/SQW pin to the alarm interrupt.
    let rtc_config = Config {
        square_wave_frequency: SquareWaveFrequency::Hz1,
        interrupt_control: InterruptControl::Interrupt,
        battery_backed_square_wave: false,
        oscillator_enable: Oscillator::Enabled,
    };
    if let Err(e) = rtc3231.configure(&rtc_config) {
        info!("Failed to configure DS3231: {:?}", e);
        panic!("DS3231 configuration failed");
    }

    let now = match rtc3231.time() {
        Ok(now) => now,
        Err(e) => {
            info!("Failed to read time: {:?}", e);
            panic!("DS3231 read failed");
        }
    };

    // A clock that reads back at century zero, year zero has never been
    // set; seed it once. The battery keeps it across sleep cycles.
    let now = if now.year == 0 && !now.century {
        let seed = NaiveDate::from_ymd_opt(2024, 12, 20)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let seed = Timestamp::from_datetime(&seed, TimeRepresentation::TwentyFourHour).unwrap();
        match rtc3231.set_time(&seed) {
            Ok(()) => info!("Clock seeded to 2024-12-20 14:30:00"),
            Err(e) => info!("Failed to seed clock: {:?}", e),
        }
        seed
    } else {
        now
    };

    info!(
        "Time: 20{}{:02}-{:02}-{:02} {:02}:{:02}:{:02}",
        if now.century { 1 } else { 0 },
        now.year,
        now.month,
        now.date,
        now.hour.number(),
        now.minutes,
        now.seconds
    );

    // A set fired flag means the alarm woke us; clear it so the INT pin
    // releases and the next cycle can fire again.
    match rtc3231.alarm_fired(Alarm::One) {
        Ok(true) => {
            info!("Woken by alarm 1, clearing flag");
            if let Err(e) = rtc3231.clear_alarm_flag(Alarm::One) {
                info!("Failed to clear alarm flag: {:?}", e);
            }
        }
        Ok(false) => info!("Cold start, alarm not pending"),
        Err(e) => info!("Failed to read alarm state: {:?}", e),
    }

    // Arm for the next whole minute; fields outside the match mode are
    // ignored by the encoder.
    let wake_at = Timestamp {
        seconds: 0,
        minutes: if now.minutes < 59 { now.minutes + 1 } else { 0 },
        ..now
    };
    let spec = Alarm1Spec {
        mode: Alarm1Match::MinutesSeconds,
        at: wake_at,
    };
    match rtc3231.set_alarm1(&spec) {
        Ok(()) => info!("Alarm 1 armed for minute {:02}:00", wake_at.minutes),
        Err(e) => {
            info!("Failed to arm alarm: {:?}", e);
            panic!("DS3231 alarm write failed");
        }
    }
    if let Err(e) = rtc3231.set_alarm_interrupt(Alarm::One, true) {
        info!("Failed to enable alarm interrupt: {:?}", e);
    }

    info!("Entering deep sleep until the alarm pulls INT low");

    let wake_pin = Input::new(peripherals.GPIO27, Default::default());
    let ext0 = Ext0WakeupSource::new(wake_pin, WakeupLevel::Low);
    let mut rtc = Rtc::new(peripherals.LPWR);
    rtc.sleep_deep(&[&ext0]);
}
