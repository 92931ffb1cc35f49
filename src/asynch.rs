//! Async twin of the DS3231 driver, over `embedded-hal-async`.
//!
//! Only available with the `async` feature. The operation set, transaction
//! framing and error behaviour are identical to the blocking driver; the
//! await points sit at the bus transactions and nothing else changes in the
//! sequencing contract (the address phase still strictly precedes the data
//! phase of every transfer).
//!
//! # Example
//!
//! ```rust,ignore
//! use ds3231_rtc::asynch::Ds3231;
//!
//! let mut rtc = Ds3231::new(i2c, ds3231_rtc::DEVICE_ADDRESS);
//! let now = rtc.time().await?;
//! ```

use embedded_hal_async::i2c::I2c;
use paste::paste;

use crate::alarm::{Alarm1Registers, Alarm2Registers};
use crate::timestamp::ClockRegisters;
use crate::{
    AgingOffset, Alarm, Alarm1Spec, Alarm2Spec, AlarmDayDate, AlarmHours, AlarmMinutes,
    AlarmSeconds, Config, Control, Date, Day, Error, Hours, Minutes, Month, RegAddr, Seconds,
    Status, Temperature, TemperatureFraction, Timestamp, Year,
};

/// DS3231 driver over an async I2C bus.
///
/// See the blocking [`Ds3231`](crate::Ds3231) for the full operation
/// semantics; this type only changes how the calling task waits.
pub struct Ds3231<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Ds3231<I2C> {
    /// Creates a driver instance for the device at `address`.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Consumes the driver and releases the bus handle.
    #[must_use]
    pub fn release(self) -> I2C {
        self.i2c
    }

    async fn read_registers(
        &mut self,
        reg: RegAddr,
        buf: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        self.i2c.write_read(self.address, &[reg as u8], buf).await?;
        Ok(())
    }

    async fn write_registers(&mut self, frame: &[u8]) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(self.address, frame).await?;
        Ok(())
    }

    async fn modify_register<F>(&mut self, reg: RegAddr, mutate: F) -> Result<(), Error<I2C::Error>>
    where
        F: FnOnce(u8) -> u8,
    {
        let mut data = [0];
        self.read_registers(reg, &mut data).await?;
        self.write_registers(&[reg as u8, mutate(data[0])]).await
    }

    /// Programs the control register from `config`, preserving the alarm
    /// interrupt-enable bits.
    pub async fn configure(&mut self, config: &Config) -> Result<(), Error<I2C::Error>> {
        let mut control = self.control().await?;
        control.set_oscillator_enable(config.oscillator_enable);
        control.set_battery_backed_square_wave(config.battery_backed_square_wave);
        control.set_square_wave_frequency(config.square_wave_frequency);
        control.set_interrupt_control(config.interrupt_control);
        self.set_control(control).await
    }

    /// Reads the current time: one 7-byte read of the time block, decoded.
    pub async fn time(&mut self) -> Result<Timestamp, Error<I2C::Error>> {
        let mut data = [0; 7];
        self.read_registers(RegAddr::Seconds, &mut data).await?;
        Ok(ClockRegisters::from(data).into_timestamp())
    }

    /// Sets the time: one 8-byte write (address plus the encoded block).
    pub async fn set_time(&mut self, timestamp: &Timestamp) -> Result<(), Error<I2C::Error>> {
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
        .await
    }

    /// Programs the Alarm 1 register block in a single write.
    pub async fn set_alarm1(&mut self, spec: &Alarm1Spec) -> Result<(), Error<I2C::Error>> {
        let data: [u8; 4] = (&Alarm1Registers::from_spec(spec)).into();
        self.write_registers(&[
            RegAddr::Alarm1Seconds as u8,
            data[0],
            data[1],
            data[2],
            data[3],
        ])
        .await
    }

    /// Programs the Alarm 2 register block in a single write.
    pub async fn set_alarm2(&mut self, spec: &Alarm2Spec) -> Result<(), Error<I2C::Error>> {
        let data: [u8; 3] = (&Alarm2Registers::from_spec(spec)).into();
        self.write_registers(&[RegAddr::Alarm2Minutes as u8, data[0], data[1], data[2]])
            .await
    }

    /// Enables or disables the alarm interrupt for one channel by
    /// read-modify-write on the control register.
    pub async fn set_alarm_interrupt(
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
        .await
    }

    /// Clears one channel's fired flag by read-modify-write on the status
    /// register; every other status bit is written back unchanged.
    pub async fn clear_alarm_flag(&mut self, alarm: Alarm) -> Result<(), Error<I2C::Error>> {
        self.modify_register(RegAddr::Status, |raw| {
            let mut status = Status::from(raw);
            match alarm {
                Alarm::One => status.set_alarm1_flag(false),
                Alarm::Two => status.set_alarm2_flag(false),
            }
            status.into()
        })
        .await
    }

    /// Returns whether one channel's fired flag is set, from a single
    /// status read.
    pub async fn alarm_fired(&mut self, alarm: Alarm) -> Result<bool, Error<I2C::Error>> {
        let status = self.status().await?;
        Ok(match alarm {
            Alarm::One => status.alarm1_flag(),
            Alarm::Two => status.alarm2_flag(),
        })
    }
}

// Single-register get/set pairs, mirroring the blocking driver's.
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        impl<I2C: I2c> Ds3231<I2C> {
            $(
                paste! {
                    #[doc = concat!("Reads the ", stringify!($name), " register.")]
                    pub async fn $name(&mut self) -> Result<$typ, Error<I2C::Error>> {
                        let mut data = [0];
                        self.read_registers($regaddr, &mut data).await?;
                        Ok(<$typ>::from(data[0]))
                    }

                    #[doc = concat!("Writes the ", stringify!($name), " register.")]
                    pub async fn [<set_ $name>](&mut self, value: $typ) -> Result<(), Error<I2C::Error>> {
                        self.write_registers(&[$regaddr as u8, value.into()]).await
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
