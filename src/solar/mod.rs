//! Daily solar geometry used to disaggregate daily weather.
//!
//! Declination and half-day angle follow the simple sinusoidal form used by the SHAW model,
//! which is what the hourly temperature and radiation shapes were calibrated against.

use std::f64::consts::PI;

/// Solar constant [W/m2]
pub const SOLAR_CONSTANT: f64 = 1360.0;

/// Earth's rotation [rad/h]
pub const HOUR_ANGLE_RATE: f64 = 0.261799;

/// Whether the sun rises and sets on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Daylight {
    Normal,
    /// Sun never rises (winter inside the polar circle)
    PolarNight,
    /// Sun never sets (summer inside the polar circle)
    MidnightSun,
}

/// Result struct containing the sun's geometry for one day
#[derive(Debug, Clone, Copy)]
pub struct SolarGeometry {
    pub latitude: f64,          // Latitude [rad]
    pub declination: f64,       // Declination [rad]
    pub half_day_angle: f64,    // Hour angle from noon to sunset [rad]
    pub solar_noon: f64,        // Clock hour of solar noon [h]
    pub sunrise: f64,           // Clock hour of sunrise [h]
    pub sunset: f64,            // Clock hour of sunset [h]
    pub day_length: f64,        // [h]
    pub max_daily_solar: f64,   // Daily mean extraterrestrial radiation on a horizontal surface [W/m2]
    pub daylight: Daylight,
}

impl SolarGeometry {
    /// Calculate the day's solar geometry
    ///
    /// # Arguments
    /// * `julian` - Julian day of year (1-365/366)
    /// * `latitude` - Latitude in radians
    /// * `solar_noon` - Clock hour of solar noon
    pub fn calculate(julian: u32, latitude: f64, solar_noon: f64) -> Self {
        let declination = 0.4102 * (2.0 * PI * (julian as f64 - 80.0) / 365.0).sin();

        let cos_half_day = -latitude.tan() * declination.tan();
        let (half_day_angle, daylight) = if cos_half_day >= 1.0 {
            (0.0, Daylight::PolarNight)
        } else if cos_half_day <= -1.0 {
            (PI, Daylight::MidnightSun)
        } else {
            (cos_half_day.acos(), Daylight::Normal)
        };

        let max_daily_solar = SOLAR_CONSTANT
            * (half_day_angle * latitude.sin() * declination.sin()
                + latitude.cos() * declination.cos() * half_day_angle.sin())
            / PI;

        let sunrise = solar_noon - half_day_angle / HOUR_ANGLE_RATE;
        let sunset = solar_noon + half_day_angle / HOUR_ANGLE_RATE;

        SolarGeometry {
            latitude,
            declination,
            half_day_angle,
            solar_noon,
            sunrise,
            sunset,
            day_length: sunset - sunrise,
            max_daily_solar,
            daylight,
        }
    }

    /// Sun altitude [rad] at a clock hour
    pub fn altitude(&self, hour: f64) -> f64 {
        let hour_angle = HOUR_ANGLE_RATE * (hour - self.solar_noon);
        (self.latitude.sin() * self.declination.sin()
            + self.latitude.cos() * self.declination.cos() * hour_angle.cos())
        .asin()
    }

    /// Representative time for the hour ending at `hour`: its mid-point, or the mid-point of the
    /// sunlit part when the sun rises or sets during the hour.
    pub fn representative_time(&self, hour: u8) -> f64 {
        let end = hour as f64;
        let start = end - 1.0;
        if end > self.sunrise && start < self.sunrise {
            (self.sunrise + end) / 2.0
        } else if end > self.sunset && start < self.sunset {
            self.sunset - (self.sunset - start) / 2.0
        } else {
            end - 0.5
        }
    }

    /// Clear-sky radiation [W/m2] for the 24 hours ending at 1..=24, before scaling by the day's
    /// atmospheric transmissivity. Transmissivity varies with time of day: 1.1 at noon, 0.624 at
    /// the ends of the day. All zero when the sun does not rise.
    pub fn clear_sky_curve(&self) -> [f64; 24] {
        let mut curve = [0.0; 24];
        if self.day_length <= 0.0 {
            return curve;
        }
        for (i, value) in curve.iter_mut().enumerate() {
            let time = self.representative_time(i as u8 + 1);
            let altitude = self.altitude(time);
            if altitude > 0.0 {
                let factor =
                    0.624 + 0.476 * ((time - self.solar_noon) * PI / self.day_length).cos();
                *value = factor * SOLAR_CONSTANT * altitude.sin();
            }
        }
        curve
    }
}
