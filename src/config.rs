// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Compile-time configuration for the wheel controllers and the host link.
//!
//! The speed tables are checked when the crate is compiled: a table that is not strictly
//! decreasing fails the build instead of misbehaving on the robot.

use crate::control::SpeedTable;

/// 7-bit I2C slave address the host talks to.
pub const I2C_ADDRESS: u8 = 0x22;

/// Timer kernel clock with the default HSI configuration.
pub const TIMER_CLOCK_HZ: u32 = 16_000_000;

/// Motor PWM carrier frequency.
pub const PWM_FREQUENCY_HZ: u32 = 1_000;

/// Highest speed level accepted in either direction.
pub const MAX_SPEED: u8 = 20;

/// Minimum spacing between two PWM trims of the same wheel.
pub const ADJUST_DELAY_MS: u32 = 200;

/// PWM-off hold before a wheel is allowed to change direction.
pub const SETTLE_DELAY_MS: u32 = 200;

/// Expected tick interval (µs) for each speed level. Level 0 has no finite interval.
const TARGET_TICK_US: [u32; 21] = [
    u32::MAX, 30_000, 25_000, 20_000, 17_500, 15_250, 13_000, 11_500, 10_500, 9_500, //
    8_800, 8_000, 7_500, 7_000, 6_700, 6_400, 6_200, 6_000, 5_750, 5_500, //
    5_300,
];

/// Open-loop starting PWM for each speed level, before per-motor calibration.
const INITIAL_PWM: [u8; 21] = [
    0, 60, 70, 80, 90, 100, 110, 120, 130, 140, //
    150, 160, 170, 180, 190, 200, 210, 220, 230, 240, //
    250,
];

/// Speed table shared by both wheels.
pub const SPEED_TABLE: SpeedTable = match SpeedTable::new(&TARGET_TICK_US, &INITIAL_PWM) {
    Ok(table) => table,
    Err(_) => panic!("speed table must be strictly decreasing and evenly sized"),
};

/// Left wheel tuning.
pub const LEFT_WHEEL: WheelConfig = WheelConfig {
    calibration_offset: 0,
    ..WheelConfig::DEFAULT
};

/// Right wheel tuning. Bench value, retune per chassis.
pub const RIGHT_WHEEL: WheelConfig = WheelConfig {
    calibration_offset: 5,
    ..WheelConfig::DEFAULT
};

/// Rejected configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The table has no levels at all.
    EmptyTable,
    /// Target and initial-PWM tables differ in length.
    LengthMismatch { targets: usize, pwms: usize },
    /// Target interval at `level` is not shorter than the one below it.
    NotDecreasing { level: usize },
    /// A speed bound exceeds the highest level in the table.
    SpeedOutOfRange { bound: u8, max_level: u8 },
}

/// Per-wheel controller parameters.
#[derive(Copy, Clone, Debug)]
pub struct WheelConfig {
    /// Highest forward speed level.
    pub max_forward: u8,
    /// Highest reverse speed level (magnitude).
    pub max_reverse: u8,
    /// Minimum time between PWM trims.
    pub adjust_delay_ms: u32,
    /// PWM-off hold before a direction change.
    pub settle_delay_ms: u32,
    /// Added to the table's initial PWM to even out motor-to-motor variance.
    pub calibration_offset: i16,
    pub table: &'static SpeedTable,
}

impl WheelConfig {
    pub const DEFAULT: Self = Self {
        max_forward: MAX_SPEED,
        max_reverse: MAX_SPEED,
        adjust_delay_ms: ADJUST_DELAY_MS,
        settle_delay_ms: SETTLE_DELAY_MS,
        calibration_offset: 0,
        table: &SPEED_TABLE,
    };

    /// Check that both speed bounds are covered by the table.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        let max_level = self.table.max_level();
        if self.max_forward > max_level {
            return Err(ConfigError::SpeedOutOfRange {
                bound: self.max_forward,
                max_level,
            });
        }
        if self.max_reverse > max_level {
            return Err(ConfigError::SpeedOutOfRange {
                bound: self.max_reverse,
                max_level,
            });
        }
        Ok(())
    }
}
