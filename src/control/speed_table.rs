// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Speed-level lookup tables: target tick interval and starting PWM per level.

use crate::config::ConfigError;

/// Maps a speed level `0..=max_level` to the tick interval the wheel should show at that speed and
/// to the PWM it starts from before the trim loop takes over.
///
/// Target intervals are strictly decreasing: a faster level always means shorter ticks.
#[derive(Copy, Clone, Debug)]
pub struct SpeedTable {
    target_us: &'static [u32],
    initial_pwm: &'static [u8],
}

impl SpeedTable {
    /// Build a table, checking its shape. Usable in `const` items so a bad table fails the build.
    pub const fn new(
        target_us: &'static [u32],
        initial_pwm: &'static [u8],
    ) -> Result<Self, ConfigError> {
        if target_us.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        if target_us.len() != initial_pwm.len() || target_us.len() > u8::MAX as usize + 1 {
            return Err(ConfigError::LengthMismatch {
                targets: target_us.len(),
                pwms: initial_pwm.len(),
            });
        }

        let mut level = 1;
        while level < target_us.len() {
            if target_us[level] >= target_us[level - 1] {
                return Err(ConfigError::NotDecreasing { level });
            }
            level += 1;
        }

        Ok(Self {
            target_us,
            initial_pwm,
        })
    }

    /// Highest speed level the table covers.
    #[inline]
    pub const fn max_level(&self) -> u8 {
        (self.target_us.len() - 1) as u8
    }

    /// Target tick interval in microseconds for `level`.
    #[inline]
    pub fn target_interval_us(&self, level: u8) -> Option<u32> {
        self.target_us.get(usize::from(level)).copied()
    }

    /// Starting PWM for `level`, before calibration.
    #[inline]
    pub fn initial_pwm(&self, level: u8) -> Option<u8> {
        self.initial_pwm.get(usize::from(level)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SPEED_TABLE;

    #[test]
    fn shipped_table_lookups() {
        assert_eq!(SPEED_TABLE.target_interval_us(1), Some(30_000));
        assert_eq!(SPEED_TABLE.target_interval_us(20), Some(5_300));
        assert_eq!(SPEED_TABLE.initial_pwm(7), Some(120));
        assert_eq!(SPEED_TABLE.target_interval_us(21), None);
    }

    #[test]
    fn rejects_flat_or_rising_targets() {
        static TARGETS: [u32; 4] = [u32::MAX, 2_000, 2_000, 1_000];
        static PWMS: [u8; 4] = [0, 10, 20, 30];
        assert_eq!(
            SpeedTable::new(&TARGETS, &PWMS).err(),
            Some(ConfigError::NotDecreasing { level: 2 })
        );
    }

    #[test]
    fn rejects_mismatched_lengths() {
        static TARGETS: [u32; 3] = [u32::MAX, 2_000, 1_000];
        static PWMS: [u8; 2] = [0, 10];
        assert_eq!(
            SpeedTable::new(&TARGETS, &PWMS).err(),
            Some(ConfigError::LengthMismatch {
                targets: 3,
                pwms: 2
            })
        );
        assert_eq!(
            SpeedTable::new(&[], &[]).err(),
            Some(ConfigError::EmptyTable)
        );
    }
}
