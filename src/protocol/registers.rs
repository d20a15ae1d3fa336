// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Telemetry register block the host reads back.
//!
//! Layout, little-endian:
//!
//! | Offset | Field                   |
//! |--------|-------------------------|
//! | 0      | left direction          |
//! | 1      | left PWM                |
//! | 2..=3  | left tick rate (u16)    |
//! | 4      | right direction         |
//! | 5      | right PWM               |
//! | 6..=7  | right tick rate (u16)   |

use core::sync::atomic::{AtomicU8, Ordering};

use crate::drivers::Direction;

pub const REGISTER_LEN: usize = 8;
const WHEEL_BLOCK_LEN: usize = 4;

pub const DIR_STOP: u8 = 0;
pub const DIR_FORWARD: u8 = 1;
pub const DIR_REVERSE: u8 = 2;

/// Direction register encoding.
pub fn direction_code(direction: Direction) -> u8 {
    match direction {
        Direction::Brake => DIR_STOP,
        Direction::Forward => DIR_FORWARD,
        Direction::Reverse => DIR_REVERSE,
    }
}

/// Inverse of [`direction_code`]. Unknown codes read as brake.
#[cfg(test)]
pub fn direction_from_code(code: u8) -> Direction {
    match code {
        DIR_FORWARD => Direction::Forward,
        DIR_REVERSE => Direction::Reverse,
        _ => Direction::Brake,
    }
}

/// Reported state of one wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WheelTelemetry {
    pub direction: Direction,
    pub pwm: u8,
    /// Encoder ticks per second.
    pub tick_rate: u16,
}

impl WheelTelemetry {
    pub const STOPPED: Self = Self {
        direction: Direction::Brake,
        pwm: 0,
        tick_rate: 0,
    };

    pub fn to_bytes(&self) -> [u8; WHEEL_BLOCK_LEN] {
        let [lo, hi] = self.tick_rate.to_le_bytes();
        [direction_code(self.direction), self.pwm, lo, hi]
    }

    #[cfg(test)]
    pub fn from_bytes(bytes: [u8; WHEEL_BLOCK_LEN]) -> Self {
        Self {
            direction: direction_from_code(bytes[0]),
            pwm: bytes[1],
            tick_rate: u16::from_le_bytes([bytes[2], bytes[3]]),
        }
    }
}

/// Pack both wheels into one register image.
pub fn encode(left: &WheelTelemetry, right: &WheelTelemetry) -> [u8; REGISTER_LEN] {
    let mut out = [0u8; REGISTER_LEN];
    out[..WHEEL_BLOCK_LEN].copy_from_slice(&left.to_bytes());
    out[WHEEL_BLOCK_LEN..].copy_from_slice(&right.to_bytes());
    out
}

/// Split a register image back into (left, right), as the host reads it.
#[cfg(test)]
pub fn decode(bytes: &[u8; REGISTER_LEN]) -> (WheelTelemetry, WheelTelemetry) {
    let left = [bytes[0], bytes[1], bytes[2], bytes[3]];
    let right = [bytes[4], bytes[5], bytes[6], bytes[7]];
    (
        WheelTelemetry::from_bytes(left),
        WheelTelemetry::from_bytes(right),
    )
}

/// The register block itself, shared between the main loop (writer) and bus interrupt (reader).
///
/// Byte-wise atomics only make single bytes tear-free. Callers keep the whole block consistent
/// by storing with the bus interrupt masked.
pub struct RegisterMap {
    bytes: [AtomicU8; REGISTER_LEN],
}

impl Default for RegisterMap {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterMap {
    pub const fn new() -> Self {
        Self {
            bytes: [const { AtomicU8::new(0) }; REGISTER_LEN],
        }
    }

    pub fn store(&self, image: &[u8; REGISTER_LEN]) {
        for (reg, &b) in self.bytes.iter().zip(image) {
            reg.store(b, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> [u8; REGISTER_LEN] {
        let mut out = [0u8; REGISTER_LEN];
        for (b, reg) in out.iter_mut().zip(&self.bytes) {
            *b = reg.load(Ordering::Relaxed);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_little_endian_per_wheel() {
        let left = WheelTelemetry {
            direction: Direction::Forward,
            pwm: 120,
            tick_rate: 0x1234,
        };
        let right = WheelTelemetry {
            direction: Direction::Reverse,
            pwm: 7,
            tick_rate: 300,
        };

        assert_eq!(
            encode(&left, &right),
            [1, 120, 0x34, 0x12, 2, 7, 0x2C, 0x01]
        );
    }

    #[test]
    fn map_starts_zeroed_as_stopped() {
        let map = RegisterMap::new();
        assert_eq!(map.snapshot(), [0; REGISTER_LEN]);
        assert_eq!(
            decode(&map.snapshot()),
            (WheelTelemetry::STOPPED, WheelTelemetry::STOPPED)
        );
    }

    #[test]
    fn stored_image_reads_back() {
        let map = RegisterMap::new();
        let image = [2, 255, 0xFF, 0xFF, 0, 0, 1, 0];
        map.store(&image);
        assert_eq!(map.snapshot(), image);
    }

    #[test]
    fn unknown_direction_code_reads_as_brake() {
        assert_eq!(direction_from_code(9), Direction::Brake);
        for d in [Direction::Forward, Direction::Reverse, Direction::Brake] {
            assert_eq!(direction_from_code(direction_code(d)), d);
        }
    }
}
