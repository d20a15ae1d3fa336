// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Common interface for a wheel's motor output stage.

/// Logical drive direction of one wheel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Reverse,
    /// Stopped with the bridge shorting the motor.
    Brake,
}

impl Direction {
    /// Direction implied by a signed speed; zero brakes.
    #[inline]
    pub fn from_speed(speed: i16) -> Self {
        match speed {
            s if s > 0 => Direction::Forward,
            s if s < 0 => Direction::Reverse,
            _ => Direction::Brake,
        }
    }

    /// True if switching from `self` to `next` flips the motor's polarity.
    #[inline]
    pub fn opposes(self, next: Direction) -> bool {
        matches!(
            (self, next),
            (Direction::Forward, Direction::Reverse) | (Direction::Reverse, Direction::Forward)
        )
    }
}

/// Error from an output stage built out of a PWM channel and GPIO pins.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DriveError<PwmE, PinE> {
    Pwm(PwmE),
    Pin(PinE),
}

/// Physical output of one wheel.
///
/// The speed controller only talks to this trait, so it behaves identically whichever wiring is
/// installed. Implementations never drive both bridge halves high at once.
pub trait WheelDriver {
    type Error;

    /// Set the bridge polarity. [`Direction::Brake`] shorts the motor.
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;

    /// Set the drive strength, 0 (off) to 255 (full).
    fn set_pwm(&mut self, pwm: u8) -> Result<(), Self::Error>;

    /// Remove drive and short the motor.
    fn brake(&mut self) -> Result<(), Self::Error> {
        self.set_pwm(0)?;
        self.set_direction(Direction::Brake)
    }
}
