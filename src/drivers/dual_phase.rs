// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! H-bridge output stage with one PWM pin and two phase inputs (TB6612FNG style).
//!
//! | Direction | IN_A | IN_B |
//! | --------- | ---- | ---- |
//! | Brake     | LOW  | LOW  |
//! | Forward   | LOW  | HIGH |
//! | Reverse   | HIGH | LOW  |
//!
//! HIGH/HIGH is never produced: on every transition the input being lowered is driven first.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::drivers::wheel_driver::{Direction, DriveError, WheelDriver};

pub struct DualPhasePwm<P, A, B> {
    pwm: P,
    in_a: A,
    in_b: B,
}

impl<P, A, B, E> DualPhasePwm<P, A, B>
where
    P: SetDutyCycle,
    A: OutputPin<Error = E>,
    B: OutputPin<Error = E>,
{
    pub fn new(pwm: P, in_a: A, in_b: B) -> Self {
        Self { pwm, in_a, in_b }
    }

    /// Release the PWM channel and both phase pins.
    pub fn free(self) -> (P, A, B) {
        (self.pwm, self.in_a, self.in_b)
    }
}

impl<P, A, B, E> WheelDriver for DualPhasePwm<P, A, B>
where
    P: SetDutyCycle,
    A: OutputPin<Error = E>,
    B: OutputPin<Error = E>,
{
    type Error = DriveError<P::Error, E>;

    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        match direction {
            Direction::Brake => {
                self.in_a.set_low().map_err(DriveError::Pin)?;
                self.in_b.set_low().map_err(DriveError::Pin)
            }
            Direction::Forward => {
                self.in_a.set_low().map_err(DriveError::Pin)?;
                self.in_b.set_high().map_err(DriveError::Pin)
            }
            Direction::Reverse => {
                self.in_b.set_low().map_err(DriveError::Pin)?;
                self.in_a.set_high().map_err(DriveError::Pin)
            }
        }
    }

    fn set_pwm(&mut self, pwm: u8) -> Result<(), Self::Error> {
        self.pwm
            .set_duty_cycle_fraction(u16::from(pwm), u16::from(u8::MAX))
            .map_err(DriveError::Pwm)
    }
}
