// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Phase/enable output stage: one PWM (enable) pin and one direction (phase) pin.
//!
//! Matches drivers like the DRV8835 in PHASE/ENABLE mode:
//!
//! | Direction | PHASE | ENABLE |
//! | --------- | ----- | ------ |
//! | Forward   | LOW   | PWM    |
//! | Reverse   | HIGH  | PWM    |
//! | Brake     | -     | 0      |

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::drivers::wheel_driver::{Direction, DriveError, WheelDriver};

pub struct SinglePinPwm<P, D> {
    pwm: P,
    phase: D,
}

impl<P, D> SinglePinPwm<P, D>
where
    P: SetDutyCycle,
    D: OutputPin,
{
    pub fn new(pwm: P, phase: D) -> Self {
        Self { pwm, phase }
    }

    /// Release the PWM channel and phase pin.
    pub fn free(self) -> (P, D) {
        (self.pwm, self.phase)
    }
}

impl<P, D> WheelDriver for SinglePinPwm<P, D>
where
    P: SetDutyCycle,
    D: OutputPin,
{
    type Error = DriveError<P::Error, D::Error>;

    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        match direction {
            Direction::Forward => self.phase.set_low().map_err(DriveError::Pin),
            Direction::Reverse => self.phase.set_high().map_err(DriveError::Pin),
            // No dedicated brake state; cutting the enable line lets the driver brake low-side.
            Direction::Brake => self.pwm.set_duty_cycle_fully_off().map_err(DriveError::Pwm),
        }
    }

    fn set_pwm(&mut self, pwm: u8) -> Result<(), Self::Error> {
        self.pwm
            .set_duty_cycle_fraction(u16::from(pwm), u16::from(u8::MAX))
            .map_err(DriveError::Pwm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Bench, PHASE_A};

    #[test]
    fn phase_pin_follows_direction() {
        let bench = Bench::default();
        let mut driver = SinglePinPwm::new(bench.pwm(), bench.pin(PHASE_A));

        driver.set_direction(Direction::Reverse).unwrap();
        assert!(bench.level(PHASE_A));

        driver.set_direction(Direction::Forward).unwrap();
        assert!(!bench.level(PHASE_A));
    }

    #[test]
    fn pwm_maps_onto_full_duty_range() {
        let bench = Bench::default();
        let mut driver = SinglePinPwm::new(bench.pwm(), bench.pin(PHASE_A));

        driver.set_pwm(255).unwrap();
        assert_eq!(bench.duty(), bench.max_duty());

        driver.set_pwm(0).unwrap();
        assert_eq!(bench.duty(), 0);
    }

    #[test]
    fn brake_cuts_enable() {
        let bench = Bench::default();
        let mut driver = SinglePinPwm::new(bench.pwm(), bench.pin(PHASE_A));

        driver.set_pwm(180).unwrap();
        driver.brake().unwrap();
        assert_eq!(bench.duty(), 0);
    }
}
