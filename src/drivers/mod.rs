// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Wheel Output Drivers
//!
//! Motor output stages that sit above the raw `hw/` layer and below the speed controller. Both
//! implement [`WheelDriver`] over `embedded-hal` pins and PWM channels.
//!
//! ## Existing drivers
//!
//! - [`single_pin`] – one PWM (enable) pin and one direction (phase) pin
//! - [`dual_phase`] – one PWM pin and two H-bridge phase inputs

pub mod wheel_driver;

pub mod dual_phase;
pub mod single_pin;

pub use dual_phase::DualPhasePwm;
pub use single_pin::SinglePinPwm;
pub use wheel_driver::{Direction, DriveError, WheelDriver};
