// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! Closed-loop wheel speed control.
//!
//! ## Modules
//!
//! - [`tick_sampler`] - Interrupt-fed ring of encoder tick intervals.
//! - [`speed_table`] - Per-level target tick interval and starting PWM.
//! - [`speed_controller`] - ±1 PWM trim loop for one wheel.
//! - [`drive_train`] - Both wheels plus host command dispatch.

pub mod drive_train;
pub mod speed_controller;
pub mod speed_table;
pub mod tick_sampler;

pub use drive_train::DriveTrain;
pub use speed_controller::{Adjustment, DriveMode, SetupError, SpeedController, WheelState};
pub use speed_table::SpeedTable;
pub use tick_sampler::{TickSampler, TICK_BUFFER_LEN};
