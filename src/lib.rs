// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # runtbot Firmware
//!
//! Wheel speed control and host link for a two-wheeled differential-drive robot, written in Rust,
//! targeting an STM32F777 MCU.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`control`] | Tick sampling, speed regulation, drive train |
//! | [`drivers`] | Wheel output stages (phase/enable, dual-phase H-bridge) |
//! | [`protocol`] | Host command set, parser, mailbox, telemetry registers |
//! | [`config`] | Speed tables, delays, calibration, bus address |
//! | [`irq`] | Per-interrupt masking for shared state |
//! | `hw` | MCU-level wrappers (timers, EXTI, I2C slave), `firmware` feature only |
//!
//! ## Getting Started
//!
//! Run the unit tests on the host:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features firmware --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod control;
pub mod drivers;
pub mod irq;
pub mod protocol;

#[cfg(feature = "firmware")]
pub mod hw;

#[cfg(test)]
mod testing;

pub use irq::InterruptGate;
