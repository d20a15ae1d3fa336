// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # STM32F777 bindings
//!
//! MCU-level wrappers the firmware binary wires the library to. Everything here touches
//! peripheral registers and only builds with the `firmware` feature.

pub mod clock;
pub mod exti;
pub mod gpio;
pub mod i2c_slave;
pub mod nvic;
pub mod pins;
pub mod pwm;

pub use clock::{BusyDelay, Clock};
pub use exti::EncoderEdges;
pub use gpio::PushPullPin;
pub use i2c_slave::I2cSlave;
pub use nvic::NvicGate;
pub use pins::BoardPins;
pub use pwm::{PwmChannel, Tim4Pwm};
