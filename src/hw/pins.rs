// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 wheel controller board.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpiod, Alternate, Floating, Input, OpenDrain, Output, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD);
/// ```
pub struct BoardPins {
    pub left: LeftWheelPins,
    pub right: RightWheelPins,
    pub encoder: EncoderPins,
    pub i2c1: I2c1Pins,
}

/// Left wheel bridge
pub struct LeftWheelPins {
    pub pwm: gpiod::PD12<Alternate<2>>, // TIM4_CH1
    pub in_a: gpioa::PA4<Output<PushPull>>,
    pub in_b: gpioa::PA3<Output<PushPull>>,
}

/// Right wheel bridge
pub struct RightWheelPins {
    pub pwm: gpiod::PD13<Alternate<2>>, // TIM4_CH2
    pub in_a: gpiod::PD2<Output<PushPull>>,
    pub in_b: gpiod::PD1<Output<PushPull>>,
}

/// Encoder edge inputs
pub struct EncoderPins {
    pub left: gpioa::PA0<Input<Floating>>,  // EXTI0
    pub right: gpioa::PA1<Input<Floating>>, // EXTI1
}

/// I2C1 host link
pub struct I2c1Pins {
    pub scl: gpiob::PB8<Alternate<4, OpenDrain>>,
    pub sda: gpiob::PB9<Alternate<4, OpenDrain>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();

        Self {
            left: LeftWheelPins {
                pwm: gpiod.pd12.into_alternate::<2>(),
                in_a: gpioa.pa4.into_push_pull_output(),
                in_b: gpioa.pa3.into_push_pull_output(),
            },

            right: RightWheelPins {
                pwm: gpiod.pd13.into_alternate::<2>(),
                in_a: gpiod.pd2.into_push_pull_output(),
                in_b: gpiod.pd1.into_push_pull_output(),
            },

            encoder: EncoderPins {
                left: gpioa.pa0.into_floating_input(),
                right: gpioa.pa1.into_floating_input(),
            },

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },
        }
    }
}
