// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Push-pull output pin exposed through `embedded-hal` 1.0.
//!
//! The pin is type-erased so both wheels' phase pins share one type regardless of port.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use stm32f7xx_hal::gpio::{self, ErasedPin, Output, PinState, PushPull};

pub struct PushPullPin {
    pin: ErasedPin<Output<PushPull>>,
}

impl PushPullPin {
    /// Configure `pin` as a push-pull output, starting low.
    pub fn new<const P: char, const N: u8, MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        let mut pin = pin.into_push_pull_output();
        pin.set_state(PinState::Low);
        Self { pin: pin.erase() }
    }

    pub fn free(self) -> ErasedPin<Output<PushPull>> {
        self.pin
    }
}

impl ErrorType for PushPullPin {
    type Error = Infallible;
}

impl OutputPin for PushPullPin {
    #[inline]
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.pin.set_low();
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.pin.set_high();
        Ok(())
    }
}
