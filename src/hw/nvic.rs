// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Per-IRQ masking through the NVIC.

use core::sync::atomic::{compiler_fence, Ordering};

use cortex_m::peripheral::NVIC;
use stm32f7xx_hal::pac::Interrupt;

use crate::irq::InterruptGate;

/// Masks a single interrupt line while the main loop reads state that line's handler writes.
#[derive(Copy, Clone)]
pub struct NvicGate {
    irq: Interrupt,
}

impl NvicGate {
    pub const fn new(irq: Interrupt) -> Self {
        Self { irq }
    }

    /// Enable the line. Call once after the handler's shared state is in place.
    pub fn unmask(&self) {
        unsafe { NVIC::unmask(self.irq) };
    }
}

impl InterruptGate for NvicGate {
    fn masked<R>(&self, f: impl FnOnce() -> R) -> R {
        let was_enabled = NVIC::is_enabled(self.irq);
        NVIC::mask(self.irq);
        // Make sure the mask has taken effect before touching shared state.
        cortex_m::asm::dsb();
        cortex_m::asm::isb();
        compiler_fence(Ordering::SeqCst);

        let out = f();

        compiler_fence(Ordering::SeqCst);
        if was_enabled {
            unsafe { NVIC::unmask(self.irq) };
        }
        out
    }
}
