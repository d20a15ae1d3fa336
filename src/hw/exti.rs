// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Encoder edge interrupts on EXTI lines 0 and 1.
//!
//! PA0 (left encoder) feeds EXTI0 and PA1 (right encoder) feeds EXTI1. Both edges trigger.

use stm32f7xx_hal::{
    gpio::{gpioa, Floating, Input},
    pac,
};

/// EXTI line of the left encoder.
pub const LEFT_LINE: u8 = 0;
/// EXTI line of the right encoder.
pub const RIGHT_LINE: u8 = 1;

pub struct EncoderEdges {
    exti: pac::EXTI,
    _pins: (gpioa::PA0<Input<Floating>>, gpioa::PA1<Input<Floating>>),
}

impl EncoderEdges {
    pub fn new(
        exti: pac::EXTI,
        syscfg: pac::SYSCFG,
        pins: (gpioa::PA0<Input<Floating>>, gpioa::PA1<Input<Floating>>),
    ) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.syscfgen().set_bit());

        // EXTI0/EXTI1 source = port A
        syscfg
            .exticr1
            .modify(|r, w| unsafe { w.bits(r.bits() & !0xFF) });

        let mask = (1 << LEFT_LINE) | (1 << RIGHT_LINE);
        exti.rtsr.modify(|r, w| unsafe { w.bits(r.bits() | mask) });
        exti.ftsr.modify(|r, w| unsafe { w.bits(r.bits() | mask) });
        exti.pr.write(|w| unsafe { w.bits(mask) });
        exti.imr.modify(|r, w| unsafe { w.bits(r.bits() | mask) });

        Self { exti, _pins: pins }
    }

    pub fn free(self) -> pac::EXTI {
        self.exti
    }
}

/// Acknowledge a pending edge on `line`. Call first thing in the line's handler.
#[inline]
pub fn clear(line: u8) {
    let exti = unsafe { &*pac::EXTI::ptr() };
    // PR is write-1-to-clear
    exti.pr.write(|w| unsafe { w.bits(1 << line) });
}
