// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Time bases: TIM5 as a free-running 1 MHz microsecond counter and SysTick as a 1 kHz
//! millisecond counter.
//!
//! Both counters are 32 bits wide and wrap; consumers compare them with wrapping arithmetic.

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::{syst::SystClkSource, SYST};
use embedded_hal::delay::DelayNs;
use stm32f7xx_hal::pac;

use crate::config::TIMER_CLOCK_HZ;

static MILLIS: AtomicU32 = AtomicU32::new(0);

/// Owns the timers backing [`micros`] and [`millis`].
pub struct Clock {
    tim: pac::TIM5,
    syst: SYST,
}

impl Clock {
    pub fn start(tim5: pac::TIM5, mut syst: SYST) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim5en().set_bit());

        let tim = tim5;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // 1 tick per microsecond, full 32-bit range
        tim.psc
            .write(|w| unsafe { w.bits(TIMER_CLOCK_HZ / 1_000_000 - 1) });
        tim.arr.write(|w| unsafe { w.bits(0xFFFF_FFFF) });
        tim.egr.write(|w| w.ug().set_bit());
        tim.cnt.write(|w| unsafe { w.bits(0) });
        tim.cr1.modify(|_, w| w.cen().set_bit());

        // SysTick at 1 kHz off the core clock (HSI, same as the timer clock)
        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(TIMER_CLOCK_HZ / 1_000 - 1);
        syst.clear_current();
        syst.enable_interrupt();
        syst.enable_counter();

        Self { tim, syst }
    }

    pub fn free(self) -> (pac::TIM5, SYST) {
        (self.tim, self.syst)
    }
}

/// Microseconds since [`Clock::start`], wrapping. Safe to call from any context.
#[inline]
pub fn micros() -> u32 {
    let tim = unsafe { &*pac::TIM5::ptr() };
    tim.cnt.read().bits()
}

/// Milliseconds since [`Clock::start`], wrapping.
#[inline]
pub fn millis() -> u32 {
    MILLIS.load(Ordering::Relaxed)
}

/// Advance the millisecond counter. Call from the SysTick handler only.
#[inline]
pub fn on_systick() {
    MILLIS.fetch_add(1, Ordering::Relaxed);
}

/// Blocking delay that spins on the microsecond counter.
#[derive(Default)]
pub struct BusyDelay;

impl DelayNs for BusyDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        let start = micros();
        while micros().wrapping_sub(start) < us {
            cortex_m::asm::nop();
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1_000);
        }
    }
}
