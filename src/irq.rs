// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Interrupt masking for state shared between an interrupt handler and the main loop.
//!
//! Every multi-word read of interrupt-written state (tick ring, register map) goes through an
//! [`InterruptGate`]. A gate masks exactly one interrupt source, never interrupts globally, so
//! unrelated peripherals keep being serviced while the main loop reads.

/// Holds one interrupt source off for the duration of a closure.
pub trait InterruptGate {
    /// Run `f` with this gate's interrupt source masked, then restore the source to the state it
    /// was in before the call. Nesting is allowed.
    fn masked<R>(&self, f: impl FnOnce() -> R) -> R;
}

impl<G: InterruptGate> InterruptGate for &G {
    #[inline]
    fn masked<R>(&self, f: impl FnOnce() -> R) -> R {
        (**self).masked(f)
    }
}
