// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Encoder tick interval sampling.
//!
//! The encoder interrupt calls [`TickSampler::tick`] on every edge, which records the time since the
//! previous edge into a small ring. The main loop reads the ring's average through
//! [`TickSampler::average_interval`], masking only this wheel's encoder interrupt while it sums.
//!
//! ```ignore
//! static LEFT_TICKS: TickSampler<NvicGate> = TickSampler::new(NvicGate::new(Interrupt::EXTI0));
//!
//! #[interrupt]
//! fn EXTI0() {
//!     LEFT_TICKS.tick(clock::micros());
//! }
//! ```

use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::irq::InterruptGate;

/// Number of intervals averaged.
pub const TICK_BUFFER_LEN: usize = 5;

/// Ring of the most recent inter-tick intervals for one wheel.
///
/// Single writer (the encoder interrupt), single reader (the main loop). The slots are atomics so
/// the sampler can live in a `static`; whole-ring consistency comes from the gate, not from the
/// atomics.
pub struct TickSampler<G> {
    intervals: [AtomicU32; TICK_BUFFER_LEN],
    next: AtomicUsize,
    last_tick_us: AtomicU32,
    gate: G,
}

impl<G> TickSampler<G> {
    /// Create an empty sampler. `gate` must mask the interrupt that calls [`tick`](Self::tick).
    pub const fn new(gate: G) -> Self {
        Self {
            intervals: [const { AtomicU32::new(0) }; TICK_BUFFER_LEN],
            next: AtomicUsize::new(0),
            last_tick_us: AtomicU32::new(0),
            gate,
        }
    }

    /// Record one encoder edge seen at `now_us`. Interrupt context only.
    ///
    /// O(1) and lock-free; must not log or touch the bus interface.
    #[inline]
    pub fn tick(&self, now_us: u32) {
        let delta = now_us.wrapping_sub(self.last_tick_us.load(Ordering::Relaxed));
        let slot = self.next.load(Ordering::Relaxed) % TICK_BUFFER_LEN;

        self.intervals[slot].store(delta, Ordering::Relaxed);
        self.next.store((slot + 1) % TICK_BUFFER_LEN, Ordering::Relaxed);
        self.last_tick_us.store(now_us, Ordering::Relaxed);
    }
}

impl<G: InterruptGate> TickSampler<G> {
    /// Mean of the ring in microseconds, or 0 if the wheel has not ticked since reset.
    ///
    /// Unfilled slots count as zero, so the first few ticks after reset under-report. 0 means
    /// "no data", never "very fast".
    pub fn average_interval(&self) -> u32 {
        let total: u64 = self.gate.masked(|| {
            self.intervals
                .iter()
                .map(|slot| u64::from(slot.load(Ordering::Relaxed)))
                .sum()
        });

        (total / TICK_BUFFER_LEN as u64) as u32
    }

    /// Tick rate in ticks per second derived from the average interval, saturated to `u16`.
    pub fn tick_rate(&self) -> u16 {
        match self.average_interval() {
            0 => 0,
            avg => u16::try_from(1_000_000 / avg).unwrap_or(u16::MAX),
        }
    }

    /// Forget all recorded intervals.
    pub fn reset(&self) {
        self.gate.masked(|| {
            for slot in &self.intervals {
                slot.store(0, Ordering::Relaxed);
            }
            self.next.store(0, Ordering::Relaxed);
            self.last_tick_us.store(0, Ordering::Relaxed);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingGate;

    fn feed(sampler: &TickSampler<CountingGate>, start_us: u32, interval_us: u32, count: u32) {
        for i in 1..=count {
            sampler.tick(start_us.wrapping_add(interval_us * i));
        }
    }

    #[test]
    fn no_ticks_reads_as_no_data() {
        let sampler = TickSampler::new(CountingGate::default());
        assert_eq!(sampler.average_interval(), 0);
        assert_eq!(sampler.tick_rate(), 0);
    }

    #[test]
    fn partial_ring_counts_empty_slots_as_zero() {
        for k in 0..TICK_BUFFER_LEN as u32 {
            let sampler = TickSampler::new(CountingGate::default());
            feed(&sampler, 0, 1_000, k);
            assert_eq!(sampler.average_interval(), k * 1_000 / 5, "after {k} ticks");
        }
    }

    #[test]
    fn full_ring_of_equal_intervals() {
        let sampler = TickSampler::new(CountingGate::default());
        feed(&sampler, 0, 1_000, 5);
        assert_eq!(sampler.average_interval(), 1_000);
        assert_eq!(sampler.tick_rate(), 1_000);
    }

    #[test]
    fn ring_keeps_only_most_recent_intervals() {
        let sampler = TickSampler::new(CountingGate::default());
        feed(&sampler, 0, 9_000, 7);
        feed(&sampler, 63_000, 2_000, 5);
        assert_eq!(sampler.average_interval(), 2_000);
    }

    #[test]
    fn interval_survives_microsecond_rollover() {
        let sampler = TickSampler::new(CountingGate::default());
        let start = u32::MAX - 2_499;
        sampler.tick(start);
        feed(&sampler, start, 1_000, 5);
        assert_eq!(sampler.average_interval(), 1_000);
    }

    #[test]
    fn average_reads_under_the_gate() {
        let sampler = TickSampler::new(CountingGate::default());
        feed(&sampler, 0, 500, 3);
        assert_eq!(sampler.gate.entries(), 0);
        let _ = sampler.average_interval();
        assert_eq!(sampler.gate.entries(), 1);
        assert!(!sampler.gate.is_masked());
    }

    #[test]
    fn fast_wheel_saturates_tick_rate() {
        let sampler = TickSampler::new(CountingGate::default());
        feed(&sampler, 0, 10, 5);
        assert_eq!(sampler.tick_rate(), u16::MAX);
    }

    #[test]
    fn reset_forgets_history() {
        let sampler = TickSampler::new(CountingGate::default());
        feed(&sampler, 0, 1_000, 5);
        sampler.reset();
        assert_eq!(sampler.average_interval(), 0);

        sampler.tick(700);
        assert_eq!(sampler.average_interval(), 140);
    }
}
