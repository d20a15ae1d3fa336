// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Single-slot command hand-off from the bus interrupt to the main loop.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::protocol::messages::Command;

const PENDING: u32 = 1 << 16;

/// One pending command packed into an atomic word: `PENDING | opcode << 8 | payload`.
///
/// Posting overwrites whatever is waiting (last write wins). Taking swaps the slot empty in one
/// atomic operation, so a post racing a take is never half-seen.
pub struct Mailbox {
    slot: AtomicU32,
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Mailbox {
    pub const fn new() -> Self {
        Self {
            slot: AtomicU32::new(0),
        }
    }

    /// Leave `command` for the main loop. Returns true if it replaced one not yet taken.
    #[inline]
    pub fn post(&self, command: Command) -> bool {
        let word = PENDING | (u32::from(command.opcode()) << 8) | u32::from(command.payload());
        self.slot.swap(word, Ordering::Release) & PENDING != 0
    }

    /// Remove and return the pending command, if any.
    #[inline]
    pub fn take(&self) -> Option<Command> {
        let word = self.slot.swap(0, Ordering::Acquire);
        if word & PENDING == 0 {
            return None;
        }
        Command::decode((word >> 8) as u8, word as u8)
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.slot.load(Ordering::Relaxed) & PENDING != 0
    }
}
