// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! The host-facing command and telemetry block.
//!
//! One [`CommandInterface`] lives in a `static` and is shared by the bus interrupt and the main
//! loop. The interrupt side only posts decoded commands and copies out register snapshots; the
//! main loop drains commands and publishes telemetry. Wheel state is never touched from the
//! interrupt.

use crate::irq::InterruptGate;
use crate::protocol::mailbox::Mailbox;
use crate::protocol::messages::{Command, Tune};
use crate::protocol::parser::Parser;
use crate::protocol::registers::{self, RegisterMap, WheelTelemetry, REGISTER_LEN};

pub struct CommandInterface<G> {
    registers: RegisterMap,
    motion: Mailbox,
    tune: Mailbox,
    /// Masks the bus interrupt.
    gate: G,
}

impl<G> CommandInterface<G> {
    pub const fn new(gate: G) -> Self {
        Self {
            registers: RegisterMap::new(),
            motion: Mailbox::new(),
            tune: Mailbox::new(),
            gate,
        }
    }

    // ---- bus interrupt side ----

    /// Queue a decoded command. Tunes go to their own slot so they never displace motion.
    #[inline]
    pub fn post(&self, command: Command) {
        match command {
            Command::Play(_) => self.tune.post(command),
            _ => self.motion.post(command),
        };
    }

    /// Feed one received byte through `parser`, posting any command it completes.
    #[inline]
    pub fn receive(&self, parser: &mut Parser, byte: u8) {
        if let Some(command) = parser.push(byte) {
            self.post(command);
        }
    }

    /// Copy of the register block for a host read. Called from the bus interrupt, which the main
    /// loop cannot preempt, so no masking is needed here.
    #[inline]
    pub fn snapshot(&self) -> [u8; REGISTER_LEN] {
        self.registers.snapshot()
    }

    // ---- main loop side ----

    pub fn take_command(&self) -> Option<Command> {
        self.motion.take()
    }

    pub fn take_tune(&self) -> Option<Tune> {
        match self.tune.take() {
            Some(Command::Play(tune)) => Some(tune),
            _ => None,
        }
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }
}

impl<G: InterruptGate> CommandInterface<G> {
    /// Refresh both wheel blocks with the bus interrupt masked, so a host read sees either the
    /// old image or the new one.
    pub fn publish(&self, left: &WheelTelemetry, right: &WheelTelemetry) {
        let image = registers::encode(left, right);
        self.gate.masked(|| self.registers.store(&image));
    }
}
