// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Byte-at-a-time decoder for host commands.
//!
//! The bus interrupt pushes each received byte through [`Parser::push`]. A command is one opcode
//! byte, plus one payload byte for drive and speed opcodes. Bytes that are not a known opcode are
//! dropped, and [`Parser::reset`] throws away a half-received command at the end of a transaction.

use crate::protocol::messages::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    WaitOpcode,
    WaitPayload { opcode: u8 },
}

#[derive(Debug)]
pub struct Parser {
    state: State,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub const fn new() -> Self {
        Self {
            state: State::WaitOpcode,
        }
    }

    /// Process a single incoming byte. Returns `Some(Command)` once a command is complete.
    pub fn push(&mut self, byte: u8) -> Option<Command> {
        match self.state {
            State::WaitOpcode => {
                if Command::expects_payload(byte) {
                    self.state = State::WaitPayload { opcode: byte };
                    None
                } else {
                    // Unknown opcodes fall out as None
                    Command::decode(byte, 0)
                }
            }
            State::WaitPayload { opcode } => {
                self.state = State::WaitOpcode;
                Command::decode(opcode, byte)
            }
        }
    }

    /// Drop any partially received command.
    pub fn reset(&mut self) {
        self.state = State::WaitOpcode;
    }

    /// True if an opcode has been seen and its payload byte is still outstanding.
    #[cfg(test)]
    pub fn is_mid_command(&self) -> bool {
        matches!(self.state, State::WaitPayload { .. })
    }
}
