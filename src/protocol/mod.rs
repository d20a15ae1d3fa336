// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod interface;
pub mod mailbox;
pub mod messages;
pub mod parser;
pub mod registers;

pub use interface::CommandInterface;
pub use mailbox::Mailbox;
pub use messages::{Command, TonePlayer, Tune, Wheels};
pub use parser::Parser;
pub use registers::{RegisterMap, WheelTelemetry, REGISTER_LEN};
