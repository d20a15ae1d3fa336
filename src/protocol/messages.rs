// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host command set.
//!
//! Every command starts with a one-byte opcode. Drive and speed opcodes are followed by one payload
//! byte; stop and tune opcodes stand alone.

// Stop
pub const STOP_BOTH: u8 = 0x01;
pub const STOP_LEFT: u8 = 0x02;
pub const STOP_RIGHT: u8 = 0x03;

// Open-loop drive, payload = PWM duty
pub const FWD_BOTH: u8 = 0x04;
pub const FWD_LEFT: u8 = 0x05;
pub const FWD_RIGHT: u8 = 0x06;
pub const REV_BOTH: u8 = 0x07;
pub const REV_LEFT: u8 = 0x08;
pub const REV_RIGHT: u8 = 0x09;

// Closed-loop speed, payload = signed speed level
pub const SPD_BOTH: u8 = 0x0A;
pub const SPD_LEFT: u8 = 0x0B;
pub const SPD_RIGHT: u8 = 0x0C;

// Tunes
pub const TUNE_CHARGE: u8 = 0xF0;
pub const TUNE_TA_DA: u8 = 0xF1;
pub const TUNE_DA_TA: u8 = 0xF2;
pub const TUNE_PLUS: u8 = 0xF3;
pub const TUNE_MINUS: u8 = 0xF4;
pub const TUNE_BONK: u8 = 0xF5;

/// Which wheel(s) a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wheels {
    Left,
    Right,
    Both,
}

impl Wheels {
    #[inline]
    pub fn includes_left(self) -> bool {
        matches!(self, Wheels::Left | Wheels::Both)
    }

    #[inline]
    pub fn includes_right(self) -> bool {
        matches!(self, Wheels::Right | Wheels::Both)
    }

    /// Opcodes come in groups of three: both, left, right.
    fn from_offset(offset: u8) -> Self {
        match offset % 3 {
            0 => Wheels::Both,
            1 => Wheels::Left,
            _ => Wheels::Right,
        }
    }

    fn offset(self) -> u8 {
        match self {
            Wheels::Both => 0,
            Wheels::Left => 1,
            Wheels::Right => 2,
        }
    }
}

/// Short melodies for the buzzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tune {
    Charge,
    TaDa,
    DaTa,
    Plus,
    Minus,
    Bonk,
}

impl Tune {
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            TUNE_CHARGE => Some(Tune::Charge),
            TUNE_TA_DA => Some(Tune::TaDa),
            TUNE_DA_TA => Some(Tune::DaTa),
            TUNE_PLUS => Some(Tune::Plus),
            TUNE_MINUS => Some(Tune::Minus),
            TUNE_BONK => Some(Tune::Bonk),
            _ => None,
        }
    }

    pub fn opcode(self) -> u8 {
        match self {
            Tune::Charge => TUNE_CHARGE,
            Tune::TaDa => TUNE_TA_DA,
            Tune::DaTa => TUNE_DA_TA,
            Tune::Plus => TUNE_PLUS,
            Tune::Minus => TUNE_MINUS,
            Tune::Bonk => TUNE_BONK,
        }
    }
}

/// Plays tunes requested by the host. Implemented outside the control code (e.g. a buzzer).
pub trait TonePlayer {
    fn play(&mut self, tune: Tune);
}

/// A decoded host command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Stop(Wheels),
    /// Open-loop forward at the given PWM.
    Forward(Wheels, u8),
    /// Open-loop reverse at the given PWM.
    Reverse(Wheels, u8),
    /// Regulated signed speed level.
    Speed(Wheels, i8),
    Play(Tune),
}

impl Command {
    /// True if `opcode` is known and takes a payload byte.
    pub fn expects_payload(opcode: u8) -> bool {
        matches!(opcode, FWD_BOTH..=SPD_RIGHT)
    }

    /// Decode an opcode and its payload (ignored for opcodes that take none).
    pub fn decode(opcode: u8, payload: u8) -> Option<Self> {
        let command = match opcode {
            STOP_BOTH..=STOP_RIGHT => Command::Stop(Wheels::from_offset(opcode - STOP_BOTH)),
            FWD_BOTH..=FWD_RIGHT => {
                Command::Forward(Wheels::from_offset(opcode - FWD_BOTH), payload)
            }
            REV_BOTH..=REV_RIGHT => {
                Command::Reverse(Wheels::from_offset(opcode - REV_BOTH), payload)
            }
            SPD_BOTH..=SPD_RIGHT => {
                Command::Speed(Wheels::from_offset(opcode - SPD_BOTH), payload as i8)
            }
            _ => Command::Play(Tune::from_opcode(opcode)?),
        };
        Some(command)
    }

    pub fn opcode(&self) -> u8 {
        match *self {
            Command::Stop(w) => STOP_BOTH + w.offset(),
            Command::Forward(w, _) => FWD_BOTH + w.offset(),
            Command::Reverse(w, _) => REV_BOTH + w.offset(),
            Command::Speed(w, _) => SPD_BOTH + w.offset(),
            Command::Play(tune) => tune.opcode(),
        }
    }

    /// Payload byte, 0 for commands that carry none.
    pub fn payload(&self) -> u8 {
        match *self {
            Command::Forward(_, pwm) | Command::Reverse(_, pwm) => pwm,
            Command::Speed(_, level) => level as u8,
            Command::Stop(_) | Command::Play(_) => 0,
        }
    }
}
