// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! I2C1 as an interrupt-driven slave, using direct PAC register access.
//!
//! Writes from the host are decoded byte by byte into the command mailbox. Reads return the
//! telemetry register block, captured once at the address match so a single read transaction
//! never mixes two refreshes.

use stm32f7xx_hal::{
    gpio::{gpiob, Alternate, OpenDrain},
    pac,
};

use crate::irq::InterruptGate;
use crate::protocol::{CommandInterface, Parser, REGISTER_LEN};

// ISR flags
const ISR_TXE: u32 = 1 << 0;
const ISR_TXIS: u32 = 1 << 1;
const ISR_RXNE: u32 = 1 << 2;
const ISR_ADDR: u32 = 1 << 3;
const ISR_NACKF: u32 = 1 << 4;
const ISR_STOPF: u32 = 1 << 5;
const ISR_DIR: u32 = 1 << 16;

// ICR clear bits
const ICR_ADDRCF: u32 = 1 << 3;
const ICR_NACKCF: u32 = 1 << 4;
const ICR_STOPCF: u32 = 1 << 5;

// CR1 bits
const CR1_PE: u32 = 1 << 0;
const CR1_TXIE: u32 = 1 << 1;
const CR1_RXIE: u32 = 1 << 2;
const CR1_ADDRIE: u32 = 1 << 3;
const CR1_NACKIE: u32 = 1 << 4;
const CR1_STOPIE: u32 = 1 << 5;

const OAR1_OA1EN: u32 = 1 << 15;

/// 100 kHz standard mode from the 16 MHz HSI kernel clock.
const TIMINGR_100KHZ: u32 = 0x0030_3D5B;

/// Byte clocked out when the host reads past the register block.
const FILL: u8 = 0xFF;

pub type I2cPins = (
    gpiob::PB8<Alternate<4, OpenDrain>>,
    gpiob::PB9<Alternate<4, OpenDrain>>,
);

pub struct I2cSlave {
    i2c: pac::I2C1,
    pins: I2cPins,
    parser: Parser,
    tx: [u8; REGISTER_LEN],
    tx_pos: usize,
}

impl I2cSlave {
    /// Enable I2C1 and listen on the 7-bit `address`.
    pub fn new(i2c1: pac::I2C1, pins: I2cPins, address: u8) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.i2c1en().set_bit());

        let i2c = i2c1;

        // Peripheral off while configuring
        i2c.cr1.write(|w| unsafe { w.bits(0) });
        i2c.timingr.write(|w| unsafe { w.bits(TIMINGR_100KHZ) });
        // OA1EN must be clear while the address changes
        i2c.oar1.write(|w| unsafe { w.bits(0) });
        i2c.oar1
            .write(|w| unsafe { w.bits(OAR1_OA1EN | (u32::from(address) << 1)) });

        i2c.cr1.write(|w| unsafe {
            w.bits(CR1_TXIE | CR1_RXIE | CR1_ADDRIE | CR1_NACKIE | CR1_STOPIE | CR1_PE)
        });

        Self {
            i2c,
            pins,
            parser: Parser::new(),
            tx: [0; REGISTER_LEN],
            tx_pos: 0,
        }
    }

    /// Service every pending I2C1 event. Call from the I2C1_EV handler.
    pub fn on_event<G: InterruptGate>(&mut self, link: &CommandInterface<G>) {
        let isr = self.i2c.isr.read().bits();

        if isr & ISR_ADDR != 0 {
            if isr & ISR_DIR != 0 {
                // Host read: freeze the registers for this transaction, drop any stale TXDR byte
                self.tx = link.snapshot();
                self.tx_pos = 0;
                self.i2c.isr.write(|w| unsafe { w.bits(ISR_TXE) });
            } else {
                self.parser.reset();
            }
            self.i2c.icr.write(|w| unsafe { w.bits(ICR_ADDRCF) });
        }

        if isr & ISR_RXNE != 0 {
            let byte = self.i2c.rxdr.read().bits() as u8;
            link.receive(&mut self.parser, byte);
        }

        if isr & ISR_TXIS != 0 {
            let byte = self.tx.get(self.tx_pos).copied().unwrap_or(FILL);
            self.tx_pos = self.tx_pos.saturating_add(1);
            self.i2c.txdr.write(|w| unsafe { w.bits(u32::from(byte)) });
        }

        if isr & ISR_NACKF != 0 {
            self.i2c.icr.write(|w| unsafe { w.bits(ICR_NACKCF) });
        }

        if isr & ISR_STOPF != 0 {
            // End of transaction, a half-received command is discarded
            self.parser.reset();
            self.i2c.icr.write(|w| unsafe { w.bits(ICR_STOPCF) });
        }
    }

    pub fn free(self) -> (pac::I2C1, I2cPins) {
        self.i2c.cr1.write(|w| unsafe { w.bits(0) });
        (self.i2c, self.pins)
    }
}
