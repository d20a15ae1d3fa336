// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side fakes shared by the unit tests.

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};

use crate::drivers::{Direction, WheelDriver};
use crate::irq::InterruptGate;

/// Gate that counts how often it was entered and whether it is currently held.
#[derive(Default)]
pub struct CountingGate {
    entries: Cell<u32>,
    depth: Cell<u32>,
}

impl CountingGate {
    pub fn entries(&self) -> u32 {
        self.entries.get()
    }

    pub fn is_masked(&self) -> bool {
        self.depth.get() > 0
    }
}

impl InterruptGate for CountingGate {
    fn masked<R>(&self, f: impl FnOnce() -> R) -> R {
        self.entries.set(self.entries.get() + 1);
        self.depth.set(self.depth.get() + 1);
        let out = f();
        self.depth.set(self.depth.get() - 1);
        out
    }
}

pub const PHASE_A: usize = 0;
pub const PHASE_B: usize = 1;

const MAX_DUTY: u16 = 1_000;

#[derive(Default)]
struct BenchState {
    levels: [Cell<bool>; 2],
    duty: Cell<u16>,
    shoot_through: Cell<bool>,
}

/// A fake board: two phase pins and one PWM channel whose state the test can inspect.
#[derive(Clone, Default)]
pub struct Bench {
    state: Rc<BenchState>,
}

impl Bench {
    pub fn pin(&self, index: usize) -> FakePin {
        FakePin {
            state: self.state.clone(),
            index,
        }
    }

    pub fn pwm(&self) -> FakePwm {
        FakePwm {
            state: self.state.clone(),
        }
    }

    pub fn level(&self, index: usize) -> bool {
        self.state.levels[index].get()
    }

    pub fn duty(&self) -> u16 {
        self.state.duty.get()
    }

    pub fn max_duty(&self) -> u16 {
        MAX_DUTY
    }

    /// True if both phase pins were ever high at the same time.
    pub fn saw_shoot_through(&self) -> bool {
        self.state.shoot_through.get()
    }
}

pub struct FakePin {
    state: Rc<BenchState>,
    index: usize,
}

impl digital::ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.state.levels[self.index].set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.state.levels[self.index].set(true);
        if self.state.levels.iter().all(Cell::get) {
            self.state.shoot_through.set(true);
        }
        Ok(())
    }
}

pub struct FakePwm {
    state: Rc<BenchState>,
}

impl pwm::ErrorType for FakePwm {
    type Error = Infallible;
}

impl SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.state.duty.set(duty);
        Ok(())
    }
}

/// Something that happened to a wheel's output, in order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Direction(Direction),
    Pwm(u8),
    DelayMs(u32),
}

/// Error returned by a [`RecordingDriver`] told to fail.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DriverFault;

/// Shared ordered log of driver writes and busy-waits.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Rc<RefCell<Vec<Event>>>,
    failing: Rc<Cell<bool>>,
}

impl Recorder {
    pub fn driver(&self) -> RecordingDriver {
        RecordingDriver {
            recorder: self.clone(),
        }
    }

    pub fn delay(&self) -> RecordingDelay {
        RecordingDelay {
            recorder: self.clone(),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// While set, driver writes return [`DriverFault`] and are not logged.
    pub fn fail_writes(&self, failing: bool) {
        self.failing.set(failing);
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

pub struct RecordingDriver {
    recorder: Recorder,
}

impl RecordingDriver {
    fn write(&mut self, event: Event) -> Result<(), DriverFault> {
        if self.recorder.failing.get() {
            return Err(DriverFault);
        }
        self.recorder.push(event);
        Ok(())
    }
}

impl WheelDriver for RecordingDriver {
    type Error = DriverFault;

    fn set_direction(&mut self, direction: Direction) -> Result<(), DriverFault> {
        self.write(Event::Direction(direction))
    }

    fn set_pwm(&mut self, pwm: u8) -> Result<(), DriverFault> {
        self.write(Event::Pwm(pwm))
    }
}

pub struct RecordingDelay {
    recorder: Recorder,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.recorder.push(Event::DelayMs(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.recorder.push(Event::DelayMs(ms));
    }
}
