// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use core::cell::RefCell;

use cortex_m::interrupt::Mutex;
use cortex_m_rt::{entry, exception};
use defmt_rtt as _;
use panic_halt as _;

use hal::pac::{self, interrupt, Interrupt};
use stm32f7xx_hal as hal;
use stm32f7xx_hal::prelude::*;

use runtbot::{
    config::{I2C_ADDRESS, LEFT_WHEEL, RIGHT_WHEEL},
    control::{DriveTrain, SpeedController, TickSampler},
    hw::{
        clock, exti, BoardPins, BusyDelay, Clock, EncoderEdges, I2cSlave, NvicGate, PushPullPin,
        PwmChannel, Tim4Pwm,
    },
    protocol::{CommandInterface, TonePlayer, Tune},
};

#[cfg(not(feature = "phase-enable"))]
use runtbot::drivers::DualPhasePwm;
#[cfg(feature = "phase-enable")]
use runtbot::drivers::SinglePinPwm;

const LEFT_GATE: NvicGate = NvicGate::new(Interrupt::EXTI0);
const RIGHT_GATE: NvicGate = NvicGate::new(Interrupt::EXTI1);
const BUS_GATE: NvicGate = NvicGate::new(Interrupt::I2C1_EV);

static LEFT_TICKS: TickSampler<NvicGate> = TickSampler::new(LEFT_GATE);
static RIGHT_TICKS: TickSampler<NvicGate> = TickSampler::new(RIGHT_GATE);
static LINK: CommandInterface<NvicGate> = CommandInterface::new(BUS_GATE);
/// Hand-off slot for the bus peripheral. `I2C1_EV` moves it out on first entry.
static I2C: Mutex<RefCell<Option<I2cSlave>>> = Mutex::new(RefCell::new(None));

#[cfg(not(feature = "phase-enable"))]
type Wheel = DualPhasePwm<PwmChannel, PushPullPin, PushPullPin>;
#[cfg(feature = "phase-enable")]
type Wheel = SinglePinPwm<PwmChannel, PushPullPin>;

#[cfg(not(feature = "phase-enable"))]
fn wheel(pwm: PwmChannel, in_a: PushPullPin, in_b: PushPullPin) -> Wheel {
    DualPhasePwm::new(pwm, in_a, in_b)
}

/// Phase/enable boards use IN_A as the phase line; IN_B is left driven low.
#[cfg(feature = "phase-enable")]
fn wheel(pwm: PwmChannel, in_a: PushPullPin, _in_b: PushPullPin) -> Wheel {
    SinglePinPwm::new(pwm, in_a)
}

/// No buzzer on this board yet: requested tunes are only logged.
struct LogTones;

impl TonePlayer for LogTones {
    fn play(&mut self, tune: Tune) {
        defmt::info!("tune requested: {}", tune);
    }
}

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks: default 16 MHz HSI
    let rcc = dp.RCC.constrain();
    let _clocks = rcc.cfgr.freeze();

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD);
    let _clock = Clock::start(dp.TIM5, cp.SYST);
    let mut delay = BusyDelay;

    // Wheel outputs
    let (left_pwm, right_pwm) = Tim4Pwm::new(dp.TIM4, (pins.left.pwm, pins.right.pwm)).split();
    let left_out = wheel(
        left_pwm,
        PushPullPin::new(pins.left.in_a),
        PushPullPin::new(pins.left.in_b),
    );
    let right_out = wheel(
        right_pwm,
        PushPullPin::new(pins.right.in_a),
        PushPullPin::new(pins.right.in_b),
    );

    // Configs are const and output errors are Infallible on this board
    let left = SpeedController::new("left", left_out, &LEFT_TICKS, LEFT_WHEEL).unwrap();
    let right = SpeedController::new("right", right_out, &RIGHT_TICKS, RIGHT_WHEEL).unwrap();
    let mut drive = DriveTrain::new(left, right);

    // Encoders
    let _edges = EncoderEdges::new(
        dp.EXTI,
        dp.SYSCFG,
        (pins.encoder.left, pins.encoder.right),
    );

    // Host link
    let i2c = I2cSlave::new(dp.I2C1, (pins.i2c1.scl, pins.i2c1.sda), I2C_ADDRESS);
    cortex_m::interrupt::free(|cs| I2C.borrow(cs).replace(Some(i2c)));

    LEFT_GATE.unmask();
    RIGHT_GATE.unmask();
    BUS_GATE.unmask();

    defmt::info!("runtbot ready on i2c address {=u8:#x}", I2C_ADDRESS);

    let mut tones = LogTones;
    loop {
        if let Err(e) = drive.service(&LINK, clock::millis(), &mut delay, &mut tones) {
            defmt::warn!("wheel output error: {}", defmt::Debug2Format(&e));
        }
    }
}

#[interrupt]
fn EXTI0() {
    exti::clear(exti::LEFT_LINE);
    LEFT_TICKS.tick(clock::micros());
}

#[interrupt]
fn EXTI1() {
    exti::clear(exti::RIGHT_LINE);
    RIGHT_TICKS.tick(clock::micros());
}

/// Only the first entry takes a global critical section, to move the slave out of `I2C`.
#[interrupt]
fn I2C1_EV() {
    static mut SLAVE: Option<I2cSlave> = None;

    if SLAVE.is_none() {
        *SLAVE = cortex_m::interrupt::free(|cs| I2C.borrow(cs).take());
    }
    if let Some(i2c) = SLAVE.as_mut() {
        i2c.on_event(&LINK);
    }
}

#[exception]
fn SysTick() {
    clock::on_systick();
}
