// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Closed-loop wheel speed controller.
//!
//! Each wheel is commanded in speed levels. A level picks a starting PWM from the speed table and a
//! target tick interval; [`SpeedController::step`] then nudges the PWM by one count per adjustment
//! period until the averaged tick interval matches the target. Small steps at a fixed cadence keep
//! the loop from overshooting and let the tick average soak up encoder jitter, at the cost of slow
//! settling.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! wheel.set_speed(12, &mut delay)?;
//!
//! loop {
//!     wheel.step(clock::millis())?;
//! }
//! ```

use core::cmp::Ordering;

use embedded_hal::delay::DelayNs;

use crate::config::{ConfigError, WheelConfig};
use crate::control::TickSampler;
use crate::drivers::{Direction, WheelDriver};
use crate::irq::InterruptGate;
use crate::protocol::WheelTelemetry;

/// Who decides the wheel's PWM.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveMode {
    /// PWM is trimmed toward the speed table target.
    Regulated,
    /// PWM was set directly by the host and is left alone.
    Manual,
}

/// Mutable state of one wheel. Only the main loop touches it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WheelState {
    /// Requested speed level, already clamped. Zero in manual mode.
    pub speed: i16,
    pub pwm: u8,
    pub direction: Direction,
    pub mode: DriveMode,
    /// Earliest time (ms) the next trim may run. Cleared by every command; `None` until the first
    /// trim after it.
    pub next_adjust_ms: Option<u32>,
}

impl WheelState {
    const STOPPED: Self = Self {
        speed: 0,
        pwm: 0,
        direction: Direction::Brake,
        mode: DriveMode::Regulated,
        next_adjust_ms: None,
    };
}

/// Outcome of one [`SpeedController::step`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Adjustment {
    /// Stopped, manual, or not due yet.
    Idle,
    /// Due, but the wheel has not ticked since reset.
    NoData,
    /// On target, or already pinned at the PWM limit.
    Unchanged,
    Raised(u8),
    Lowered(u8),
}

/// Why a controller could not be brought up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SetupError<E> {
    /// The wheel config failed [`WheelConfig::validate`]. The output was not touched.
    Config(ConfigError),
    /// Braking the output failed.
    Drive(E),
}

/// Speed regulator for one wheel.
pub struct SpeedController<'a, D, G> {
    label: &'static str,
    driver: D,
    ticks: &'a TickSampler<G>,
    config: WheelConfig,
    state: WheelState,
}

impl<'a, D, G> SpeedController<'a, D, G>
where
    D: WheelDriver,
    G: InterruptGate,
{
    /// Take ownership of a wheel's output and leave it braked.
    ///
    /// `config` is validated before the output is touched.
    pub fn new(
        label: &'static str,
        mut driver: D,
        ticks: &'a TickSampler<G>,
        config: WheelConfig,
    ) -> Result<Self, SetupError<D::Error>> {
        config.validate().map_err(SetupError::Config)?;
        driver.brake().map_err(SetupError::Drive)?;
        debug!("{} wheel: initialized, braked", label);

        Ok(Self {
            label,
            driver,
            ticks,
            config,
            state: WheelState::STOPPED,
        })
    }

    /// Command a signed speed level and regulate toward it.
    ///
    /// `speed` is clamped to `[-max_reverse, max_forward]`. Reversing a moving wheel first cuts PWM
    /// and busy-waits the settle delay on `delay`.
    pub fn set_speed(&mut self, speed: i16, delay: &mut impl DelayNs) -> Result<(), D::Error> {
        let speed = speed.clamp(
            -i16::from(self.config.max_reverse),
            i16::from(self.config.max_forward),
        );
        let direction = Direction::from_speed(speed);
        let pwm = match speed {
            0 => 0,
            s => self.initial_pwm(s.unsigned_abs()),
        };

        self.drive(direction, pwm, delay)?;
        self.state.speed = speed;
        self.state.mode = DriveMode::Regulated;
        self.state.next_adjust_ms = None;

        info!("{} wheel: speed {} ({}), pwm {}", self.label, speed, direction, pwm);
        Ok(())
    }

    /// Drive at a fixed PWM with no regulation, as commanded by the host.
    ///
    /// Goes through the same reversal guard as [`set_speed`](Self::set_speed).
    pub fn set_duty(
        &mut self,
        direction: Direction,
        pwm: u8,
        delay: &mut impl DelayNs,
    ) -> Result<(), D::Error> {
        let pwm = if direction == Direction::Brake { 0 } else { pwm };

        self.drive(direction, pwm, delay)?;
        self.state.speed = 0;
        self.state.mode = DriveMode::Manual;
        self.state.next_adjust_ms = None;

        info!("{} wheel: manual {} pwm {}", self.label, direction, pwm);
        Ok(())
    }

    /// Brake and return to the regulated stopped state.
    pub fn stop(&mut self) -> Result<(), D::Error> {
        self.driver.brake()?;
        self.state = WheelState::STOPPED;

        info!("{} wheel: stop", self.label);
        Ok(())
    }

    /// Run one pass of the trim law. Call every main-loop iteration.
    ///
    /// Does nothing unless the wheel is regulated, moving, and its adjustment period has elapsed.
    /// A measured interval shorter than the target means the wheel is too fast: PWM drops by one.
    /// Longer means too slow: PWM rises by one.
    pub fn step(&mut self, now_ms: u32) -> Result<Adjustment, D::Error> {
        if self.state.mode != DriveMode::Regulated || self.state.speed == 0 {
            return Ok(Adjustment::Idle);
        }
        if let Some(deadline) = self.state.next_adjust_ms {
            if !is_after(now_ms, deadline) {
                return Ok(Adjustment::Idle);
            }
        }
        self.state.next_adjust_ms = Some(now_ms.wrapping_add(self.config.adjust_delay_ms));

        let level = u8::try_from(self.state.speed.unsigned_abs()).unwrap_or(u8::MAX);
        let target = self
            .config
            .table
            .target_interval_us(level)
            .unwrap_or(u32::MAX);

        let measured = self.ticks.average_interval();
        if measured == 0 {
            trace!("{} wheel: no ticks yet", self.label);
            return Ok(Adjustment::NoData);
        }

        let pwm = match measured.cmp(&target) {
            Ordering::Less => self.state.pwm.saturating_sub(1),
            Ordering::Greater => self.state.pwm.saturating_add(1),
            Ordering::Equal => self.state.pwm,
        };

        if pwm == self.state.pwm {
            return Ok(Adjustment::Unchanged);
        }

        self.driver.set_pwm(pwm)?;
        let adjustment = if pwm > self.state.pwm {
            Adjustment::Raised(pwm)
        } else {
            Adjustment::Lowered(pwm)
        };
        self.state.pwm = pwm;

        debug!(
            "{} wheel: tick {}us vs target {}us, pwm -> {}",
            self.label,
            measured,
            target,
            pwm
        );
        Ok(adjustment)
    }

    /// Snapshot for the host register map.
    pub fn telemetry(&self) -> WheelTelemetry {
        WheelTelemetry {
            direction: self.state.direction,
            pwm: self.state.pwm,
            tick_rate: self.ticks.tick_rate(),
        }
    }

    #[inline]
    pub fn state(&self) -> &WheelState {
        &self.state
    }

    #[inline]
    pub fn speed(&self) -> i16 {
        self.state.speed
    }

    #[inline]
    pub fn pwm(&self) -> u8 {
        self.state.pwm
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Apply a direction and PWM, passing through a PWM-off settle when the polarity flips.
    fn drive(
        &mut self,
        direction: Direction,
        pwm: u8,
        delay: &mut impl DelayNs,
    ) -> Result<(), D::Error> {
        if self.state.direction.opposes(direction) {
            debug!("{} wheel: stopping for direction change", self.label);
            self.driver.set_pwm(0)?;
            self.state.pwm = 0;
            delay.delay_ms(self.config.settle_delay_ms);
        }

        self.driver.set_direction(direction)?;
        self.driver.set_pwm(pwm)?;
        self.state.direction = direction;
        self.state.pwm = pwm;
        Ok(())
    }

    /// Table PWM for `level` plus this motor's calibration offset, clamped to 0..=255.
    fn initial_pwm(&self, level: u16) -> u8 {
        let level = u8::try_from(level).unwrap_or(u8::MAX);
        let base = self.config.table.initial_pwm(level).unwrap_or(u8::MAX);
        let pwm = i16::from(base) + self.config.calibration_offset;
        pwm.clamp(0, i16::from(u8::MAX)) as u8
    }
}

/// Wrap-aware `now > deadline` for a free-running millisecond counter.
#[inline]
fn is_after(now_ms: u32, deadline_ms: u32) -> bool {
    (now_ms.wrapping_sub(deadline_ms) as i32) > 0
}
