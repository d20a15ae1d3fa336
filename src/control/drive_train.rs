// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Both wheels together, and the glue between them and the host link.

use embedded_hal::delay::DelayNs;

use crate::control::{Adjustment, SpeedController};
use crate::drivers::{Direction, WheelDriver};
use crate::irq::InterruptGate;
use crate::protocol::{Command, CommandInterface, TonePlayer, WheelTelemetry, Wheels};

/// Left and right wheel controllers driven as one unit.
pub struct DriveTrain<'a, D, G> {
    pub left: SpeedController<'a, D, G>,
    pub right: SpeedController<'a, D, G>,
}

impl<'a, D, G> DriveTrain<'a, D, G>
where
    D: WheelDriver,
    G: InterruptGate,
{
    pub fn new(left: SpeedController<'a, D, G>, right: SpeedController<'a, D, G>) -> Self {
        Self { left, right }
    }

    /// Carry out one motion command on the wheels it addresses. Tunes are ignored here.
    pub fn apply(&mut self, command: Command, delay: &mut impl DelayNs) -> Result<(), D::Error> {
        match command {
            Command::Stop(wheels) => self.for_each(wheels, |w| w.stop()),
            Command::Forward(wheels, pwm) => {
                self.for_each(wheels, |w| w.set_duty(Direction::Forward, pwm, delay))
            }
            Command::Reverse(wheels, pwm) => {
                self.for_each(wheels, |w| w.set_duty(Direction::Reverse, pwm, delay))
            }
            Command::Speed(wheels, level) => {
                self.for_each(wheels, |w| w.set_speed(i16::from(level), delay))
            }
            Command::Play(_) => Ok(()),
        }
    }

    /// Trim both wheels. Returns the (left, right) outcomes.
    ///
    /// The right wheel is trimmed even if the left one fails; the first error is returned.
    pub fn step(&mut self, now_ms: u32) -> Result<(Adjustment, Adjustment), D::Error> {
        let left = self.left.step(now_ms);
        let right = self.right.step(now_ms);
        Ok((left?, right?))
    }

    pub fn telemetry(&self) -> (WheelTelemetry, WheelTelemetry) {
        (self.left.telemetry(), self.right.telemetry())
    }

    /// One main-loop pass: drain at most one host command, trim, publish telemetry, then hand any
    /// requested tune to `player`.
    ///
    /// An output error does not cut the pass short. Telemetry is always published and tunes are
    /// always drained; the first error is returned at the end.
    pub fn service<B: InterruptGate>(
        &mut self,
        link: &CommandInterface<B>,
        now_ms: u32,
        delay: &mut impl DelayNs,
        player: &mut impl TonePlayer,
    ) -> Result<(), D::Error> {
        let mut outcome = Ok(());

        if let Some(command) = link.take_command() {
            debug!("host command: {}", command);
            outcome = self.apply(command, delay);
            if outcome.is_err() {
                warn!("host command {} failed on a wheel output", command);
            }
        }

        let stepped = self.step(now_ms);
        if stepped.is_err() {
            warn!("speed trim failed on a wheel output");
        }

        let (left, right) = self.telemetry();
        link.publish(&left, &right);

        if let Some(tune) = link.take_tune() {
            debug!("tune: {}", tune);
            player.play(tune);
        }
        outcome.and(stepped.map(drop))
    }

    /// Run `f` on every addressed wheel. Both are attempted; the first error is returned.
    fn for_each<F>(&mut self, wheels: Wheels, mut f: F) -> Result<(), D::Error>
    where
        F: FnMut(&mut SpeedController<'a, D, G>) -> Result<(), D::Error>,
    {
        let left = if wheels.includes_left() {
            f(&mut self.left)
        } else {
            Ok(())
        };
        let right = if wheels.includes_right() {
            f(&mut self.right)
        } else {
            Ok(())
        };
        left.and(right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LEFT_WHEEL, RIGHT_WHEEL};
    use crate::control::TickSampler;
    use crate::protocol::{messages, registers, Parser, Tune};
    use crate::testing::{CountingGate, DriverFault, Recorder, RecordingDriver};

    struct Rig {
        left_ticks: TickSampler<CountingGate>,
        right_ticks: TickSampler<CountingGate>,
        left_log: Recorder,
        right_log: Recorder,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                left_ticks: TickSampler::new(CountingGate::default()),
                right_ticks: TickSampler::new(CountingGate::default()),
                left_log: Recorder::default(),
                right_log: Recorder::default(),
            }
        }

        fn drive(&self) -> DriveTrain<'_, RecordingDriver, CountingGate> {
            let left = SpeedController::new(
                "left",
                self.left_log.driver(),
                &self.left_ticks,
                LEFT_WHEEL,
            )
            .unwrap();
            let right = SpeedController::new(
                "right",
                self.right_log.driver(),
                &self.right_ticks,
                RIGHT_WHEEL,
            )
            .unwrap();
            DriveTrain::new(left, right)
        }
    }

    #[derive(Default)]
    struct Jukebox(Vec<Tune>);

    impl TonePlayer for Jukebox {
        fn play(&mut self, tune: Tune) {
            self.0.push(tune);
        }
    }

    fn host_write(link: &CommandInterface<CountingGate>, bytes: &[u8]) {
        let mut parser = Parser::new();
        for &b in bytes {
            link.receive(&mut parser, b);
        }
    }

    #[test]
    fn forward_left_shows_up_in_registers() {
        let rig = Rig::new();
        let mut drive = rig.drive();
        let link = CommandInterface::new(CountingGate::default());
        let mut delay = rig.left_log.delay();

        host_write(&link, &[0x05, 120]);
        drive.service(&link, 0, &mut delay, &mut Jukebox::default()).unwrap();

        let regs = link.snapshot();
        assert_eq!(regs[0], registers::DIR_FORWARD);
        assert_eq!(regs[1], 120);
        assert_eq!(regs[4], registers::DIR_STOP);
        assert_eq!(regs[5], 0);
    }

    #[test]
    fn both_wheels_addressed_together() {
        let rig = Rig::new();
        let mut drive = rig.drive();
        let mut delay = rig.left_log.delay();

        drive
            .apply(Command::Reverse(Wheels::Both, 90), &mut delay)
            .unwrap();
        assert_eq!(drive.left.direction(), Direction::Reverse);
        assert_eq!(drive.right.direction(), Direction::Reverse);
        assert_eq!(drive.right.pwm(), 90);

        drive.apply(Command::Stop(Wheels::Right), &mut delay).unwrap();
        assert_eq!(drive.left.pwm(), 90);
        assert_eq!(drive.right.direction(), Direction::Brake);
    }

    #[test]
    fn speed_command_uses_calibrated_table() {
        let rig = Rig::new();
        let mut drive = rig.drive();
        let mut delay = rig.left_log.delay();

        drive
            .apply(Command::Speed(Wheels::Both, -3), &mut delay)
            .unwrap();

        assert_eq!(drive.left.speed(), -3);
        assert_eq!(drive.left.pwm(), 80);
        assert_eq!(drive.right.pwm(), 80 + 5);
    }

    #[test]
    fn one_command_drained_per_pass() {
        let rig = Rig::new();
        let mut drive = rig.drive();
        let link = CommandInterface::new(CountingGate::default());
        let mut delay = rig.left_log.delay();

        host_write(&link, &[0x06, 50]);
        drive.service(&link, 0, &mut delay, &mut Jukebox::default()).unwrap();
        assert_eq!(drive.right.pwm(), 50);

        rig.right_log.clear();
        drive.service(&link, 1, &mut delay, &mut Jukebox::default()).unwrap();
        assert!(rig.right_log.events().is_empty());
    }

    #[test]
    fn tunes_go_to_the_player() {
        let rig = Rig::new();
        let mut drive = rig.drive();
        let link = CommandInterface::new(CountingGate::default());
        let mut delay = rig.left_log.delay();
        let mut jukebox = Jukebox::default();

        host_write(&link, &[0x04, 70, 0xF3]);
        drive.service(&link, 0, &mut delay, &mut jukebox).unwrap();
        drive.service(&link, 1, &mut delay, &mut jukebox).unwrap();

        assert_eq!(jukebox.0, [Tune::Plus]);
        assert_eq!(drive.left.pwm(), 70);
        assert_eq!(drive.right.pwm(), 70);
    }

    #[test]
    fn publish_masks_the_bus_once_per_pass() {
        let rig = Rig::new();
        let mut drive = rig.drive();
        let link = CommandInterface::new(CountingGate::default());
        let mut delay = rig.left_log.delay();

        drive.service(&link, 0, &mut delay, &mut Jukebox::default()).unwrap();
        assert_eq!(link.gate().entries(), 1);
        assert!(!link.gate().is_masked());
    }

    #[test]
    fn regulated_wheels_report_tick_rate() {
        let rig = Rig::new();
        let mut drive = rig.drive();
        let link = CommandInterface::new(CountingGate::default());
        let mut delay = rig.left_log.delay();

        drive
            .apply(Command::Speed(Wheels::Left, 1), &mut delay)
            .unwrap();
        for i in 1..=5 {
            rig.left_ticks.tick(i * 20_000);
        }
        drive.service(&link, 10, &mut delay, &mut Jukebox::default()).unwrap();

        let (left, _) = registers::decode(&link.snapshot());
        assert_eq!(left.tick_rate, 50);
        // 20 ms ticks are faster than the 30 ms target.
        assert_eq!(left.pwm, 59);
    }

    #[test]
    fn failing_wheel_does_not_starve_the_other() {
        let rig = Rig::new();
        let mut drive = rig.drive();
        let link = CommandInterface::new(CountingGate::default());
        let mut delay = rig.left_log.delay();
        let mut jukebox = Jukebox::default();

        rig.left_log.fail_writes(true);
        host_write(&link, &[messages::FWD_BOTH, 100, messages::TUNE_BONK]);

        assert_eq!(
            drive.service(&link, 0, &mut delay, &mut jukebox),
            Err(DriverFault)
        );
        assert_eq!(drive.right.direction(), Direction::Forward);
        assert_eq!(drive.right.pwm(), 100);

        let (left, right) = registers::decode(&link.snapshot());
        assert_eq!(left.pwm, 0);
        assert_eq!(right.pwm, 100);
        assert_eq!(link.gate().entries(), 1);
        assert_eq!(jukebox.0, [Tune::Bonk]);

        rig.left_log.fail_writes(false);
        drive.service(&link, 1, &mut delay, &mut jukebox).unwrap();
    }
}
