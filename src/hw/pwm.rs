// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Motor PWM on TIM4 using direct PAC register access.
//!
//! CH1 (PD12) drives the left wheel and CH2 (PD13) the right. The counter runs 0..=254, so a
//! compare value equals the 8-bit duty directly and 255 is fully on.
//!
//! Example:
//! ```ignore
//! let (left_pwm, right_pwm) = Tim4Pwm::new(dp.TIM4, (pins.left.pwm, pins.right.pwm)).split();
//! ```

use core::convert::Infallible;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use stm32f7xx_hal::{
    gpio::{gpiod, Alternate},
    pac,
};

use crate::config::{PWM_FREQUENCY_HZ, TIMER_CLOCK_HZ};

const TOP: u32 = 254;
const PRESCALER: u32 = TIMER_CLOCK_HZ / (PWM_FREQUENCY_HZ * (TOP + 1)) - 1;

// CCMR1: OC1M = OC2M = PWM mode 1, preload enabled on both.
const CCMR1_PWM1_CH1_CH2: u32 = (0b110 << 4) | (1 << 3) | (0b110 << 12) | (1 << 11);
// CCER: CC1E | CC2E, active high.
const CCER_CH1_CH2: u32 = (1 << 0) | (1 << 4);

/// TIM4 configured for two PWM outputs.
pub struct Tim4Pwm {
    tim: pac::TIM4,
    _pins: (gpiod::PD12<Alternate<2>>, gpiod::PD13<Alternate<2>>),
}

impl Tim4Pwm {
    pub fn new(
        tim4: pac::TIM4,
        pins: (gpiod::PD12<Alternate<2>>, gpiod::PD13<Alternate<2>>),
    ) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim4en().set_bit());

        let tim = tim4;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        tim.psc.write(|w| unsafe { w.bits(PRESCALER) });
        tim.arr.write(|w| unsafe { w.bits(TOP) });

        tim.ccmr1_output()
            .write(|w| unsafe { w.bits(CCMR1_PWM1_CH1_CH2) });
        tim.ccr1.write(|w| unsafe { w.bits(0) });
        tim.ccr2.write(|w| unsafe { w.bits(0) });
        tim.ccer.write(|w| unsafe { w.bits(CCER_CH1_CH2) });

        // Latch PSC/ARR, then run with ARR preload
        tim.egr.write(|w| w.ug().set_bit());
        tim.cr1.modify(|_, w| w.arpe().set_bit().cen().set_bit());

        Self { tim, _pins: pins }
    }

    /// Hand out the two channels. The timer keeps running.
    pub fn split(self) -> (PwmChannel, PwmChannel) {
        (
            PwmChannel {
                channel: Channel::Ch1,
            },
            PwmChannel {
                channel: Channel::Ch2,
            },
        )
    }

    pub fn free(self) -> pac::TIM4 {
        self.tim.cr1.modify(|_, w| w.cen().clear_bit());
        self.tim
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Channel {
    Ch1,
    Ch2,
}

/// One TIM4 compare channel, 8-bit duty.
pub struct PwmChannel {
    channel: Channel,
}

impl ErrorType for PwmChannel {
    type Error = Infallible;
}

impl SetDutyCycle for PwmChannel {
    #[inline]
    fn max_duty_cycle(&self) -> u16 {
        (TOP + 1) as u16
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        // Each channel only ever writes its own compare register.
        let tim = unsafe { &*pac::TIM4::ptr() };
        let duty = u32::from(duty);
        match self.channel {
            Channel::Ch1 => tim.ccr1.write(|w| unsafe { w.bits(duty) }),
            Channel::Ch2 => tim.ccr2.write(|w| unsafe { w.bits(duty) }),
        }
        Ok(())
    }
}
