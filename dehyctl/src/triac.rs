// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::hal::{DelayTimer, FanDrive, Level, OutPin, Outputs};

/// Triac firing delay after the zero crossing at 99% power. In delay timer ticks.
pub const DELAY_MIN: u16 = 0;
/// Triac firing delay after the zero crossing at 1% power. In delay timer ticks.
pub const DELAY_MAX: u16 = 80;

/// Inverted linear mapping of power to firing delay.
pub const fn power_to_delay(percent: u8) -> u16 {
    let inv = 100_u32.saturating_sub(percent as u32);
    (DELAY_MIN as u32 + (DELAY_MAX - DELAY_MIN) as u32 * inv / 100) as u16
}

/// Zero-cross synchronized phase angle control of the fan triac.
///
/// [Self::set_power] runs in main context.
/// [Self::on_zero_cross] and [Self::on_delay_elapsed] run in interrupt context.
/// The caller must make sure that the two interrupts cannot preempt [Self::set_power].
pub struct PhaseController<T, O> {
    timer: T,
    out: O,
    /// The fan output is statically forced on or off.
    manual_drive: bool,
    /// Last commanded power. None if never commanded.
    power: Option<u8>,
}

impl<T: DelayTimer, O: Outputs> PhaseController<T, O> {
    pub const fn new(timer: T, out: O) -> Self {
        Self {
            timer,
            out,
            manual_drive: false,
            power: None,
        }
    }

    /// Switch the fan off and hold it there until the first power command.
    pub fn init(&mut self) {
        self.timer.stop();
        self.manual_drive = true;
        self.fan(false);
    }

    fn fan(&mut self, on: bool) {
        self.out.set(OutPin::FanDrive, Level::from(on));
    }

    /// Command a new power level in percent.
    ///
    /// Values of 100 and above mean full power.
    pub fn set_power(&mut self, percent: u8) {
        if self.power == Some(percent) {
            return;
        }
        self.power = Some(percent);

        // The timer must be fully stopped before it is touched.
        self.timer.stop();

        if percent == 0 {
            self.manual_drive = true;
            self.fan(false);
        } else if percent >= 100 {
            self.manual_drive = true;
            self.fan(true);
        } else {
            self.manual_drive = false;
            let delay = power_to_delay(percent);
            log::debug!("Triac delay = {delay}");
            self.timer.configure(delay);
        }
    }

    /// Mains zero crossing interrupt.
    pub fn on_zero_cross(&mut self) {
        if self.manual_drive {
            return;
        }
        self.fan(false);
        self.timer.start();
    }

    /// Delay timer elapsed interrupt.
    pub fn on_delay_elapsed(&mut self) {
        self.timer.stop();
        self.fan(true);
    }

    pub fn is_manual_drive(&self) -> bool {
        self.manual_drive
    }

    pub fn power(&self) -> Option<u8> {
        self.power
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn outputs(&self) -> &O {
        &self.out
    }
}

impl<T: DelayTimer, O: Outputs> FanDrive for PhaseController<T, O> {
    fn set_power(&mut self, percent: u8) {
        PhaseController::set_power(self, percent);
    }
}


// vim: ts=4 sw=4 expandtab
