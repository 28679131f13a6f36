// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    button::{Button, ButtonEvent},
    config::Configuration,
    hal::{Analog, Clock, FanDrive, InPin, Inputs, Level, OutPin, Outputs, Storage},
    segment::{Field, SEG_B, SEG_C},
    sensor::{Temperatures, sample_light, sample_temperatures},
    timer::{Millis, PeriodicTimer, RelMillis},
    vfd::{Brightness, Vfd},
};

/// Chamber temperature above threshold plus this runs the fan at full power.
pub const TEMP_DELTA_MAX: u8 = 30;

/// Light level thresholds for display brightness adaptation.
const BRIGHTNESS_LEV_0: u8 = 20;
const BRIGHTNESS_LEV_1: u8 = 40;
const BRIGHTNESS_LEV_2: u8 = 60;

const SENSOR_PERIOD: RelMillis = RelMillis::from_millis(5000);
const HEARTBEAT_PERIOD: RelMillis = RelMillis::from_millis(500);
const BUTTON_PERIOD: RelMillis = RelMillis::from_millis(5);

/// Custom digit position left of the right field.
const HUNDREDS_DIGIT: u8 = 2;

/// Fan power in percent for the chamber temperature.
pub fn fan_power(chamber: u8, threshold: u8) -> u8 {
    let chamber = chamber as u16;
    let threshold = threshold as u16;
    if chamber > threshold + TEMP_DELTA_MAX as u16 {
        100
    } else if chamber > threshold {
        50
    } else {
        0
    }
}

/// Display brightness for the light level.
///
/// None means: keep the current brightness.
pub fn light_to_brightness(light: u8) -> Option<Brightness> {
    if light < BRIGHTNESS_LEV_0 {
        Some(Brightness::Max)
    } else if light < BRIGHTNESS_LEV_1 {
        Some(Brightness::P50)
    } else if light < BRIGHTNESS_LEV_2 {
        Some(Brightness::P25)
    } else {
        None
    }
}

/// Peripherals used from main context.
pub struct SysPeriph<'a, C, I, O, A, S, F> {
    pub clock: C,
    pub inputs: I,
    pub outputs: O,
    pub analog: A,
    pub storage: S,
    pub fan: F,
    pub vfd: &'a Vfd,
}

impl<C, I, O, A, S, F> SysPeriph<'_, C, I, O, A, S, F>
where
    C: Clock,
    A: Analog,
{
    pub fn now(&self) -> Millis {
        Millis(self.clock.now_ms())
    }

    /// Sample both temperature sensors.
    ///
    /// On failure the previous readings are kept.
    pub fn sample_temperatures(&mut self, prev: Temperatures) -> Temperatures {
        match sample_temperatures(&self.clock, &mut self.analog) {
            Ok(temps) => temps,
            Err(e) => {
                log::warn!("Temperature sampling failed: {e}");
                prev
            }
        }
    }

    pub fn sample_light(&mut self) -> u8 {
        sample_light(&mut self.analog)
    }
}

/// The periodic control loop.
pub struct System {
    conf: Configuration,
    conf_changed: bool,
    temps: Temperatures,
    temp_toggle: bool,
    status_led: bool,
    tim_sensors: PeriodicTimer,
    tim_heartbeat: PeriodicTimer,
    tim_buttons: PeriodicTimer,
    btn_mode: Button,
    btn_select: Button,
}

impl System {
    pub const fn new(conf: Configuration) -> Self {
        Self {
            conf,
            conf_changed: false,
            temps: Temperatures {
                ambient: 0,
                chamber: 0,
            },
            temp_toggle: false,
            status_led: false,
            tim_sensors: PeriodicTimer::new(SENSOR_PERIOD),
            tim_heartbeat: PeriodicTimer::new(HEARTBEAT_PERIOD),
            tim_buttons: PeriodicTimer::new(BUTTON_PERIOD),
            btn_mode: Button::new(InPin::Mode),
            btn_select: Button::new(InPin::Select),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.conf
    }

    pub fn temperatures(&self) -> Temperatures {
        self.temps
    }

    /// Run one scheduler pass. Call this from the main loop as often as possible.
    pub fn run<C, I, O, A, S, F>(&mut self, sp: &mut SysPeriph<'_, C, I, O, A, S, F>)
    where
        C: Clock,
        I: Inputs,
        O: Outputs,
        A: Analog,
        S: Storage,
        F: FanDrive,
    {
        let now = sp.now();

        if self.tim_sensors.update(now) {
            self.run_sensors(sp);
        }

        if self.tim_heartbeat.update(now) {
            self.status_led = !self.status_led;
            sp.outputs
                .set(OutPin::StatusLed, Level::from(self.status_led));
        }

        if self.tim_buttons.update(now) {
            self.run_buttons(sp);
        }
    }

    fn run_sensors<C, I, O, A, S, F>(&mut self, sp: &mut SysPeriph<'_, C, I, O, A, S, F>)
    where
        C: Clock,
        A: Analog,
        F: FanDrive,
    {
        self.temps = sp.sample_temperatures(self.temps);
        let Temperatures { ambient, chamber } = self.temps;

        self.display(sp.vfd, ambient, chamber);

        let light = sp.sample_light();
        if let Some(brightness) = light_to_brightness(light) {
            sp.vfd.set_brightness(brightness);
        }

        log::info!("Readings [t1, t2, l]: {ambient} {chamber} {light}");

        sp.fan
            .set_power(fan_power(chamber, self.conf.temp_threshold));
    }

    fn run_buttons<C, I, O, A, S, F>(&mut self, sp: &mut SysPeriph<'_, C, I, O, A, S, F>)
    where
        I: Inputs,
        S: Storage,
    {
        if self.btn_mode.update(&mut sp.inputs) == ButtonEvent::Released {
            self.conf.next_fan_preset();
            self.conf_changed = true;
        }

        if self.btn_select.update(&mut sp.inputs) == ButtonEvent::Released {
            self.conf.next_temp_threshold();
            self.conf_changed = true;
        }

        if self.conf_changed {
            self.display(sp.vfd, 0, 0);
            self.conf.save(&mut sp.storage);
            self.conf_changed = false;
        }
    }

    fn display(&mut self, vfd: &Vfd, t1: u8, t2: u8) {
        if self.conf_changed {
            vfd.print_left(self.conf.fan_preset as u8);
            vfd.print_right(self.conf.temp_threshold);
        } else {
            self.display_temp(vfd, t1, t2);
        }
    }

    fn display_temp(&mut self, vfd: &Vfd, t1: u8, t2: u8) {
        if t1 < 100 && t2 < 100 {
            vfd.print_left(t1);
            vfd.print_right(t2);
            return;
        }

        // Three digit readings don't fit.
        // Alternate both readings on the right field.
        let t = if self.temp_toggle { t1 } else { t2 };
        self.temp_toggle = !self.temp_toggle;

        vfd.clear_field(Field::Left);
        if t >= 100 {
            // Assume 1xx degrees.
            vfd.light_custom(HUNDREDS_DIGIT, SEG_B | SEG_C);
            vfd.print_right(t - 100);
        } else {
            vfd.print_right(t);
        }
    }
}


// vim: ts=4 sw=4 expandtab
