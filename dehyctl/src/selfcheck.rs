// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    VERSION_MAJOR, VERSION_MINOR,
    hal::{Analog, Clock, FanDrive},
    segment::{DOT_H, DOT_L, SEG_G},
    sensor::Temperatures,
    system::SysPeriph,
    timer::{Millis, RelMillis},
    vfd::Brightness,
};

const FAN_RAMP_STEP: u8 = 5;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CheckState {
    AllSegments,
    Blank,
    Version,
    VersionBlank,
    /// Index into [Brightness::ALL].
    Dimming(u8),
    FanFull,
    /// Current fan power.
    FanRamp(u8),
    Temperatures,
    Done,
}

impl CheckState {
    pub fn next(&self) -> Self {
        match *self {
            CheckState::AllSegments => CheckState::Blank,
            CheckState::Blank => CheckState::Version,
            CheckState::Version => CheckState::VersionBlank,
            CheckState::VersionBlank => CheckState::Dimming(0),
            CheckState::Dimming(i) if (i as usize) < Brightness::ALL.len() - 1 => {
                CheckState::Dimming(i + 1)
            }
            CheckState::Dimming(_) => CheckState::FanFull,
            CheckState::FanFull => CheckState::FanRamp(100),
            CheckState::FanRamp(0) => CheckState::Temperatures,
            CheckState::FanRamp(p) => CheckState::FanRamp(p.saturating_sub(FAN_RAMP_STEP)),
            CheckState::Temperatures => CheckState::Done,
            CheckState::Done => CheckState::Done, // never leave done state.
        }
    }

    fn duration(&self) -> RelMillis {
        RelMillis::from_millis(match self {
            CheckState::AllSegments => 2000,
            CheckState::Blank | CheckState::VersionBlank => 200,
            CheckState::Version => 2000,
            CheckState::Dimming(_) => 1000,
            CheckState::FanFull => 1000,
            CheckState::FanRamp(_) => 50,
            CheckState::Temperatures => 2000,
            CheckState::Done => 0,
        })
    }
}

/// Power-on self check of the display, the fan and the sensors.
///
/// Each state shows its pattern for a fixed time.
/// [SelfCheck::run] never blocks. Call it from the main loop until it reports [CheckState::Done].
pub struct SelfCheck {
    state: CheckState,
    /// Time of the last state entry. None before the first run.
    entered: Option<Millis>,
    temps: Temperatures,
}

impl SelfCheck {
    pub const fn new() -> Self {
        Self {
            state: CheckState::AllSegments,
            entered: None,
            temps: Temperatures {
                ambient: 0,
                chamber: 0,
            },
        }
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == CheckState::Done
    }

    /// Temperatures sampled during the check.
    pub fn temperatures(&self) -> Temperatures {
        self.temps
    }

    pub fn run<C, I, O, A, S, F>(&mut self, sp: &mut SysPeriph<'_, C, I, O, A, S, F>) -> CheckState
    where
        C: Clock,
        A: Analog,
        F: FanDrive,
    {
        let now = sp.now();

        match self.entered {
            None => {
                self.enter(sp, now);
            }
            Some(entered) => {
                if self.state != CheckState::Done && now - entered >= self.state.duration() {
                    self.leave(sp);
                    self.state = self.state.next();
                    self.enter(sp, now);
                }
            }
        }

        self.state
    }

    fn enter<C, I, O, A, S, F>(&mut self, sp: &mut SysPeriph<'_, C, I, O, A, S, F>, now: Millis)
    where
        C: Clock,
        A: Analog,
        F: FanDrive,
    {
        self.entered = Some(now);
        let vfd = sp.vfd;

        match self.state {
            CheckState::AllSegments => {
                log::info!("Self check");
                sp.fan.set_power(0);
                for digit in 0..4 {
                    vfd.light_custom(digit, 0xFF);
                }
                vfd.light_dots(DOT_H | DOT_L);
            }
            CheckState::Blank | CheckState::VersionBlank => {
                vfd.clear();
            }
            CheckState::Version => {
                log::info!("Version {VERSION_MAJOR}.{VERSION_MINOR}");
                vfd.print_left(VERSION_MAJOR);
                vfd.print_right(VERSION_MINOR);
            }
            CheckState::Dimming(i) => {
                if i == 0 {
                    log::info!("Brightness");
                }
                vfd.set_brightness(Brightness::ALL[i as usize]);
                // Left pair. The right pair shows the light level.
                vfd.light_custom(2, SEG_G);
                vfd.light_custom(3, SEG_G);
                vfd.print_right(sp.sample_light());
            }
            CheckState::FanFull => {
                log::info!("Fan drive");
                vfd.set_brightness(Brightness::Max);
                sp.fan.set_power(100);
            }
            CheckState::FanRamp(power) => {
                sp.fan.set_power(power);
                vfd.print_left(power);
            }
            CheckState::Temperatures => {
                log::info!("Temperature sensors");
                vfd.clear();
                self.temps = sp.sample_temperatures(self.temps);
                vfd.print_left(self.temps.ambient);
                vfd.print_right(self.temps.chamber);
            }
            CheckState::Done => {
                log::info!("Self check finished");
            }
        }
    }

    fn leave<C, I, O, A, S, F>(&mut self, sp: &mut SysPeriph<'_, C, I, O, A, S, F>) {
        if let CheckState::Dimming(_) = self.state {
            sp.vfd.clear();
        }
    }
}

impl Default for SelfCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        mock::{
            MockAnalog, MockClock, MockFan, MockInputs, MockOutputs, MockStorage, sections,
        },
        segment::digit_segments,
        vfd::Vfd,
    };
    use std::vec::Vec;

    type Periph<'a> =
        SysPeriph<'a, MockClock, MockInputs, MockOutputs, MockAnalog, MockStorage, MockFan>;

    fn periph(vfd: &Vfd) -> Periph<'_> {
        SysPeriph {
            clock: MockClock::new(1),
            inputs: MockInputs::new(),
            outputs: MockOutputs::new(),
            analog: MockAnalog::new(),
            storage: MockStorage::new([0; 4]),
            fan: MockFan::default(),
            vfd,
        }
    }

    #[test]
    fn test_state_sequence() {
        let mut seq = Vec::new();
        let mut state = CheckState::AllSegments;
        while state != CheckState::Done {
            seq.push(state);
            state = state.next();
        }
        assert_eq!(
            seq[..9],
            [
                CheckState::AllSegments,
                CheckState::Blank,
                CheckState::Version,
                CheckState::VersionBlank,
                CheckState::Dimming(0),
                CheckState::Dimming(1),
                CheckState::Dimming(2),
                CheckState::Dimming(3),
                CheckState::FanFull,
            ]
        );
        assert_eq!(seq[9], CheckState::FanRamp(100));
        assert_eq!(seq[29], CheckState::FanRamp(0));
        assert_eq!(seq[30], CheckState::Temperatures);
        assert_eq!(seq.len(), 31);
        assert_eq!(CheckState::Done.next(), CheckState::Done);
    }

    #[test]
    fn test_run() {
        crate::mock::init_logging();
        let vfd = Vfd::new();
        let mut sp = periph(&vfd);
        sp.analog.light = Ok(0x3FF);
        // 25 and 40 degree Celsius.
        sp.analog.temps.push_back(Some([52, 82]));
        let mut check = SelfCheck::new();

        assert_eq!(check.run(&mut sp), CheckState::AllSegments);
        assert_eq!(sp.fan.power, Some(0));
        assert_eq!(sections(&vfd), [0xFF, 0xFF, DOT_H | DOT_L, 0xFF, 0xFF]);

        let mut transitions = Vec::new();
        let mut now = 1;
        while !check.is_done() {
            now += 10;
            sp.clock.set(now);
            let prev = check.state();
            let state = check.run(&mut sp);
            if state != prev {
                transitions.push((state, now));
            }
            match state {
                CheckState::Version => {
                    assert_eq!(vfd.section(3), digit_segments(1));
                    assert_eq!(vfd.section(0), digit_segments(4));
                }
                CheckState::Dimming(i) => {
                    assert_eq!(
                        vfd.skip_threshold(),
                        Brightness::ALL[i as usize].skip_threshold()
                    );
                    assert_eq!(vfd.section(3), SEG_G);
                    assert_eq!(vfd.section(4), SEG_G);
                    assert_eq!(vfd.section(1), digit_segments(0));
                    assert_eq!(vfd.section(0), digit_segments(0));
                }
                CheckState::Blank | CheckState::VersionBlank => {
                    assert_eq!(sections(&vfd), [0; 5]);
                }
                _ => (),
            }
            assert!(now < 20_000);
        }

        assert_eq!(
            transitions[..9],
            [
                (CheckState::Blank, 2001),
                (CheckState::Version, 2201),
                (CheckState::VersionBlank, 4201),
                (CheckState::Dimming(0), 4401),
                (CheckState::Dimming(1), 5401),
                (CheckState::Dimming(2), 6401),
                (CheckState::Dimming(3), 7401),
                (CheckState::FanFull, 8401),
                (CheckState::FanRamp(100), 9401),
            ]
        );
        assert_eq!(transitions.last(), Some(&(CheckState::Done, 12451)));
        assert_eq!(sp.analog.light_polls, 4);

        let mut fan: Vec<u8> = std::vec![0, 100];
        fan.extend((0..=100).rev().step_by(5));
        assert_eq!(sp.fan.history, fan);

        assert_eq!(vfd.skip_threshold(), Brightness::Max.skip_threshold());
        assert_eq!(
            check.temperatures(),
            Temperatures {
                ambient: 25,
                chamber: 40
            }
        );
        assert_eq!(
            sections(&vfd),
            [
                digit_segments(0),
                digit_segments(4),
                0,
                digit_segments(5),
                digit_segments(2),
            ]
        );

        // Stays done.
        sp.clock.set(now + 10_000);
        assert_eq!(check.run(&mut sp), CheckState::Done);
        assert_eq!(sp.fan.history.len(), fan.len());
    }
}

// vim: ts=4 sw=4 expandtab
