//! Recording fakes of the board peripherals for host tests.

use crate::{
    error::{SampleError, StorageError},
    hal::{Analog, Clock, DelayTimer, FanDrive, InPin, Inputs, Level, OutPin, Outputs, Storage},
    segment::SECTIONS,
};
use core::cell::Cell;
use std::{collections::VecDeque, vec::Vec};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Clock that optionally advances on every read.
pub struct MockClock {
    now: Cell<u32>,
    step: u32,
}

impl MockClock {
    pub fn new(now: u32) -> Self {
        Self {
            now: Cell::new(now),
            step: 0,
        }
    }

    pub fn with_step(now: u32, step: u32) -> Self {
        Self {
            now: Cell::new(now),
            step,
        }
    }

    pub fn set(&self, now: u32) {
        self.now.set(now);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step));
        now
    }
}

pub struct MockOutputs {
    levels: [Level; OutPin::COUNT],
    pub writes: usize,
}

impl MockOutputs {
    pub fn new() -> Self {
        Self {
            levels: [Level::Low; OutPin::COUNT],
            writes: 0,
        }
    }

    pub fn level(&self, pin: OutPin) -> Level {
        self.levels[pin.index()]
    }

    /// The single selected display section, if any.
    pub fn lit_section(&self) -> Option<usize> {
        let mut lit = OutPin::GRIDS
            .iter()
            .enumerate()
            .filter(|(_, g)| self.level(**g).is_high())
            .map(|(i, _)| i);
        let first = lit.next();
        assert!(lit.next().is_none(), "more than one section selected");
        first
    }

    /// Segment pattern currently driven onto the anodes.
    pub fn anodes(&self) -> u8 {
        OutPin::ANODES
            .iter()
            .enumerate()
            .filter(|(_, a)| self.level(**a).is_high())
            .fold(0, |acc, (bit, _)| acc | (1 << bit))
    }
}

impl Outputs for MockOutputs {
    fn set(&mut self, pin: OutPin, level: Level) {
        self.levels[pin.index()] = level;
        self.writes += 1;
    }
}

/// Buttons. `true` means held down.
pub struct MockInputs {
    pub mode: bool,
    pub select: bool,
}

impl MockInputs {
    pub fn new() -> Self {
        Self {
            mode: false,
            select: false,
        }
    }
}

impl Inputs for MockInputs {
    fn read(&mut self, pin: InPin) -> Level {
        let pressed = match pin {
            InPin::Mode => self.mode,
            InPin::Select => self.select,
        };
        // Active low.
        (!pressed).into()
    }
}

#[derive(Default)]
pub struct MockTimer {
    pub period: Option<u16>,
    pub running: bool,
    pub configures: usize,
    pub starts: usize,
    pub stops: usize,
}

impl DelayTimer for MockTimer {
    fn configure(&mut self, ticks: u16) {
        assert!(!self.running, "reconfigured while running");
        self.period = Some(ticks);
        self.configures += 1;
    }

    fn start(&mut self) {
        self.running = true;
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.running = false;
        self.stops += 1;
    }
}

pub struct MockAnalog {
    /// Results of the next temperature conversions. `None` never completes.
    pub temps: VecDeque<Option<[u16; 2]>>,
    pub light: Result<u16, SampleError>,
    pending: Option<Option<[u16; 2]>>,
    pub temp_starts: usize,
    pub light_polls: usize,
}

impl MockAnalog {
    pub fn new() -> Self {
        Self {
            temps: VecDeque::new(),
            light: Ok(0),
            pending: None,
            temp_starts: 0,
            light_polls: 0,
        }
    }
}

impl Analog for MockAnalog {
    fn start_temp_conversion(&mut self) {
        self.temp_starts += 1;
        self.pending = Some(self.temps.pop_front().unwrap_or(Some([0, 0])));
    }

    fn temp_conversion(&mut self) -> Option<[u16; 2]> {
        self.pending.flatten()
    }

    fn poll_light(&mut self, _timeout_ms: u32) -> Result<u16, SampleError> {
        self.light_polls += 1;
        self.light
    }
}

pub struct MockStorage {
    pub data: [u8; 4],
    pub writes: Vec<Vec<u8>>,
    pub fail: Option<StorageError>,
}

impl MockStorage {
    pub fn new(data: [u8; 4]) -> Self {
        Self {
            data,
            writes: Vec::new(),
            fail: None,
        }
    }
}

impl Storage for MockStorage {
    fn read(&mut self, buf: &mut [u8]) {
        buf.copy_from_slice(&self.data[..buf.len()]);
    }

    fn write(&mut self, data: &[u8]) -> Result<(), StorageError> {
        self.writes.push(data.to_vec());
        if let Some(e) = self.fail {
            return Err(e);
        }
        self.data[..data.len()].copy_from_slice(data);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockFan {
    pub power: Option<u8>,
    pub history: Vec<u8>,
}

impl FanDrive for MockFan {
    fn set_power(&mut self, percent: u8) {
        self.power = Some(percent);
        self.history.push(percent);
    }
}

/// Snapshot of all display section bytes.
pub fn sections(vfd: &crate::vfd::Vfd) -> [u8; SECTIONS] {
    core::array::from_fn(|i| vfd.section(i))
}

// vim: ts=4 sw=4 expandtab
