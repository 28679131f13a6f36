// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Narrow interfaces to the board peripherals.
//!
//! The control core never touches registers.
//! The firmware implements these traits on top of the MCU.

use crate::error::{SampleError, StorageError};

/// Electrical level of a digital pin.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(on: bool) -> Self {
        if on { Level::High } else { Level::Low }
    }
}

impl Level {
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

/// Logical output pins.
///
/// The discriminant is the index into the board pin table.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum OutPin {
    /// Triac gate drive.
    FanDrive,
    /// Heartbeat LED.
    StatusLed,
    Grid0,
    Grid1,
    Grid2,
    Grid3,
    Grid4,
    AnodeA,
    AnodeB,
    AnodeC,
    AnodeD,
    AnodeE,
    AnodeF,
    AnodeG,
    DotH,
    DotL,
}

impl OutPin {
    pub const COUNT: usize = OutPin::DotL as usize + 1;

    /// Section select outputs, indexed by physical display section.
    pub const GRIDS: [OutPin; 5] = [
        OutPin::Grid0,
        OutPin::Grid1,
        OutPin::Grid2,
        OutPin::Grid3,
        OutPin::Grid4,
    ];

    /// Segment anode outputs, indexed by segment bit number.
    pub const ANODES: [OutPin; 7] = [
        OutPin::AnodeA,
        OutPin::AnodeB,
        OutPin::AnodeC,
        OutPin::AnodeD,
        OutPin::AnodeE,
        OutPin::AnodeF,
        OutPin::AnodeG,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Logical input pins.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum InPin {
    /// Fan speed preset button.
    Mode,
    /// Temperature threshold button.
    Select,
}

/// Monotonic millisecond clock. Wraps at `u32::MAX`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// Digital outputs.
pub trait Outputs {
    fn set(&mut self, pin: OutPin, level: Level);
}

/// Digital inputs.
pub trait Inputs {
    fn read(&mut self, pin: InPin) -> Level;
}

/// One-shot timer that raises the delay-elapsed interrupt.
pub trait DelayTimer {
    /// Set the period in delay ticks. The timer is not started.
    fn configure(&mut self, ticks: u16);
    /// Reset the counter and enable the elapsed interrupt.
    fn start(&mut self);
    /// Disable the elapsed interrupt and halt the counter.
    fn stop(&mut self);
}

/// Analog front end.
pub trait Analog {
    /// Start the dual-channel temperature conversion.
    /// Completion is signalled asynchronously.
    fn start_temp_conversion(&mut self);

    /// Raw results `[ambient, chamber]` once the conversion has completed.
    fn temp_conversion(&mut self) -> Option<[u16; 2]>;

    /// Single-shot light sensor conversion, polled for at most `timeout_ms`.
    fn poll_light(&mut self, timeout_ms: u32) -> Result<u16, SampleError>;
}

/// Raw non-volatile storage block.
pub trait Storage {
    fn read(&mut self, buf: &mut [u8]);
    fn write(&mut self, data: &[u8]) -> Result<(), StorageError>;
}

/// Anything that accepts a fan power command in percent.
pub trait FanDrive {
    fn set_power(&mut self, percent: u8);
}

// vim: ts=4 sw=4 expandtab
