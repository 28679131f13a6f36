// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control core of the food dehydrator.
//!
//! Hardware independent. The firmware crate binds it to the MCU.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod button;
pub mod config;
pub mod error;
pub mod hal;
pub mod segment;
pub mod selfcheck;
pub mod sensor;
pub mod system;
pub mod timer;
pub mod triac;
pub mod vfd;

#[cfg(test)]
mod mock;

pub const VERSION_MAJOR: u8 = 1;
pub const VERSION_MINOR: u8 = 4;

// vim: ts=4 sw=4 expandtab
