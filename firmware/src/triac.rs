// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(unused_unsafe)]

use crate::{
    hw::{Mutex, interrupt, mcu},
    mutex::{CriticalSection, IrqCtx, MainInitCtx, unwrap_result},
    ports::PortOutputs,
};
use core::cell::RefCell;
use dehyctl::{
    hal::{DelayTimer, FanDrive},
    triac::PhaseController,
};

/// Timer 1 counts per delay tick. CS: 8 -> 1 us per count, 100 us per delay tick.
const COUNTS_PER_TICK: u16 = 100;

const TCCR1B_CTC: u8 = 0x08; // WGM12
const TCCR1B_CS8: u8 = 0x02; // CS11
const TIMSK1_OCIE1A: u8 = 0x02;
const TIFR1_OCF1A: u8 = 0x02;

/// One-shot firing delay timer on Timer 1.
pub struct DelayTimer1;

impl DelayTimer1 {
    #[inline(always)]
    fn regs() -> &'static mcu::tc1::RegisterBlock {
        // SAFETY: The register block is always mapped.
        //         Timer 1 is only accessed through the TRIAC mutex.
        unsafe { &*mcu::TC1::ptr() }
    }
}

impl DelayTimer for DelayTimer1 {
    fn configure(&mut self, ticks: u16) {
        let ocr = ticks.saturating_mul(COUNTS_PER_TICK).max(1);
        let tc1 = Self::regs();
        // SAFETY: The timer is stopped.
        unsafe {
            tc1.tccr1a().write(|w| w.bits(0));
            tc1.tccr1b().write(|w| w.bits(TCCR1B_CTC));
            tc1.ocr1a().write(|w| w.bits(ocr));
        }
    }

    fn start(&mut self) {
        let tc1 = Self::regs();
        // SAFETY: Only called with interrupts disabled.
        unsafe {
            tc1.tcnt1().write(|w| w.bits(0));
            tc1.tifr1().write(|w| w.bits(TIFR1_OCF1A));
            tc1.timsk1().write(|w| w.bits(TIMSK1_OCIE1A));
            tc1.tccr1b().write(|w| w.bits(TCCR1B_CTC | TCCR1B_CS8));
        }
    }

    fn stop(&mut self) {
        let tc1 = Self::regs();
        // SAFETY: Only called with interrupts disabled.
        unsafe {
            tc1.tccr1b().write(|w| w.bits(TCCR1B_CTC));
            tc1.timsk1().write(|w| w.bits(0));
            tc1.tifr1().write(|w| w.bits(TIFR1_OCF1A));
        }
    }
}

pub type Triac = PhaseController<DelayTimer1, PortOutputs>;

static TRIAC: Mutex<RefCell<Triac>> =
    Mutex::new(RefCell::new(PhaseController::new(DelayTimer1, PortOutputs)));

#[inline(always)]
fn with_triac<F, R>(cs: CriticalSection<'_>, f: F) -> R
where
    F: FnOnce(&mut Triac) -> R,
{
    // Cannot fail. Every borrow happens with interrupts disabled.
    let mut triac = unwrap_result(TRIAC.borrow(cs).try_borrow_mut());
    f(&mut triac)
}

pub fn triac_init(_: &MainInitCtx) {
    interrupt::free(|cs| with_triac(cs, |t| t.init()));
}

/// Mains zero crossing. Called from the INT0 handler.
pub fn triac_zero_cross(c: &IrqCtx) {
    with_triac(c.cs(), |t| t.on_zero_cross());
}

pub fn irq_handler_timer1_compa(c: &IrqCtx) {
    with_triac(c.cs(), |t| t.on_delay_elapsed());
}

/// Main context handle to the fan drive.
pub struct TriacDrive;

impl FanDrive for TriacDrive {
    fn set_power(&mut self, percent: u8) {
        interrupt::free(|cs| with_triac(cs, |t| t.set_power(percent)));
    }
}

// vim: ts=4 sw=4 expandtab
