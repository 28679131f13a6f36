// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(unused_unsafe)]

use crate::{
    hw::{F_CPU, Mutex, interrupt, mcu},
    mutex::{IrqCtx, MainInitCtx},
};
use core::cell::Cell;
use dehyctl::hal::Clock;

const PRESCALER: u32 = 64;
const TICK_HZ: u32 = 1000;
const OCR: u32 = F_CPU / PRESCALER / TICK_HZ - 1;
const _: () = assert!(OCR <= 0xFF);

/// Milliseconds since reset.
///
/// Starts at 1, because zero marks a software timer that never fired.
static TICKS: Mutex<Cell<u32>> = Mutex::new(Cell::new(1));

#[rustfmt::skip]
pub fn timer_init(_: &MainInitCtx, tc0: &mcu::TC0) {
    // Timer 0 configuration:
    // CTC mode, CS: 64 -> 1 ms compare match period.
    // SAFETY: Called with interrupts disabled. Ensured by &MainInitCtx.
    unsafe {
        tc0.tccr0b().write(|w| w.bits(0));
        tc0.tcnt0().write(|w| w.bits(0));
        tc0.ocr0a().write(|w| w.bits(OCR as u8));
        tc0.tccr0a().write(|w| w.bits(0x02)); // WGM01
        tc0.tifr0().write(|w| w.bits(0x07));
        tc0.timsk0().write(|w| w.bits(0x02)); // OCIE0A
        tc0.tccr0b().write(|w| w.bits(0x03)); // CS01 | CS00
    }
}

pub fn irq_handler_timer0_compa(c: &IrqCtx) {
    let ticks = TICKS.borrow(c.cs());
    ticks.set(ticks.get().wrapping_add(1));
}

#[inline(never)]
pub fn now_ms() -> u32 {
    interrupt::free(|cs| TICKS.borrow(cs).get())
}

/// The system millisecond clock.
pub struct SysClock;

impl Clock for SysClock {
    #[inline(always)]
    fn now_ms(&self) -> u32 {
        now_ms()
    }
}

// vim: ts=4 sw=4 expandtab
