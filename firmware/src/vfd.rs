// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(unused_unsafe)]

use crate::{
    hw::{F_CPU, Mutex, mcu},
    mutex::{IrqCtx, MainInitCtx},
    ports::PortOutputs,
};
use core::cell::Cell;
use dehyctl::vfd::{Multiplexer, Vfd};

const PRESCALER: u32 = 8;
const REFRESH_HZ: u32 = 4000;
const OCR: u32 = F_CPU / PRESCALER / REFRESH_HZ - 1;
const _: () = assert!(OCR <= 0xFF);

/// The display contents.
pub static VFD: Vfd = Vfd::new();

static MUX: Mutex<Cell<Multiplexer>> = Mutex::new(Cell::new(Multiplexer::new()));

#[rustfmt::skip]
pub fn vfd_init(_: &MainInitCtx, tc2: &mcu::TC2) {
    VFD.clear();

    // Timer 2 configuration:
    // CTC mode, CS: 8 -> 4 kHz refresh tick.
    // SAFETY: Called with interrupts disabled. Ensured by &MainInitCtx.
    unsafe {
        tc2.tccr2b().write(|w| w.bits(0));
        tc2.tcnt2().write(|w| w.bits(0));
        tc2.ocr2a().write(|w| w.bits(OCR as u8));
        tc2.tccr2a().write(|w| w.bits(0x02)); // WGM21
        tc2.tifr2().write(|w| w.bits(0x07));
        tc2.timsk2().write(|w| w.bits(0x02)); // OCIE2A
        tc2.tccr2b().write(|w| w.bits(0x02)); // CS21
    }
}

pub fn irq_handler_timer2_compa(c: &IrqCtx) {
    let mux = MUX.borrow(c.cs());
    let mut m = mux.get();
    m.tick(&VFD, &mut PortOutputs);
    mux.set(m);
}

// vim: ts=4 sw=4 expandtab
