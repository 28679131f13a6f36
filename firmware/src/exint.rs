// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(unused_unsafe)]

use crate::{
    hw::mcu,
    mutex::{IrqCtx, MainInitCtx},
};

const EICRA_ISC01: u8 = 0x02; // INT0 falling edge
const EIFR_INTF0: u8 = 0x01;
const EIMSK_INT0: u8 = 0x01;

#[allow(non_snake_case)]
pub struct ExInt {
    pub EXINT: mcu::EXINT,
}

impl ExInt {
    /// Zero cross detector on INT0.
    pub fn setup(&self, _: &MainInitCtx) {
        // SAFETY: Called with interrupts disabled. Ensured by &MainInitCtx.
        unsafe {
            self.EXINT.eicra().write(|w| w.bits(EICRA_ISC01));
            self.EXINT.eifr().write(|w| w.bits(EIFR_INTF0));
            self.EXINT.eimsk().write(|w| w.bits(EIMSK_INT0));
        }
    }
}

pub fn irq_handler_int0(c: &IrqCtx) {
    crate::triac::triac_zero_cross(c);
}

// vim: ts=4 sw=4 expandtab
