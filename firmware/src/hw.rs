// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

pub use atmega::{self as mcu, Peripherals};
pub use avr_device::atmega328p as atmega;
pub use avr_device::interrupt::{self, Mutex};

use crate::mutex::IrqCtx;

/// CPU clock. Internal RC oscillator.
pub const F_CPU: u32 = 8_000_000;

macro_rules! define_isr {
    ($name:ident, $handler:path) => {
        #[avr_device::interrupt(atmega328p)]
        fn $name() {
            // SAFETY: We are inside of an interrupt handler.
            // Therefore, it is safe to construct an `IrqCtx`.
            let c = unsafe { IrqCtx::new() };
            $handler(&c);
        }
    };
}

define_isr!(INT0, crate::exint::irq_handler_int0);
define_isr!(TIMER0_COMPA, crate::timer::irq_handler_timer0_compa);
define_isr!(TIMER1_COMPA, crate::triac::irq_handler_timer1_compa);
define_isr!(TIMER2_COMPA, crate::vfd::irq_handler_timer2_compa);
define_isr!(ADC, crate::analog::irq_handler_adc);

// vim: ts=4 sw=4 expandtab
