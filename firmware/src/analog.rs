// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(unused_unsafe)]

use crate::{
    hw::{Mutex, interrupt, mcu},
    mutex::{IrqCtx, MainInitCtx},
    timer::now_ms,
};
use avr_atomic::AvrAtomic;
use core::cell::Cell;
use dehyctl::{
    error::SampleError,
    hal::Analog,
    timer::{Millis, RelMillis},
};

const ADMUX_REFS_AVCC: u8 = 0x40;

const ADCSRA_ADEN: u8 = 0x80;
const ADCSRA_ADSC: u8 = 0x40;
const ADCSRA_ADIF: u8 = 0x10;
const ADCSRA_ADIE: u8 = 0x08;
const ADCSRA_PS64: u8 = 0x06; // 125 kHz ADC clock

const CHAN_LIGHT: u8 = 0; // PC0
/// Ambient and chamber LM35.
const CHAN_TEMP: [u8; 2] = [6, 7];

static TEMP_RESULT: Mutex<[Cell<u16>; 2]> = Mutex::new([Cell::new(0), Cell::new(0)]);
static TEMP_INDEX: Mutex<Cell<u8>> = Mutex::new(Cell::new(0));
static TEMP_BUSY: AvrAtomic<bool> = AvrAtomic::new();
static TEMP_DONE: AvrAtomic<bool> = AvrAtomic::new();

#[inline(always)]
fn regs() -> &'static mcu::adc::RegisterBlock {
    // SAFETY: The register block is always mapped.
    //         The ISR only touches the converter while a temperature conversion is running
    //         and main does not touch it during that time.
    unsafe { &*mcu::ADC::ptr() }
}

#[inline(always)]
fn start(adc: &mcu::adc::RegisterBlock, chan: u8, irq: bool) {
    let ie = if irq { ADCSRA_ADIE } else { 0 };
    // SAFETY: Valid ADMUX and ADCSRA values.
    unsafe {
        adc.admux().write(|w| w.bits(ADMUX_REFS_AVCC | chan));
        adc.adcsra()
            .write(|w| w.bits(ADCSRA_ADEN | ADCSRA_ADSC | ADCSRA_ADIF | ie | ADCSRA_PS64));
    }
}

#[allow(non_snake_case)]
pub struct AdcFrontEnd {
    pub ADC: mcu::ADC,
}

impl AdcFrontEnd {
    #[rustfmt::skip]
    pub fn setup(&self, _: &MainInitCtx) {
        // SAFETY: Called with interrupts disabled. Ensured by &MainInitCtx.
        unsafe {
            self.ADC.didr0().write(|w| w.bits(1 << CHAN_LIGHT));
            self.ADC.adcsra().write(|w| w.bits(ADCSRA_ADEN | ADCSRA_ADIF | ADCSRA_PS64));
        }
    }
}

impl Analog for AdcFrontEnd {
    fn start_temp_conversion(&mut self) {
        interrupt::free(|cs| {
            TEMP_DONE.store(false);
            TEMP_BUSY.store(true);
            TEMP_INDEX.borrow(cs).set(0);
            start(&self.ADC, CHAN_TEMP[0], true);
        });
    }

    fn temp_conversion(&mut self) -> Option<[u16; 2]> {
        if TEMP_DONE.load() {
            Some(interrupt::free(|cs| {
                let r = TEMP_RESULT.borrow(cs);
                [r[0].get(), r[1].get()]
            }))
        } else {
            None
        }
    }

    fn poll_light(&mut self, timeout_ms: u32) -> Result<u16, SampleError> {
        if TEMP_BUSY.load() {
            // Converter still owned by the interrupt.
            return Err(SampleError::Fault);
        }

        start(&self.ADC, CHAN_LIGHT, false);

        let begin = Millis(now_ms());
        while self.ADC.adcsra().read().bits() & ADCSRA_ADIF == 0 {
            if Millis(now_ms()) - begin >= RelMillis::from_millis(timeout_ms) {
                return Err(SampleError::Timeout);
            }
        }
        Ok(self.ADC.adc().read().bits())
    }
}

pub fn irq_handler_adc(c: &IrqCtx) {
    let cs = c.cs();
    let adc = regs();

    let index = TEMP_INDEX.borrow(cs).get() as usize;
    let value = adc.adc().read().bits();
    if let Some(result) = TEMP_RESULT.borrow(cs).get(index) {
        result.set(value);
    }

    let next = index + 1;
    if next < CHAN_TEMP.len() {
        TEMP_INDEX.borrow(cs).set(next as u8);
        start(adc, CHAN_TEMP[next], true);
    } else {
        // SAFETY: Valid ADCSRA value. Disables the interrupt.
        unsafe {
            adc.adcsra()
                .write(|w| w.bits(ADCSRA_ADEN | ADCSRA_ADIF | ADCSRA_PS64));
        }
        TEMP_BUSY.store(false);
        TEMP_DONE.store(true);
    }
}

// vim: ts=4 sw=4 expandtab
