// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(unused_unsafe)]

use crate::{
    hw::{interrupt, mcu},
    mutex::{CriticalSection, MainInitCtx},
};
use dehyctl::hal::{InPin, Inputs, Level, OutPin, Outputs};

#[rustfmt::skip]
macro_rules! impl_port {
    (
        $struct:ident,
        $name:ident,
        $module:ident,
        $port:ident,
        $pin:ident,
        $ddr:ident
    ) => {
        pub struct $struct;

        impl $struct {
            #[inline(always)]
            fn regs() -> &'static mcu::$module::RegisterBlock {
                // SAFETY: The register block is always mapped.
                //         Read-modify-write accesses only happen with interrupts disabled.
                unsafe { &*mcu::$name::ptr() }
            }

            #[inline(always)]
            #[allow(dead_code)]
            pub fn get(bit: u8) -> bool {
                Self::regs().$pin().read().bits() & (1 << bit) != 0
            }

            #[inline(always)]
            pub fn set(_cs: CriticalSection<'_>, bit: u8, value: bool) {
                Self::regs().$port().modify(|r, w| {
                    let bits = if value {
                        r.bits() | (1 << bit)
                    } else {
                        r.bits() & !(1 << bit)
                    };
                    // SAFETY: Every bit pattern is a valid port state.
                    unsafe { w.bits(bits) }
                });
            }

            pub fn setup(_: &MainInitCtx, port: u8, ddr: u8) {
                // SAFETY: Called with interrupts disabled. Ensured by &MainInitCtx.
                unsafe {
                    Self::regs().$port().write(|w| w.bits(port));
                    Self::regs().$ddr().write(|w| w.bits(ddr));
                }
            }
        }
    };
}

impl_port!(PortB, PORTB, portb, portb, pinb, ddrb);
impl_port!(PortC, PORTC, portc, portc, pinc, ddrc);
impl_port!(PortD, PORTD, portd, portd, pind, ddrd);

#[derive(Copy, Clone)]
enum Port {
    B,
    C,
    D,
}

/// Board location of every logical output, indexed by [OutPin::index].
const OUT_MAP: [(Port, u8); OutPin::COUNT] = [
    (Port::B, 0), // FanDrive
    (Port::D, 0), // StatusLed
    (Port::B, 1), // Grid0
    (Port::B, 2), // Grid1
    (Port::B, 3), // Grid2
    (Port::B, 4), // Grid3
    (Port::B, 5), // Grid4
    (Port::D, 3), // AnodeA
    (Port::D, 4), // AnodeB
    (Port::D, 5), // AnodeC
    (Port::D, 6), // AnodeD
    (Port::D, 7), // AnodeE
    (Port::C, 1), // AnodeF
    (Port::C, 2), // AnodeG
    (Port::C, 3), // DotH
    (Port::C, 4), // DotL
];

const MODE_BIT: u8 = 6; // PB6
const SELECT_BIT: u8 = 7; // PB7

fn pin_input(_bit: usize) -> u8 {
    0
}
fn pin_output(bit: usize) -> u8 {
    1 << bit
}
fn pin_low(_bit: usize) -> u8 {
    0
}
fn pin_high(bit: usize) -> u8 {
    1 << bit
}
fn pin_floating(_bit: usize) -> u8 {
    0
}
fn pin_pullup(bit: usize) -> u8 {
    1 << bit
}

#[inline(always)]
pub fn write_pin(cs: CriticalSection<'_>, pin: OutPin, level: Level) {
    let (port, bit) = OUT_MAP[pin.index()];
    let value = level.is_high();
    match port {
        Port::B => PortB::set(cs, bit, value),
        Port::C => PortC::set(cs, bit, value),
        Port::D => PortD::set(cs, bit, value),
    }
}

/// Logical output pins. Usable from any context.
pub struct PortOutputs;

impl Outputs for PortOutputs {
    #[inline(always)]
    fn set(&mut self, pin: OutPin, level: Level) {
        interrupt::free(|cs| write_pin(cs, pin, level));
    }
}

/// The two push buttons.
pub struct ButtonInputs;

impl Inputs for ButtonInputs {
    fn read(&mut self, pin: InPin) -> Level {
        let bit = match pin {
            InPin::Mode => MODE_BIT,
            InPin::Select => SELECT_BIT,
        };
        PortB::get(bit).into()
    }
}

#[rustfmt::skip]
pub fn ports_init(c: &MainInitCtx) {
    PortB::setup(
        c,
        pin_low(0) | // fan triac gate
        pin_low(1) | // grid 0
        pin_low(2) | // grid 1
        pin_low(3) | // grid 2
        pin_low(4) | // grid 3
        pin_low(5) | // grid 4
        pin_pullup(6) | // mode button, active low
        pin_pullup(7), // select button, active low
        pin_output(0) |
        pin_output(1) |
        pin_output(2) |
        pin_output(3) |
        pin_output(4) |
        pin_output(5) |
        pin_input(6) |
        pin_input(7),
    );
    PortC::setup(
        c,
        pin_floating(0) | // light sensor, ADC0
        pin_low(1) | // anode F
        pin_low(2) | // anode G
        pin_low(3) | // dot H
        pin_low(4) | // dot L
        pin_low(5) | // DNC
        pin_floating(6) | // RESET
        pin_floating(7),
        pin_input(0) |
        pin_output(1) |
        pin_output(2) |
        pin_output(3) |
        pin_output(4) |
        pin_output(5) |
        pin_input(6) |
        pin_input(7),
    );
    PortD::setup(
        c,
        pin_low(0) | // status LED
        pin_high(1) | // UART TXD
        pin_floating(2) | // zero cross detector, INT0
        pin_low(3) | // anode A
        pin_low(4) | // anode B
        pin_low(5) | // anode C
        pin_low(6) | // anode D
        pin_low(7), // anode E
        pin_output(0) |
        pin_output(1) |
        pin_input(2) |
        pin_output(3) |
        pin_output(4) |
        pin_output(5) |
        pin_output(6) |
        pin_output(7),
    );
}

// vim: ts=4 sw=4 expandtab
