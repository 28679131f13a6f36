// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(unused_unsafe)]

use crate::{
    hw::{F_CPU, mcu},
    mutex::MainInitCtx,
};

const BAUDRATE: u32 = 19200;
const UBRR: u32 = F_CPU / 16 / BAUDRATE - 1;

const UCSR0A_UDRE0: u8 = 0x20;
const UCSR0B_TXEN0: u8 = 0x08;
const UCSR0C_8N1: u8 = 0x06; // UCSZ01 | UCSZ00

#[inline(always)]
fn regs() -> &'static mcu::usart0::RegisterBlock {
    // SAFETY: The register block is always mapped.
    //         The transmitter is only used from main context.
    unsafe { &*mcu::USART0::ptr() }
}

/// Transmit only. The RXD pin is used as a GPIO.
pub fn usart_init(_: &MainInitCtx, usart: &mcu::USART0) {
    // SAFETY: Called with interrupts disabled. Ensured by &MainInitCtx.
    unsafe {
        usart.ubrr0().write(|w| w.bits(UBRR as u16));
        usart.ucsr0c().write(|w| w.bits(UCSR0C_8N1));
        usart.ucsr0b().write(|w| w.bits(UCSR0B_TXEN0));
    }
}

/// Blocking transmit of one byte.
pub fn usart_tx(data: u8) {
    let usart = regs();
    while usart.ucsr0a().read().bits() & UCSR0A_UDRE0 == 0 {}
    // SAFETY: Any data byte is valid.
    unsafe { usart.udr0().write(|w| w.bits(data)) };
}

/// Text output on the USART. Line feeds are sent as CR LF.
pub struct UsartWriter;

impl core::fmt::Write for UsartWriter {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for &b in s.as_bytes() {
            if b == b'\n' {
                usart_tx(b'\r');
            }
            usart_tx(b);
        }
        Ok(())
    }
}

// vim: ts=4 sw=4 expandtab
