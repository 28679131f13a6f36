// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(unused_unsafe)]

use crate::{
    hw::{interrupt, mcu},
    timer::now_ms,
};
use dehyctl::{
    error::StorageError,
    hal::Storage,
    timer::{Millis, RelMillis},
};

const EECR_EERE: u8 = 0x01;
const EECR_EEPE: u8 = 0x02;
const EECR_EEMPE: u8 = 0x04;

/// A byte write cycle takes 3.4 ms.
const WRITE_TIMEOUT: RelMillis = RelMillis::from_millis(10);

/// Configuration record storage at EEPROM address 0.
#[allow(non_snake_case)]
pub struct Eeprom {
    pub EEPROM: mcu::EEPROM,
}

impl Eeprom {
    fn wait_ready(&self) -> Result<(), StorageError> {
        let begin = Millis(now_ms());
        while self.EEPROM.eecr().read().bits() & EECR_EEPE != 0 {
            if Millis(now_ms()) - begin >= WRITE_TIMEOUT {
                return Err(StorageError::Busy);
            }
        }
        Ok(())
    }

    fn read_byte(&self, addr: u16) -> u8 {
        // SAFETY: Valid address and control values.
        unsafe {
            self.EEPROM.eear().write(|w| w.bits(addr));
            self.EEPROM.eecr().write(|w| w.bits(EECR_EERE));
        }
        self.EEPROM.eedr().read().bits()
    }

    fn write_byte(&self, addr: u16, data: u8) -> Result<(), StorageError> {
        self.wait_ready()?;
        // SAFETY: Valid address and data.
        //         EEPE must follow EEMPE within four cycles. Hence the critical section.
        interrupt::free(|_| unsafe {
            self.EEPROM.eear().write(|w| w.bits(addr));
            self.EEPROM.eedr().write(|w| w.bits(data));
            self.EEPROM.eecr().write(|w| w.bits(EECR_EEMPE));
            self.EEPROM.eecr().write(|w| w.bits(EECR_EEMPE | EECR_EEPE));
        });
        Ok(())
    }
}

impl Storage for Eeprom {
    fn read(&mut self, buf: &mut [u8]) {
        if self.wait_ready().is_err() {
            buf.fill(0xFF);
            return;
        }
        for (addr, byte) in buf.iter_mut().enumerate() {
            *byte = self.read_byte(addr as u16);
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<(), StorageError> {
        for (addr, &byte) in data.iter().enumerate() {
            self.wait_ready()?;
            // Spare the cells.
            if self.read_byte(addr as u16) != byte {
                self.write_byte(addr as u16, byte)?;
            }
        }

        self.wait_ready()?;
        for (addr, &byte) in data.iter().enumerate() {
            if self.read_byte(addr as u16) != byte {
                return Err(StorageError::Verify(addr));
            }
        }
        Ok(())
    }
}

// vim: ts=4 sw=4 expandtab
