// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Number of physical display sections.
pub const SECTIONS: usize = 5;

/// The middle section only carries the two dots of the colon.
pub const DOT_SECTION: usize = 2;

pub const SEG_A: u8 = 0x01;
pub const SEG_B: u8 = 0x02;
pub const SEG_C: u8 = 0x04;
pub const SEG_D: u8 = 0x08;
pub const SEG_E: u8 = 0x10;
pub const SEG_F: u8 = 0x20;
pub const SEG_G: u8 = 0x40;

pub const DOT_H: u8 = 0x01;
pub const DOT_L: u8 = 0x02;

/// Digit to segment pattern. Bit 0 is segment A.
#[rustfmt::skip]
const DIGIT_SEGMENTS: [u8; 16] = [
    0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07,
    0x7F, 0x6F, 0x77, 0x7C, 0x39, 0x5E, 0x79, 0x71,
];

/// Segment pattern for a single hex digit.
#[inline]
pub const fn digit_segments(digit: u8) -> u8 {
    DIGIT_SEGMENTS[(digit & 0x0F) as usize]
}

/// A two-digit field on the display.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Field {
    Left,
    Right,
}

impl Field {
    /// Physical sections `(tens, ones)` of this field.
    pub const fn sections(self) -> (usize, usize) {
        match self {
            Field::Left => (4, 3),
            Field::Right => (1, 0),
        }
    }
}

/// Segment patterns `(tens, ones)` of a two-digit number.
///
/// Values above 99 keep the two least significant digits.
pub const fn encode_number(num: u8) -> (u8, u8) {
    let tens = (num / 10) % 10;
    let ones = num % 10;
    (digit_segments(tens), digit_segments(ones))
}

/// Physical section of a custom digit position.
///
/// Positions above 1 skip the dot section.
pub const fn custom_section(digit: u8) -> usize {
    let digit = digit as usize;
    let section = if digit > 1 { digit + 1 } else { digit };
    section % SECTIONS
}


// vim: ts=4 sw=4 expandtab
