// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    hal::{Level, OutPin, Outputs},
    segment::{
        DOT_H, DOT_L, DOT_SECTION, Field, SECTIONS, custom_section, encode_number,
    },
};
use portable_atomic::{AtomicU8, Ordering};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Brightness {
    Min,
    P25,
    P50,
    Max,
}

impl Brightness {
    pub const ALL: [Brightness; 4] = [
        Brightness::Min,
        Brightness::P25,
        Brightness::P50,
        Brightness::Max,
    ];

    /// Number of refresh ticks skipped between two section advances.
    pub const fn skip_threshold(self) -> u8 {
        match self {
            Brightness::Min => 4,
            Brightness::P25 => 3,
            Brightness::P50 => 2,
            Brightness::Max => 0,
        }
    }
}

/// Display buffer shared between the main loop and the refresh interrupt.
///
/// Every section is a single byte, so the refresh interrupt
/// can never observe a torn value.
pub struct Vfd {
    sections: [AtomicU8; SECTIONS],
    skip_threshold: AtomicU8,
}

impl Vfd {
    pub const fn new() -> Self {
        Self {
            sections: [const { AtomicU8::new(0) }; SECTIONS],
            skip_threshold: AtomicU8::new(Brightness::Max.skip_threshold()),
        }
    }

    #[inline]
    fn write(&self, section: usize, value: u8) {
        self.sections[section].store(value, Ordering::Relaxed);
    }

    #[inline]
    pub fn section(&self, section: usize) -> u8 {
        self.sections[section % SECTIONS].load(Ordering::Relaxed)
    }

    /// Write a raw segment pattern to a custom digit position.
    pub fn light_custom(&self, digit: u8, segments: u8) {
        self.write(custom_section(digit), segments);
    }

    /// Set the colon dots. See [DOT_H] and [DOT_L].
    pub fn light_dots(&self, dots: u8) {
        self.write(DOT_SECTION, dots & (DOT_H | DOT_L));
    }

    pub fn print(&self, field: Field, num: u8) {
        let (tens, ones) = field.sections();
        let (tens_segs, ones_segs) = encode_number(num);
        self.write(tens, tens_segs);
        self.write(ones, ones_segs);
    }

    pub fn print_left(&self, num: u8) {
        self.print(Field::Left, num);
    }

    pub fn print_right(&self, num: u8) {
        self.print(Field::Right, num);
    }

    /// Blank one two-digit field.
    pub fn clear_field(&self, field: Field) {
        let (tens, ones) = field.sections();
        self.write(tens, 0);
        self.write(ones, 0);
    }

    pub fn clear(&self) {
        for section in 0..SECTIONS {
            self.write(section, 0);
        }
    }

    pub fn set_brightness(&self, brightness: Brightness) {
        self.skip_threshold
            .store(brightness.skip_threshold(), Ordering::Relaxed);
    }

    pub fn skip_threshold(&self) -> u8 {
        self.skip_threshold.load(Ordering::Relaxed)
    }
}

impl Default for Vfd {
    fn default() -> Self {
        Self::new()
    }
}

/// Refresh state machine. Owned by the refresh interrupt.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Multiplexer {
    section: u8,
    skip_counter: u8,
}

impl Multiplexer {
    pub const fn new() -> Self {
        Self {
            section: 0,
            skip_counter: 0,
        }
    }

    /// Currently selected section.
    pub fn section(&self) -> usize {
        self.section as usize
    }

    /// Run one refresh tick.
    ///
    /// All section selects are released first.
    /// Skipped ticks leave the display dark.
    pub fn tick(&mut self, vfd: &Vfd, out: &mut impl Outputs) {
        for grid in OutPin::GRIDS {
            out.set(grid, Level::Low);
        }

        if self.skip_counter >= vfd.skip_threshold() {
            self.skip_counter = 0;
        } else {
            self.skip_counter += 1;
            return;
        }

        self.section = (self.section + 1) % SECTIONS as u8;
        let section = self.section as usize;
        let value = vfd.section(section);

        if section == DOT_SECTION {
            out.set(OutPin::DotH, (value & DOT_H != 0).into());
            out.set(OutPin::DotL, (value & DOT_L != 0).into());
        } else {
            for (bit, anode) in OutPin::ANODES.iter().enumerate() {
                out.set(*anode, (value & (1 << bit) != 0).into());
            }
        }

        out.set(OutPin::GRIDS[section], Level::High);
    }
}

impl Default for Multiplexer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        mock::{MockOutputs, sections},
        segment::{SEG_B, SEG_C, SEG_G, digit_segments},
    };

    #[test]
    fn test_print_fields() {
        let vfd = Vfd::new();
        vfd.print_left(37);
        assert_eq!(vfd.section(4), digit_segments(3));
        assert_eq!(vfd.section(3), digit_segments(7));
        vfd.print_right(37);
        assert_eq!(vfd.section(1), digit_segments(3));
        assert_eq!(vfd.section(0), digit_segments(7));
        assert_eq!(vfd.section(DOT_SECTION), 0);

        vfd.clear();
        assert_eq!(sections(&vfd), [0; SECTIONS]);
    }

    #[test]
    fn test_custom_and_dots() {
        let vfd = Vfd::new();
        vfd.light_custom(1, SEG_B | SEG_C);
        vfd.light_custom(2, SEG_G);
        vfd.light_dots(0xF);
        assert_eq!(sections(&vfd), [0, SEG_B | SEG_C, DOT_H | DOT_L, SEG_G, 0]);

        vfd.print_left(12);
        vfd.clear_field(Field::Left);
        assert_eq!(vfd.section(4), 0);
        assert_eq!(vfd.section(3), 0);
        assert_eq!(vfd.section(1), SEG_B | SEG_C);
    }

    #[test]
    fn test_mux_full_brightness() {
        let vfd = Vfd::new();
        let mut out = MockOutputs::new();
        let mut mux = Multiplexer::new();
        vfd.print_left(12);
        vfd.print_right(34);

        let mut seen = [0; 10];
        for (i, s) in seen.iter_mut().enumerate() {
            mux.tick(&vfd, &mut out);
            *s = out.lit_section().unwrap();
            if *s != DOT_SECTION {
                assert_eq!(out.anodes(), vfd.section(*s), "tick {i}");
            }
        }
        assert_eq!(seen, [1, 2, 3, 4, 0, 1, 2, 3, 4, 0]);
    }

    #[test]
    fn test_mux_skip_threshold() {
        let vfd = Vfd::new();
        vfd.set_brightness(Brightness::P50);
        assert_eq!(vfd.skip_threshold(), 2);
        let mut out = MockOutputs::new();
        let mut mux = Multiplexer::new();

        let mut advances = [0; 5];
        let mut n = 0;
        for tick in 0..15 {
            let before = mux.section();
            mux.tick(&vfd, &mut out);
            if mux.section() != before {
                advances[n] = mux.section();
                n += 1;
                assert_eq!(tick % 3, 2);
                assert_eq!(out.lit_section(), Some(mux.section()));
            } else {
                // Skipped ticks are dark.
                assert_eq!(out.lit_section(), None);
            }
        }
        assert_eq!(n, 5);
        assert_eq!(advances, [1, 2, 3, 4, 0]);
    }

    #[test]
    fn test_mux_dot_section() {
        let vfd = Vfd::new();
        let mut out = MockOutputs::new();
        let mut mux = Multiplexer::new();
        vfd.print_right(88);
        vfd.light_dots(DOT_L);

        // Section 1: segments driven.
        mux.tick(&vfd, &mut out);
        assert_eq!(out.lit_section(), Some(1));
        assert_eq!(out.anodes(), digit_segments(8));

        // Section 2: only the dots are driven.
        let writes = out.writes;
        mux.tick(&vfd, &mut out);
        assert_eq!(out.lit_section(), Some(2));
        assert_eq!(out.level(OutPin::DotH), Level::Low);
        assert_eq!(out.level(OutPin::DotL), Level::High);
        assert_eq!(out.writes - writes, OutPin::GRIDS.len() + 2 + 1);
        assert_eq!(out.anodes(), digit_segments(8));
    }

    #[test]
    fn test_mux_brightness_change_resets_counter() {
        let vfd = Vfd::new();
        vfd.set_brightness(Brightness::Min);
        let mut out = MockOutputs::new();
        let mut mux = Multiplexer::new();
        for _ in 0..3 {
            mux.tick(&vfd, &mut out);
        }
        assert_eq!(mux.section(), 0);

        vfd.set_brightness(Brightness::P50);
        mux.tick(&vfd, &mut out);
        assert_eq!(mux.section(), 1);

        vfd.set_brightness(Brightness::Max);
        mux.tick(&vfd, &mut out);
        assert_eq!(mux.section(), 2);
    }
}

// vim: ts=4 sw=4 expandtab
