// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use derive_more::{Add, AddAssign, From};

/// Absolute millisecond time stamp. Wraps around.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, From)]
pub struct Millis(pub u32);

/// Relative millisecond duration.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Debug, Add, AddAssign, From)]
pub struct RelMillis(pub u32);

impl Millis {
    #[inline]
    pub const fn new() -> Self {
        Millis(0)
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl RelMillis {
    #[inline]
    pub const fn from_millis(ms: u32) -> Self {
        RelMillis(ms)
    }

    #[inline]
    pub const fn as_millis(self) -> u32 {
        self.0
    }
}

impl core::ops::Add<RelMillis> for Millis {
    type Output = Self;

    #[inline]
    fn add(self, other: RelMillis) -> Self::Output {
        Millis(self.0.wrapping_add(other.0))
    }
}

impl core::ops::Sub for Millis {
    type Output = RelMillis;

    #[inline]
    fn sub(self, other: Self) -> Self::Output {
        RelMillis(self.0.wrapping_sub(other.0))
    }
}

/// Fixed-period software timer polled from the main loop.
pub struct PeriodicTimer {
    period: RelMillis,
    prev: Millis,
}

impl PeriodicTimer {
    pub const fn new(period: RelMillis) -> Self {
        Self {
            period,
            prev: Millis::new(),
        }
    }

    /// Returns true, if the timer is due.
    ///
    /// A timer that never fired is always due.
    pub fn update(&mut self, now: Millis) -> bool {
        if now - self.prev >= self.period || self.prev.is_zero() {
            self.prev = now;
            true
        } else {
            false
        }
    }

    pub fn period(&self) -> RelMillis {
        self.period
    }
}


// vim: ts=4 sw=4 expandtab
