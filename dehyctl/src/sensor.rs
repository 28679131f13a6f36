// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    error::SampleError,
    hal::{Analog, Clock},
    timer::{Millis, RelMillis},
};
use curveipo::Curve;

/// Full scale of the 10 bit converter.
const ADC_MAX: i32 = 0x3FF;
/// Converter reference voltage, in 10 mV units.
const ADC_UREF_10MV: i32 = 500;

/// Maximum wait for the dual temperature conversion.
pub const TEMP_CONV_TIMEOUT: RelMillis = RelMillis::from_millis(20);
/// Maximum wait for the light conversion.
pub const LIGHT_POLL_TIMEOUT_MS: u32 = 200;

/// Integer curve point value.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Ipo(i32);

impl curveipo::CurvePoint<Ipo> for (Ipo, Ipo) {
    fn x(&self) -> Ipo {
        self.0
    }

    fn y(&self) -> Ipo {
        self.1
    }
}

impl curveipo::CurveIpo for Ipo {
    fn lin_inter(
        &self,
        left: &impl curveipo::CurvePoint<Self>,
        right: &impl curveipo::CurvePoint<Self>,
    ) -> Self {
        let dx = right.x().0 - left.x().0;
        let dy = right.y().0 - left.y().0;
        if dx == 0 {
            left.y()
        } else {
            Ipo((self.0 - left.x().0) * dy / dx + left.y().0)
        }
    }
}

const LM35_CURVE: Curve<Ipo, (Ipo, Ipo), 2> = Curve::new([
    // (adc, deg Celsius), 10 mV per degree
    (Ipo(0), Ipo(0)),
    (Ipo(ADC_MAX), Ipo(ADC_UREF_10MV)),
]);

const LIGHT_CURVE: Curve<Ipo, (Ipo, Ipo), 2> = Curve::new([
    // (adc, percent)
    (Ipo(0), Ipo(0)),
    (Ipo(ADC_MAX), Ipo(100)),
]);

fn saturate_u8(v: Ipo) -> u8 {
    v.0.clamp(0, u8::MAX as i32) as u8
}

/// Convert a temperature sensor ADC value to degree Celsius.
pub fn adc_to_celsius(adc: u16) -> u8 {
    saturate_u8(LM35_CURVE.lin_inter(Ipo(adc as i32)))
}

/// Convert a light sensor ADC value to percent.
pub fn adc_to_light(adc: u16) -> u8 {
    saturate_u8(LIGHT_CURVE.lin_inter(Ipo(adc as i32)))
}

#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Temperatures {
    pub ambient: u8,
    pub chamber: u8,
}

/// Run the dual temperature conversion and wait for its completion.
///
/// The wait is bounded by [TEMP_CONV_TIMEOUT].
pub fn sample_temperatures(
    clock: &impl Clock,
    analog: &mut impl Analog,
) -> Result<Temperatures, SampleError> {
    analog.start_temp_conversion();
    let start = Millis(clock.now_ms());
    loop {
        if let Some([ambient, chamber]) = analog.temp_conversion() {
            return Ok(Temperatures {
                ambient: adc_to_celsius(ambient),
                chamber: adc_to_celsius(chamber),
            });
        }
        if Millis(clock.now_ms()) - start >= TEMP_CONV_TIMEOUT {
            return Err(SampleError::Timeout);
        }
    }
}

/// Light level in percent.
///
/// A converter fault reads as 0 and a timeout as 1.
pub fn sample_light(analog: &mut impl Analog) -> u8 {
    match analog.poll_light(LIGHT_POLL_TIMEOUT_MS) {
        Ok(adc) => adc_to_light(adc),
        Err(SampleError::Fault) => 0,
        Err(SampleError::Timeout) => 1,
    }
}


// vim: ts=4 sw=4 expandtab
