// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]
#![feature(asm_experimental_arch)]

mod analog;
mod eeprom;
mod exint;
mod hw;
mod logger;
mod mutex;
mod ports;
mod timer;
mod triac;
mod usart;
mod vfd;

use crate::{
    analog::AdcFrontEnd,
    eeprom::Eeprom,
    exint::ExInt,
    hw::{Peripherals, interrupt, mcu},
    logger::logger_init,
    mutex::{MainCtx, reset_system, unwrap_option},
    ports::{ButtonInputs, PortOutputs, ports_init},
    timer::{SysClock, timer_init},
    triac::{TriacDrive, triac_init},
    usart::usart_init,
    vfd::{VFD, vfd_init},
};
use avr_stack::estimate_unused_stack_space;
use dehyctl::{
    VERSION_MAJOR, VERSION_MINOR,
    config::Configuration,
    system::{SysPeriph, System},
};

/// Minimum amount of CPU stack space that must be free all the time.
const MIN_STACK_SPACE: u16 = 32;

fn wdt_init() {
    // SAFETY: The asm code only accesses the WDT registers
    //         which are not accessed from anywhere else in the program.
    //         Interrupts are still disabled, so the timed sequence holds.
    unsafe {
        // Enable WDT with timeout 0.5 s
        core::arch::asm!(
            "ldi {tmp}, 0x18", // WDCE=1, WDE=1
            "sts {WDTCSR}, {tmp}",
            "ldi {tmp}, 0x0D", // WDE=1, WDP2=1, WDP1=0, WDP0=1
            "sts {WDTCSR}, {tmp}",
            tmp = out(reg_upper) _,
            WDTCSR = const 0x60,
            options(nostack, preserves_flags)
        );
    }
}

fn wdt_poke(_wp: &mcu::WDT) {
    avr_device::asm::wdr();
}

/// Checks and watchdog service after every main loop pass.
fn main_loop_tail(wp: &mcu::WDT) {
    if estimate_unused_stack_space() < MIN_STACK_SPACE {
        reset_system();
    }
    wdt_poke(wp);
}

#[avr_device::entry]
fn main() -> ! {
    wdt_init();

    let dp = unwrap_option(Peripherals::take());

    let exint = ExInt { EXINT: dp.EXINT };
    let analog = AdcFrontEnd { ADC: dp.ADC };

    let init_static_vars = |c| {
        ports_init(c);
        usart_init(c, &dp.USART0);
        logger_init(c);
        timer_init(c, &dp.TC0);
        vfd_init(c, &dp.TC2);
        triac_init(c);
        analog.setup(c);
        exint.setup(c);
    };

    // # SAFETY
    //
    // This is the context handle for the main() function.
    // Holding a reference to this object proves that the holder
    // is running in main() context.
    let _m = unsafe { MainCtx::new_with_init(init_static_vars) };

    // SAFETY: This must be after construction of MainCtx
    //         and after initialization of static variables.
    unsafe { interrupt::enable() };

    log::info!("dehyctl {VERSION_MAJOR}.{VERSION_MINOR}");

    let mut sp = SysPeriph {
        clock: SysClock,
        inputs: ButtonInputs,
        outputs: PortOutputs,
        analog,
        storage: Eeprom { EEPROM: dp.EEPROM },
        fan: TriacDrive,
        vfd: &VFD,
    };

    let conf = Configuration::load(&mut sp.storage);

    #[cfg(feature = "selfcheck")]
    {
        let mut check = dehyctl::selfcheck::SelfCheck::new();
        while !check.is_done() {
            check.run(&mut sp);
            main_loop_tail(&dp.WDT);
        }
    }

    let mut system = System::new(conf);
    loop {
        system.run(&mut sp);
        main_loop_tail(&dp.WDT);
    }
}

// vim: ts=4 sw=4 expandtab
