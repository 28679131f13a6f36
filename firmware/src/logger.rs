// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{mutex::MainInitCtx, timer::now_ms, usart::UsartWriter};
use core::fmt::Write as _;
use log::{LevelFilter, Log, Metadata, Record};

/// Debug level records would be sent with interrupts disabled.
const MAX_LEVEL: LevelFilter = LevelFilter::Info;

struct UsartLogger;

impl Log for UsartLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(
                UsartWriter,
                "[{}] {}: {}",
                now_ms(),
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

static LOGGER: UsartLogger = UsartLogger;

/// Install the USART log sink.
///
/// Without the `debug` feature nothing is installed and the max level stays `Off`.
pub fn logger_init(_: &MainInitCtx) {
    if cfg!(feature = "debug") {
        // SAFETY: Called with interrupts disabled. Ensured by &MainInitCtx.
        //         No other thread of execution can race with these calls.
        unsafe {
            if log::set_logger_racy(&LOGGER).is_ok() {
                log::set_max_level_racy(MAX_LEVEL);
            }
        }
    }
}

// vim: ts=4 sw=4 expandtab
