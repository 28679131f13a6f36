// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::hal::Storage;

const MAGIC_1: u8 = 0xFA;
const MAGIC_2: u8 = 0xCD;

/// Default temperature threshold, in degree Celsius.
pub const DEFAULT_TEMP_THRESHOLD: u8 = 70;
/// Highest selectable temperature threshold, in degree Celsius.
pub const MAX_TEMP_THRESHOLD: u8 = 100;
/// Threshold increment per button release.
pub const TEMP_THRESHOLD_STEP: u8 = 5;

/// Size of the persisted record in bytes.
pub const RECORD_SIZE: usize = 4;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum FanPreset {
    Slow = 0,
    Normal,
    Fast,
}

impl FanPreset {
    pub fn next(&self) -> Self {
        match self {
            FanPreset::Slow => FanPreset::Normal,
            FanPreset::Normal => FanPreset::Fast,
            FanPreset::Fast => FanPreset::Slow,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(FanPreset::Slow),
            1 => Some(FanPreset::Normal),
            2 => Some(FanPreset::Fast),
            _ => None,
        }
    }
}

/// User configuration.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Configuration {
    pub fan_preset: FanPreset,
    pub temp_threshold: u8,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            fan_preset: FanPreset::Fast,
            temp_threshold: DEFAULT_TEMP_THRESHOLD,
        }
    }
}

impl Configuration {
    pub fn next_fan_preset(&mut self) {
        self.fan_preset = self.fan_preset.next();
    }

    /// Raise the threshold by one step. Wraps to zero above the maximum.
    pub fn next_temp_threshold(&mut self) {
        let th = self.temp_threshold.saturating_add(TEMP_THRESHOLD_STEP);
        self.temp_threshold = if th > MAX_TEMP_THRESHOLD { 0 } else { th };
    }

    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        [
            MAGIC_1,
            self.fan_preset as u8,
            self.temp_threshold,
            MAGIC_2,
        ]
    }

    /// Parse a persisted record.
    ///
    /// Returns None, if the markers or any field are invalid.
    pub fn from_bytes(bytes: &[u8; RECORD_SIZE]) -> Option<Self> {
        let [magic1, preset, threshold, magic2] = *bytes;
        if magic1 != MAGIC_1 || magic2 != MAGIC_2 || threshold > MAX_TEMP_THRESHOLD {
            return None;
        }
        Some(Self {
            fan_preset: FanPreset::from_u8(preset)?,
            temp_threshold: threshold,
        })
    }

    /// Load the configuration from persistent storage.
    ///
    /// An invalid record is replaced by the defaults,
    /// which are written back immediately.
    pub fn load(storage: &mut impl Storage) -> Self {
        let mut bytes = [0; RECORD_SIZE];
        storage.read(&mut bytes);

        if let Some(conf) = Self::from_bytes(&bytes) {
            log::info!("Configuration loaded: {conf:?}");
            conf
        } else {
            let conf = Self::default();
            log::info!(
                "First run. Storing default configuration. Magic: {:#04X} {:#04X}",
                bytes[0],
                bytes[3]
            );
            conf.save(storage);
            conf
        }
    }

    /// Write the configuration to persistent storage.
    ///
    /// Failures are logged only.
    /// The in-memory configuration stays valid in any case.
    pub fn save(&self, storage: &mut impl Storage) {
        if let Err(e) = storage.write(&self.to_bytes()) {
            log::error!("Unable to save configuration: {e}");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::StorageError, mock::MockStorage};

    #[test]
    fn test_load_valid() {
        let mut st = MockStorage::new([0xFA, 1, 45, 0xCD]);
        let conf = Configuration::load(&mut st);
        assert_eq!(conf.fan_preset, FanPreset::Normal);
        assert_eq!(conf.temp_threshold, 45);
        assert!(st.writes.is_empty());
    }

    #[test]
    fn test_load_invalid_magic() {
        crate::mock::init_logging();
        for data in [
            [0xFF, 0xFF, 0xFF, 0xFF],
            [0xFA, 1, 45, 0x00],
            [0x00, 1, 45, 0xCD],
            [0xCD, 1, 45, 0xFA],
        ] {
            let mut st = MockStorage::new(data);
            let conf = Configuration::load(&mut st);
            assert_eq!(conf.fan_preset, FanPreset::Fast);
            assert_eq!(conf.fan_preset as u8, 2);
            assert_eq!(conf.temp_threshold, 70);
            assert_eq!(st.writes.len(), 1);
            assert_eq!(st.writes[0], [0xFA, 2, 70, 0xCD]);
        }
    }

    #[test]
    fn test_load_invalid_fields() {
        let mut st = MockStorage::new([0xFA, 3, 45, 0xCD]);
        assert_eq!(Configuration::load(&mut st), Configuration::default());
        assert_eq!(st.writes.len(), 1);

        let mut st = MockStorage::new([0xFA, 0, 101, 0xCD]);
        assert_eq!(Configuration::load(&mut st), Configuration::default());
        assert_eq!(st.writes.len(), 1);
    }

    #[test]
    fn test_save_failure_is_absorbed() {
        let mut st = MockStorage::new([0; 4]);
        st.fail = Some(StorageError::Busy);
        let conf = Configuration::load(&mut st);
        assert_eq!(conf, Configuration::default());
        assert_eq!(st.writes.len(), 1);
        assert_eq!(st.data, [0; 4]);
    }

    #[test]
    fn test_preset_cycle() {
        let mut conf = Configuration {
            fan_preset: FanPreset::Slow,
            temp_threshold: 0,
        };
        conf.next_fan_preset();
        assert_eq!(conf.fan_preset, FanPreset::Normal);
        conf.next_fan_preset();
        assert_eq!(conf.fan_preset, FanPreset::Fast);
        conf.next_fan_preset();
        assert_eq!(conf.fan_preset, FanPreset::Slow);
    }

    #[test]
    fn test_threshold_wrap() {
        let mut conf = Configuration::default();
        conf.temp_threshold = 90;
        conf.next_temp_threshold();
        assert_eq!(conf.temp_threshold, 95);
        conf.next_temp_threshold();
        assert_eq!(conf.temp_threshold, 100);
        conf.next_temp_threshold();
        assert_eq!(conf.temp_threshold, 0);
        conf.next_temp_threshold();
        assert_eq!(conf.temp_threshold, 5);
    }

    #[test]
    fn test_record_layout() {
        let conf = Configuration {
            fan_preset: FanPreset::Normal,
            temp_threshold: 35,
        };
        assert_eq!(conf.to_bytes(), [0xFA, 1, 35, 0xCD]);
        assert_eq!(Configuration::from_bytes(&conf.to_bytes()), Some(conf));
    }
}

// vim: ts=4 sw=4 expandtab
