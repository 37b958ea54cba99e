use std::fs;
use std::path::Path;

use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "powerdaq_settings.json";
/// One row of the channel table: label plus the V/I/P display toggles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelRow {
    pub name: String,
    pub description: String,
    pub voltage: bool,
    pub current: bool,
    pub power: bool,
}
impl ChannelRow {
    fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_owned(),
            description: description.to_owned(),
            voltage: true,
            current: true,
            power: true,
        }
    }
}
/// UI state persisted across runs. A missing or unreadable file falls back
/// to defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub view_width: f64,
    pub channels: Vec<ChannelRow>,
}
impl Default for AppSettings {
    fn default() -> Self {
        Self {
            view_width: 10.0,
            channels: vec![
                ChannelRow::new("通道1", "VBAT_SENSE"),
                ChannelRow::new("通道2", "VPH_PWR"),
                ChannelRow::new("通道3", "VCORE_LDO"),
                ChannelRow::new("通道4", "WIFI_3V3"),
            ],
        }
    }
}
impl AppSettings {
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => settings,
            Err(e) => {
                if path.exists() {
                    warn!("settings load failed, using defaults: {e:#}");
                }
                Self::default()
            }
        }
    }
    fn try_load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read settings file {}", path.display()))?;
        serde_json::from_str(&raw).context("parse settings file")
    }
    pub fn save(&self, path: &Path) {
        let result = serde_json::to_string_pretty(self)
            .context("encode settings")
            .and_then(|json| {
                fs::write(path, json)
                    .with_context(|| format!("write settings file {}", path.display()))
            });
        if let Err(e) = result {
            warn!("settings save failed: {e:#}");
        }
    }
}
