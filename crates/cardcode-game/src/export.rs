//! Point-in-time export bundle.

use crate::error::ConfigError;
use cardcode_eval::{LogEntry, Variables};
use cardcode_wheel::{GameStats, WheelStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics of whichever wheel the session runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WheelSnapshot {
    Strategic(GameStats),
    Adaptive(WheelStats),
}

/// `{variables, log, wheelStats, timestamp}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub variables: Variables,
    pub log: Vec<LogEntry>,
    pub wheel_stats: WheelSnapshot,
    pub timestamp: DateTime<Utc>,
}

impl ExportBundle {
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
