//! # Application Configuration
//!
//! Runtime settings and the branding labels of the administration UI. The
//! configuration is read once at startup and then served from a process-wide
//! `OnceCell`; nothing mutates it afterwards.

use anyhow::{Context, Result};
use chrono::FixedOffset;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Environment variable naming an optional YAML configuration file
pub const CONFIG_PATH_ENV: &str = "MEDQUEUE_CONFIG";
pub const DATABASE_URL_ENV: &str = "MEDQUEUE_DATABASE_URL";
pub const BIND_ADDR_ENV: &str = "MEDQUEUE_BIND_ADDR";

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:medqueue.db";

static CONFIG: OnceCell<AppConfig> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub site_header: String,
    pub site_title: String,
    pub index_title: String,
    /// Title printed at the top of the daily summary PDF
    pub report_title: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            site_header: "MedQueue Pro Administration".to_string(),
            site_title: "OPD Admin Portal".to_string(),
            index_title: "Hospital Management System".to_string(),
            report_title: "MedQueue Pro - Daily OPD Summary Report".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// Origin allowed by the CORS layer
    pub cors_origin: String,
    /// Offset from UTC used to decide which calendar day a registration belongs to
    pub utc_offset_minutes: i32,
    /// Minutes added to the estimated consultation time per waiting patient
    pub slot_minutes: u32,
    pub log_level: String,
    pub branding: Branding,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DATABASE_URL.to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
            cors_origin: "http://localhost:8080".to_string(),
            utc_offset_minutes: 0,
            slot_minutes: 15,
            log_level: "info".to_string(),
            branding: Branding::default(),
        }
    }
}

impl AppConfig {
    /// Load the configuration from `MEDQUEUE_CONFIG` (if set) and the environment
    pub fn load() -> Result<Self> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Parse a YAML configuration file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply environment overrides through the given lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_ENV) {
            self.database_url = url;
        }
        if let Some(addr) = lookup(BIND_ADDR_ENV) {
            self.bind_addr = addr;
        }
        self
    }

    /// The clinic's offset from UTC
    pub fn clinic_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            anyhow::anyhow!("utc_offset_minutes out of range: {}", self.utc_offset_minutes)
        })
    }
}

/// Install the process-wide configuration. Later calls keep the first value.
pub fn init(config: AppConfig) -> &'static AppConfig {
    if CONFIG.set(config).is_err() {
        warn!("Configuration already initialized, keeping the existing values");
    } else {
        info!("Configuration initialized");
    }
    get()
}

/// The process-wide configuration, or the defaults when `init` was never called
pub fn get() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::default)
}
