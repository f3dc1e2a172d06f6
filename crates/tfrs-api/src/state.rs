//! # Application State
//!
//! Shared state handed to every route handler through the `State`
//! extractor:
//!
//! - **Config**: environment-derived settings ([`AppConfig`]).
//! - **Reference catalog**: approved fuels and expected uses, loaded once
//!   at startup and shared read-only by every section.
//! - **Sections**: one [`SheetSession`] per compliance report, holding the
//!   mounted Schedule C section and its draft store.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use tfrs_core::{ComplianceReportId, ReferenceCatalog, ReferenceData, TfrsError};
use tfrs_schedules::{
    InMemoryScheduleStore, ScheduleCRecord, ScheduleCSection, ScheduleStateStore,
    StaticExpectedUses,
};
use thiserror::Error;

// ─── Store ──────────────────────────────────────────────────────────

/// Thread-safe, cloneable in-memory map keyed by compliance report.
///
/// The lock is `parking_lot` and is never held across `.await`.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<ComplianceReportId, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert `value` unless the key is taken. On conflict the value is
    /// handed back.
    pub fn try_insert(&self, id: ComplianceReportId, value: T) -> Result<(), T> {
        match self.data.write().entry(id) {
            Entry::Occupied(_) => Err(value),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Read from a record without cloning it.
    pub fn read<R>(&self, id: &ComplianceReportId, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.data.read().get(id).map(f)
    }

    /// Run `f` against a record under a single write lock. `None` if the
    /// record does not exist.
    pub fn try_update<R, E>(
        &self,
        id: &ComplianceReportId,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    pub fn contains(&self, id: &ComplianceReportId) -> bool {
        self.data.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Sessions ───────────────────────────────────────────────────────

/// A mounted section together with the collaborators it was mounted with.
#[derive(Debug, Clone)]
pub struct SheetSession {
    pub section: ScheduleCSection,
    pub store: InMemoryScheduleStore,
    pub expected_uses: StaticExpectedUses,
}

impl SheetSession {
    /// Records currently held by the draft store.
    pub fn draft_records(&self) -> Vec<ScheduleCRecord> {
        self.store
            .schedule_state()
            .records()
            .map(<[_]>::to_vec)
            .unwrap_or_default()
    }
}

// ─── Configuration ──────────────────────────────────────────────────

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

/// Errors loading [`AppConfig`] from the environment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("TFRS_LOG_FORMAT must be \"text\" or \"json\", got {0:?}")]
    InvalidLogFormat(String),
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// JSON or YAML reference catalog. `None` serves empty reference data.
    pub reference_data: Option<PathBuf>,
    /// Upper bound for one `/rows` request.
    pub max_rows_per_request: usize,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            reference_data: None,
            max_rows_per_request: 100,
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Read `PORT`, `TFRS_REFERENCE_DATA`, `TFRS_MAX_ROWS_PER_REQUEST` and
    /// `TFRS_LOG_FORMAT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`AppConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(value) => parse_number("PORT", &value)?,
            None => defaults.port,
        };
        let max_rows_per_request = match lookup("TFRS_MAX_ROWS_PER_REQUEST") {
            Some(value) => parse_number("TFRS_MAX_ROWS_PER_REQUEST", &value)?,
            None => defaults.max_rows_per_request,
        };
        let log_format = match lookup("TFRS_LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => defaults.log_format,
        };
        let reference_data = lookup("TFRS_REFERENCE_DATA")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            port,
            reference_data,
            max_rows_per_request,
            log_format,
        })
    }
}

fn parse_number<N>(var: &'static str, value: &str) -> Result<N, ConfigError>
where
    N: FromStr + PartialOrd + Default,
{
    value
        .trim()
        .parse::<N>()
        .ok()
        .filter(|n| *n > N::default())
        .ok_or_else(|| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}

// ─── AppState ───────────────────────────────────────────────────────

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Arc<ReferenceCatalog>,
    /// The catalog's approved fuels, shared with every mounted section.
    pub reference: Arc<ReferenceData>,
    pub sections: Store<SheetSession>,
}

impl AppState {
    /// Default configuration and an empty catalog.
    pub fn new() -> Self {
        Self::with_catalog(AppConfig::default(), ReferenceCatalog::default())
    }

    pub fn with_catalog(config: AppConfig, catalog: ReferenceCatalog) -> Self {
        Self {
            config,
            reference: Arc::new(catalog.reference.clone()),
            catalog: Arc::new(catalog),
            sections: Store::new(),
        }
    }

    /// Build state from `config`, loading the reference catalog if one is
    /// configured.
    pub fn from_config(config: AppConfig) -> Result<Self, TfrsError> {
        let catalog = match &config.reference_data {
            Some(path) => ReferenceCatalog::load(path)?,
            None => {
                tracing::warn!("TFRS_REFERENCE_DATA not set; serving empty reference data");
                ReferenceCatalog::default()
            }
        };
        Ok(Self::with_catalog(config, catalog))
    }

    /// A fresh expected-use loader over the catalog's list.
    pub fn expected_uses_loader(&self) -> StaticExpectedUses {
        StaticExpectedUses::new(self.catalog.expected_uses.clone())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
