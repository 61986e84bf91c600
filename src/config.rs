//! Report configuration.
//!
//! Stored as a JSON object on disk; every field is optional:
//! ```json
//! {
//!   "companies": ["Cidade de Maceió", "Real Alagoas", "São Francisco", "Veleiro"],
//!   "outlier": { "threshold_minutes": 1000.0, "day_minutes": 1400.0, "relabel": "force_early" },
//!   "top_n": 10
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

use crate::preprocessing::OutlierCorrection;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Companies expected in the dataset. When absent, the report uses the
    /// companies found in the data.
    pub companies: Option<BTreeSet<String>>,
    pub outlier: OutlierCorrection,
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            companies: None,
            outlier: OutlierCorrection::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl ReportConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config '{}'", path.display()))?;
        let config: ReportConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config '{}'", path.display()))?;
        debug!(path = %path.display(), ?config, "Loaded report config");
        Ok(config)
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
