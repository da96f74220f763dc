//! Viewer configuration (`--config viewer.json`).
//!
//! JSON shape, every key optional:
//! {
//!   "title": "Lineage",
//!   "clickable_jobs": false,     // job nodes open the detail panel too
//!   "label_key": "naam",         // job metadata key used as display label
//!   "layout": { "name": "breadthfirst", "directed": true, "spacing_factor": 1.4, "padding": 40 }
//! }

use crate::Result;
use crate::diagnostics;
use crate::graph::BuildOptions;
use crate::interact::InteractionOptions;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub title: String,
    pub clickable_jobs: bool,
    pub label_key: Option<String>,
    pub layout: LayoutOptions,
}

/// Options handed to the browser layout engine as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all(serialize = "camelCase"))]
pub struct LayoutOptions {
    pub name: String,
    pub directed: bool,
    pub spacing_factor: f64,
    pub padding: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Data lineage".to_string(),
            clickable_jobs: false,
            label_key: None,
            layout: LayoutOptions::default(),
        }
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            name: "breadthfirst".to_string(),
            directed: true,
            spacing_factor: 1.4,
            padding: 40,
        }
    }
}

impl ViewerConfig {
    /// Defaults when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| diagnostics::error_message(format!("read config file {}", path)))?;
        let cfg = Self::from_json(&text)
            .with_context(|| diagnostics::error_message(format!("bad config file {}", path)))?;
        tracing::info!("loaded viewer config from {}", path);
        Ok(cfg)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.layout.name.trim().is_empty() {
            bail!("layout.name cannot be empty");
        }
        if !(self.layout.spacing_factor > 0.0) {
            bail!(
                "layout.spacing_factor must be positive, got {}",
                self.layout.spacing_factor
            );
        }
        if let Some(key) = &self.label_key {
            if key.trim().is_empty() {
                bail!("label_key cannot be empty; omit it to label jobs by name");
            }
        }
        Ok(())
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            label_key: self.label_key.clone(),
        }
    }

    pub fn interaction_options(&self) -> InteractionOptions {
        InteractionOptions {
            clickable_jobs: self.clickable_jobs,
        }
    }
}
