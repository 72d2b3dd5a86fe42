#![forbid(unsafe_code)]

//! Headless layout, highlighting and SVG rendering for signal relationship diagrams.

pub mod config;
pub mod highlight;
pub mod layout;
pub mod model;
pub mod svg;
pub mod text;

use crate::config::LayoutConfig;
use crate::model::SignalGraphLayout;
use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use sigmap_core::RelationshipRecord;
use std::sync::Arc;

pub use highlight::{ElementId, Highlight, highlight};
pub use layout::layout_records;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout config: {message}")]
    InvalidConfig { message: String },
    #[error("layout config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
    pub config: LayoutConfig,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
            config: LayoutConfig::default(),
        }
    }
}

impl LayoutOptions {
    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }
}

/// Lays out `records` with the measurer and constants from `options`.
pub fn layout(records: &[RelationshipRecord], options: &LayoutOptions) -> SignalGraphLayout {
    layout_records(records, &options.config, options.text_measurer.as_ref())
}
