//! Configuration types for the tree explorer.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! a configuration file only needs to mention what it overrides.
//!
//! # Example
//!
//! ```
//! # use canopy::config::ExplorerConfig;
//! let config = ExplorerConfig::default();
//! assert_eq!(config.icon().width(), 13);
//! assert!(config.expand_items());
//! assert_eq!(config.placeholder_label(), "- No name -");
//! ```

use serde::Deserialize;

/// Label used for items whose node has neither a name nor a title.
pub const DEFAULT_PLACEHOLDER_LABEL: &str = "- No name -";

/// Top-level explorer configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Icon size requested from the glyph resolver.
    icon: IconConfig,

    /// Expand state given to items when they are inserted.
    expand_items: bool,

    /// Fallback label for unnamed, untitled nodes.
    placeholder_label: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            icon: IconConfig::default(),
            expand_items: true,
            placeholder_label: DEFAULT_PLACEHOLDER_LABEL.to_string(),
        }
    }
}

impl ExplorerConfig {
    /// Creates a new [`ExplorerConfig`].
    ///
    /// # Arguments
    ///
    /// * `icon` - Icon size for tree items.
    /// * `expand_items` - Whether inserted items start expanded.
    /// * `placeholder_label` - Label for nodes without name or title.
    pub fn new(icon: IconConfig, expand_items: bool, placeholder_label: impl Into<String>) -> Self {
        Self {
            icon,
            expand_items,
            placeholder_label: placeholder_label.into(),
        }
    }

    /// Returns the icon configuration.
    pub fn icon(&self) -> IconConfig {
        self.icon
    }

    /// Returns the expand state for newly inserted items.
    pub fn expand_items(&self) -> bool {
        self.expand_items
    }

    /// Returns the fallback label.
    pub fn placeholder_label(&self) -> &str {
        &self.placeholder_label
    }
}

/// Icon dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    width: u32,
    height: u32,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            width: 13,
            height: 13,
        }
    }
}

impl IconConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
