//! Serializable description of the favicon assets to produce.
//!
//! A [`FaviconManifest`] lists the PNG files to render and the sizes packed
//! into the ICO file. The default reproduces the usual website set.
//!
//! # Example
//!
//! ```
//! use favicon_forge::{FaviconManifest, PngTarget};
//!
//! let manifest = FaviconManifest::new()
//!     .with_png(PngTarget::new(48, "favicon-48x48.png"));
//!
//! let json = manifest.to_json().unwrap();
//! let restored = FaviconManifest::from_json(&json).unwrap();
//! assert_eq!(restored.png.len(), 6);
//! ```
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "png": [
//!     { "size": 16, "name": "favicon-16x16.png" },
//!     { "size": 180, "name": "apple-touch-icon.png" }
//!   ],
//!   "ico": { "name": "favicon.ico", "sizes": [16, 32] }
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ico::MAX_EDGE_LENGTH;

/// Largest PNG edge length a manifest may request.
pub const MAX_PNG_SIZE: u32 = 4096;

// ============================================================================
// Targets
// ============================================================================

/// A standalone PNG file to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct PngTarget {
    /// Edge length in pixels.
    pub size: u32,

    /// Output file name.
    pub name: String,
}

impl PngTarget {
    pub fn new(size: u32, name: impl Into<String>) -> Self {
        Self {
            size,
            name: name.into(),
        }
    }
}

/// The multi-resolution ICO file to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct IcoTarget {
    /// Output file name.
    #[serde(default = "default_ico_name")]
    pub name: String,

    /// Frame sizes, in the order they appear in the directory.
    #[serde(default = "default_ico_sizes")]
    pub sizes: Vec<u32>,
}

impl Default for IcoTarget {
    fn default() -> Self {
        Self {
            name: default_ico_name(),
            sizes: default_ico_sizes(),
        }
    }
}

fn default_ico_name() -> String {
    "favicon.ico".to_string()
}

fn default_ico_sizes() -> Vec<u32> {
    vec![16, 32]
}

fn default_png_targets() -> Vec<PngTarget> {
    vec![
        PngTarget::new(16, "favicon-16x16.png"),
        PngTarget::new(32, "favicon-32x32.png"),
        PngTarget::new(180, "apple-touch-icon.png"),
        PngTarget::new(192, "icon-192x192.png"),
        PngTarget::new(512, "icon-512x512.png"),
    ]
}

fn default_ico_target() -> Option<IcoTarget> {
    Some(IcoTarget::default())
}

// ============================================================================
// FaviconManifest
// ============================================================================

/// All outputs of a favicon build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct FaviconManifest {
    /// PNG files, rendered in this order.
    #[serde(default = "default_png_targets")]
    pub png: Vec<PngTarget>,

    /// The ICO file. `null` skips it.
    #[serde(default = "default_ico_target")]
    pub ico: Option<IcoTarget>,
}

impl Default for FaviconManifest {
    fn default() -> Self {
        Self {
            png: default_png_targets(),
            ico: default_ico_target(),
        }
    }
}

impl FaviconManifest {
    /// Creates the default manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manifest with no outputs.
    pub fn empty() -> Self {
        Self {
            png: Vec::new(),
            ico: None,
        }
    }

    /// Appends a PNG target.
    pub fn with_png(mut self, target: PngTarget) -> Self {
        self.png.push(target);
        self
    }

    /// Sets the ICO target.
    pub fn with_ico(mut self, target: IcoTarget) -> Self {
        self.ico = Some(target);
        self
    }

    /// Removes the ICO target.
    pub fn without_ico(mut self) -> Self {
        self.ico = None;
        self
    }

    /// Every distinct size the manifest needs rendered, ascending.
    pub fn sizes(&self) -> Vec<u32> {
        let mut sizes: Vec<u32> = self
            .png
            .iter()
            .map(|t| t.size)
            .chain(self.ico.iter().flat_map(|t| t.sizes.iter().copied()))
            .collect();
        sizes.sort_unstable();
        sizes.dedup();
        sizes
    }

    /// Checks that the manifest describes a writable set of files.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        let mut check_name = |name: &str| -> Result<()> {
            if name.is_empty() {
                return Err(Error::Manifest("output name is empty".into()));
            }
            if name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(Error::Manifest(format!(
                    "output name {name:?} must be a plain file name"
                )));
            }
            if !names.insert(name.to_string()) {
                return Err(Error::Manifest(format!("duplicate output name {name:?}")));
            }
            Ok(())
        };

        for target in &self.png {
            check_name(&target.name)?;
            if target.size == 0 || target.size > MAX_PNG_SIZE {
                return Err(Error::Manifest(format!(
                    "{} size {} is outside 1..={MAX_PNG_SIZE}",
                    target.name, target.size
                )));
            }
        }

        if let Some(ico) = &self.ico {
            check_name(&ico.name)?;
            if ico.sizes.is_empty() {
                return Err(Error::Manifest(format!("{} has no sizes", ico.name)));
            }
            if let Some(bad) = ico
                .sizes
                .iter()
                .find(|&&s| s == 0 || s > MAX_EDGE_LENGTH)
            {
                return Err(Error::Manifest(format!(
                    "{} size {bad} is outside 1..={MAX_EDGE_LENGTH}",
                    ico.name
                )));
            }
        }

        Ok(())
    }

    /// Serializes the manifest to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the manifest to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a manifest from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&json)
    }

    /// JSON schema describing the manifest format.
    #[cfg(feature = "jsonschema")]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(FaviconManifest)
    }
}

// ============================================================================
// Tests
// ============================================================================
