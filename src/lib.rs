//! favicon-forge: website favicon generation
//!
//! This crate rasterizes an SVG logo into the PNG sizes a website needs and
//! packs selected sizes into a multi-resolution Windows ICO file.
//!
//! # Example
//!
//! ```
//! use favicon_forge::{FaviconGenerator, FaviconManifest, SvgSource};
//!
//! let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><path d="M2 2h20v20H2z" fill="#0af"/></svg>"##;
//! let source = SvgSource::from_svg(svg).unwrap();
//!
//! let mut generator = FaviconGenerator::new(source, FaviconManifest::default()).unwrap();
//! for asset in generator.generate().unwrap() {
//!     println!("{} ({} bytes)", asset.name, asset.bytes.len());
//! }
//! ```
//!
//! # ICO Encoding
//!
//! The container encoder is usable on its own with any pre-encoded frames:
//!
//! ```
//! use favicon_forge::{encode, read_directory, ImageFrame};
//!
//! let bytes = encode(&[ImageFrame::new(256, vec![0u8; 10])]).unwrap();
//! let entries = read_directory(&bytes).unwrap();
//! assert_eq!(entries[0].width, 0); // 0 means 256
//! ```

mod error;
mod generator;
mod ico;
mod icon;
mod manifest;
mod svg;

pub use error::{Error, Result};
pub use generator::{FaviconGenerator, GeneratedAsset, write_all};
pub use ico::{
    DirectoryEntry, ENTRY_SIZE, HEADER_SIZE, IcoDocument, IcoError, IcoHeader, ImageFrame,
    MAX_EDGE_LENGTH, encode, read_directory,
};
pub use icon::{IconSet, RasterIcon};
pub use manifest::{FaviconManifest, IcoTarget, MAX_PNG_SIZE, PngTarget};
pub use svg::{SvgSource, render_contained};
