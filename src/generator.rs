//! Favicon build pipeline: rasterize, encode, write.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ico;
use crate::icon::{IconSet, RasterIcon};
use crate::manifest::FaviconManifest;
use crate::svg::{SvgSource, render_contained};

// ============================================================================
// GeneratedAsset
// ============================================================================

/// One output file, held in memory until written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAsset {
    /// File name relative to the output directory.
    pub name: String,

    /// The complete file contents.
    pub bytes: Vec<u8>,
}

impl GeneratedAsset {
    /// Writes the asset into `dir`, returning the full path.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.name);
        std::fs::write(&path, &self.bytes).map_err(|e| Error::io(&path, e))?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "wrote asset");
        Ok(path)
    }
}

/// Writes every asset into `dir`, creating the directory if needed.
pub fn write_all(assets: &[GeneratedAsset], dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    assets.iter().map(|asset| asset.write_to(dir)).collect()
}

// ============================================================================
// FaviconGenerator
// ============================================================================

/// Renders an SVG source into the assets described by a [`FaviconManifest`].
///
/// Each size is rasterized at most once; a size used by both a PNG target
/// and the ICO file shares the same rendering.
///
/// # Example
///
/// ```
/// use favicon_forge::{FaviconGenerator, FaviconManifest, SvgSource};
///
/// let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"><rect width="8" height="8" fill="#123456"/></svg>"##;
/// let source = SvgSource::from_svg(svg).unwrap();
///
/// let mut generator = FaviconGenerator::new(source, FaviconManifest::default()).unwrap();
/// let assets = generator.generate().unwrap();
///
/// assert_eq!(assets.last().unwrap().name, "favicon.ico");
/// ```
#[derive(Debug)]
pub struct FaviconGenerator {
    source: SvgSource,
    manifest: FaviconManifest,
    cache: HashMap<u32, RasterIcon>,
}

impl FaviconGenerator {
    /// Creates a generator after validating `manifest`.
    pub fn new(source: SvgSource, manifest: FaviconManifest) -> Result<Self> {
        manifest.validate()?;
        Ok(Self {
            source,
            manifest,
            cache: HashMap::new(),
        })
    }

    pub fn manifest(&self) -> &FaviconManifest {
        &self.manifest
    }

    /// Returns the rendering at `size`, rasterizing it on first use.
    pub fn render(&mut self, size: u32) -> Result<&RasterIcon> {
        if !self.cache.contains_key(&size) {
            tracing::debug!(size, "rendering");
            let icon = RasterIcon::new(render_contained(&self.source, size)?);
            self.cache.insert(size, icon);
        }
        self.cache.get(&size).ok_or(Error::Render { size })
    }

    /// Renders every size the manifest needs, ascending.
    pub fn render_all(&mut self) -> Result<IconSet> {
        let mut set = IconSet::new();
        for size in self.manifest.sizes() {
            set.add_image(self.render(size)?.clone());
        }
        Ok(set)
    }

    /// Produces all assets: the PNG targets in manifest order, then the ICO.
    pub fn generate(&mut self) -> Result<Vec<GeneratedAsset>> {
        let png_targets = self.manifest.png.clone();
        let mut assets = Vec::with_capacity(png_targets.len() + 1);

        for target in &png_targets {
            let bytes = self.render(target.size)?.encode_png()?;
            tracing::info!(name = %target.name, size = target.size, "generated png");
            assets.push(GeneratedAsset {
                name: target.name.clone(),
                bytes,
            });
        }

        if let Some(target) = self.manifest.ico.clone() {
            let frames = target
                .sizes
                .iter()
                .map(|&size| self.render(size)?.to_frame())
                .collect::<Result<Vec<_>>>()?;
            let bytes = ico::encode(&frames)?;
            tracing::info!(name = %target.name, sizes = ?target.sizes, "generated ico");
            assets.push(GeneratedAsset {
                name: target.name,
                bytes,
            });
        }

        Ok(assets)
    }

    /// Drops all cached renderings.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ico::read_directory;
    use crate::manifest::{IcoTarget, PngTarget};

    const LOGO: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64"><circle cx="32" cy="32" r="30" fill="#3366ff"/></svg>"##;

    fn generator(manifest: FaviconManifest) -> FaviconGenerator {
        FaviconGenerator::new(SvgSource::from_svg(LOGO).unwrap(), manifest).unwrap()
    }

    #[test]
    fn default_manifest_produces_all_assets() {
        let mut generator = generator(FaviconManifest::default());
        let assets = generator.generate().unwrap();

        let names: Vec<_> = assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "favicon-16x16.png",
                "favicon-32x32.png",
                "apple-touch-icon.png",
                "icon-192x192.png",
                "icon-512x512.png",
                "favicon.ico",
            ]
        );

        let apple = image::load_from_memory(&assets[2].bytes).unwrap();
        assert_eq!((apple.width(), apple.height()), (180, 180));
    }

    #[test]
    fn ico_embeds_matching_pngs() {
        let mut generator = generator(FaviconManifest::default());
        let assets = generator.generate().unwrap();
        let ico_bytes = &assets[5].bytes;

        let entries = read_directory(ico_bytes).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].edge_length(), 16);
        assert_eq!(entries[1].edge_length(), 32);

        // The ICO frames are the same PNGs written as standalone files.
        assert_eq!(&ico_bytes[entries[0].data_range()], assets[0].bytes.as_slice());
        assert_eq!(&ico_bytes[entries[1].data_range()], assets[1].bytes.as_slice());
    }

    #[test]
    fn generation_is_deterministic() {
        let first = generator(FaviconManifest::default()).generate().unwrap();
        let second = generator(FaviconManifest::default()).generate().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn renders_each_size_once() {
        let mut generator = generator(FaviconManifest::default());
        let set = generator.render_all().unwrap();
        let sizes: Vec<_> = set.iter().map(|i| i.size).collect();
        assert_eq!(sizes, [16, 32, 180, 192, 512]);
        assert_eq!(generator.cache.len(), 5);

        generator.generate().unwrap();
        assert_eq!(generator.cache.len(), 5);

        generator.clear_cache();
        assert!(generator.cache.is_empty());
    }

    #[test]
    fn large_ico_frame_uses_zero_sentinel() {
        let manifest = FaviconManifest::empty().with_ico(IcoTarget {
            name: "app.ico".into(),
            sizes: vec![256, 48],
        });
        let assets = generator(manifest).generate().unwrap();
        assert_eq!(assets.len(), 1);

        let entries = read_directory(&assets[0].bytes).unwrap();
        assert_eq!(entries[0].width, 0);
        assert_eq!(entries[0].edge_length(), 256);
        assert_eq!(entries[1].width, 48);
    }

    #[test]
    fn invalid_manifest_is_rejected() {
        let manifest = FaviconManifest::empty().with_png(PngTarget::new(0, "zero.png"));
        let result = FaviconGenerator::new(SvgSource::from_svg(LOGO).unwrap(), manifest);
        assert!(matches!(result, Err(Error::Manifest(_))));
    }

    #[test]
    fn writes_assets_to_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("public");

        let manifest = FaviconManifest::empty()
            .with_png(PngTarget::new(16, "favicon-16x16.png"))
            .with_ico(IcoTarget::default());
        let assets = generator(manifest).generate().unwrap();
        let paths = write_all(&assets, &out).unwrap();

        assert_eq!(paths, [out.join("favicon-16x16.png"), out.join("favicon.ico")]);
        for (path, asset) in paths.iter().zip(&assets) {
            assert_eq!(std::fs::read(path).unwrap(), asset.bytes);
        }
    }
}
