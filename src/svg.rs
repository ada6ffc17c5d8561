//! SVG rasterization using resvg/usvg.
//!
//! Sources are parsed once into a [`SvgSource`] and can then be rendered at
//! any number of square sizes.

use std::fmt;
use std::path::Path;

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::{Error, Result};

// ============================================================================
// SvgSource
// ============================================================================

/// A parsed SVG document ready for rendering.
///
/// # Example
///
/// ```
/// use favicon_forge::{render_contained, SvgSource};
///
/// let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10"/></svg>"#;
/// let source = SvgSource::from_svg(svg).unwrap();
/// let img = render_contained(&source, 32).unwrap();
/// assert_eq!(img.dimensions(), (32, 32));
/// ```
pub struct SvgSource {
    tree: Tree,
}

impl SvgSource {
    /// Parses SVG markup.
    pub fn from_svg(svg: &str) -> Result<Self> {
        let tree = Tree::from_str(svg, &Options::default())?;
        Ok(Self { tree })
    }

    /// Reads and parses an SVG file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        let tree = Tree::from_data(&data, &Options::default())?;
        Ok(Self { tree })
    }

    /// The intrinsic size of the document, in user units.
    pub fn size(&self) -> (f32, f32) {
        let size = self.tree.size();
        (size.width(), size.height())
    }
}

impl fmt::Debug for SvgSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.size();
        f.debug_struct("SvgSource")
            .field("width", &width)
            .field("height", &height)
            .finish()
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Renders `source` onto a transparent `size x size` canvas.
///
/// The drawing is scaled to fit while keeping its aspect ratio and centered
/// on the unused axis, so non-square sources get transparent bars.
pub fn render_contained(source: &SvgSource, size: u32) -> Result<RgbaImage> {
    let mut pixmap = Pixmap::new(size, size).ok_or(Error::Render { size })?;

    let (svg_width, svg_height) = source.size();
    let scale = size as f32 / svg_width.max(svg_height);
    let dx = (size as f32 - svg_width * scale) / 2.0;
    let dy = (size as f32 - svg_height * scale) / 2.0;

    let transform = Transform::from_row(scale, 0.0, 0.0, scale, dx, dy);
    resvg::render(&source.tree, transform, &mut pixmap.as_mut());

    tracing::trace!(size, scale, "rasterized svg");
    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let mut img = RgbaImage::new(width, pixmap.height());

    for (i, pixel) in pixmap.pixels().iter().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        // tiny_skia uses premultiplied alpha
        let (r, g, b, a) = unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
        img.put_pixel(x, y, Rgba([r, g, b, a]));
    }

    img
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const RED_SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><rect width="100" height="100" fill="#ff0000"/></svg>"##;

    const WIDE_BLUE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100"><rect width="200" height="100" fill="#0000ff"/></svg>"##;

    #[test]
    fn renders_square_canvas() {
        let source = SvgSource::from_svg(RED_SQUARE).unwrap();
        for size in [16, 32, 180] {
            let img = render_contained(&source, size).unwrap();
            assert_eq!(img.dimensions(), (size, size));
        }
    }

    #[test]
    fn fills_square_source_edge_to_edge() {
        let source = SvgSource::from_svg(RED_SQUARE).unwrap();
        let img = render_contained(&source, 32).unwrap();
        assert_eq!(img.get_pixel(16, 16).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(1, 1).0, [255, 0, 0, 255]);
    }

    #[test]
    fn letterboxes_wide_source() {
        let source = SvgSource::from_svg(WIDE_BLUE).unwrap();
        let img = render_contained(&source, 32).unwrap();

        // 200x100 scaled into 32x32 is 32x16, centered vertically.
        assert_eq!(img.get_pixel(16, 2)[3], 0, "top bar is transparent");
        assert_eq!(img.get_pixel(16, 29)[3], 0, "bottom bar is transparent");
        assert_eq!(img.get_pixel(16, 16).0, [0, 0, 255, 255]);
    }

    #[test]
    fn rejects_invalid_markup() {
        assert!(matches!(
            SvgSource::from_svg("not svg at all"),
            Err(Error::Svg(_))
        ));
    }

    #[test]
    fn zero_size_is_an_error() {
        let source = SvgSource::from_svg(RED_SQUARE).unwrap();
        assert!(matches!(
            render_contained(&source, 0),
            Err(Error::Render { size: 0 })
        ));
    }

    #[test]
    fn reports_intrinsic_size() {
        let source = SvgSource::from_svg(WIDE_BLUE).unwrap();
        assert_eq!(source.size(), (200.0, 100.0));
    }

    #[test]
    fn unpremultiply_restores_color() {
        assert_eq!(unpremultiply(0, 0, 0, 0), (0, 0, 0, 0));
        assert_eq!(unpremultiply(128, 0, 0, 128), (255, 0, 0, 128));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.svg");
        std::fs::write(&path, RED_SQUARE).unwrap();

        let source = SvgSource::from_file(&path).unwrap();
        assert_eq!(source.size(), (100.0, 100.0));

        let missing = SvgSource::from_file(dir.path().join("missing.svg"));
        assert!(matches!(missing, Err(Error::Io { .. })));
    }
}
