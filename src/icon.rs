//! Rendered icon images.
//!
//! A [`RasterIcon`] is one square RGBA image produced by the rasterizer. It
//! can be written out as a PNG or handed to the ICO encoder as a frame.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::error::Result;
use crate::ico::ImageFrame;

/// A single square icon image.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterIcon {
    /// Width and height in pixels.
    pub size: u32,

    /// The image data in RGBA format.
    pub data: RgbaImage,
}

impl RasterIcon {
    /// Wraps a rendered image. The image is expected to be `size x size`.
    pub fn new(data: RgbaImage) -> Self {
        Self {
            size: data.width(),
            data,
        }
    }

    /// Encodes the image as a PNG with alpha.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.data
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
        Ok(buffer)
    }

    /// Encodes the image as a PNG frame for an ICO container.
    pub fn to_frame(&self) -> Result<ImageFrame> {
        Ok(ImageFrame::new(self.size, self.encode_png()?))
    }
}

/// A collection of rendered icons, typically one per target size.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IconSet {
    pub images: Vec<RasterIcon>,
}

impl IconSet {
    /// Creates a new empty icon set.
    pub fn new() -> Self {
        Self { images: Vec::new() }
    }

    /// Creates an icon set from a vector of images.
    pub fn from_images(images: Vec<RasterIcon>) -> Self {
        Self { images }
    }

    /// Adds an image to the icon set.
    pub fn add_image(&mut self, image: RasterIcon) {
        self.images.push(image);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Finds the first image with exactly the given edge length.
    pub fn find_by_size(&self, size: u32) -> Option<&RasterIcon> {
        self.images.iter().find(|img| img.size == size)
    }

    /// Encodes every image as an ICO frame, in set order.
    pub fn to_frames(&self) -> Result<Vec<ImageFrame>> {
        self.images.iter().map(RasterIcon::to_frame).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RasterIcon> {
        self.images.iter()
    }
}

impl IntoIterator for IconSet {
    type Item = RasterIcon;
    type IntoIter = std::vec::IntoIter<RasterIcon>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.into_iter()
    }
}

impl<'a> IntoIterator for &'a IconSet {
    type Item = &'a RasterIcon;
    type IntoIter = std::slice::Iter<'a, RasterIcon>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn png_keeps_pixels_and_alpha() {
        let mut data = RgbaImage::new(4, 4);
        data.put_pixel(1, 2, Rgba([10, 20, 30, 40]));
        let icon = RasterIcon::new(data);

        let png = icon.encode_png().unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert_eq!(decoded.get_pixel(1, 2).0, [10, 20, 30, 40]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn frame_carries_edge_length() {
        let icon = RasterIcon::new(RgbaImage::new(32, 32));
        let frame = icon.to_frame().unwrap();
        assert_eq!(frame.edge_length, 32);
        assert_eq!(frame.payload, icon.encode_png().unwrap());
    }

    #[test]
    fn icon_set_operations() {
        let mut set = IconSet::new();
        assert!(set.is_empty());

        set.add_image(RasterIcon::new(RgbaImage::new(16, 16)));
        set.add_image(RasterIcon::new(RgbaImage::new(32, 32)));

        assert_eq!(set.len(), 2);
        assert_eq!(set.find_by_size(32).unwrap().size, 32);
        assert!(set.find_by_size(48).is_none());

        let frames = set.to_frames().unwrap();
        let sizes: Vec<_> = frames.iter().map(|f| f.edge_length).collect();
        assert_eq!(sizes, [16, 32]);
    }
}
