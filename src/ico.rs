//! Windows ICO container encoding.
//!
//! An ICO file is a 6-byte header, a directory of 16-byte entries (one per
//! embedded image), and the image payloads concatenated in directory order.
//! Only PNG-compressed frames are produced: each payload is stored verbatim
//! and described as a 32 bpp, single-plane image.
//!
//! # Layout
//!
//! ```text
//! offset 0       u16 reserved (0)
//! offset 2       u16 type (1 = icon)
//! offset 4       u16 image count
//! offset 6+16*i  directory entry i
//! offset 6+16*N  payload 0, payload 1, ... (no padding)
//! ```
//!
//! # Example
//!
//! ```
//! use favicon_forge::{encode, ImageFrame};
//!
//! let frames = vec![
//!     ImageFrame::new(16, b"AAAA".to_vec()),
//!     ImageFrame::new(32, b"BBBB".to_vec()),
//! ];
//! let bytes = encode(&frames).unwrap();
//! assert_eq!(bytes.len(), 46);
//! assert_eq!(&bytes[38..42], b"AAAA");
//! ```

use thiserror::Error;

/// Size of the fixed file header in bytes.
pub const HEADER_SIZE: usize = 6;

/// Size of a single directory entry in bytes.
pub const ENTRY_SIZE: usize = 16;

/// Largest edge length an ICO directory entry can describe.
pub const MAX_EDGE_LENGTH: u32 = 256;

const ICON_TYPE: u16 = 1;
const COLOR_PLANES: u16 = 1;
const BITS_PER_PIXEL: u16 = 32;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while building or reading an ICO container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IcoError {
    /// A frame's edge length is zero or larger than 256.
    #[error("frame {index} has invalid edge length {edge_length} (expected 1..=256)")]
    InvalidDimension { index: usize, edge_length: u32 },

    /// No frames were supplied.
    #[error("an icon needs at least one frame")]
    EmptyInput,

    /// The header's 16-bit count field cannot hold this many frames.
    #[error("too many frames ({count}, max {})", u16::MAX)]
    TooManyFrames { count: usize },

    /// A payload size or offset does not fit the 32-bit directory fields.
    #[error("frame {index} payload of {size} bytes does not fit a 32-bit icon directory")]
    PayloadTooLarge { index: usize, size: usize },

    /// The buffer ends before the header, directory or a payload does.
    #[error("icon data truncated (needed {needed} bytes, got {actual})")]
    Truncated { needed: usize, actual: usize },

    /// The header's reserved or type field is wrong.
    #[error("not an icon file")]
    NotAnIcon,
}

// ============================================================================
// ImageFrame
// ============================================================================

/// One square image to embed, already encoded (normally PNG with alpha).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFrame {
    /// Width and height of the image in pixels.
    pub edge_length: u32,

    /// The encoded image bytes, stored verbatim in the container.
    pub payload: Vec<u8>,
}

impl ImageFrame {
    pub fn new(edge_length: u32, payload: Vec<u8>) -> Self {
        Self {
            edge_length,
            payload,
        }
    }
}

// ============================================================================
// Header and DirectoryEntry
// ============================================================================

/// The fixed 6-byte file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcoHeader {
    pub reserved: u16,
    pub kind: u16,
    pub count: u16,
}

impl IcoHeader {
    fn icon(count: u16) -> Self {
        Self {
            reserved: 0,
            kind: ICON_TYPE,
            count,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..2].copy_from_slice(&self.reserved.to_le_bytes());
        out[2..4].copy_from_slice(&self.kind.to_le_bytes());
        out[4..6].copy_from_slice(&self.count.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            reserved: u16::from_le_bytes([bytes[0], bytes[1]]),
            kind: u16::from_le_bytes([bytes[2], bytes[3]]),
            count: u16::from_le_bytes([bytes[4], bytes[5]]),
        }
    }
}

/// A 16-byte directory record describing one embedded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Width in pixels; 0 means 256.
    pub width: u8,
    /// Height in pixels; 0 means 256.
    pub height: u8,
    pub color_count: u8,
    pub reserved: u8,
    pub planes: u16,
    pub bits_per_pixel: u16,
    /// Length of the payload in bytes.
    pub data_size: u32,
    /// Absolute offset of the payload from the start of the file.
    pub data_offset: u32,
}

impl DirectoryEntry {
    /// Builds the entry for a square PNG frame. `edge_length` must already be
    /// validated to lie in `1..=256`.
    fn for_frame(edge_length: u32, data_size: u32, data_offset: u32) -> Self {
        let edge = dimension_byte(edge_length);
        Self {
            width: edge,
            height: edge,
            color_count: 0,
            reserved: 0,
            planes: COLOR_PLANES,
            bits_per_pixel: BITS_PER_PIXEL,
            data_size,
            data_offset,
        }
    }

    /// Returns the image width in pixels, mapping the stored 0 back to 256.
    pub fn edge_length(&self) -> u32 {
        if self.width == 0 {
            MAX_EDGE_LENGTH
        } else {
            u32::from(self.width)
        }
    }

    /// Byte range of the payload within the file.
    pub fn data_range(&self) -> std::ops::Range<usize> {
        let start = self.data_offset as usize;
        start..start.saturating_add(self.data_size as usize)
    }

    pub fn to_bytes(&self) -> [u8; ENTRY_SIZE] {
        let mut out = [0u8; ENTRY_SIZE];
        out[0] = self.width;
        out[1] = self.height;
        out[2] = self.color_count;
        out[3] = self.reserved;
        out[4..6].copy_from_slice(&self.planes.to_le_bytes());
        out[6..8].copy_from_slice(&self.bits_per_pixel.to_le_bytes());
        out[8..12].copy_from_slice(&self.data_size.to_le_bytes());
        out[12..16].copy_from_slice(&self.data_offset.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; ENTRY_SIZE]) -> Self {
        Self {
            width: bytes[0],
            height: bytes[1],
            color_count: bytes[2],
            reserved: bytes[3],
            planes: u16::from_le_bytes([bytes[4], bytes[5]]),
            bits_per_pixel: u16::from_le_bytes([bytes[6], bytes[7]]),
            data_size: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            data_offset: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        }
    }
}

/// 256 does not fit a byte, so the format stores it as 0.
fn dimension_byte(edge_length: u32) -> u8 {
    if edge_length == MAX_EDGE_LENGTH {
        0
    } else {
        edge_length as u8
    }
}

// ============================================================================
// IcoDocument
// ============================================================================

/// A fully laid-out ICO container.
///
/// Built once from a list of frames; the directory and offsets are computed
/// up front and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcoDocument<'a> {
    header: IcoHeader,
    entries: Vec<DirectoryEntry>,
    frames: &'a [ImageFrame],
    total_len: usize,
}

impl<'a> IcoDocument<'a> {
    /// Validates `frames` and computes the directory.
    ///
    /// Fails without producing anything if the list is empty, a frame has an
    /// edge length outside `1..=256`, or a size or offset overflows its field.
    pub fn new(frames: &'a [ImageFrame]) -> Result<Self, IcoError> {
        if frames.is_empty() {
            return Err(IcoError::EmptyInput);
        }
        let count = u16::try_from(frames.len()).map_err(|_| IcoError::TooManyFrames {
            count: frames.len(),
        })?;

        let directory_size = ENTRY_SIZE * frames.len();
        let mut offset = HEADER_SIZE + directory_size;
        let mut entries = Vec::with_capacity(frames.len());

        for (index, frame) in frames.iter().enumerate() {
            if frame.edge_length == 0 || frame.edge_length > MAX_EDGE_LENGTH {
                return Err(IcoError::InvalidDimension {
                    index,
                    edge_length: frame.edge_length,
                });
            }

            let size = frame.payload.len();
            let too_large = || IcoError::PayloadTooLarge { index, size };
            let data_size = u32::try_from(size).map_err(|_| too_large())?;
            let data_offset = u32::try_from(offset).map_err(|_| too_large())?;

            entries.push(DirectoryEntry::for_frame(
                frame.edge_length,
                data_size,
                data_offset,
            ));
            offset = offset.checked_add(size).ok_or_else(too_large)?;
        }

        Ok(Self {
            header: IcoHeader::icon(count),
            entries,
            frames,
            total_len: offset,
        })
    }

    pub fn header(&self) -> &IcoHeader {
        &self.header
    }

    /// Directory entries, in input order.
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn frame_count(&self) -> usize {
        self.entries.len()
    }

    /// Total size of the serialized file in bytes.
    pub fn len(&self) -> usize {
        self.total_len
    }

    /// Always `false`; a document holds at least one frame.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the header, directory and payloads into one buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total_len);
        out.extend_from_slice(&self.header.to_bytes());
        for entry in &self.entries {
            out.extend_from_slice(&entry.to_bytes());
        }
        for frame in self.frames {
            out.extend_from_slice(&frame.payload);
        }
        debug_assert_eq!(out.len(), self.total_len);
        out
    }
}

/// Packs `frames` into an ICO file.
///
/// The output is deterministic: the same frames in the same order always
/// produce the same bytes.
pub fn encode(frames: &[ImageFrame]) -> Result<Vec<u8>, IcoError> {
    Ok(IcoDocument::new(frames)?.to_bytes())
}

// ============================================================================
// Reading
// ============================================================================

/// Parses the header and directory of an ICO file.
///
/// Every entry's payload range is checked against the buffer length, so the
/// returned entries can be used to slice `bytes` directly.
pub fn read_directory(bytes: &[u8]) -> Result<Vec<DirectoryEntry>, IcoError> {
    let header_bytes: &[u8; HEADER_SIZE] = bytes
        .get(..HEADER_SIZE)
        .and_then(|b| b.try_into().ok())
        .ok_or(IcoError::Truncated {
            needed: HEADER_SIZE,
            actual: bytes.len(),
        })?;
    let header = IcoHeader::from_bytes(header_bytes);
    if header.reserved != 0 || header.kind != ICON_TYPE {
        return Err(IcoError::NotAnIcon);
    }

    let count = usize::from(header.count);
    let directory_end = HEADER_SIZE + ENTRY_SIZE * count;
    if bytes.len() < directory_end {
        return Err(IcoError::Truncated {
            needed: directory_end,
            actual: bytes.len(),
        });
    }

    bytes[HEADER_SIZE..directory_end]
        .chunks_exact(ENTRY_SIZE)
        .map(|chunk| {
            let mut raw = [0u8; ENTRY_SIZE];
            raw.copy_from_slice(chunk);
            let entry = DirectoryEntry::from_bytes(&raw);
            let end = (entry.data_offset as usize)
                .checked_add(entry.data_size as usize)
                .unwrap_or(usize::MAX);
            if end > bytes.len() {
                return Err(IcoError::Truncated {
                    needed: end,
                    actual: bytes.len(),
                });
            }
            Ok(entry)
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
