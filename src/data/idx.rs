//! Parsing of IDX binary files, the format MNIST and its derivatives ship in.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-3:   magic 2051   (0x00 0x00 0x08 0x03)
//! bytes  4-7:   N            (number of images)
//! bytes  8-11:  rows
//! bytes 12-15:  cols
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-3:   magic 2049   (0x00 0x00 0x08 0x01)
//! bytes  4-7:   N            (number of labels)
//! bytes  8..:   N bytes, one class index each
//! ```
//!
//! Header words are big-endian by definition. Files whose header was written
//! little-endian are recognized by their byte-swapped magic and decoded
//! accordingly; the payload is bytes either way.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::data::dataset::InMemoryDataset;

pub const IMAGE_MAGIC: u32 = 2051;
pub const LABEL_MAGIC: u32 = 2049;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed IDX file: {0}")]
    Format(String),

    #[error("image and label files disagree: {0}")]
    Mismatch(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteOrder {
    Big,
    Little,
}

/// Decoded IDX3 image file.
#[derive(Debug, Clone, PartialEq)]
pub struct IdxImages {
    pub count: usize,
    pub rows: usize,
    pub cols: usize,
    /// `count * rows * cols` intensities, each byte divided by 255.
    pub pixels: Vec<f32>,
}

impl IdxImages {
    pub fn pixels_per_image(&self) -> usize {
        self.rows * self.cols
    }
}

fn read_word(bytes: &[u8], word: usize, order: ByteOrder) -> u32 {
    let b = [bytes[word * 4], bytes[word * 4 + 1], bytes[word * 4 + 2], bytes[word * 4 + 3]];
    match order {
        ByteOrder::Big => u32::from_be_bytes(b),
        ByteOrder::Little => u32::from_le_bytes(b),
    }
}

/// Reads `words` header words, picking the byte order from the magic number.
fn read_header(bytes: &[u8], words: usize, magic: u32, what: &str) -> Result<Vec<usize>, DataError> {
    if bytes.len() < words * 4 {
        return Err(DataError::Format(format!(
            "{} file too short: expected at least {} header bytes, got {}",
            what, words * 4, bytes.len()
        )));
    }

    let order = if read_word(bytes, 0, ByteOrder::Big) == magic {
        ByteOrder::Big
    } else if read_word(bytes, 0, ByteOrder::Little) == magic {
        ByteOrder::Little
    } else {
        return Err(DataError::Format(format!(
            "{} file has magic number {:#010x}, expected {}",
            what, read_word(bytes, 0, ByteOrder::Big), magic
        )));
    };
    if order == ByteOrder::Little {
        debug!(what, "IDX header is little-endian");
    }

    Ok((1..words).map(|w| read_word(bytes, w, order) as usize).collect())
}

/// Parses an IDX3 image file and normalizes every pixel to [0, 1].
pub fn parse_idx_images(bytes: &[u8]) -> Result<IdxImages, DataError> {
    let header = read_header(bytes, 4, IMAGE_MAGIC, "image")?;
    let (count, rows, cols) = (header[0], header[1], header[2]);

    let data_len = count
        .checked_mul(rows)
        .and_then(|n| n.checked_mul(cols))
        .ok_or_else(|| DataError::Format(format!(
            "image dimensions overflow: {} images of {}x{}", count, rows, cols
        )))?;

    let body = &bytes[16..];
    if body.len() < data_len {
        return Err(DataError::Format(format!(
            "image file declares {} images of {}x{} ({} bytes) but only {} bytes follow the header",
            count, rows, cols, data_len, body.len()
        )));
    }

    let pixels = body[..data_len].iter().map(|&px| px as f32 / 255.0).collect();
    Ok(IdxImages { count, rows, cols, pixels })
}

/// Parses an IDX1 label file.
pub fn parse_idx_labels(bytes: &[u8]) -> Result<Vec<u8>, DataError> {
    let header = read_header(bytes, 2, LABEL_MAGIC, "label")?;
    let count = header[0];

    let body = &bytes[8..];
    if body.len() < count {
        return Err(DataError::Format(format!(
            "label file declares {} labels but only {} bytes follow the header",
            count, body.len()
        )));
    }
    Ok(body[..count].to_vec())
}

/// Combines parsed images and labels into a dataset.
pub fn idx_to_dataset(images: IdxImages, labels: Vec<u8>) -> Result<InMemoryDataset, DataError> {
    if images.count != labels.len() {
        return Err(DataError::Mismatch(format!(
            "{} images but {} labels", images.count, labels.len()
        )));
    }
    InMemoryDataset::new(images.pixels_per_image(), images.pixels, labels)
        .map_err(|e| DataError::Format(e.to_string()))
}

/// Reads and parses an image/label file pair from disk.
pub fn load_idx_pair(images_path: &Path, labels_path: &Path) -> Result<InMemoryDataset, DataError> {
    let image_bytes = read_file(images_path)?;
    let label_bytes = read_file(labels_path)?;
    let images = parse_idx_images(&image_bytes)?;
    let labels = parse_idx_labels(&label_bytes)?;
    debug!(
        images = images.count,
        rows = images.rows,
        cols = images.cols,
        path = %images_path.display(),
        "parsed IDX pair"
    );
    idx_to_dataset(images, labels)
}

fn read_file(path: &Path) -> Result<Vec<u8>, DataError> {
    std::fs::read(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::dataset::Dataset;

    pub(crate) fn image_file(count: u32, rows: u32, cols: u32, little: bool) -> Vec<u8> {
        let mut bytes = Vec::new();
        for word in [IMAGE_MAGIC, count, rows, cols] {
            if little {
                bytes.extend_from_slice(&word.to_le_bytes());
            } else {
                bytes.extend_from_slice(&word.to_be_bytes());
            }
        }
        bytes.extend((0..count * rows * cols).map(|i| (i * 51 % 256) as u8));
        bytes
    }

    pub(crate) fn label_file(labels: &[u8], little: bool) -> Vec<u8> {
        let mut bytes = Vec::new();
        for word in [LABEL_MAGIC, labels.len() as u32] {
            if little {
                bytes.extend_from_slice(&word.to_le_bytes());
            } else {
                bytes.extend_from_slice(&word.to_be_bytes());
            }
        }
        bytes.extend_from_slice(labels);
        bytes
    }

    #[test]
    fn parses_big_endian_images() {
        let images = parse_idx_images(&image_file(2, 2, 3, false)).unwrap();
        assert_eq!((images.count, images.rows, images.cols), (2, 2, 3));
        assert_eq!(images.pixels.len(), 12);
        assert_eq!(images.pixels[0], 0.0);
        assert_eq!(images.pixels[5], 1.0);
    }

    #[test]
    fn parses_little_endian_headers() {
        let big = parse_idx_images(&image_file(3, 2, 2, false)).unwrap();
        let little = parse_idx_images(&image_file(3, 2, 2, true)).unwrap();
        assert_eq!(big, little);
        assert_eq!(parse_idx_labels(&label_file(&[4, 2], true)).unwrap(), vec![4, 2]);
    }

    #[test]
    fn rejects_bad_magic_and_truncation() {
        let mut bytes = image_file(1, 2, 2, false);
        bytes[3] = 0x01;
        assert!(matches!(parse_idx_images(&bytes), Err(DataError::Format(_))));

        let mut short = image_file(2, 2, 2, false);
        short.pop();
        assert!(matches!(parse_idx_images(&short), Err(DataError::Format(_))));

        assert!(matches!(parse_idx_labels(&[0, 0, 8]), Err(DataError::Format(_))));
    }

    #[test]
    fn builds_dataset_from_matching_pair() {
        let images = parse_idx_images(&image_file(2, 1, 2, false)).unwrap();
        let labels = parse_idx_labels(&label_file(&[7, 3], false)).unwrap();
        let ds = idx_to_dataset(images, labels).unwrap();
        assert_eq!(ds.sample_count(), 2);
        assert_eq!(ds.input_len(), 2);
        assert_eq!(ds.sample(1).unwrap().label, 3);
    }

    #[test]
    fn count_mismatch_is_reported() {
        let images = parse_idx_images(&image_file(2, 1, 1, false)).unwrap();
        let labels = parse_idx_labels(&label_file(&[1], false)).unwrap();
        assert!(matches!(idx_to_dataset(images, labels), Err(DataError::Mismatch(_))));
    }
}
