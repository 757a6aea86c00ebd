//! IDX binary files as shipped with MNIST.
//!
//! ```text
//! IDX3 images                         IDX1 labels
//! bytes  0-1:  0x00 0x00              bytes 0-1: 0x00 0x00
//! byte   2:    0x08 (uint8)           byte  2:   0x08 (uint8)
//! byte   3:    0x03 (3 dimensions)    byte  3:   0x01 (1 dimension)
//! bytes  4-7:  N (big-endian u32)     bytes 4-7: N (big-endian u32)
//! bytes  8-11: rows                   bytes 8..: N class indices
//! bytes 12-15: cols
//! bytes 16..:  N * rows * cols pixels, row-major
//! ```

use std::path::Path;

use tracing::info;

use crate::data::dataset::{Dataset, InMemoryDataset};
use crate::error::DataError;

/// Reads and parses an image/label file pair from disk.
pub fn load_idx_pair(
    image_path: impl AsRef<Path>,
    label_path: impl AsRef<Path>,
    n_classes: usize,
) -> Result<InMemoryDataset, DataError> {
    let image_bytes = read(image_path.as_ref())?;
    let label_bytes = read(label_path.as_ref())?;
    let ds = parse_idx_pair(&image_bytes, &label_bytes, n_classes)?;
    info!(path = %image_path.as_ref().display(), samples = ds.len(), "loaded IDX dataset");
    Ok(ds)
}

/// Parses in-memory IDX3 image and IDX1 label bytes.
///
/// Pixels are scaled from `0..=255` into `[0.0, 1.0]`.
pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8], n_classes: usize) -> Result<InMemoryDataset, DataError> {
    check_header(image_bytes, "image", 0x03, 16)?;
    check_header(label_bytes, "label", 0x01, 8)?;

    let n_items = be_u32(image_bytes, 4);
    let rows = be_u32(image_bytes, 8);
    let cols = be_u32(image_bytes, 12);

    let n_pixels = rows
        .checked_mul(cols)
        .ok_or_else(|| idx_err("image", format!("rows * cols overflows (rows={}, cols={})", rows, cols)))?;
    let data_len = n_items
        .checked_mul(n_pixels)
        .and_then(|n| n.checked_add(16))
        .ok_or_else(|| idx_err("image", "declared data length overflows".to_owned()))?;
    if image_bytes.len() < data_len {
        return Err(idx_err(
            "image",
            format!(
                "header declares {} items of {}x{} pixels but file is only {} bytes",
                n_items, rows, cols, image_bytes.len()
            ),
        ));
    }

    let label_count = be_u32(label_bytes, 4);
    if label_count != n_items {
        return Err(idx_err(
            "label",
            format!("declares {} labels but image file declares {} items", label_count, n_items),
        ));
    }
    if label_bytes.len() < 8 + n_items {
        return Err(idx_err(
            "label",
            format!("header declares {} labels but file is only {} bytes", n_items, label_bytes.len()),
        ));
    }

    let inputs = if n_pixels == 0 {
        vec![Vec::new(); n_items]
    } else {
        image_bytes[16..data_len]
            .chunks_exact(n_pixels)
            .map(|chunk| chunk.iter().map(|&px| px as f64 / 255.0).collect())
            .collect()
    };
    let labels = label_bytes[8..8 + n_items].iter().map(|&l| l as usize).collect();

    InMemoryDataset::new(inputs, labels, n_classes)
}

fn read(path: &Path) -> Result<Vec<u8>, DataError> {
    std::fs::read(path).map_err(|source| DataError::Io { path: path.display().to_string(), source })
}

fn check_header(bytes: &[u8], kind: &'static str, dims: u8, header_len: usize) -> Result<(), DataError> {
    if bytes.len() < header_len {
        return Err(idx_err(kind, format!("expected at least {} header bytes, got {}", header_len, bytes.len())));
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(idx_err(kind, format!("reserved bytes are 0x{:02X} 0x{:02X}, expected zero", bytes[0], bytes[1])));
    }
    if bytes[2] != 0x08 {
        return Err(idx_err(kind, format!("dtype byte is 0x{:02X}, expected 0x08 (uint8)", bytes[2])));
    }
    if bytes[3] != dims {
        return Err(idx_err(kind, format!("has {} dimensions, expected {}", bytes[3], dims)));
    }
    Ok(())
}

fn be_u32(bytes: &[u8], at: usize) -> usize {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize
}

fn idx_err(kind: &'static str, reason: String) -> DataError {
    DataError::Idx { kind, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: u32, rows: u32, cols: u32, pixels: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0, 0, 0x08, 0x03];
        for v in [n, rows, cols] {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        bytes.extend_from_slice(pixels);
        bytes
    }

    fn labels(values: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0, 0, 0x08, 0x01];
        bytes.extend_from_slice(&(values.len() as u32).to_be_bytes());
        bytes.extend_from_slice(values);
        bytes
    }

    #[test]
    fn parses_pixels_and_labels() {
        let ds = parse_idx_pair(&images(2, 1, 2, &[0, 255, 51, 102]), &labels(&[1, 0]), 2).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.input_size(), 2);
        assert_eq!(ds.input(0), &[0.0, 1.0]);
        assert!((ds.input(1)[0] - 0.2).abs() < 1e-12);
        assert_eq!(ds.label(0), 1);
    }

    #[test]
    fn rejects_truncated_pixels() {
        let err = parse_idx_pair(&images(2, 2, 2, &[0; 5]), &labels(&[0, 0]), 2).unwrap_err();
        assert!(matches!(err, DataError::Idx { kind: "image", .. }));
    }

    #[test]
    fn rejects_wrong_dimension_byte() {
        let mut bad = labels(&[0]);
        bad[3] = 0x03;
        let err = parse_idx_pair(&images(1, 1, 1, &[0]), &bad, 2).unwrap_err();
        assert!(err.to_string().contains("dimensions"));
    }

    #[test]
    fn rejects_count_mismatch() {
        let err = parse_idx_pair(&images(2, 1, 1, &[0, 0]), &labels(&[0]), 2).unwrap_err();
        assert!(err.to_string().contains("declares 1 labels"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_idx_pair("/nonexistent/images.idx", "/nonexistent/labels.idx", 10).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/images.idx"));
    }
}
