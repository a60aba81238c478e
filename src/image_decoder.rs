use image::{ImageFormat, RgbImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Interleaved sample order of a raw pixel buffer. Everything past this
/// module works in RGB.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported image format (expected JPEG or PNG)")]
    UnsupportedFormat,
    #[error("malformed image data: {0}")]
    Malformed(#[from] image::ImageError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("pixel buffer has {actual} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("image has no pixels")]
    Empty,
    #[error("truncated JPEG stream (no end-of-image marker)")]
    Truncated,
}

/// Where the pixels of one request come from.
#[derive(Clone)]
pub enum ImageSource {
    Upload {
        file_name: String,
        bytes: Vec<u8>,
    },
    Sample {
        path: PathBuf,
    },
    #[allow(dead_code)]
    Pixels {
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        order: ChannelOrder,
    },
}

impl ImageSource {
    pub fn decode(&self) -> Result<RgbImage, DecodeError> {
        match self {
            ImageSource::Upload { bytes, .. } => decode_bytes(bytes),
            ImageSource::Sample { path } => decode_path(path),
            ImageSource::Pixels {
                width,
                height,
                pixels,
                order,
            } => from_raw_pixels(*width, *height, pixels.clone(), *order),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ImageSource::Upload { file_name, bytes } => {
                format!("upload {} ({} bytes)", file_name, bytes.len())
            }
            ImageSource::Sample { path } => format!("sample {}", path.display()),
            ImageSource::Pixels {
                width,
                height,
                order,
                ..
            } => format!("raw {:?} pixels {}x{}", order, width, height),
        }
    }
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ImageSource({})", self.describe())
    }
}

pub fn decode_bytes(bytes: &[u8]) -> Result<RgbImage, DecodeError> {
    let format = image::guess_format(bytes).map_err(|_| DecodeError::UnsupportedFormat)?;

    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return Err(DecodeError::UnsupportedFormat);
    }

    // The JPEG decoder pads missing scan data instead of failing.
    if format == ImageFormat::Jpeg && !ends_with_eoi(bytes) {
        return Err(DecodeError::Truncated);
    }

    let decoded = image::load_from_memory_with_format(bytes, format)?;
    let rgb = decoded.to_rgb8();

    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(DecodeError::Empty);
    }

    Ok(rgb)
}

fn ends_with_eoi(bytes: &[u8]) -> bool {
    let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    bytes[..end].ends_with(&[0xFF, 0xD9])
}

pub fn decode_path(path: &Path) -> Result<RgbImage, DecodeError> {
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    decode_bytes(&bytes)
}

pub fn from_raw_pixels(
    width: u32,
    height: u32,
    mut pixels: Vec<u8>,
    order: ChannelOrder,
) -> Result<RgbImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::Empty);
    }

    let expected = width as usize * height as usize * 3;
    if pixels.len() != expected {
        return Err(DecodeError::BufferSize {
            width,
            height,
            expected,
            actual: pixels.len(),
        });
    }

    if order == ChannelOrder::Bgr {
        for pixel in pixels.chunks_exact_mut(3) {
            pixel.swap(0, 2);
        }
    }

    RgbImage::from_raw(width, height, pixels).ok_or(DecodeError::Empty)
}

#[cfg(test)]
pub fn encode(image: &RgbImage, format: ImageFormat) -> Result<Vec<u8>, DecodeError> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image.clone())
        .write_to(&mut std::io::Cursor::new(&mut bytes), format)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn test_png_round_trip_preserves_dimensions_and_pixels() {
        let image = gradient(37, 21);

        let bytes = encode(&image, ImageFormat::Png).unwrap();
        let decoded = decode_bytes(&bytes).unwrap();

        assert_eq!(decoded.dimensions(), (37, 21));
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_jpeg_round_trip_preserves_dimensions() {
        let image = gradient(640, 480);

        let bytes = encode(&image, ImageFormat::Jpeg).unwrap();
        let decoded = decode_bytes(&bytes).unwrap();

        assert_eq!(decoded.dimensions(), (640, 480));
    }

    #[test]
    fn test_garbage_bytes_are_unsupported() {
        let result = decode_bytes(b"definitely not an image");
        assert!(matches!(result, Err(DecodeError::UnsupportedFormat)));
    }

    #[test]
    fn test_other_formats_are_rejected() {
        let bytes = encode(&gradient(4, 4), ImageFormat::Bmp).unwrap();
        assert!(matches!(
            decode_bytes(&bytes),
            Err(DecodeError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_truncated_png_fails_loudly() {
        let bytes = encode(&gradient(64, 64), ImageFormat::Png).unwrap();
        let truncated = &bytes[..bytes.len() / 2];

        assert!(matches!(
            decode_bytes(truncated),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_truncated_jpeg_fails_loudly() {
        let bytes = encode(&gradient(640, 480), ImageFormat::Jpeg).unwrap();

        for cut in [2, 3, 4, 10] {
            assert!(matches!(
                decode_bytes(&bytes[..bytes.len() / cut]),
                Err(DecodeError::Truncated)
            ));
        }
        assert!(matches!(
            decode_bytes(&bytes[..bytes.len() - 2]),
            Err(DecodeError::Truncated)
        ));
    }

    #[test]
    fn test_jpeg_with_trailing_zero_padding_decodes() {
        let mut bytes = encode(&gradient(16, 16), ImageFormat::Jpeg).unwrap();
        bytes.extend_from_slice(&[0, 0, 0, 0]);

        assert_eq!(decode_bytes(&bytes).unwrap().dimensions(), (16, 16));
    }

    #[test]
    fn test_missing_file_reports_io_error() {
        let path = std::env::temp_dir().join("road-quality-detector-missing.png");
        let _ = std::fs::remove_file(&path);

        match decode_path(&path) {
            Err(DecodeError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {:?}", other.map(|i| i.dimensions())),
        }
    }

    #[test]
    fn test_decode_path_reads_file() {
        let path = std::env::temp_dir().join(format!(
            "road-quality-detector-decode-{}.png",
            std::process::id()
        ));
        std::fs::write(&path, encode(&gradient(12, 8), ImageFormat::Png).unwrap()).unwrap();

        let decoded = decode_path(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(decoded.unwrap().dimensions(), (12, 8));
    }

    #[test]
    fn test_bgr_pixels_are_normalized_to_rgb() {
        let bgr = vec![10, 20, 30, 40, 50, 60];

        let image = from_raw_pixels(2, 1, bgr, ChannelOrder::Bgr).unwrap();

        assert_eq!(image.get_pixel(0, 0), &Rgb([30, 20, 10]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([60, 50, 40]));
    }

    #[test]
    fn test_rgb_pixels_are_kept() {
        let image = from_raw_pixels(1, 1, vec![1, 2, 3], ChannelOrder::Rgb).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgb([1, 2, 3]));
    }

    #[test]
    fn test_raw_buffer_size_mismatch() {
        let result = from_raw_pixels(2, 2, vec![0; 5], ChannelOrder::Rgb);
        assert!(matches!(
            result,
            Err(DecodeError::BufferSize {
                expected: 12,
                actual: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_same_bytes_decode_identically_from_upload_and_sample() {
        let bytes = encode(&gradient(9, 5), ImageFormat::Png).unwrap();
        let path = std::env::temp_dir().join(format!(
            "road-quality-detector-source-{}.png",
            std::process::id()
        ));
        std::fs::write(&path, &bytes).unwrap();

        let upload = ImageSource::Upload {
            file_name: "road.png".to_string(),
            bytes,
        }
        .decode()
        .unwrap();
        let sample = ImageSource::Sample { path: path.clone() }.decode();
        let _ = std::fs::remove_file(&path);

        assert_eq!(upload, sample.unwrap());
    }
}
