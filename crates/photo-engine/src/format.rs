//! Accepted photo formats and the encoded photo buffer.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageError, ImageFormat, ImageReader};

use crate::{PhotoError, Result};

/// Media types accepted by the profile picture field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotoFormat {
    Jpeg,
    Png,
}

impl PhotoFormat {
    /// Detect the format from the leading bytes of an encoded image.
    pub fn detect(bytes: &[u8]) -> Result<Self> {
        match image::guess_format(bytes) {
            Ok(ImageFormat::Jpeg) => Ok(Self::Jpeg),
            Ok(ImageFormat::Png) => Ok(Self::Png),
            Ok(other) => Err(PhotoError::UnsupportedFormat(format!("{other:?}"))),
            Err(e) => Err(PhotoError::Decode(e.to_string())),
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }

    /// Decode bytes known to be in this format into upright pixels.
    ///
    /// A stored EXIF orientation is applied, so a sideways phone photo comes
    /// out the way it is displayed.
    pub fn decode(self, bytes: &[u8]) -> Result<DynamicImage> {
        let mut decoder = ImageReader::with_format(Cursor::new(bytes), self.image_format())
            .into_decoder()
            .map_err(decode_error)?;
        let orientation = read_orientation(&mut decoder);
        let mut img = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
        img.apply_orientation(orientation);
        Ok(img)
    }

    /// Encode an image in this format.
    ///
    /// `quality` (1..=100) only applies to JPEG. JPEG has no alpha channel,
    /// so transparent pixels are flattened to their color values.
    pub fn encode(self, img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        if img.width() == 0 || img.height() == 0 {
            return Err(PhotoError::Encode(format!(
                "cannot encode an empty {}x{} canvas",
                img.width(),
                img.height()
            )));
        }

        let mut buf = Vec::new();
        match self {
            Self::Jpeg => {
                let rgb = img.to_rgb8();
                let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
                encoder
                    .encode_image(&rgb)
                    .map_err(|e| PhotoError::Encode(e.to_string()))?;
            }
            Self::Png => {
                img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
                    .map_err(|e| PhotoError::Encode(e.to_string()))?;
            }
        }
        Ok(buf)
    }
}

fn decode_error(e: ImageError) -> PhotoError {
    PhotoError::Decode(e.to_string())
}

/// A broken EXIF block is treated as "no rotation" rather than a bad photo.
fn read_orientation(decoder: &mut impl ImageDecoder) -> Orientation {
    decoder.orientation().unwrap_or(Orientation::NoTransforms)
}

/// Size and orientation read from the image header without a full decode.
#[derive(Debug, Clone)]
pub struct PhotoHeader {
    /// Upright width, with the stored orientation applied.
    pub width: u32,
    /// Upright height, with the stored orientation applied.
    pub height: u32,
    pub orientation: Orientation,
}

impl PhotoHeader {
    pub fn read(bytes: &[u8]) -> Result<Self> {
        let mut decoder = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PhotoError::Decode(e.to_string()))?
            .into_decoder()
            .map_err(decode_error)?;
        let orientation = read_orientation(&mut decoder);
        let (w, h) = decoder.dimensions();

        let (width, height) = match orientation {
            Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH => (h, w),
            _ => (w, h),
        };
        Ok(Self {
            width,
            height,
            orientation,
        })
    }

    /// Whether the stored pixels are already the way the photo is displayed.
    pub fn is_upright(&self) -> bool {
        matches!(self.orientation, Orientation::NoTransforms)
    }
}

/// Upright width and height from the image header.
pub fn dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let header = PhotoHeader::read(bytes)?;
    Ok((header.width, header.height))
}

/// An encoded photo together with its format and upright size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPhoto {
    pub bytes: Vec<u8>,
    pub format: PhotoFormat,
    pub width: u32,
    pub height: u32,
}

impl EncodedPhoto {
    /// Encode `img` as `format`, recording its dimensions.
    pub fn encode(img: &DynamicImage, format: PhotoFormat, quality: u8) -> Result<Self> {
        let bytes = format.encode(img, quality)?;
        Ok(Self {
            bytes,
            format,
            width: img.width(),
            height: img.height(),
        })
    }

    /// Wrap already-encoded bytes, reading format and size from the header.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let format = PhotoFormat::detect(&bytes)?;
        let (width, height) = dimensions(&bytes)?;
        Ok(Self {
            bytes,
            format,
            width,
            height,
        })
    }

    pub fn decode(&self) -> Result<DynamicImage> {
        self.format.decode(&self.bytes)
    }
}

/// Insert an EXIF block carrying `orientation` right after the JPEG SOI marker.
#[cfg(test)]
pub(crate) fn with_exif_orientation(jpeg: &[u8], orientation: u8) -> Vec<u8> {
    let mut app1 = vec![0xFF, 0xE1, 0x00, 0x22];
    app1.extend_from_slice(b"Exif\0\0");
    // big-endian TIFF header, first IFD at offset 8
    app1.extend_from_slice(&[b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08]);
    // one entry: tag 0x0112 (Orientation), SHORT, count 1
    app1.extend_from_slice(&[0x00, 0x01, 0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    app1.extend_from_slice(&[0x00, orientation, 0x00, 0x00]);
    app1.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// 400x200 JPEG, left half red and right half blue, stored rotated: shown
/// upright it is 200x400 with red on top.
#[cfg(test)]
pub(crate) fn sideways_jpeg() -> Vec<u8> {
    let img = image::RgbImage::from_fn(400, 200, |x, _| {
        if x < 200 {
            image::Rgb([255, 0, 0])
        } else {
            image::Rgb([0, 0, 255])
        }
    });
    let jpeg = PhotoFormat::Jpeg
        .encode(&DynamicImage::ImageRgb8(img), 95)
        .unwrap();
    with_exif_orientation(&jpeg, 6)
}
