//! Image format detection for downloaded company images.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
    Bmp,
    Tiff,
}

impl ImageFormat {
    /// Detect the format from the leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else if bytes.starts_with(b"BM") {
            Some(Self::Bmp)
        } else if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
            Some(Self::Tiff)
        } else {
            None
        }
    }

    /// Upper-case format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Gif => "GIF",
            Self::Webp => "WEBP",
            Self::Bmp => "BMP",
            Self::Tiff => "TIFF",
        }
    }

    /// File extension: the lower-cased format name.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image fetched from a remote URL, held in memory until the owning record
/// is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteImage {
    pub format: Option<ImageFormat>,
    pub bytes: Vec<u8>,
}

impl RemoteImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            format: ImageFormat::sniff(&bytes),
            bytes,
        }
    }

    /// Effective format; PNG when none was detected.
    pub fn format_or_default(&self) -> ImageFormat {
        self.format.unwrap_or(ImageFormat::Png)
    }
}

/// File name for a company image: `company_<pk>_image.<format>`.
pub fn company_image_filename(pk: i64, format: ImageFormat) -> String {
    format!("company_{pk}_image.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_formats() {
        assert_eq!(
            ImageFormat::sniff(b"\x89PNG\r\n\x1a\nrest"),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::sniff(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(
            ImageFormat::sniff(b"RIFF\0\0\0\0WEBPVP8 "),
            Some(ImageFormat::Webp)
        );
        assert_eq!(ImageFormat::sniff(b"<html>"), None);
        assert_eq!(ImageFormat::sniff(b""), None);
    }

    #[test]
    fn test_company_image_filename() {
        assert_eq!(
            company_image_filename(7, ImageFormat::Png),
            "company_7_image.png"
        );
        assert_eq!(
            company_image_filename(12, ImageFormat::Jpeg),
            "company_12_image.jpeg"
        );
    }

    #[test]
    fn test_unknown_format_defaults_to_png() {
        let img = RemoteImage::new(vec![1, 2, 3]);
        assert_eq!(img.format, None);
        assert_eq!(img.format_or_default(), ImageFormat::Png);
    }
}
