//! Alpha-channel inspection for downloaded raster assets.

use std::path::Path;

/// Tri-state answer from a transparency check.
///
/// `Unknown` covers undecodable or unreadable files and is treated exactly
/// like `Opaque` downstream: a candidate is only accepted on positive
/// evidence of transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaVerdict {
    Transparent,
    Opaque,
    Unknown,
}

/// Strategy for deciding whether a downloaded image carries transparency.
///
/// Implementations must be infallible from the caller's point of view —
/// anything that cannot be classified degrades to [`AlphaVerdict::Unknown`]
/// rather than panicking or returning an error.
pub trait TransparencyProbe: Send + Sync {
    fn classify(&self, path: &Path) -> AlphaVerdict;
}

/// Production probe: decodes PNG/WEBP/GIF/ICO in-process and scans the
/// pixel data for any alpha value below fully opaque.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterAlphaProbe;

impl TransparencyProbe for RasterAlphaProbe {
    fn classify(&self, path: &Path) -> AlphaVerdict {
        // The temp file carries no extension, so the format is sniffed
        // from the leading bytes rather than the file name.
        let reader = match image::ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
            Ok(reader) => reader,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "could not read downloaded asset");
                return AlphaVerdict::Unknown;
            }
        };

        let decoded = match reader.decode() {
            Ok(img) => img,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "could not decode downloaded asset");
                return AlphaVerdict::Unknown;
            }
        };

        if !decoded.color().has_alpha() {
            return AlphaVerdict::Opaque;
        }

        let rgba = decoded.to_rgba8();
        if rgba.pixels().any(|pixel| pixel.0[3] < u8::MAX) {
            AlphaVerdict::Transparent
        } else {
            AlphaVerdict::Opaque
        }
    }
}
