//! QR rendering of client configurations.

use crate::error::{AppError, AppResult};
use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

/// Pixels per QR module
const MODULE_SIZE: u32 = 10;

/// Turns a text blob into a scannable image.
pub trait ArtifactRenderer: Send + Sync {
    fn render(&self, text: &str) -> AppResult<Vec<u8>>;
}

/// PNG QR codes with low error correction and a quiet zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeRenderer;

impl QrCodeRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactRenderer for QrCodeRenderer {
    fn render(&self, text: &str) -> AppResult<Vec<u8>> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::L)
            .map_err(|e| AppError::Render(e.to_string()))?;

        let image = code
            .render::<Luma<u8>>()
            .module_dimensions(MODULE_SIZE, MODULE_SIZE)
            .quiet_zone(true)
            .build();

        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|e| AppError::Render(e.to_string()))?;

        Ok(png.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_renders_png() {
        let png = QrCodeRenderer::new().render("test data").unwrap();
        assert!(!png.is_empty());
        assert_eq!(&png[..8], PNG_SIGNATURE);
    }

    #[test]
    fn test_distinct_inputs_give_distinct_images() {
        let renderer = QrCodeRenderer::new();
        let short = renderer.render("short").unwrap();
        let long = renderer.render(&"long data".repeat(100)).unwrap();

        assert!(!short.is_empty());
        assert!(!long.is_empty());
        assert_ne!(short, long);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let renderer = QrCodeRenderer::new();
        let config = "[Interface]\nPrivateKey = abc\n";
        assert_eq!(renderer.render(config).unwrap(), renderer.render(config).unwrap());
    }

    #[test]
    fn test_oversized_input_is_render_error() {
        let err = QrCodeRenderer::new().render(&"x".repeat(10_000)).unwrap_err();
        assert!(matches!(err, AppError::Render(_)));
    }
}
