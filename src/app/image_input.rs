//! Image intake: validation, decoding, and base64 payload preparation

use super::App;
use crate::constants::ALLOWED_EXTENSIONS;
use crate::types::LoadedImage;
use base64::{engine::general_purpose, Engine as _};
use eframe::egui;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Unsupported file type '{0}'. Supported formats: PNG, JPG, JPEG")]
    UnsupportedType(String),
    #[error("Could not read file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Image processing error: {0}")]
    Decode(#[from] image::ImageError),
}

/// Check the file extension against the allow-list. Returns the mime format
/// tag used in the data URL ("png" or "jpeg").
pub fn validate_extension(path: &Path) -> Result<String, ImageError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ImageError::UnsupportedType(ext));
    }
    Ok(if ext == "png" { "png".to_string() } else { "jpeg".to_string() })
}

/// Load and re-encode an image file for upload. Rejects disallowed extensions
/// and bytes the `image` crate cannot decode.
pub fn load_image(path: &Path) -> Result<LoadedImage, ImageError> {
    let format = validate_extension(path)?;
    let raw = std::fs::read(path)?;
    let decoded = image::load_from_memory(&raw)?;
    let (width, height) = (decoded.width(), decoded.height());

    let mut bytes = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut bytes);
    if format == "jpeg" {
        // JPEG has no alpha channel
        image::DynamicImage::ImageRgb8(decoded.to_rgb8())
            .write_to(&mut cursor, image::ImageFormat::Jpeg)?;
    } else {
        decoded.write_to(&mut cursor, image::ImageFormat::Png)?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());

    info!(file = %file_name, width, height, format = %format, "Image loaded");

    Ok(LoadedImage {
        file_name,
        format,
        bytes,
        width,
        height,
        texture: None,
    })
}

/// Base64-encode the image into the `data:` URL the API expects.
pub fn to_data_url(image: &LoadedImage) -> String {
    format!(
        "data:image/{};base64,{}",
        image.format,
        general_purpose::STANDARD.encode(&image.bytes)
    )
}

impl App {
    /// Open the native picker, run intake, and prepare the preview texture.
    pub fn pick_image(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Medical Image", ALLOWED_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        match load_image(&path) {
            Ok(mut loaded) => {
                loaded.texture = Self::texture_from_bytes(ctx, &loaded.bytes, &loaded.file_name);
                self.intake_error = None;
                self.image = Some(loaded);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Image rejected");
                self.image = None;
                self.intake_error = Some(e.to_string());
            }
        }
    }

    fn texture_from_bytes(
        ctx: &egui::Context,
        bytes: &[u8],
        name: &str,
    ) -> Option<egui::TextureHandle> {
        let rgba = image::load_from_memory(bytes).ok()?.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let pixels = rgba.into_raw();
        Some(ctx.load_texture(
            name.to_string(),
            egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
            egui::TextureOptions::LINEAR,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_test_png(dir: &Path) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join("scan.png");
        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([120, 130, 140, 255]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn disallowed_extensions_are_rejected() {
        for name in ["report.pdf", "scan.gif", "scan.bmp", "noext"] {
            let result = validate_extension(Path::new(name));
            assert!(matches!(result, Err(ImageError::UnsupportedType(_))), "{name}");
        }
    }

    #[test]
    fn allowed_extensions_map_to_mime_tags() {
        assert_eq!(validate_extension(Path::new("a.png")).unwrap(), "png");
        assert_eq!(validate_extension(Path::new("a.jpg")).unwrap(), "jpeg");
        assert_eq!(validate_extension(Path::new("a.JPEG")).unwrap(), "jpeg");
    }

    #[test]
    fn undecodable_bytes_are_rejected() {
        let dir = std::env::temp_dir().join("radiology-analyzer-test-baddecode");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("fake.png");
        std::fs::write(&path, b"this is not a png").unwrap();
        assert!(matches!(load_image(&path), Err(ImageError::Decode(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn png_round_trips_through_intake() {
        let dir = std::env::temp_dir().join("radiology-analyzer-test-intake");
        let path = write_test_png(&dir);
        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.format, "png");
        assert_eq!((loaded.width, loaded.height), (4, 3));
        assert!(image::load_from_memory(&loaded.bytes).is_ok());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn data_url_carries_mime_and_base64_payload() {
        let dir = std::env::temp_dir().join("radiology-analyzer-test-dataurl");
        let path = write_test_png(&dir);
        let loaded = load_image(&path).unwrap();
        let url = to_data_url(&loaded);
        assert!(url.starts_with("data:image/png;base64,"));
        let payload = url.trim_start_matches("data:image/png;base64,");
        let decoded = general_purpose::STANDARD.decode(payload).unwrap();
        assert_eq!(decoded, loaded.bytes);
        std::fs::remove_dir_all(&dir).ok();
    }
}
