//! Utility functions

use std::path::Path;
use tracing::warn;

// Built-in placeholder logo, used whenever no logo.svg is present in the data
// directory. Crosshair-style scan mark in the app accent color.
pub const PLACEHOLDER_LOGO_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 128 128"><defs><style>.r1{fill:none;stroke:#21eeef;stroke-width:6}.r2{fill:#21eeef}</style></defs><rect class="r1" x="8" y="8" width="112" height="112" rx="18"/><circle class="r1" cx="64" cy="64" r="34"/><path class="r2" d="m61 22h6v20h-6z"/><path class="r2" d="m61 86h6v20h-6z"/><path class="r2" d="m22 61h20v6h-20z"/><path class="r2" d="m86 61h20v6h-20z"/><path class="r2" d="m44 66 8-14 8 22 8-16 6 8h14v6h-17l-4-5-9 18-8-24-6 11h-14v-6z"/></svg>"#;

/// Rasterize an SVG string at the given width, preserving aspect ratio.
/// Returns straight-alpha RGBA pixels.
pub fn rasterize_svg(svg: &str, width: u32) -> Option<(Vec<u8>, u32, u32)> {
    let tree = resvg::usvg::Tree::from_str(svg, &resvg::usvg::Options::default()).ok()?;
    let svg_size = tree.size();
    let scale = width as f32 / svg_size.width();
    let height = (svg_size.height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), width, height))
}

/// Load the logo for the sidebar header. A `logo.svg` in the data directory
/// takes precedence; anything missing or unparsable falls back to the
/// built-in placeholder, and as a last resort to a blank tile.
pub fn load_logo(data_dir: &Path, width: u32) -> (Vec<u8>, u32, u32) {
    let custom = data_dir.join("logo.svg");
    if let Ok(svg) = std::fs::read_to_string(&custom) {
        if let Some(raster) = rasterize_svg(&svg, width) {
            return raster;
        }
        warn!(path = %custom.display(), "Logo file is not valid SVG, using placeholder");
    }
    rasterize_svg(PLACEHOLDER_LOGO_SVG, width)
        .unwrap_or_else(|| (vec![0; (width * width * 4) as usize], width, width))
}

/// Rasterize the placeholder logo to a square image for the window icon.
pub fn rasterize_logo_square(size: u32) -> Option<(Vec<u8>, u32, u32)> {
    let tree =
        resvg::usvg::Tree::from_str(PLACEHOLDER_LOGO_SVG, &resvg::usvg::Options::default()).ok()?;
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), size, size))
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_logo_falls_back_to_placeholder() {
        let dir = std::env::temp_dir().join("radiology-analyzer-test-nologo");
        std::fs::remove_dir_all(&dir).ok();
        let (pixels, w, h) = load_logo(&dir, 64);
        assert_eq!(w, 64);
        assert_eq!(pixels.len(), (w * h * 4) as usize);
        // Placeholder is not fully transparent
        assert!(pixels.iter().any(|&b| b != 0));
    }

    #[test]
    fn invalid_logo_file_falls_back_to_placeholder() {
        let dir = std::env::temp_dir().join("radiology-analyzer-test-badlogo");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("logo.svg"), "<not-svg").unwrap();
        let (pixels, _, _) = load_logo(&dir, 32);
        assert!(pixels.iter().any(|&b| b != 0));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn square_icon_has_requested_size() {
        let (pixels, w, h) = rasterize_logo_square(48).unwrap();
        assert_eq!((w, h), (48, 48));
        assert_eq!(pixels.len(), 48 * 48 * 4);
    }
}
