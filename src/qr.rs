use image::{GrayImage, Luma};
use qrcode::QrCode;
use std::path::{Path, PathBuf};

use crate::error::BoothError;

/// Pixel width the scannable code is scaled towards.
const CODE_WIDTH: u32 = 512;

/// Encodes a share URL into a scannable grayscale image
///
/// Modules are scaled by an integer factor towards `target_width`, so the
/// result is square and at least one pixel per module.
pub fn encode_url(url: &str, target_width: u32) -> Result<GrayImage, BoothError> {
    let code = QrCode::new(url.as_bytes()).map_err(|e| BoothError::Qr(e.to_string()))?;
    let modules = code.to_colors();
    let module_count = code.width() as u32;

    let scale = (target_width / module_count).max(1);
    let img_size = module_count * scale;
    let mut img = GrayImage::from_pixel(img_size, img_size, Luma([255u8]));

    for (i, color) in modules.iter().enumerate() {
        if *color != qrcode::Color::Dark {
            continue;
        }
        let x = (i as u32) % module_count;
        let y = (i as u32) / module_count;
        for dx in 0..scale {
            for dy in 0..scale {
                img.put_pixel(x * scale + dx, y * scale + dy, Luma([0u8]));
            }
        }
    }

    Ok(img)
}

/// `{composite_stem}_qr.png` next to the composite.
pub fn code_path_for(composite: &Path) -> PathBuf {
    let stem = composite
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    composite.with_file_name(format!("{}_qr.png", stem))
}

/// Renders and saves the code image for a composite's share URL.
pub fn save_for(composite: &Path, url: &str) -> Result<PathBuf, BoothError> {
    let img = encode_url(url, CODE_WIDTH)?;
    let path = code_path_for(composite);
    img.save(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn encode_url_produces_square_image() {
        let img = encode_url("https://drive.google.com/uc?export=view&id=abc123", 512).unwrap();
        assert!(img.width() > 0);
        assert_eq!(img.width(), img.height());
    }

    #[test]
    fn encode_url_contains_dark_modules() {
        let img = encode_url("https://example.com", 200).unwrap();
        assert!(img.pixels().any(|p| p[0] == 0));
        assert!(img.pixels().any(|p| p[0] == 255));
    }

    #[test]
    fn code_path_appends_qr_suffix() {
        let path = code_path_for(Path::new("/out/frame6slots_20251109-141523.png"));
        assert_eq!(
            path,
            Path::new("/out/frame6slots_20251109-141523_qr.png")
        );
    }

    #[test]
    fn save_for_writes_next_to_composite() {
        let dir = TempDir::new().unwrap();
        let composite = dir.path().join("frame6slots_x.png");
        let saved = save_for(&composite, "https://example.com/view").unwrap();
        assert_eq!(saved, dir.path().join("frame6slots_x_qr.png"));
        assert!(saved.exists());
    }
}
