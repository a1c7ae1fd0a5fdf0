use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use log::debug;
use std::path::{Path, PathBuf};

use crate::config::FrameLayout;
use crate::error::BoothError;

/// Scales an image down (or up) to fit inside a bounding box
///
/// # Arguments
/// * `img` - Source image
/// * `max_w` - Maximum width of the result
/// * `max_h` - Maximum height of the result
///
/// # Returns
/// The resized image. The scale factor is uniform, so the aspect ratio is
/// preserved exactly; the constraining axis matches its bound within
/// integer rounding and the other axis never exceeds its bound.
pub fn fit_inside(img: &DynamicImage, max_w: u32, max_h: u32) -> RgbaImage {
    let (w, h) = (img.width(), img.height());
    let scale = (max_w as f64 / w as f64).min(max_h as f64 / h as f64);
    let fit_w = ((w as f64 * scale).round() as u32).max(1);
    let fit_h = ((h as f64 * scale).round() as u32).max(1);
    imageops::resize(&img.to_rgba8(), fit_w, fit_h, FilterType::Lanczos3)
}

/// Renders selected photos into the fixed slots of a frame template
///
/// The compositor owns the template geometry and path; the photo
/// selection changes from render to render.
pub struct FrameCompositor {
    layout: FrameLayout,
    template_path: PathBuf,
}

impl FrameCompositor {
    pub fn new(layout: FrameLayout, template_path: PathBuf) -> Self {
        FrameCompositor {
            layout,
            template_path,
        }
    }

    /// Composes 1 to 3 source photos into the six-slot frame
    ///
    /// Slot `i` receives source `i mod N`, so three photos fill all six
    /// slots by appearing twice each. Fewer distinct photos repeating in
    /// the print is the intended kiosk behavior.
    ///
    /// # Processing Steps
    /// 1. Decode the frame template and check its dimensions
    /// 2. Allocate a fully transparent canvas of the same size
    /// 3. Fit each photo into its slot box and paste it centered,
    ///    using the photo's own transparency as the paste mask
    /// 4. Overlay the template on top, so opaque template artwork
    ///    covers the photo area and slot interiors show through
    ///
    /// # Errors
    /// A missing or undecodable template or source aborts the render;
    /// nothing is written on failure.
    pub fn render(&self, sources: &[PathBuf]) -> Result<RgbaImage, BoothError> {
        if sources.is_empty() {
            return Err(BoothError::EmptySelection);
        }
        if !self.template_path.exists() {
            return Err(BoothError::MissingTemplate(self.template_path.clone()));
        }

        let template = image::open(&self.template_path)?.to_rgba8();
        let expected = (self.layout.width, self.layout.height);
        let actual = (template.width(), template.height());
        if actual != expected {
            return Err(BoothError::TemplateSizeMismatch { expected, actual });
        }

        let mut canvas =
            RgbaImage::from_pixel(expected.0, expected.1, Rgba([255, 255, 255, 0]));

        for (i, &(slot_x, slot_y)) in self.layout.slots.iter().enumerate() {
            let source = &sources[i % sources.len()];
            debug!("slot {} <- {}", i, source.display());

            let photo = image::open(source)?;
            let fitted = fit_inside(&photo, self.layout.slot_w, self.layout.slot_h);

            // Center the fitted photo within the slot rectangle
            let paste_x = slot_x + ((self.layout.slot_w - fitted.width()) / 2) as i64;
            let paste_y = slot_y + ((self.layout.slot_h - fitted.height()) / 2) as i64;
            imageops::overlay(&mut canvas, &fitted, paste_x, paste_y);
        }

        // Template on top: its opaque borders and labels win over the photos
        imageops::overlay(&mut canvas, &template, 0, 0);
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FrameLayout;
    use tempfile::TempDir;

    fn solid_png(dir: &Path, name: &str, w: u32, h: u32, rgba: [u8; 4]) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(w, h, Rgba(rgba)).save(&path).unwrap();
        path
    }

    fn transparent_template(dir: &Path, layout: &FrameLayout) -> PathBuf {
        solid_png(dir, "template.png", layout.width, layout.height, [0, 0, 0, 0])
    }

    #[test]
    fn fit_inside_bounds_landscape() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(4000, 3000));
        let fitted = fit_inside(&img, 542, 408);
        assert!(fitted.width() <= 542 && fitted.height() <= 408);
        // 542/4000 is the smaller ratio: width hits its bound exactly
        assert_eq!(fitted.width(), 542);
        assert_eq!(fitted.height(), 407);
    }

    #[test]
    fn fit_inside_exact_on_constraining_axis() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(1084, 408));
        let fitted = fit_inside(&img, 542, 408);
        assert_eq!((fitted.width(), fitted.height()), (542, 204));
    }

    #[test]
    fn fit_inside_upscales_small_sources() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(100, 100));
        let fitted = fit_inside(&img, 542, 408);
        assert_eq!((fitted.width(), fitted.height()), (408, 408));
    }

    #[test]
    fn fit_inside_preserves_aspect_ratio() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(3000, 2000));
        let fitted = fit_inside(&img, 542, 408);
        let ratio_in = 3000.0 / 2000.0;
        let ratio_out = fitted.width() as f64 / fitted.height() as f64;
        assert!((ratio_in - ratio_out).abs() < 0.01);
    }

    #[test]
    fn render_cycles_three_sources_across_six_slots() {
        let dir = TempDir::new().unwrap();
        let layout = FrameLayout::print_4x6();
        let template = transparent_template(dir.path(), &layout);
        let sources = vec![
            solid_png(dir.path(), "a.png", 800, 600, [220, 30, 30, 255]),
            solid_png(dir.path(), "b.png", 800, 600, [30, 220, 30, 255]),
            solid_png(dir.path(), "c.png", 800, 600, [30, 30, 220, 255]),
        ];

        let compositor = FrameCompositor::new(layout, template);
        let out = compositor.render(&sources).unwrap();
        assert_eq!((out.width(), out.height()), (1200, 1800));

        // Sample the center of each slot: slot i must show source i % 3
        let expected = [
            [220u8, 30, 30],
            [30, 220, 30],
            [30, 30, 220],
            [220, 30, 30],
            [30, 220, 30],
            [30, 30, 220],
        ];
        for (i, &(sx, sy)) in layout.slots.iter().enumerate() {
            let cx = sx as u32 + layout.slot_w / 2;
            let cy = sy as u32 + layout.slot_h / 2;
            let px = out.get_pixel(cx, cy);
            for c in 0..3 {
                let diff = (px[c] as i32 - expected[i][c] as i32).abs();
                assert!(diff < 12, "slot {} channel {} off by {}", i, c, diff);
            }
            assert!(px[3] > 250, "slot {} center should be opaque", i);
        }
    }

    #[test]
    fn render_with_single_source_fills_every_slot() {
        let dir = TempDir::new().unwrap();
        let layout = FrameLayout::print_4x6();
        let template = transparent_template(dir.path(), &layout);
        let sources = vec![solid_png(dir.path(), "only.png", 542, 408, [10, 200, 120, 255])];

        let out = FrameCompositor::new(layout, template)
            .render(&sources)
            .unwrap();
        for &(sx, sy) in layout.slots.iter() {
            let px = out.get_pixel(sx as u32 + 271, sy as u32 + 204);
            assert!(px[1] > 150 && px[3] > 250);
        }
    }

    #[test]
    fn template_is_drawn_over_the_photos() {
        let dir = TempDir::new().unwrap();
        let layout = FrameLayout::print_4x6();
        // Fully opaque template: photos must be invisible in the result
        let template = solid_png(
            dir.path(),
            "opaque.png",
            layout.width,
            layout.height,
            [5, 5, 5, 255],
        );
        let sources = vec![solid_png(dir.path(), "p.png", 542, 408, [255, 255, 255, 255])];

        let out = FrameCompositor::new(layout, template)
            .render(&sources)
            .unwrap();
        let (sx, sy) = layout.slots[0];
        let px = out.get_pixel(sx as u32 + 10, sy as u32 + 10);
        assert_eq!(px[0], 5);
    }

    #[test]
    fn render_fails_without_template() {
        let dir = TempDir::new().unwrap();
        let layout = FrameLayout::print_4x6();
        let compositor = FrameCompositor::new(layout, dir.path().join("nope.png"));
        let src = solid_png(dir.path(), "p.png", 10, 10, [0, 0, 0, 255]);
        match compositor.render(&[src]) {
            Err(BoothError::MissingTemplate(_)) => {}
            other => panic!("expected MissingTemplate, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn render_fails_on_template_size_mismatch() {
        let dir = TempDir::new().unwrap();
        let layout = FrameLayout::print_4x6();
        let template = solid_png(dir.path(), "small.png", 600, 900, [0, 0, 0, 0]);
        let src = solid_png(dir.path(), "p.png", 10, 10, [0, 0, 0, 255]);
        match FrameCompositor::new(layout, template).render(&[src]) {
            Err(BoothError::TemplateSizeMismatch { actual, .. }) => {
                assert_eq!(actual, (600, 900));
            }
            other => panic!("expected size mismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn render_fails_on_empty_selection() {
        let dir = TempDir::new().unwrap();
        let layout = FrameLayout::print_4x6();
        let template = transparent_template(dir.path(), &layout);
        match FrameCompositor::new(layout, template).render(&[]) {
            Err(BoothError::EmptySelection) => {}
            other => panic!("expected EmptySelection, got {:?}", other.map(|_| ())),
        }
    }
}
