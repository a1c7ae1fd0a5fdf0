use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File extensions accepted as photo sources (lowercase, without the dot).
pub const ACCEPTED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "bmp"];

/// Prefix used for rendered composite files.
pub const OUTPUT_PREFIX: &str = "frame6slots";

/// Enumeration of the available frame template styles
///
/// Each style maps to a pre-designed template asset shipped with the
/// kiosk installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStyle {
    Black,
    Brown,
    Red,
}

impl FrameStyle {
    /// Parses a string to determine the frame style
    ///
    /// # Arguments
    /// * `s` - String to analyze (accepts "b"/"black", "n"/"brown", "r"/"red")
    ///
    /// # Returns
    /// * `Ok(FrameStyle)` if the string is recognized
    /// * `Err(&'static str)` if the string is not valid
    pub fn from_str(s: &str) -> Result<Self, &'static str> {
        match s.to_lowercase().as_str() {
            "b" | "black" => Ok(FrameStyle::Black),
            "n" | "brown" => Ok(FrameStyle::Brown),
            "r" | "red" => Ok(FrameStyle::Red),
            _ => Err("Invalid frame style"),
        }
    }

    /// File name of the template asset under the base directory.
    pub fn asset_name(&self) -> &'static str {
        match self {
            FrameStyle::Black => "BF.png",
            FrameStyle::Brown => "FT.png",
            FrameStyle::Red => "RF.png",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FrameStyle::Black => "Black",
            FrameStyle::Brown => "Brown",
            FrameStyle::Red => "Red",
        }
    }
}

/// Fixed geometry of a frame template
///
/// Slot rectangles are constants of the template and are never derived
/// from image content.
#[derive(Debug, Clone, Copy)]
pub struct FrameLayout {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Width of each photo slot
    pub slot_w: u32,
    /// Height of each photo slot
    pub slot_h: u32,
    /// Top-left corner of each slot, in paste order
    pub slots: [(i64, i64); 6],
}

impl FrameLayout {
    /// The shipped 4x6" print layout at 300 DPI: 1200x1800 canvas with
    /// two columns of three 542x408 slots.
    pub fn print_4x6() -> Self {
        FrameLayout {
            width: 1200,
            height: 1800,
            slot_w: 542,
            slot_h: 408,
            slots: [
                (45, 80),   // top left
                (45, 490),  // middle left
                (45, 900),  // bottom left
                (630, 80),  // top right
                (630, 490), // middle right
                (630, 900), // bottom right
            ],
        }
    }
}

/// Process configuration, built once at startup and passed into the core
///
/// All paths derive from one base directory so a kiosk installation is a
/// single folder containing templates, credentials, input and output.
#[derive(Debug, Clone)]
pub struct BoothConfig {
    pub base_dir: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub state_file: PathBuf,
    pub client_secrets: PathBuf,
    pub credentials: PathBuf,
    pub frame_style: FrameStyle,
    pub enable_upload: bool,
    pub layout: FrameLayout,
}

impl BoothConfig {
    pub fn new(base_dir: impl Into<PathBuf>, frame_style: FrameStyle, enable_upload: bool) -> Self {
        let base_dir = base_dir.into();
        BoothConfig {
            input_dir: base_dir.join("input_images"),
            output_dir: base_dir.join("output_images"),
            state_file: base_dir.join("last_selection.json"),
            client_secrets: base_dir.join("client_secrets.json"),
            credentials: base_dir.join("credentials.json"),
            frame_style,
            enable_upload,
            layout: FrameLayout::print_4x6(),
            base_dir,
        }
    }

    /// Path of the template asset for the configured frame style.
    pub fn frame_path(&self) -> PathBuf {
        self.base_dir.join(self.frame_style.asset_name())
    }

    pub fn ensure_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.output_dir)
    }

    /// Directory offered to the operator as the starting point of the
    /// file chooser: the input directory when it exists, the base
    /// directory otherwise.
    pub fn chooser_start_dir(&self) -> &Path {
        if self.input_dir.exists() {
            &self.input_dir
        } else {
            &self.base_dir
        }
    }
}

/// Default base directory: `FRAMEBOOTH_BASE_DIR` when set, the current
/// directory otherwise.
pub fn default_base_dir() -> PathBuf {
    env::var("FRAMEBOOTH_BASE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_style_from_str() {
        assert_eq!(FrameStyle::from_str("red"), Ok(FrameStyle::Red));
        assert_eq!(FrameStyle::from_str("R"), Ok(FrameStyle::Red));
        assert_eq!(FrameStyle::from_str("Black"), Ok(FrameStyle::Black));
        assert_eq!(FrameStyle::from_str("b"), Ok(FrameStyle::Black));
        assert_eq!(FrameStyle::from_str("brown"), Ok(FrameStyle::Brown));
        assert!(FrameStyle::from_str("turquoise").is_err());
    }

    #[test]
    fn config_derives_paths_from_base() {
        let config = BoothConfig::new("/srv/booth", FrameStyle::Red, true);
        assert_eq!(config.state_file, PathBuf::from("/srv/booth/last_selection.json"));
        assert_eq!(config.output_dir, PathBuf::from("/srv/booth/output_images"));
        assert_eq!(config.frame_path(), PathBuf::from("/srv/booth/RF.png"));
    }

    #[test]
    fn cloned_config_switches_style_without_touching_paths() {
        let bootstrap = BoothConfig::new("/srv/booth", FrameStyle::Red, true);
        let mut render_config = bootstrap.clone();
        render_config.frame_style = FrameStyle::Brown;
        render_config.enable_upload = false;
        assert_eq!(render_config.frame_path(), PathBuf::from("/srv/booth/FT.png"));
        assert_eq!(render_config.state_file, bootstrap.state_file);
        assert_eq!(bootstrap.frame_path(), PathBuf::from("/srv/booth/RF.png"));
    }

    #[test]
    fn layout_slots_fit_the_canvas() {
        let layout = FrameLayout::print_4x6();
        for (x, y) in layout.slots {
            assert!(x as u32 + layout.slot_w <= layout.width);
            assert!(y as u32 + layout.slot_h <= layout.height);
        }
    }
}
