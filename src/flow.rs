use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::compositor::FrameCompositor;
use crate::config::{BoothConfig, OUTPUT_PREFIX};
use crate::error::BoothError;
use crate::naming::unique_output_path;
use crate::qr;
use crate::selection::{auto_pick_newest, slot_is_valid};
use crate::upload::DriveUploader;

/// What one render run produced
#[derive(Debug)]
pub struct RenderOutcome {
    /// The saved composite image
    pub composite: PathBuf,
    /// Public embed URL, when upload is enabled and succeeded
    pub share_url: Option<String>,
    /// Saved QR code image, when a share URL exists
    pub qr_code: Option<PathBuf>,
    /// Non-fatal sharing problem to surface to the operator
    pub share_error: Option<String>,
}

impl RenderOutcome {
    /// One-paragraph summary for the status line / stdout.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Saved composite: {}", self.composite.display())];
        if let Some(url) = &self.share_url {
            lines.push(format!("Share URL: {}", url));
        }
        if let Some(qr) = &self.qr_code {
            lines.push(format!("QR code: {}", qr.display()));
        }
        if let Some(err) = &self.share_error {
            lines.push(format!("Sharing problem: {}", err));
        }
        lines.join("\n")
    }
}

/// Fills unset or no-longer-existing slots with the newest input image
///
/// Errors when a slot needs a fallback and the input directory has no
/// candidate; that slot cannot be rendered.
pub fn resolve_slots(
    config: &BoothConfig,
    mut slots: [PathBuf; 3],
) -> Result<[PathBuf; 3], BoothError> {
    for slot in slots.iter_mut() {
        if !slot_is_valid(slot) {
            let fallback = auto_pick_newest(&config.input_dir)?;
            info!("slot fallback: {}", fallback.display());
            *slot = fallback;
        }
    }
    Ok(slots)
}

/// Renders the composite, writes it under a unique name, and optionally
/// uploads it and renders the QR code
///
/// The render itself is all-or-nothing: any decode failure aborts before
/// a file is written. Sharing failures never fail the run; the composite
/// is already on disk, so they are reported through
/// `RenderOutcome::share_error` instead.
pub fn render_and_share(
    config: &BoothConfig,
    slots: &[PathBuf; 3],
) -> Result<RenderOutcome, BoothError> {
    config.ensure_dirs()?;

    let compositor = FrameCompositor::new(config.layout, config.frame_path());
    let composite = compositor.render(slots.as_slice())?;

    let out_path = unique_output_path(&config.output_dir, OUTPUT_PREFIX, ".png");
    composite.save(&out_path)?;
    info!("composite written to {}", out_path.display());

    let mut outcome = RenderOutcome {
        composite: out_path,
        share_url: None,
        qr_code: None,
        share_error: None,
    };

    if config.enable_upload {
        share(config, &mut outcome);
    }

    Ok(outcome)
}

fn share(config: &BoothConfig, outcome: &mut RenderOutcome) {
    let url = match DriveUploader::new(config).and_then(|u| u.upload(&outcome.composite)) {
        Ok(url) => url,
        Err(e) => {
            warn!("upload failed, composite kept locally: {}", e);
            outcome.share_error = Some(e.to_string());
            return;
        }
    };

    match qr::save_for(&outcome.composite, &url) {
        Ok(path) => outcome.qr_code = Some(path),
        Err(e) => {
            warn!("QR generation failed: {}", e);
            outcome.share_error = Some(e.to_string());
        }
    }
    outcome.share_url = Some(url);
}

/// Display name of a slot for prompts and status lines.
pub fn slot_display(slot: &Path) -> String {
    if slot.as_os_str().is_empty() {
        "(unselected)".to_string()
    } else {
        slot.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| slot.display().to_string())
    }
}
