use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread;

use crate::config::{BoothConfig, FrameStyle};
use crate::error::BoothError;
use crate::flow::{render_and_share, resolve_slots, slot_display};
use crate::picker;
use crate::selection::SelectionStore;

slint::include_modules!();

pub struct BoothApp {
    window: BoothWindow,
    /// Bootstrap configuration; style and upload flag are replaced with
    /// the form's values at render time, the paths stay as-is.
    config: BoothConfig,
    selection: Arc<Mutex<[PathBuf; 3]>>,
}

impl BoothApp {
    pub fn new(base_dir: PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let window = BoothWindow::new()?;
        let config = BoothConfig::new(base_dir, FrameStyle::Red, true);

        // Show the previous run's selection right away
        let selection = SelectionStore::new(config.state_file.clone()).load();
        set_slot_labels(&window, &selection);

        Ok(BoothApp {
            window,
            config,
            selection: Arc::new(Mutex::new(selection)),
        })
    }

    pub fn setup_callbacks(&self) -> Result<(), Box<dyn std::error::Error>> {
        let window_weak = self.window.as_weak();

        // Per-slot file chooser callback
        self.window.on_pick_slot({
            let window_weak = window_weak.clone();
            let selection = self.selection.clone();
            let config = self.config.clone();
            move |idx| {
                if let Some(window) = window_weak.upgrade() {
                    match picker::pick_image(config.chooser_start_dir()) {
                        Some(picked) if picked.exists() => {
                            let mut slots = selection.lock().unwrap();
                            let idx = idx.clamp(0, 2) as usize;
                            slots[idx] = picked;
                            set_slot_labels(&window, &slots);
                        }
                        _ => {
                            // Cancelled: keep whatever the slot held
                        }
                    }
                }
            }
        });

        // Open the output folder in the platform file manager
        self.window.on_open_output({
            let window_weak = window_weak.clone();
            let config = self.config.clone();
            move || {
                if let Some(window) = window_weak.upgrade() {
                    if let Err(e) = open_output_folder(&config) {
                        window.set_status_text(format!("Could not open folder: {}", e).into());
                    }
                }
            }
        });

        // Render callback: resolve, persist, compose on a worker thread
        self.window.on_render_frame({
            let window_weak = window_weak.clone();
            let selection = self.selection.clone();
            let bootstrap = self.config.clone();
            move || {
                if let Some(window) = window_weak.upgrade() {
                    let style = match FrameStyle::from_str(&window.get_frame_style()) {
                        Ok(style) => style,
                        Err(e) => {
                            window.set_status_text(e.into());
                            return;
                        }
                    };

                    window.set_processing(true);
                    window.set_status_text("Rendering frame...".into());

                    let mut config = bootstrap.clone();
                    config.frame_style = style;
                    config.enable_upload = window.get_upload_enabled();

                    let selection = selection.clone();
                    let window_weak = window_weak.clone();
                    thread::spawn(move || {
                        let result = render_in_background(&config, &selection);
                        let _ = window_weak.upgrade_in_event_loop(move |window| {
                            window.set_processing(false);
                            match result {
                                Ok((resolved, status)) => {
                                    set_slot_labels(&window, &resolved);
                                    window.set_status_text(status.into());
                                }
                                Err(e) => {
                                    window.set_status_text(format!("Render error: {}", e).into());
                                }
                            }
                        });
                    });
                }
            }
        });

        Ok(())
    }

    pub fn run(&self) -> Result<(), slint::PlatformError> {
        self.window.run()
    }
}

fn set_slot_labels(window: &BoothWindow, slots: &[PathBuf; 3]) {
    window.set_slot1_name(slot_display(&slots[0]).into());
    window.set_slot2_name(slot_display(&slots[1]).into());
    window.set_slot3_name(slot_display(&slots[2]).into());
}

/// Platform command that reveals a folder in the file manager.
fn folder_open_command() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

fn open_output_folder(config: &BoothConfig) -> Result<(), BoothError> {
    config.ensure_dirs()?;
    Command::new(folder_open_command())
        .arg(&config.output_dir)
        .spawn()?;
    Ok(())
}

/// Worker-thread render: fill missing slots, persist the selection,
/// compose and (optionally) share. Returns the resolved slots so the UI
/// can refresh its labels, plus a status message.
fn render_in_background(
    config: &BoothConfig,
    selection: &Arc<Mutex<[PathBuf; 3]>>,
) -> Result<([PathBuf; 3], String), BoothError> {
    let slots = selection.lock().unwrap().clone();
    let resolved = resolve_slots(config, slots)?;

    let store = SelectionStore::new(config.state_file.clone());
    store.save(&resolved)?;
    *selection.lock().unwrap() = resolved.clone();

    let outcome = render_and_share(config, &resolved)?;
    let status = format!("Done!\n{}", outcome.summary());
    Ok((resolved, status))
}
