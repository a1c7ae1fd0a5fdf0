/*!
 * Framebooth - Event Kiosk Photo Frame Composer
 *
 * Composes three operator-picked photos into a six-slot 4x6" frame print,
 * remembers the selection between runs, and optionally uploads the result
 * to Google Drive with a scannable QR code for guests.
 *
 * Key Features:
 * - Six fixed photo slots filled by cycling three selected photos
 * - Black, brown and red frame template styles
 * - Selection persisted across runs (JSON state file)
 * - Optional Drive upload + QR code generation
 * - GUI and CLI interfaces over one shared core
 *
 * Author: Nicolas M.
 * Version: 0.1.0
 */

// Hide console window in GUI mode on Windows
#![cfg_attr(
    all(target_os = "windows", not(feature = "console")),
    windows_subsystem = "windows"
)]

use clap::{Arg, Command};
use std::error::Error;
use std::path::PathBuf;

mod compositor;
mod config;
mod error;
mod flow;
mod gui;
mod naming;
mod picker;
mod qr;
mod selection;
mod upload;

use config::{default_base_dir, BoothConfig, FrameStyle};
use error::BoothError;
use flow::{render_and_share, slot_display};
use gui::BoothApp;
use selection::{auto_pick_newest, slot_is_valid, SelectionStore};

/// Application entry point
///
/// Launches the GUI when invoked without arguments (or with `--gui`),
/// otherwise runs the command-line kiosk flow.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() == 1 || args.contains(&"--gui".to_string()) {
        println!("Launching Framebooth GUI...");
        return launch_gui();
    }

    launch_cli()
}

/// Launches the GUI version of the application
fn launch_gui() -> Result<(), Box<dyn Error>> {
    // Hide console window on Windows in GUI mode
    #[cfg(target_os = "windows")]
    hide_console_window();

    let app = BoothApp::new(default_base_dir())?;
    app.setup_callbacks()?;
    app.run()?;
    Ok(())
}

/// Hide console window on Windows
#[cfg(target_os = "windows")]
fn hide_console_window() {
    extern "system" {
        fn GetConsoleWindow() -> *mut std::ffi::c_void;
        fn ShowWindow(hwnd: *mut std::ffi::c_void, ncmdshow: i32) -> i32;
    }

    const SW_HIDE: i32 = 0;
    unsafe {
        let hwnd = GetConsoleWindow();
        if !hwnd.is_null() {
            ShowWindow(hwnd, SW_HIDE);
        }
    }
}

/// Launches the CLI version of the application
///
/// # Command Line Arguments
/// - `files`: Up to three photos; when given, the per-slot dialogs are skipped
/// - `-t, --frame`: Frame style (b/black, n/brown, r/red)
/// - `-b, --base-dir`: Kiosk base directory (templates, state, input/output)
/// - `--no-upload`: Keep the render local; skip Drive and the QR code
/// - `--gui`: Launch GUI mode
fn launch_cli() -> Result<(), Box<dyn Error>> {
    let matches = Command::new("framebooth")
        .version("0.1.0")
        .about("Compose three photos into a six-slot frame print and share it via QR")
        .arg(
            Arg::new("files")
                .help("Photo file(s) for the three slots (cycled when fewer than three)")
                .num_args(0..=3)
                .index(1),
        )
        .arg(
            Arg::new("frame")
                .short('t')
                .long("frame")
                .help("Frame style: b for black, n for brown, r for red")
                .value_name("STYLE")
                .default_value("r"),
        )
        .arg(
            Arg::new("base_dir")
                .short('b')
                .long("base-dir")
                .help("Kiosk base directory (defaults to FRAMEBOOTH_BASE_DIR or the current directory)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("no_upload")
                .long("no-upload")
                .help("Skip the Drive upload and QR code")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("gui")
                .long("gui")
                .help("Launch GUI mode")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let frame_style = FrameStyle::from_str(matches.get_one::<String>("frame").unwrap())
        .map_err(Box::<dyn Error>::from)?;
    let base_dir = matches
        .get_one::<String>("base_dir")
        .map(PathBuf::from)
        .unwrap_or_else(default_base_dir);
    let config = BoothConfig::new(base_dir, frame_style, !matches.get_flag("no_upload"));
    config.ensure_dirs()?;

    let store = SelectionStore::new(config.state_file.clone());
    let files: Vec<PathBuf> = matches
        .get_many::<String>("files")
        .map(|vals| vals.map(PathBuf::from).collect())
        .unwrap_or_default();

    let chosen = if files.is_empty() {
        pick_images_for_slots(&config, &store)?
    } else {
        slots_from_args(&files)?
    };
    store.save(&chosen)?;

    let outcome = render_and_share(&config, &chosen)?;
    println!("{}", outcome.summary());
    Ok(())
}

/// Cycles 1-3 positional photo paths into the three selection slots.
fn slots_from_args(files: &[PathBuf]) -> Result<[PathBuf; 3], BoothError> {
    for file in files {
        if !file.exists() {
            return Err(BoothError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("photo not found: {}", file.display()),
            )));
        }
    }
    Ok([
        files[0].clone(),
        files[1 % files.len()].clone(),
        files[2 % files.len()].clone(),
    ])
}

/// Interactive per-slot selection
///
/// For each slot: show the previous choice, open the native file chooser;
/// cancelling keeps a still-valid previous choice and otherwise falls back
/// to the newest image in the input directory.
fn pick_images_for_slots(
    config: &BoothConfig,
    store: &SelectionStore,
) -> Result<[PathBuf; 3], BoothError> {
    let mut chosen = store.load();

    for idx in 0..3 {
        println!(
            "Slot {}: {} (pick a file, cancel keeps it)",
            idx + 1,
            slot_display(&chosen[idx])
        );
        match picker::pick_image(config.chooser_start_dir()) {
            Some(picked) if picked.exists() => {
                println!("  -> new photo: {}", slot_display(&picked));
                chosen[idx] = picked;
            }
            _ => {
                if slot_is_valid(&chosen[idx]) {
                    println!("  -> keeping {}", slot_display(&chosen[idx]));
                } else {
                    let fallback = auto_pick_newest(&config.input_dir)?;
                    println!("  -> auto-picked newest: {}", slot_display(&fallback));
                    chosen[idx] = fallback;
                }
            }
        }
    }

    Ok(chosen)
}
