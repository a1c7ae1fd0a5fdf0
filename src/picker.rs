use log::warn;
use std::path::{Path, PathBuf};

/// Opens the native file chooser for a single image
///
/// Uses platform system commands (PowerShell / osascript / zenity) so no
/// toolkit-specific dialog dependency is needed. Returns `None` when the
/// operator cancels or the dialog cannot be shown; the caller decides on
/// the fallback.
pub fn pick_image(initial_dir: &Path) -> Option<PathBuf> {
    match open_image_dialog(initial_dir) {
        Ok(picked) => picked,
        Err(e) => {
            warn!("file dialog unavailable: {}", e);
            None
        }
    }
}

#[cfg(target_os = "windows")]
fn open_image_dialog(initial_dir: &Path) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    use std::process::Command;

    // Windows PowerShell command for file dialog
    let script = format!(
        r#"
        Add-Type -AssemblyName System.Windows.Forms
        $openFileDialog = New-Object System.Windows.Forms.OpenFileDialog
        $openFileDialog.Filter = 'Image files (*.jpg;*.jpeg;*.png;*.webp;*.bmp)|*.jpg;*.jpeg;*.png;*.webp;*.bmp|All files (*.*)|*.*'
        $openFileDialog.InitialDirectory = '{}'
        $openFileDialog.Title = 'Select Photo'
        if ($openFileDialog.ShowDialog() -eq [System.Windows.Forms.DialogResult]::OK) {{
            $openFileDialog.FileName
        }}
        "#,
        initial_dir.display()
    );

    let output = Command::new("powershell")
        .arg("-Command")
        .arg(script)
        .output()?;

    let result_string = String::from_utf8_lossy(&output.stdout);
    let result = result_string.trim();
    Ok(if result.is_empty() {
        None
    } else {
        Some(PathBuf::from(result))
    })
}

#[cfg(target_os = "macos")]
fn open_image_dialog(initial_dir: &Path) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    use std::process::Command;

    // macOS osascript command for file dialog
    let script = format!(
        r#"tell application "System Events" to return POSIX path of (choose file with prompt "Select Photo" of type {{"jpg", "jpeg", "png", "webp", "bmp"}} default location "{}")"#,
        initial_dir.display()
    );

    let output = Command::new("osascript").arg("-e").arg(script).output()?;

    let output_str = String::from_utf8_lossy(&output.stdout);
    let result = output_str.trim();
    Ok(if result.is_empty() {
        None
    } else {
        Some(PathBuf::from(result))
    })
}

#[cfg(target_os = "linux")]
fn open_image_dialog(initial_dir: &Path) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    use std::process::Command;

    // Linux zenity command for file dialog
    let output = Command::new("zenity")
        .arg("--file-selection")
        .arg("--title=Select Photo")
        .arg("--file-filter=Image files | *.jpg *.jpeg *.png *.webp *.bmp")
        .arg(format!("--filename={}/", initial_dir.display()))
        .output()?;

    let output_str = String::from_utf8_lossy(&output.stdout);
    let result = output_str.trim();
    Ok(if result.is_empty() {
        None
    } else {
        Some(PathBuf::from(result))
    })
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn open_image_dialog(_initial_dir: &Path) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    eprintln!("File dialog not supported on this platform");
    Ok(None)
}
