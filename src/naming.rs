use chrono::Local;
use std::path::{Path, PathBuf};

/// Produces an output path that does not collide with an existing file
///
/// The name is `{prefix}_{YYYYMMDD-HHMMSS}{ext}`; if that already exists
/// (same-second renders) a `_1`, `_2`, ... suffix is appended until an
/// unused path is found. Single-operator assumption: no locking against
/// concurrent writers of the same directory.
pub fn unique_output_path(out_dir: &Path, prefix: &str, ext: &str) -> PathBuf {
    let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
    let first = out_dir.join(format!("{}_{}{}", prefix, ts, ext));
    if !first.exists() {
        return first;
    }
    let mut i = 1u32;
    loop {
        let candidate = out_dir.join(format!("{}_{}_{}{}", prefix, ts, i, ext));
        if !candidate.exists() {
            return candidate;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn never_returns_an_existing_path() {
        let dir = TempDir::new().unwrap();
        let mut produced = Vec::new();
        for _ in 0..4 {
            let path = unique_output_path(dir.path(), "frame6slots", ".png");
            assert!(!path.exists());
            fs::write(&path, b"png").unwrap();
            produced.push(path);
        }
        produced.sort();
        produced.dedup();
        assert_eq!(produced.len(), 4);
    }

    #[test]
    fn name_carries_prefix_and_extension() {
        let dir = TempDir::new().unwrap();
        let path = unique_output_path(dir.path(), "frame6slots", ".png");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("frame6slots_"));
        assert!(name.ends_with(".png"));
        // prefix + underscore + YYYYMMDD-HHMMSS + .png
        assert_eq!(name.len(), "frame6slots_".len() + 15 + 4);
    }
}
