use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;

/// Writes timestamped PNG screenshots for human review.
#[derive(Debug, Clone)]
pub struct ScreenshotWriter {
    dir: PathBuf,
}

impl ScreenshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the next screenshot for `label` would be written to.
    pub fn path_for(&self, label: &str) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d_%H%M%S_%3f");
        self.dir.join(format!("{}_{}.png", sanitize_label(label), stamp))
    }

    /// Write `png` under a timestamped name, creating the directory if needed.
    pub fn write(&self, label: &str, png: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(label);
        std::fs::write(&path, png)?;
        Ok(path)
    }
}

/// Turn a free-form step label into a safe file stem.
pub fn sanitize_label(label: &str) -> String {
    let stem: String = label
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "screenshot".to_string()
    } else {
        stem
    }
}
