use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::chart::RenderOptions;

/// Name of the optional config file looked up next to the executable.
pub const CONFIG_FILE: &str = "datavision.json";

/// Application settings. Every field has a default, so a partial file works.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory the file catalog lists.
    pub data_dir: PathBuf,
    /// Rows shown in the data preview.
    pub preview_rows: usize,
    /// Initial window size in points.
    pub window_size: [f32; 2],
    /// Iso-lines drawn on contour plots.
    pub contour_levels: usize,
    /// Bins per axis on histograms.
    pub histogram_bins: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: program_dir().join("data"),
            preview_rows: 5,
            window_size: [1100.0, 800.0],
            contour_levels: 8,
            histogram_bins: 20,
        }
    }
}

impl AppConfig {
    /// Load `datavision.json` from the program directory, falling back to
    /// defaults when it is missing or malformed.
    pub fn load() -> Self {
        let path = program_dir().join(CONFIG_FILE);
        if !path.is_file() {
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).context("reading config file")?;
        serde_json::from_str(&text).context("parsing config file")
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            contour_levels: self.contour_levels,
            histogram_bins: self.histogram_bins,
        }
    }
}

/// Directory holding the executable, or the working directory when that
/// cannot be determined.
pub fn program_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
