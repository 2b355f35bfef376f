// Files written on behalf of the user: downloads and preview pages

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const DOWNLOAD_STEM: &str = "Generated-Component";
pub const PREVIEW_FILE: &str = "preview.html";

pub struct Exporter {
    download_dir: PathBuf,
    preview_dir: PathBuf,
}

impl Exporter {
    pub fn new() -> Result<Self> {
        let download_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("Could not determine download directory"))?;

        let preview_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?
            .join("uiforge");

        Ok(Self::with_dirs(download_dir, preview_dir))
    }

    pub const fn with_dirs(download_dir: PathBuf, preview_dir: PathBuf) -> Self {
        Self {
            download_dir,
            preview_dir,
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// First free `Generated-Component.html`, `Generated-Component (1).html`, ...
    pub fn next_download_path(&self) -> PathBuf {
        let first = self.download_dir.join(format!("{DOWNLOAD_STEM}.html"));
        if !first.exists() {
            return first;
        }
        (1..)
            .map(|n| self.download_dir.join(format!("{DOWNLOAD_STEM} ({n}).html")))
            .find(|path| !path.exists())
            .unwrap_or(first)
    }

    pub fn save_download(&self, code: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.download_dir).context("Failed to create download directory")?;

        let path = self.next_download_path();
        fs::write(&path, code).context("Failed to write downloaded component")?;

        tracing::info!(path = %path.display(), bytes = code.len(), "saved component");
        Ok(path)
    }

    pub fn preview_path(&self) -> PathBuf {
        self.preview_dir.join(PREVIEW_FILE)
    }

    /// Rewrites the live preview page and returns its location.
    pub fn write_preview(&self, code: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.preview_dir).context("Failed to create preview directory")?;

        let path = self.preview_path();
        fs::write(&path, sandboxed_document(code)).context("Failed to write preview file")?;

        tracing::debug!(path = %path.display(), "preview refreshed");
        Ok(path)
    }
}

/// Full-window page that renders `code` in a frame allowed to run scripts
/// but not to navigate the top window, open popups or reach its origin.
pub fn sandboxed_document(code: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Component Preview</title>\n\
         <style>html,body{{margin:0;height:100%;}}iframe{{border:0;width:100%;height:100%;display:block;}}</style>\n\
         </head>\n\
         <body>\n\
         <iframe sandbox=\"allow-scripts\" srcdoc=\"{}\"></iframe>\n\
         </body>\n\
         </html>\n",
        html_escape::encode_double_quoted_attribute(code)
    )
}
