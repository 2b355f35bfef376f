// Clipboard and browser side effects

use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum DesktopError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),
    #[error("could not open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg_attr(test, mockall::automock)]
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), DesktopError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait Launcher {
    fn open(&self, path: &Path) -> Result<(), DesktopError>;
}

/// System clipboard. The handle is created per copy so a missing display
/// server only fails the copy, not startup.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), DesktopError> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text.to_string())?;
        Ok(())
    }
}

/// Opens files with the desktop's default handler, normally the browser for HTML.
#[derive(Debug, Default)]
pub struct BrowserLauncher;

impl Launcher for BrowserLauncher {
    fn open(&self, path: &Path) -> Result<(), DesktopError> {
        open::that_detached(path).map_err(|source| DesktopError::Open {
            path: path.display().to_string(),
            source,
        })
    }
}
