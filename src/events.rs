// Event types for async communication

use crate::progress::ProgressState;

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// New value for the cosmetic progress bar
    Progress(ProgressState),
    /// Progress bar returns to zero after a finished request
    ProgressReset,
    /// Extracted code from a successful generation
    GenerationSucceeded(String),
    /// Generation failed; carries the error text
    GenerationFailed(String),
}
