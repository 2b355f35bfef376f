use std::path::PathBuf;
use std::time::Instant;

use crate::desktop::{Clipboard, Launcher};
use crate::editor::EditorPane;
use crate::events::AppEvent;
use crate::export::Exporter;
use crate::models::{AppConfig, Framework, GenerationRequest};
use crate::progress::ProgressState;
use crate::toast::Toasts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Prompt form
    Home,
    /// Code editor with preview
    Editor,
}

#[derive(Debug)]
pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    pub show_help: bool,
    pub exit_pending: bool,
    pub prompt_input: String,
    pub framework_index: usize,
    pub pane: EditorPane,
    pub progress: ProgressState,
    pub toasts: Toasts,
    /// Set once the full-window preview has been opened in the browser
    pub preview_path: Option<PathBuf>,
    pub generation_available: Option<bool>,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let framework_index = Framework::SELECTABLE
            .iter()
            .position(|f| *f == config.default_framework)
            .unwrap_or(2);

        Self {
            screen: Screen::Home,
            should_quit: false,
            show_help: false,
            exit_pending: false,
            prompt_input: String::new(),
            framework_index,
            pane: EditorPane::new(),
            progress: ProgressState::default(),
            toasts: Toasts::default(),
            preview_path: None,
            generation_available: None,
        }
    }

    pub const fn quit(&mut self) {
        self.should_quit = true;
    }

    pub const fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub const fn selected_framework(&self) -> Framework {
        Framework::SELECTABLE[self.framework_index % Framework::SELECTABLE.len()]
    }

    pub const fn next_framework(&mut self) {
        self.framework_index = (self.framework_index + 1) % Framework::SELECTABLE.len();
    }

    pub const fn previous_framework(&mut self) {
        let len = Framework::SELECTABLE.len();
        self.framework_index = (self.framework_index + len - 1) % len;
    }

    /// Validates the form and moves to the editor in the loading state.
    /// Returns `None` when nothing should be sent.
    pub fn prepare_generation(&mut self) -> Option<GenerationRequest> {
        if self.pane.is_loading() || self.prompt_input.trim().is_empty() {
            return None;
        }

        let request = GenerationRequest::new(self.prompt_input.clone(), self.selected_framework());
        self.pane.begin_generation();
        self.screen = Screen::Editor;
        Some(request)
    }

    pub fn open_blank_editor(&mut self) {
        self.pane.open_blank();
        self.screen = Screen::Editor;
    }

    pub fn back_to_home(&mut self) {
        if !self.pane.is_loading() {
            self.screen = Screen::Home;
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pane.is_loading() || self.progress.is_active()
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            // A tick racing the abort must not pull a finished bar back
            AppEvent::Progress(state)
                if self.progress.is_complete() && !state.is_complete() =>
            {
                tracing::debug!(percent = state.percent, "ignoring late progress tick");
            }
            AppEvent::Progress(state) => self.progress = state,
            AppEvent::ProgressReset => self.progress.reset(),
            AppEvent::GenerationSucceeded(code) => {
                self.pane.complete_generation(&code);
            }
            AppEvent::GenerationFailed(error) => {
                tracing::error!("generation failed: {error}");
                self.pane.fail_generation();
                self.toasts.error("Failed to generate code");
            }
        }
    }

    pub fn copy_code(&mut self, clipboard: &mut dyn Clipboard) {
        if !self.pane.has_code() {
            self.toasts.error("No code to copy");
            return;
        }
        match clipboard.set_text(&self.pane.code()) {
            Ok(()) => self.toasts.success("Code copied to clipboard"),
            Err(e) => {
                tracing::warn!("copy failed: {e}");
                self.toasts.error("Failed to copy code");
            }
        }
    }

    pub fn download(&mut self, exporter: &Exporter) {
        if !self.pane.has_code() {
            self.toasts.error("No code to download");
            return;
        }
        match exporter.save_download(&self.pane.code()) {
            Ok(path) => self.toasts.success(format!("Downloaded to {}", path.display())),
            Err(e) => {
                tracing::warn!("download failed: {e:#}");
                self.toasts.error("Download failed");
            }
        }
    }

    pub fn open_preview(&mut self, exporter: &Exporter, launcher: &dyn Launcher) {
        if !self.pane.has_code() {
            self.toasts.error("Nothing to preview");
            return;
        }
        let opened = exporter
            .write_preview(&self.pane.code())
            .and_then(|path| {
                launcher.open(&path)?;
                Ok(path)
            });
        match opened {
            Ok(path) => self.preview_path = Some(path),
            Err(e) => {
                tracing::warn!("preview failed: {e:#}");
                self.toasts.error("Failed to open preview");
            }
        }
    }

    /// Re-renders the preview; the browser copy is rewritten if one is open.
    pub fn refresh_preview(&mut self, exporter: &Exporter) {
        self.pane.refresh_preview();
        if self.preview_path.is_none() {
            return;
        }
        if let Err(e) = exporter.write_preview(&self.pane.code()) {
            tracing::warn!("preview refresh failed: {e:#}");
            self.toasts.error("Failed to refresh preview");
        }
    }

    pub fn tick(&mut self) {
        self.toasts.prune(Instant::now());
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktop::{DesktopError, MockClipboard, MockLauncher};
    use crate::editor::{PaneStatus, BLANK_DOCUMENT};
    use crate::progress::ProgressState;
    use crate::toast::ToastKind;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn exporter_in(temp: &TempDir) -> Exporter {
        Exporter::with_dirs(temp.path().join("downloads"), temp.path().join("cache"))
    }

    fn app_with_code(code: &str) -> App {
        let mut app = App::default();
        app.prompt_input = "a blue button".to_string();
        app.prepare_generation().unwrap();
        app.handle_event(AppEvent::GenerationSucceeded(code.to_string()));
        app
    }

    fn desktop_error() -> DesktopError {
        DesktopError::Open {
            path: "preview.html".to_string(),
            source: std::io::Error::other("no display"),
        }
    }

    #[test]
    fn test_app_new() {
        let app = App::default();
        assert_eq!(app.screen, Screen::Home);
        assert!(!app.should_quit);
        assert_eq!(app.selected_framework(), Framework::HtmlCssJs);
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::default();
        app.quit();
        assert!(app.should_quit);
    }

    #[test]
    fn test_toggle_help() {
        let mut app = App::default();
        app.toggle_help();
        assert!(app.show_help);
        app.toggle_help();
        assert!(!app.show_help);
    }

    #[test]
    fn test_framework_cycling_wraps() {
        let mut app = App::default();
        app.next_framework();
        assert_eq!(app.selected_framework(), Framework::ReactCss);
        app.next_framework();
        assert_eq!(app.selected_framework(), Framework::HtmlCssBootstrap);
        app.previous_framework();
        assert_eq!(app.selected_framework(), Framework::ReactCss);
    }

    #[test]
    fn test_blank_prompt_is_not_sent() {
        let mut app = App::default();
        assert!(app.prepare_generation().is_none());
        app.prompt_input = "  \n ".to_string();
        assert!(app.prepare_generation().is_none());
        assert_eq!(app.screen, Screen::Home);
        assert_eq!(app.pane.status(), PaneStatus::Idle);
    }

    #[test]
    fn test_prepare_generation_builds_request() {
        let mut app = App::default();
        app.prompt_input = "a pricing table".to_string();
        app.next_framework();

        let request = app.prepare_generation().unwrap();
        assert_eq!(request.prompt, "a pricing table");
        assert_eq!(request.framework, Framework::ReactCss);
        assert_eq!(app.screen, Screen::Editor);
        assert!(app.pane.is_loading());

        // A second request is refused while the first is outstanding
        assert!(app.prepare_generation().is_none());
    }

    #[test]
    fn test_failed_generation_shows_error_and_keeps_code() {
        let mut app = app_with_code("<p>kept</p>");
        app.prepare_generation().unwrap();
        app.handle_event(AppEvent::GenerationFailed("boom".to_string()));

        assert_eq!(app.pane.status(), PaneStatus::Ready);
        assert_eq!(app.pane.code(), "<p>kept</p>");
        let toast = app.toasts.last().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Failed to generate code");
    }

    #[test]
    fn test_consecutive_generations_replace_code() {
        let mut app = app_with_code("<ul>\n<li>first</li>\n</ul>");
        app.back_to_home();
        app.prompt_input = "a footer".to_string();
        app.prepare_generation().unwrap();
        app.handle_event(AppEvent::GenerationSucceeded("<footer></footer>".to_string()));

        assert_eq!(app.pane.code(), "<footer></footer>");
    }

    #[test]
    fn test_progress_events() {
        let mut app = App::default();
        app.handle_event(AppEvent::Progress(ProgressState::started()));
        assert!(app.is_busy());

        let mut done = ProgressState::default();
        done.complete();
        app.handle_event(AppEvent::Progress(done));
        assert_eq!(app.progress.percent, 100);

        app.handle_event(AppEvent::ProgressReset);
        assert_eq!(app.progress, ProgressState::default());
        assert!(!app.is_busy());
    }

    #[test]
    fn test_late_tick_after_completion_is_ignored() {
        let mut app = App::default();
        let mut done = ProgressState::started();
        done.complete();
        app.handle_event(AppEvent::Progress(done.clone()));

        let mut late = ProgressState::started();
        late.advance(80);
        app.handle_event(AppEvent::Progress(late));
        assert_eq!(app.progress, done);

        app.handle_event(AppEvent::ProgressReset);
        app.handle_event(AppEvent::Progress(ProgressState::started()));
        assert_eq!(app.progress.percent, 5);
    }

    #[test]
    fn test_back_to_home_blocked_while_loading() {
        let mut app = App::default();
        app.prompt_input = "x".to_string();
        app.prepare_generation().unwrap();
        app.back_to_home();
        assert_eq!(app.screen, Screen::Editor);
    }

    #[test]
    fn test_open_blank_editor() {
        let mut app = App::default();
        app.open_blank_editor();
        assert_eq!(app.screen, Screen::Editor);
        assert_eq!(app.pane.code(), BLANK_DOCUMENT);
    }

    #[test]
    fn test_copy_code_uses_current_text() {
        let mut app = app_with_code("<b>x</b>");
        app.pane.move_end();
        app.pane.insert_char('!');

        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_set_text()
            .withf(|text: &str| text == "<b>x</b>!")
            .times(1)
            .returning(|_| Ok(()));

        app.copy_code(&mut clipboard);
        assert_eq!(app.toasts.last().unwrap().kind, ToastKind::Success);
    }

    #[test]
    fn test_copy_failure_is_reported_and_harmless() {
        let mut app = app_with_code("<b>x</b>");
        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_set_text()
            .times(1)
            .returning(|_| Err(desktop_error()));

        app.copy_code(&mut clipboard);
        assert_eq!(app.toasts.last().unwrap().message, "Failed to copy code");
        assert_eq!(app.pane.code(), "<b>x</b>");
    }

    #[test]
    fn test_copy_without_code() {
        let mut app = App::default();
        let mut clipboard = MockClipboard::new();
        clipboard.expect_set_text().times(0);

        app.copy_code(&mut clipboard);
        assert_eq!(app.toasts.last().unwrap().message, "No code to copy");
    }

    #[test]
    fn test_download_saves_edited_code() {
        let temp = TempDir::new().unwrap();
        let exporter = exporter_in(&temp);
        let mut app = app_with_code("<button>Hi</button>");

        for _ in 0.."<button>".len() {
            app.pane.move_right();
        }
        for _ in 0.."Hi".len() {
            app.pane.delete();
        }
        for c in "Bye".chars() {
            app.pane.insert_char(c);
        }
        app.download(&exporter);

        let saved = fs::read_to_string(exporter.download_dir().join("Generated-Component.html")).unwrap();
        assert_eq!(saved, "<button>Bye</button>");
        assert_eq!(app.toasts.last().unwrap().kind, ToastKind::Success);
    }

    #[test]
    fn test_download_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        // A regular file where the download directory should be
        let blocker = temp.path().join("downloads");
        fs::write(&blocker, "not a dir").unwrap();
        let exporter = exporter_in(&temp);

        let mut app = app_with_code("<p>x</p>");
        app.download(&exporter);
        assert_eq!(app.toasts.last().unwrap().message, "Download failed");
        assert_eq!(app.pane.code(), "<p>x</p>");
    }

    #[test]
    fn test_open_preview_launches_sandboxed_page() {
        let temp = TempDir::new().unwrap();
        let exporter = exporter_in(&temp);
        let expected = exporter.preview_path();

        let mut launcher = MockLauncher::new();
        launcher
            .expect_open()
            .withf(move |path: &Path| path == expected.as_path())
            .times(1)
            .returning(|_| Ok(()));

        let mut app = app_with_code("<p>preview me</p>");
        app.open_preview(&exporter, &launcher);

        let path = app.preview_path.clone().unwrap();
        assert!(fs::read_to_string(path).unwrap().contains("sandbox=\"allow-scripts\""));
    }

    #[test]
    fn test_open_preview_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        let exporter = exporter_in(&temp);
        let mut launcher = MockLauncher::new();
        launcher
            .expect_open()
            .returning(|_| Err(desktop_error()));

        let mut app = app_with_code("<p>x</p>");
        app.open_preview(&exporter, &launcher);
        assert!(app.preview_path.is_none());
        assert_eq!(app.toasts.last().unwrap().message, "Failed to open preview");
    }

    #[test]
    fn test_refresh_rewrites_open_preview() {
        let temp = TempDir::new().unwrap();
        let exporter = exporter_in(&temp);
        let mut launcher = MockLauncher::new();
        launcher.expect_open().returning(|_| Ok(()));

        let mut app = app_with_code("<p>one</p>");
        app.open_preview(&exporter, &launcher);
        app.pane.move_end();
        app.pane.insert_char('2');
        app.refresh_preview(&exporter);

        assert_eq!(app.pane.refresh_key(), 1);
        let page = fs::read_to_string(exporter.preview_path()).unwrap();
        assert!(page.contains("&lt;p&gt;one&lt;/p&gt;2"));
    }
}
