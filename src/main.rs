use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::*};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

use uiforge::api::ProxyClient;
use uiforge::app::{App, Screen};
use uiforge::config;
use uiforge::desktop::{BrowserLauncher, SystemClipboard};
use uiforge::events::AppEvent;
use uiforge::export::Exporter;
use uiforge::generation::spawn_generation;
use uiforge::logging;
use uiforge::models::ProgressConfig;
use uiforge::ui::{self, theme::Theme};

/// Everything key handlers need beyond the app state.
struct Services {
    client: ProxyClient,
    exporter: Exporter,
    clipboard: SystemClipboard,
    launcher: BrowserLauncher,
    progress: ProgressConfig,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load_config()?;
    if let Err(e) = config::get_log_path().and_then(|path| logging::init_file(&path)) {
        eprintln!("Logging disabled: {e:#}");
    }
    tracing::info!(api_url = %config.api_url, "starting uiforge");

    let theme = Theme::from_config(&config.theme);
    let client = ProxyClient::new(config.api_url.clone(), config.request_timeout)?;
    let mut app = App::new(&config);

    match client.health().await {
        Ok(health) => {
            app.generation_available = Some(health.generation_available);
            if !health.generation_available {
                app.toasts
                    .info("Server has no GENAI_API_KEY; generation is unavailable");
            }
        }
        Err(e) => {
            tracing::warn!("health check failed: {e:#}");
            app.generation_available = Some(false);
            app.toasts
                .error(format!("Cannot reach generation server at {}", client.base_url()));
        }
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
    let mut services = Services {
        client,
        exporter: Exporter::new()?,
        clipboard: SystemClipboard,
        launcher: BrowserLauncher,
        progress: config.progress,
        event_tx: tx,
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &theme, &mut services, &mut rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("uiforge exited with error: {err:#}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn handle_global_keys(app: &mut App, key: &KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => {
            if app.exit_pending {
                app.quit();
            } else {
                app.exit_pending = true;
            }
            true
        }
        KeyCode::Char('q') if ctrl => {
            app.quit();
            true
        }
        KeyCode::Char('h') if ctrl => {
            app.toggle_help();
            true
        }
        KeyCode::Esc if app.show_help => {
            app.show_help = false;
            true
        }
        KeyCode::Esc if app.exit_pending => {
            app.exit_pending = false;
            true
        }
        _ => {
            // Any other key cancels pending exit
            app.exit_pending = false;
            app.show_help
        }
    }
}

fn handle_home_keys(app: &mut App, key: &KeyEvent, services: &Services) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Tab => app.next_framework(),
        KeyCode::BackTab => app.previous_framework(),
        KeyCode::Char('e') if ctrl => app.open_blank_editor(),
        KeyCode::Enter => {
            if let Some(request) = app.prepare_generation() {
                spawn_generation(
                    &services.client,
                    request,
                    &services.event_tx,
                    services.progress,
                );
            }
        }
        KeyCode::Backspace => {
            app.prompt_input.pop();
        }
        KeyCode::Char(c) if !ctrl => app.prompt_input.push(c),
        _ => {}
    }
}

fn handle_editor_keys(app: &mut App, key: &KeyEvent, services: &mut Services) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.back_to_home(),
        KeyCode::Char('y') if ctrl => app.copy_code(&mut services.clipboard),
        KeyCode::Char('s') if ctrl => app.download(&services.exporter),
        KeyCode::Char('r') if ctrl => app.refresh_preview(&services.exporter),
        KeyCode::Char('o') if ctrl => app.open_preview(&services.exporter, &services.launcher),

        KeyCode::Up => app.pane.move_up(1),
        KeyCode::Down => app.pane.move_down(1),
        KeyCode::PageUp => app.pane.move_up(10),
        KeyCode::PageDown => app.pane.move_down(10),
        KeyCode::Left => app.pane.move_left(),
        KeyCode::Right => app.pane.move_right(),
        KeyCode::Home => app.pane.move_home(),
        KeyCode::End => app.pane.move_end(),

        KeyCode::Enter => app.pane.insert_newline(),
        KeyCode::Backspace => app.pane.backspace(),
        KeyCode::Delete => app.pane.delete(),
        KeyCode::Tab => {
            app.pane.insert_char(' ');
            app.pane.insert_char(' ');
        }
        KeyCode::Char(c) if !ctrl => app.pane.insert_char(c),
        _ => {}
    }
}

fn handle_key(app: &mut App, key: &KeyEvent, services: &mut Services) {
    if handle_global_keys(app, key) {
        return;
    }

    // The progress overlay owns the screen until the request settles
    if app.is_busy() {
        return;
    }

    match app.screen {
        Screen::Home => handle_home_keys(app, key, services),
        Screen::Editor => handle_editor_keys(app, key, services),
    }
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    theme: &Theme,
    services: &mut Services,
    event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui::render(f, app, theme))?;

        // Drain async events (progress, generation results) first
        while let Ok(app_event) = event_rx.try_recv() {
            app.handle_event(app_event);
        }

        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, &key, services);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
