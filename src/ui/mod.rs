pub mod markup;
pub mod theme;
pub mod widgets;

use crate::app::{App, Screen};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use theme::Theme;

pub fn render(frame: &mut Frame, app: &mut App, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Screen body
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Bottom keymap bar
        ])
        .split(frame.area());

    match app.screen {
        Screen::Home => widgets::render_home(frame, app, theme, chunks[0]),
        Screen::Editor => {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[0]);
            widgets::render_editor(frame, app, theme, panes[0]);
            widgets::render_preview(frame, app, theme, panes[1]);
        }
    }

    widgets::render_status_bar(frame, app, theme, chunks[1]);
    widgets::render_bottom_bar(frame, app, theme, chunks[2]);

    if app.is_busy() {
        widgets::render_progress_overlay(frame, app, theme, frame.area());
    }

    if app.show_help {
        widgets::render_help_window(frame, theme, frame.area());
    }

    widgets::render_toasts(frame, app, theme, frame.area());
}
