use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use super::markup;
use super::theme::Theme;
use crate::app::{App, Screen};
use crate::models::Framework;
use crate::toast::ToastKind;

const PROMPT_PLACEHOLDER: &str = "e.g., A responsive login form with gradient background...";

/// Centers a `width` x `height` box inside `area`, clamped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render_home(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let form_area = centered(area, 80, 20);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Tagline
            Constraint::Length(1), // Gap
            Constraint::Length(3), // Framework selector
            Constraint::Min(5),    // Prompt
            Constraint::Length(1), // Actions
        ])
        .split(form_area);

    let title = Paragraph::new(Line::from(Span::styled(
        "AI Component Generator",
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let tagline = Paragraph::new(Span::styled(
        "Turn your ideas into ready-to-use components in seconds.",
        Style::default().fg(theme.muted),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(tagline, chunks[1]);

    let selected = app.selected_framework();
    let mut options = Vec::new();
    for framework in Framework::SELECTABLE {
        if !options.is_empty() {
            options.push(Span::styled("  ", Style::default()));
        }
        let style = if framework == selected {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(theme.muted)
        };
        options.push(Span::styled(format!(" {} ", framework.label()), style));
    }
    let selector = Paragraph::new(Line::from(options)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Framework (Tab) ")
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(selector, chunks[3]);

    let (prompt_text, prompt_style) = if app.prompt_input.is_empty() {
        (PROMPT_PLACEHOLDER, Style::default().fg(theme.muted))
    } else {
        (
            app.prompt_input.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )
    };
    let prompt = Paragraph::new(prompt_text)
        .style(prompt_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Describe your component ")
                .border_style(Style::default().fg(theme.border)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(prompt, chunks[4]);

    if !app.is_busy() {
        let inner_width = chunks[4].width.saturating_sub(2).max(1);
        let typed = u16::try_from(app.prompt_input.chars().count()).unwrap_or(u16::MAX);
        let row = (typed / inner_width).min(chunks[4].height.saturating_sub(3));
        frame.set_cursor_position(Position::new(
            chunks[4].x + 1 + typed % inner_width,
            chunks[4].y + 1 + row,
        ));
    }

    let actions = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
        Span::raw(" Generate    "),
        Span::styled("Ctrl+E", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
        Span::raw(" Open Editor"),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(actions, chunks[5]);
}

pub fn render_editor(frame: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let viewport = usize::from(area.height.saturating_sub(2));
    app.pane.follow_cursor(viewport);

    let pane = &app.pane;
    let scroll = pane.scroll();
    let gutter = pane.lines().len().to_string().len();

    let lines: Vec<Line<'static>> = pane
        .lines()
        .iter()
        .enumerate()
        .skip(scroll)
        .take(viewport)
        .map(|(index, text)| {
            let mut line = markup::highlight_line(text, theme);
            line.spans.insert(
                0,
                Span::styled(
                    format!("{:>gutter$} ", index + 1),
                    Style::default().fg(theme.muted),
                ),
            );
            line
        })
        .collect();

    let editor = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Code ")
            .title_bottom(Line::from(" Ctrl+Y Copy | Ctrl+S Download ").right_aligned())
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(editor, area);

    if !app.is_busy() {
        let (row, col) = pane.cursor();
        let x = area.x as usize + 1 + gutter + 1 + col;
        let y = area.y as usize + 1 + row.saturating_sub(scroll);
        let max_x = (area.x + area.width).saturating_sub(2);
        frame.set_cursor_position(Position::new(
            u16::try_from(x).unwrap_or(max_x).min(max_x),
            u16::try_from(y).unwrap_or(area.y),
        ));
    }
}

pub fn render_preview(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mut lines: Vec<Line<'static>> = markup::outline(&app.pane.code())
        .into_iter()
        .map(Line::from)
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "(no visible text)",
            Style::default().fg(theme.muted),
        )));
    }

    lines.push(Line::from(""));
    let browser_hint = app.preview_path.as_ref().map_or_else(
        || "Ctrl+O opens the sandboxed page in your browser".to_string(),
        |path| format!("Live page: {}", path.display()),
    );
    lines.push(Line::from(Span::styled(
        browser_hint,
        Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
    )));

    let preview = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Preview #{} ", app.pane.refresh_key()))
                .title_bottom(Line::from(" Ctrl+R Refresh | Ctrl+O Open ").right_aligned())
                .border_style(Style::default().fg(theme.border)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(preview, area);
}

pub fn render_progress_overlay(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let popup_area = centered(area, 50, 6);
    frame.render_widget(Clear, popup_area);

    let label = if app.progress.label.is_empty() {
        "Starting..."
    } else {
        app.progress.label.as_str()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Generating ")
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(label).alignment(Alignment::Center),
        rows[0],
    );
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(theme.accent))
            .percent(u16::from(app.progress.percent.min(100))),
        rows[2],
    );
}

pub fn render_toasts(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let visible = app.toasts.visible();
    let shown = &visible[visible.len().saturating_sub(3)..];

    for (offset, toast) in shown.iter().rev().enumerate() {
        let color = match toast.kind {
            ToastKind::Success => theme.success,
            ToastKind::Error => theme.error,
            ToastKind::Info => theme.accent,
        };
        let width = u16::try_from(toast.message.chars().count() + 4)
            .unwrap_or(u16::MAX)
            .min(area.width);
        let y = area.y + 1 + u16::try_from(offset * 3).unwrap_or(0);
        if y + 3 > area.y + area.height {
            break;
        }
        let toast_area = Rect {
            x: area.x + area.width - width,
            y,
            width,
            height: 3,
        };
        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Paragraph::new(toast.message.as_str())
                .style(Style::default().fg(color))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                ),
            toast_area,
        );
    }
}

pub fn render_help_window(frame: &mut Frame, theme: &Theme, area: Rect) {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled(
            "UiForge - Keyboard Shortcuts",
            Style::default()
                .fg(theme.border)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("General:", heading)),
        Line::from("  Ctrl+H        - Show/hide this help"),
        Line::from("  Ctrl+Q        - Quit application"),
        Line::from("  Ctrl+C        - Quit (press twice)"),
        Line::from(""),
        Line::from(Span::styled("Prompt:", heading)),
        Line::from("  Tab/Shift+Tab - Change framework"),
        Line::from("  Enter         - Generate component"),
        Line::from("  Ctrl+E        - Open a blank editor"),
        Line::from(""),
        Line::from(Span::styled("Editor:", heading)),
        Line::from("  Arrows/Home/End/PgUp/PgDn - Move cursor"),
        Line::from("  Ctrl+Y        - Copy code"),
        Line::from("  Ctrl+S        - Download as HTML"),
        Line::from("  Ctrl+R        - Refresh preview"),
        Line::from("  Ctrl+O        - Open preview in browser"),
        Line::from("  Esc           - Back to prompt"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Ctrl+H or Esc to close",
            Style::default().fg(theme.muted),
        )),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(theme.border)),
        )
        .wrap(Wrap { trim: false });

    let popup_area = centered(area, 60, 25);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(help_paragraph, popup_area);
}

pub fn render_bottom_bar(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let (text, style) = if app.exit_pending {
        (
            "Press Ctrl+C again to exit, Esc to cancel",
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        let hint = match app.screen {
            Screen::Home => "Ctrl+C: Quit | Ctrl+H: Help | Tab: Framework | Enter: Generate",
            Screen::Editor => "Ctrl+C: Quit | Ctrl+H: Help | Esc: Back to prompt",
        };
        (hint, Style::default().fg(theme.muted))
    };

    let bar = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(style);

    frame.render_widget(bar, area);
}

pub fn render_status_bar(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let (text, color) = match app.generation_available {
        Some(true) => ("generation ready", theme.success),
        Some(false) => ("generation unavailable", theme.error),
        None => ("server not checked", theme.muted),
    };
    let loading = if app.pane.is_loading() { " [Generating...]" } else { "" };

    let status = Paragraph::new(format!(
        "{}{} | {}",
        app.selected_framework().label(),
        loading,
        text
    ))
    .alignment(Alignment::Right)
    .style(Style::default().fg(color).add_modifier(Modifier::BOLD));

    frame.render_widget(status, area);
}
