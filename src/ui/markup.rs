// HTML line highlighting and a text outline for the terminal preview

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;
use std::sync::LazyLock;

use super::theme::Theme;

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<!--.*?-->")
        .expect("script/style pattern is valid")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Text,
    TagName,
    Attributes,
    Quoted(char),
    Comment,
}

/// Colors one line of markup. Each line is scanned on its own, so a tag
/// or comment spanning lines is only colored on the line where it opens.
pub fn highlight_line(line: &str, theme: &Theme) -> Line<'static> {
    let tag_style = Style::default().fg(theme.accent);
    let attr_style = Style::default().fg(Color::Yellow);
    let value_style = Style::default().fg(theme.success);
    let comment_style = Style::default()
        .fg(theme.muted)
        .add_modifier(Modifier::ITALIC);

    let mut spans = Vec::new();
    let mut current = String::new();
    let mut state = Scan::Text;
    let mut chars = line.chars().peekable();

    let flush = |spans: &mut Vec<Span<'static>>, current: &mut String, style: Style| {
        if !current.is_empty() {
            spans.push(Span::styled(std::mem::take(current), style));
        }
    };

    while let Some(ch) = chars.next() {
        match state {
            Scan::Text => {
                if ch == '<' {
                    flush(&mut spans, &mut current, Style::default());
                    current.push(ch);
                    state = if chars.peek() == Some(&'!') {
                        Scan::Comment
                    } else {
                        Scan::TagName
                    };
                } else {
                    current.push(ch);
                }
            }
            Scan::TagName => {
                current.push(ch);
                if ch == '>' {
                    flush(&mut spans, &mut current, tag_style);
                    state = Scan::Text;
                } else if ch.is_whitespace() {
                    flush(&mut spans, &mut current, tag_style);
                    state = Scan::Attributes;
                }
            }
            Scan::Attributes => match ch {
                '"' | '\'' => {
                    flush(&mut spans, &mut current, attr_style);
                    current.push(ch);
                    state = Scan::Quoted(ch);
                }
                '>' => {
                    if current.ends_with('/') {
                        current.pop();
                        flush(&mut spans, &mut current, attr_style);
                        current.push('/');
                    } else {
                        flush(&mut spans, &mut current, attr_style);
                    }
                    current.push(ch);
                    flush(&mut spans, &mut current, tag_style);
                    state = Scan::Text;
                }
                _ => current.push(ch),
            },
            Scan::Quoted(quote) => {
                current.push(ch);
                if ch == quote {
                    flush(&mut spans, &mut current, value_style);
                    state = Scan::Attributes;
                }
            }
            Scan::Comment => {
                current.push(ch);
                if current.ends_with("-->") || (current.len() > 2 && !current.starts_with("<!-") && ch == '>') {
                    flush(&mut spans, &mut current, comment_style);
                    state = Scan::Text;
                }
            }
        }
    }

    let tail_style = match state {
        Scan::Text => Style::default(),
        Scan::TagName => tag_style,
        Scan::Attributes => attr_style,
        Scan::Quoted(_) => value_style,
        Scan::Comment => comment_style,
    };
    flush(&mut spans, &mut current, tail_style);

    Line::from(spans)
}

/// Visible text of the document, one entry per text run. Scripts, styles
/// and comments are dropped.
pub fn outline(code: &str) -> Vec<String> {
    let without_code = SCRIPT_OR_STYLE.replace_all(code, "\n");
    let text = TAG.replace_all(&without_code, "\n");

    text.lines()
        .map(|line| {
            html_escape::decode_html_entities(line)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect()
}
