//! Screen layout: header, alert panel, quote table, key menu.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};

use crate::ansi::translate;
use crate::app::App;
use crate::style::StyleRegistry;

pub fn draw(frame: &mut Frame, app: &App) {
    let alert_height = match app.alert_lines().len() {
        0 => 0,
        n => n as u16 + 2,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(alert_height),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    if alert_height > 0 {
        draw_alerts(frame, app, chunks[1]);
    }
    draw_table(frame, app, chunks[2]);
    draw_menu(frame, app, chunks[3]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let refreshed = app
        .last_refresh
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    let mut text = format!(" every {}s | refreshed {}", app.refresh_secs, refreshed);
    if !app.auto_refresh {
        text.push_str(" | auto-refresh paused");
    }

    let header = Paragraph::new(text)
        .style(Style::default().fg(Color::LightBlue))
        .block(Block::default().borders(Borders::ALL).title(" Live Quotes "));

    frame.render_widget(header, area);
}

fn draw_alerts(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .alert_lines()
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::Yellow))))
        .collect();

    let panel = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(" Alerts "));

    frame.render_widget(panel, area);
}

fn draw_table(frame: &mut Frame, app: &App, area: Rect) {
    let body = if app.quotes.is_empty() {
        Text::raw(" press r to fetch quotes...")
    } else {
        styled_text(&app.table_text(), &app.registry)
    };

    let table = Paragraph::new(body)
        .scroll((app.scroll, 0))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(table, area);
}

fn draw_menu(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.status.as_deref().unwrap_or("");
    let text = if status.is_empty() {
        " r=refresh | a=auto-refresh | c=color | up/down/pgup/pgdn=scroll | q=quit".to_string()
    } else {
        format!(" {status}")
    };

    let menu = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(menu, area);
}

/// Turn ANSI-colorized text into widget lines, resolving each span tag
/// through the registry.
fn styled_text(raw: &str, registry: &StyleRegistry) -> Text<'static> {
    let lines: Vec<Line> = raw
        .lines()
        .map(|line| {
            let spans: Vec<Span> = translate(line)
                .into_iter()
                .filter(|s| !s.text.is_empty())
                .map(|s| match s.style {
                    Some(code) => Span::styled(s.text, registry.resolve(&code)),
                    None => Span::raw(s.text),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styled_text_maps_tags_through_the_registry() {
        let text = styled_text("\x1b[31mdown\x1b[0m flat", &StyleRegistry::new(true));
        let line = &text.lines[0];
        assert_eq!(line.spans[0].style.fg, Some(Color::Red));
        assert_eq!(line.spans[0].content, "down");
        assert_eq!(line.spans[1].style, Style::default());
    }

    #[test]
    fn styled_text_with_palette_off_keeps_content_unstyled() {
        let text = styled_text("\x1b[31mdown\x1b[0m", &StyleRegistry::new(false));
        assert_eq!(text.lines[0].spans[0].style, Style::default());
        assert_eq!(text.lines[0].spans[0].content, "down");
    }
}
