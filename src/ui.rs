use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::reader::{PageKind, Reader};

const ACCENT_BG: Color = Color::Blue;
const ACCENT_FG: Color = Color::White;
const DISABLED_FG: Color = Color::Gray;
const WARNING_FG: Color = Color::Yellow;

/// Status bar rendering parameters (collected from the app before drawing)
pub struct StatusBarParams<'a> {
    /// Site profile name
    pub site: &'a str,
    /// Whether the engine runs for this site
    pub engine_active: bool,
    /// Net scroll speed in px/s
    pub speed: f64,
    /// Open "go to line" prompt
    pub prompt: Option<&'a str>,
    /// Latest warning from the log
    pub warning: Option<&'a str>,
}

/// Render the reader. In fullscreen the page takes the whole screen.
pub fn render(frame: &mut Frame, reader: &mut Reader, params: &StatusBarParams<'_>) {
    let size = frame.area();

    let (body, chrome) = if reader.is_fullscreen() && params.prompt.is_none() {
        (size, None)
    } else {
        // Split screen into header (1 line), page, and status bar (1 line)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(size);
        (chunks[1], Some((chunks[0], chunks[2])))
    };

    reader.set_viewport(body.width as usize, body.height as usize);

    if let Some((header, status_bar)) = chrome {
        render_header(frame.buffer_mut(), header, reader);
        render_status_bar(frame.buffer_mut(), status_bar, params);
    }
    render_page(frame, body, reader);
}

fn render_page(frame: &mut Frame, area: Rect, reader: &Reader) {
    let highlight_top = reader.page() == PageKind::Index;
    let lines: Vec<Line> = reader
        .visible_rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            if highlight_top && i == 0 {
                Line::styled(row.as_str(), Style::default().add_modifier(Modifier::REVERSED))
            } else {
                Line::raw(row.as_str())
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_header(buf: &mut Buffer, area: Rect, reader: &Reader) {
    if area.height == 0 {
        return;
    }

    fill(buf, area);
    let style = Style::default()
        .fg(ACCENT_FG)
        .bg(ACCENT_BG)
        .add_modifier(Modifier::BOLD);
    let title = Line::from(Span::styled(format!(" {} ", reader.title()), style));
    buf.set_line(area.x, area.y, &title, area.width);

    // Scroll position on the right
    let max = reader.max_offset();
    let percent = if max > 0.0 {
        (reader.offset() / max * 100.0).round() as u32
    } else {
        100
    };
    let position = format!(" {:>3}% ", percent);
    let width = position.width() as u16;
    if area.width > width + title.width() as u16 {
        let position = Line::from(Span::styled(position, style));
        buf.set_line(area.right() - width, area.y, &position, width);
    }
}

fn render_status_bar(buf: &mut Buffer, area: Rect, params: &StatusBarParams<'_>) {
    if area.height == 0 {
        return;
    }

    fill(buf, area);
    let line = Line::from(status_spans(params, area.width));
    buf.set_line(area.x, area.y, &line, area.width);
}

fn fill(buf: &mut Buffer, area: Rect) {
    for x in area.left()..area.right() {
        buf[(x, area.top())]
            .set_char(' ')
            .set_style(Style::default().bg(ACCENT_BG));
    }
}

/// Status bar text: prompt while typing, otherwise site and speed with the
/// latest warning on the right.
fn status_spans<'a>(params: &'a StatusBarParams<'a>, total_width: u16) -> Vec<Span<'a>> {
    let base_style = Style::default().fg(DISABLED_FG).bg(ACCENT_BG);
    let highlight_style = Style::default()
        .fg(ACCENT_FG)
        .bg(ACCENT_BG)
        .add_modifier(Modifier::BOLD);

    if let Some(prompt) = params.prompt {
        return vec![
            Span::styled(" Go to line: ", base_style),
            Span::styled(prompt, highlight_style),
        ];
    }

    let mut spans = vec![
        Span::styled(" ", base_style),
        Span::styled(params.site, highlight_style),
    ];
    if params.engine_active {
        spans.push(Span::styled(
            format!(" | {:>6.0} px/s ", params.speed),
            base_style,
        ));
    } else {
        spans.push(Span::styled(" | disabled ", base_style));
    }

    if let Some(warning) = params.warning {
        let used: usize = spans.iter().map(|span| span.content.width()).sum();
        let available = (total_width as usize).saturating_sub(used + 1);
        let text = truncate(warning, available);
        let padding = available.saturating_sub(text.width());
        spans.push(Span::styled(" ".repeat(padding), base_style));
        spans.push(Span::styled(
            text,
            Style::default().fg(WARNING_FG).bg(ACCENT_BG),
        ));
    }

    spans
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let mut result = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}
