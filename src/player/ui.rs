use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};
use std::time::Instant;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use lyricsync::animator::LineVisual;
use lyricsync::constants::{FADE_STOPS, GLOW_RADIUS};

use super::app::App;
use super::audio::Transport;

const WIPED: (u8, u8, u8) = (255, 255, 255);
const UNWIPED: (u8, u8, u8) = (140, 140, 150);
const DORMANT: (u8, u8, u8) = (80, 80, 90);
const GLOW: (u8, u8, u8) = (190, 110, 255);

/// Share of the lyric viewport above the line that was just activated
const FOCUS_RATIO: f32 = 0.45;

pub fn draw<T: Transport>(f: &mut Frame, app: &App<T>, now: Instant) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title and artist
            Constraint::Min(5),    // Lyrics
            Constraint::Length(2), // Progress bar and times
            Constraint::Length(2), // Controls
        ])
        .split(size);

    draw_header(f, chunks[0], app);
    draw_lyrics(f, chunks[1], app, now);
    draw_progress_bar(f, chunks[2], app);
    draw_controls(f, chunks[3], app);
}

fn draw_header<T: Transport>(f: &mut Frame, area: Rect, app: &App<T>) {
    let sheet = app.stage.sheet();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(3)])
        .split(area);

    let info = Paragraph::new(vec![
        Line::from(Span::styled(
            sheet.title(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(sheet.artist(), Style::default().fg(Color::Gray))),
    ]);
    f.render_widget(info, chunks[0]);

    let menu = Paragraph::new("⋯")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Right);
    f.render_widget(menu, chunks[1]);

    let border = Block::default().borders(Borders::BOTTOM);
    f.render_widget(border, area);
}

fn draw_lyrics<T: Transport>(f: &mut Frame, area: Rect, app: &App<T>, now: Instant) {
    if area.width < 4 || area.height == 0 {
        return;
    }
    let sheet = app.stage.sheet();
    let layout = app.stage.layout();
    let anchor = area.height as f32 * FOCUS_RATIO;
    let text_width = area.width.saturating_sub(4) as usize;
    let last = sheet.len().saturating_sub(1);

    for visual in app.stage.visuals(now) {
        let Some(line) = sheet.line(visual.index) else {
            continue;
        };
        let top = anchor
            + sheet.line_top(visual.index, layout.row_height, layout.line_gap)
            + visual.offset;
        let rows = clamp_rows(
            wrap_text(&line.text, text_width),
            line.line_count as usize,
            text_width,
        );
        let wiped = wiped_width(&rows, visual.phase);
        let mut consumed = 0;

        for (r, row) in rows.iter().enumerate() {
            let y = (top + r as f32 * layout.row_height).round();
            let row_width = row.width();
            let wiped_here = wiped.saturating_sub(consumed).min(row_width);
            consumed += row_width;

            if y < 0.0 || y >= area.height as f32 {
                continue;
            }
            let opacity = mask_opacity(y / area.height as f32);
            if opacity <= 0.0 {
                continue;
            }

            let spans = line_spans(row, wiped_here, &visual, opacity, visual.index == last);
            let x = (area.x as f32 + 2.0 + visual.shake_x.round()).max(area.x as f32) as u16;
            let width = area.width.saturating_sub(x - area.x);
            let rect = Rect::new(x, area.y + y as u16, width, 1);
            f.render_widget(Paragraph::new(Line::from(spans)), rect);
        }
    }
}

fn line_spans(
    row: &str,
    wiped: usize,
    visual: &LineVisual,
    opacity: f32,
    credits: bool,
) -> Vec<Span<'static>> {
    let mut modifier = if credits {
        Modifier::ITALIC
    } else {
        Modifier::BOLD
    };
    if visual.blurred {
        modifier |= Modifier::DIM;
    }

    if !visual.active {
        let style = Style::default()
            .fg(rgb(apply_alpha(DORMANT, opacity)))
            .add_modifier(modifier);
        return vec![Span::styled(row.to_string(), style)];
    }

    let lit = lerp_color(WIPED, GLOW, visual.glow / GLOW_RADIUS);
    let (head, tail) = split_at_width(row, wiped);
    vec![
        Span::styled(
            head.to_string(),
            Style::default()
                .fg(rgb(apply_alpha(lit, opacity)))
                .add_modifier(modifier),
        ),
        Span::styled(
            tail.to_string(),
            Style::default()
                .fg(rgb(apply_alpha(UNWIPED, opacity)))
                .add_modifier(modifier),
        ),
    ]
}

fn draw_progress_bar<T: Transport>(f: &mut Frame, area: Rect, app: &App<T>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let fraction = app.sample.as_ref().map(|s| s.fraction).unwrap_or(0.0);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::White).bg(Color::DarkGray))
        .ratio(fraction.clamp(0.0, 1.0))
        .label("");
    f.render_widget(gauge, chunks[0]);

    let elapsed = app
        .sample
        .as_ref()
        .map(|s| s.formatted_time.clone())
        .unwrap_or_else(|| "00:00".to_string());
    let total = app.total_time().unwrap_or_else(|| "--:--".to_string());

    let times = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    let style = Style::default().fg(Color::Gray);
    f.render_widget(Paragraph::new(elapsed).style(style), times[0]);
    f.render_widget(
        Paragraph::new(total)
            .style(style)
            .alignment(Alignment::Right),
        times[1],
    );
}

fn draw_controls<T: Transport>(f: &mut Frame, area: Rect, app: &App<T>) {
    let transport = Line::from(vec![
        Span::styled("◀◀", Style::default().fg(Color::DarkGray)),
        Span::raw("    "),
        Span::styled(
            if app.is_playing { "❚❚" } else { "▶" },
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("    "),
        Span::styled("▶▶", Style::default().fg(Color::DarkGray)),
    ]);

    let keys = Line::from(vec![
        if app.is_playing {
            Span::styled("[space]", Style::default().fg(Color::Yellow))
        } else {
            Span::styled("[space]", Style::default().fg(Color::Green))
        },
        Span::raw(if app.is_playing { " pause  " } else { " play  " }),
        Span::styled("[q]", Style::default().fg(Color::Red)),
        Span::raw(" quit"),
    ]);

    let widget = Paragraph::new(vec![transport, keys]).alignment(Alignment::Center);
    f.render_widget(widget, area);
}

/// Greedy word wrap by display width. Words wider than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            rows.push(std::mem::take(&mut current));
        }
        let mut rest = word;
        while rest.width() > width {
            let (head, tail) = split_at_width(rest, width);
            if head.is_empty() {
                break;
            }
            rows.push(head.to_string());
            rest = tail;
        }
        current.push_str(rest);
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

/// Keeps the rows the sheet reserves for a line. When the text wrapped to
/// more, the last kept row ends in an ellipsis.
pub fn clamp_rows(mut rows: Vec<String>, max_rows: usize, width: usize) -> Vec<String> {
    let max_rows = max_rows.max(1);
    if rows.len() <= max_rows {
        return rows;
    }
    rows.truncate(max_rows);
    if let Some(last) = rows.last_mut() {
        let (head, _) = split_at_width(last, width.saturating_sub(1));
        *last = format!("{head}…");
    }
    rows
}

/// Columns of the wrapped line covered by the wipe at `phase`.
pub fn wiped_width(rows: &[String], phase: f32) -> usize {
    let total: usize = rows.iter().map(|r| r.width()).sum();
    (total as f32 * phase.clamp(0.0, 1.0)).round() as usize
}

/// Splits `text` after at most `width` display columns.
pub fn split_at_width(text: &str, width: usize) -> (&str, &str) {
    let mut used = 0;
    for (i, c) in text.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            return text.split_at(i);
        }
        used += w;
    }
    (text, "")
}

/// Opacity of the viewport mask at vertical position `y` in [0, 1].
pub fn mask_opacity(y: f32) -> f32 {
    let y = y.clamp(0.0, 1.0);
    for pair in FADE_STOPS.windows(2) {
        let (start, from) = pair[0];
        let (end, to) = pair[1];
        if y <= end {
            let span = end - start;
            if span <= 0.0 {
                return to;
            }
            return from + (to - from) * ((y - start) / span);
        }
    }
    FADE_STOPS.last().map(|(_, o)| *o).unwrap_or(1.0)
}

fn lerp_color(a: (u8, u8, u8), b: (u8, u8, u8), t: f32) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn apply_alpha(color: (u8, u8, u8), alpha: f32) -> (u8, u8, u8) {
    let alpha = alpha.clamp(0.0, 1.0);
    let scale = |x: u8| (x as f32 * alpha).round() as u8;
    (scale(color.0), scale(color.1), scale(color.2))
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_respects_width() {
        let rows = wrap_text("Freedom of mind, I'm faster than the speed of sound", 20);
        assert!(rows.iter().all(|r| r.width() <= 20));
        assert_eq!(rows.join(" "), "Freedom of mind, I'm faster than the speed of sound");
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_wrap_text_empty_and_long_words() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
        assert_eq!(wrap_text("Vrrmmmmmmm", 4), vec!["Vrrm", "mmmm", "mm"]);
    }

    #[test]
    fn test_narrow_wrap_stays_within_reserved_rows() {
        let rows = wrap_text("Tell me where you go", 10);
        assert_eq!(rows, vec!["Tell me", "where you", "go"]);

        assert_eq!(clamp_rows(rows.clone(), 1, 10), vec!["Tell me…"]);
        let clamped = clamp_rows(rows.clone(), 2, 10);
        assert_eq!(clamped, vec!["Tell me", "where you…"]);
        assert!(clamped.iter().all(|row| row.width() <= 10));

        assert_eq!(clamp_rows(rows.clone(), 3, 10), rows);
        assert_eq!(clamp_rows(vec!["abcd".into(), "ef".into()], 0, 4), vec!["abc…"]);
    }

    #[test]
    fn test_wiped_width_spans_all_rows() {
        let rows = vec!["abcd".to_string(), "efgh".to_string()];
        assert_eq!(wiped_width(&rows, 0.0), 0);
        assert_eq!(wiped_width(&rows, 0.5), 4);
        assert_eq!(wiped_width(&rows, 1.0), 8);
        assert_eq!(wiped_width(&rows, 2.0), 8);
    }

    #[test]
    fn test_split_at_width() {
        assert_eq!(split_at_width("Tell me where\u{2013}", 4), ("Tell", " me where\u{2013}"));
        assert_eq!(split_at_width("abc", 10), ("abc", ""));
        assert_eq!(split_at_width("abc", 0), ("", "abc"));
    }

    #[test]
    fn test_mask_opacity_stops() {
        assert_eq!(mask_opacity(0.0), 0.0);
        assert_eq!(mask_opacity(0.01), 1.0);
        assert_eq!(mask_opacity(0.5), 1.0);
        assert!((mask_opacity(0.825) - 0.5).abs() < 1e-4);
        assert_eq!(mask_opacity(1.0), 0.0);
    }

    #[test]
    fn test_color_helpers() {
        assert_eq!(lerp_color(WIPED, GLOW, 0.0), WIPED);
        assert_eq!(lerp_color(WIPED, GLOW, 1.0), GLOW);
        assert_eq!(apply_alpha((200, 100, 50), 0.5), (100, 50, 25));
        assert_eq!(apply_alpha((200, 100, 50), 0.0), (0, 0, 0));
    }
}
