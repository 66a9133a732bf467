use folio_core::presentation::{self, EntranceSide};
use folio_protocol::{Section, Snapshot};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Clear, Gauge, Paragraph, Wrap},
};

use crate::app::App;
use crate::document::{ROW_HEIGHT, Row, RowKind};

/// Hero shapes: glyph, horizontal position as a fraction of the width, and
/// resting row.
const SHAPES: [(char, f64, f64); 3] = [('◇', 0.78, 3.0), ('○', 0.88, 7.0), ('•', 0.66, 10.0)];

pub struct Panes {
    pub nav: Rect,
    pub progress: Rect,
    pub document: Rect,
    pub status: Rect,
}

pub fn panes(area: Rect) -> Panes {
    let [nav, progress, document, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);
    Panes {
        nav,
        progress,
        document,
        status,
    }
}

/// Where the preview dialog sits on a screen of size `area`.
pub fn popup_area(area: Rect) -> Rect {
    let width = (area.width * 7 / 10).clamp(20.min(area.width), area.width);
    let height = (area.height * 6 / 10).clamp(8.min(area.height), area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn accent(color: folio_protocol::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

pub fn draw(frame: &mut Frame, app: &App, now_ms: u64) {
    let area = frame.area();
    let panes = panes(area);
    let snapshot = app.snapshot();

    draw_nav(frame, panes.nav, app, &snapshot, now_ms);
    let ratio = (snapshot.scroll_progress / 100.0).clamp(0.0, 1.0);
    frame.render_widget(
        Gauge::default()
            .ratio(ratio)
            .label(format!("{:.0}%", snapshot.scroll_progress))
            .gauge_style(Style::default().fg(Color::Green).bg(Color::Black)),
        panes.progress,
    );
    draw_document(frame, panes.document, app, &snapshot, now_ms);
    draw_cursor(frame, area, &snapshot);

    let hint = if snapshot.preview.is_some() {
        " x close  Enter close  Esc cancel  click outside to dismiss "
    } else {
        " 1-4 sections  j/k scroll  Tab select  Enter preview  q quit "
    };
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::White).bg(Color::DarkGray)),
        panes.status,
    );

    if snapshot.preview.is_some() {
        draw_preview(frame, popup_area(area), app, &snapshot);
    }
}

fn draw_nav(frame: &mut Frame, area: Rect, app: &App, snapshot: &Snapshot, now_ms: u64) {
    let elapsed = now_ms.saturating_sub(app.mounted_at());
    let owner = &app.portfolio().catalog().owner.name;
    let mut spans = vec![Span::styled(
        format!(" {owner} "),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for section in Section::ALL {
        let label = format!(" {} ", section.label());
        let shown = snapshot.loaded
            && u128::from(elapsed) >= presentation::nav_delay(section).as_millis();
        let span = if !shown {
            Span::raw(" ".repeat(label.chars().count()))
        } else if section == snapshot.active_section {
            Span::styled(
                label,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(label, Style::default().fg(Color::Gray))
        };
        spans.push(span);
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_document(frame: &mut Frame, area: Rect, app: &App, snapshot: &Snapshot, now_ms: u64) {
    let offset = app.scroll_position();
    let first = (offset / ROW_HEIGHT).floor().max(0.0) as usize;
    let lines: Vec<Line> = app
        .document()
        .rows()
        .iter()
        .skip(first)
        .take(usize::from(area.height))
        .map(|row| row_line(row, app, snapshot, now_ms))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);

    if !snapshot.loaded {
        return;
    }
    let shifts = [
        snapshot.parallax.diamond,
        snapshot.parallax.ring,
        snapshot.parallax.glow,
    ];
    let buf = frame.buffer_mut();
    for ((glyph, column, rest_row), shift) in SHAPES.into_iter().zip(shifts) {
        let y = (rest_row * ROW_HEIGHT + shift - offset) / ROW_HEIGHT;
        let x = f64::from(area.width) * column;
        if y < 0.0 || y >= f64::from(area.height) || x >= f64::from(area.width) {
            continue;
        }
        let (x, y) = (area.x + x as u16, area.y + y as u16);
        buf[(x, y)].set_char(glyph).set_fg(Color::DarkGray);
    }
}

fn row_line(row: &Row, app: &App, snapshot: &Snapshot, now_ms: u64) -> Line<'static> {
    let tint = row.accent.map(accent);
    let base = match row.kind {
        RowKind::Name => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        RowKind::Headline => Style::default().fg(Color::Green),
        RowKind::Heading => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        RowKind::CardTitle => Style::default()
            .fg(tint.unwrap_or(Color::White))
            .add_modifier(Modifier::BOLD),
        RowKind::Tags => Style::default().fg(tint.unwrap_or(Color::Cyan)),
        RowKind::Link => Style::default().fg(Color::Blue),
        RowKind::Hint => Style::default().fg(Color::DarkGray),
        RowKind::Body | RowKind::Blank => Style::default().fg(Color::Gray),
    };
    let hero = matches!(row.kind, RowKind::Name | RowKind::Headline | RowKind::Hint);
    let shown = match &row.region {
        Some(id) => snapshot.is_revealed(id.as_str()) && app.entrance_done(id, now_ms),
        None => !hero || snapshot.loaded,
    };

    let gutter = match row.project {
        Some(index) if index == app.selected() => Span::styled(
            "▌ ",
            Style::default().fg(tint.unwrap_or(Color::Green)),
        ),
        _ => Span::raw("  "),
    };
    if !shown {
        let line = Line::from(vec![
            Span::raw("  "),
            Span::styled(
                row.text.clone(),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            ),
        ]);
        return match row.entrance {
            Some(EntranceSide::Right) => line.alignment(Alignment::Right),
            _ => line,
        };
    }
    Line::from(vec![gutter, Span::styled(row.text.clone(), base)])
}

fn draw_cursor(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let (x, y) = (snapshot.pointer.x, snapshot.pointer.y);
    if x < 0.0 || y < 0.0 || x >= f64::from(area.width) || y >= f64::from(area.height) {
        return;
    }
    let glyph = if snapshot.cursor.scale > 1.0 { '◆' } else { '◇' };
    frame.buffer_mut()[(area.x + x as u16, area.y + y as u16)]
        .set_char(glyph)
        .set_fg(Color::Yellow);
}

fn draw_preview(frame: &mut Frame, area: Rect, app: &App, snapshot: &Snapshot) {
    let Some(view) = &snapshot.preview else {
        return;
    };
    let project = &view.project;
    let color = accent(project.color);
    let close_style = if app.close_focused() {
        Style::default().fg(Color::Black).bg(color)
    } else {
        Style::default().fg(color)
    };
    let block = Block::bordered()
        .border_style(Style::default().fg(color))
        .title(Line::from(format!(" {} ", project.title)).bold())
        .title(Line::from(Span::styled(" ✕ ", close_style)).right_aligned());
    let lines = vec![
        Line::from(project.description.clone()),
        Line::default(),
        Line::from(Span::styled(project.tech.join(" · "), Style::default().fg(color))),
        Line::from(Span::styled(
            project.image.clone(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            format!("↗ {}", project.link),
            Style::default().fg(Color::Blue),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled(" [Enter] Close ", Style::default().fg(Color::White).bg(Color::DarkGray)),
            Span::raw("  "),
            Span::styled(" Open Project ", Style::default().fg(Color::Black).bg(color)),
        ]),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Catalog, ControllerConfig, Portfolio};
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn popup_is_centered_and_bounded() {
        let popup = popup_area(Rect::new(0, 0, 100, 40));
        assert_eq!(popup, Rect::new(15, 8, 70, 24));
        let tiny = popup_area(Rect::new(0, 0, 10, 4));
        assert!(tiny.width <= 10 && tiny.height <= 4);
    }

    #[test]
    fn draws_nav_and_preview() {
        let portfolio = Portfolio::new(Catalog::builtin(), &ControllerConfig::default());
        let mut app = App::new(portfolio, Rect::new(0, 0, 100, 30));
        app.mount(0);
        app.frame(1_000);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, &app, 1_000)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("WORK"));
        assert!(text.contains("CONTACT"));
        assert!(text.contains("SELECTED WORK"));

        app.on_event(
            &crossterm::event::Event::Key(crossterm::event::KeyEvent::from(
                crossterm::event::KeyCode::Enter,
            )),
            1_000,
        );
        terminal.draw(|frame| draw(frame, &app, 1_000)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("E-Commerce Shoes Platform"));
        assert!(text.contains("[Enter] Close"));
    }
}
