//! UI rendering for year progress.

use crate::app::{App, MessageType};
use crate::theme::Palette;
use progress_core::{Cell, Granularity};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Widest the card grows.
const CARD_MAX_WIDTH: u16 = 66;

/// Draw the application.
pub fn draw(f: &mut Frame, app: &mut App) {
    let palette = app.palette();
    f.render_widget(Block::default().style(palette.base()), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer/status
        ])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[0]);

    app.card_area = Some(draw_card(f, app, &palette, columns[0]));
    draw_notes(f, app, &palette, columns[1]);
    draw_footer(f, app, &palette, chunks[1]);

    // Draw popups
    if app.show_help {
        draw_help_popup(f, &palette);
    }

    if app.is_editing() {
        draw_note_input(f, app, &palette);
    }
}

/// Draw the card and return where it landed.
fn draw_card(f: &mut Frame, app: &App, palette: &Palette, area: Rect) -> Rect {
    let width = area.width.min(CARD_MAX_WIDTH);
    let inner_width = width.saturating_sub(2).max(1);

    let blocks = if app.config.display.show_blocks {
        app.progress.block_bar(app.config.display.blocks)
    } else {
        String::new()
    };
    let grid = app.progress.grid(app.granularity);

    let block_rows = rows_needed(blocks.chars().count(), inner_width);
    let grid_rows = rows_needed(grid.len(), inner_width);
    let gap = |rows: u16| if rows > 0 { rows + 1 } else { 0 };
    // year, label, gauge, day line, then the optional sections and borders
    let height = (4 + gap(block_rows) + gap(grid_rows) + 2).min(area.height);

    let card = card_rect(area, width, height, app.card_offset);
    f.render_widget(Clear, card);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border())
        .style(palette.base())
        .title(" Year Progress ");
    let inner = block.inner(card);
    f.render_widget(block, card);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),              // Year
            Constraint::Length(1),              // Label and percentage
            Constraint::Length(1),              // Gauge
            Constraint::Length(1),              // Day counter
            Constraint::Length(gap(block_rows)), // Blocks
            Constraint::Min(0),                 // Grid
        ])
        .split(inner);

    let year = Paragraph::new(app.progress.year.to_string())
        .style(palette.title())
        .alignment(Alignment::Center);
    f.render_widget(year, rows[0]);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    let label = Paragraph::new(app.config.display.label.to_uppercase()).style(palette.base());
    f.render_widget(label, halves[0]);
    let percent = Paragraph::new(format!("{}%", app.progress.display_percentage()))
        .style(palette.base())
        .alignment(Alignment::Right);
    f.render_widget(percent, halves[1]);

    let gauge = Gauge::default()
        .gauge_style(palette.base().fg(palette.accent).bg(palette.cell_empty))
        .ratio(app.progress.fraction().clamp(0.0, 1.0))
        .label("");
    f.render_widget(gauge, rows[2]);

    let day = Paragraph::new(format!(
        "Day {} of {}  ·  {} left",
        app.progress.day_of_year,
        app.progress.total_days_in_year,
        app.progress.days_remaining()
    ))
    .style(palette.muted())
    .alignment(Alignment::Center);
    f.render_widget(day, rows[3]);

    if block_rows > 0 {
        let bar = Paragraph::new(blocks)
            .style(palette.muted())
            .wrap(Wrap { trim: false });
        f.render_widget(bar, with_top_gap(rows[4]));
    }

    if grid_rows > 0 {
        let lines = grid_lines(&grid, inner_width as usize, palette);
        f.render_widget(Paragraph::new(lines), with_top_gap(rows[5]));
    }

    card
}

/// One glyph per cell, wrapped to `width` columns.
fn grid_lines(cells: &[Cell], width: usize, palette: &Palette) -> Vec<Line<'static>> {
    cells
        .chunks(width.max(1))
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|cell| {
                        let filled = cell.is_filled();
                        Span::styled(if filled { "■" } else { "□" }, palette.cell(filled))
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

fn rows_needed(items: usize, width: u16) -> u16 {
    u16::try_from(items.div_ceil(usize::from(width.max(1)))).unwrap_or(u16::MAX)
}

fn with_top_gap(area: Rect) -> Rect {
    Rect {
        y: area.y.saturating_add(1),
        height: area.height.saturating_sub(1),
        ..area
    }
}

/// Center a `width` x `height` rect in `area`, shift it, and keep it on screen.
fn card_rect(area: Rect, width: u16, height: u16, offset: (i16, i16)) -> Rect {
    let max_x = i32::from(area.x) + i32::from(area.width.saturating_sub(width));
    let max_y = i32::from(area.y) + i32::from(area.height.saturating_sub(height));
    let x = i32::from(area.x) + i32::from((area.width - width) / 2) + i32::from(offset.0);
    let y = i32::from(area.y) + i32::from((area.height - height) / 2) + i32::from(offset.1);

    Rect {
        x: x.clamp(i32::from(area.x), max_x) as u16,
        y: y.clamp(i32::from(area.y), max_y) as u16,
        width,
        height,
    }
}

fn draw_notes(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border())
        .style(palette.base())
        .title(format!(" Notes ({}) ", app.notes.len()));

    if app.notes.is_empty() {
        let msg = Paragraph::new("No notes. Press 'n' to add one.")
            .style(palette.muted())
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = app
        .notes
        .iter()
        .enumerate()
        .map(|(i, note)| {
            let (marker, style) = if i == app.selected_note {
                ("> ", palette.selected())
            } else {
                ("  ", palette.base())
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(note.to_string(), style),
            ]))
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(app.selected_note));
    f.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn draw_footer(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let (msg, style) = if let Some((ref message, msg_type)) = app.message {
        let color = match msg_type {
            MessageType::Info => palette.success,
            MessageType::Error => palette.error,
        };
        (message.clone(), palette.base().fg(color))
    } else {
        (
            "n:Note  x:Delete  d:Theme  g:Grid  c:Cadence  0:Recenter  ?:Help  q:Quit".to_string(),
            palette.muted(),
        )
    };

    let status = format!(
        " {} | grid {} | every {} ",
        palette.name,
        grid_name(app.granularity),
        app.cadence.label()
    );

    let footer = Paragraph::new(msg).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border())
            .title(status),
    );

    f.render_widget(footer, area);
}

fn grid_name(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::Days => "days",
        Granularity::Weeks => "weeks",
        Granularity::None => "off",
    }
}

fn draw_help_popup(f: &mut Frame, palette: &Palette) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let help_text = r#"
Year Progress Keybindings

Notes:
  n, a            Add note
  x, Delete       Delete selected note
  j/k, Up/Down    Move selection

Display:
  d               Toggle dark/light
  g               Cycle grid (days, weeks, off)
  c               Toggle refresh (1s, 60s)
  0               Recenter card
  Mouse drag      Move card

General:
  ?               Show this help
  q, Ctrl-C       Quit

Press any key to close
"#;

    let popup = Paragraph::new(help_text)
        .style(palette.base())
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });

    f.render_widget(popup, area);
}

fn draw_note_input(f: &mut Frame, app: &App, palette: &Palette) {
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);

    let input = Paragraph::new(app.input_buffer.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" New note (Enter to save, Esc to cancel) "),
        )
        .style(palette.selected());

    f.render_widget(input, area);

    f.set_cursor_position(input_cursor(area, app.input_buffer.chars().count()));
}

/// Cursor after `typed` chars, pinned inside the input border.
fn input_cursor(area: Rect, typed: usize) -> Position {
    let typed = u16::try_from(typed).unwrap_or(u16::MAX);
    let last_column = area.right().saturating_sub(2).max(area.x.saturating_add(1));
    Position::new(
        area.x.saturating_add(1).saturating_add(typed).min(last_column),
        area.y.saturating_add(1),
    )
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::NaiveDate;
    use progress_core::{Settings, YearProgress};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn app() -> App {
        let progress = YearProgress::at(
            NaiveDate::from_ymd_opt(2024, 7, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        App::new(Config::default(), Settings::in_memory(), progress)
    }

    fn render(app: &mut App, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut result = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                if let Some(cell) = buffer.cell((x, y)) {
                    result.push_str(cell.symbol());
                }
            }
            result.push('\n');
        }
        result
    }

    fn count(buffer: &Buffer, symbol: &str) -> usize {
        buffer.content.iter().filter(|c| c.symbol() == symbol).count()
    }

    #[test]
    fn test_renders_progress() {
        let buffer = render(&mut app(), 120, 40);
        let content = text(&buffer);

        assert!(content.contains("2024"));
        assert!(content.contains("LOADING"));
        assert!(content.contains("49.73%"));
        assert!(content.contains("Day 183 of 366"));
        assert!(content.contains("Notes (0)"));
    }

    #[test]
    fn test_day_grid_cells() {
        let buffer = render(&mut app(), 120, 40);
        assert_eq!(count(&buffer, "■"), 183);
        assert_eq!(count(&buffer, "□"), 183);
        assert_eq!(count(&buffer, "▓"), 49);
        assert_eq!(count(&buffer, "░"), 51);
    }

    #[test]
    fn test_week_grid_and_no_grid() {
        let mut app = app();
        app.granularity = Granularity::Weeks;
        let buffer = render(&mut app, 120, 40);
        assert_eq!(count(&buffer, "■"), 27);
        assert_eq!(count(&buffer, "□"), 26);

        app.granularity = Granularity::None;
        let buffer = render(&mut app, 120, 40);
        assert_eq!(count(&buffer, "■") + count(&buffer, "□"), 0);
    }

    #[test]
    fn test_notes_and_input() {
        let mut app = app();
        app.notes.add("plan Q3");
        app.mode = crate::app::Mode::AddingNote;
        app.input_buffer = "draft".to_string();

        let content = text(&render(&mut app, 120, 40));
        assert!(content.contains("> plan Q3"));
        assert!(content.contains("New note"));
        assert!(content.contains("draft"));
    }

    #[test]
    fn test_light_palette_applied() {
        let mut app = app();
        app.dark_mode = false;
        let buffer = render(&mut app, 120, 40);
        let corner = buffer.cell((0, 0)).unwrap();
        assert_eq!(corner.bg, Palette::LIGHT.bg);
    }

    #[test]
    fn test_card_stays_on_screen() {
        let area = Rect::new(0, 0, 80, 30);
        let rect = card_rect(area, 40, 10, (500, -500));
        assert_eq!(rect, Rect::new(40, 0, 40, 10));

        let rect = card_rect(area, 40, 10, (0, 0));
        assert_eq!(rect, Rect::new(20, 10, 40, 10));
    }

    #[test]
    fn test_selected_note_scrolled_into_view() {
        let mut app = app();
        for i in 0..40 {
            app.notes.add(&format!("note{i}"));
        }
        app.selected_note = 39;

        let content = text(&render(&mut app, 120, 20));
        assert!(content.contains("> note39"));
        assert!(!content.contains("note0 "));
    }

    #[test]
    fn test_card_area_recorded() {
        let mut app = app();
        assert_eq!(app.card_area, None);
        render(&mut app, 120, 40);

        let card = app.card_area.unwrap();
        assert_eq!(card.width, CARD_MAX_WIDTH);
        assert!(card.right() <= 84);
    }

    #[test]
    fn test_input_cursor_stays_in_box() {
        let area = Rect::new(10, 5, 20, 3);
        assert_eq!(input_cursor(area, 0), Position::new(11, 6));
        assert_eq!(input_cursor(area, 5), Position::new(16, 6));
        assert_eq!(input_cursor(area, 500), Position::new(28, 6));
        assert_eq!(input_cursor(area, usize::MAX), Position::new(28, 6));

        let tiny = Rect::new(0, 0, 1, 1);
        assert_eq!(input_cursor(tiny, 3), Position::new(1, 1));
    }

    #[test]
    fn test_long_input_does_not_panic() {
        let mut app = app();
        app.mode = crate::app::Mode::AddingNote;
        app.input_buffer = "x".repeat(5000);
        let content = text(&render(&mut app, 120, 40));
        assert!(content.contains("New note"));
    }

    #[test]
    fn test_rows_needed_saturates() {
        assert_eq!(rows_needed(0, 10), 0);
        assert_eq!(rows_needed(21, 10), 3);
        assert_eq!(rows_needed(usize::MAX, 1), u16::MAX);
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let content = text(&render(&mut app(), 20, 6));
        assert!(!content.is_empty());
    }
}
