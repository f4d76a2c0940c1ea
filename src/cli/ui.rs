use super::app::{App, Mode};
use chrono::Local;
use dignitary_tracker::{Status, TrackedPerson, ViewMode};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

const TILE_WIDTH: u16 = 42;
const TILE_HEIGHT: u16 = 10;

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Header
                Constraint::Length(3), // Search
                Constraint::Min(1),    // Board grows
                Constraint::Length(1), // Status line
            ]
            .as_ref(),
        )
        .split(f.area());

    draw_header(f, app, chunks[0]);
    f.render_widget(&app.search, chunks[1]);

    match app.session.view_mode {
        ViewMode::Tile => draw_tiles(f, app, chunks[2]),
        ViewMode::List => draw_list(f, app, chunks[2]),
    }

    f.render_widget(Paragraph::new(app.status_line.clone()), chunks[3]);

    if app.mode == Mode::InlineEdit {
        draw_inline_editor(f, app);
    }
}

pub fn status_color(status: Status) -> Color {
    match status {
        Status::ReachingIn5Min => Color::Red,
        Status::ReachingIn10Min => Color::LightRed,
        Status::Started => Color::Green,
        Status::NotStarted => Color::Yellow,
        Status::Reached => Color::Blue,
    }
}

fn status_span(status: Status) -> Span<'static> {
    Span::styled(
        status.label(),
        Style::default()
            .fg(status_color(status))
            .add_modifier(Modifier::BOLD),
    )
}

fn format_time(record: &TrackedPerson) -> String {
    record
        .last_updated
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            "Dignitary Tracker",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  {} · {} view · {}/{} shown  ",
            app.session.role.label(),
            match app.session.view_mode {
                ViewMode::Tile => "tile",
                ViewMode::List => "list",
            },
            app.visible.len(),
            app.total
        )),
    ];
    for (status, count) in app.counts {
        spans.push(Span::styled(
            format!(" {}:{} ", status.label(), count),
            Style::default().fg(status_color(status)),
        ));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn detail_lines(record: &TrackedPerson) -> Vec<Line<'static>> {
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    vec![
        Line::from(Span::styled(
            record.designation.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(record.organization.clone()),
        Line::from(vec![Span::raw("Status: "), status_span(record.status)]),
        Line::from(format!("Remarks: {}", optional(&record.remarks))),
        Line::from(format!("Car: {}", optional(&record.car_number))),
        Line::from(format!(
            "LO: {} {}",
            optional(&record.liaison_name),
            record.liaison_phone.clone().unwrap_or_default()
        )),
        Line::from(format!("Facilitator: {}", optional(&record.facilitator_name))),
        Line::from(Span::styled(
            format!("Last updated: {}", format_time(record)),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

fn draw_tiles(f: &mut Frame, app: &App, area: Rect) {
    let outer = Block::default().borders(Borders::ALL).title(" Board ");
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    if app.visible.is_empty() {
        f.render_widget(Paragraph::new("No dignitaries found."), inner);
        return;
    }

    let columns = (inner.width / TILE_WIDTH).max(1) as usize;
    let rows_fit = (inner.height / TILE_HEIGHT).max(1) as usize;
    let selected_row = app.selected / columns;
    let first_row = selected_row.saturating_sub(rows_fit - 1);
    let tile_width = inner.width / columns as u16;

    for (index, record) in app.visible.iter().enumerate().skip(first_row * columns) {
        let row = index / columns - first_row;
        if row >= rows_fit {
            break;
        }
        let col = index % columns;
        let tile = Rect::new(
            inner.x + col as u16 * tile_width,
            inner.y + row as u16 * TILE_HEIGHT,
            tile_width,
            TILE_HEIGHT.min(inner.height),
        );

        let mut border = Style::default().fg(status_color(record.status));
        if index == app.selected {
            border = border.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ", record.name));

        f.render_widget(
            Paragraph::new(detail_lines(record))
                .block(block)
                .wrap(Wrap { trim: true }),
            tile,
        );
    }
}

fn draw_list(f: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(
        [
            "Name",
            "Designation",
            "Organization",
            "Status",
            "Remarks",
            "Car",
            "LO",
            "Updated",
        ]
        .map(|title| Cell::from(title).style(Style::default().add_modifier(Modifier::BOLD))),
    );

    let rows: Vec<Row> = app
        .visible
        .iter()
        .map(|record| {
            Row::new(vec![
                Cell::from(record.name.clone()),
                Cell::from(record.designation.clone()),
                Cell::from(record.organization.clone()),
                Cell::from(status_span(record.status)),
                Cell::from(record.remarks.clone().unwrap_or_default()),
                Cell::from(record.car_number.clone().unwrap_or_default()),
                Cell::from(record.liaison_name.clone().unwrap_or_default()),
                Cell::from(format_time(record)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(14),
        Constraint::Percentage(14),
        Constraint::Percentage(16),
        Constraint::Length(18),
        Constraint::Percentage(20),
        Constraint::Length(14),
        Constraint::Percentage(10),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Board "))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(">> ");

    let mut state = TableState::default();
    if !app.visible.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_inline_editor(f: &mut Frame, app: &App) {
    let Some(draft) = app.session.inline_edit.as_ref() else {
        return;
    };
    let name = app
        .visible
        .iter()
        .find(|record| record.id == draft.id)
        .map(|record| record.name.clone())
        .unwrap_or_default();

    let screen = f.area();
    let width = 60.min(screen.width);
    let height = 10.min(screen.height);
    let area = Rect::new(
        screen.x + (screen.width - width) / 2,
        screen.y + (screen.height - height) / 2,
        width,
        height,
    );

    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Edit {} ", name));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)].as_ref())
        .split(inner);

    let picker: Vec<Span> = Status::ALL
        .iter()
        .map(|status| {
            let mut style = Style::default().fg(status_color(*status));
            if *status == draft.status {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }
            Span::styled(format!(" {} ", status.label()), style)
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(picker)), parts[0]);
    f.render_widget(&app.remarks, parts[1]);
}
