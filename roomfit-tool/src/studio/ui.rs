use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Wrap,
        canvas::{Canvas, Rectangle},
    },
};
use roomfit_core::catalog::{SortKey, count_by_kind};
use roomfit_core::{Feedback, FeedbackStatus, FurnitureKind, InfoKind, Modal, Panel, RoomLayout, Studio};

use super::app::{AppMode, StudioApp};

/// Display pixels covered by one terminal column.
pub const PIXELS_PER_COLUMN: f64 = 8.0;
/// Display pixels covered by one terminal row. Cells are about twice as tall as wide.
pub const PIXELS_PER_ROW: f64 = 16.0;

/// The room as last drawn: its screen area and the layout painted into it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomView {
    pub area: Rect,
    pub layout: RoomLayout,
}

impl RoomView {
    /// Maps the centre of a terminal cell to display pixels.
    pub fn cell_to_pixel(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        let area = self.area;
        if area.width == 0
            || area.height == 0
            || column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        let px = (f64::from(column - area.x) + 0.5) * self.layout.room_pixel_width
            / f64::from(area.width);
        let py = (f64::from(row - area.y) + 0.5) * self.layout.room_pixel_height
            / f64::from(area.height);
        Some((px, py))
    }
}

/// Sizes the room inside `inner`, using the terminal width as the window.
pub fn room_view(app: &StudioApp, inner: Rect) -> RoomView {
    let window = f64::from(inner.width) * PIXELS_PER_COLUMN;
    let budget = app.studio.config().display_budget(window);
    let layout = app.studio.layout(budget);

    let columns = (layout.room_pixel_width / PIXELS_PER_COLUMN).ceil().max(1.0);
    let rows = (layout.room_pixel_height / PIXELS_PER_ROW).ceil().max(1.0);
    let area = Rect {
        x: inner.x,
        y: inner.y,
        width: (columns as u16).min(inner.width),
        height: (rows as u16).min(inner.height),
    };

    RoomView { area, layout }
}

pub fn render(frame: &mut Frame, app: &mut StudioApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Room and side panel
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(38)])
        .split(chunks[1]);

    render_header(frame, app, chunks[0]);
    render_room(frame, app, body[0]);
    render_side_panel(frame, app, body[1]);
    render_status_bar(frame, app, chunks[2]);

    match app.mode {
        AppMode::PickFurniture => render_picker(frame, app),
        AppMode::EditName => render_name_input(frame, app),
        AppMode::Studio => {}
    }

    match app.studio.modal() {
        Modal::Closed => {}
        Modal::Info {
            kind,
            title,
            message,
        } => render_info_modal(frame, *kind, title, message),
        Modal::FitnessResults => render_fitness_modal(frame, &app.studio),
    }
}

fn render_header(frame: &mut Frame, app: &StudioApp, area: Rect) {
    let room = app.studio.room();
    let name = app.studio.design_name();
    let name_text = if name.is_empty() {
        String::new()
    } else {
        format!("  design: {}", name)
    };
    let busy_text = match (app.studio.is_busy(), app.studio.is_saving()) {
        (true, _) => "  [checking...]",
        (_, true) => "  [saving...]",
        _ => "",
    };

    let title = format!(
        "rf studio - {} ({} x {} ft){}{}",
        room.name, room.width, room.depth, name_text, busy_text
    );

    let header = Paragraph::new(title).style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    frame.render_widget(header, area);
}

fn status_color(status: FeedbackStatus) -> Color {
    match status {
        FeedbackStatus::Unchecked => Color::Gray,
        FeedbackStatus::Clear => Color::Green,
        FeedbackStatus::Problem => Color::Red,
    }
}

fn render_room(frame: &mut Frame, app: &mut StudioApp, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Room");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let view = room_view(app, inner);
    let (width, height) = (view.layout.room_pixel_width, view.layout.room_pixel_height);
    let selected = app.studio.selection().id();

    let rects: Vec<(Rectangle, Option<String>)> = view
        .layout
        .rects
        .iter()
        .filter_map(|rect| {
            let placed = app.studio.store().get(rect.id)?;
            let color = if Some(rect.id) == selected {
                Color::Yellow
            } else {
                status_color(app.studio.feedback_for(rect.id).status())
            };
            let shape = Rectangle {
                x: rect.x,
                // Canvas y grows upwards.
                y: height - rect.y - rect.h,
                width: rect.w,
                height: rect.h,
                color,
            };
            let label = (rect.w >= PIXELS_PER_COLUMN * 3.0).then(|| placed.name().to_string());
            Some((shape, label))
        })
        .collect();

    let canvas = Canvas::default()
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            ctx.draw(&Rectangle {
                x: 0.0,
                y: 0.0,
                width,
                height,
                color: Color::DarkGray,
            });
            for (shape, label) in &rects {
                ctx.draw(shape);
                if let Some(label) = label {
                    ctx.print(
                        shape.x + 1.0,
                        shape.y + shape.height - 1.0,
                        Span::styled(label.clone(), Style::default().fg(shape.color)),
                    );
                }
            }
        });

    frame.render_widget(canvas, view.area);
    app.room_view = Some(view);
}

fn render_side_panel(frame: &mut Frame, app: &StudioApp, area: Rect) {
    match app.studio.panel() {
        Panel::Catalog => render_catalog_panel(frame, app, area),
        Panel::Controls => render_controls_panel(frame, app, area),
    }
}

fn render_catalog_panel(frame: &mut Frame, app: &StudioApp, area: Rect) {
    let counts = count_by_kind(&app.catalog);
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            format!("{} items in catalog", app.catalog.len()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for kind in FurnitureKind::ALL {
        if let Some(count) = counts.get(&kind) {
            lines.push(Line::from(format!("  {:<10} {}", kind.as_str(), count)));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(format!("{} placed in room", app.studio.store().len())));
    lines.push(Line::from(Span::styled(
        "Press a to add furniture",
        Style::default().fg(Color::DarkGray),
    )));

    let panel = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Catalog"))
        .wrap(Wrap { trim: false });
    frame.render_widget(panel, area);
}

fn render_controls_panel(frame: &mut Frame, app: &StudioApp, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    match app.studio.selected() {
        None => {
            lines.push(Line::from(Span::styled(
                "Nothing selected",
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from("n/p or click to select"));
        }
        Some(placed) => {
            let footprint = placed.footprint();
            lines.push(Line::from(Span::styled(
                format!("{} {}", placed.id, placed.name()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!(
                "Position  ({:.1}, {:.1}) ft",
                placed.position.x, placed.position.y
            )));
            lines.push(Line::from(format!("Rotation  {}", placed.rotation)));
            lines.push(Line::from(format!(
                "Footprint {} x {} ft",
                footprint.width, footprint.depth
            )));
            lines.push(Line::from(""));

            match app.studio.feedback_for(placed.id) {
                Feedback::NoResult => {
                    lines.push(Line::from(Span::styled(
                        "Not checked",
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                Feedback::Result { result, ambiguous } => {
                    let status = app.studio.feedback_for(placed.id).status();
                    let verdict = if status == FeedbackStatus::Clear { "Fits" } else { "Problem" };
                    lines.push(Line::from(Span::styled(
                        verdict,
                        Style::default().fg(status_color(status)).add_modifier(Modifier::BOLD),
                    )));
                    lines.push(Line::from(result.message.clone()));
                    if !result.collisions.is_empty() {
                        lines.push(Line::from(format!(
                            "Collides with {}",
                            result.collisions.join(", ")
                        )));
                    }
                    lines.push(Line::from(format!(
                        "Walking space {:.1} x {:.1} ft",
                        result.walking_space_x, result.walking_space_y
                    )));
                    if ambiguous {
                        lines.push(Line::from(Span::styled(
                            "Matched by order among duplicates",
                            Style::default().fg(Color::DarkGray),
                        )));
                    }
                }
            }
        }
    }

    if app.studio.feedback_is_stale() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Layout changed since last check",
            Style::default().fg(Color::DarkGray),
        )));
    }

    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }

    let panel = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Controls"))
        .wrap(Wrap { trim: false });
    frame.render_widget(panel, area);
}

fn render_status_bar(frame: &mut Frame, app: &StudioApp, area: Rect) {
    let status = if app.modal_open() {
        "Enter/Esc: Close"
    } else {
        match app.mode {
            AppMode::Studio => {
                "a: Add  ←↑↓→: Move  r: Rotate  x: Remove  n/p: Select  Tab: Panel  c: Check  e: Name  s: Save  q: Quit"
            }
            AppMode::PickFurniture => "Type: Search  F2: Category  F3: Sort  ↑/↓: Navigate  Enter: Add  Esc: Cancel",
            AppMode::EditName => "Enter: Confirm  Esc: Cancel",
        }
    };

    let status_bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status_bar, area);
}

fn render_picker(frame: &mut Frame, app: &StudioApp) {
    let area = centered_rect(50, 60, frame.area());
    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let category = app.query.category.map(|k| k.as_str()).unwrap_or("all");
    let sort = match app.query.sort {
        SortKey::Name => "name",
        SortKey::Size => "size",
    };
    let search = Paragraph::new(app.query.search.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Search [{} | by {}]", category, sort)),
    );
    frame.render_widget(search, chunks[0]);

    let items: Vec<ListItem> = app
        .visible_catalog()
        .into_iter()
        .map(|t| {
            ListItem::new(format!(
                "{:<22} {:<8} {} x {} ft",
                t.name,
                t.kind.as_str(),
                t.width,
                t.depth
            ))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Add Furniture"))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ratatui::widgets::ListState::default();
    state.select(Some(app.popup_selected));

    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn render_name_input(frame: &mut Frame, app: &StudioApp) {
    let outer = centered_rect(50, 20, frame.area());
    let area = Rect {
        height: outer.height.min(3),
        ..outer
    };
    frame.render_widget(Clear, area);

    let input = Paragraph::new(app.input.as_str())
        .block(Block::default().borders(Borders::ALL).title("Design Name"));
    frame.render_widget(input, area);

    let prefix_width = app.input[..app.cursor_pos].chars().count() as u16;
    frame.set_cursor_position((area.x + 1 + prefix_width, area.y + 1));
}

fn render_info_modal(frame: &mut Frame, kind: InfoKind, title: &str, message: &str) {
    let area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);

    let color = match kind {
        InfoKind::Success => Color::Green,
        InfoKind::Error => Color::Red,
        InfoKind::Info => Color::Cyan,
    };

    let paragraph = Paragraph::new(message)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD))),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Body of the results modal: one entry per placement, in placement order.
pub fn fitness_lines(studio: &Studio) -> Vec<Line<'static>> {
    let Some(feedback) = studio.fitness_feedback() else {
        return vec![Line::from("No results")];
    };

    let mut lines = vec![Line::from(feedback.overall_message().to_string()), Line::from("")];
    for placed in studio.store().iter() {
        let status = studio.feedback_for(placed.id).status();
        let style = Style::default().fg(status_color(status));
        match studio.feedback_for(placed.id) {
            Feedback::NoResult => {
                lines.push(Line::from(Span::styled(
                    placed.name().to_string(),
                    style.add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from("  no result"));
            }
            Feedback::Result { result, ambiguous } => {
                let mut heading = vec![Span::styled(
                    placed.name().to_string(),
                    style.add_modifier(Modifier::BOLD),
                )];
                if ambiguous {
                    heading.push(Span::styled(
                        " [ambiguous]",
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                lines.push(Line::from(heading));
                lines.push(Line::from(format!("  {}", result.message)));
                if !result.collisions.is_empty() {
                    lines.push(Line::from(format!(
                        "  Collides with {}",
                        result.collisions.join(", ")
                    )));
                }
            }
        }
    }

    let unmatched = feedback
        .report()
        .results
        .len()
        .saturating_sub(feedback.bound_count());
    if unmatched > 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} result(s) matched no placement", unmatched),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn render_fitness_modal(frame: &mut Frame, studio: &Studio) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let all_fits = studio.fitness_feedback().is_some_and(|f| f.all_fits());
    let (title, color) = if all_fits {
        ("All Furniture Fits!", Color::Green)
    } else {
        ("Fitness Issues Found", Color::Red)
    };

    let paragraph = Paragraph::new(Text::from(fitness_lines(studio)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
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
    use std::sync::Arc;

    use roomfit_client::RoomfitClient;
    use roomfit_core::{FitnessReport, FitnessResult, FurnitureTemplate, LayoutConfig, Room};

    use super::*;

    fn app(width: f64, depth: f64) -> StudioApp {
        let room = Room {
            id: 1,
            name: "Den".to_string(),
            width,
            depth,
        };
        StudioApp::new(
            Studio::new(room, LayoutConfig::default()),
            RoomfitClient::new(),
            vec![],
        )
    }

    #[test]
    fn small_room_keeps_base_scale() {
        let app = app(12.0, 10.0);
        let inner = Rect::new(1, 2, 100, 40);

        let view = room_view(&app, inner);
        assert_eq!(view.layout.scale, 15.0);
        // 180 x 150 px
        assert_eq!(view.area, Rect::new(1, 2, 23, 10));
    }

    #[test]
    fn wide_room_is_scaled_to_the_terminal() {
        let app = app(40.0, 10.0);
        let inner = Rect::new(0, 0, 50, 40);

        let view = room_view(&app, inner);
        // 50 columns = 400 px, minus the 60 px margin
        assert_eq!(view.layout.scale, 340.0 / 40.0);
        assert!(view.area.width <= inner.width);
    }

    #[test]
    fn clicks_map_to_placements() {
        let mut app = app(12.0, 10.0);
        let desk = Arc::new(FurnitureTemplate {
            id: 1,
            name: "Desk".to_string(),
            kind: FurnitureKind::Table,
            width: 4.0,
            depth: 2.0,
        });
        let id = app.studio.add_furniture(desk);
        app.studio.clear_selection();

        let view = room_view(&app, Rect::new(0, 0, 100, 40));
        assert!(view.cell_to_pixel(200, 0).is_none());

        // Desk spans 30..90 px horizontally and 30..60 px vertically.
        let (px, py) = view.cell_to_pixel(5, 2).unwrap();
        assert!(px > 30.0 && px < 90.0 && py > 30.0 && py < 60.0, "{px} {py}");

        app.room_view = Some(view);
        app.click(5, 2);
        assert_eq!(app.studio.selection().id(), Some(id));

        app.click(20, 8);
        assert_eq!(app.studio.selection().id(), None);
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn result(furniture_id: u64, message: &str) -> FitnessResult {
        FitnessResult {
            furniture_id,
            furniture_name: String::new(),
            fits: true,
            collisions: vec![],
            adequate_space: true,
            walking_space_x: 3.0,
            walking_space_y: 3.0,
            message: message.to_string(),
        }
    }

    #[test]
    fn results_modal_marks_duplicates_as_ambiguous() {
        let mut app = app(20.0, 12.0);
        let chair = Arc::new(FurnitureTemplate {
            id: 2,
            name: "Chair".to_string(),
            kind: FurnitureKind::Chair,
            width: 2.0,
            depth: 2.0,
        });
        let desk = Arc::new(FurnitureTemplate {
            id: 1,
            name: "Desk".to_string(),
            kind: FurnitureKind::Table,
            width: 4.0,
            depth: 2.0,
        });
        app.studio.add_furniture(desk);
        app.studio.add_furniture(chair.clone());
        app.studio.add_furniture(chair);

        let ticket = app.studio.begin_fitness_check().unwrap();
        app.studio.finish_fitness_check(
            ticket.id,
            Ok(FitnessReport {
                all_fits: true,
                overall_message: "Looks good".to_string(),
                results: vec![
                    result(1, "desk ok"),
                    result(2, "first chair"),
                    result(2, "second chair"),
                    result(5, "ghost"),
                ],
            }),
        );
        assert_eq!(app.studio.modal(), &Modal::FitnessResults);

        let lines: Vec<String> = fitness_lines(&app.studio).iter().map(text).collect();
        assert_eq!(
            lines,
            vec![
                "Looks good",
                "",
                "Desk",
                "  desk ok",
                "Chair [ambiguous]",
                "  first chair",
                "Chair [ambiguous]",
                "  second chair",
                "",
                "1 result(s) matched no placement",
            ]
        );
    }

    #[test]
    fn results_modal_without_feedback() {
        let app = app(12.0, 10.0);
        let lines: Vec<String> = fitness_lines(&app.studio).iter().map(text).collect();
        assert_eq!(lines, vec!["No results"]);
    }
}
