use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::{MAX_SELECTION, RECENT_MONTHS};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.calendar_months.is_empty() {
        render_empty(f, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Month strip
            Constraint::Min(3),    // Activities
        ])
        .split(area);

    render_month_strip(f, chunks[0], app);
    render_activities(f, chunks[1], app);
}

fn render_month_strip(f: &mut Frame, area: Rect, app: &App) {
    let shaking = app.shake_ticks > 0;
    let mut spans = vec![Span::raw(" ".repeat(app.shake_offset() as usize))];

    for (i, &month) in app.calendar_months.iter().enumerate() {
        let mut style = if app.selection.contains(month) {
            if shaking {
                theme::rejected_style()
            } else {
                theme::month_selected_style()
            }
        } else {
            theme::normal_style()
        };
        if i == app.month_cursor {
            style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
        }
        spans.push(Span::styled(format!(" {} ", month.label()), style));
        spans.push(Span::raw(" "));
    }

    let border = if shaking { theme::RED } else { theme::OVERLAY };
    let strip = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(Span::styled(
                format!(" Months (up to {MAX_SELECTION} in a row) "),
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(strip, area);
}

fn render_activities(f: &mut Frame, area: Rect, app: &App) {
    let width = area.width.saturating_sub(8) as usize;
    let mut lines: Vec<Line> = Vec::new();

    for month in &app.activities {
        lines.push(Line::from(Span::styled(
            format!("▸ {}", month.month.label()),
            theme::section_style(),
        )));
        if month.activities.is_empty() {
            lines.push(Line::from(Span::styled(
                "    No activities recorded",
                theme::dim_style(),
            )));
            continue;
        }
        for group in &month.groups {
            lines.push(Line::from(Span::styled(
                format!("  {}", group.category),
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )));
            for entry in &group.activities {
                let mut spans = vec![Span::styled(
                    format!("    • {}", truncate(&entry.activity, width)),
                    theme::normal_style(),
                )];
                if entry.category != group.category {
                    spans.push(Span::styled(
                        format!("  ({})", entry.category),
                        theme::dim_style(),
                    ));
                }
                lines.push(Line::from(spans));
            }
        }
    }

    if let Some(line) = lines.get_mut(app.activity_scroll.cursor) {
        *line = std::mem::take(line).style(theme::selected_style());
    }

    let title = match &app.emp_filter {
        Some(emp) => format!(" Activities for {} ({emp}) ", app.selection_label()),
        None => format!(" Activities for {} ", app.selection_label()),
    };
    let body = Paragraph::new(lines)
        .scroll((app.activity_scroll.offset as u16, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY))
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(theme::TEXT_DIM)
                        .add_modifier(Modifier::BOLD),
                )),
        );
    f.render_widget(body, area);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("No allocation in the last {RECENT_MONTHS} months"),
            theme::dim_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Use :import allocation <file.csv> to load records",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " Calendar ",
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(msg, area);
}
