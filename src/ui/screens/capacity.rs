use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::models::CategoryBucket;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::format_amount;

const LABEL_WIDTH: u16 = 22;
const MONTH_WIDTH: u16 = 9;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let summary = &app.summary;
    if summary.months.is_empty() {
        render_empty(f, area);
        return;
    }

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(summary.labels().into_iter().map(Cell::from))
            .collect::<Vec<_>>(),
    )
    .style(theme::header_style());

    let mut rows: Vec<Row> = CategoryBucket::SUMMARY_ORDER
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            let style = if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            amount_row(bucket.summary_label(), &summary.category_values(*bucket), style)
        })
        .collect();

    rows.push(amount_row(
        "Total allocated",
        &summary.totals(),
        theme::normal_style().add_modifier(Modifier::BOLD),
    ));
    rows.push(amount_row(
        "People capacity",
        &summary.people_capacity(),
        theme::normal_style(),
    ));
    rows.push(remaining_row(&summary.remaining()));

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(LABEL_WIDTH))
        .chain(summary.months.iter().map(|_| Constraint::Length(MONTH_WIDTH)))
        .collect();

    let title = format!(
        " Capacity from {} ({} months) ",
        summary
            .first_month()
            .map(|m| m.label())
            .unwrap_or_default(),
        summary.months.len()
    );
    let table = Table::new(rows, widths).header(header).block(
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
    f.render_widget(table, area);
}

fn amount_row<'a>(label: &'a str, values: &[Decimal], style: Style) -> Row<'a> {
    let cells: Vec<Cell> = std::iter::once(Cell::from(label))
        .chain(values.iter().map(|v| Cell::from(format!("{:>8}", format_amount(*v)))))
        .collect();
    Row::new(cells).style(style)
}

/// Negative remaining capacity is shown in red.
fn remaining_row(values: &[Decimal]) -> Row<'static> {
    let cells: Vec<Cell> = std::iter::once(Cell::from(Span::styled(
        "Remaining",
        theme::normal_style().add_modifier(Modifier::BOLD),
    )))
    .chain(values.iter().map(|v| {
        let style = if *v < Decimal::ZERO {
            theme::deficit_style()
        } else {
            theme::surplus_style()
        };
        Cell::from(Span::styled(format!("{:>8}", format_amount(*v)), style))
    }))
    .collect();
    Row::new(cells)
}

fn render_empty(f: &mut Frame, area: Rect) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("Empty window", theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Use :window <n> to choose how many months to show",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " Capacity ",
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(msg, area);
}
