use std::collections::HashSet;

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::data::record::DISPLAY_COLUMNS;
use crate::data::view::StatementView;

/// Everything the grid needs to draw one frame. Keeping this a plain struct
/// keeps the render function free of app internals.
pub struct GridContext<'a> {
    pub view: &'a StatementView,
    pub selection: &'a HashSet<usize>,
    /// Row cursor within the current page.
    pub cursor: usize,
    pub show_row_numbers: bool,
    pub ticker: &'a str,
}

pub fn render_grid(f: &mut Frame, area: Rect, ctx: &GridContext) {
    if ctx.view.row_count() == 0 {
        let message = if ctx.view.source_count() == 0 {
            "No data loaded"
        } else {
            "No rows match the active filters"
        };
        let empty = Paragraph::new(message)
            .block(Block::default().borders(Borders::ALL).title(grid_title(ctx)))
            .style(Style::default().fg(Color::Yellow));
        f.render_widget(empty, area);
        return;
    }

    let header = build_header_row(ctx);
    let rows = build_data_rows(ctx);
    let widths = column_widths(ctx);

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(grid_title(ctx)))
        .column_spacing(1)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = TableState::default();
    state.select(Some(ctx.cursor.min(ctx.view.page_row_count().saturating_sub(1))));
    f.render_stateful_widget(table, area, &mut state);
}

fn grid_title(ctx: &GridContext) -> String {
    let filtered = if ctx.view.is_filtered() {
        format!(" of {} (filtered)", ctx.view.source_count())
    } else {
        String::new()
    };
    format!(
        " {} income statements | {} rows{} | page {}/{} ",
        ctx.ticker,
        ctx.view.row_count(),
        filtered,
        ctx.view.page() + 1,
        ctx.view.page_count()
    )
}

fn build_header_row(ctx: &GridContext) -> Row<'static> {
    let mut cells: Vec<Cell> = Vec::new();

    cells.push(header_cell("Sel"));
    if ctx.show_row_numbers {
        cells.push(header_cell("#"));
    }
    for name in DISPLAY_COLUMNS {
        cells.push(header_cell(name));
    }

    Row::new(cells).height(1)
}

fn header_cell(name: &str) -> Cell<'static> {
    Cell::from(name.to_string()).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

fn build_data_rows(ctx: &GridContext) -> Vec<Row<'static>> {
    let first_row_number = ctx.view.page() * ctx.view.page_size() + 1;

    ctx.view
        .page_records()
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let mut cells: Vec<Cell> = Vec::new();

            let marker = if ctx.selection.contains(&record.id) {
                Cell::from("[x]").style(Style::default().fg(Color::Green))
            } else {
                Cell::from("[ ]")
            };
            cells.push(marker);

            if ctx.show_row_numbers {
                cells.push(
                    Cell::from(format!("{}", first_row_number + i))
                        .style(Style::default().fg(Color::Magenta)),
                );
            }

            for value in record.display_values() {
                cells.push(Cell::from(value));
            }

            Row::new(cells)
        })
        .collect()
}

fn column_widths(ctx: &GridContext) -> Vec<Constraint> {
    let mut widths = vec![Constraint::Length(3)];
    if ctx.show_row_numbers {
        widths.push(Constraint::Length(4));
    }
    widths.push(Constraint::Length(10));
    widths.extend([Constraint::Min(12); 5]);
    widths
}
