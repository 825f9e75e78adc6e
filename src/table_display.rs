use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;

use fingrid::data::record::DISPLAY_COLUMNS;
use fingrid::data::view::StatementView;

/// Print the visible rows as a plain table for `--classic` mode.
pub fn display_statements(ticker: &str, view: &StatementView) {
    if view.row_count() == 0 {
        if view.source_count() == 0 {
            println!("{}", "No data returned.".yellow());
        } else {
            println!("{}", "No rows match the given filters.".yellow());
        }
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        DISPLAY_COLUMNS
            .iter()
            .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );

    for record in view.records() {
        table.add_row(record.display_values());
    }

    println!("{table}");
    println!(
        "\n{}",
        format!("{} rows for {}", view.row_count(), ticker).green()
    );
}
