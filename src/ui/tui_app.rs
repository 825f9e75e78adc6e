use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::data::exporter::StatementExporter;
use crate::data::filter::FilterInput;
use crate::data::record::StatementRecord;
use crate::data::view::StatementView;
use crate::ui::table_renderer::{render_grid, GridContext};
use crate::widgets::filter_field::FilterField;
use crate::widgets::help_widget::HelpWidget;

const FIELD_TITLES: [&str; 6] = [
    "Date From (YYYY-MM-DD)",
    "Date To (YYYY-MM-DD)",
    "Revenue Min",
    "Revenue Max",
    "Net Income Min",
    "Net Income Max",
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Grid,
    Filter,
    Help,
}

pub struct App {
    config: Config,
    ticker: String,
    view: StatementView,
    fields: Vec<FilterField>,
    focus: usize,
    /// Last successfully applied input; Esc restores the fields to this.
    applied: FilterInput,
    mode: Mode,
    /// Row cursor within the current page.
    cursor: usize,
    selection: HashSet<usize>,
    status: String,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        ticker: String,
        records: Vec<StatementRecord>,
        fetch_error: Option<String>,
    ) -> Self {
        let page_size = config.display.page_size;
        let view = StatementView::new(Arc::new(records), page_size);

        let status = match fetch_error {
            Some(err) => format!("Fetch failed: {}", err),
            None => format!(
                "{} statements loaded for {} - press ? for help",
                view.source_count(),
                ticker
            ),
        };

        Self {
            config,
            ticker,
            view,
            fields: FIELD_TITLES.iter().map(|t| FilterField::new(*t)).collect(),
            focus: 0,
            applied: FilterInput::default(),
            mode: Mode::Grid,
            cursor: 0,
            selection: HashSet::new(),
            status,
            should_quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Help => self.mode = Mode::Grid,
            Mode::Filter => self.handle_filter_key(key),
            Mode::Grid => self.handle_grid_key(key),
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.mode = Mode::Help,
            KeyCode::Char('f') | KeyCode::Char('/') => self.mode = Mode::Filter,
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear_filters()
            }
            KeyCode::Enter => self.apply_filters(),
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => {
                let last = self.view.page_row_count().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(last);
            }
            KeyCode::Left | KeyCode::PageUp => {
                self.view.prev_page();
                self.clamp_cursor();
            }
            KeyCode::Right | KeyCode::PageDown => {
                self.view.next_page();
                self.clamp_cursor();
            }
            KeyCode::Char('g') => {
                self.view.first_page();
                self.clamp_cursor();
            }
            KeyCode::Char('G') => {
                self.view.last_page();
                self.clamp_cursor();
            }
            KeyCode::Char(' ') => self.toggle_selection(),
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.restore_fields();
                self.mode = Mode::Grid;
            }
            KeyCode::Enter => self.apply_filters(),
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % self.fields.len(),
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.fields.len() - 1) % self.fields.len()
            }
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear_filters()
            }
            _ => self.fields[self.focus].handle_key(key),
        }
    }

    /// Consume the six inputs as one constraint set and recompute the view
    /// wholesale. Bad input leaves the view untouched and names the field.
    fn apply_filters(&mut self) {
        let input = self.collect_input();
        match input.parse() {
            Ok(filters) => {
                self.view = self.view.apply_filters(&filters);
                self.applied = input;
                self.cursor = 0;
                self.prune_selection();
                self.mode = Mode::Grid;
                self.status = if filters.is_empty() {
                    format!("No filters active - {} rows", self.view.row_count())
                } else {
                    format!(
                        "{} of {} rows match",
                        self.view.row_count(),
                        self.view.source_count()
                    )
                };
                info!(target: "filter", "applied: {}", self.status);
            }
            Err(err) => {
                self.status = format!("Filter error: {}", err);
                warn!(target: "filter", "rejected input: {}", err);
            }
        }
    }

    fn clear_filters(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
        self.apply_filters();
    }

    fn collect_input(&self) -> FilterInput {
        FilterInput {
            date_start: self.fields[0].value().to_string(),
            date_end: self.fields[1].value().to_string(),
            revenue_min: self.fields[2].value().to_string(),
            revenue_max: self.fields[3].value().to_string(),
            net_income_min: self.fields[4].value().to_string(),
            net_income_max: self.fields[5].value().to_string(),
        }
    }

    fn restore_fields(&mut self) {
        let applied = self.applied.clone();
        self.fields[0].set_value(applied.date_start);
        self.fields[1].set_value(applied.date_end);
        self.fields[2].set_value(applied.revenue_min);
        self.fields[3].set_value(applied.revenue_max);
        self.fields[4].set_value(applied.net_income_min);
        self.fields[5].set_value(applied.net_income_max);
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self
            .cursor
            .min(self.view.page_row_count().saturating_sub(1));
    }

    fn toggle_selection(&mut self) {
        let index = self.view.page() * self.view.page_size() + self.cursor;
        if let Some(record) = self.view.get_record(index) {
            let id = record.id;
            if !self.selection.remove(&id) {
                self.selection.insert(id);
            }
        }
    }

    /// Drop selected ids that the current filters no longer show, so a
    /// narrowed view cannot export invisible rows.
    fn prune_selection(&mut self) {
        let view = &self.view;
        self.selection.retain(|&id| view.contains_id(id));
    }

    fn export(&mut self) {
        let dir = match &self.config.behavior.export_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };
        match StatementExporter::export_csv(&self.view, &self.selection, &dir) {
            Ok(message) => self.status = message,
            Err(err) => {
                self.status = format!("Export failed: {}", err);
                warn!(target: "export", "{}", err);
            }
        }
    }

    fn ui(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(f.area());

        let date_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[0]);
        let numeric_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25); 4])
            .split(chunks[1]);

        for (i, field) in self.fields.iter().enumerate() {
            let area = if i < 2 { date_row[i] } else { numeric_row[i - 2] };
            field.render(f, area, self.mode == Mode::Filter && self.focus == i);
        }

        render_grid(
            f,
            chunks[2],
            &GridContext {
                view: &self.view,
                selection: &self.selection,
                cursor: self.cursor,
                show_row_numbers: self.config.display.show_row_numbers,
                ticker: &self.ticker,
            },
        );

        self.render_status(f, chunks[3]);

        if self.mode == Mode::Help {
            HelpWidget::render(f, f.area());
        }
    }

    fn render_status(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let (tag, tag_color) = match self.mode {
            Mode::Filter => ("FILTER", Color::Yellow),
            Mode::Grid => ("GRID", Color::Cyan),
            Mode::Help => ("HELP", Color::Green),
        };

        let selected = if self.selection.is_empty() {
            String::new()
        } else {
            format!(" | {} selected", self.selection.len())
        };

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", tag),
                Style::default().fg(tag_color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::raw(self.status.as_str()),
            Span::styled(selected, Style::default().fg(Color::Green)),
        ]);

        f.render_widget(Paragraph::new(line), area);
    }
}

/// Run the grid TUI over an already fetched record set.
///
/// A fetch failure still enters the TUI: the grid is empty and the status
/// line says why, instead of the error disappearing into a log nobody reads.
pub fn run_tui(
    config: Config,
    ticker: String,
    records: Vec<StatementRecord>,
    fetch_error: Option<String>,
) -> Result<()> {
    let mut app = App::new(config, ticker, records, fetch_error);

    if let Err(e) = enable_raw_mode() {
        return Err(anyhow::anyhow!(
            "Failed to enable raw mode: {}. Try running with --classic.",
            e
        ));
    }

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(anyhow::anyhow!(
            "Failed to setup terminal: {}. Try running with --classic.",
            e
        ));
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            let _ = disable_raw_mode();
            return Err(anyhow::anyhow!("Failed to create terminal: {}", e));
        }
    };

    let res = run_app(&mut app, &mut terminal);

    // Always restore the terminal, even on error.
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}

fn run_app<B: Backend>(app: &mut App, terminal: &mut Terminal<B>) -> Result<()> {
    loop {
        terminal.draw(|f| app.ui(f))?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
}
