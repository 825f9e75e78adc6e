use crossterm::event::{Event, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

/// A single bordered filter input (one bound of the constraint set).
///
/// Unlike a live search box there is no debouncing here: the constraint set
/// is only consumed on an explicit apply, so the field just accumulates text.
pub struct FilterField {
    input: Input,
    title: String,
}

impl FilterField {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            title: title.into(),
        }
    }

    /// Current text, exactly as typed.
    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Replace the text (used when restoring the last applied input).
    pub fn set_value(&mut self, value: String) {
        self.input = Input::default().with_value(value);
    }

    pub fn clear(&mut self) {
        self.input.reset();
    }

    /// Let tui_input handle the key (char input, backspace, arrows, etc.).
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.input.handle_event(&Event::Key(key));
    }

    pub fn render(&self, f: &mut Frame, area: Rect, focused: bool) {
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let width = area.width.saturating_sub(2) as usize;
        let scroll = self.input.visual_scroll(width);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title.as_str())
            .border_style(style);

        let input_widget = Paragraph::new(self.input.value())
            .block(block)
            .scroll((0, scroll as u16));

        f.render_widget(input_widget, area);

        if focused {
            let cursor_x = self.input.visual_cursor().saturating_sub(scroll) as u16;
            f.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
        }
    }
}
