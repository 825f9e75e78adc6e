use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const KEYS: &[(&str, &str)] = &[
    ("f or /", "edit filters"),
    ("Tab / Shift+Tab", "next / previous filter field"),
    ("Enter", "apply filters"),
    ("Esc", "leave filter editing without applying"),
    ("Ctrl+L", "clear all filters"),
    ("Up / Down", "move row cursor"),
    ("Left / Right", "previous / next page"),
    ("g / G", "first / last page"),
    ("Space", "toggle row selection"),
    ("e", "export visible (or selected) rows to CSV"),
    ("?", "toggle this help"),
    ("q", "quit"),
];

/// Key-reference overlay drawn on top of the grid.
pub struct HelpWidget;

impl HelpWidget {
    pub fn render(f: &mut Frame, area: Rect) {
        let popup = centered_rect(48, (KEYS.len() + 4) as u16, area);

        let mut lines: Vec<Line> = vec![Line::from("")];
        for (key, action) in KEYS {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<16}", key),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(*action),
            ]));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .border_style(Style::default().fg(Color::Cyan));

        f.render_widget(Clear, popup);
        f.render_widget(Paragraph::new(lines).block(block), popup);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
