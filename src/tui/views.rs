//! TUI Views
//!
//! One screen: scrolling output on top, the input line below it and a status
//! bar at the bottom.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::colors;
use super::state::{AppState, LoopSummary};
use crate::display::LineColor;

/// Render the whole screen
pub fn render(state: &AppState, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3), Constraint::Length(1)])
        .split(frame.area());

    render_output(state, frame, chunks[0]);
    render_input(state, frame, chunks[1]);
    render_status(state, frame, chunks[2]);
}

/// The slice of output that fits in `height` rows, honoring the scroll offset
fn visible_output(state: &AppState, height: usize) -> &[(String, LineColor)] {
    let end = state.output.len().saturating_sub(state.scroll);
    let start = end.saturating_sub(height);
    &state.output[start..end]
}

fn render_output(state: &AppState, frame: &mut Frame, area: Rect) {
    let height = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = visible_output(state, height)
        .iter()
        .map(|(text, color)| ListItem::new(Line::from(text.as_str())).style(Style::default().fg(colors::line(*color))))
        .collect();

    let title = if state.scroll > 0 {
        format!(" Output (↑{}) ", state.scroll)
    } else {
        " Output ".to_string()
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn render_input(state: &AppState, frame: &mut Frame, area: Rect) {
    let input = Paragraph::new(state.input.as_str())
        .style(Style::default().fg(colors::line(state.input_color)))
        .block(Block::default().borders(Borders::ALL).title(" Command "));
    frame.render_widget(input, area);

    let cursor_x = area.x + 1 + state.input.chars().count() as u16;
    frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
}

fn format_loop(summary: &LoopSummary) -> Span<'static> {
    let style = Style::default().fg(colors::loop_state(summary.state));
    Span::styled(
        format!("{} {}@{} #{} ", summary.name, summary.state, summary.rate, summary.ticks),
        style,
    )
}

fn render_status(state: &AppState, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(
            format!(" font {} ", state.font_size),
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("│ {} │ ", state.loop_counts_string()), Style::default().fg(colors::DIM)),
    ];
    spans.extend(state.loops.iter().map(format_loop));
    spans.push(Span::styled("│ Esc quit  PgUp/PgDn scroll", Style::default().fg(colors::KEYBIND)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
