use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, Paragraph},
    Terminal,
};

use crate::controls::StatusSnapshot;

pub fn draw_status(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    status: &StatusSnapshot,
    log_lines: &[String],
) {
    // Render the controls + status panels.
    let _ = terminal.draw(|f| {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(f.size());

        let title = Paragraph::new("Chime").style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        f.render_widget(title, chunks[0]);

        let controls = Paragraph::new("space=play/pause  m=mute  ←/→=seek 5%  q=quit")
            .style(Style::default().fg(Color::Blue))
            .block(Block::default().borders(Borders::ALL).title("Controls"));
        f.render_widget(controls, chunks[1]);

        let status_widget = Paragraph::new(status.text.as_str())
            .style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL).title("Playback"));
        f.render_widget(status_widget, chunks[2]);

        let slider = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Seek"))
            .gauge_style(Style::default().fg(Color::Magenta))
            .ratio(status.progress_ratio)
            .label(format!("{:.0}%", status.progress_ratio * 100.0));
        f.render_widget(slider, chunks[3]);

        let log_height = chunks[4].height.saturating_sub(2) as usize;
        let start = log_lines.len().saturating_sub(log_height);
        let log_text = if log_lines.is_empty() {
            "No logs yet.".to_string()
        } else {
            log_lines[start..].join("\n")
        };

        let log_widget = Paragraph::new(log_text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Logs"));
        f.render_widget(log_widget, chunks[4]);
    });
}
