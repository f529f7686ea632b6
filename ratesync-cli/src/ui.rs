use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Terminal,
};

use crate::controls::{status_text, SimulationView};

pub fn draw_simulation(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    view: &SimulationView,
    log_lines: &[String],
) {
    // Render the controls, status, chart and log panels.
    let _ = terminal.draw(|f| {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(10),
                Constraint::Length(6),
            ])
            .split(f.size());

        let controls = Paragraph::new(
            "+/- gain  [/] measured display  c/C clamp  r reset  q quit",
        )
        .style(Style::default().fg(Color::Blue))
        .block(Block::default().borders(Borders::ALL).title("Controls"));
        f.render_widget(controls, chunks[0]);

        let status_color = if view.equilibrium.reachable {
            Color::Green
        } else {
            Color::Red
        };
        let status = Paragraph::new(status_text(view))
            .style(
                Style::default()
                    .fg(status_color)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL).title("Rate control"));
        f.render_widget(status, chunks[1]);

        let frames = view.fill_points.len().max(1) as f64;
        let target = [(0.0, 50.0), (frames, 50.0)];
        let datasets = vec![
            Dataset::default()
                .name("target")
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::DarkGray))
                .data(&target),
            Dataset::default()
                .name("fill %")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(&view.fill_points),
        ];
        let chart = Chart::new(datasets)
            .block(Block::default().borders(Borders::ALL).title("Buffer fill"))
            .x_axis(
                Axis::default()
                    .title("frame")
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, frames])
                    .labels(vec![
                        Span::raw("0"),
                        Span::raw(format!("{}", (frames / 2.0) as usize)),
                        Span::raw(format!("{}", frames as usize)),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("fill %")
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, 100.0])
                    .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")]),
            );
        f.render_widget(chart, chunks[2]);

        let log_height = chunks[3].height.saturating_sub(2) as usize;
        let start = log_lines.len().saturating_sub(log_height);
        let log_text = if log_lines.is_empty() {
            "No logs yet.".to_string()
        } else {
            log_lines[start..].join("\n")
        };

        let log_widget = Paragraph::new(log_text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Logs"));
        f.render_widget(log_widget, chunks[3]);
    });
}
