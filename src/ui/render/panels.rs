use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::{Backend, Frame, text},
    style::Color,
    text::Span,
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::model::UiData;

use super::formatting::{format_ms, format_percent, format_rate};
use super::theme::{
    ACCENT_LATENCY_RGB, ACCENT_PROGRESS_RGB, ACCENT_RATE_RGB, PANEL_COLUMN_WIDTH,
    error_rate_color, panel_block_style, panel_border_style, panel_title_style, rgb, value_style,
};

/// Four metric tiles: total requests, requests/s, average response time and
/// error rate.
pub(super) fn render_panels<B: Backend>(f: &mut Frame<'_, B>, data: &UiData, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(PANEL_COLUMN_WIDTH),
            Constraint::Percentage(PANEL_COLUMN_WIDTH),
            Constraint::Percentage(PANEL_COLUMN_WIDTH),
            Constraint::Percentage(PANEL_COLUMN_WIDTH),
        ])
        .split(area);

    let (total_chunk, rate_chunk, latency_chunk, error_chunk) = match columns.as_ref() {
        [a, b, c, d] => (a, b, c, d),
        _ => return,
    };

    let stats = &data.statistics;
    let tiles = [
        (
            "Total Requests",
            stats.total_requests.to_string(),
            rgb(ACCENT_PROGRESS_RGB),
            *total_chunk,
        ),
        (
            "Requests/s",
            format_rate(stats.requests_per_second),
            rgb(ACCENT_RATE_RGB),
            *rate_chunk,
        ),
        (
            "Avg Response Time",
            format_ms(stats.avg_response_time),
            rgb(ACCENT_LATENCY_RGB),
            *latency_chunk,
        ),
        (
            "Error Rate",
            format_percent(stats.error_rate),
            error_rate_color(stats.error_rate),
            *error_chunk,
        ),
    ];

    for (title, value, color, chunk) in tiles {
        f.render_widget(metric_tile(data.no_color, title, value, color), chunk);
    }
}

fn metric_tile(no_color: bool, title: &'static str, value: String, color: Color) -> Paragraph<'static> {
    Paragraph::new(text::Line::from(Span::styled(value, value_style(no_color, color))))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .style(panel_block_style(no_color))
                .border_style(panel_border_style(no_color))
                .title_style(panel_title_style(no_color)),
        )
}
