use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::{Backend, Frame},
    widgets::{Block, Borders, Gauge},
};

use crate::metrics::Termination;
use crate::ui::model::UiData;

use super::charts::render_charts;
use super::panels::render_panels;
use super::theme::{
    ACCENT_GREEN_RGB, ACCENT_PROGRESS_RGB, ACCENT_RED_RGB, CHART_MIN_HEIGHT, HEADER_HEIGHT,
    PANEL_HEIGHT, UI_MARGIN, app_background_style, panel_block_style, panel_border_style,
    panel_title_style, rgb, style_color,
};

pub fn draw_frame<B: Backend>(f: &mut Frame<'_, B>, data: &UiData) {
    let size = f.size();
    f.render_widget(
        Block::default().style(app_background_style(data.no_color)),
        size,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(UI_MARGIN)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(PANEL_HEIGHT),
            Constraint::Min(CHART_MIN_HEIGHT),
        ])
        .split(size);

    let (header_chunk, panel_chunk, chart_chunk) = match chunks.as_ref() {
        [a, b, c] => (a, b, c),
        _ => return,
    };

    render_header(f, data, *header_chunk);
    render_panels(f, data, *panel_chunk);
    render_charts(f, data, *chart_chunk);
}

fn render_header<B: Backend>(f: &mut Frame<'_, B>, data: &UiData, area: Rect) {
    let (label, color) = match data.termination {
        None => (
            format!(
                "{} / {} requests  (q to stop)",
                data.statistics.total_requests, data.requested
            ),
            rgb(ACCENT_PROGRESS_RGB),
        ),
        Some(Termination::Completed) => (
            format!("Completed {} requests", data.statistics.total_requests),
            rgb(ACCENT_GREEN_RGB),
        ),
        Some(Termination::Aborted(reason)) => (
            format!(
                "Aborted after {} requests: {}",
                data.statistics.total_requests, reason
            ),
            rgb(ACCENT_RED_RGB),
        ),
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(format!("apiprobe | {}", data.target))
                .borders(Borders::ALL)
                .style(panel_block_style(data.no_color))
                .border_style(panel_border_style(data.no_color))
                .title_style(panel_title_style(data.no_color)),
        )
        .gauge_style(style_color(data.no_color, color))
        .ratio(data.progress())
        .label(label);
    f.render_widget(gauge, area);
}
