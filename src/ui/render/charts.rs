use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::{Backend, Frame},
    text::Span,
    widgets::{Axis, BarChart, Block, Borders, Chart, Dataset, GraphType},
};

use crate::ui::model::UiData;

use super::theme::{
    ACCENT_DATA_RGB, ACCENT_LATENCY_RGB, BAR_CHART_WIDTH, HISTOGRAM_BUCKETS, LINE_CHART_WIDTH,
    axis_style, panel_block_style, panel_border_style, panel_title_style, rgb, style_color,
};

const MIN_Y_MAX_MS: f64 = 10.0;
const Y_HEADROOM: f64 = 1.1;

pub(super) fn render_charts<B: Backend>(f: &mut Frame<'_, B>, data: &UiData, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(LINE_CHART_WIDTH),
            Constraint::Percentage(BAR_CHART_WIDTH),
        ])
        .split(area);

    let (line_chunk, bar_chunk) = match columns.as_ref() {
        [a, b] => (a, b),
        _ => return,
    };

    render_latency_over_time(f, data, *line_chunk);
    render_latency_distribution(f, data, *bar_chunk);
}

fn render_latency_over_time<B: Backend>(f: &mut Frame<'_, B>, data: &UiData, area: Rect) {
    let points: Vec<(f64, f64)> = data
        .latencies
        .iter()
        .map(|(index, ms)| (*index as f64, *ms))
        .collect();
    let x_max = (data.requested.saturating_sub(1) as f64).max(1.0);
    let y_max = points
        .iter()
        .map(|(_, ms)| *ms)
        .fold(MIN_Y_MAX_MS, f64::max)
        * Y_HEADROOM;

    let datasets = vec![
        Dataset::default()
            .name("Response time")
            .graph_type(GraphType::Line)
            .style(style_color(data.no_color, rgb(ACCENT_LATENCY_RGB)))
            .data(&points),
    ];

    let chart = Chart::new(datasets)
        .style(panel_block_style(data.no_color))
        .block(
            Block::default()
                .title("Response Time Over Time")
                .borders(Borders::ALL)
                .style(panel_block_style(data.no_color))
                .border_style(panel_border_style(data.no_color))
                .title_style(panel_title_style(data.no_color)),
        )
        .x_axis(
            Axis::default()
                .title("Request")
                .style(axis_style(data.no_color))
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::from("0"),
                    Span::from(format!("{:.0}", x_max / 2.0)),
                    Span::from(format!("{:.0}", x_max)),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("ms")
                .style(axis_style(data.no_color))
                .bounds([0.0, y_max])
                .labels_alignment(Alignment::Center)
                .labels(vec![
                    Span::from("0"),
                    Span::from(format!("{:.0}", y_max / 2.0)),
                    Span::from(format!("{:.0}", y_max)),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_latency_distribution<B: Backend>(f: &mut Frame<'_, B>, data: &UiData, area: Rect) {
    let buckets = data.latency_buckets(HISTOGRAM_BUCKETS);
    let bars: Vec<(&str, u64)> = buckets
        .iter()
        .map(|bucket| (bucket.label.as_str(), bucket.count))
        .collect();
    let inner_width = area.width.saturating_sub(2);
    let slots = u16::try_from(HISTOGRAM_BUCKETS).unwrap_or(u16::MAX);
    let bar_width = (inner_width / slots.max(1)).saturating_sub(1).max(1);

    let chart = BarChart::default()
        .block(
            Block::default()
                .title("Response Time Distribution (ms)")
                .borders(Borders::ALL)
                .style(panel_block_style(data.no_color))
                .border_style(panel_border_style(data.no_color))
                .title_style(panel_title_style(data.no_color)),
        )
        .data(&bars)
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(style_color(data.no_color, rgb(ACCENT_DATA_RGB)))
        .value_style(axis_style(data.no_color))
        .label_style(axis_style(data.no_color));

    f.render_widget(chart, area);
}
