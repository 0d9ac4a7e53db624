//! Terminal price charts.
//!
//! Charts are drawn with ratatui's [`Chart`] widget into an off-screen
//! [`Buffer`] and returned as plain text, so they can be printed by the menu
//! or inspected in tests without a live terminal.

use crate::error::{CoinwatchError, Result};
use crate::models::{DailyAverage, PriceRecord};
use chrono::{DateTime, NaiveDateTime, NaiveTime};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget};

/// How consecutive points are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    /// Straight segments between points.
    Line,
    /// Vertical jump at the previous point, then flat to the next one.
    Step,
}

/// A labelled price series ready for rendering.
#[derive(Debug, Clone)]
pub struct PriceChart {
    pub title: String,
    pub points: Vec<(NaiveDateTime, f64)>,
    pub style: ChartStyle,
    label_format: &'static str,
}

impl PriceChart {
    pub fn new(title: impl Into<String>, points: Vec<(NaiveDateTime, f64)>, style: ChartStyle) -> Self {
        Self {
            title: title.into(),
            points,
            style,
            label_format: "%Y-%m-%d %H:%M",
        }
    }

    /// Observations from the price history, sorted by date and time.
    pub fn from_history(title: impl Into<String>, records: &[PriceRecord]) -> Self {
        let mut points: Vec<(NaiveDateTime, f64)> =
            records.iter().map(|r| (r.timestamp(), r.price_usd)).collect();
        points.sort_by(|a, b| a.0.cmp(&b.0));
        Self::new(title, points, ChartStyle::Line)
    }

    /// A daily-average series drawn as steps, labelled by date.
    pub fn from_daily(title: impl Into<String>, series: &[DailyAverage]) -> Self {
        let points = series
            .iter()
            .map(|d| (d.date.and_time(NaiveTime::default()), d.price))
            .collect();
        Self {
            label_format: "%Y-%m-%d",
            ..Self::new(title, points, ChartStyle::Step)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn xy(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|(ts, price)| (ts.and_utc().timestamp() as f64, *price))
            .collect()
    }

    fn line_points(&self, xy: &[(f64, f64)]) -> Vec<(f64, f64)> {
        match self.style {
            ChartStyle::Line => xy.to_vec(),
            ChartStyle::Step => {
                let mut out = Vec::with_capacity(xy.len() * 2);
                for (i, &(x, y)) in xy.iter().enumerate() {
                    if i > 0 {
                        out.push((xy[i - 1].0, y));
                    }
                    out.push((x, y));
                }
                out
            }
        }
    }

    fn x_label(&self, x: f64) -> String {
        DateTime::from_timestamp(x as i64, 0)
            .map(|dt| dt.naive_utc().format(self.label_format).to_string())
            .unwrap_or_default()
    }

    fn draw(&self, area: Rect, buf: &mut Buffer) -> Result<()> {
        if self.is_empty() {
            return Err(CoinwatchError::EmptySeries(self.title.clone()));
        }
        let xy = self.xy();
        let line = self.line_points(&xy);
        let (x_bounds, y_bounds) = bounds(&xy);

        let x_mid = (x_bounds[0] + x_bounds[1]) / 2.0;
        let x_labels = vec![
            Span::raw(self.x_label(x_bounds[0])),
            Span::raw(self.x_label(x_mid)),
            Span::raw(self.x_label(x_bounds[1])),
        ];
        let y_mid = (y_bounds[0] + y_bounds[1]) / 2.0;
        let y_labels = vec![
            Span::raw(format_price(y_bounds[0])),
            Span::raw(format_price(y_mid)),
            Span::raw(format_price(y_bounds[1])),
        ];

        let datasets = vec![
            Dataset::default()
                .name("Price (USD)")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(&line),
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Blue))
                .data(&xy),
        ];

        Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.title)),
            )
            .x_axis(
                Axis::default()
                    .title("Date")
                    .style(Style::default().fg(Color::Gray))
                    .bounds(x_bounds)
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title("Price (USD)")
                    .style(Style::default().fg(Color::Gray))
                    .bounds(y_bounds)
                    .labels(y_labels),
            )
            .render(area, buf);
        Ok(())
    }
}

/// Render one chart as `height` lines of at most `width` columns.
pub fn render(chart: &PriceChart, width: u16, height: u16) -> Result<String> {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    chart.draw(area, &mut buf)?;
    Ok(buffer_to_string(&buf))
}

/// Render several charts side by side, `columns` per row.
pub fn render_grid(
    charts: &[PriceChart],
    columns: usize,
    cell_width: u16,
    cell_height: u16,
) -> Result<String> {
    if charts.is_empty() {
        return Err(CoinwatchError::NoData("no charts to lay out".into()));
    }
    let cols = columns.clamp(1, charts.len());
    let rows = charts.len().div_ceil(cols);
    let area = Rect::new(
        0,
        0,
        cell_width.saturating_mul(cols as u16),
        cell_height.saturating_mul(rows as u16),
    );
    let mut buf = Buffer::empty(area);

    let row_areas = Layout::vertical(vec![Constraint::Length(cell_height); rows]).split(area);
    for (row, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::horizontal(vec![Constraint::Length(cell_width); cols]).split(*row_area);
        for (col, cell) in cells.iter().enumerate() {
            if let Some(chart) = charts.get(row * cols + col) {
                chart.draw(*cell, &mut buf)?;
            }
        }
    }
    Ok(buffer_to_string(&buf))
}

fn bounds(xy: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in xy {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if x_min == x_max {
        x_min -= 43_200.0;
        x_max += 43_200.0;
    }
    let pad = if y_min == y_max {
        (y_min.abs() * 0.02).max(1e-6)
    } else {
        (y_max - y_min) * 0.05
    };
    ([x_min, x_max], [y_min - pad, y_max + pad])
}

fn format_price(value: f64) -> String {
    if value.abs() >= 100.0 {
        format!("{value:.0}")
    } else if value.abs() >= 1.0 {
        format!("{value:.2}")
    } else {
        format!("{value:.6}")
    }
}

fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut lines = Vec::with_capacity(area.height as usize);
    for y in area.top()..area.bottom() {
        let mut line = String::with_capacity(area.width as usize);
        for x in area.left()..area.right() {
            line.push_str(buf[(x, y)].symbol());
        }
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}
