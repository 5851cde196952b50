//! TUI rendering.
//!
//! ┌──────────────────────────────────────────────┐
//! │  🏭 Kilnwatch    tick #42   score 88.1/100   │
//! ├──────────────────────────────────────────────┤
//! │  1 Overview │ 2 Alternative Fuels │ 3 ...    │
//! ├──────────────────────────────────────────────┤
//! │  overview: gauges │ performance, focus areas │
//! │                   │ alerts                   │
//! ├──────────────────────────────────────────────┤
//! │  section tab:                                │
//! │  ┌ TSR ────────┐ ┌ Carbon footprint ──────┐  │
//! │  │████░░ 62.9% │ │██████████░ 91.5%       │  │
//! │  └─────────────┘ └────────────────────────┘  │
//! │  ▇ ▇ ▅ ▃ ▂ ▂   fuel share (%)                │
//! ├──────────────────────────────────────────────┤
//! │  ←→ section   1-5 jump   o optimize   q quit │
//! └──────────────────────────────────────────────┘

use super::app::{App, Section};
use crate::commands::{format_progress, format_value};
use kilnwatch_core::{
    FocusArea, MetricView, OptimizationArea, PerformanceSummary, SeriesKind, SeriesRecord, Status,
    classify,
};
use ratatui::{prelude::*, widgets::*};

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(3), // tabs
            Constraint::Min(10),   // main
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    let snapshot = app.snapshot();
    draw_title(f, rows[0], app, snapshot.tick, snapshot.overall_score);
    draw_tabs(f, rows[1], app.section());
    match app.section() {
        Section::Overview => draw_overview(f, rows[2], app, &snapshot.metrics),
        section => draw_section(f, rows[2], app, section, &snapshot.metrics),
    }
    draw_keys(f, rows[3], app.message());
}

fn draw_title(f: &mut Frame, area: Rect, app: &App, tick: u64, score: f64) {
    let period = app.tick_period().as_millis();
    let live = if app.is_mounted() { " ●" } else { "" };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" 🏭 Kilnwatch ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("  plant score: "),
            Span::styled(
                format!("{score:.1}/100"),
                Style::default()
                    .bold()
                    .fg(status_color(Status::from_progress(score))),
            ),
            Span::styled(
                format!("  tick #{tick}  every {period}ms{live} "),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

    f.render_widget(block, area);
}

fn draw_tabs(f: &mut Frame, area: Rect, selected: Section) {
    let titles: Vec<Line> = Section::ALL
        .iter()
        .map(|s| Line::from(format!(" {} {} ", s.index() + 1, s.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(selected.index())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().bold().fg(Color::Yellow))
        .divider("│");
    f.render_widget(tabs, area);
}

fn draw_overview(f: &mut Frame, area: Rect, app: &App, metrics: &[MetricView]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Vertical)
        .constraints(metrics.iter().map(|_| Constraint::Length(3)))
        .split(cols[0]);
    for (m, slot) in metrics.iter().zip(cards.iter()) {
        draw_gauge(f, *slot, m);
    }

    let panels = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(OptimizationArea::ALL.len() as u16 + 2),
            Constraint::Length(2 * OptimizationArea::ALL.len() as u16 + 2),
            Constraint::Min(3),
        ])
        .split(cols[1]);
    draw_performance(f, panels[0], &app.performance());
    draw_focus_areas(f, panels[1], &app.focus_areas());
    draw_alerts(f, panels[2], app);
}

fn draw_performance(f: &mut Frame, area: Rect, summary: &PerformanceSummary) {
    let lines: Vec<Line> = summary
        .categories
        .iter()
        .map(|(a, c)| {
            let color = status_color(Status::from_progress(c.score));
            Line::from(vec![
                Span::styled(format!("{} ", c.trend.symbol()), Style::default().fg(color)),
                Span::raw(format!("{:<18}", a.title())),
                Span::styled(format!("{:>5.1}", c.score), Style::default().fg(color).bold()),
                Span::styled(
                    format!("  weakest: {}", c.key_metric),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Performance {:.1} ", summary.overall_score));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_focus_areas(f: &mut Frame, area: Rect, focus: &[FocusArea]) {
    let mut lines = Vec::with_capacity(focus.len() * 2);
    for fa in focus {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>4.1} ", fa.priority_score),
                Style::default().fg(Color::Yellow).bold(),
            ),
            Span::raw(fa.name),
            Span::styled(
                format!("  {:.1}", fa.score),
                Style::default().fg(status_color(Status::from_progress(fa.score))),
            ),
        ]));
        if let Some(top) = fa.recommendations.first() {
            lines.push(Line::from(Span::styled(
                format!("     {} ({})", top.title, top.estimated_impact),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    let block = Block::default().borders(Borders::ALL).title(" Focus areas ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_section(f: &mut Frame, area: Rect, app: &App, section: Section, metrics: &[MetricView]) {
    let wanted = section.metric_names();
    let mut cards: Vec<&MetricView> = metrics
        .iter()
        .filter(|m| wanted.contains(&m.name.as_str()))
        .collect();
    // Custom profiles may not carry the default metric names.
    if cards.is_empty() {
        cards = metrics.iter().collect();
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(area);

    let n = cards.len().max(1) as u32;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(cards.iter().map(|_| Constraint::Ratio(1, n)))
        .split(rows[0]);
    for (m, slot) in cards.iter().zip(cols.iter()) {
        draw_gauge(f, *slot, m);
    }

    if let Some(kind) = section.series() {
        match kind {
            SeriesKind::FuelMix | SeriesKind::CrossProcess => {
                draw_bars(f, rows[1], kind, app.series());
            }
            SeriesKind::EnergyProfile | SeriesKind::QualityTrend => {
                draw_line(f, rows[1], kind, app.series());
            }
        }
    }
}

fn draw_gauge(f: &mut Frame, area: Rect, m: &MetricView) {
    let color = status_color(m.status);
    let label = format!(
        "{} {} / {}  {}  {} {}",
        format_value(m.current, &m.unit),
        m.trend.symbol(),
        format_value(m.target, &m.unit),
        format_progress(m.progress),
        m.status.style().symbol,
        m.status.label(),
    );
    let title = if m.simulated {
        format!(" {} ", m.label)
    } else {
        format!(" {} (static) ", m.label)
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(gauge_ratio(m.progress))
        .label(label);
    f.render_widget(gauge, area);
}

fn draw_alerts(f: &mut Frame, area: Rect, app: &App) {
    let alerts = app.alerts();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Alerts ({}) ", alerts.len()));

    if alerts.is_empty() {
        let p = Paragraph::new("All metrics at good or optimal")
            .style(Style::default().fg(status_color(Status::Optimal)))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let items: Vec<ListItem> = alerts
        .iter()
        .map(|a| {
            let color = status_color(a.severity);
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", a.severity.style().symbol),
                    Style::default().fg(color).bold(),
                ),
                Span::raw(a.message.clone()),
            ]))
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

fn draw_bars(f: &mut Frame, area: Rect, kind: SeriesKind, records: &[SeriesRecord]) {
    let Some(field) = kind.fields().first() else {
        return;
    };
    let bars: Vec<Bar> = records
        .iter()
        .map(|r| {
            let v = r.value(field.name).unwrap_or_default();
            let color = match kind {
                SeriesKind::CrossProcess => status_color(classify(v, 100.0)),
                _ => Color::Cyan,
            };
            Bar::default()
                .value(v.round().max(0.0) as u64)
                .text_value(format!("{v:.1}"))
                .label(Line::from(r.label.clone()))
                .style(Style::default().fg(color))
        })
        .collect();

    let peak = records
        .iter()
        .filter_map(|r| r.value(field.name))
        .fold(field.max, f64::max);
    let n = records.len().max(1) as u16;
    let bar_width = (area.width.saturating_sub(2) / n).saturating_sub(1).max(3);
    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(series_title(kind, records)),
        )
        .bar_width(bar_width)
        .bar_gap(1)
        .max(peak.ceil() as u64)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

fn draw_line(f: &mut Frame, area: Rect, kind: SeriesKind, records: &[SeriesRecord]) {
    let Some(field) = kind.fields().first() else {
        return;
    };
    let data: Vec<(f64, f64)> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (i as f64, r.value(field.name).unwrap_or(field.min)))
        .collect();

    let datasets = vec![
        Dataset::default()
            .name(field.name)
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&data),
    ];

    let x_max = (records.len().saturating_sub(1) as f64).max(1.0);
    let first = records.first().map(|r| r.label.as_str()).unwrap_or("");
    let last = records.last().map(|r| r.label.as_str()).unwrap_or("");

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(series_title(kind, records)),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![Line::from(first.to_string()), Line::from(last.to_string())]),
        )
        .y_axis(Axis::default().bounds([field.min, field.max]).labels(vec![
            Line::from(format!("{:.1}", field.min)),
            Line::from(format!("{:.1} {}", field.max, field.unit)),
        ]));
    f.render_widget(chart, area);
}

/// Chart title with the mean of every field.
fn series_title(kind: SeriesKind, records: &[SeriesRecord]) -> String {
    let mut title = format!(" {} ", kind.title());
    if records.is_empty() {
        return title;
    }
    for field in kind.fields() {
        let sum: f64 = records.iter().filter_map(|r| r.value(field.name)).sum();
        let mean = sum / records.len() as f64;
        title.push_str(&format!(" {} {:.1}{} ", field.name, mean, field.unit));
    }
    title
}

fn draw_keys(f: &mut Frame, area: Rect, message: Option<&str>) {
    let bar = match message {
        Some(msg) => Paragraph::new(format!(" {msg}"))
            .style(Style::default().bg(Color::Yellow).fg(Color::Black)),
        None => Paragraph::new(
            " ←→/tab section   1-5 jump   o: optimize   r: refresh charts   q: quit",
        )
        .style(Style::default().bg(Color::DarkGray).fg(Color::White)),
    };
    f.render_widget(bar, area);
}

/// Status colour from its `#rrggbb` style entry.
pub fn status_color(status: Status) -> Color {
    parse_hex(status.style().color).unwrap_or(Color::White)
}

fn parse_hex(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Gauge fill for a progress percentage, in `[0, 1]`.
pub fn gauge_ratio(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        (progress / 100.0).clamp(0.0, 1.0)
    }
}
