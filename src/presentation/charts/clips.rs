// Clips chart - recorded vs validated hours as two smoothed lines
use crate::application::chart_variant::ChartVariant;
use crate::application::stats_repository::StatsRepository;
use crate::domain::curve::smooth;
use crate::domain::format::format_seconds;
use crate::domain::geometry::{fmt_px, CoordinateMapper, Point, PLOT_STROKE_WIDTH};
use crate::domain::stats::{ClipStat, RenderState};
use crate::presentation::markup::escape;
use futures::future::BoxFuture;

const TICK_COUNT: usize = 7;
const CIRCLE_RADIUS: f64 = 8.0;

pub struct ClipsChart;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribute {
    Total,
    Valid,
}

impl Attribute {
    fn value(self, stat: &ClipStat) -> f64 {
        match self {
            Attribute::Total => stat.total,
            Attribute::Valid => stat.valid,
        }
    }

    fn class(self) -> &'static str {
        match self {
            Attribute::Total => "total",
            Attribute::Valid => "valid",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Attribute::Total => "Hours recorded",
            Attribute::Valid => "Hours validated",
        }
    }
}

fn render_metric(state: &RenderState<ClipStat>, attribute: Attribute) -> String {
    let value = state
        .latest()
        .map(|stat| format_seconds(attribute.value(stat)))
        .unwrap_or_else(|| "?".to_string());

    format!(
        r#"<div class="metric {class}"><div class="label">{}</div><div class="value"><div class="point">●</div>{}</div></div>"#,
        attribute.label(),
        escape(&value),
        class = attribute.class(),
    )
}

/// Line plus a two-layer marker on the last sample. Empty below two samples.
fn render_path(state: &RenderState<ClipStat>, attribute: Attribute) -> String {
    let mapper = CoordinateMapper::new(state.plot_width, state.max_value, TICK_COUNT);
    let len = state.data.len();

    let points: Option<Vec<Point>> = state
        .data
        .iter()
        .enumerate()
        .map(|(i, stat)| mapper.line_point(i, len, attribute.value(stat), CIRCLE_RADIUS))
        .collect();
    let Some(points) = points else {
        return String::new();
    };
    let path = smooth(&points);
    let Some(last) = path.end() else {
        return String::new();
    };

    let class = attribute.class();
    let (cx, cy) = (fmt_px(last.x), fmt_px(last.y));

    let mut svg = format!(
        r#"<path d="{path}" class="{class}" fill="none" stroke-width="{}"/>"#,
        fmt_px(PLOT_STROKE_WIDTH)
    );
    svg.push_str(&format!(
        r#"<circle cx="{cx}" cy="{cy}" r="{}" fill="white" class="outer {class}"/>"#,
        fmt_px(CIRCLE_RADIUS)
    ));
    svg.push_str(&format!(
        r#"<circle cx="{cx}" cy="{cy}" r="{}" class="inner {class}"/>"#,
        fmt_px(CIRCLE_RADIUS - 2.0)
    ));
    svg
}

impl ChartVariant for ClipsChart {
    type Datum = ClipStat;

    const NAME: &'static str = "clips";
    const TICK_COUNT: usize = TICK_COUNT;

    fn fetch<'a>(
        repository: &'a dyn StatsRepository,
        locale: Option<&'a str>,
    ) -> BoxFuture<'a, anyhow::Result<Vec<ClipStat>>> {
        Box::pin(async move { repository.fetch_clips_stats(locale).await })
    }

    fn max_value(data: &[ClipStat]) -> f64 {
        data.iter()
            .fold(0.0, |max, stat| f64::max(max, stat.total.max(stat.valid)))
    }

    fn format_number(value: f64) -> String {
        format_seconds(value)
    }

    fn render_header(state: &RenderState<ClipStat>) -> String {
        format!(
            r#"<div class="metrics">{}{}</div>"#,
            render_metric(state, Attribute::Total),
            render_metric(state, Attribute::Valid)
        )
    }

    /// Localized date; rendered as en-US month/day/year
    fn render_x_tick_label(stat: &ClipStat) -> String {
        stat.date.format("%-m/%-d/%Y").to_string()
    }

    fn render_plot(state: &RenderState<ClipStat>) -> String {
        // Total is drawn last so it sits on top
        let mut svg = render_path(state, Attribute::Valid);
        svg.push_str(&render_path(state, Attribute::Total));
        svg
    }
}
