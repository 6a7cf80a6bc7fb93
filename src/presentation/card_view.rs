// Card frame - header, category select, tick grid and x-axis labels
use crate::application::chart_variant::ChartVariant;
use crate::application::stats_card::CardSnapshot;
use crate::domain::geometry::{
    fmt_px, CoordinateMapper, TickPlanner, LINE_OFFSET, PLOT_PADDING, TEXT_OFFSET,
    TOTAL_LINE_MARGIN, Y_OFFSET,
};
use crate::domain::stats::{Category, ALL_LOCALES};
use crate::presentation::markup::escape;

const GRID_STROKE: &str = "rgba(0,0,0,0.2)";

/// Render a whole card for `snapshot`. The variant supplies header, labels and plot.
pub fn render_card<V: ChartVariant>(snapshot: &CardSnapshot<V::Datum>, locales: &[String]) -> String {
    let state = &snapshot.state;
    let mut html = String::new();

    html.push_str(&format!(
        r#"<div class="home-card {}" data-status="{}">"#,
        V::NAME,
        snapshot.status.as_str()
    ));
    html.push_str(r#"<div class="head">"#);
    html.push_str(&V::render_header(state));
    html.push_str(&render_category_select(&state.category, locales));
    html.push_str("</div>");

    html.push_str(r#"<svg width="100%" height="100%">"#);

    for tick in TickPlanner::new(V::TICK_COUNT).ticks(state.max_value) {
        let y = fmt_px(tick.y);
        html.push_str(&format!(
            r#"<text class="tick-label" x="{}" y="{}" dominant-baseline="middle" text-anchor="end">{}</text>"#,
            fmt_px(TEXT_OFFSET),
            y,
            escape(&V::format_number(tick.value))
        ));
        html.push_str(&format!(
            r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="{GRID_STROKE}"/>"#,
            fmt_px(LINE_OFFSET),
            fmt_px(state.plot_width + PLOT_PADDING),
        ));
    }

    let mapper = CoordinateMapper::new(state.plot_width, state.max_value, V::TICK_COUNT);
    let label_y = fmt_px(Y_OFFSET + TOTAL_LINE_MARGIN);
    for (i, datum) in state.data.iter().enumerate() {
        html.push_str(&format!(
            r#"<text class="tick-label" x="{}" y="{}">{}</text>"#,
            fmt_px(mapper.label_x(i, state.data.len())),
            label_y,
            escape(&V::render_x_tick_label(datum))
        ));
    }

    html.push_str(&V::render_plot(state));
    html.push_str("</svg></div>");
    html
}

/// "All Languages" first, then the configured locales in order
fn render_category_select(selected: &Category, locales: &[String]) -> String {
    let mut html = String::from(r#"<select name="category">"#);
    html.push_str(&option(ALL_LOCALES, "All Languages", selected.as_str() == ALL_LOCALES));
    for locale in locales {
        html.push_str(&option(locale, locale, selected.as_str() == locale));
    }
    html.push_str("</select>");
    html
}

fn option(value: &str, label: &str, selected: bool) -> String {
    format!(
        r#"<option value="{}"{}>{}</option>"#,
        escape(value),
        if selected { " selected" } else { "" },
        escape(label)
    )
}
