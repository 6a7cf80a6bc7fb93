// Voices chart - online voices as a fixed-slot bar histogram
use crate::application::chart_variant::ChartVariant;
use crate::application::stats_repository::StatsRepository;
use crate::domain::format::format_compact;
use crate::domain::geometry::{fmt_px, CoordinateMapper, Y_OFFSET};
use crate::domain::stats::{RenderState, VoiceStat};
use futures::future::BoxFuture;
use num_format::{Locale, ToFormattedString};

const TICK_COUNT: usize = 4;
const BAR_COUNT: usize = 10;
const BAR_WIDTH: f64 = 15.0;
const GRADIENT_ID: &str = "blue-purple";

pub struct VoicesChart;

impl ChartVariant for VoicesChart {
    type Datum = VoiceStat;

    const NAME: &'static str = "voices";
    const TICK_COUNT: usize = TICK_COUNT;

    fn fetch<'a>(
        repository: &'a dyn StatsRepository,
        locale: Option<&'a str>,
    ) -> BoxFuture<'a, anyhow::Result<Vec<VoiceStat>>> {
        Box::pin(async move { repository.fetch_clip_voices(locale).await })
    }

    fn max_value(data: &[VoiceStat]) -> f64 {
        data.iter().map(|stat| stat.voices).max().unwrap_or(0) as f64
    }

    fn format_number(value: f64) -> String {
        format_compact(value)
    }

    fn render_header(state: &RenderState<VoiceStat>) -> String {
        let online = state
            .latest()
            .map(|stat| stat.voices.to_formatted_string(&Locale::en))
            .unwrap_or_else(|| "?".to_string());

        format!(r#"<div><h3>Voices Online Now</h3><div class="online-voices">{online}</div></div>"#)
    }

    /// Two-digit 12-hour clock without the AM/PM suffix
    fn render_x_tick_label(stat: &VoiceStat) -> String {
        stat.date.format("%I:%M").to_string()
    }

    /// Background slots are laid out on the fixed bar grid whatever the data
    /// length, so missing samples show as empty slots.
    fn render_plot(state: &RenderState<VoiceStat>) -> String {
        let mapper = CoordinateMapper::new(state.plot_width, state.max_value, TICK_COUNT);
        let bar_height = mapper.band_height();
        let mut svg = String::new();

        for i in 0..BAR_COUNT {
            svg.push_str(&format!(
                r#"<rect class="bg" x="{}" y="{}" width="{}" height="{}"/>"#,
                fmt_px(mapper.bar_x(i, BAR_COUNT, BAR_WIDTH)),
                fmt_px(Y_OFFSET),
                fmt_px(BAR_WIDTH),
                fmt_px(bar_height)
            ));
        }

        svg.push_str(&format!(
            r##"<defs><linearGradient id="{GRADIENT_ID}" x2="0%" y2="100%"><stop offset="5%" stop-color="#88d1f1"/><stop offset="95%" stop-color="#b1b5e5"/></linearGradient></defs>"##
        ));

        for (i, stat) in state.data.iter().enumerate() {
            let height = mapper.bar_height(stat.voices as f64);
            let class = if i + 1 == BAR_COUNT { "current" } else { "" };
            svg.push_str(&format!(
                r#"<rect fill="url(#{GRADIENT_ID})" class="{class}" x="{}" y="{}" width="{}" height="{}"/>"#,
                fmt_px(mapper.bar_x(i, BAR_COUNT, BAR_WIDTH)),
                fmt_px(Y_OFFSET + bar_height - height),
                fmt_px(BAR_WIDTH),
                fmt_px(height)
            ));
        }

        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::stats_card::tests::voices;
    use crate::domain::stats::Category;
    use chrono::{TimeZone, Utc};

    fn state(data: Vec<VoiceStat>, max_value: f64) -> RenderState<VoiceStat> {
        RenderState {
            data,
            category: Category::All,
            max_value,
            plot_width: 653.0,
        }
    }

    fn bar_heights(svg: &str) -> Vec<String> {
        svg.split(r#"<rect fill="#)
            .skip(1)
            .map(|rect| {
                let start = rect.find(r#"height=""#).unwrap() + r#"height=""#.len();
                let end = rect[start..].find('"').unwrap() + start;
                rect[start..end].to_string()
            })
            .collect()
    }

    #[test]
    fn test_max_value() {
        assert_eq!(VoicesChart::max_value(&[]), 0.0);
        assert_eq!(VoicesChart::max_value(&voices(&[4, 19, 2])), 19.0);
    }

    #[test]
    fn test_zero_max_renders_flat_bars() {
        let svg = VoicesChart::render_plot(&state(voices(&[0, 5, 9]), 0.0));
        assert_eq!(bar_heights(&svg), vec!["0", "0", "0"]);
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_bar_height_proportional() {
        let svg = VoicesChart::render_plot(&state(voices(&[30, 15, 0]), 30.0));
        assert_eq!(bar_heights(&svg), vec!["115.5", "57.75", "0"]);
        // Full bar starts at the top of the band
        assert!(svg.contains(r#"class="" x="50.5" y="10" width="15" height="115.5"/>"#));
    }

    #[test]
    fn test_background_slots_fill_grid() {
        let svg = VoicesChart::render_plot(&state(voices(&[1]), 3.0));
        assert_eq!(svg.matches(r#"class="bg""#).count(), BAR_COUNT);
        assert_eq!(bar_heights(&svg).len(), 1);
        assert!(!svg.contains(r#"class="current""#));
    }

    #[test]
    fn test_last_slot_marked_current() {
        let counts: Vec<u64> = (1..=10).collect();
        let svg = VoicesChart::render_plot(&state(voices(&counts), 12.0));
        assert_eq!(svg.matches(r#"class="current""#).count(), 1);
        let current = svg.find(r#"class="current""#).unwrap();
        assert_eq!(svg[current..].matches("<rect ").count(), 0);
    }

    #[test]
    fn test_header() {
        let header = VoicesChart::render_header(&state(voices(&[3, 1234]), 1236.0));
        assert!(header.contains(r#"<div class="online-voices">1,234</div>"#));
        let header = VoicesChart::render_header(&state(voices(&[999, 1234567]), 1234568.0));
        assert!(header.contains(r#"<div class="online-voices">1,234,567</div>"#));
        let header = VoicesChart::render_header(&state(voices(&[999]), 1000.0));
        assert!(header.contains(r#"<div class="online-voices">999</div>"#));
        let header = VoicesChart::render_header(&state(Vec::new(), 3.0));
        assert!(header.contains(r#"<div class="online-voices">?</div>"#));
    }

    #[test]
    fn test_x_tick_label_drops_meridiem() {
        let stat = VoiceStat::new(Utc.with_ymd_and_hms(2018, 6, 1, 15, 30, 0).unwrap(), 1);
        assert_eq!(VoicesChart::render_x_tick_label(&stat), "03:30");
    }
}
