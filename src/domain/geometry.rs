// Plot geometry - coordinate mapping and axis tick planning
use std::fmt;

/// Top of the plot band
pub const Y_OFFSET: f64 = 10.0;
/// Height spanned by the tick grid
pub const TOTAL_LINE_MARGIN: f64 = 154.0;
/// Right edge of the y-axis tick labels
pub const TEXT_OFFSET: f64 = 40.0;
/// Left edge of the grid lines
pub const LINE_OFFSET: f64 = TEXT_OFFSET + 5.0;
pub const PLOT_PADDING: f64 = 13.0;
pub const PLOT_STROKE_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", fmt_px(self.x), fmt_px(self.y))
    }
}

/// Format a pixel coordinate with at most two decimals
pub fn fmt_px(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        // Avoid printing "-0"
        return "0".to_string();
    }
    rounded.to_string()
}

/// One horizontal grid line and its label value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct TickPlanner {
    tick_count: usize,
}

impl TickPlanner {
    pub fn new(tick_count: usize) -> Self {
        debug_assert!(tick_count >= 2, "a tick grid needs at least two lines");
        Self {
            tick_count: tick_count.max(2),
        }
    }

    fn intervals(&self) -> f64 {
        (self.tick_count - 1) as f64
    }

    /// Max value used before any data has been fetched
    pub fn floor_max(&self) -> f64 {
        self.intervals()
    }

    /// Bump the observed max to the next multiple of the interval count so
    /// every tick label is a whole number. An exact multiple still moves up
    /// one full step, which keeps the result positive for an all-zero series.
    pub fn round_max(&self, actual_max: f64) -> f64 {
        let ticks = self.intervals();
        let actual_max = actual_max.max(0.0);
        actual_max + (ticks - actual_max % ticks)
    }

    /// Ticks from `max_value` (top) down to zero. Lines are spaced by
    /// total-height / tick-count, so the last one sits a slot above the bottom.
    pub fn ticks(&self, max_value: f64) -> Vec<Tick> {
        let ticks = self.intervals();
        (0..self.tick_count)
            .map(|i| Tick {
                value: ((ticks - i as f64) * max_value / ticks).round(),
                y: i as f64 * TOTAL_LINE_MARGIN / self.tick_count as f64 + Y_OFFSET,
            })
            .collect()
    }
}

/// Maps sample index and value to pixels for a given plot width and value range
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    plot_width: f64,
    max_value: f64,
    tick_count: usize,
}

impl CoordinateMapper {
    pub fn new(plot_width: f64, max_value: f64, tick_count: usize) -> Self {
        Self {
            plot_width,
            max_value,
            tick_count: tick_count.max(2),
        }
    }

    /// Height of the band between the top and the bottom grid line
    pub fn band_height(&self) -> f64 {
        TOTAL_LINE_MARGIN * (self.tick_count - 1) as f64 / self.tick_count as f64
    }

    fn ratio(&self, value: f64) -> f64 {
        if self.max_value > 0.0 {
            value / self.max_value
        } else {
            0.0
        }
    }

    /// Point of a line series. `None` when the series has fewer than two
    /// samples, since there is no interval to spread them over.
    pub fn line_point(
        &self,
        index: usize,
        series_len: usize,
        value: f64,
        marker_radius: f64,
    ) -> Option<Point> {
        if series_len < 2 {
            return None;
        }

        let span = (self.plot_width - LINE_OFFSET - 2.0 * PLOT_PADDING - marker_radius).max(0.0);
        let x = LINE_OFFSET + PLOT_PADDING + index as f64 * span / (series_len - 1) as f64;
        let y = Y_OFFSET - PLOT_STROKE_WIDTH / 2.0 + (1.0 - self.ratio(value)) * self.band_height();

        Some(Point::new(x, y))
    }

    /// Left edge of bar slot `index` on a fixed `bar_count` grid
    pub fn bar_x(&self, index: usize, bar_count: usize, bar_width: f64) -> f64 {
        let span = (self.plot_width - PLOT_PADDING - TEXT_OFFSET).max(0.0);
        LINE_OFFSET + PLOT_PADDING - bar_width / 2.0 + index as f64 * span / bar_count.max(1) as f64
    }

    /// Bar height for `value`; zero when there is no range to scale against
    pub fn bar_height(&self, value: f64) -> f64 {
        let height = self.ratio(value) * self.band_height();
        if height.is_finite() { height.max(0.0) } else { 0.0 }
    }

    /// X position of the axis label for sample `index`
    pub fn label_x(&self, index: usize, series_len: usize) -> f64 {
        let span = self.plot_width - PLOT_PADDING - TEXT_OFFSET;
        LINE_OFFSET + index as f64 * (span / series_len.max(1) as f64)
    }
}
