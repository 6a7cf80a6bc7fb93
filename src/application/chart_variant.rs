// Chart variant strategy - the pluggable half of a stats card
use crate::application::stats_repository::StatsRepository;
use crate::domain::stats::RenderState;
use futures::future::BoxFuture;
use std::fmt::Debug;

/// Everything a stats card needs from a concrete chart. Implemented by
/// zero-sized marker types and dispatched statically.
pub trait ChartVariant: Send + Sync + 'static {
    type Datum: Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Short identifier used in logs and routes
    const NAME: &'static str;
    /// Number of horizontal grid lines, at least two
    const TICK_COUNT: usize;

    fn fetch<'a>(
        repository: &'a dyn StatsRepository,
        locale: Option<&'a str>,
    ) -> BoxFuture<'a, anyhow::Result<Vec<Self::Datum>>>;

    /// Largest plotted value in `data`, zero when empty
    fn max_value(data: &[Self::Datum]) -> f64;

    /// Y-axis tick label text
    fn format_number(value: f64) -> String;

    fn render_header(state: &RenderState<Self::Datum>) -> String;

    fn render_x_tick_label(datum: &Self::Datum) -> String;

    /// SVG elements drawn on top of the grid
    fn render_plot(state: &RenderState<Self::Datum>) -> String;
}
