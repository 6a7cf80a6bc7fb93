// Stats engine - category/fetch/resize state machine for one card
use crate::application::chart_variant::ChartVariant;
use crate::domain::geometry::TickPlanner;
use crate::domain::stats::{Category, RenderState};
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    Idle,
    Loading,
    Ready,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Idle => "idle",
            CardStatus::Loading => "loading",
            CardStatus::Ready => "ready",
        }
    }
}

/// A fetch the engine wants issued. Carries the category captured at
/// dispatch time and must be handed back with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    category: Category,
}

impl FetchRequest {
    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn locale(&self) -> Option<&str> {
        self.category.locale()
    }
}

pub struct StatsEngine<V: ChartVariant> {
    status: CardStatus,
    state: RenderState<V::Datum>,
    planner: TickPlanner,
    observing_resize: bool,
    torn_down: bool,
    _variant: PhantomData<V>,
}

impl<V: ChartVariant> Default for StatsEngine<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ChartVariant> StatsEngine<V> {
    pub fn new() -> Self {
        let planner = TickPlanner::new(V::TICK_COUNT);
        Self {
            status: CardStatus::Idle,
            state: RenderState::empty(Category::All, planner.floor_max(), 0.0),
            planner,
            observing_resize: false,
            torn_down: false,
            _variant: PhantomData,
        }
    }

    pub fn status(&self) -> CardStatus {
        self.status
    }

    pub fn state(&self) -> &RenderState<V::Datum> {
        &self.state
    }

    #[cfg(test)]
    pub fn is_observing_resize(&self) -> bool {
        self.observing_resize
    }

    /// Mount: begin observing resizes, take the first measurement and request
    /// data for the current category. Only valid once, from `Idle`.
    pub fn start(&mut self, width: f64) -> Option<FetchRequest> {
        if self.status != CardStatus::Idle || self.torn_down {
            return None;
        }

        self.observing_resize = true;
        self.state.plot_width = width;
        self.status = CardStatus::Loading;
        tracing::debug!(card = V::NAME, width, "card started");

        Some(self.request())
    }

    /// Switch category. Clears data and resets the max to its floor right away,
    /// so the card shows an empty chart until the new data lands.
    pub fn select_category(&mut self, category: Category) -> Option<FetchRequest> {
        if self.status == CardStatus::Idle || self.torn_down || category == self.state.category {
            return None;
        }

        tracing::debug!(card = V::NAME, from = %self.state.category, to = %category, "category changed");
        self.state = RenderState::empty(category, self.planner.floor_max(), self.state.plot_width);
        self.status = CardStatus::Loading;

        Some(self.request())
    }

    /// Apply a finished fetch. Results for a category that is no longer
    /// selected are dropped. Returns whether the result was applied.
    pub fn complete_fetch(&mut self, request: &FetchRequest, data: Vec<V::Datum>) -> bool {
        if self.torn_down || self.status == CardStatus::Idle {
            return false;
        }

        if request.category != self.state.category {
            tracing::debug!(
                card = V::NAME,
                fetched = %request.category,
                current = %self.state.category,
                "discarding stale fetch result"
            );
            return false;
        }

        let max_value = self.planner.round_max(V::max_value(&data));
        self.state = RenderState {
            data,
            category: request.category.clone(),
            max_value,
            plot_width: self.state.plot_width,
        };
        self.status = CardStatus::Ready;
        tracing::debug!(card = V::NAME, category = %request.category, max_value, "card ready");

        true
    }

    /// Record a new surface measurement. Leaves the status untouched.
    pub fn resize(&mut self, width: f64) -> bool {
        if !self.observing_resize {
            return false;
        }

        self.state.plot_width = width;
        true
    }

    /// Unmount: stop observing resizes. In-flight fetches still complete but
    /// their results are ignored.
    pub fn teardown(&mut self) {
        self.observing_resize = false;
        self.torn_down = true;
        tracing::debug!(card = V::NAME, "card torn down");
    }

    fn request(&self) -> FetchRequest {
        FetchRequest {
            category: self.state.category.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::stats_repository::StatsRepository;
    use futures::future::BoxFuture;

    struct CountChart;

    impl ChartVariant for CountChart {
        type Datum = u32;

        const NAME: &'static str = "count";
        const TICK_COUNT: usize = 4;

        fn fetch<'a>(
            _repository: &'a dyn StatsRepository,
            _locale: Option<&'a str>,
        ) -> BoxFuture<'a, anyhow::Result<Vec<u32>>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn max_value(data: &[u32]) -> f64 {
            data.iter().copied().max().unwrap_or(0) as f64
        }

        fn format_number(value: f64) -> String {
            value.to_string()
        }

        fn render_header(_state: &RenderState<u32>) -> String {
            String::new()
        }

        fn render_x_tick_label(datum: &u32) -> String {
            datum.to_string()
        }

        fn render_plot(_state: &RenderState<u32>) -> String {
            String::new()
        }
    }

    fn started() -> (StatsEngine<CountChart>, FetchRequest) {
        let mut engine = StatsEngine::<CountChart>::new();
        let request = engine.start(600.0).unwrap();
        (engine, request)
    }

    #[test]
    fn test_new_engine_is_idle_and_empty() {
        let engine = StatsEngine::<CountChart>::new();
        assert_eq!(engine.status(), CardStatus::Idle);
        assert!(engine.state().data.is_empty());
        assert_eq!(engine.state().max_value, 3.0);
        assert_eq!(engine.state().category, Category::All);
        assert!(!engine.is_observing_resize());
    }

    #[test]
    fn test_start_requests_all_without_filter() {
        let (engine, request) = started();
        assert_eq!(engine.status(), CardStatus::Loading);
        assert_eq!(engine.state().plot_width, 600.0);
        assert_eq!(request.locale(), None);
        assert!(engine.is_observing_resize());
    }

    #[test]
    fn test_start_only_once() {
        let (mut engine, _) = started();
        assert_eq!(engine.start(10.0), None);
        assert_eq!(engine.state().plot_width, 600.0);
    }

    #[test]
    fn test_completion_computes_rounded_max() {
        let (mut engine, request) = started();
        assert!(engine.complete_fetch(&request, vec![1, 7, 4]));
        assert_eq!(engine.status(), CardStatus::Ready);
        assert_eq!(engine.state().data, vec![1, 7, 4]);
        assert_eq!(engine.state().max_value, 9.0);
    }

    #[test]
    fn test_category_change_resets_and_refetches() {
        let (mut engine, request) = started();
        engine.complete_fetch(&request, vec![20]);

        let next = engine.select_category(Category::parse("fr")).unwrap();
        assert_eq!(next.locale(), Some("fr"));
        assert_eq!(engine.status(), CardStatus::Loading);
        assert!(engine.state().data.is_empty());
        assert_eq!(engine.state().max_value, 3.0);
        assert_eq!(engine.state().plot_width, 600.0);
    }

    #[test]
    fn test_same_category_is_noop() {
        let (mut engine, request) = started();
        engine.complete_fetch(&request, vec![2]);
        assert_eq!(engine.select_category(Category::All), None);
        assert_eq!(engine.status(), CardStatus::Ready);
        assert_eq!(engine.state().data, vec![2]);
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let (mut engine, stale) = started();
        let fresh = engine.select_category(Category::parse("de")).unwrap();

        assert!(!engine.complete_fetch(&stale, vec![100]));
        assert_eq!(engine.status(), CardStatus::Loading);
        assert!(engine.state().data.is_empty());

        assert!(engine.complete_fetch(&fresh, vec![5]));
        assert_eq!(engine.state().data, vec![5]);
        assert_eq!(engine.state().category, Category::parse("de"));
    }

    #[test]
    fn test_result_matched_by_category_identity() {
        let (mut engine, first_all) = started();
        engine.select_category(Category::parse("de"));
        engine.select_category(Category::All);

        // The first "all" fetch still matches the current category
        assert!(engine.complete_fetch(&first_all, vec![8]));
        assert_eq!(engine.state().data, vec![8]);
    }

    #[test]
    fn test_resize_keeps_status() {
        let (mut engine, _) = started();
        assert!(engine.resize(320.0));
        assert_eq!(engine.state().plot_width, 320.0);
        assert_eq!(engine.status(), CardStatus::Loading);
    }

    #[test]
    fn test_teardown_ignores_resize_and_results() {
        let (mut engine, request) = started();
        engine.teardown();
        assert!(!engine.resize(100.0));
        assert_eq!(engine.state().plot_width, 600.0);
        assert!(!engine.complete_fetch(&request, vec![1]));
        assert_eq!(engine.status(), CardStatus::Loading);
        assert_eq!(engine.select_category(Category::parse("de")), None);
    }
}
