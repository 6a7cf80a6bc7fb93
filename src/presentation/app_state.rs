// Application state for HTTP handlers
use crate::application::chart_variant::ChartVariant;
use crate::application::stats_card::{CardError, CardHandle, StatsCard};
use crate::application::stats_repository::StatsRepository;
use crate::domain::stats::ALL_LOCALES;
use crate::infrastructure::viewport::Viewport;
use crate::presentation::charts::clips::ClipsChart;
use crate::presentation::charts::voices::VoicesChart;
use std::sync::Arc;
use std::time::Duration;

/// A mounted card together with the viewport it measures
pub struct CardSlot<V: ChartVariant> {
    pub handle: CardHandle<V>,
    pub viewport: Arc<Viewport>,
}

impl<V: ChartVariant> CardSlot<V> {
    pub fn mount(repository: Arc<dyn StatsRepository>, initial_width: f64) -> Self {
        let viewport = Arc::new(Viewport::new(initial_width));
        let handle = StatsCard::<V>::spawn(repository, viewport.clone());
        Self { handle, viewport }
    }

    pub async fn resize(&self, width: f64) -> Result<(), CardError> {
        self.viewport.set_width(width);
        self.handle.notify_resize().await
    }
}

pub struct AppState {
    pub clips: CardSlot<ClipsChart>,
    pub voices: CardSlot<VoicesChart>,
    pub locales: Vec<String>,
    pub ready_timeout: Duration,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn StatsRepository>,
        locales: Vec<String>,
        initial_width: f64,
        ready_timeout: Duration,
    ) -> Self {
        Self {
            clips: CardSlot::mount(repository.clone(), initial_width),
            voices: CardSlot::mount(repository, initial_width),
            locales,
            ready_timeout,
        }
    }

    /// The selectable set is closed: the "all" sentinel plus configured locales
    pub fn is_selectable(&self, value: &str) -> bool {
        value == ALL_LOCALES || self.locales.iter().any(|l| l == value)
    }

    pub async fn teardown(&self) {
        // Already stopped cards are fine to ignore
        let _ = self.clips.handle.teardown().await;
        let _ = self.voices.handle.teardown().await;
    }
}
