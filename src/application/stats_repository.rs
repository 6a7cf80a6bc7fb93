// Repository trait for the stats data source
use crate::domain::stats::{ClipStat, VoiceStat};
use async_trait::async_trait;

/// Both operations return samples sorted ascending by date. Callers never re-sort.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Recorded/validated clip durations, optionally filtered to one locale
    async fn fetch_clips_stats(&self, locale: Option<&str>) -> anyhow::Result<Vec<ClipStat>>;

    /// Online voice counts, optionally filtered to one locale
    async fn fetch_clip_voices(&self, locale: Option<&str>) -> anyhow::Result<Vec<VoiceStat>>;
}
