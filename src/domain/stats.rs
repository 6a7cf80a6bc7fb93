// Stats domain models
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// Sentinel category meaning "no locale filter"
pub const ALL_LOCALES: &str = "all";

/// Recorded and validated clip duration (seconds) at a point in time
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClipStat {
    pub date: DateTime<Utc>,
    pub total: f64,
    pub valid: f64,
}

#[cfg(test)]
impl ClipStat {
    pub fn new(date: DateTime<Utc>, total: f64, valid: f64) -> Self {
        Self { date, total, valid }
    }
}

/// Number of voices online at a point in time
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VoiceStat {
    pub date: DateTime<Utc>,
    pub voices: u64,
}

#[cfg(test)]
impl VoiceStat {
    pub fn new(date: DateTime<Utc>, voices: u64) -> Self {
        Self { date, voices }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    All,
    Locale(String),
}

impl Category {
    pub fn parse(value: &str) -> Self {
        if value == ALL_LOCALES {
            Category::All
        } else {
            Category::Locale(value.to_string())
        }
    }

    /// Locale filter to hand to the data source; `None` for the sentinel
    pub fn locale(&self) -> Option<&str> {
        match self {
            Category::All => None,
            Category::Locale(locale) => Some(locale),
        }
    }

    pub fn as_str(&self) -> &str {
        self.locale().unwrap_or(ALL_LOCALES)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot handed to renderers. Rebuilt as a unit by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState<D> {
    pub data: Vec<D>,
    pub category: Category,
    pub max_value: f64,
    pub plot_width: f64,
}

impl<D> RenderState<D> {
    pub fn empty(category: Category, max_value: f64, plot_width: f64) -> Self {
        Self {
            data: Vec::new(),
            category,
            max_value,
            plot_width,
        }
    }

    pub fn latest(&self) -> Option<&D> {
        self.data.last()
    }
}
