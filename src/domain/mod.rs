// Domain layer - Pure chart models and algorithms
pub mod curve;
pub mod format;
pub mod geometry;
pub mod stats;
