// Application layer - Stats card engine and its collaborator traits
pub mod chart_variant;
pub mod stats_card;
pub mod stats_engine;
pub mod stats_repository;
pub mod surface;
