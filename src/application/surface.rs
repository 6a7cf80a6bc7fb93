// Rendering surface abstraction

/// Element whose rendered width drives the plot width.
/// Resize notifications reach the card as commands; the card then re-measures.
pub trait Surface: Send + Sync {
    fn measure_width(&self) -> f64;
}
