// Viewport surface - externally updated width
use crate::application::surface::Surface;
use std::sync::atomic::{AtomicU64, Ordering};

/// Width of the client-side element a card is drawn into. Stored as f64 bits.
#[derive(Debug)]
pub struct Viewport {
    width_bits: AtomicU64,
}

impl Viewport {
    pub fn new(width: f64) -> Self {
        Self {
            width_bits: AtomicU64::new(width.to_bits()),
        }
    }

    pub fn set_width(&self, width: f64) {
        self.width_bits.store(width.to_bits(), Ordering::Relaxed);
    }
}

impl Surface for Viewport {
    fn measure_width(&self) -> f64 {
        f64::from_bits(self.width_bits.load(Ordering::Relaxed))
    }
}
