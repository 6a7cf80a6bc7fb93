// Chart variants plugged into the stats card
pub mod clips;
pub mod voices;
