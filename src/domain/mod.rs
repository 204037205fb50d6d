pub mod grid;
pub mod rules;
pub mod stats;
pub mod tile;
