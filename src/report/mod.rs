//! Report module - rendering and exporting KS results

pub mod export;
pub mod gains_display;
pub mod summary;

pub use export::*;
pub use gains_display::*;
pub use summary::*;
