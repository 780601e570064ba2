//! egui rendering.  Widgets read and edit [`crate::state::AppState`]; no
//! data processing happens here.

pub mod panels;
pub mod plot;
pub mod tables;
pub mod tabs;
