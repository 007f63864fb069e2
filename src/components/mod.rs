//! UI components.

pub mod orbit_field;
