//! Evaluation targets: q sweeps and detector images.

pub mod curve;
pub mod grid;

pub use curve::{evaluate_q, Curve, CurveError};
pub use grid::DetectorGrid;
