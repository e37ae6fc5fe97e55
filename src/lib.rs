//! SANS Rust Form Factors - analytic small-angle scattering models.
//!
//! This crate evaluates orientationally averaged form factors of
//! cylinders, ellipsoids, parallelepipeds, lamellae and semi-flexible
//! chains with:
//!
//! - Fixed Gauss-Legendre quadrature (20 and 76 points)
//! - Schulz and log-normal size polydispersity
//! - Parallel q sweeps and detector images using rayon
//! - Async batch execution with callback notifications
//! - FFI layer for Python (cffi) and other language bindings
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     FFI Layer (sansrs.h)            │
//! │  C-compatible functions & types     │
//! └─────────────────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────┐
//! │   Runtime (rayon pool + tokio)      │
//! │   Curve / DetectorGrid              │
//! └─────────────────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────┐
//! │  Models (FormFactor, Model enum)    │
//! │  ┌───────────┐  ┌───────────────┐   │
//! │  │  Kernels  │  │  Quadrature,  │   │
//! │  │ (per shape│  │  special fns, │   │
//! │  │  family)  │  │ distributions │   │
//! │  └───────────┘  └───────────────┘   │
//! └─────────────────────────────────────┘
//! ```
//!
//! # FFI Usage
//!
//! The library exposes C-compatible functions for use with Python cffi:
//!
//! ```c
//! // Stateless evaluation of a cylinder (model id 0)
//! double params[] = {1.0, 20.0, 400.0, 3e-6, 0.0};
//! sans_evaluate(0, params, 5, q, intensity, len);
//!
//! // Batch evaluation
//! ModelHandle model;
//! sans_model_from_json("{\"model\": \"cylinder\", ...}", &model);
//! RuntimeHandle runtime;
//! sans_runtime_create(NULL, &runtime);
//! CurveHandle curve;
//! sans_curve_create("curve1", model, q, len, &curve);
//! sans_runtime_add_curve(runtime, curve);
//! sans_runtime_run_async(runtime, on_complete, on_progress, on_curve, user_data);
//!
//! // Cleanup
//! sans_runtime_free(runtime);
//! sans_model_free(model);
//! ```

pub mod data;
pub mod ffi;
pub mod kernel;
pub mod math;
pub mod model;
pub mod runtime;

// Re-export commonly used items
pub use data::{Curve, CurveError, DetectorGrid};
pub use model::{FormFactor, Model, ModelError, ModelKind, ParameterVector};
pub use runtime::{BatchSummary, Runtime, RuntimeConfig, RuntimeError};

// Re-export FFI types for cbindgen
pub use ffi::curve::*;
pub use ffi::model::*;
pub use ffi::runtime::*;
pub use ffi::types::*;
