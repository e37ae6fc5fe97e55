//! C-compatible type definitions for FFI.

use crate::data::CurveError;
use crate::model::ModelError;
use crate::runtime::RuntimeError;
use std::ffi::c_char;

/// Result status codes for FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SansStatus {
    /// Operation succeeded.
    Ok = 0,
    /// Null pointer was passed.
    NullPointer = 1,
    /// Invalid argument, such as a negative or non-finite q.
    InvalidArgument = 2,
    /// Array length mismatch, including a wrong parameter count.
    LengthMismatch = 3,
    /// Invalid UTF-8 string.
    InvalidUtf8 = 4,
    /// Runtime error.
    RuntimeError = 5,
    /// Operation was cancelled.
    Cancelled = 6,
    /// Unknown model id or name.
    NotFound = 7,
    /// A parameter lies outside its physical domain.
    DomainError = 8,
    /// The model is singular at the requested q.
    Singular = 9,
    /// Malformed named-parameter description.
    ParseError = 10,
}

/// C-compatible array view (pointer + length).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CArrayView {
    pub data: *const f64,
    pub len: usize,
}

impl CArrayView {
    pub fn empty() -> Self {
        Self {
            data: std::ptr::null(),
            len: 0,
        }
    }

    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            data: values.as_ptr(),
            len: values.len(),
        }
    }
}

impl From<&ModelError> for SansStatus {
    fn from(err: &ModelError) -> Self {
        match err {
            ModelError::Domain { .. } => SansStatus::DomainError,
            ModelError::ParameterCount { .. } => SansStatus::LengthMismatch,
            ModelError::InvalidQ { .. } => SansStatus::InvalidArgument,
            ModelError::Singular { .. } => SansStatus::Singular,
            ModelError::UnknownModel(_) => SansStatus::NotFound,
            ModelError::Json(_) => SansStatus::ParseError,
        }
    }
}

impl From<&CurveError> for SansStatus {
    fn from(err: &CurveError) -> Self {
        match err {
            CurveError::NullPointer => SansStatus::NullPointer,
            CurveError::InvalidUtf8 => SansStatus::InvalidUtf8,
            CurveError::Model(err) => err.into(),
        }
    }
}

impl From<&RuntimeError> for SansStatus {
    fn from(_: &RuntimeError) -> Self {
        SansStatus::RuntimeError
    }
}

/// Callback function type for completion notifications.
///
/// # Arguments
/// * `user_data` - User-provided context pointer
/// * `status` - `Ok`, or `Cancelled` if the batch was cancelled
pub type CompletionCallback = extern "C" fn(user_data: *mut std::ffi::c_void, status: SansStatus);

/// Callback for progress updates.
///
/// # Arguments
/// * `user_data` - User-provided context pointer
/// * `completed` - Number of curves finished so far
/// * `total` - Number of curves in the batch
pub type ProgressCallback =
    extern "C" fn(user_data: *mut std::ffi::c_void, completed: usize, total: usize);

/// Callback for per-curve completion.
///
/// The pointers are only valid for the duration of the call.
///
/// # Arguments
/// * `user_data` - User-provided context pointer
/// * `curve_id` - C string with the curve id
/// * `intensity` - Evaluated intensities, one per q value
/// * `len` - Number of intensities
pub type CurveCallback = extern "C" fn(
    user_data: *mut std::ffi::c_void,
    curve_id: *const c_char,
    intensity: *const f64,
    len: usize,
);
