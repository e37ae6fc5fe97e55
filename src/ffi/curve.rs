//! FFI functions for Curve manipulation.

use super::model::ModelHandle;
use super::types::{CArrayView, SansStatus};
use crate::data::Curve;
use std::ffi::c_char;
use tracing::warn;

/// Opaque handle to a Curve.
pub type CurveHandle = *mut Curve;

/// Create a curve for a copy of `model` over the given q values.
///
/// # Safety
/// `id` must be a NUL-terminated string, `model` a valid handle and
/// `q_values` must hold `len` values.
#[no_mangle]
pub unsafe extern "C" fn sans_curve_create(
    id: *const c_char,
    model: ModelHandle,
    q_values: *const f64,
    len: usize,
    out_handle: *mut CurveHandle,
) -> SansStatus {
    if model.is_null() || out_handle.is_null() {
        return SansStatus::NullPointer;
    }
    match Curve::from_raw(id, *model, q_values, len) {
        Ok(curve) => {
            *out_handle = Box::into_raw(Box::new(curve));
            SansStatus::Ok
        }
        Err(err) => {
            let status = SansStatus::from(&err);
            warn!(error = %err, ?status, "sans_curve_create rejected");
            status
        }
    }
}

/// Free a curve handle.
///
/// # Safety
/// Handle must be valid or null.
#[no_mangle]
pub unsafe extern "C" fn sans_curve_free(handle: CurveHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Evaluate a curve on the calling thread.
///
/// # Safety
/// Handle must be valid.
#[no_mangle]
pub unsafe extern "C" fn sans_curve_evaluate(handle: CurveHandle) -> SansStatus {
    if handle.is_null() {
        return SansStatus::NullPointer;
    }
    match (*handle).evaluate() {
        Ok(()) => SansStatus::Ok,
        Err(err) => {
            let status = SansStatus::from(&err);
            warn!(curve = %(*handle).id, error = %err, ?status, "sans_curve_evaluate rejected");
            status
        }
    }
}

/// Get the curve id into a buffer.
///
/// # Safety
/// Handle and buffer must be valid.
#[no_mangle]
pub unsafe extern "C" fn sans_curve_get_id_buf(
    handle: CurveHandle,
    buffer: *mut c_char,
    buffer_len: usize,
    out_len: *mut usize,
) -> SansStatus {
    if handle.is_null() || buffer.is_null() || out_len.is_null() {
        return SansStatus::NullPointer;
    }
    if buffer_len == 0 {
        return SansStatus::InvalidArgument;
    }

    let curve = &*handle;
    let id_bytes = curve.id.as_bytes();
    let copy_len = id_bytes.len().min(buffer_len - 1);

    std::ptr::copy_nonoverlapping(id_bytes.as_ptr(), buffer as *mut u8, copy_len);
    *buffer.add(copy_len) = 0;
    *out_len = id_bytes.len();

    SansStatus::Ok
}

/// Number of q values of a curve.
#[no_mangle]
pub unsafe extern "C" fn sans_curve_len(handle: CurveHandle) -> usize {
    if handle.is_null() {
        return 0;
    }
    (*handle).len()
}

/// View of the q values.
///
/// # Safety
/// Handle must be valid. The view is valid until the curve is freed.
#[no_mangle]
pub unsafe extern "C" fn sans_curve_get_q_values(handle: CurveHandle) -> CArrayView {
    if handle.is_null() {
        return CArrayView::empty();
    }
    CArrayView::from_slice((*handle).q_ref())
}

/// View of the evaluated intensities; empty before evaluation.
///
/// # Safety
/// Handle must be valid. The view is valid until the curve is evaluated
/// again or freed.
#[no_mangle]
pub unsafe extern "C" fn sans_curve_get_intensity(handle: CurveHandle) -> CArrayView {
    if handle.is_null() {
        return CArrayView::empty();
    }
    CArrayView::from_slice((*handle).intensity_ref())
}
