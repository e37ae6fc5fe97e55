//! FFI functions for model construction and evaluation.
//!
//! Models are addressed either by numeric id (the [`ModelKind`]
//! discriminant) with a positional parameter array, or by a JSON
//! description with named parameters.

use super::types::SansStatus;
use crate::data::{evaluate_q, DetectorGrid};
use crate::model::{FormFactor, Model, ModelError, ModelKind};
use std::ffi::{c_char, CStr};
use tracing::warn;

/// Opaque handle to a Model.
pub type ModelHandle = *mut Model;

pub(crate) fn reject(call: &'static str, err: &ModelError) -> SansStatus {
    let status = SansStatus::from(err);
    warn!(call, error = %err, ?status, "FFI call rejected");
    status
}

unsafe fn model_from_raw(model_id: u32, params: *const f64, len: usize) -> Result<Model, ModelError> {
    let kind = ModelKind::from_id(model_id)?;
    let values = if len == 0 {
        &[][..]
    } else {
        std::slice::from_raw_parts(params, len)
    };
    Model::from_parameters(kind, values)
}

/// Number of models; valid ids are `0..sans_model_count()`.
#[no_mangle]
pub extern "C" fn sans_model_count() -> u32 {
    ModelKind::ALL.len() as u32
}

/// Number of positional parameters of a model id.
///
/// # Safety
/// `out_count` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn sans_model_param_count(model_id: u32, out_count: *mut usize) -> SansStatus {
    if out_count.is_null() {
        return SansStatus::NullPointer;
    }
    match ModelKind::from_id(model_id) {
        Ok(kind) => {
            *out_count = kind.parameter_count();
            SansStatus::Ok
        }
        Err(err) => reject("sans_model_param_count", &err),
    }
}

/// Create a model from its id and positional parameters.
///
/// # Safety
/// `params` must point to `len` values and `out_handle` must be valid.
#[no_mangle]
pub unsafe extern "C" fn sans_model_create(
    model_id: u32,
    params: *const f64,
    len: usize,
    out_handle: *mut ModelHandle,
) -> SansStatus {
    if out_handle.is_null() || (params.is_null() && len > 0) {
        return SansStatus::NullPointer;
    }
    match model_from_raw(model_id, params, len) {
        Ok(model) => {
            *out_handle = Box::into_raw(Box::new(model));
            SansStatus::Ok
        }
        Err(err) => reject("sans_model_create", &err),
    }
}

/// Create a model from a JSON description such as
/// `{"model": "cylinder", "scale": 1, "radius": 20, ...}`.
///
/// # Safety
/// `json` must be a NUL-terminated string and `out_handle` must be valid.
#[no_mangle]
pub unsafe extern "C" fn sans_model_from_json(
    json: *const c_char,
    out_handle: *mut ModelHandle,
) -> SansStatus {
    if json.is_null() || out_handle.is_null() {
        return SansStatus::NullPointer;
    }
    let text = match CStr::from_ptr(json).to_str() {
        Ok(text) => text,
        Err(_) => return SansStatus::InvalidUtf8,
    };
    match Model::from_json(text) {
        Ok(model) => {
            *out_handle = Box::into_raw(Box::new(model));
            SansStatus::Ok
        }
        Err(err) => reject("sans_model_from_json", &err),
    }
}

/// Free a model handle.
///
/// # Safety
/// Handle must be valid or null.
#[no_mangle]
pub unsafe extern "C" fn sans_model_free(handle: ModelHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Id of the model behind a handle.
///
/// # Safety
/// Handle and `out_id` must be valid.
#[no_mangle]
pub unsafe extern "C" fn sans_model_id(handle: ModelHandle, out_id: *mut u32) -> SansStatus {
    if handle.is_null() || out_id.is_null() {
        return SansStatus::NullPointer;
    }
    *out_id = (*handle).kind().id();
    SansStatus::Ok
}

/// Copy the positional parameters of a model into `out_params`.
///
/// # Safety
/// Handle must be valid and `out_params` must hold `capacity` values.
#[no_mangle]
pub unsafe extern "C" fn sans_model_get_params(
    handle: ModelHandle,
    out_params: *mut f64,
    capacity: usize,
) -> SansStatus {
    if handle.is_null() || out_params.is_null() {
        return SansStatus::NullPointer;
    }
    let values = (*handle).parameters();
    if capacity < values.len() {
        return SansStatus::LengthMismatch;
    }
    std::ptr::copy_nonoverlapping(values.as_ptr(), out_params, values.len());
    SansStatus::Ok
}

/// Intensity at one q.
///
/// # Safety
/// Handle and `out_value` must be valid.
#[no_mangle]
pub unsafe extern "C" fn sans_model_evaluate(
    handle: ModelHandle,
    q: f64,
    out_value: *mut f64,
) -> SansStatus {
    if handle.is_null() || out_value.is_null() {
        return SansStatus::NullPointer;
    }
    match (*handle).intensity(q) {
        Ok(value) => {
            *out_value = value;
            SansStatus::Ok
        }
        Err(err) => reject("sans_model_evaluate", &err),
    }
}

/// Intensity at one detector position `(qx, qy)`.
///
/// # Safety
/// Handle and `out_value` must be valid.
#[no_mangle]
pub unsafe extern "C" fn sans_model_evaluate_xy(
    handle: ModelHandle,
    qx: f64,
    qy: f64,
    out_value: *mut f64,
) -> SansStatus {
    if handle.is_null() || out_value.is_null() {
        return SansStatus::NullPointer;
    }
    match (*handle).intensity_xy(qx, qy) {
        Ok(value) => {
            *out_value = value;
            SansStatus::Ok
        }
        Err(err) => reject("sans_model_evaluate_xy", &err),
    }
}

/// Intensity at every q of an array, spread over the global rayon pool.
///
/// On error `out_values` is left untouched.
///
/// # Safety
/// Handle must be valid; `q_values` and `out_values` must hold `len` values.
#[no_mangle]
pub unsafe extern "C" fn sans_model_evaluate_array(
    handle: ModelHandle,
    q_values: *const f64,
    out_values: *mut f64,
    len: usize,
) -> SansStatus {
    if handle.is_null() || q_values.is_null() || out_values.is_null() {
        return SansStatus::NullPointer;
    }
    let q = std::slice::from_raw_parts(q_values, len);
    match evaluate_q(&*handle, q, true) {
        Ok(values) => {
            std::ptr::copy_nonoverlapping(values.as_ptr(), out_values, len);
            SansStatus::Ok
        }
        Err(err) => reject("sans_model_evaluate_array", &err),
    }
}

/// Intensity image over a detector grid.
///
/// `out_image` receives `qy_len × qx_len` values in row-major order, rows
/// following `qy`.
///
/// # Safety
/// Handle must be valid; the arrays must hold the stated number of values.
#[no_mangle]
pub unsafe extern "C" fn sans_model_evaluate_grid(
    handle: ModelHandle,
    qx: *const f64,
    qx_len: usize,
    qy: *const f64,
    qy_len: usize,
    out_image: *mut f64,
) -> SansStatus {
    if handle.is_null() || qx.is_null() || qy.is_null() || out_image.is_null() {
        return SansStatus::NullPointer;
    }
    let grid = DetectorGrid::new(
        std::slice::from_raw_parts(qx, qx_len).to_vec(),
        std::slice::from_raw_parts(qy, qy_len).to_vec(),
    );
    match grid.evaluate(&*handle) {
        Ok(image) => {
            let out = std::slice::from_raw_parts_mut(out_image, qx_len * qy_len);
            for (slot, value) in out.iter_mut().zip(image.iter()) {
                *slot = *value;
            }
            SansStatus::Ok
        }
        Err(err) => reject("sans_model_evaluate_grid", &err),
    }
}

/// Stateless evaluation: build the model, evaluate every q, discard it.
///
/// # Safety
/// `params` must hold `param_len` values; `q_values` and `out_values` must
/// hold `len` values.
#[no_mangle]
pub unsafe extern "C" fn sans_evaluate(
    model_id: u32,
    params: *const f64,
    param_len: usize,
    q_values: *const f64,
    out_values: *mut f64,
    len: usize,
) -> SansStatus {
    if params.is_null() || q_values.is_null() || out_values.is_null() {
        return SansStatus::NullPointer;
    }
    let model = match model_from_raw(model_id, params, param_len) {
        Ok(model) => model,
        Err(err) => return reject("sans_evaluate", &err),
    };
    let q = std::slice::from_raw_parts(q_values, len);
    match evaluate_q(&model, q, false) {
        Ok(values) => {
            std::ptr::copy_nonoverlapping(values.as_ptr(), out_values, len);
            SansStatus::Ok
        }
        Err(err) => reject("sans_evaluate", &err),
    }
}
