//! FFI functions for Runtime management.

use super::curve::CurveHandle;
use super::types::{CompletionCallback, CurveCallback, ProgressCallback, SansStatus};
use crate::data::Curve;
use crate::runtime::{Runtime, RuntimeConfig};
use std::ffi::c_void;
use tracing::warn;

/// Opaque handle to a Runtime.
pub type RuntimeHandle = *mut Runtime;

/// Configuration for creating a runtime.
#[repr(C)]
#[derive(Debug, Clone, Default)]
pub struct CRuntimeConfig {
    /// Number of worker threads (0 = auto-detect).
    pub worker_count: usize,
    /// Minimum curve length evaluated point-parallel (0 = default).
    pub parallel_threshold: usize,
}

impl From<CRuntimeConfig> for RuntimeConfig {
    fn from(c: CRuntimeConfig) -> Self {
        let defaults = RuntimeConfig::default();
        RuntimeConfig {
            worker_count: if c.worker_count == 0 {
                defaults.worker_count
            } else {
                c.worker_count
            },
            parallel_threshold: if c.parallel_threshold == 0 {
                defaults.parallel_threshold
            } else {
                c.parallel_threshold
            },
        }
    }
}

/// Create a new runtime.
///
/// # Safety
/// out_handle must be a valid pointer; config may be null for defaults.
#[no_mangle]
pub unsafe extern "C" fn sans_runtime_create(
    config: *const CRuntimeConfig,
    out_handle: *mut RuntimeHandle,
) -> SansStatus {
    if out_handle.is_null() {
        return SansStatus::NullPointer;
    }

    let cfg = if config.is_null() {
        RuntimeConfig::default()
    } else {
        (*config).clone().into()
    };

    match Runtime::new(cfg) {
        Ok(runtime) => {
            *out_handle = Box::into_raw(Box::new(runtime));
            SansStatus::Ok
        }
        Err(err) => {
            warn!(error = %err, "sans_runtime_create failed");
            SansStatus::from(&err)
        }
    }
}

/// Free a runtime handle, waiting for a running batch to finish.
///
/// # Safety
/// Handle must be valid or null.
#[no_mangle]
pub unsafe extern "C" fn sans_runtime_free(handle: RuntimeHandle) {
    if !handle.is_null() {
        let mut runtime = Box::from_raw(handle);
        if let Err(err) = runtime.wait() {
            warn!(error = %err, "batch failed while freeing runtime");
        }
    }
}

/// Add a curve to the runtime batch.
///
/// # Safety
/// Both handles must be valid. Curve ownership is transferred to the runtime.
#[no_mangle]
pub unsafe extern "C" fn sans_runtime_add_curve(
    runtime: RuntimeHandle,
    curve: CurveHandle,
) -> SansStatus {
    if runtime.is_null() || curve.is_null() {
        return SansStatus::NullPointer;
    }

    let rt = &mut *runtime;
    let curve = Box::from_raw(curve);
    rt.add_curve(*curve);

    SansStatus::Ok
}

/// Evaluate the batch asynchronously.
///
/// This function returns immediately. `on_curve` is invoked from worker
/// threads for every evaluated curve and `on_complete` once at the end.
///
/// # Safety
/// Runtime handle must be valid. Callbacks and user_data must remain valid
/// until the completion callback is invoked.
#[no_mangle]
pub unsafe extern "C" fn sans_runtime_run_async(
    runtime: RuntimeHandle,
    on_complete: CompletionCallback,
    on_progress: ProgressCallback,
    on_curve: CurveCallback,
    user_data: *mut c_void,
) -> SansStatus {
    if runtime.is_null() {
        return SansStatus::NullPointer;
    }

    let rt = &mut *runtime;

    // Carried as usize so the closures are Send
    let user_data = user_data as usize;

    let complete_cb = move |status: SansStatus| {
        on_complete(user_data as *mut c_void, status);
    };

    let progress_cb = move |completed: usize, total: usize| {
        on_progress(user_data as *mut c_void, completed, total);
    };

    let curve_cb = move |curve: &Curve| {
        // ids coming from C cannot contain interior NULs
        let id = std::ffi::CString::new(curve.id.as_str()).unwrap_or_default();
        on_curve(
            user_data as *mut c_void,
            id.as_ptr(),
            curve.intensity.as_ptr(),
            curve.intensity.len(),
        );
    };

    match rt.run_async(complete_cb, progress_cb, curve_cb) {
        Ok(()) => SansStatus::Ok,
        Err(error) => {
            warn!(error = %error, "sans_runtime_run_async rejected");
            SansStatus::from(&error)
        }
    }
}

/// Evaluate the batch synchronously (blocking).
///
/// Returns `Cancelled` if the batch was cancelled from another thread.
///
/// # Safety
/// Runtime handle must be valid.
#[no_mangle]
pub unsafe extern "C" fn sans_runtime_run_sync(runtime: RuntimeHandle) -> SansStatus {
    if runtime.is_null() {
        return SansStatus::NullPointer;
    }

    (*runtime).run_sync().status()
}

/// Block until a running asynchronous batch has finished.
///
/// # Safety
/// Runtime handle must be valid.
#[no_mangle]
pub unsafe extern "C" fn sans_runtime_wait(runtime: RuntimeHandle) -> SansStatus {
    if runtime.is_null() {
        return SansStatus::NullPointer;
    }

    match (*runtime).wait() {
        Ok(summary) => summary.status(),
        Err(err) => {
            warn!(error = %err, "sans_runtime_wait failed");
            SansStatus::from(&err)
        }
    }
}

/// Get the number of evaluated curves not yet taken.
#[no_mangle]
pub unsafe extern "C" fn sans_runtime_completed_count(runtime: RuntimeHandle) -> usize {
    if runtime.is_null() {
        return 0;
    }
    (*runtime).completed_count()
}

/// Get the number of curves whose evaluation failed.
#[no_mangle]
pub unsafe extern "C" fn sans_runtime_failed_count(runtime: RuntimeHandle) -> usize {
    if runtime.is_null() {
        return 0;
    }
    (*runtime).failed_count()
}

/// Get the number of curves waiting for the next run.
#[no_mangle]
pub unsafe extern "C" fn sans_runtime_pending_count(runtime: RuntimeHandle) -> usize {
    if runtime.is_null() {
        return 0;
    }
    (*runtime).pending_count()
}

/// Move evaluated curves out of the runtime.
///
/// At most `max_count` curves are returned; the rest stay available for a
/// later call. The caller owns the returned handles.
///
/// # Safety
/// Runtime handle and output arrays must be valid.
/// out_handles must have capacity for at least `max_count` pointers.
#[no_mangle]
pub unsafe extern "C" fn sans_runtime_take_completed(
    runtime: RuntimeHandle,
    out_handles: *mut CurveHandle,
    max_count: usize,
    out_count: *mut usize,
) -> SansStatus {
    if runtime.is_null() || out_handles.is_null() || out_count.is_null() {
        return SansStatus::NullPointer;
    }

    let rt = &mut *runtime;
    let mut curves = rt.take_completed();
    if curves.len() > max_count {
        let excess = curves.split_off(max_count);
        rt.add_completed(excess);
    }

    let count = curves.len();
    for (i, curve) in curves.into_iter().enumerate() {
        *out_handles.add(i) = Box::into_raw(Box::new(curve));
    }

    *out_count = count;
    SansStatus::Ok
}

/// Cancel all pending operations.
#[no_mangle]
pub unsafe extern "C" fn sans_runtime_cancel(runtime: RuntimeHandle) -> SansStatus {
    if runtime.is_null() {
        return SansStatus::NullPointer;
    }

    (*runtime).cancel();
    SansStatus::Ok
}

/// Reset the runtime for reuse.
#[no_mangle]
pub unsafe extern "C" fn sans_runtime_reset(runtime: RuntimeHandle) -> SansStatus {
    if runtime.is_null() {
        return SansStatus::NullPointer;
    }

    (*runtime).reset();
    SansStatus::Ok
}
