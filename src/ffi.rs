//! FFI bindings for the wellness score engine
//!
//! This module provides C-compatible functions for calling the engine from
//! a host application. All functions use C strings (null-terminated) and
//! return allocated memory that must be freed by the caller using
//! `wellness_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::{DateTime, Utc};

use crate::config::PresentationConfig;
use crate::encoder::ReportEncoder;
use crate::error::ScoreError;
use crate::presentation::score_and_build;
use crate::source::{demo_metrics, HealthDataSource, LiveSource};
use crate::state::DashboardStore;
use crate::types::{DataOrigin, HealthMetrics};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Hand a result back across the boundary, recording the error on failure
fn into_c_result(result: Result<String, ScoreError>) -> *mut c_char {
    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

fn report_json(metrics: &HealthMetrics, origin: DataOrigin) -> Result<String, ScoreError> {
    let view = score_and_build(metrics, origin, &PresentationConfig::default());
    ReportEncoder::new().encode_to_json(&view)
}

fn parse_now(raw: Option<String>) -> Result<DateTime<Utc>, ScoreError> {
    match raw {
        None => Ok(Utc::now()),
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| ScoreError::InvalidTimestamp(format!("{s}: {e}"))),
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Score a metrics JSON document and return a report JSON.
///
/// # Safety
/// - `metrics_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_compute_report(metrics_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(metrics_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid metrics string pointer");
            return ptr::null_mut();
        }
    };

    into_c_result(
        HealthMetrics::from_json(&json_str)
            .and_then(|metrics| report_json(&metrics, DataOrigin::Live)),
    )
}

/// Aggregate a record set JSON document and return a report JSON.
///
/// # Safety
/// - `records_json` must be a valid null-terminated C string.
/// - `now_rfc3339` may be NULL to end the window at the current time.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_aggregate_report(
    records_json: *const c_char,
    now_rfc3339: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(records_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid records string pointer");
            return ptr::null_mut();
        }
    };

    let now = if now_rfc3339.is_null() {
        None
    } else {
        match cstr_to_string(now_rfc3339) {
            Some(s) => Some(s),
            None => {
                set_last_error("Invalid timestamp string pointer");
                return ptr::null_mut();
            }
        }
    };

    into_c_result(
        parse_now(now)
            .and_then(|now| LiveSource::from_json(&json_str, now))
            .and_then(|source| source.fetch())
            .and_then(|metrics| report_json(&metrics, DataOrigin::Live)),
    )
}

/// Return the report for the fixed demo week.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
#[no_mangle]
pub unsafe extern "C" fn wellness_demo_report() -> *mut c_char {
    clear_last_error();
    into_c_result(report_json(&demo_metrics(), DataOrigin::Demo))
}

// ============================================================================
// Stateful Store API
// ============================================================================

/// Opaque handle to a DashboardStore
pub struct WellnessStoreHandle {
    store: DashboardStore,
}

/// Create a new dashboard store configured from the environment.
///
/// # Safety
/// - Must be freed with `wellness_store_free`.
/// - Returns NULL if the environment holds invalid configuration.
#[no_mangle]
pub unsafe extern "C" fn wellness_store_new() -> *mut WellnessStoreHandle {
    clear_last_error();

    match PresentationConfig::from_env() {
        Ok(config) => Box::into_raw(Box::new(WellnessStoreHandle {
            store: DashboardStore::new(config),
        })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a dashboard store.
///
/// # Safety
/// - `store` must be a valid pointer returned by `wellness_store_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn wellness_store_free(store: *mut WellnessStoreHandle) {
    if !store.is_null() {
        drop(Box::from_raw(store));
    }
}

/// Publish metrics into the store and return the new state JSON.
///
/// `is_live` is non-zero when the metrics came from the platform. A NULL
/// `metrics_json` publishes the demo week.
///
/// # Safety
/// - `store` must be a valid pointer returned by `wellness_store_new`.
/// - `metrics_json` must be a valid null-terminated C string or NULL.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_store_apply(
    store: *mut WellnessStoreHandle,
    metrics_json: *const c_char,
    is_live: i32,
) -> *mut c_char {
    clear_last_error();

    if store.is_null() {
        set_last_error("Null store pointer");
        return ptr::null_mut();
    }

    let handle = &mut *store;

    let (metrics, origin) = match cstr_to_string(metrics_json) {
        Some(json) => match HealthMetrics::from_json(&json) {
            Ok(metrics) if is_live != 0 => (metrics, DataOrigin::Live),
            Ok(metrics) => (metrics, DataOrigin::Demo),
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        },
        None => (demo_metrics(), DataOrigin::Demo),
    };

    let state = handle.store.apply(&metrics, origin);
    into_c_result(
        serde_json::to_string(state.as_ref())
            .map_err(|e| ScoreError::EncodingError(e.to_string())),
    )
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by wellness functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a wellness function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn wellness_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next wellness function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn wellness_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn wellness_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
