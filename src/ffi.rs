//! FFI bindings for Mobility Insight
//!
//! This module provides C-compatible functions for a rendering layer running
//! in another runtime. All functions use C strings (null-terminated) and
//! return allocated memory that must be freed by the caller using
//! `insight_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::ViewConfig;
use crate::pipeline::{analysis_to_view, InsightSession};

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

// ============================================================================
// Stateless API
// ============================================================================

/// Convert analysis JSON into a view envelope JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `insight_free_string`.
/// - Returns NULL on error; call `insight_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn insight_analysis_to_view(json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match analysis_to_view(json_str) {
        Ok(view) => string_to_cstr(&view),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Session API
// ============================================================================

/// Opaque handle to an InsightSession
pub struct InsightSessionHandle {
    session: InsightSession,
}

/// Create a new session.
///
/// # Safety
/// - `config_json` may be NULL (defaults) or a valid null-terminated C string.
/// - Returns a pointer that must be freed with `insight_session_free`.
/// - Returns NULL on error; call `insight_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn insight_session_new(config_json: *const c_char) -> *mut InsightSessionHandle {
    clear_last_error();

    let config = if config_json.is_null() {
        ViewConfig::default()
    } else {
        let json_str = match cstr_to_string(config_json) {
            Some(s) => s,
            None => {
                set_last_error("Invalid config string pointer");
                return ptr::null_mut();
            }
        };
        match ViewConfig::from_json(&json_str) {
            Ok(config) => config,
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        }
    };

    let handle = Box::new(InsightSessionHandle {
        session: InsightSession::with_config(config),
    });
    Box::into_raw(handle)
}

/// Free a session.
///
/// # Safety
/// - `session` must be a valid pointer returned by `insight_session_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn insight_session_free(session: *mut InsightSessionHandle) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Ingest an uploaded analysis payload and return the new current view.
///
/// On error the previous view stays current.
///
/// # Safety
/// - `session` must be a valid pointer returned by `insight_session_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `insight_free_string`.
/// - Returns NULL on error; call `insight_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn insight_session_ingest(
    session: *mut InsightSessionHandle,
    json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }
    let handle = &mut *session;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    if let Err(e) = handle.session.ingest(&json_str) {
        set_last_error(&e.to_string());
        return ptr::null_mut();
    }

    current_view_cstr(&handle.session)
}

/// Return the current view of a session.
///
/// # Safety
/// - `session` must be a valid pointer returned by `insight_session_new`.
/// - Returns a newly allocated string that must be freed with `insight_free_string`.
/// - Returns NULL when nothing was ingested yet (no error set) or on error.
#[no_mangle]
pub unsafe extern "C" fn insight_session_current(session: *const InsightSessionHandle) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    current_view_cstr(&(*session).session)
}

/// Drop the current view of a session.
///
/// # Safety
/// - `session` must be a valid pointer returned by `insight_session_new`, or NULL.
#[no_mangle]
pub unsafe extern "C" fn insight_session_clear(session: *mut InsightSessionHandle) {
    if !session.is_null() {
        (*session).session.clear();
    }
}

fn current_view_cstr(session: &InsightSession) -> *mut c_char {
    match session.current_json() {
        Ok(Some(json)) => string_to_cstr(&json),
        Ok(None) => ptr::null_mut(),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Insight functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by an Insight function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn insight_free_string(ptr: *mut c_char) {
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
/// - The returned pointer is valid until the next Insight function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn insight_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the Insight version string.
///
/// # Safety
/// - Returns a pointer to a static string; do NOT free it.
#[no_mangle]
pub unsafe extern "C" fn insight_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
