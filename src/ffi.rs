//! FFI interface for the extension host
//!
//! Provides C-compatible functions for analyzing a captured page.
//! All structured payloads cross the boundary as JSON.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::extractors::{extract_with, ExtractionOutcome, Selectors};
use crate::page::PageSnapshot;

/// Result struct returned to the host.
/// Both pointers are owned by Rust and must be freed via free_analyze_result
#[repr(C)]
pub struct AnalyzeResultFFI {
    /// JSON-serialized `{success, data, error}` envelope (null-terminated)
    pub json_ptr: *mut c_char,
    /// Transport-level error message (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Run extraction over an HTML document and return the outcome envelope.
///
/// Safe wrapper around the engine used by the C entry points below.
pub fn analyze(html: &str, selectors: &Selectors) -> ExtractionOutcome {
    let page = PageSnapshot::from_html(html);
    extract_with(&page, selectors).into()
}

/// Analyze a page with the default selector configuration.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
///
/// # Returns
/// AnalyzeResultFFI with either json_ptr set (success) or error_ptr set (failure)
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - Caller must free the result via `free_analyze_result`
#[no_mangle]
pub unsafe extern "C" fn analyze_page(
    html_ptr: *const c_char,
    html_len: usize,
) -> AnalyzeResultFFI {
    let html = if html_ptr.is_null() || html_len == 0 {
        String::new()
    } else {
        let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
        match std::str::from_utf8(slice) {
            Ok(s) => s.to_string(),
            Err(_) => {
                return make_error_result("Invalid UTF-8 in HTML content");
            }
        }
    };

    outcome_to_ffi(&analyze(&html, &Selectors::default()))
}

/// Analyze a page with a caller-supplied selector configuration.
///
/// # Safety
/// - Same as `analyze_page`
/// - `selectors_json` must be a valid null-terminated C string, or null to
///   use the defaults
#[no_mangle]
pub unsafe extern "C" fn analyze_page_with_selectors(
    html_ptr: *const c_char,
    html_len: usize,
    selectors_json: *const c_char,
) -> AnalyzeResultFFI {
    let html = if html_ptr.is_null() || html_len == 0 {
        String::new()
    } else {
        let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
        match std::str::from_utf8(slice) {
            Ok(s) => s.to_string(),
            Err(_) => {
                return make_error_result("Invalid UTF-8 in HTML content");
            }
        }
    };

    let selectors = if selectors_json.is_null() {
        Selectors::default()
    } else {
        let selectors_str = match CStr::from_ptr(selectors_json).to_str() {
            Ok(s) => s,
            Err(_) => {
                return make_error_result("Invalid UTF-8 in selectors JSON");
            }
        };
        match serde_json::from_str(selectors_str) {
            Ok(s) => s,
            Err(e) => {
                return make_error_result(&format!("Failed to parse selectors JSON: {}", e));
            }
        }
    };

    outcome_to_ffi(&analyze(&html, &selectors))
}

/// Free an AnalyzeResultFFI returned by the analyze functions
///
/// # Safety
/// - `result` must have been returned by `analyze_page` or
///   `analyze_page_with_selectors`
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_analyze_result(result: AnalyzeResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

fn outcome_to_ffi(outcome: &ExtractionOutcome) -> AnalyzeResultFFI {
    match serde_json::to_string(outcome) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => AnalyzeResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result JSON contains null bytes"),
        },
        Err(e) => make_error_result(&format!("Failed to serialize result: {}", e)),
    }
}

// Helper to create error result
fn make_error_result(msg: &str) -> AnalyzeResultFFI {
    let error_cstr = CString::new(msg).unwrap_or_else(|_| CString::new("Unknown error").unwrap());
    AnalyzeResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}
