//! FFI interface for C/C++ hosts
//!
//! HTML goes in as a byte buffer, results come back as JSON strings.
//! Every returned `ExtractionResultFFI` must be released with
//! `ogp_free_result`.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use serde::Serialize;

use crate::document::Document;
use crate::dynamic::SchemaSpec;
use crate::error::{ExtractError, Result};
use crate::ogp;

/// Result struct returned to the host.
/// Exactly one pointer is non-null; both are owned by Rust.
#[repr(C)]
pub struct ExtractionResultFFI {
    /// JSON-serialized result (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Extract Open Graph page info as JSON.
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes, or be null
/// - Caller must free the result via `ogp_free_result`
#[no_mangle]
pub unsafe extern "C" fn ogp_extract_page_info(
    html_ptr: *const c_char,
    html_len: usize,
) -> ExtractionResultFFI {
    let html = match read_html(html_ptr, html_len) {
        Ok(html) => html,
        Err(msg) => return make_error_result(msg),
    };

    respond(ogp::page_info_from_document(&Document::parse(html)))
}

/// Extract according to a JSON schema declaration (see `SchemaSpec`).
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes, or be null
/// - `schema_json` must be a valid null-terminated C string
/// - Caller must free the result via `ogp_free_result`
#[no_mangle]
pub unsafe extern "C" fn ogp_extract_with_schema(
    html_ptr: *const c_char,
    html_len: usize,
    schema_json: *const c_char,
) -> ExtractionResultFFI {
    let html = match read_html(html_ptr, html_len) {
        Ok(html) => html,
        Err(msg) => return make_error_result(msg),
    };

    if schema_json.is_null() {
        return make_error_result(&ExtractError::invalid_target("schema JSON is null").to_string());
    }
    let schema_str = match CStr::from_ptr(schema_json).to_str() {
        Ok(s) => s,
        Err(_) => return make_error_result("Invalid UTF-8 in schema JSON"),
    };

    let result = SchemaSpec::from_json(schema_str).and_then(|spec| spec.extract(&Document::parse(html)));
    respond(result)
}

/// Free an ExtractionResultFFI returned by this library
///
/// # Safety
/// - `result` must have been returned by one of the `ogp_extract_*` functions
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn ogp_free_result(result: ExtractionResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

unsafe fn read_html<'a>(html_ptr: *const c_char, html_len: usize) -> std::result::Result<&'a str, &'static str> {
    if html_ptr.is_null() || html_len == 0 {
        return Ok("");
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    std::str::from_utf8(slice).map_err(|_| "Invalid UTF-8 in HTML content")
}

fn respond<T: Serialize>(result: Result<T>) -> ExtractionResultFFI {
    let value = match result {
        Ok(value) => value,
        Err(e) => return make_error_result(&e.to_string()),
    };

    match serde_json::to_string(&value) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => ExtractionResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result JSON contains null bytes"),
        },
        Err(e) => make_error_result(&format!("Failed to serialize result: {}", e)),
    }
}

fn make_error_result(msg: &str) -> ExtractionResultFFI {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    ExtractionResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}
