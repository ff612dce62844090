use anyhow::{bail, Context};
use std::ffi::{c_char, c_int, CStr, CString};
use std::ptr::{null, slice_from_raw_parts_mut};

/// Copies a mandatory C string.
///
/// # Safety
///
/// `pointer` must be null or point to a NUL-terminated string.
pub unsafe fn c_str_to_string(
    pointer: *const c_char,
    field: &str,
) -> Result<String, anyhow::Error> {
    let Some(value) = (unsafe { c_str_to_optional_string(pointer, field) })? else {
        bail!("{field} can't be null")
    };

    Ok(value)
}

/// # Safety
///
/// `pointer` must be null or point to a NUL-terminated string.
pub unsafe fn c_str_to_optional_string(
    pointer: *const c_char,
    field: &str,
) -> Result<Option<String>, anyhow::Error> {
    if pointer.is_null() {
        return Ok(None);
    }

    let value = unsafe { CStr::from_ptr(pointer) }
        .to_str()
        .with_context(|| format!("While reading {field} as UTF-8"))?;

    Ok(Some(value.to_owned()))
}

/// Borrows a caller-owned array for the duration of a call.
///
/// # Safety
///
/// When `count` is positive, `pointer` must be null or point to `count`
/// initialized values.
pub unsafe fn raw_slice<'a, T>(
    pointer: *const T,
    count: c_int,
    field: &str,
) -> Result<&'a [T], anyhow::Error> {
    let Ok(len) = usize::try_from(count) else {
        bail!("{field} count can't be negative: {count}")
    };

    if len == 0 {
        return Ok(&[]);
    }

    if pointer.is_null() {
        bail!("{field} can't be null when count is {count}")
    }

    Ok(unsafe { std::slice::from_raw_parts(pointer, len) })
}

pub fn count_to_c(len: usize, field: &str) -> Result<c_int, anyhow::Error> {
    c_int::try_from(len).with_context(|| format!("While exporting {field} count {len}"))
}

pub fn string_to_c(value: String, field: &str) -> Result<CString, anyhow::Error> {
    CString::new(value).with_context(|| format!("While exporting {field}"))
}

pub(crate) fn c_string_into_raw(value: Option<CString>) -> *const c_char {
    value
        .map(|x| x.into_raw() as *const c_char)
        .unwrap_or(null())
}

/// Leaks `values` as a C array; an empty vector becomes null.
pub(crate) fn vec_into_raw<T>(values: Vec<T>) -> *const T {
    if values.is_empty() {
        return null();
    }

    Box::into_raw(values.into_boxed_slice()) as *const T
}

/// # Safety
///
/// `pointer` must be null or come from [`c_string_into_raw`], and is released
/// at most once.
pub(crate) unsafe fn free_c_string(pointer: *const c_char) {
    if pointer.is_null() {
        return;
    }

    drop(unsafe { CString::from_raw(pointer as *mut c_char) });
}

/// # Safety
///
/// `pointer` must be null or come from [`vec_into_raw`] with exactly `count`
/// values, and is released at most once.
pub(crate) unsafe fn vec_from_raw<T>(pointer: *const T, count: c_int) -> Box<[T]> {
    let Ok(len) = usize::try_from(count) else {
        return Box::default();
    };

    if pointer.is_null() || len == 0 {
        return Box::default();
    }

    unsafe { Box::from_raw(slice_from_raw_parts_mut(pointer as *mut T, len)) }
}
