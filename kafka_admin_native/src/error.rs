use anyhow::anyhow;
use std::cell::RefCell;
use std::ffi::{c_char, c_int, CString};
use std::fmt::{Display, Formatter};
use std::panic::{self, AssertUnwindSafe};
use std::ptr::{null, null_mut};
use tracing::error;

/// Status returned by every entry point that does not hand back a pointer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 0,
    InvalidArgument = -1,
    InvalidHandle = -2,
    AdminError = -3,
    InternalError = -4,
}

#[derive(Debug)]
pub enum NativeError {
    InvalidArgument(anyhow::Error),
    InvalidHandle,
    Admin(anyhow::Error),
    Internal(anyhow::Error),
}

impl Display for NativeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NativeError::InvalidArgument(e) => write!(f, "Invalid argument: {e:#}"),
            NativeError::InvalidHandle => write!(f, "Invalid handle"),
            NativeError::Admin(e) => write!(f, "Admin error: {e:#}"),
            NativeError::Internal(e) => write!(f, "Internal error: {e:#}"),
        }
    }
}

impl From<&NativeError> for StatusCode {
    fn from(value: &NativeError) -> Self {
        match value {
            NativeError::InvalidArgument(_) => StatusCode::InvalidArgument,
            NativeError::InvalidHandle => StatusCode::InvalidHandle,
            NativeError::Admin(_) => StatusCode::AdminError,
            NativeError::Internal(_) => StatusCode::InternalError,
        }
    }
}

impl NativeError {
    fn report(self, operation: &str) -> StatusCode {
        match &self {
            NativeError::InvalidHandle => error!("Invalid handle, ignoring"),
            e => error!("{operation} failed: {e:?}"),
        }
        set_last_error(format!("{operation}: {self}"));

        StatusCode::from(&self)
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(message: String) {
    let message = CString::new(message.replace('\0', "")).unwrap_or_default();
    LAST_ERROR.with(|cell| *cell.borrow_mut() = Some(message));
}

/// Message of the latest failure on the calling thread, or null.
pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|cell| {
        cell.borrow()
            .as_ref()
            .map(|message| message.as_ptr())
            .unwrap_or(null())
    })
}

pub(crate) fn status_call(
    operation: &'static str,
    call: impl FnOnce() -> Result<(), NativeError>,
) -> c_int {
    let status = match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(())) => StatusCode::Ok,
        Ok(Err(e)) => e.report(operation),
        Err(_) => NativeError::Internal(anyhow!("Panic during {operation}")).report(operation),
    };

    status as c_int
}

pub(crate) fn pointer_call<T>(
    operation: &'static str,
    call: impl FnOnce() -> Result<*mut T, NativeError>,
) -> *mut T {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(pointer)) => pointer,
        Ok(Err(e)) => {
            e.report(operation);
            null_mut()
        }
        Err(_) => {
            NativeError::Internal(anyhow!("Panic during {operation}")).report(operation);
            null_mut()
        }
    }
}
