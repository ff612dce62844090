//! Owned access to the librdkafka admin requests rdkafka has no wrapper for.
//!
//! Every request gets its own result queue and is waited on synchronously, so
//! callers run it inside `spawn_blocking`.

use crate::admin::RdAdminClient;
use crate::models::Node;
use anyhow::{anyhow, bail};
use rdkafka::bindings::{
    rd_kafka_AdminOptions_destroy, rd_kafka_AdminOptions_new,
    rd_kafka_AdminOptions_set_include_authorized_operations,
    rd_kafka_AdminOptions_set_request_timeout, rd_kafka_AdminOptions_t, rd_kafka_Node_host,
    rd_kafka_Node_id, rd_kafka_Node_port, rd_kafka_Node_rack, rd_kafka_Node_t,
    rd_kafka_TopicCollection_destroy, rd_kafka_TopicCollection_t, rd_kafka_admin_op_t,
    rd_kafka_error_code, rd_kafka_error_destroy, rd_kafka_error_string, rd_kafka_error_t,
    rd_kafka_event_destroy, rd_kafka_event_error, rd_kafka_event_error_string, rd_kafka_event_t,
    rd_kafka_queue_destroy, rd_kafka_queue_new, rd_kafka_queue_poll, rd_kafka_queue_t,
    rd_kafka_resp_err_t, rd_kafka_t,
};
use rdkafka::types::RDKafkaErrorCode;
use std::ffi::{c_char, c_int, CStr};
use std::ptr::NonNull;
use std::time::Duration;

// Extra wait on top of the request timeout, so the broker-side timeout is reported
const POLL_GRACE: Duration = Duration::from_secs(1);

/// # Safety
///
/// `DROP` must release exactly the object it is given.
pub(crate) unsafe trait NativeDrop {
    const DROP: unsafe extern "C" fn(*mut Self);
}

unsafe impl NativeDrop for rd_kafka_queue_t {
    const DROP: unsafe extern "C" fn(*mut Self) = rd_kafka_queue_destroy;
}

unsafe impl NativeDrop for rd_kafka_AdminOptions_t {
    const DROP: unsafe extern "C" fn(*mut Self) = rd_kafka_AdminOptions_destroy;
}

unsafe impl NativeDrop for rd_kafka_event_t {
    const DROP: unsafe extern "C" fn(*mut Self) = rd_kafka_event_destroy;
}

unsafe impl NativeDrop for rd_kafka_TopicCollection_t {
    const DROP: unsafe extern "C" fn(*mut Self) = rd_kafka_TopicCollection_destroy;
}

unsafe impl NativeDrop for rd_kafka_error_t {
    const DROP: unsafe extern "C" fn(*mut Self) = rd_kafka_error_destroy;
}

/// A librdkafka object destroyed on drop.
pub(crate) struct NativePtr<T: NativeDrop> {
    ptr: NonNull<T>,
}

impl<T: NativeDrop> NativePtr<T> {
    /// # Safety
    ///
    /// `ptr` must be null or an object the caller owns.
    pub(crate) unsafe fn from_ptr(ptr: *mut T) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr })
    }

    pub(crate) fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T: NativeDrop> Drop for NativePtr<T> {
    fn drop(&mut self) {
        unsafe { T::DROP(self.ptr.as_ptr()) }
    }
}

pub(crate) struct AdminRequest {
    native: *mut rd_kafka_t,
    options: NativePtr<rd_kafka_AdminOptions_t>,
    queue: NativePtr<rd_kafka_queue_t>,
    timeout: Duration,
}

impl AdminRequest {
    /// The request borrows the client's native handle, so `client` must
    /// outlive it.
    pub(crate) fn new(
        client: &RdAdminClient,
        operation: rd_kafka_admin_op_t,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let native = client.inner().native_ptr();

        let queue = unsafe { NativePtr::from_ptr(rd_kafka_queue_new(native)) }
            .ok_or_else(|| anyhow!("Failed to create admin result queue"))?;
        let options = unsafe { NativePtr::from_ptr(rd_kafka_AdminOptions_new(native, operation)) }
            .ok_or_else(|| anyhow!("Failed to create admin options for {operation:?}"))?;

        let mut err_buf = [0 as c_char; 512];
        let code = unsafe {
            rd_kafka_AdminOptions_set_request_timeout(
                options.ptr(),
                timeout_ms(timeout),
                err_buf.as_mut_ptr(),
                err_buf.len(),
            )
        };
        if code != rd_kafka_resp_err_t::RD_KAFKA_RESP_ERR_NO_ERROR {
            let message = unsafe { optional_c_string(err_buf.as_ptr()) }.unwrap_or_default();
            bail!("While setting request timeout: {message}")
        }

        Ok(Self {
            native,
            options,
            queue,
            timeout,
        })
    }

    pub(crate) fn include_authorized_operations(&self) -> Result<(), anyhow::Error> {
        let error = unsafe {
            NativePtr::from_ptr(rd_kafka_AdminOptions_set_include_authorized_operations(
                self.options.ptr(),
                1,
            ))
        };

        match error {
            Some(error) => bail!(
                "While requesting authorized operations: {}",
                unsafe { error_message(error.ptr()) }.unwrap_or_default()
            ),
            None => Ok(()),
        }
    }

    pub(crate) fn native(&self) -> *mut rd_kafka_t {
        self.native
    }

    pub(crate) fn options(&self) -> *const rd_kafka_AdminOptions_t {
        self.options.ptr()
    }

    pub(crate) fn queue(&self) -> *mut rd_kafka_queue_t {
        self.queue.ptr()
    }

    /// Waits for the result event. A request-level error fails the call.
    pub(crate) fn wait(&self) -> Result<NativePtr<rd_kafka_event_t>, anyhow::Error> {
        let poll_timeout = timeout_ms(self.timeout + POLL_GRACE);
        let event = unsafe { NativePtr::from_ptr(rd_kafka_queue_poll(self.queue(), poll_timeout)) }
            .ok_or_else(|| anyhow!("No admin result after {:?}", self.timeout))?;

        let code = unsafe { rd_kafka_event_error(event.ptr()) };
        if code != rd_kafka_resp_err_t::RD_KAFKA_RESP_ERR_NO_ERROR {
            let message =
                unsafe { optional_c_string(rd_kafka_event_error_string(event.ptr())) }
                    .unwrap_or_default();
            bail!("{}: {message}", RDKafkaErrorCode::from(code))
        }

        Ok(event)
    }
}

pub(crate) fn timeout_ms(timeout: Duration) -> c_int {
    timeout.as_millis().min(c_int::MAX as u128) as c_int
}

/// # Safety
///
/// `ptr` must be null or a NUL-terminated string.
pub(crate) unsafe fn optional_c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }

    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

/// Borrows an array owned by a result event.
///
/// # Safety
///
/// `ptr` must be null or point to `count` values that outlive `'a`.
pub(crate) unsafe fn native_array<'a, T>(ptr: *const T, count: usize) -> &'a [T] {
    if ptr.is_null() || count == 0 {
        return &[];
    }

    unsafe { std::slice::from_raw_parts(ptr, count) }
}

/// `None` for a null error or one carrying no error code.
///
/// # Safety
///
/// `error` must be null or a live error object.
pub(crate) unsafe fn error_message(error: *const rd_kafka_error_t) -> Option<String> {
    if error.is_null() {
        return None;
    }

    let code = unsafe { rd_kafka_error_code(error) };
    if code == rd_kafka_resp_err_t::RD_KAFKA_RESP_ERR_NO_ERROR {
        return None;
    }

    let message = unsafe { optional_c_string(rd_kafka_error_string(error)) }.unwrap_or_default();
    Some(format!("{}: {message}", RDKafkaErrorCode::from(code)))
}

/// # Safety
///
/// `node` must point to a node owned by a live result event.
pub(crate) unsafe fn node_from_native(node: *const rd_kafka_Node_t) -> Node {
    unsafe {
        Node {
            id: rd_kafka_Node_id(node),
            host: optional_c_string(rd_kafka_Node_host(node)).unwrap_or_default(),
            port: i32::from(rd_kafka_Node_port(node)),
            rack: optional_c_string(rd_kafka_Node_rack(node)),
        }
    }
}

/// librdkafka prints ids in standard base64; Kafka tools print them URL-safe
/// and unpadded.
pub(crate) fn kafka_uuid_string(base64: &str) -> String {
    base64
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr::null;

    #[test]
    fn timeout_is_clamped_to_c_int() {
        assert_eq!(timeout_ms(Duration::from_secs(30)), 30_000);
        assert_eq!(timeout_ms(Duration::from_secs(u64::MAX)), c_int::MAX);
    }

    #[test]
    fn null_string_is_none() {
        assert_eq!(unsafe { optional_c_string(null()) }, None);

        let rack = CString::new("rack1").unwrap();
        assert_eq!(
            unsafe { optional_c_string(rack.as_ptr()) }.as_deref(),
            Some("rack1")
        );
    }

    #[test]
    fn null_array_is_empty() {
        assert!(unsafe { native_array::<u8>(null(), 3) }.is_empty());

        let values = [1, 2];
        assert_eq!(unsafe { native_array(values.as_ptr(), 2) }, &[1, 2]);
    }

    #[test]
    fn null_error_has_no_message() {
        assert_eq!(unsafe { error_message(null()) }, None);
    }

    #[test]
    fn topic_id_is_printed_url_safe() {
        assert_eq!(
            kafka_uuid_string("5L6g3nShT+eMCtK//X86sw"),
            "5L6g3nShT-eMCtK__X86sw"
        );
        assert_eq!(kafka_uuid_string("Xx6cY6WyQ5O4Zu0eTJqd8A=="), "Xx6cY6WyQ5O4Zu0eTJqd8A");
    }
}
