//! `extern "C"` surface of the library.
//!
//! Every entry point catches panics, reports failures through its return value
//! and records a message for [`last_error_message`]. Inbound records are copied
//! before any work is done.

use crate::abi::{
    RawContextParams, RawCreateTopicsResult, RawDescribeClusterResult, RawKeyValue, RawNewTopic,
};
use crate::converters::{
    c_str_to_string, create_topics_result_to_raw, describe_cluster_result_to_raw,
    free_raw_create_topics_result, free_raw_describe_cluster_result, raw_key_values_to_internal,
    raw_new_topics_to_internal,
};
use crate::error::{last_error_ptr, pointer_call, status_call, NativeError};
use crate::isolate::{create_context_with_factory, isolate_of, Isolate, IsolateThread};
use anyhow::{anyhow, Context};
use kafka_admin::admin::{KafkaAdmin, RdKafkaAdminFactory};
use kafka_admin::commands::create_topics::CreateTopicsCommandInternal;
use kafka_admin::connection_settings::ConnectionSettings;
use kafka_admin::queries::describe_cluster::DescribeClusterQueryInternal;
use std::ffi::{c_char, c_int, c_void};
use std::sync::Arc;
use tracing::{debug, info};

/// # Safety
///
/// See [`create_context_with_factory`].
#[no_mangle]
pub unsafe extern "C" fn create_context(
    params: *const RawContextParams,
    context: *mut *mut Isolate,
    thread: *mut *mut IsolateThread,
) -> c_int {
    let factory = Arc::new(RdKafkaAdminFactory);

    unsafe { create_context_with_factory(params, factory, context, thread) }
}

/// Destroys the context `thread` belongs to, closing its admin clients.
///
/// # Safety
///
/// `thread` must be null or come from [`create_context`], and is torn down at
/// most once.
#[no_mangle]
pub unsafe extern "C" fn tear_down(thread: *mut IsolateThread) -> c_int {
    status_call("tear_down", || {
        if thread.is_null() {
            return Err(NativeError::InvalidArgument(anyhow!("Thread can't be null")));
        }

        let thread = unsafe { Box::from_raw(thread) };
        thread.tear_down();
        info!("Context torn down");

        Ok(())
    })
}

/// # Safety
///
/// `thread` must be null or live, `text` null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn experiment(thread: *const IsolateThread, text: *const c_char) -> c_int {
    status_call("experiment", || {
        let isolate = unsafe { isolate_of(thread) }?;
        let text =
            unsafe { c_str_to_string(text, "text") }.map_err(NativeError::InvalidArgument)?;

        isolate
            .block_on(async move {
                tokio::spawn(async move {
                    info!("Calling experiment (Rust side): {text}");
                })
                .await
            })
            .context("While running experiment")
            .map_err(NativeError::Internal)
    })
}

/// Returns an opaque handle, or null on failure.
///
/// # Safety
///
/// `kvs` must point to `kv_count` records that are valid for the call.
#[no_mangle]
pub unsafe extern "C" fn create_admin_client(
    thread: *const IsolateThread,
    kv_count: c_int,
    kvs: *const RawKeyValue,
) -> *mut c_void {
    pointer_call("create_admin_client", || {
        let isolate = unsafe { isolate_of(thread) }?;
        let key_values = unsafe { raw_key_values_to_internal(kv_count, kvs) }
            .map_err(NativeError::InvalidArgument)?;

        let settings =
            ConnectionSettings::try_from(key_values).map_err(NativeError::InvalidArgument)?;
        debug!("Creating admin client for {}", settings.bootstrap_servers());

        let admin = isolate
            .factory()
            .create(&settings)
            .map_err(NativeError::Admin)?;

        Ok(isolate.admins().create(admin))
    })
}

/// # Safety
///
/// `thread` must be null or live.
#[no_mangle]
pub unsafe extern "C" fn delete_admin_client(
    thread: *const IsolateThread,
    handle: *const c_void,
) -> c_int {
    status_call("delete_admin_client", || {
        let isolate = unsafe { isolate_of(thread) }?;

        isolate
            .admins()
            .destroy(handle)
            .ok_or(NativeError::InvalidHandle)?;

        Ok(())
    })
}

/// # Safety
///
/// `thread` must be null or live.
#[no_mangle]
pub unsafe extern "C" fn describe_cluster(
    thread: *const IsolateThread,
    handle: *const c_void,
) -> *const RawDescribeClusterResult {
    pointer_call("describe_cluster", || {
        let (isolate, admin) = unsafe { resolve_admin(thread, handle) }?;

        let result = isolate
            .block_on(admin.describe_cluster(DescribeClusterQueryInternal::default()))
            .map_err(NativeError::Admin)?;
        debug!("Cluster has {} node(s)", result.num_nodes());

        describe_cluster_result_to_raw(result).map_err(NativeError::Internal)
    }) as *const RawDescribeClusterResult
}

/// Null `result` is ignored.
///
/// # Safety
///
/// `result` must be null or come from [`describe_cluster`], and is freed at
/// most once.
#[no_mangle]
pub unsafe extern "C" fn free_describe_cluster_result(
    _thread: *const IsolateThread,
    result: *const RawDescribeClusterResult,
) -> c_int {
    status_call("free_describe_cluster_result", || {
        unsafe { free_raw_describe_cluster_result(result as *mut RawDescribeClusterResult) };
        Ok(())
    })
}

/// Per-topic failures are reported inside the result.
///
/// # Safety
///
/// `new_topics` must point to `num_new_topics` records that are valid for the
/// call.
#[no_mangle]
pub unsafe extern "C" fn create_topics(
    thread: *const IsolateThread,
    handle: *const c_void,
    num_new_topics: c_int,
    new_topics: *const RawNewTopic,
) -> *const RawCreateTopicsResult {
    pointer_call("create_topics", || {
        let (isolate, admin) = unsafe { resolve_admin(thread, handle) }?;
        let topics = unsafe { raw_new_topics_to_internal(num_new_topics, new_topics) }
            .map_err(NativeError::InvalidArgument)?;

        let result = isolate
            .block_on(admin.create_topics(CreateTopicsCommandInternal::new(topics)))
            .map_err(NativeError::Admin)?;
        debug!(
            "Created {} topic(s), {} failed",
            result.num_topics(),
            result.failed().count()
        );

        create_topics_result_to_raw(result).map_err(NativeError::Internal)
    }) as *const RawCreateTopicsResult
}

/// Null `result` is ignored.
///
/// # Safety
///
/// `result` must be null or come from [`create_topics`], and is freed at most
/// once.
#[no_mangle]
pub unsafe extern "C" fn free_create_topics_result(
    _thread: *const IsolateThread,
    result: *const RawCreateTopicsResult,
) -> c_int {
    status_call("free_create_topics_result", || {
        unsafe { free_raw_create_topics_result(result as *mut RawCreateTopicsResult) };
        Ok(())
    })
}

/// Message of the latest failed call on this OS thread, or null. It stays
/// valid until the next failing call on the same thread.
#[no_mangle]
pub extern "C" fn last_error_message() -> *const c_char {
    last_error_ptr()
}

unsafe fn resolve_admin<'a>(
    thread: *const IsolateThread,
    handle: *const c_void,
) -> Result<(&'a Isolate, Arc<dyn KafkaAdmin>), NativeError> {
    let isolate = unsafe { isolate_of(thread) }?;
    let admin = isolate
        .admins()
        .get(handle)
        .ok_or(NativeError::InvalidHandle)?;

    Ok((isolate, admin))
}
