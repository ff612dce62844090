//! `#[repr(C)]` records shared with native callers.
//!
//! Field order and types must match `include/kafka_admin_native.h`. Pointers in
//! records produced by this library stay valid until the record is handed to
//! the matching `free_*` entry point. Records passed in by the caller are only
//! read for the duration of the call.

use std::ffi::{c_char, c_int};
use std::ptr::null;

/// `key_value_t`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawKeyValue {
    pub key: *const c_char,
    pub value: *const c_char,
}

/// `node_t`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawNode {
    pub id: c_int,
    pub host: *const c_char,
    pub port: c_int,
    pub rack: *const c_char,
}

/// `describe_cluster_result_t`
///
/// `nodes` holds `num_nodes` entries and `authorized_operations` holds
/// `num_authorized_operations` one-byte ACL operation codes. Both are null
/// when their count is zero. `controller` and `cluster_id` are null when the
/// cluster did not report them.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawDescribeClusterResult {
    pub num_nodes: c_int,
    pub nodes: *const RawNode,
    pub controller: *const RawNode,
    pub cluster_id: *const c_char,
    pub num_authorized_operations: c_int,
    pub authorized_operations: *const c_char,
}

/// `new_topic_t`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawNewTopic {
    pub name: *const c_char,
    pub num_partitions: c_int,
    pub replication_factor: i16,
}

/// `create_topic_result_t`
///
/// A non-empty `error` marks the topic as failed; `uuid` is then null and the
/// counts are zero.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawCreateTopicResult {
    pub topic: *const c_char,
    pub error: *const c_char,
    pub uuid: *const c_char,
    pub num_partitions: c_int,
    pub replication_factor: c_int,
}

/// `create_topics_result_t`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawCreateTopicsResult {
    pub num_topics: c_int,
    pub topics: *const RawCreateTopicResult,
}

pub const CONTEXT_PARAMS_VERSION: c_int = 1;

/// `context_params_t`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawContextParams {
    pub version: c_int,
    /// Zero picks the runtime default.
    pub worker_threads: c_int,
}

impl Default for RawContextParams {
    fn default() -> Self {
        Self {
            version: CONTEXT_PARAMS_VERSION,
            worker_threads: 0,
        }
    }
}

impl Default for RawDescribeClusterResult {
    fn default() -> Self {
        Self {
            num_nodes: 0,
            nodes: null(),
            controller: null(),
            cluster_id: null(),
            num_authorized_operations: 0,
            authorized_operations: null(),
        }
    }
}

impl Default for RawCreateTopicsResult {
    fn default() -> Self {
        Self {
            num_topics: 0,
            topics: null(),
        }
    }
}
