use crate::abi::{RawDescribeClusterResult, RawNode};
use crate::converters::shared::{
    c_str_to_optional_string, c_str_to_string, c_string_into_raw, count_to_c, free_c_string,
    raw_slice, string_to_c, vec_from_raw, vec_into_raw,
};
use anyhow::Context;
use kafka_admin::models::{AclOperation, Node};
use kafka_admin::queries::describe_cluster::DescribeClusterResult;
use std::ffi::{c_char, c_int, CString};
use std::ptr::null;

// Strings are converted before anything is leaked, so a failed export leaks nothing
struct StagedNode {
    id: c_int,
    host: CString,
    port: c_int,
    rack: Option<CString>,
}

impl StagedNode {
    fn stage(node: Node) -> Result<Self, anyhow::Error> {
        let host = string_to_c(node.host, "node host")?;
        let rack = node
            .rack
            .map(|rack| string_to_c(rack, "node rack"))
            .transpose()?;

        Ok(Self {
            id: node.id,
            host,
            port: node.port,
            rack,
        })
    }

    fn into_raw(self) -> RawNode {
        RawNode {
            id: self.id,
            host: self.host.into_raw(),
            port: self.port,
            rack: c_string_into_raw(self.rack),
        }
    }
}

pub fn describe_cluster_result_to_raw(
    model: DescribeClusterResult,
) -> Result<*mut RawDescribeClusterResult, anyhow::Error> {
    let num_nodes = count_to_c(model.nodes.len(), "nodes")?;
    let num_authorized_operations =
        count_to_c(model.authorized_operations.len(), "authorized operations")?;

    let nodes = model
        .nodes
        .into_iter()
        .map(StagedNode::stage)
        .collect::<Result<Vec<_>, _>>()
        .context("While exporting nodes")?;
    let controller = model
        .controller
        .map(StagedNode::stage)
        .transpose()
        .context("While exporting controller")?;
    let cluster_id = model
        .cluster_id
        .map(|cluster_id| string_to_c(cluster_id, "cluster id"))
        .transpose()?;
    let authorized_operations = model
        .authorized_operations
        .iter()
        .map(|operation| operation.code() as c_char)
        .collect::<Vec<_>>();

    let raw = RawDescribeClusterResult {
        num_nodes,
        nodes: vec_into_raw(nodes.into_iter().map(StagedNode::into_raw).collect()),
        controller: controller
            .map(|controller| Box::into_raw(Box::new(controller.into_raw())) as *const RawNode)
            .unwrap_or(null()),
        cluster_id: c_string_into_raw(cluster_id),
        num_authorized_operations,
        authorized_operations: vec_into_raw(authorized_operations),
    };

    Ok(Box::into_raw(Box::new(raw)))
}

/// # Safety
///
/// `result` must be null or come from [`describe_cluster_result_to_raw`], and
/// is released at most once.
pub unsafe fn free_raw_describe_cluster_result(result: *mut RawDescribeClusterResult) {
    if result.is_null() {
        return;
    }

    let raw = unsafe { Box::from_raw(result) };

    for node in unsafe { vec_from_raw(raw.nodes, raw.num_nodes) }.iter() {
        unsafe { free_raw_node(node) };
    }

    if !raw.controller.is_null() {
        let controller = unsafe { Box::from_raw(raw.controller as *mut RawNode) };
        unsafe { free_raw_node(&controller) };
    }

    unsafe {
        free_c_string(raw.cluster_id);
        drop(vec_from_raw(
            raw.authorized_operations,
            raw.num_authorized_operations,
        ));
    }
}

unsafe fn free_raw_node(node: &RawNode) {
    unsafe {
        free_c_string(node.host);
        free_c_string(node.rack);
    }
}

/// Copies a describe-cluster record into owned values.
///
/// # Safety
///
/// Every pointer in `raw` must be null or valid for its declared count.
pub unsafe fn raw_describe_cluster_result_to_internal(
    raw: &RawDescribeClusterResult,
) -> Result<DescribeClusterResult, anyhow::Error> {
    let nodes = unsafe { raw_slice(raw.nodes, raw.num_nodes, "nodes") }?
        .iter()
        .map(|node| unsafe { raw_node_to_internal(node) })
        .collect::<Result<Vec<_>, _>>()?;

    let controller = match unsafe { raw.controller.as_ref() } {
        Some(controller) => Some(unsafe { raw_node_to_internal(controller) }?),
        None => None,
    };

    let cluster_id = unsafe { c_str_to_optional_string(raw.cluster_id, "cluster id") }?;

    let authorized_operations = unsafe {
        raw_slice(
            raw.authorized_operations,
            raw.num_authorized_operations,
            "authorized operations",
        )
    }?
    .iter()
    .map(|code| AclOperation::from(*code as i8))
    .collect();

    Ok(DescribeClusterResult {
        nodes,
        controller,
        cluster_id,
        authorized_operations,
    })
}

unsafe fn raw_node_to_internal(raw: &RawNode) -> Result<Node, anyhow::Error> {
    Ok(Node {
        id: raw.id,
        host: unsafe { c_str_to_string(raw.host, "node host") }?,
        port: raw.port,
        rack: unsafe { c_str_to_optional_string(raw.rack, "node rack") }?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i32, port: i32, rack: &str) -> Node {
        Node {
            id,
            host: "127.0.0.1".to_owned(),
            port,
            rack: Some(rack.to_owned()),
        }
    }

    fn cluster() -> DescribeClusterResult {
        DescribeClusterResult {
            nodes: vec![node(1, 19092, "rack1"), node(2, 29092, "rack2")],
            controller: Some(node(1, 19092, "rack1")),
            cluster_id: Some("5L6g3nShT-eMCtK--X86sw".to_owned()),
            authorized_operations: vec![AclOperation::Describe, AclOperation::Alter],
        }
    }

    #[test]
    fn node_count_matches_nodes() {
        let raw = describe_cluster_result_to_raw(cluster()).unwrap();

        let num_nodes = unsafe { (*raw).num_nodes };
        assert_eq!(num_nodes, 2);
        assert_eq!(unsafe { (*raw).num_authorized_operations }, 2);

        unsafe { free_raw_describe_cluster_result(raw) };
    }

    #[test]
    fn exported_cluster_reads_back_unchanged() {
        let raw = describe_cluster_result_to_raw(cluster()).unwrap();

        let read_back = unsafe { raw_describe_cluster_result_to_internal(&*raw) }.unwrap();
        unsafe { free_raw_describe_cluster_result(raw) };

        assert_eq!(read_back, cluster());
    }

    #[test]
    fn missing_parts_export_as_null() {
        let empty = DescribeClusterResult {
            nodes: vec![],
            controller: None,
            cluster_id: None,
            authorized_operations: vec![],
        };

        let raw = describe_cluster_result_to_raw(empty.clone()).unwrap();

        let exported = unsafe { *raw };
        assert_eq!(exported.num_nodes, 0);
        assert!(exported.nodes.is_null());
        assert!(exported.controller.is_null());
        assert!(exported.cluster_id.is_null());
        assert_eq!(exported.num_authorized_operations, 0);
        assert!(exported.authorized_operations.is_null());

        let read_back = unsafe { raw_describe_cluster_result_to_internal(&exported) }.unwrap();
        unsafe { free_raw_describe_cluster_result(raw) };

        assert_eq!(read_back, empty);
    }

    #[test]
    fn interior_nul_fails_the_export() {
        let mut model = cluster();
        model.nodes[1].host = "bad\0host".to_owned();

        assert!(describe_cluster_result_to_raw(model).is_err());
    }

    #[test]
    fn mismatched_count_is_rejected_on_read() {
        let raw = RawDescribeClusterResult {
            num_nodes: 3,
            ..RawDescribeClusterResult::default()
        };

        assert!(unsafe { raw_describe_cluster_result_to_internal(&raw) }.is_err());
    }

    #[test]
    fn freeing_null_is_a_no_op() {
        unsafe { free_raw_describe_cluster_result(std::ptr::null_mut()) };
    }
}
