use crate::models::{AclOperation, Node};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DescribeClusterResult {
    pub nodes: Vec<Node>,
    pub controller: Option<Node>,
    pub cluster_id: Option<String>,
    pub authorized_operations: Vec<AclOperation>,
}

impl DescribeClusterResult {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_authorized_operations(&self) -> usize {
        self.authorized_operations.len()
    }
}
