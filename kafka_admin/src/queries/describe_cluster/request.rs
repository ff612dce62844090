use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DescribeClusterQueryInternal {
    pub timeout: Duration,
    /// Also ask the broker which cluster operations the client may perform.
    pub include_authorized_operations: bool,
}

impl Default for DescribeClusterQueryInternal {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            include_authorized_operations: false,
        }
    }
}
