mod create_admin_client;
mod create_topics;
mod describe_cluster;
mod shared;

pub use create_admin_client::*;
pub use create_topics::*;
pub use describe_cluster::*;
pub use shared::*;
