mod acl_operation;
mod key_value;
mod node;

pub use acl_operation::*;
pub use key_value::*;
pub use node::*;
