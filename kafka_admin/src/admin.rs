mod admin_wrapper;
mod api;
pub(crate) mod native;

pub use admin_wrapper::*;
pub use api::*;
