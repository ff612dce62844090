//! C ABI over [`kafka_admin`].
//!
//! A caller creates a context with [`create_context`], which also hands back
//! the thread handle every other entry point takes. Results are allocated here
//! and released with the matching `free_*` call.

#![warn(unused_imports)]
#![deny(clippy::clone_on_copy)]
#![deny(clippy::style)]

pub mod abi;
pub mod converters;
mod entry_points;
pub mod error;
mod handles;
pub mod isolate;
mod logging;

pub use entry_points::*;
pub use error::StatusCode;
pub use handles::HandleRegistry;
pub use isolate::{create_context_with_factory, Isolate, IsolateThread};
pub use logging::init_logging;
