use crate::abi::{RawContextParams, CONTEXT_PARAMS_VERSION};
use crate::error::{status_call, NativeError};
use crate::handles::HandleRegistry;
use crate::logging::init_logging;
use anyhow::{anyhow, Context};
use kafka_admin::admin::{AdminFactory, KafkaAdmin};
use std::ffi::c_int;
use std::future::Future;
use std::ptr::null_mut;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A native execution context: an async runtime plus the admin clients
/// created in it.
pub struct Isolate {
    runtime: Runtime,
    admins: HandleRegistry<dyn KafkaAdmin>,
    factory: Arc<dyn AdminFactory>,
}

impl Isolate {
    pub fn create(
        params: &RawContextParams,
        factory: Arc<dyn AdminFactory>,
    ) -> Result<Self, anyhow::Error> {
        let worker_threads = validate_params(params)?;

        let mut builder = tokio::runtime::Builder::new_multi_thread();
        builder.enable_all().thread_name("kafka-admin-isolate");
        if let Some(worker_threads) = worker_threads {
            builder.worker_threads(worker_threads);
        }

        let runtime = builder.build().context("While building isolate runtime")?;

        Ok(Self {
            runtime,
            admins: HandleRegistry::new(),
            factory,
        })
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn admins(&self) -> &HandleRegistry<dyn KafkaAdmin> {
        &self.admins
    }

    pub fn factory(&self) -> &Arc<dyn AdminFactory> {
        &self.factory
    }

    fn shut_down(self) {
        let closed = self.admins.clear();
        if closed > 0 {
            warn!("Closed {closed} admin client(s) left open at tear down");
        }

        self.runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
    }
}

/// Returns the requested worker count, `None` meaning the runtime default.
fn validate_params(params: &RawContextParams) -> Result<Option<usize>, anyhow::Error> {
    if params.version != CONTEXT_PARAMS_VERSION {
        return Err(anyhow!(
            "Unsupported context params version {}, expected {CONTEXT_PARAMS_VERSION}",
            params.version
        ));
    }

    match usize::try_from(params.worker_threads) {
        Ok(0) => Ok(None),
        Ok(worker_threads) => Ok(Some(worker_threads)),
        Err(_) => Err(anyhow!(
            "Worker threads can't be negative: {}",
            params.worker_threads
        )),
    }
}

/// The thread handle native callers pass to every entry point. It owns the
/// isolate it is attached to.
pub struct IsolateThread {
    isolate: Box<Isolate>,
}

impl IsolateThread {
    pub fn isolate(&self) -> &Isolate {
        &self.isolate
    }

    pub fn tear_down(self) {
        self.isolate.shut_down();
    }
}

/// Borrows the isolate behind a thread handle for the duration of a call.
///
/// # Safety
///
/// `thread` must be null or a live pointer from [`create_context_with_factory`].
pub(crate) unsafe fn isolate_of<'a>(
    thread: *const IsolateThread,
) -> Result<&'a Isolate, NativeError> {
    match unsafe { thread.as_ref() } {
        Some(thread) => Ok(thread.isolate()),
        None => Err(NativeError::InvalidArgument(anyhow!("Thread can't be null"))),
    }
}

/// Creates an isolate whose admin clients come from `factory`.
///
/// On failure both out-pointers are left null.
///
/// # Safety
///
/// `params` must be null or point to a valid record. `context` and `thread`
/// must be writable.
pub unsafe fn create_context_with_factory(
    params: *const RawContextParams,
    factory: Arc<dyn AdminFactory>,
    context: *mut *mut Isolate,
    thread: *mut *mut IsolateThread,
) -> c_int {
    init_logging();

    status_call("create_context", || {
        if context.is_null() || thread.is_null() {
            return Err(NativeError::InvalidArgument(anyhow!(
                "Context and thread out-pointers can't be null"
            )));
        }
        unsafe {
            *context = null_mut();
            *thread = null_mut();
        }

        let params = unsafe { params.as_ref() }.copied().unwrap_or_default();
        debug!("Creating context with {params:?}");

        let isolate = Isolate::create(&params, factory).map_err(NativeError::InvalidArgument)?;
        let isolate_thread = Box::new(IsolateThread {
            isolate: Box::new(isolate),
        });

        unsafe {
            *context = &*isolate_thread.isolate as *const Isolate as *mut Isolate;
            *thread = Box::into_raw(isolate_thread);
        }
        info!("Context created");

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert_eq!(validate_params(&RawContextParams::default()).unwrap(), None);
    }

    #[test]
    fn explicit_worker_count_is_kept() {
        let params = RawContextParams {
            worker_threads: 2,
            ..RawContextParams::default()
        };

        assert_eq!(validate_params(&params).unwrap(), Some(2));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let params = RawContextParams {
            version: 2,
            ..RawContextParams::default()
        };

        assert!(validate_params(&params).is_err());
    }

    #[test]
    fn negative_worker_count_is_rejected() {
        let params = RawContextParams {
            worker_threads: -1,
            ..RawContextParams::default()
        };

        let error = validate_params(&params).unwrap_err();

        assert_eq!(error.to_string(), "Worker threads can't be negative: -1");
    }
}
