#![warn(unused_imports)]
#![deny(clippy::clone_on_copy)]
#![deny(clippy::style)]

mod app_config;

use crate::app_config::AppConfig;
use anyhow::{bail, Context};
use kafka_admin_native::abi::RawContextParams;
use kafka_admin_native::{create_context, experiment, tear_down, Isolate, IsolateThread};
use std::ffi::CString;
use std::ptr::null_mut;
use tracing::error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

fn main() -> Result<(), anyhow::Error> {
    // Silent unless asked: a failed start must leave a single diagnostic line
    let log_level = std::env::var("RUST_LOG").unwrap_or("off".to_owned());

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::OFF.into())
        .parse_lossy(log_level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();

    let config = AppConfig::build().context("While building app config")?;
    let params = RawContextParams {
        worker_threads: config.worker_threads,
        ..RawContextParams::default()
    };

    let mut context: *mut Isolate = null_mut();
    let mut thread: *mut IsolateThread = null_mut();
    if unsafe { create_context(&params, &mut context, &mut thread) } != 0 {
        bail!("initialization error")
    }

    println!("Calling experiment (C side)");

    let text = CString::new("Hello world").context("While preparing experiment text")?;
    let experiment_status = unsafe { experiment(thread, text.as_ptr()) };
    if experiment_status != 0 {
        error!("experiment returned {experiment_status}");
    }

    let tear_down_status = unsafe { tear_down(thread) };
    if tear_down_status != 0 {
        error!("tear_down returned {tear_down_status}");
    }

    if experiment_status != 0 || tear_down_status != 0 {
        bail!("Smoke test failed")
    }

    Ok(())
}
