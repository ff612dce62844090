use anyhow::Context;
use config::Config;
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub worker_threads: i32,
}

impl AppConfig {
    pub fn build() -> Result<Self, anyhow::Error> {
        let config = Config::builder()
            .set_default("worker_threads", 0)
            .context("While setting config defaults")?
            .add_source(config::File::with_name("smoke").required(false))
            .add_source(
                config::Environment::with_prefix("SMOKE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("While building config")?;

        let deserialized_config = config
            .try_deserialize()
            .context("While deserializing config")?;

        debug!("App config: {deserialized_config:?}");

        Ok(deserialized_config)
    }
}
