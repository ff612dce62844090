use crate::connection_settings::ConnectionSettings;
use anyhow::Context;
use rdkafka::admin::AdminClient;
use rdkafka::client::DefaultClientContext;
use rdkafka::ClientConfig;
use std::sync::Arc;

pub type RdAdminClient = AdminClient<DefaultClientContext>;

pub struct AdminWrapper {
    client: Arc<RdAdminClient>,
}

impl AdminWrapper {
    pub fn create(connection_settings: &ConnectionSettings) -> Result<Self, anyhow::Error> {
        // https://raw.githubusercontent.com/confluentinc/librdkafka/master/CONFIGURATION.md
        let config = ClientConfig::try_from(connection_settings)?;
        let client: RdAdminClient = config
            .create()
            .context("While creating kafka AdminClient")?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    pub fn client(&self) -> Arc<RdAdminClient> {
        self.client.clone()
    }
}
