use crate::admin::AdminWrapper;
use crate::commands::create_topics::{
    create_topics, CreateTopicsCommandInternal, CreateTopicsResult,
};
use crate::connection_settings::ConnectionSettings;
use crate::queries::describe_cluster::{
    describe_cluster, DescribeClusterQueryInternal, DescribeClusterResult,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Admin operations the native binding dispatches to.
#[async_trait]
pub trait KafkaAdmin: Send + Sync {
    async fn describe_cluster(
        &self,
        query: DescribeClusterQueryInternal,
    ) -> Result<DescribeClusterResult, anyhow::Error>;

    async fn create_topics(
        &self,
        command: CreateTopicsCommandInternal,
    ) -> Result<CreateTopicsResult, anyhow::Error>;
}

pub trait AdminFactory: Send + Sync {
    fn create(
        &self,
        connection_settings: &ConnectionSettings,
    ) -> Result<Arc<dyn KafkaAdmin>, anyhow::Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RdKafkaAdminFactory;

impl AdminFactory for RdKafkaAdminFactory {
    fn create(
        &self,
        connection_settings: &ConnectionSettings,
    ) -> Result<Arc<dyn KafkaAdmin>, anyhow::Error> {
        let admin = AdminWrapper::create(connection_settings)?;
        Ok(Arc::new(admin))
    }
}

#[async_trait]
impl KafkaAdmin for AdminWrapper {
    async fn describe_cluster(
        &self,
        query: DescribeClusterQueryInternal,
    ) -> Result<DescribeClusterResult, anyhow::Error> {
        describe_cluster(self.client(), query).await
    }

    async fn create_topics(
        &self,
        command: CreateTopicsCommandInternal,
    ) -> Result<CreateTopicsResult, anyhow::Error> {
        create_topics(self.client(), command).await
    }
}
