use rdkafka::admin::TopicReplication;
use std::time::Duration;

/// A topic creation request. Negative counts ask for the broker default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopic {
    pub name: String,
    pub num_partitions: i32,
    pub replication_factor: i16,
}

impl NewTopic {
    pub fn new(name: impl Into<String>, num_partitions: i32, replication_factor: i16) -> Self {
        Self {
            name: name.into(),
            num_partitions,
            replication_factor,
        }
    }

    pub fn partitions(&self) -> Option<i32> {
        (self.num_partitions >= 0).then_some(self.num_partitions)
    }

    pub fn replication(&self) -> Option<i16> {
        (self.replication_factor >= 0).then_some(self.replication_factor)
    }

    pub(crate) fn to_rdkafka(&self) -> rdkafka::admin::NewTopic<'_> {
        let replication = self.replication().map(i32::from).unwrap_or(-1);
        rdkafka::admin::NewTopic::new(
            &self.name,
            self.partitions().unwrap_or(-1),
            TopicReplication::Fixed(replication),
        )
    }
}

#[derive(Debug, Clone)]
pub struct CreateTopicsCommandInternal {
    pub topics: Vec<NewTopic>,
    pub timeout: Duration,
}

impl CreateTopicsCommandInternal {
    pub fn new(topics: Vec<NewTopic>) -> Self {
        Self {
            topics,
            timeout: Duration::from_secs(30),
        }
    }
}
