#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTopicsResult {
    pub topics: Vec<CreateTopicResult>,
}

impl CreateTopicsResult {
    pub fn num_topics(&self) -> usize {
        self.topics.len()
    }

    pub fn failed(&self) -> impl Iterator<Item = &CreateTopicResult> {
        self.topics.iter().filter(|topic| topic.is_failed())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTopicResult {
    pub topic: String,
    pub outcome: CreateTopicOutcome,
}

impl CreateTopicResult {
    pub fn created(topic: impl Into<String>, created: CreatedTopic) -> Self {
        Self {
            topic: topic.into(),
            outcome: CreateTopicOutcome::Created(created),
        }
    }

    pub fn failed(topic: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            outcome: CreateTopicOutcome::Failed(error.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, CreateTopicOutcome::Failed(_))
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            CreateTopicOutcome::Failed(error) => Some(error),
            CreateTopicOutcome::Created(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateTopicOutcome {
    Created(CreatedTopic),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTopic {
    pub uuid: Option<String>,
    pub num_partitions: i32,
    pub replication_factor: i32,
}
