use crate::abi::{RawCreateTopicResult, RawCreateTopicsResult, RawNewTopic};
use crate::converters::shared::{
    c_str_to_optional_string, c_str_to_string, c_string_into_raw, count_to_c, free_c_string,
    raw_slice, string_to_c, vec_from_raw, vec_into_raw,
};
use anyhow::Context;
use kafka_admin::commands::create_topics::{
    CreateTopicOutcome, CreateTopicResult, CreateTopicsResult, CreatedTopic, NewTopic,
};
use std::ffi::{c_int, CString};

const UNKNOWN_ERROR: &str = "Unknown error";

/// # Safety
///
/// `new_topics` must point to `num_new_topics` records whose names are valid
/// for the call.
pub unsafe fn raw_new_topics_to_internal(
    num_new_topics: c_int,
    new_topics: *const RawNewTopic,
) -> Result<Vec<NewTopic>, anyhow::Error> {
    let raw_new_topics = unsafe { raw_slice(new_topics, num_new_topics, "new topics") }?;

    raw_new_topics
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let name = unsafe { c_str_to_string(raw.name, "topic name") }
                .with_context(|| format!("While reading new topic #{index}"))?;
            Ok(NewTopic::new(name, raw.num_partitions, raw.replication_factor))
        })
        .collect()
}

struct StagedTopicResult {
    topic: CString,
    error: Option<CString>,
    uuid: Option<CString>,
    num_partitions: c_int,
    replication_factor: c_int,
}

impl StagedTopicResult {
    fn stage(result: CreateTopicResult) -> Result<Self, anyhow::Error> {
        let topic = string_to_c(result.topic, "topic")?;

        let staged = match result.outcome {
            CreateTopicOutcome::Created(created) => Self {
                topic,
                error: None,
                uuid: created
                    .uuid
                    .map(|uuid| string_to_c(uuid, "topic uuid"))
                    .transpose()?,
                num_partitions: created.num_partitions,
                replication_factor: created.replication_factor,
            },
            CreateTopicOutcome::Failed(error) => {
                // An empty message would read back as a success
                let error = if error.is_empty() {
                    UNKNOWN_ERROR.to_owned()
                } else {
                    error
                };
                Self {
                    topic,
                    error: Some(string_to_c(error, "topic error")?),
                    uuid: None,
                    num_partitions: 0,
                    replication_factor: 0,
                }
            }
        };

        Ok(staged)
    }

    fn into_raw(self) -> RawCreateTopicResult {
        RawCreateTopicResult {
            topic: self.topic.into_raw(),
            error: c_string_into_raw(self.error),
            uuid: c_string_into_raw(self.uuid),
            num_partitions: self.num_partitions,
            replication_factor: self.replication_factor,
        }
    }
}

pub fn create_topics_result_to_raw(
    model: CreateTopicsResult,
) -> Result<*mut RawCreateTopicsResult, anyhow::Error> {
    let num_topics = count_to_c(model.topics.len(), "topics")?;

    let topics = model
        .topics
        .into_iter()
        .map(StagedTopicResult::stage)
        .collect::<Result<Vec<_>, _>>()
        .context("While exporting topic results")?;

    let raw = RawCreateTopicsResult {
        num_topics,
        topics: vec_into_raw(topics.into_iter().map(StagedTopicResult::into_raw).collect()),
    };

    Ok(Box::into_raw(Box::new(raw)))
}

/// # Safety
///
/// `result` must be null or come from [`create_topics_result_to_raw`], and is
/// released at most once.
pub unsafe fn free_raw_create_topics_result(result: *mut RawCreateTopicsResult) {
    if result.is_null() {
        return;
    }

    let raw = unsafe { Box::from_raw(result) };

    for topic in unsafe { vec_from_raw(raw.topics, raw.num_topics) }.iter() {
        unsafe {
            free_c_string(topic.topic);
            free_c_string(topic.error);
            free_c_string(topic.uuid);
        }
    }
}

/// Copies a create-topics record into owned values.
///
/// # Safety
///
/// Every pointer in `raw` must be null or valid for its declared count.
pub unsafe fn raw_create_topics_result_to_internal(
    raw: &RawCreateTopicsResult,
) -> Result<CreateTopicsResult, anyhow::Error> {
    let topics = unsafe { raw_slice(raw.topics, raw.num_topics, "topics") }?
        .iter()
        .map(|topic| unsafe { raw_create_topic_result_to_internal(topic) })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CreateTopicsResult { topics })
}

unsafe fn raw_create_topic_result_to_internal(
    raw: &RawCreateTopicResult,
) -> Result<CreateTopicResult, anyhow::Error> {
    let topic = unsafe { c_str_to_string(raw.topic, "topic") }?;
    let error = unsafe { c_str_to_optional_string(raw.error, "topic error") }?;

    let outcome = match error {
        Some(error) if !error.is_empty() => CreateTopicOutcome::Failed(error),
        _ => CreateTopicOutcome::Created(CreatedTopic {
            uuid: unsafe { c_str_to_optional_string(raw.uuid, "topic uuid") }?,
            num_partitions: raw.num_partitions,
            replication_factor: raw.replication_factor,
        }),
    };

    Ok(CreateTopicResult { topic, outcome })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr::null;

    fn mixed_result() -> CreateTopicsResult {
        CreateTopicsResult {
            topics: vec![
                CreateTopicResult::created(
                    "orders",
                    CreatedTopic {
                        uuid: Some("Xx6cY6WyQ5O4Zu0eTJqd8A".to_owned()),
                        num_partitions: 3,
                        replication_factor: 2,
                    },
                ),
                CreateTopicResult::failed("payments", "Topic 'payments' already exists."),
            ],
        }
    }

    #[test]
    fn new_topic_reads_back_unchanged() {
        let name = CString::new("orders").unwrap();
        let raw = [RawNewTopic {
            name: name.as_ptr(),
            num_partitions: 3,
            replication_factor: 2,
        }];

        let topics = unsafe { raw_new_topics_to_internal(1, raw.as_ptr()) }.unwrap();

        assert_eq!(topics, vec![NewTopic::new("orders", 3, 2)]);
    }

    #[test]
    fn new_topic_without_name_is_rejected() {
        let raw = [RawNewTopic {
            name: null(),
            num_partitions: 3,
            replication_factor: 2,
        }];

        let error = unsafe { raw_new_topics_to_internal(1, raw.as_ptr()) }.unwrap_err();

        assert_eq!(
            format!("{error:#}"),
            "While reading new topic #0: topic name can't be null"
        );
    }

    #[test]
    fn negative_topic_count_is_rejected() {
        assert!(unsafe { raw_new_topics_to_internal(-1, null()) }.is_err());
    }

    #[test]
    fn partial_failure_survives_the_boundary() {
        let raw = create_topics_result_to_raw(mixed_result()).unwrap();

        let exported = unsafe { *raw };
        assert_eq!(exported.num_topics, 2);

        let failed = unsafe { *exported.topics.add(1) };
        assert!(!failed.error.is_null());
        assert!(failed.uuid.is_null());
        assert_eq!(failed.num_partitions, 0);

        let read_back = unsafe { raw_create_topics_result_to_internal(&exported) }.unwrap();
        unsafe { free_raw_create_topics_result(raw) };

        assert_eq!(read_back, mixed_result());
        assert_eq!(
            read_back.failed().map(|x| x.topic.as_str()).collect::<Vec<_>>(),
            vec!["payments"]
        );
    }

    #[test]
    fn non_empty_error_wins_over_other_fields() {
        let topic = CString::new("orders").unwrap();
        let error = CString::new("Invalid replication factor").unwrap();
        let uuid = CString::new("Xx6cY6WyQ5O4Zu0eTJqd8A").unwrap();
        let topics = [RawCreateTopicResult {
            topic: topic.as_ptr(),
            error: error.as_ptr(),
            uuid: uuid.as_ptr(),
            num_partitions: 3,
            replication_factor: 2,
        }];
        let raw = RawCreateTopicsResult {
            num_topics: 1,
            topics: topics.as_ptr(),
        };

        let result = unsafe { raw_create_topics_result_to_internal(&raw) }.unwrap();

        assert!(result.topics[0].is_failed());
        assert_eq!(result.topics[0].error(), Some("Invalid replication factor"));
    }

    #[test]
    fn empty_error_is_not_a_failure() {
        let topic = CString::new("orders").unwrap();
        let error = CString::new("").unwrap();
        let topics = [RawCreateTopicResult {
            topic: topic.as_ptr(),
            error: error.as_ptr(),
            uuid: null(),
            num_partitions: 3,
            replication_factor: 2,
        }];
        let raw = RawCreateTopicsResult {
            num_topics: 1,
            topics: topics.as_ptr(),
        };

        let result = unsafe { raw_create_topics_result_to_internal(&raw) }.unwrap();

        assert!(!result.topics[0].is_failed());
    }

    #[test]
    fn failure_without_message_still_exports_as_failure() {
        let model = CreateTopicsResult {
            topics: vec![CreateTopicResult::failed("orders", "")],
        };

        let raw = create_topics_result_to_raw(model).unwrap();
        let read_back = unsafe { raw_create_topics_result_to_internal(&*raw) }.unwrap();
        unsafe { free_raw_create_topics_result(raw) };

        assert_eq!(read_back.topics[0].error(), Some(UNKNOWN_ERROR));
    }
}
