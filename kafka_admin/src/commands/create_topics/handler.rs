use crate::admin::native::{
    error_message, kafka_uuid_string, native_array, optional_c_string, AdminRequest, NativePtr,
};
use crate::admin::RdAdminClient;
use crate::commands::create_topics::request::{CreateTopicsCommandInternal, NewTopic};
use crate::commands::create_topics::response::{
    CreateTopicResult, CreateTopicsResult, CreatedTopic,
};
use anyhow::{anyhow, bail, Context};
use rdkafka::admin::AdminOptions;
use rdkafka::bindings::{
    rd_kafka_DescribeTopics, rd_kafka_DescribeTopics_result_topics,
    rd_kafka_TopicCollection_of_topic_names, rd_kafka_TopicDescription_error,
    rd_kafka_TopicDescription_name, rd_kafka_TopicDescription_partitions,
    rd_kafka_TopicDescription_t, rd_kafka_TopicDescription_topic_id,
    rd_kafka_TopicPartitionInfo_replicas, rd_kafka_Uuid_base64str, rd_kafka_admin_op_t,
    rd_kafka_event_DescribeTopics_result,
};
use std::collections::HashMap;
use std::ffi::CString;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const DESCRIBE_ATTEMPTS: usize = 3;
const DESCRIBE_BACKOFF: Duration = Duration::from_millis(200);

#[tracing::instrument(skip_all)]
pub async fn create_topics(
    client: Arc<RdAdminClient>,
    command: CreateTopicsCommandInternal,
) -> Result<CreateTopicsResult, anyhow::Error> {
    debug!("Creating topics: {:?}", command.topics);

    let requested = command
        .topics
        .iter()
        .map(|topic| (topic.name.as_str(), topic))
        .collect::<HashMap<_, _>>();

    let new_topics = command
        .topics
        .iter()
        .map(NewTopic::to_rdkafka)
        .collect::<Vec<_>>();
    let options = AdminOptions::new().operation_timeout(Some(command.timeout));

    let results = client
        .create_topics(&new_topics, &options)
        .await
        .context("While creating topics")?;

    let created = results
        .iter()
        .filter_map(|result| result.as_ref().ok().cloned())
        .collect::<Vec<_>>();
    let layouts = describe_created_topics(client.clone(), created, command.timeout).await;

    let mut topics = Vec::with_capacity(results.len());
    for result in results {
        let topic_result = match result {
            Ok(topic) => {
                let created = created_topic(
                    requested.get(topic.as_str()).copied(),
                    layouts.get(&topic).cloned(),
                );
                CreateTopicResult::created(topic, created)
            }
            Err((topic, error_code)) => {
                warn!("Topic {topic} was not created: {error_code}");
                CreateTopicResult::failed(topic, error_code.to_string())
            }
        };
        topics.push(topic_result);
    }

    Ok(CreateTopicsResult { topics })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TopicLayout {
    uuid: Option<String>,
    num_partitions: i32,
    replication_factor: i32,
}

/// Reads id and layout of freshly created topics. A new topic can take a
/// moment to become describable, so missing topics are retried a few times.
async fn describe_created_topics(
    client: Arc<RdAdminClient>,
    topics: Vec<String>,
    timeout: Duration,
) -> HashMap<String, TopicLayout> {
    let mut layouts = HashMap::new();
    let mut pending = topics;

    for attempt in 1..=DESCRIBE_ATTEMPTS {
        if pending.is_empty() {
            break;
        }
        if attempt > 1 {
            tokio::time::sleep(DESCRIBE_BACKOFF).await;
        }

        let client = client.clone();
        let names = pending.clone();
        let described =
            tokio::task::spawn_blocking(move || describe_topics(&client, &names, timeout))
                .await
                .context("While joining blocking handle")
                .and_then(|x| x);

        match described {
            Ok(described) => layouts.extend(described),
            Err(e) => warn!("Describing created topics failed, attempt {attempt}: {e:?}"),
        }
        pending.retain(|topic| !layouts.contains_key(topic));
    }

    for topic in &pending {
        warn!("Topic {topic} created, but its description is unavailable");
    }

    layouts
}

fn describe_topics(
    client: &RdAdminClient,
    topics: &[String],
    timeout: Duration,
) -> Result<HashMap<String, TopicLayout>, anyhow::Error> {
    let request = AdminRequest::new(
        client,
        rd_kafka_admin_op_t::RD_KAFKA_ADMIN_OP_DESCRIBETOPICS,
        timeout,
    )?;

    let names = topics
        .iter()
        .map(|topic| CString::new(topic.as_str()))
        .collect::<Result<Vec<_>, _>>()
        .context("While preparing topic names")?;
    let mut name_ptrs = names.iter().map(|name| name.as_ptr()).collect::<Vec<_>>();

    let collection = unsafe {
        NativePtr::from_ptr(rd_kafka_TopicCollection_of_topic_names(
            name_ptrs.as_mut_ptr(),
            name_ptrs.len(),
        ))
    }
    .ok_or_else(|| anyhow!("Failed to build topic collection"))?;

    unsafe {
        rd_kafka_DescribeTopics(
            request.native(),
            collection.ptr(),
            request.options(),
            request.queue(),
        )
    };
    let event = request.wait().context("While describing topics")?;

    let result = unsafe { rd_kafka_event_DescribeTopics_result(event.ptr()) };
    if result.is_null() {
        bail!("Describe topics returned an unexpected event")
    }

    let mut num_descriptions = 0usize;
    let descriptions = unsafe {
        native_array(
            rd_kafka_DescribeTopics_result_topics(result, &mut num_descriptions) as *const _,
            num_descriptions,
        )
    };

    let mut layouts = HashMap::new();
    for description in descriptions {
        let description = *description;
        let name = unsafe { optional_c_string(rd_kafka_TopicDescription_name(description)) }
            .unwrap_or_default();

        if let Some(error) = unsafe { error_message(rd_kafka_TopicDescription_error(description)) }
        {
            debug!("Topic {name} not described: {error}");
            continue;
        }

        layouts.insert(name, unsafe { topic_layout(description) });
    }

    Ok(layouts)
}

/// # Safety
///
/// `description` must belong to a live describe-topics result.
unsafe fn topic_layout(description: *const rd_kafka_TopicDescription_t) -> TopicLayout {
    let topic_id = unsafe { rd_kafka_TopicDescription_topic_id(description) };
    let uuid = if topic_id.is_null() {
        None
    } else {
        unsafe { optional_c_string(rd_kafka_Uuid_base64str(topic_id)) }
            .map(|base64| kafka_uuid_string(&base64))
    };

    let mut num_partitions = 0usize;
    let partitions = unsafe {
        native_array(
            rd_kafka_TopicDescription_partitions(description, &mut num_partitions) as *const _,
            num_partitions,
        )
    };

    let replication_factor = partitions
        .first()
        .map(|partition| {
            let mut num_replicas = 0usize;
            unsafe { rd_kafka_TopicPartitionInfo_replicas(*partition, &mut num_replicas) };
            num_replicas as i32
        })
        .unwrap_or_default();

    TopicLayout {
        uuid,
        num_partitions: partitions.len() as i32,
        replication_factor,
    }
}

// Observed layout first, then what was requested
fn created_topic(requested: Option<&NewTopic>, observed: Option<TopicLayout>) -> CreatedTopic {
    match (observed, requested) {
        (Some(layout), _) => CreatedTopic {
            uuid: layout.uuid,
            num_partitions: layout.num_partitions,
            replication_factor: layout.replication_factor,
        },
        (None, Some(topic)) => CreatedTopic {
            uuid: None,
            num_partitions: topic.num_partitions,
            replication_factor: i32::from(topic.replication_factor),
        },
        (None, None) => CreatedTopic {
            uuid: None,
            num_partitions: -1,
            replication_factor: -1,
        },
    }
}
