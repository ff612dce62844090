use crate::admin::native::{native_array, node_from_native, optional_c_string, AdminRequest};
use crate::admin::RdAdminClient;
use crate::models::AclOperation;
use crate::queries::describe_cluster::request::DescribeClusterQueryInternal;
use crate::queries::describe_cluster::response::DescribeClusterResult;
use anyhow::{bail, Context};
use rdkafka::bindings::{
    rd_kafka_DescribeCluster, rd_kafka_DescribeCluster_result_authorized_operations,
    rd_kafka_DescribeCluster_result_cluster_id, rd_kafka_DescribeCluster_result_controller,
    rd_kafka_DescribeCluster_result_nodes, rd_kafka_admin_op_t,
    rd_kafka_event_DescribeCluster_result,
};
use std::sync::Arc;
use tracing::debug;

#[tracing::instrument(skip_all)]
pub async fn describe_cluster(
    client: Arc<RdAdminClient>,
    query: DescribeClusterQueryInternal,
) -> Result<DescribeClusterResult, anyhow::Error> {
    let handle = tokio::task::spawn_blocking(move || {
        let request = AdminRequest::new(
            &client,
            rd_kafka_admin_op_t::RD_KAFKA_ADMIN_OP_DESCRIBECLUSTER,
            query.timeout,
        )?;
        if query.include_authorized_operations {
            request.include_authorized_operations()?;
        }

        unsafe { rd_kafka_DescribeCluster(request.native(), request.options(), request.queue()) };
        let event = request.wait().context("While describing cluster")?;

        let result = unsafe { rd_kafka_event_DescribeCluster_result(event.ptr()) };
        if result.is_null() {
            bail!("Describe cluster returned an unexpected event")
        }

        // Everything below borrows from `event` and is copied before it is destroyed
        let mut num_nodes = 0usize;
        let nodes = unsafe {
            native_array(
                rd_kafka_DescribeCluster_result_nodes(result, &mut num_nodes) as *const _,
                num_nodes,
            )
        }
        .iter()
        .map(|node| unsafe { node_from_native(*node) })
        .collect::<Vec<_>>();

        let controller = unsafe { rd_kafka_DescribeCluster_result_controller(result) };
        let controller = (!controller.is_null()).then(|| unsafe { node_from_native(controller) });

        let cluster_id =
            unsafe { optional_c_string(rd_kafka_DescribeCluster_result_cluster_id(result)) };

        let mut num_operations = 0usize;
        let authorized_operations = unsafe {
            native_array(
                rd_kafka_DescribeCluster_result_authorized_operations(
                    result,
                    &mut num_operations,
                ),
                num_operations,
            )
        }
        .iter()
        .map(|operation| AclOperation::from(*operation as i8))
        .collect::<Vec<_>>();

        Result::<_, anyhow::Error>::Ok(DescribeClusterResult {
            nodes,
            controller,
            cluster_id,
            authorized_operations,
        })
    });

    let result = handle.await.context("While joining blocking handle")??;
    debug!("Cluster described: {:?}", result);

    Ok(result)
}
