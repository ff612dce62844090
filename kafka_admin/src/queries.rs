pub mod describe_cluster;
