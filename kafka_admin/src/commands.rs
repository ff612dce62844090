pub mod create_topics;
