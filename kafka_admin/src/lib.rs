pub mod admin;
pub mod commands;
pub mod connection_settings;
pub mod models;
pub mod queries;
