pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod data_storage;
pub mod export;
pub mod formatter;
pub mod geo;
pub mod messages;
pub mod presence;
pub mod records;
pub mod refresher;
pub mod view;
