pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod storage;
pub mod task_api;
