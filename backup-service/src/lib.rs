pub mod backup;
pub mod cleanup;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod rest;
pub mod scheduler;
pub mod storage;
pub mod verify;
