pub mod config;
pub mod errors;
pub mod model;
pub mod rest;
pub mod store;
pub mod validate;
