//! Core tark library (debate model, thread layout, store, config).

pub mod board;
pub mod config;
pub mod layout;
pub mod model;
pub mod search;
pub mod store;
