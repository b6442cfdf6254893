//! Nexus API cook book: a web page of forms, one per node API operation,
//! each runnable through the SDK client or as a direct query.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod form;
pub mod render;
pub mod session;
pub mod transport;
pub mod web;
