//! HTTP API and CLI: configuration, session state, routing, request/response mapping.

pub mod app;
pub mod cli;
pub mod config;
pub mod session;
