//! discussed-feed library — the "most discussed" feed page, its query layer,
//! a mock network responder and a render harness.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod harness;
pub mod server;
