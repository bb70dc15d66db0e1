//! Authorization gate for the online-store "process order" operation.
//!
//! authenticate → authorize → validate → process, fail-fast, with the gate
//! composed either inline in the handler or as middleware stages in front of it.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
