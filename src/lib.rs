//! Enterprise AI strategy hub: fetches the published metrics, tools and
//! training documents, derives the executive, strategy-center and
//! developer-hub views from them, generates insight text, and talks to
//! the operations REST API for the admin surfaces.

pub mod api;
pub mod auth;
pub mod charts;
pub mod config;
pub mod discovery;
pub mod format;
pub mod insight;
pub mod logging;
pub mod model;
pub mod notify;
pub mod pages;
pub mod profile;
pub mod report;
pub mod repository;
pub mod shell;
pub mod store;
pub mod view;
