//! Server-rendered dashboard for the scholarship eligibility prediction service.
//!
//! The crate submits student profiles to the service and renders the verdict
//! and per-model probabilities. It also renders dataset statistics and a model
//! performance comparison. The classification itself happens in the external
//! service; everything here maps its JSON payloads onto a page.

pub mod charts;
pub mod client;
pub mod comparison;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod html;
pub mod logging;
pub mod model;
pub mod ordered;
pub mod page;
pub mod prediction;
pub mod requests;
pub mod server;
pub mod session;
pub mod tabs;

pub use client::{Backend, ClientError, HttpBackend};
pub use config::Config;
pub use error::DashboardError;
pub use prediction::RenderOptions;
pub use session::{Applied, DashboardSession};
