//! Terraform plugin protocol layer

pub mod codec;
pub mod controller;
pub mod diagnostics;
pub mod proto;
pub mod server;
pub mod service;
pub mod tls;

pub use server::{serve, ServeOptions};
pub use service::PluginService;
