//! composerize-unraid
//!
//! Connects to a remote Docker host over SSH, inspects a container and turns its
//! configuration into a `docker-compose.yml` by piping it through two local tools:
//!
//! ```text
//! docker inspect ──▸ runlike --stdin ──▸ composerize <args> ──▸ stdout
//!    (remote)           (local)             (local)
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod docker;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod ssh;

pub use error::Error;
