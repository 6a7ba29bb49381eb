//! Docker Module
//!
//! Read-only container queries run through the SSH transport.

mod container;
mod text;

pub use container::{
    inspect, list_container_ids, list_container_names, ContainerRecord, DockerError,
    LIST_IDS_COMMAND, LIST_RUNNING_JSON_COMMAND,
};
pub use text::{lines, sort_case_insensitive};
