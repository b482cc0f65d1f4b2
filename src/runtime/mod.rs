// Runtime module - container runtime client
#![allow(unused_imports)]

pub mod cleanup;
pub mod client;
pub mod docker;
pub mod error;
pub mod types;

pub use cleanup::ContainerCleanup;
pub use client::{ContainerRuntime, ProgressStream};
pub use docker::DockerCli;
pub use error::{Result, RuntimeError};
pub use types::{ContainerHandle, ImageRef, Mount, ProgressEvent, RunSpec};
