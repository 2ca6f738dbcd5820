//! Container handle lifecycle and capability negotiation for liblxc.
//!
//! [`Lxc`](engine::Lxc) is the usual entry point. It creates
//! [`ContainerHandle`](container::ContainerHandle)s, enumerates containers,
//! and answers version and capability questions against the loaded runtime.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod capability;
pub mod container;
pub mod discovery;
pub mod engine;

pub use container::{ContainerHandle, Released, acquire, release};
pub use engine::Lxc;
pub use lxcbind_common::types::{DiscoveryMode, Verbosity};
