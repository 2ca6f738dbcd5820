//! # lxcbind-core
//!
//! Low-level access to liblxc for the lxcbind engine.
//!
//! This crate provides:
//! - **Loading**: liblxc is opened at run time with `dlopen(3)`; see [`ffi`].
//! - **Backends**: the [`LxcBackend`](backend::LxcBackend) seam, with a
//!   liblxc implementation and an in-process one for tests.
//! - **Versions**: parsing and comparing liblxc version strings, including
//!   development builds; see [`version`].
//!
//! All unsafe calls are encapsulated in safe wrappers with
//! `// SAFETY:` documentation.

#![allow(unsafe_code)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod backend;
pub mod ffi;
pub mod version;
