//! Container handles and their reference-counting protocol.
//!
//! A [`ContainerHandle`] wraps one runtime container object. Creating a handle
//! takes one reference; [`acquire`] adds one and [`release`] drops one. When
//! the runtime reports that the last reference is gone, the handle forgets the
//! object and every later operation on it fails.
//!
//! Acquisition only reads the handle, so it takes the shared side of the
//! handle's lock and may run concurrently with other acquisitions. Release may
//! invalidate the object and takes the exclusive side.
//!
//! Handles are not released on drop: references are routinely shared across
//! long-lived owners, so release stays an explicit operation.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lxcbind_common::error::{LxcError, Result};
use lxcbind_common::types::Verbosity;
use lxcbind_core::backend::{LxcBackend, PutOutcome};

/// What a successful release did to the underlying object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Released {
    /// Other references remain; the handle is still usable.
    Retained,
    /// The last reference is gone; the handle is now unusable.
    Freed,
}

struct HandleState<R> {
    raw: Option<R>,
    verbosity: Verbosity,
}

/// One named container object bound to an optional path scope.
pub struct ContainerHandle<B: LxcBackend> {
    name: String,
    path: Option<String>,
    backend: Arc<B>,
    state: RwLock<HandleState<B::Raw>>,
}

impl<B: LxcBackend> ContainerHandle<B> {
    /// Creates a handle for `name`, scoped to `path` or the runtime default.
    ///
    /// The handle starts with one reference owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`LxcError::CreationFailed`] if the name is empty or the
    /// runtime refuses to produce an object.
    pub fn create(backend: Arc<B>, name: &str, path: Option<&str>) -> Result<Self> {
        let creation_failed = || LxcError::CreationFailed {
            name: name.to_string(),
            path: path.map(ToString::to_string),
        };

        if name.is_empty() {
            return Err(creation_failed());
        }
        let raw = backend.container_new(name, path).ok_or_else(creation_failed)?;
        tracing::debug!(name, path = ?path, "container handle created");

        Ok(Self {
            name: name.to_string(),
            path: path.map(ToString::to_string),
            backend,
            state: RwLock::new(HandleState {
                raw: Some(raw),
                verbosity: Verbosity::default(),
            }),
        })
    }

    /// Sets the initial verbosity of a freshly created handle.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .verbosity = verbosity;
        self
    }

    /// Container name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path scope the handle was created with, if any.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Current verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .verbosity
    }

    /// Changes the verbosity.
    pub fn set_verbosity(&self, verbosity: Verbosity) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .verbosity = verbosity;
    }

    /// Whether the last reference has been released.
    ///
    /// A poisoned lock still reports the object it guards, so a handle whose
    /// release panicked part-way is not mistaken for a freed one.
    pub fn is_released(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .raw
            .is_none()
    }

    /// Adds a reference to the underlying object.
    ///
    /// # Errors
    ///
    /// Returns [`LxcError::AlreadyReleased`] after the last release, and
    /// [`LxcError::AcquireFailed`] if the runtime refuses.
    pub fn try_acquire(&self) -> Result<()> {
        let state = self.read_state()?;
        let raw = state.raw.ok_or_else(|| self.already_released())?;
        if !self.backend.container_get(raw) {
            return Err(LxcError::AcquireFailed {
                name: self.name.clone(),
            });
        }
        self.trace(state.verbosity, "reference acquired");
        Ok(())
    }

    /// Drops one reference, destroying the object if it was the last.
    ///
    /// # Errors
    ///
    /// Returns [`LxcError::AlreadyReleased`] after the last release, and
    /// [`LxcError::ReleaseFailed`] if the runtime reports an error.
    pub fn try_release(&self) -> Result<Released> {
        let mut state = self.write_state()?;
        let raw = state.raw.ok_or_else(|| self.already_released())?;
        match self.backend.container_put(raw) {
            PutOutcome::Retained => {
                self.trace(state.verbosity, "reference released");
                Ok(Released::Retained)
            }
            PutOutcome::Freed => {
                state.raw = None;
                self.trace(state.verbosity, "last reference released, container object freed");
                Ok(Released::Freed)
            }
            PutOutcome::Failed => Err(LxcError::ReleaseFailed {
                name: self.name.clone(),
            }),
        }
    }

    /// Adds a reference; false if the handle is released or the runtime
    /// refuses.
    pub fn acquire(&self) -> bool {
        self.try_acquire().is_ok()
    }

    /// Drops one reference; false if the handle is already released or the
    /// runtime reports an error.
    pub fn release(&self) -> bool {
        self.try_release().is_ok()
    }

    /// Runs `f` with the underlying object while holding the shared lock, so
    /// the object cannot be freed through this handle during the call.
    ///
    /// # Errors
    ///
    /// Returns [`LxcError::AlreadyReleased`] after the last release.
    pub fn with_raw<T>(&self, f: impl FnOnce(&B, B::Raw) -> T) -> Result<T> {
        let state = self.read_state()?;
        let raw = state.raw.ok_or_else(|| self.already_released())?;
        Ok(f(self.backend.as_ref(), raw))
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, HandleState<B::Raw>>> {
        self.state.read().map_err(|_| self.poisoned())
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, HandleState<B::Raw>>> {
        self.state.write().map_err(|_| self.poisoned())
    }

    fn already_released(&self) -> LxcError {
        LxcError::AlreadyReleased {
            name: self.name.clone(),
        }
    }

    fn poisoned(&self) -> LxcError {
        LxcError::Config {
            message: format!("handle lock for container {:?} poisoned", self.name),
        }
    }

    fn trace(&self, verbosity: Verbosity, event: &str) {
        match verbosity {
            Verbosity::Verbose => tracing::info!(name = %self.name, path = ?self.path, "{event}"),
            Verbosity::Quiet => tracing::debug!(name = %self.name, path = ?self.path, "{event}"),
        }
    }
}

impl<B: LxcBackend> fmt::Debug for ContainerHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerHandle")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("released", &self.is_released())
            .finish_non_exhaustive()
    }
}

impl<B: LxcBackend> Drop for ContainerHandle<B> {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if state.raw.is_some() {
            tracing::warn!(
                name = %self.name,
                path = ?self.path,
                "container handle dropped while still holding a reference"
            );
        }
    }
}

/// Adds a reference to `handle`'s object.
///
/// Returns false if the handle was already released or the runtime refused.
pub fn acquire<B: LxcBackend>(handle: &ContainerHandle<B>) -> bool {
    handle.acquire()
}

/// Drops one reference from `handle`'s object.
///
/// Returns true on success, including when this freed the object.
pub fn release<B: LxcBackend>(handle: &ContainerHandle<B>) -> bool {
    handle.release()
}
