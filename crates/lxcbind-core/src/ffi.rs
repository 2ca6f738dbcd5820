//! Run-time bindings to liblxc.
//!
//! liblxc is opened with `dlopen(3)` rather than linked, so the workspace
//! builds on hosts without LXC installed and the engine can report a missing
//! library as an ordinary error. Only the symbols needed for handle lifecycle,
//! discovery, and capability queries are resolved.
//!
//! # References
//!
//! - `lxc/lxccontainer.h`: <https://github.com/lxc/lxc/blob/main/src/lxc/lxccontainer.h>

use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::path::Path;
use std::ptr::{self, NonNull};

use lxcbind_common::constants::LIBLXC_SONAMES;
use lxcbind_common::error::{LxcError, Result};

/// `struct lxc_container` (opaque).
#[repr(C)]
pub struct LxcContainer {
    _private: [u8; 0],
}

/// `lxc_container_new(name, configpath)`.
pub type ContainerNewFn = unsafe extern "C" fn(*const c_char, *const c_char) -> *mut LxcContainer;

/// `lxc_container_get(c)` / `lxc_container_put(c)`.
pub type ContainerRefFn = unsafe extern "C" fn(*mut LxcContainer) -> c_int;

/// `list_{all,defined,active}_containers(lxcpath, names, cret)`.
pub type ListContainersFn = unsafe extern "C" fn(
    *const c_char,
    *mut *mut *mut c_char,
    *mut *mut *mut LxcContainer,
) -> c_int;

/// `lxc_get_version()`.
pub type VersionFn = unsafe extern "C" fn() -> *const c_char;

/// `lxc_get_global_config_item(key)`.
pub type GlobalConfigItemFn = unsafe extern "C" fn(*const c_char) -> *const c_char;

/// `lxc_has_api_extension(name)` / `lxc_config_item_is_supported(key)`.
pub type PredicateFn = unsafe extern "C" fn(*const c_char) -> bool;

/// An opened liblxc with its resolved entry points.
pub struct Liblxc {
    handle: NonNull<c_void>,
    /// `lxc_container_new`.
    pub container_new: ContainerNewFn,
    /// `lxc_container_get`.
    pub container_get: ContainerRefFn,
    /// `lxc_container_put`.
    pub container_put: ContainerRefFn,
    /// `list_all_containers`.
    pub list_all_containers: ListContainersFn,
    /// `list_defined_containers`.
    pub list_defined_containers: ListContainersFn,
    /// `list_active_containers`.
    pub list_active_containers: ListContainersFn,
    /// `lxc_get_version`.
    pub get_version: VersionFn,
    /// `lxc_get_global_config_item`.
    pub get_global_config_item: GlobalConfigItemFn,
    /// `lxc_has_api_extension`, absent before liblxc 3.1.
    pub has_api_extension: Option<PredicateFn>,
    /// `lxc_config_item_is_supported`, absent on old releases.
    pub config_item_is_supported: Option<PredicateFn>,
}

// SAFETY: the dl handle and the resolved function pointers are immutable after
// loading, and liblxc guards each container object with its own lock.
unsafe impl Send for Liblxc {}
// SAFETY: see `Send` above.
unsafe impl Sync for Liblxc {}

impl std::fmt::Debug for Liblxc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Liblxc")
            .field("handle", &self.handle)
            .field("has_api_extension", &self.has_api_extension.is_some())
            .field("config_item_is_supported", &self.config_item_is_supported.is_some())
            .finish_non_exhaustive()
    }
}

impl Liblxc {
    /// Opens liblxc, trying `library` first and then the usual sonames.
    ///
    /// # Errors
    ///
    /// Returns [`LxcError::BackendUnavailable`] if no candidate can be opened
    /// or a required symbol is missing.
    pub fn open(library: Option<&Path>) -> Result<Self> {
        let mut candidates: Vec<String> = Vec::new();
        if let Some(path) = library {
            candidates.push(path.to_string_lossy().into_owned());
        }
        candidates.extend(LIBLXC_SONAMES.iter().map(ToString::to_string));

        let mut failures = Vec::new();
        for candidate in &candidates {
            match dlopen(candidate) {
                Ok(handle) => {
                    tracing::debug!(library = %candidate, "liblxc loaded");
                    return Self::resolve(handle);
                }
                Err(message) => {
                    tracing::debug!(
                        library = %candidate,
                        error = %message,
                        "liblxc candidate rejected"
                    );
                    failures.push(message);
                }
            }
        }

        Err(LxcError::BackendUnavailable {
            message: failures.join("; "),
        })
    }

    fn resolve(handle: NonNull<c_void>) -> Result<Self> {
        // SAFETY: `handle` came from a successful dlopen and each symbol is
        // cast to the signature declared in lxccontainer.h.
        unsafe {
            let resolved = (|| {
                Some(Self {
                    handle,
                    container_new: symbol(handle, c"lxc_container_new")?,
                    container_get: symbol(handle, c"lxc_container_get")?,
                    container_put: symbol(handle, c"lxc_container_put")?,
                    list_all_containers: symbol(handle, c"list_all_containers")?,
                    list_defined_containers: symbol(handle, c"list_defined_containers")?,
                    list_active_containers: symbol(handle, c"list_active_containers")?,
                    get_version: symbol(handle, c"lxc_get_version")?,
                    get_global_config_item: symbol(handle, c"lxc_get_global_config_item")?,
                    has_api_extension: symbol(handle, c"lxc_has_api_extension"),
                    config_item_is_supported: symbol(handle, c"lxc_config_item_is_supported"),
                })
            })();

            resolved.ok_or_else(|| {
                let message = last_dl_error();
                let _ = libc::dlclose(handle.as_ptr());
                LxcError::BackendUnavailable {
                    message: format!("required liblxc symbol missing: {message}"),
                }
            })
        }
    }
}

impl Drop for Liblxc {
    fn drop(&mut self) {
        // SAFETY: the handle is owned by this value and closed exactly once.
        let _ = unsafe { libc::dlclose(self.handle.as_ptr()) };
    }
}

fn dlopen(library: &str) -> std::result::Result<NonNull<c_void>, String> {
    let path = CString::new(library).map_err(|_| format!("{library}: path contains NUL"))?;
    // SAFETY: `path` is a valid NUL-terminated string for the call's duration.
    let handle = unsafe { libc::dlopen(path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
    NonNull::new(handle).ok_or_else(|| format!("{library}: {}", last_dl_error()))
}

/// Looks up `name` and reinterprets it as the function pointer type `T`.
///
/// # Safety
///
/// `T` must be an `extern "C"` function pointer type matching the symbol.
unsafe fn symbol<T: Copy>(handle: NonNull<c_void>, name: &CStr) -> Option<T> {
    debug_assert_eq!(size_of::<T>(), size_of::<*mut c_void>());
    // SAFETY: `handle` is a live dl handle and `name` is NUL-terminated.
    let sym = unsafe { libc::dlsym(handle.as_ptr(), name.as_ptr()) };
    if sym.is_null() {
        return None;
    }
    // SAFETY: upheld by the caller.
    Some(unsafe { std::mem::transmute_copy::<*mut c_void, T>(&sym) })
}

fn last_dl_error() -> String {
    // SAFETY: dlerror returns NULL or a thread-local NUL-terminated string.
    let err = unsafe { libc::dlerror() };
    if err.is_null() {
        "unknown dynamic loader error".to_string()
    } else {
        // SAFETY: non-null pointer from dlerror.
        unsafe { CStr::from_ptr(err) }.to_string_lossy().into_owned()
    }
}

/// Copies a C string returned by liblxc without taking ownership.
///
/// # Safety
///
/// `ptr` must be NULL or point to a NUL-terminated string valid for the call.
pub unsafe fn borrowed_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: upheld by the caller.
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

/// Copies a heap string returned by liblxc and frees it.
///
/// # Safety
///
/// `ptr` must be NULL or a `malloc`ed NUL-terminated string that nothing
/// else will free.
pub unsafe fn owned_string(ptr: *mut c_char) -> Option<String> {
    // SAFETY: upheld by the caller.
    let value = unsafe { borrowed_string(ptr) };
    if !ptr.is_null() {
        // SAFETY: the caller hands over ownership of `ptr`.
        unsafe { libc::free(ptr.cast()) };
    }
    value
}

/// Copies and frees a `char **` name array filled by a `list_*` call.
///
/// # Safety
///
/// `names` must be NULL or a `malloc`ed array of at least `count` `malloc`ed
/// strings, all owned by the caller.
pub unsafe fn take_names(names: *mut *mut c_char, count: c_int) -> Vec<String> {
    if names.is_null() {
        return Vec::new();
    }
    let len = usize::try_from(count).unwrap_or(0);
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        // SAFETY: `i < count` and the array holds `count` entries.
        let entry = unsafe { *names.add(i) };
        // SAFETY: each entry is an owned heap string.
        if let Some(name) = unsafe { owned_string(entry) } {
            out.push(name);
        }
    }
    // SAFETY: the array itself is owned by the caller.
    unsafe { libc::free(names.cast()) };
    out
}

/// Converts an optional path scope into a C string, keeping it alive in `slot`.
///
/// Returns NULL when there is no scope so liblxc uses its default.
pub fn optional_c_path(path: Option<&str>, slot: &mut Option<CString>) -> Option<*const c_char> {
    match path {
        None => Some(ptr::null()),
        Some(p) => {
            let c = CString::new(p).ok()?;
            Some(slot.insert(c).as_ptr())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_is_backend_unavailable() {
        let err = Liblxc::open(Some(Path::new("/nonexistent/liblxc-test.so"))).map(|_| ());
        // The host may have a real liblxc installed; only a failure is checked.
        if let Err(e) = err {
            assert!(matches!(e, LxcError::BackendUnavailable { .. }));
            assert!(e.to_string().contains("liblxc-test.so"));
        }
    }

    #[test]
    fn optional_c_path_is_null_without_scope() {
        let mut slot = None;
        let ptr = optional_c_path(None, &mut slot).unwrap();
        assert!(ptr.is_null());
        assert!(slot.is_none());
    }

    #[test]
    fn optional_c_path_rejects_interior_nul() {
        let mut slot = None;
        assert!(optional_c_path(Some("/srv\0/lxc"), &mut slot).is_none());
    }

    #[test]
    fn optional_c_path_keeps_string_alive() {
        let mut slot = None;
        let ptr = optional_c_path(Some("/srv/lxc"), &mut slot).unwrap();
        // SAFETY: `slot` still owns the string.
        let back = unsafe { borrowed_string(ptr) };
        assert_eq!(back.as_deref(), Some("/srv/lxc"));
    }

    #[test]
    fn take_names_frees_and_copies() {
        // SAFETY: builds a malloc-owned array the way liblxc does.
        let names = unsafe {
            let array = libc::malloc(2 * size_of::<*mut c_char>()).cast::<*mut c_char>();
            *array = libc::strdup(c"web".as_ptr());
            *array.add(1) = libc::strdup(c"db".as_ptr());
            take_names(array, 2)
        };
        assert_eq!(names, vec!["web".to_string(), "db".to_string()]);
    }

    #[test]
    fn take_names_null_is_empty() {
        // SAFETY: NULL is explicitly allowed.
        assert!(unsafe { take_names(ptr::null_mut(), 5) }.is_empty());
    }
}
