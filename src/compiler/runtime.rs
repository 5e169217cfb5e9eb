//! Native execution harness for the C99 target.
//!
//! Generated C source is written into a scratch directory, compiled to a
//! shared library with the system C compiler, and loaded with `dlopen`.
//! The scratch directory (source and compiled artifact) is removed once
//! the library is mapped; the returned handle stays valid until dropped.

use std::ffi::{c_void, CStr, CString};
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::process::Command;

use crate::errors::errors::{Error, ErrorKind};

/// A loaded shared library. Closed on drop.
#[derive(Debug)]
pub struct NativeLibrary {
    handle: *mut c_void,
}

impl NativeLibrary {
    /// Looks up an exported symbol by name.
    ///
    /// # Safety of use
    ///
    /// The returned pointer is only meaningful when cast to the symbol's
    /// actual native signature, and must not outlive this library.
    pub fn symbol(&self, name: &str) -> Result<*mut c_void, Error> {
        let c_name = CString::new(name).map_err(|_| {
            Error::new(ErrorKind::NativeLoadFailed {
                message: format!("symbol name {:?} contains a nul byte", name),
            })
        })?;
        let symbol = unsafe { libc::dlsym(self.handle, c_name.as_ptr()) };
        if symbol.is_null() {
            Err(Error::new(ErrorKind::NativeLoadFailed {
                message: format!("symbol {:?} not found", name),
            }))
        } else {
            Ok(symbol)
        }
    }
}

impl Drop for NativeLibrary {
    fn drop(&mut self) {
        unsafe {
            libc::dlclose(self.handle);
        }
    }
}

/// Compiles generated C source into a shared library and loads it.
pub fn compile_and_load(c_source: &str) -> Result<NativeLibrary, Error> {
    let scratch = tempfile::tempdir()?;
    let c_path = scratch.path().join("karakuri_main.c");
    let so_path = scratch.path().join("libkarakuri_main.so");

    fs::write(&c_path, c_source)?;

    let output = Command::new("cc")
        .arg("-shared")
        .arg("-fPIC")
        .arg("-O2")
        .arg("-o")
        .arg(&so_path)
        .arg(&c_path)
        .output()?;
    if !output.status.success() {
        return Err(Error::new(ErrorKind::NativeCompilerFailed {
            message: String::from_utf8_lossy(&output.stderr).into_owned(),
        }));
    }

    let c_so = CString::new(so_path.as_os_str().as_bytes()).map_err(|_| {
        Error::new(ErrorKind::NativeLoadFailed {
            message: "scratch path contains a nul byte".to_string(),
        })
    })?;
    let handle = unsafe { libc::dlopen(c_so.as_ptr(), libc::RTLD_NOW | libc::RTLD_GLOBAL) };
    if handle.is_null() {
        let message = unsafe {
            let err = libc::dlerror();
            if err.is_null() {
                "dlopen failed".to_string()
            } else {
                CStr::from_ptr(err).to_string_lossy().into_owned()
            }
        };
        return Err(Error::new(ErrorKind::NativeLoadFailed { message }));
    }

    // The library stays mapped after its file is unlinked.
    scratch.close()?;

    Ok(NativeLibrary { handle })
}
