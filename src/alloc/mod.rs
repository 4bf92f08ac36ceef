//! Executable memory management.
//!
//! Allocation and release of executable blocks go through the operating
//! system's mapping facility, selected at build time. Protection changes go
//! through the `region` crate, which rounds any byte range to the containing
//! page range before issuing the change, since hardware protection is page
//! granular.

use crate::error::{Error, Result};
use cfg_if::cfg_if;
use std::mem;

cfg_if! {
  if #[cfg(unix)] {
    mod unix;
    use self::unix as os;
  } else if #[cfg(windows)] {
    mod windows;
    use self::windows as os;
  } else {
    compile_error!("unsupported target operating system");
  }
}

/// Page protection applied while code is being patched.
pub const PATCH_PROTECTION: region::Protection = region::Protection::READ_WRITE_EXECUTE;

/// Page protection for code at rest.
pub const DEFAULT_PROTECTION: region::Protection = region::Protection::READ_EXECUTE;

/// Changes the access protection of a memory range.
///
/// The range is rounded to whole pages internally.
pub unsafe fn protect(address: *const (), size: usize, protection: region::Protection) -> Result<()> {
  Ok(region::protect(address as *const u8, size, protection)?)
}

/// An anonymous read-write-executable memory mapping.
///
/// The mapping is released on drop, ignoring any failure. Use `release` to
/// observe the result of the operation instead.
pub struct ExecutableMemory {
  base: *mut u8,
  size: usize,
}

impl ExecutableMemory {
  /// Allocates a fresh mapping at an address chosen by the OS.
  pub fn allocate(size: usize) -> Result<ExecutableMemory> {
    let base = os::allocate(size).map_err(Error::Allocate)?;
    Ok(ExecutableMemory { base, size })
  }

  /// Returns the base address of the mapping.
  pub fn as_ptr(&self) -> *const () {
    self.base as *const ()
  }

  /// Returns the size of the mapping.
  pub fn len(&self) -> usize {
    self.size
  }

  /// Copies `code` to the start of the mapping.
  pub unsafe fn write(&mut self, code: &[u8]) {
    assert!(code.len() <= self.size);
    std::ptr::copy_nonoverlapping(code.as_ptr(), self.base, code.len());
  }

  /// Releases the mapping, surfacing any operating system failure.
  pub fn release(self) -> Result<()> {
    let result = os::release(self.base, self.size).map_err(Error::Deallocate);
    mem::forget(self);
    result
  }

  /// Consumes the handle without releasing the mapping.
  pub fn leak(self) -> *const () {
    let base = self.base as *const ();
    mem::forget(self);
    base
  }
}

impl Drop for ExecutableMemory {
  fn drop(&mut self) {
    let _ = os::release(self.base, self.size);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn allocated_memory_is_writable() {
    let code = [0xDE, 0xAD, 0xBE, 0xEF];
    let mut memory = ExecutableMemory::allocate(code.len()).unwrap();

    unsafe {
      memory.write(&code);
      let written = std::slice::from_raw_parts(memory.as_ptr() as *const u8, code.len());
      assert_eq!(written, &code);
    }
  }

  #[test]
  fn release_reports_success() {
    let memory = ExecutableMemory::allocate(16).unwrap();
    assert!(memory.release().is_ok());
  }

  #[test]
  fn protection_can_be_lowered_and_restored() {
    let memory = ExecutableMemory::allocate(16).unwrap();

    unsafe {
      protect(memory.as_ptr(), memory.len(), DEFAULT_PROTECTION).unwrap();
      protect(memory.as_ptr(), memory.len(), PATCH_PROTECTION).unwrap();
    }
  }
}
