use std::{io, ptr};
use winapi::um::memoryapi::{VirtualAlloc, VirtualFree};
use winapi::um::winnt::{MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_EXECUTE_READWRITE};

/// Commits a fresh read-write-executable region.
pub fn allocate(size: usize) -> io::Result<*mut u8> {
  let base = unsafe {
    VirtualAlloc(
      ptr::null_mut(),
      size,
      MEM_COMMIT | MEM_RESERVE,
      PAGE_EXECUTE_READWRITE,
    )
  };

  if base.is_null() {
    Err(io::Error::last_os_error())
  } else {
    Ok(base as *mut u8)
  }
}

/// Releases a previously committed region.
///
/// `VirtualFree` requires a zero size when releasing a whole reservation.
pub fn release(base: *mut u8, _size: usize) -> io::Result<()> {
  if unsafe { VirtualFree(base as *mut _, 0, MEM_RELEASE) } == 0 {
    Err(io::Error::last_os_error())
  } else {
    Ok(())
  }
}
