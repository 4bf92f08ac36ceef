use std::{io, ptr};

/// Maps a fresh anonymous read-write-executable region.
pub fn allocate(size: usize) -> io::Result<*mut u8> {
  let base = unsafe {
    libc::mmap(
      ptr::null_mut(),
      size,
      libc::PROT_READ | libc::PROT_WRITE | libc::PROT_EXEC,
      libc::MAP_ANONYMOUS | libc::MAP_PRIVATE,
      -1,
      0,
    )
  };

  if base == libc::MAP_FAILED {
    Err(io::Error::last_os_error())
  } else {
    Ok(base as *mut u8)
  }
}

/// Unmaps a previously mapped region.
pub fn release(base: *mut u8, size: usize) -> io::Result<()> {
  if unsafe { libc::munmap(base as *mut libc::c_void, size) } == 0 {
    Ok(())
  } else {
    Err(io::Error::last_os_error())
  }
}
