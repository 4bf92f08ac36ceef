use std::error::Error as StdError;
use std::{fmt, io};

/// The result of a hooking operation.
pub type Result<T> = std::result::Result<T, Error>;

/// A representation of all possible errors.
#[derive(Debug)]
pub enum Error {
  /// The supplied patch boundary cannot fit a jump stencil.
  InsufficientPatchRoom {
    /// The size of one jump stencil.
    required: usize,
    /// The prolog size supplied by the caller.
    supplied: usize,
  },
  /// Executable memory could not be allocated.
  Allocate(io::Error),
  /// A page protection change failed.
  Protect(region::Error),
  /// The trampoline's memory block could not be released.
  Deallocate(io::Error),
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Error::InsufficientPatchRoom { required, supplied } => write!(
        f,
        "prolog of {} byte(s) cannot fit a {}-byte jump",
        supplied, required
      ),
      Error::Allocate(error) => write!(f, "cannot allocate executable memory: {}", error),
      Error::Protect(error) => write!(f, "cannot change page protection: {}", error),
      Error::Deallocate(error) => write!(f, "cannot release executable memory: {}", error),
    }
  }
}

impl StdError for Error {
  fn source(&self) -> Option<&(dyn StdError + 'static)> {
    match self {
      Error::InsufficientPatchRoom { .. } => None,
      Error::Allocate(error) | Error::Deallocate(error) => Some(error),
      Error::Protect(error) => Some(error),
    }
  }
}

impl From<region::Error> for Error {
  fn from(error: region::Error) -> Self {
    Error::Protect(error)
  }
}
