use crate::alloc::{self, ExecutableMemory};
use crate::arch;
use crate::error::{Error, Result};
use std::{fmt, ptr, slice};

/// An inline hook on a single target function.
///
/// The hook starts out uninstalled; `install` patches the target and
/// `remove` restores it. A hook created with `scoped` removes itself when
/// dropped, otherwise dropping the handle leaves the target patched and the
/// trampoline alive.
pub struct Hook {
  target: *const (),
  trap: *const (),
  prolog_size: usize,
  scope_bound: bool,
  trampoline: Option<ExecutableMemory>,
}

impl Hook {
  /// Creates a new hook for `target`, redirecting it to `trap`.
  ///
  /// `prolog_size` is the offset of the first instruction of the target
  /// that is *not* overwritten by the patch. It must fall on an instruction
  /// boundary and cover at least [`crate::JUMP_SIZE`] bytes; only the
  /// latter is validated here. No memory is touched until `install`.
  ///
  /// Both pointers must remain valid code addresses for the lifetime of the
  /// hook.
  pub unsafe fn new(target: *const (), trap: *const (), prolog_size: usize) -> Result<Hook> {
    Self::with_scope(target, trap, prolog_size, false)
  }

  /// Creates a hook that removes itself when dropped.
  pub unsafe fn scoped(target: *const (), trap: *const (), prolog_size: usize) -> Result<Hook> {
    Self::with_scope(target, trap, prolog_size, true)
  }

  fn with_scope(
    target: *const (),
    trap: *const (),
    prolog_size: usize,
    scope_bound: bool,
  ) -> Result<Hook> {
    if prolog_size < arch::JUMP_SIZE {
      return Err(Error::InsufficientPatchRoom {
        required: arch::JUMP_SIZE,
        supplied: prolog_size,
      });
    }

    Ok(Hook {
      target,
      trap,
      prolog_size,
      scope_bound,
      trampoline: None,
    })
  }

  /// Returns whether the hook is installed or not.
  pub fn is_installed(&self) -> bool {
    self.trampoline.is_some()
  }

  /// Returns the trampoline's entry address, if installed.
  pub fn trampoline(&self) -> Option<*const ()> {
    self.trampoline.as_ref().map(|block| block.as_ptr())
  }

  /// Installs the hook and returns the trampoline's entry address.
  ///
  /// The returned address replays the target's stolen prolog and then
  /// resumes at the patch boundary; invoke through it to run the original
  /// function. Installing an already installed hook returns the existing
  /// trampoline address without touching memory.
  ///
  /// On failure the target is left untouched: it is the last thing mutated.
  pub unsafe fn install(&mut self) -> Result<*const ()> {
    if let Some(ref block) = self.trampoline {
      return Ok(block.as_ptr());
    }

    let prolog = slice::from_raw_parts(self.target as *const u8, self.prolog_size);
    let resume = self.target as usize + self.prolog_size;

    let mut block = ExecutableMemory::allocate(self.prolog_size + arch::JUMP_SIZE)?;
    alloc::protect(block.as_ptr(), block.len(), alloc::PATCH_PROTECTION)?;
    alloc::protect(self.target, arch::JUMP_SIZE, alloc::PATCH_PROTECTION)?;

    // The trampoline must be complete before the target's prolog is
    // replaced; a thread entering the target mid-patch then observes either
    // entirely old or entirely new code at the stencil boundary.
    block.write(&arch::trampoline(prolog, resume));
    ptr::copy_nonoverlapping(
      arch::jmp_abs(self.trap as usize).as_ptr(),
      self.target as *mut u8,
      arch::JUMP_SIZE,
    );

    let entry = block.as_ptr();
    self.trampoline = Some(block);
    Ok(entry)
  }

  /// Removes the hook, restoring the target's original prolog.
  ///
  /// A no-op if the hook is not installed. The hook transitions to
  /// uninstalled even when a protection or deallocation failure is
  /// surfaced, so a hook can never end up stuck installed.
  pub unsafe fn remove(&mut self) -> Result<()> {
    let block = match self.trampoline.take() {
      Some(block) => block,
      None => return Ok(()),
    };

    // The trampoline holds the only copy of the stolen prolog
    ptr::copy_nonoverlapping(
      block.as_ptr() as *const u8,
      self.target as *mut u8,
      self.prolog_size,
    );

    alloc::protect(self.target, self.prolog_size, alloc::DEFAULT_PROTECTION)?;
    block.release()
  }
}

impl Drop for Hook {
  /// Removes the hook if it is scope-bound; otherwise the patch and the
  /// trampoline outlive the handle.
  fn drop(&mut self) {
    if self.scope_bound {
      let _ = unsafe { self.remove() };
    } else if let Some(block) = self.trampoline.take() {
      block.leak();
    }
  }
}

impl fmt::Debug for Hook {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "Hook {{ installed: {}, target: {:?}, trap: {:?} }}",
      self.is_installed(),
      self.target,
      self.trap
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use matches::assert_matches;

  fn dangling() -> *const () {
    0x1000 as *const ()
  }

  #[test]
  fn construction_requires_patch_room() {
    for supplied in 0..arch::JUMP_SIZE {
      let error = unsafe { Hook::new(dangling(), dangling(), supplied) }.unwrap_err();
      assert_matches!(
        error,
        Error::InsufficientPatchRoom {
          required: arch::JUMP_SIZE,
          ..
        }
      );
    }
  }

  #[test]
  fn construction_accepts_exact_patch_room() {
    let hook = unsafe { Hook::new(dangling(), dangling(), arch::JUMP_SIZE) }.unwrap();
    assert!(!hook.is_installed());
  }

  #[test]
  fn remove_without_install_is_a_noop() {
    let mut hook = unsafe { Hook::new(dangling(), dangling(), arch::JUMP_SIZE) }.unwrap();

    assert!(unsafe { hook.remove() }.is_ok());
    assert!(!hook.is_installed());
    assert_eq!(hook.trampoline(), None);
  }

  #[test]
  fn uninstalled_scoped_hook_drops_cleanly() {
    let hook = unsafe { Hook::scoped(dangling(), dangling(), arch::JUMP_SIZE) }.unwrap();
    drop(hook);
  }
}
