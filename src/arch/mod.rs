//! Architecture specific code generation.
//!
//! Each architecture module exposes the same interface:
//!
//! - A `JUMP_SIZE` constant; the exact size of one absolute jump stencil,
//!   and thereby the minimum patch boundary a caller can supply.
//! - A standalone `jmp_abs` function, encoding an unconditional jump to an
//!   absolute 64-bit destination.
//! - A standalone `trampoline` function, concatenating stolen prolog bytes
//!   with a jump back to the resume address.
//!
//! All functions are pure: they translate addresses to byte sequences and
//! never touch process memory themselves.

use cfg_if::cfg_if;

cfg_if! {
  if #[cfg(target_arch = "x86_64")] {
    mod x64;
    pub use self::x64::{jmp_abs, trampoline, JUMP_SIZE};
  } else {
    compile_error!("unsupported target architecture");
  }
}
