//! A minimal inline hooking library with caller-controlled patch boundaries.
//!
//! ## Intro
//!
//! This library redirects execution of a compiled function to a caller
//! supplied handler by overwriting the function's prolog with an
//! unconditional jump. The stolen prolog bytes are preserved inside a
//! generated trampoline, so the original behavior remains callable while the
//! hook is installed.
//!
//! Unlike disassembling detour libraries, no instruction analysis is
//! performed. The caller states where the first instruction *after* the
//! patched region begins, as an offset from the target (the *patch
//! boundary*), and that offset must cover at least [`JUMP_SIZE`] bytes.
//!
//! ## Procedure
//!
//! To illustrate on x64, a target function with a 14-byte prolog:
//!
//! ```c
//! int deep_thought() {
//! 00400020 [48 b8 2a ...]    mov rax, 42        ; 10 bytes
//! 0040002a [90 90 90 90]     nop (×4)           ; padding up to the boundary
//! 0040002e [c3]              ret
//! }
//! ```
//!
//! Installing a hook with a patch boundary of 14 replaces the prolog with a
//! jump to the trap, and allocates a trampoline holding the original bytes
//! followed by a jump back to `0x0040002e`:
//!
//! ```c
//! 00400020 [68 .. .. .. ..]  push trap[31:0]
//! 00400025 [c7 44 24 04 ..]  mov dword [rsp+4], trap[63:32]
//! 0040002d [c3]              ret                ; pops trap into rip
//! 0040002e [c3]              ret                ; left in place
//! ```
//!
//! The push/ret discipline is deliberate: it encodes a full 64-bit absolute
//! jump without clobbering any general purpose register.
//!
//! ## Caveats
//!
//! The caller is responsible for:
//!
//! - Supplying a patch boundary that falls on an instruction boundary of the
//!   target. No validation is performed; a misaligned boundary produces a
//!   trampoline that executes a torn instruction.
//! - Not installing two hooks whose patch windows overlap on the same
//!   target.
//! - Serializing `install`/`remove` against other threads, and against
//!   concurrent execution of the target's prolog. All operations here are
//!   synchronous and lock-free.
//!
//! ## Example
//!
//! ```no_run
//! use springboard::{Hook, JUMP_SIZE};
//! use std::mem;
//!
//! unsafe extern "C" fn add(x: u64, y: u64) -> u64 { x + y }
//! unsafe extern "C" fn mul(x: u64, y: u64) -> u64 { x * y }
//!
//! unsafe fn example() -> springboard::Result<()> {
//!   let mut hook = Hook::new(add as *const (), mul as *const (), JUMP_SIZE)?;
//!   let original: unsafe extern "C" fn(u64, u64) -> u64 = mem::transmute(hook.install()?);
//!
//!   assert_eq!(add(3, 3), 9);
//!   assert_eq!(original(3, 3), 6);
//!   hook.remove()
//! }
//! ```

// Re-exports
pub use crate::arch::JUMP_SIZE;
pub use crate::error::{Error, Result};
pub use crate::hook::Hook;

// Modules
pub mod error;
mod alloc;
mod arch;
mod hook;
