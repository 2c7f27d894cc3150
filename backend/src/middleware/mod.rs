//! Request middleware.
//!
//! Purpose: attach a per-request trace identifier to every response and to
//! the task that serves it.

pub mod trace;

pub use trace::Trace;
