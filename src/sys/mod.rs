//! Raw FFI bindings.
//!
//! Nothing in here is safe to call directly; use [`crate::env::JniEnv`].

pub mod jni;
