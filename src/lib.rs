//! # jni-marshal
//!
//! Marshalling of Java arrays, strings and objects into native Rust code,
//! with a strided tensor view over pinned primitive arrays.
//!
//! This crate is for native methods (`Java_...` entry points in a `cdylib`)
//! that need to read and write large Java numeric arrays without copying them
//! element by element through JNI:
//! - Compile-time type dispatch: one generic API per operation for all eight
//!   Java primitives, strings and objects
//! - Scoped pinning of primitive arrays with guaranteed release
//! - A (rows x cols x channels) view in column- or row-major order, with
//!   range and index-list region copies
//! - A native handle for the Java `Matkc` multi-channel matrix class
//! - Errors as `Result`, thrown back to Java as exceptions at the boundary
//!
//! ## Quick Start
//!
//! **1. Configure Cargo.toml:**
//! ```toml
//! [lib]
//! crate-type = ["cdylib"]
//!
//! [dependencies]
//! jni-marshal = "0.1"
//! ```
//!
//! **2. Export a native method (src/lib.rs):**
//! ```rust,ignore
//! use jni_marshal::prelude::*;
//!
//! #[no_mangle]
//! pub extern "system" fn Java_demo_Native_channelMeans(
//!     env: *mut jni::JNIEnv,
//!     _cls: jni::jclass,
//!     mat: jni::jobject,
//! ) -> jni::jdoubleArray {
//!     let env = unsafe { JniEnv::from_raw(env) };
//!     let result = Matkc::wrap(&env, JObject(mat)).and_then(|m| {
//!         let mut means = Vec::with_capacity(m.channels());
//!         for k in 0..m.channels() {
//!             let values = m.region_vec(&AddressSpec::channel(k as i32))?;
//!             means.push(values.iter().sum::<f64>() / values.len() as f64);
//!         }
//!         env.vec_to_array(&means)
//!     });
//!     env.or_throw(result).map_or(std::ptr::null_mut(), |a| a.as_raw())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Your Native Method Code                  │
//! ├─────────────────────────────────────────────────────────┤
//! │        Matkc, JavaObject, bridges (ndarray, image)       │
//! ├─────────────────────────────────────────────────────────┤
//! │   ArrayHandle / PinnedBuffer   │   CopyPlan, TensorView  │
//! ├─────────────────────────────────────────────────────────┤
//! │     env::JniEnv - typed calls, strings, exceptions       │
//! │     kind - Primitive, ElementKind, signatures, traits    │
//! ├─────────────────────────────────────────────────────────┤
//! │     sys::jni - JNI types and function table layout       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`sys::jni`] | Raw JNI types and function table (for FFI) |
//! | [`env`] | **`JniEnv` wrapper** - start here |
//! | [`kind`] | Element kinds, signatures, handle types, dispatch traits |
//! | [`tensor`] | `TensorView`, `AddressSpec` and index resolution |
//! | [`copier`] | Region copy planning (gather/scatter) |
//! | [`pinned`] | `PinnedBuffer` and `ArrayHandle` |
//! | [`convert`] | Whole-array and string conversions |
//! | [`java_class`] | Reflective `JavaObject` wrapper |
//! | [`matkc`] | The `Matkc` matrix contract |
//! | [`bridge`] | `ndarray` and `image` conversions (features) |
//!
//! ## Features
//!
//! | Feature | Adds |
//! |---------|------|
//! | `ndarray` | `Matkc::{from,to}_array{2,3}`, `from_pixels`, `to_pixels` |
//! | `image` | `Matkc::from_image`, `Matkc::to_image` |
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: pin and
//! release at `debug`, cleared lookup failures at `warn`, errors thrown to
//! Java at `error`. Install any logger in your library's load hook to see
//! them.

pub mod sys;
pub mod env;

// Implementation module (use `env` module for the public API)
#[doc(hidden)]
pub mod jni_wrapper;

pub mod bridge;
pub mod convert;
pub mod copier;
pub mod error;
pub mod java_class;
pub mod kind;
pub mod matkc;
pub mod pinned;
pub mod prelude;
pub mod tensor;

pub use crate::error::{Error, Result};
pub use crate::sys::jni as jni;
