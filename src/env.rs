//! High-level wrapper around the raw JNI environment pointer.
//!
//! [`JniEnv`] is what native entry points build first. It turns JNI calls into
//! `Result` returns, converts strings, computes signatures and bridges errors
//! back to Java as exceptions.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use jni_marshal::prelude::*;
//!
//! #[no_mangle]
//! pub extern "system" fn Java_demo_Native_scale(
//!     env: *mut jni::JNIEnv,
//!     _cls: jni::jclass,
//!     mat: jni::jobject,
//!     factor: jni::jdouble,
//! ) {
//!     let env = unsafe { JniEnv::from_raw(env) };
//!     let result = Matkc::wrap(&env, JObject(mat)).and_then(|mut m| {
//!         for v in m.data_mut()? {
//!             *v *= factor;
//!         }
//!         Ok(())
//!     });
//!     env.or_throw(result);
//! }
//! ```
//!
//! # JNI Environment
//!
//! The [`JniEnv`] struct provides methods for:
//!
//! - **Classes**: Find classes, query runtime class names and signatures
//! - **Objects**: Create objects with computed constructor signatures
//! - **Strings**: UTF-16 conversion between Java and Rust strings
//! - **Arrays**: Create arrays, copy them to and from `Vec`
//! - **Methods**: Call instance and static methods with typed returns
//! - **Fields**: Get and set instance and static fields
//! - **Exceptions**: Check, clear and throw; map [`Error`](crate::Error) to Java
//!
//! # Reference Guards
//!
//! [`LocalRef`] deletes a local reference when dropped:
//!
//! ```rust,ignore
//! fn string_length(env: &JniEnv) -> Result<()> {
//!     let class = LocalRef::new(env, env.find_class("java.lang.String")?);
//!     let method = env.get_method_id(class.get(), "length", "()I")?;
//!     // class is deleted here
//!     Ok(())
//! }
//! ```

mod jni_impl {
    pub use crate::jni_wrapper::{JniEnv, LocalRef};
}

pub use jni_impl::{JniEnv, LocalRef};
