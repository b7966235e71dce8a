//! Common imports for native methods that marshal Java data.
//!
//! This prelude is intentionally small. It covers the types and helpers most
//! entry points use while avoiding over-broad re-exports.

pub use crate::bridge::Scale;
pub use crate::env::{JniEnv, LocalRef};
pub use crate::error::{Error, Result};
pub use crate::java_class::JavaObject;
pub use crate::kind::{ElementKind, JArray, JObject, JString, JValue, Primitive};
pub use crate::matkc::{Matkc, MatkcLayout};
pub use crate::pinned::{ArrayHandle, PinnedBuffer, ReleaseMode};
pub use crate::sys::jni;
pub use crate::tensor::{AddressSpec, AxisRange, ElementOrder, TensorView, LAST};
