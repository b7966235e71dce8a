//! Conversions between Java arrays/strings and Rust collections.

use crate::env::{JniEnv, LocalRef};
use crate::error::{Error, Result};
use crate::kind::{ArrayElement, JArray, JObject, JString};
use crate::pinned::{PinnedBuffer, ReleaseMode};
use crate::sys::jni;

/// Converts a `jboolean` to `bool` (anything non-zero is true).
pub fn bool_from_java(value: jni::jboolean) -> bool {
    value != jni::JNI_FALSE
}

/// Converts a `bool` to a `jboolean`.
pub fn bool_to_java(value: bool) -> jni::jboolean {
    if value {
        jni::JNI_TRUE
    } else {
        jni::JNI_FALSE
    }
}

impl JniEnv {
    // =========================================================================
    // Primitive Arrays
    // =========================================================================

    /// Copies a Java primitive array into a `Vec`.
    pub fn array_to_vec<T: ArrayElement>(&self, array: JArray<T>) -> Result<Vec<T>> {
        if self.get_array_length(array.as_raw())? == 0 {
            return Ok(Vec::new());
        }
        let mut pinned = PinnedBuffer::pin(self, array)?;
        pinned.set_release_mode(ReleaseMode::NoCopyBack);
        Ok(pinned.to_vec())
    }

    /// Creates a new Java array holding a copy of `data`.
    pub fn vec_to_array<T: ArrayElement>(&self, data: &[T]) -> Result<JArray<T>> {
        let array = self.new_array::<T>(data.len())?;
        if !data.is_empty() {
            let mut pinned = PinnedBuffer::pin(self, array)?;
            pinned.copy_from_slice(data);
        }
        Ok(array)
    }

    /// Overwrites the contents of an existing Java array.
    ///
    /// `data` must have exactly the array's length.
    pub fn fill_array<T: ArrayElement>(&self, array: JArray<T>, data: &[T]) -> Result<()> {
        let len = self.get_array_length(array.as_raw())?;
        if len != data.len() {
            return Err(Error::shape(format!(
                "array has {} elements, input has {}",
                len,
                data.len()
            )));
        }
        if len == 0 {
            return Ok(());
        }
        let mut pinned = PinnedBuffer::pin(self, array)?;
        pinned.copy_from_slice(data);
        Ok(())
    }

    // =========================================================================
    // String Arrays
    // =========================================================================

    /// Reads a `String[]` into a `Vec<String>`. Null elements are an error.
    pub fn string_array_to_vec(&self, array: jni::jobjectArray) -> Result<Vec<String>> {
        let len = self.get_array_length(array)?;
        let mut out = Vec::with_capacity(len);
        for index in 0..len {
            let element = LocalRef::new(self, self.get_object_array_element(array, index)?.as_raw());
            if element.get().is_null() {
                return Err(Error::NullReference("string array element"));
            }
            out.push(self.get_string(JString(element.get()))?);
        }
        Ok(out)
    }

    /// Creates a `String[]` from Rust strings.
    pub fn strings_to_array<S: AsRef<str>>(&self, strings: &[S]) -> Result<jni::jobjectArray> {
        let array = self.new_object_array(strings.len(), "java/lang/String", JObject::null())?;
        for (index, s) in strings.iter().enumerate() {
            let element = LocalRef::new(self, self.new_string(s.as_ref())?.as_raw());
            self.set_object_array_element(array, index, JObject(element.get()))?;
        }
        Ok(array)
    }
}
