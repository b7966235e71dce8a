//! Safe wrapper around the JNI environment.
//!
//! Every call that can fail on the Java side returns a [`Result`]; lookups
//! that make the JVM raise `NoClassDefFoundError`, `NoSuchMethodError` or
//! `NoSuchFieldError` clear that exception and report a typed [`Error`]
//! instead, so the caller decides what is finally thrown.
//!
//! # Example
//!
//! ```rust,ignore
//! use jni_marshal::env::JniEnv;
//!
//! #[no_mangle]
//! pub extern "system" fn Java_demo_Native_greet(env: *mut jni::JNIEnv, _cls: jni::jclass) -> jni::jstring {
//!     let env = unsafe { JniEnv::from_raw(env) };
//!     env.or_throw(env.new_string("Hello from Rust!"))
//!         .map(|s| s.as_raw())
//!         .unwrap_or(std::ptr::null_mut())
//! }
//! ```

use crate::error::{Error, Result};
use crate::kind::{class_signature, ArrayElement, FieldType, JArray, JObject, JString, JValue, ReturnType};
use crate::sys::jni;
use std::ffi::CString;
use std::ptr;

/// Safe wrapper around a JNI environment pointer.
///
/// # Thread Safety
///
/// A `JniEnv` is tied to a specific thread and cannot be sent across threads.
/// Each JVM thread has its own JNI environment.
pub struct JniEnv {
    env: *mut jni::JNIEnv,
}

impl JniEnv {
    /// Creates a JniEnv wrapper from a raw pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure the pointer is valid and comes from the current thread.
    pub unsafe fn from_raw(env: *mut jni::JNIEnv) -> Self {
        JniEnv { env }
    }

    /// Returns the raw JNI environment pointer.
    pub fn raw(&self) -> *mut jni::JNIEnv {
        self.env
    }

    // =========================================================================
    // Version
    // =========================================================================

    /// Returns the JNI version.
    pub fn get_version(&self) -> jni::jint {
        unsafe {
            let vtable = *self.env;
            ((*vtable).GetVersion)(self.env)
        }
    }

    // =========================================================================
    // Class Operations
    // =========================================================================

    /// Finds a class by name.
    ///
    /// Accepts `java/lang/String`, `java.lang.String` or `Ljava/lang/String;`.
    pub fn find_class(&self, name: &str) -> Result<jni::jclass> {
        let lookup = class_lookup_name(name);
        let c_name = CString::new(lookup.as_str())?;
        let cls = unsafe {
            let vtable = *self.env;
            ((*vtable).FindClass)(self.env, c_name.as_ptr())
        };
        if cls.is_null() {
            self.clear_lookup_failure("FindClass", &lookup);
            return Err(Error::ClassNotFound(lookup));
        }
        Ok(cls)
    }

    /// Gets the class of an object.
    pub fn get_object_class(&self, obj: jni::jobject) -> Result<jni::jclass> {
        if obj.is_null() {
            return Err(Error::NullReference("object"));
        }
        let cls = unsafe {
            let vtable = *self.env;
            ((*vtable).GetObjectClass)(self.env, obj)
        };
        if cls.is_null() {
            Err(Error::NullReference("class"))
        } else {
            Ok(cls)
        }
    }

    /// Returns the binary name of a class as reported by `Class.getName()`
    /// (`java.lang.String`, `[I`, ...).
    pub fn class_name(&self, cls: jni::jclass) -> Result<String> {
        let class_cls = LocalRef::new(self, self.get_object_class(cls)?);
        let get_name = self.get_method_id(class_cls.get(), "getName", "()Ljava/lang/String;")?;
        let name: JString = self.call_method_by_id(cls, get_name, &[])?;
        if name.is_null() {
            return Err(Error::NullReference("class name"));
        }
        let name_ref = LocalRef::new(self, name.as_raw());
        self.get_string(JString(name_ref.get()))
    }

    /// Computes the `L...;` token of an object's runtime class by reflection.
    pub fn signature_of_object(&self, obj: jni::jobject) -> Result<String> {
        let cls = LocalRef::new(self, self.get_object_class(obj)?);
        let name = self.class_name(cls.get())?;
        Ok(class_signature(&name))
    }

    /// Signature token of a runtime-tagged value; objects are resolved by
    /// reflection.
    pub fn signature_of_value(&self, value: &JValue) -> Result<String> {
        match value {
            JValue::Object(obj) => self.signature_of_object(obj.as_raw()),
            other => other
                .kind()
                .signature()
                .map(str::to_string)
                .ok_or_else(|| Error::InvalidSignature(format!("{:?}", other))),
        }
    }

    /// Builds a method signature from argument values and a return token.
    pub fn signature_of_call(&self, args: &[JValue], ret: &str) -> Result<String> {
        let mut sig = String::from("(");
        for arg in args {
            sig.push_str(&self.signature_of_value(arg)?);
        }
        sig.push(')');
        sig.push_str(ret);
        Ok(sig)
    }

    // =========================================================================
    // Exception Handling
    // =========================================================================

    /// Checks if an exception is pending.
    pub fn exception_check(&self) -> bool {
        unsafe {
            let vtable = *self.env;
            ((*vtable).ExceptionCheck)(self.env) != 0
        }
    }

    /// Clears any pending exception.
    pub fn exception_clear(&self) {
        unsafe {
            let vtable = *self.env;
            ((*vtable).ExceptionClear)(self.env);
        }
    }

    /// Prints the pending exception and stack trace to stderr.
    pub fn exception_describe(&self) {
        unsafe {
            let vtable = *self.env;
            ((*vtable).ExceptionDescribe)(self.env);
        }
    }

    /// Gets the pending exception (if any).
    pub fn exception_occurred(&self) -> Option<jni::jthrowable> {
        unsafe {
            let vtable = *self.env;
            let exc = ((*vtable).ExceptionOccurred)(self.env);
            if exc.is_null() { None } else { Some(exc) }
        }
    }

    /// Returns [`Error::PendingException`] if Java code left an exception
    /// pending.
    pub fn check_exception(&self) -> Result<()> {
        if self.exception_check() {
            Err(Error::PendingException)
        } else {
            Ok(())
        }
    }

    /// Throws a new exception of the named class with the given message.
    pub fn throw_new(&self, class_name: &str, msg: &str) -> Result<()> {
        let cls = LocalRef::new(self, self.find_class(class_name)?);
        let c_msg = CString::new(msg)?;
        let result = unsafe {
            let vtable = *self.env;
            ((*vtable).ThrowNew)(self.env, cls.get(), c_msg.as_ptr())
        };
        if result == jni::JNI_OK {
            Ok(())
        } else {
            Err(Error::PendingException)
        }
    }

    /// Throws `java.lang.IllegalArgumentException` with the given message.
    pub fn throw_illegal_argument(&self, msg: &str) -> Result<()> {
        self.throw_new("java/lang/IllegalArgumentException", msg)
    }

    /// Raises `err` as a Java exception.
    ///
    /// An exception that is already pending is left in place.
    pub fn throw_error(&self, err: &Error) {
        log::error!("native call failed: {}", err);
        let Some(class_name) = err.java_exception_class() else {
            return;
        };
        if self.exception_check() {
            return;
        }
        if let Err(e) = self.throw_new(class_name, &err.to_string()) {
            log::error!("could not raise {}: {}", class_name, e);
        }
    }

    /// Passes `Ok` values through and raises errors as Java exceptions.
    ///
    /// Native entry points return right after a `None`, so Java sees the
    /// exception as soon as control returns.
    pub fn or_throw<T>(&self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.throw_error(&err);
                None
            }
        }
    }

    fn clear_lookup_failure(&self, what: &str, name: &str) {
        if self.exception_check() {
            log::warn!("{} failed for {}, clearing pending exception", what, name);
            self.exception_clear();
        }
    }

    // =========================================================================
    // String Operations
    // =========================================================================

    /// Creates a Java string from a Rust string, encoding it as UTF-16.
    pub fn new_string(&self, s: &str) -> Result<JString> {
        let units: Vec<jni::jchar> = s.encode_utf16().collect();
        let len = to_jsize(units.len())?;
        let jstr = unsafe {
            let vtable = *self.env;
            ((*vtable).NewString)(self.env, units.as_ptr(), len)
        };
        if jstr.is_null() {
            Err(Error::AllocationFailed("string"))
        } else {
            Ok(JString(jstr))
        }
    }

    /// Reads a Java string through its UTF-16 characters.
    ///
    /// Unpaired surrogates are replaced with U+FFFD.
    pub fn get_string(&self, s: JString) -> Result<String> {
        if s.is_null() {
            return Err(Error::NullReference("string"));
        }
        unsafe {
            let vtable = *self.env;
            let len = ((*vtable).GetStringLength)(self.env, s.as_raw());
            let chars = ((*vtable).GetStringChars)(self.env, s.as_raw(), ptr::null_mut());
            if chars.is_null() {
                return Err(Error::AllocationFailed("string characters"));
            }
            let units = std::slice::from_raw_parts(chars, len.max(0) as usize);
            let result = String::from_utf16_lossy(units);
            ((*vtable).ReleaseStringChars)(self.env, s.as_raw(), chars);
            Ok(result)
        }
    }

    /// Gets the UTF-16 length of a Java string.
    pub fn get_string_length(&self, s: JString) -> Result<usize> {
        if s.is_null() {
            return Err(Error::NullReference("string"));
        }
        let len = unsafe {
            let vtable = *self.env;
            ((*vtable).GetStringLength)(self.env, s.as_raw())
        };
        Ok(len.max(0) as usize)
    }

    // =========================================================================
    // Method and Field IDs
    // =========================================================================

    /// Gets a method ID for an instance method.
    pub fn get_method_id(&self, cls: jni::jclass, name: &str, sig: &str) -> Result<jni::jmethodID> {
        let c_name = CString::new(name)?;
        let c_sig = CString::new(sig)?;
        let id = unsafe {
            let vtable = *self.env;
            ((*vtable).GetMethodID)(self.env, cls, c_name.as_ptr(), c_sig.as_ptr())
        };
        if id.is_null() {
            self.clear_lookup_failure("GetMethodID", name);
            return Err(Error::MethodNotFound { name: name.to_string(), signature: sig.to_string() });
        }
        Ok(id)
    }

    /// Gets a method ID for a static method.
    pub fn get_static_method_id(&self, cls: jni::jclass, name: &str, sig: &str) -> Result<jni::jmethodID> {
        let c_name = CString::new(name)?;
        let c_sig = CString::new(sig)?;
        let id = unsafe {
            let vtable = *self.env;
            ((*vtable).GetStaticMethodID)(self.env, cls, c_name.as_ptr(), c_sig.as_ptr())
        };
        if id.is_null() {
            self.clear_lookup_failure("GetStaticMethodID", name);
            return Err(Error::MethodNotFound { name: name.to_string(), signature: sig.to_string() });
        }
        Ok(id)
    }

    /// Gets a field ID for an instance field.
    pub fn get_field_id(&self, cls: jni::jclass, name: &str, sig: &str) -> Result<jni::jfieldID> {
        let c_name = CString::new(name)?;
        let c_sig = CString::new(sig)?;
        let id = unsafe {
            let vtable = *self.env;
            ((*vtable).GetFieldID)(self.env, cls, c_name.as_ptr(), c_sig.as_ptr())
        };
        if id.is_null() {
            self.clear_lookup_failure("GetFieldID", name);
            return Err(Error::FieldNotFound { name: name.to_string(), signature: sig.to_string() });
        }
        Ok(id)
    }

    /// Gets a field ID for a static field.
    pub fn get_static_field_id(&self, cls: jni::jclass, name: &str, sig: &str) -> Result<jni::jfieldID> {
        let c_name = CString::new(name)?;
        let c_sig = CString::new(sig)?;
        let id = unsafe {
            let vtable = *self.env;
            ((*vtable).GetStaticFieldID)(self.env, cls, c_name.as_ptr(), c_sig.as_ptr())
        };
        if id.is_null() {
            self.clear_lookup_failure("GetStaticFieldID", name);
            return Err(Error::FieldNotFound { name: name.to_string(), signature: sig.to_string() });
        }
        Ok(id)
    }

    // =========================================================================
    // Object Operations
    // =========================================================================

    /// Creates a new object by calling the constructor with signature `ctor_sig`.
    pub fn new_object(&self, cls: jni::jclass, ctor_sig: &str, args: &[JValue]) -> Result<JObject> {
        let ctor = self.get_method_id(cls, "<init>", ctor_sig)?;
        self.new_object_by_id(cls, ctor, args)
    }

    /// Creates a new object through an already resolved constructor ID.
    pub fn new_object_by_id(&self, cls: jni::jclass, ctor: jni::jmethodID, args: &[JValue]) -> Result<JObject> {
        let raw_args: Vec<jni::jvalue> = args.iter().map(JValue::as_jvalue).collect();
        let obj = unsafe {
            let vtable = *self.env;
            ((*vtable).NewObjectA)(self.env, cls, ctor, raw_args.as_ptr())
        };
        self.check_exception()?;
        if obj.is_null() {
            Err(Error::AllocationFailed("object"))
        } else {
            Ok(JObject(obj))
        }
    }

    // =========================================================================
    // Field Access
    // =========================================================================

    /// Reads an instance field whose type is fixed by `T`.
    ///
    /// `T` must have a static signature; use [`JniEnv::get_object_field`] for
    /// fields of other reference types.
    pub fn get_field<T: FieldType>(&self, obj: jni::jobject, name: &str) -> Result<T> {
        let sig = static_signature::<T>()?;
        self.get_field_with_sig(obj, name, sig)
    }

    /// Reads an instance field with an explicit signature.
    pub fn get_field_with_sig<T: FieldType>(&self, obj: jni::jobject, name: &str, sig: &str) -> Result<T> {
        let cls = LocalRef::new(self, self.get_object_class(obj)?);
        let id = self.get_field_id(cls.get(), name, sig)?;
        Ok(self.get_field_by_id(obj, id))
    }

    /// Reads an instance field through an already resolved field ID.
    pub fn get_field_by_id<T: FieldType>(&self, obj: jni::jobject, id: jni::jfieldID) -> T {
        unsafe { T::get_field(self.env, obj, id) }
    }

    /// Reads a reference field declared with class `class_name`.
    pub fn get_object_field(&self, obj: jni::jobject, name: &str, class_name: &str) -> Result<JObject> {
        self.get_field_with_sig(obj, name, &class_signature(class_name))
    }

    /// Writes an instance field whose type is fixed by `T`.
    pub fn set_field<T: FieldType>(&self, obj: jni::jobject, name: &str, value: T) -> Result<()> {
        let sig = static_signature::<T>()?;
        self.set_field_with_sig(obj, name, sig, value)
    }

    /// Writes an instance field with an explicit signature.
    pub fn set_field_with_sig<T: FieldType>(&self, obj: jni::jobject, name: &str, sig: &str, value: T) -> Result<()> {
        let cls = LocalRef::new(self, self.get_object_class(obj)?);
        let id = self.get_field_id(cls.get(), name, sig)?;
        self.set_field_by_id(obj, id, value);
        Ok(())
    }

    /// Writes an instance field through an already resolved field ID.
    pub fn set_field_by_id<T: FieldType>(&self, obj: jni::jobject, id: jni::jfieldID, value: T) {
        unsafe { value.set_field(self.env, obj, id) }
    }

    /// Writes a reference field declared with class `class_name`.
    pub fn set_object_field(&self, obj: jni::jobject, name: &str, class_name: &str, value: JObject) -> Result<()> {
        self.set_field_with_sig(obj, name, &class_signature(class_name), value)
    }

    /// Reads a static field whose type is fixed by `T`.
    pub fn get_static_field<T: FieldType>(&self, cls: jni::jclass, name: &str) -> Result<T> {
        let sig = static_signature::<T>()?;
        self.get_static_field_with_sig(cls, name, sig)
    }

    /// Reads a static field with an explicit signature.
    pub fn get_static_field_with_sig<T: FieldType>(&self, cls: jni::jclass, name: &str, sig: &str) -> Result<T> {
        let id = self.get_static_field_id(cls, name, sig)?;
        Ok(unsafe { T::get_static_field(self.env, cls, id) })
    }

    /// Writes a static field whose type is fixed by `T`.
    pub fn set_static_field<T: FieldType>(&self, cls: jni::jclass, name: &str, value: T) -> Result<()> {
        let sig = static_signature::<T>()?;
        self.set_static_field_with_sig(cls, name, sig, value)
    }

    /// Writes a static field with an explicit signature.
    pub fn set_static_field_with_sig<T: FieldType>(
        &self,
        cls: jni::jclass,
        name: &str,
        sig: &str,
        value: T,
    ) -> Result<()> {
        let id = self.get_static_field_id(cls, name, sig)?;
        unsafe { value.set_static_field(self.env, cls, id) };
        Ok(())
    }

    // =========================================================================
    // Method Calls
    // =========================================================================

    /// Calls an instance method; `R` selects the typed call primitive.
    pub fn call_method<R: ReturnType>(&self, obj: jni::jobject, name: &str, sig: &str, args: &[JValue]) -> Result<R> {
        let cls = LocalRef::new(self, self.get_object_class(obj)?);
        let id = self.get_method_id(cls.get(), name, sig)?;
        self.call_method_by_id(obj, id, args)
    }

    /// Calls an instance method through an already resolved method ID.
    pub fn call_method_by_id<R: ReturnType>(&self, obj: jni::jobject, id: jni::jmethodID, args: &[JValue]) -> Result<R> {
        let raw_args: Vec<jni::jvalue> = args.iter().map(JValue::as_jvalue).collect();
        let value = unsafe { R::call_method(self.env, obj, id, raw_args.as_ptr()) };
        self.check_exception()?;
        Ok(value)
    }

    /// Calls a static method; `R` selects the typed call primitive.
    pub fn call_static_method<R: ReturnType>(
        &self,
        cls: jni::jclass,
        name: &str,
        sig: &str,
        args: &[JValue],
    ) -> Result<R> {
        let id = self.get_static_method_id(cls, name, sig)?;
        let raw_args: Vec<jni::jvalue> = args.iter().map(JValue::as_jvalue).collect();
        let value = unsafe { R::call_static_method(self.env, cls, id, raw_args.as_ptr()) };
        self.check_exception()?;
        Ok(value)
    }

    // =========================================================================
    // Reference Management
    // =========================================================================

    /// Deletes a local reference.
    pub fn delete_local_ref(&self, obj: jni::jobject) {
        unsafe {
            let vtable = *self.env;
            ((*vtable).DeleteLocalRef)(self.env, obj);
        }
    }

    // =========================================================================
    // Array Operations
    // =========================================================================

    /// Gets the length of an array.
    pub fn get_array_length(&self, array: jni::jarray) -> Result<usize> {
        if array.is_null() {
            return Err(Error::NullReference("array"));
        }
        let len = unsafe {
            let vtable = *self.env;
            ((*vtable).GetArrayLength)(self.env, array)
        };
        Ok(len.max(0) as usize)
    }

    /// Allocates a new primitive array of `len` elements.
    pub fn new_array<T: ArrayElement>(&self, len: usize) -> Result<JArray<T>> {
        let raw = unsafe { T::new_array(self.env, to_jsize(len)?) };
        if raw.is_null() {
            return Err(Error::AllocationFailed("array"));
        }
        Ok(JArray::from_raw(raw))
    }

    /// Creates a new object array whose elements are instances of `class_name`.
    pub fn new_object_array(&self, len: usize, class_name: &str, init: JObject) -> Result<jni::jobjectArray> {
        let cls = LocalRef::new(self, self.find_class(class_name)?);
        let array = unsafe {
            let vtable = *self.env;
            ((*vtable).NewObjectArray)(self.env, to_jsize(len)?, cls.get(), init.as_raw())
        };
        if array.is_null() {
            return Err(Error::AllocationFailed("object array"));
        }
        Ok(array)
    }

    /// Gets an element of an object array.
    pub fn get_object_array_element(&self, array: jni::jobjectArray, index: usize) -> Result<JObject> {
        let obj = unsafe {
            let vtable = *self.env;
            ((*vtable).GetObjectArrayElement)(self.env, array, to_jsize(index)?)
        };
        self.check_exception()?;
        Ok(JObject(obj))
    }

    /// Sets an element of an object array.
    pub fn set_object_array_element(&self, array: jni::jobjectArray, index: usize, value: JObject) -> Result<()> {
        unsafe {
            let vtable = *self.env;
            ((*vtable).SetObjectArrayElement)(self.env, array, to_jsize(index)?, value.as_raw());
        }
        self.check_exception()
    }
}

/// Normalizes a class name for `FindClass`: dots become slashes and an
/// `L...;` wrapper is removed. Array names stay wrapped.
pub(crate) fn class_lookup_name(name: &str) -> String {
    let slashed = name.replace('.', "/");
    match slashed.strip_prefix('L').and_then(|s| s.strip_suffix(';')) {
        Some(inner) => inner.to_string(),
        None => slashed,
    }
}

pub(crate) fn static_signature<T: FieldType>() -> Result<&'static str> {
    T::KIND.signature().ok_or_else(|| {
        Error::InvalidSignature(format!("{} fields need an explicit class name", T::KIND))
    })
}

pub(crate) fn to_jsize(len: usize) -> Result<jni::jsize> {
    jni::jsize::try_from(len).map_err(|_| Error::shape(format!("{} exceeds the maximum Java array length", len)))
}

// =========================================================================
// Reference Guards (RAII wrappers)
// =========================================================================

/// A guard that automatically deletes a local reference when dropped.
///
/// # Example
///
/// ```rust,ignore
/// let class = LocalRef::new(&env, env.find_class("java/lang/String")?);
/// // class is automatically deleted when it goes out of scope
/// ```
pub struct LocalRef<'a> {
    env: &'a JniEnv,
    obj: jni::jobject,
}

impl<'a> LocalRef<'a> {
    /// Creates a new LocalRef guard.
    pub fn new(env: &'a JniEnv, obj: jni::jobject) -> Self {
        LocalRef { env, obj }
    }

    /// Returns the underlying jobject.
    pub fn get(&self) -> jni::jobject {
        self.obj
    }

    /// Releases the reference without deleting it.
    pub fn into_inner(self) -> jni::jobject {
        let obj = self.obj;
        std::mem::forget(self);
        obj
    }
}

impl<'a> Drop for LocalRef<'a> {
    fn drop(&mut self) {
        if !self.obj.is_null() {
            self.env.delete_local_ref(self.obj);
        }
    }
}
