//! Reflective access to one Java class and, optionally, one instance of it.
//!
//! Signatures are computed rather than written by hand: field and return
//! types come from the Rust type parameter, argument types from the
//! [`JValue`] tags, and object arguments are resolved by asking the object
//! for its runtime class.
//!
//! ```rust,ignore
//! let mut list = JavaObject::for_class(&env, "java.util.ArrayList")?;
//! list.construct(&[JValue::Int(16)])?;
//! let size: jint = list.call_method("size", &[])?;
//! ```

use crate::env::JniEnv;
use crate::error::{Error, Result};
use crate::jni_wrapper::{class_lookup_name, static_signature};
use crate::kind::{class_signature, FieldType, JObject, JValue, ReturnType};
use crate::sys::jni;

/// A Java class handle with an optional instance.
pub struct JavaObject<'env> {
    env: &'env JniEnv,
    class: jni::jclass,
    class_name: String,
    obj: Option<JObject>,
}

impl<'env> JavaObject<'env> {
    /// Looks up a class by name (`a.b.C`, `a/b/C` or `La/b/C;`). No instance
    /// is attached until [`JavaObject::construct`] is called.
    pub fn for_class(env: &'env JniEnv, name: &str) -> Result<Self> {
        let class = env.find_class(name)?;
        let class_name = class_lookup_name(name);
        log::debug!("resolved class {}", class_name);
        Ok(JavaObject { env, class, class_name, obj: None })
    }

    /// Wraps an existing object; its class is discovered by reflection.
    pub fn wrap(env: &'env JniEnv, obj: JObject) -> Result<Self> {
        let class = env.get_object_class(obj.as_raw())?;
        let name = match env.class_name(class) {
            Ok(name) => name,
            Err(e) => {
                env.delete_local_ref(class);
                return Err(e);
            }
        };
        Ok(JavaObject { env, class, class_name: class_lookup_name(&name), obj: Some(obj) })
    }

    pub fn class(&self) -> jni::jclass {
        self.class
    }

    /// Slash-separated class name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// `L...;` token of the class.
    pub fn signature(&self) -> String {
        class_signature(&self.class_name)
    }

    pub fn object(&self) -> Option<JObject> {
        self.obj
    }

    /// Creates a new instance, choosing the constructor from the argument
    /// kinds, and attaches it.
    pub fn construct(&mut self, args: &[JValue]) -> Result<JObject> {
        let sig = self.env.signature_of_call(args, "V")?;
        let obj = self.env.new_object(self.class, &sig, args)?;
        log::debug!("constructed {}{}", self.class_name, sig);
        self.obj = Some(obj);
        Ok(obj)
    }

    fn instance(&self) -> Result<jni::jobject> {
        self.obj
            .map(|obj| obj.as_raw())
            .filter(|raw| !raw.is_null())
            .ok_or(Error::NullReference("no instance attached"))
    }

    // =========================================================================
    // Instance fields
    // =========================================================================

    pub fn get_field<T: FieldType>(&self, name: &str) -> Result<T> {
        let sig = static_signature::<T>()?;
        let id = self.env.get_field_id(self.class, name, sig)?;
        Ok(self.env.get_field_by_id(self.instance()?, id))
    }

    /// Reads a reference field declared with class `class_name`.
    pub fn get_object_field(&self, name: &str, class_name: &str) -> Result<JObject> {
        let id = self.env.get_field_id(self.class, name, &class_signature(class_name))?;
        Ok(self.env.get_field_by_id(self.instance()?, id))
    }

    pub fn set_field<T: FieldType>(&self, name: &str, value: T) -> Result<()> {
        let sig = static_signature::<T>()?;
        let id = self.env.get_field_id(self.class, name, sig)?;
        self.env.set_field_by_id(self.instance()?, id, value);
        Ok(())
    }

    /// Writes a reference field declared with class `class_name`. `value`
    /// may be null or any subtype of the declared class.
    pub fn set_object_field(&self, name: &str, class_name: &str, value: JObject) -> Result<()> {
        let id = self.env.get_field_id(self.class, name, &class_signature(class_name))?;
        self.env.set_field_by_id(self.instance()?, id, value);
        Ok(())
    }

    /// Writes a reference field whose declared class is exactly the runtime
    /// class of `value`. Fails for null.
    pub fn set_object_field_inferred(&self, name: &str, value: JObject) -> Result<()> {
        let sig = self.env.signature_of_object(value.as_raw())?;
        let id = self.env.get_field_id(self.class, name, &sig)?;
        self.env.set_field_by_id(self.instance()?, id, value);
        Ok(())
    }

    // =========================================================================
    // Static fields
    // =========================================================================

    pub fn get_static_field<T: FieldType>(&self, name: &str) -> Result<T> {
        self.env.get_static_field(self.class, name)
    }

    pub fn get_static_object_field(&self, name: &str, class_name: &str) -> Result<JObject> {
        self.env.get_static_field_with_sig(self.class, name, &class_signature(class_name))
    }

    pub fn set_static_field<T: FieldType>(&self, name: &str, value: T) -> Result<()> {
        self.env.set_static_field(self.class, name, value)
    }

    pub fn set_static_object_field(&self, name: &str, class_name: &str, value: JObject) -> Result<()> {
        self.env.set_static_field_with_sig(self.class, name, &class_signature(class_name), value)
    }

    // =========================================================================
    // Methods
    // =========================================================================

    /// Calls an instance method; the return token comes from `R`.
    pub fn call_method<R: ReturnType>(&self, name: &str, args: &[JValue]) -> Result<R> {
        let sig = self.env.signature_of_call(args, return_signature::<R>()?)?;
        let id = self.env.get_method_id(self.class, name, &sig)?;
        self.env.call_method_by_id(self.instance()?, id, args)
    }

    /// Calls an instance method returning an instance of `ret_class`.
    pub fn call_object_method(&self, name: &str, ret_class: &str, args: &[JValue]) -> Result<JObject> {
        let sig = self.env.signature_of_call(args, &class_signature(ret_class))?;
        let id = self.env.get_method_id(self.class, name, &sig)?;
        self.env.call_method_by_id(self.instance()?, id, args)
    }

    /// Calls a static method; the return token comes from `R`.
    pub fn call_static_method<R: ReturnType>(&self, name: &str, args: &[JValue]) -> Result<R> {
        let sig = self.env.signature_of_call(args, return_signature::<R>()?)?;
        self.env.call_static_method(self.class, name, &sig, args)
    }

    /// Calls a static method returning an instance of `ret_class`.
    pub fn call_static_object_method(&self, name: &str, ret_class: &str, args: &[JValue]) -> Result<JObject> {
        let sig = self.env.signature_of_call(args, &class_signature(ret_class))?;
        self.env.call_static_method(self.class, name, &sig, args)
    }
}

impl Drop for JavaObject<'_> {
    fn drop(&mut self) {
        if !self.class.is_null() {
            self.env.delete_local_ref(self.class);
        }
    }
}

fn return_signature<R: ReturnType>() -> Result<&'static str> {
    R::SIGNATURE
        .ok_or_else(|| Error::InvalidSignature("object returns need an explicit class name".to_string()))
}
