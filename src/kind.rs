//! Type tags for every value that crosses the JNI boundary.
//!
//! [`ElementKind`] is the closed set of kinds the marshaling layer knows about,
//! and each kind maps to exactly one signature token. The traits in this module
//! bind a Rust type to its kind at compile time, so the correctly typed JNI
//! accessor (`GetIntField`, `CallDoubleMethodA`, `GetFloatArrayElements`, ...)
//! is chosen by the type checker rather than by a runtime branch. Calling the
//! wrong accessor for a field's declared type is undefined behavior in the JVM.
//!
//! | Rust type          | Kind               | Token                  |
//! |--------------------|--------------------|------------------------|
//! | `jboolean` / `bool`| `Boolean`          | `Z`                    |
//! | `jbyte`            | `Byte`             | `B`                    |
//! | `jchar`            | `Char`             | `C`                    |
//! | `jshort`           | `Short`            | `S`                    |
//! | `jint`             | `Int`              | `I`                    |
//! | `jlong`            | `Long`             | `J`                    |
//! | `jfloat`           | `Float`            | `F`                    |
//! | `jdouble`          | `Double`           | `D`                    |
//! | [`JString`]        | `String`           | `Ljava/lang/String;`   |
//! | [`JArray<T>`]      | `Array(T)`         | `[` + token of `T`     |
//! | [`JObject`]        | `Object`           | `L<class>;` (needs a name) |

use crate::error::{Error, Result};
use crate::sys::jni;
use std::fmt;
use std::marker::PhantomData;

// =============================================================================
// Kinds
// =============================================================================

/// The eight Java primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    pub const ALL: [Primitive; 8] = [
        Primitive::Boolean,
        Primitive::Byte,
        Primitive::Char,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
    ];

    /// Single-character signature token.
    pub const fn signature(self) -> &'static str {
        match self {
            Primitive::Boolean => "Z",
            Primitive::Byte => "B",
            Primitive::Char => "C",
            Primitive::Short => "S",
            Primitive::Int => "I",
            Primitive::Long => "J",
            Primitive::Float => "F",
            Primitive::Double => "D",
        }
    }

    /// Token of a one-dimensional array of this primitive.
    pub const fn array_signature(self) -> &'static str {
        match self {
            Primitive::Boolean => "[Z",
            Primitive::Byte => "[B",
            Primitive::Char => "[C",
            Primitive::Short => "[S",
            Primitive::Int => "[I",
            Primitive::Long => "[J",
            Primitive::Float => "[F",
            Primitive::Double => "[D",
        }
    }

    /// Width in bytes of the native representation.
    pub const fn native_size(self) -> usize {
        match self {
            Primitive::Boolean | Primitive::Byte => 1,
            Primitive::Char | Primitive::Short => 2,
            Primitive::Int | Primitive::Float => 4,
            Primitive::Long | Primitive::Double => 8,
        }
    }

    /// Java source name (`int`, `double`, ...).
    pub const fn java_name(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    fn from_token(token: u8) -> Option<Self> {
        Some(match token {
            b'Z' => Primitive::Boolean,
            b'B' => Primitive::Byte,
            b'C' => Primitive::Char,
            b'S' => Primitive::Short,
            b'I' => Primitive::Int,
            b'J' => Primitive::Long,
            b'F' => Primitive::Float,
            b'D' => Primitive::Double,
            _ => return None,
        })
    }
}

/// Every kind of value the marshaling layer can read, write, pass or return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    /// Any reference type other than `String`; its token needs a class name.
    Object,
    String,
    /// One-dimensional array of a primitive.
    Array(Primitive),
}

impl ElementKind {
    pub const fn primitive(p: Primitive) -> Self {
        match p {
            Primitive::Boolean => ElementKind::Boolean,
            Primitive::Byte => ElementKind::Byte,
            Primitive::Char => ElementKind::Char,
            Primitive::Short => ElementKind::Short,
            Primitive::Int => ElementKind::Int,
            Primitive::Long => ElementKind::Long,
            Primitive::Float => ElementKind::Float,
            Primitive::Double => ElementKind::Double,
        }
    }

    /// Signature token, or `None` for [`ElementKind::Object`] whose token
    /// depends on a class name.
    pub const fn signature(self) -> Option<&'static str> {
        match self {
            ElementKind::Object => None,
            ElementKind::String => Some("Ljava/lang/String;"),
            ElementKind::Array(p) => Some(p.array_signature()),
            other => match other.as_primitive() {
                Some(p) => Some(p.signature()),
                None => None,
            },
        }
    }

    /// Width in bytes of the native representation. References are pointer
    /// sized.
    pub const fn native_size(self) -> usize {
        match self.as_primitive() {
            Some(p) => p.native_size(),
            None => std::mem::size_of::<jni::jobject>(),
        }
    }

    pub const fn is_array(self) -> bool {
        matches!(self, ElementKind::Array(_))
    }

    pub const fn is_scalar(self) -> bool {
        !self.is_array()
    }

    /// Element type of an array kind.
    pub const fn component(self) -> Option<Primitive> {
        match self {
            ElementKind::Array(p) => Some(p),
            _ => None,
        }
    }

    pub const fn as_primitive(self) -> Option<Primitive> {
        Some(match self {
            ElementKind::Boolean => Primitive::Boolean,
            ElementKind::Byte => Primitive::Byte,
            ElementKind::Char => Primitive::Char,
            ElementKind::Short => Primitive::Short,
            ElementKind::Int => Primitive::Int,
            ElementKind::Long => Primitive::Long,
            ElementKind::Float => Primitive::Float,
            ElementKind::Double => Primitive::Double,
            _ => return None,
        })
    }

    /// Parses a field signature token. Arrays of references and nested
    /// arrays are reference types and map to [`ElementKind::Object`].
    pub fn from_signature(sig: &str) -> Option<Self> {
        let bytes = sig.as_bytes();
        match bytes {
            [token] => Primitive::from_token(*token).map(ElementKind::primitive),
            [b'[', token] => Primitive::from_token(*token).map(ElementKind::Array),
            [b'[', rest @ ..] => {
                let inner = std::str::from_utf8(rest).ok()?;
                ElementKind::from_signature(inner).map(|_| ElementKind::Object)
            }
            [b'L', .., b';'] if bytes.len() > 2 => {
                if sig == "Ljava/lang/String;" {
                    Some(ElementKind::String)
                } else {
                    Some(ElementKind::Object)
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Object => f.write_str("Object"),
            ElementKind::String => f.write_str("String"),
            ElementKind::Array(p) => write!(f, "{}[]", p.java_name()),
            other => match other.as_primitive() {
                Some(p) => f.write_str(p.java_name()),
                None => Ok(()),
            },
        }
    }
}

// =============================================================================
// Signatures
// =============================================================================

/// A type as it appears in a method or field signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSig<'a> {
    Void,
    Kind(ElementKind),
    /// Reference to a named class (`java.util.List`, `java/util/List` or
    /// `Ljava/util/List;`).
    Class(&'a str),
}

impl TypeSig<'_> {
    pub fn to_signature(&self) -> Result<String> {
        match self {
            TypeSig::Void => Ok("V".to_string()),
            TypeSig::Kind(kind) => kind.signature().map(str::to_string).ok_or_else(|| {
                Error::InvalidSignature("object types need an explicit class name".to_string())
            }),
            TypeSig::Class(name) => {
                if name.is_empty() {
                    return Err(Error::InvalidSignature("empty class name".to_string()));
                }
                Ok(class_signature(name))
            }
        }
    }
}

impl From<ElementKind> for TypeSig<'_> {
    fn from(kind: ElementKind) -> Self {
        TypeSig::Kind(kind)
    }
}

/// Builds the `L...;` token for a class name, replacing dots with slashes.
///
/// Names that already are a token, and array class names (`[I`,
/// `[Ljava.lang.String;`), are returned with only the dots replaced.
pub fn class_signature(name: &str) -> String {
    let slashed = name.replace('.', "/");
    if slashed.starts_with('[') || (slashed.starts_with('L') && slashed.ends_with(';')) {
        slashed
    } else {
        format!("L{};", slashed)
    }
}

/// Builds a method signature: `(` + argument tokens in order + `)` + return
/// token.
///
/// ```
/// use jni_marshal::kind::{method_signature, ElementKind, Primitive, TypeSig};
///
/// let sig = method_signature(
///     &[
///         TypeSig::Kind(ElementKind::Int),
///         TypeSig::Kind(ElementKind::String),
///         TypeSig::Kind(ElementKind::Array(Primitive::Int)),
///     ],
///     TypeSig::Kind(ElementKind::Long),
/// )
/// .unwrap();
/// assert_eq!(sig, "(ILjava/lang/String;[I)J");
/// ```
pub fn method_signature(args: &[TypeSig<'_>], ret: TypeSig<'_>) -> Result<String> {
    let mut sig = String::from("(");
    for arg in args {
        if *arg == TypeSig::Void {
            return Err(Error::InvalidSignature("void is not an argument type".to_string()));
        }
        sig.push_str(&arg.to_signature()?);
    }
    sig.push(')');
    sig.push_str(&ret.to_signature()?);
    Ok(sig)
}

// =============================================================================
// Reference handles
// =============================================================================

/// Untyped object reference.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JObject(pub jni::jobject);

impl JObject {
    pub fn null() -> Self {
        JObject(std::ptr::null_mut())
    }

    pub fn as_raw(&self) -> jni::jobject {
        self.0
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

/// `java.lang.String` reference.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JString(pub jni::jstring);

impl JString {
    pub fn as_raw(&self) -> jni::jstring {
        self.0
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

/// Reference to a one-dimensional primitive array with element type `T`.
#[repr(transparent)]
pub struct JArray<T> {
    raw: jni::jarray,
    _element: PhantomData<T>,
}

impl<T> JArray<T> {
    /// Tags a raw array reference with its element type.
    ///
    /// The reference must actually point at an array of `T` (or be null);
    /// every pin and release on it uses `T`'s accessors.
    pub fn from_raw(raw: jni::jarray) -> Self {
        JArray { raw, _element: PhantomData }
    }

    pub fn as_raw(&self) -> jni::jarray {
        self.raw
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }
}

impl<T> Clone for JArray<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for JArray<T> {}

impl<T> PartialEq for JArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> fmt::Debug for JArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("JArray").field(&self.raw).finish()
    }
}

pub type JBooleanArray = JArray<jni::jboolean>;
pub type JByteArray = JArray<jni::jbyte>;
pub type JCharArray = JArray<jni::jchar>;
pub type JShortArray = JArray<jni::jshort>;
pub type JIntArray = JArray<jni::jint>;
pub type JLongArray = JArray<jni::jlong>;
pub type JFloatArray = JArray<jni::jfloat>;
pub type JDoubleArray = JArray<jni::jdouble>;

// =============================================================================
// Runtime-tagged values
// =============================================================================

/// An argument value tagged with its kind, used where a signature is
/// computed from the arguments themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JValue {
    Boolean(jni::jboolean),
    Byte(jni::jbyte),
    Char(jni::jchar),
    Short(jni::jshort),
    Int(jni::jint),
    Long(jni::jlong),
    Float(jni::jfloat),
    Double(jni::jdouble),
    String(JString),
    Array(Primitive, jni::jarray),
    Object(JObject),
}

impl JValue {
    pub fn kind(&self) -> ElementKind {
        match self {
            JValue::Boolean(_) => ElementKind::Boolean,
            JValue::Byte(_) => ElementKind::Byte,
            JValue::Char(_) => ElementKind::Char,
            JValue::Short(_) => ElementKind::Short,
            JValue::Int(_) => ElementKind::Int,
            JValue::Long(_) => ElementKind::Long,
            JValue::Float(_) => ElementKind::Float,
            JValue::Double(_) => ElementKind::Double,
            JValue::String(_) => ElementKind::String,
            JValue::Array(p, _) => ElementKind::Array(*p),
            JValue::Object(_) => ElementKind::Object,
        }
    }

    /// Raw union as passed to the `...A` call variants.
    pub fn as_jvalue(&self) -> jni::jvalue {
        match *self {
            JValue::Boolean(z) => jni::jvalue { z },
            JValue::Byte(b) => jni::jvalue { b },
            JValue::Char(c) => jni::jvalue { c },
            JValue::Short(s) => jni::jvalue { s },
            JValue::Int(i) => jni::jvalue { i },
            JValue::Long(j) => jni::jvalue { j },
            JValue::Float(f) => jni::jvalue { f },
            JValue::Double(d) => jni::jvalue { d },
            JValue::String(s) => jni::jvalue { l: s.0 },
            JValue::Array(_, l) => jni::jvalue { l },
            JValue::Object(o) => jni::jvalue { l: o.0 },
        }
    }
}

impl<T: JavaType> From<T> for JValue {
    fn from(value: T) -> Self {
        value.into_value()
    }
}

// =============================================================================
// Compile-time dispatch
// =============================================================================

mod sealed {
    pub trait Sealed {}
}

/// A Rust type with a fixed Java kind.
pub trait JavaType: sealed::Sealed + Sized {
    const KIND: ElementKind;

    fn into_value(self) -> JValue;
}

/// Types that can be read from and written to Java fields.
///
/// The methods are raw dispatch points used by [`crate::env::JniEnv`]; they
/// assume valid references and a field ID of matching type.
pub trait FieldType: JavaType {
    #[doc(hidden)]
    unsafe fn get_field(env: *mut jni::JNIEnv, obj: jni::jobject, id: jni::jfieldID) -> Self;
    #[doc(hidden)]
    unsafe fn set_field(self, env: *mut jni::JNIEnv, obj: jni::jobject, id: jni::jfieldID);
    #[doc(hidden)]
    unsafe fn get_static_field(env: *mut jni::JNIEnv, cls: jni::jclass, id: jni::jfieldID) -> Self;
    #[doc(hidden)]
    unsafe fn set_static_field(self, env: *mut jni::JNIEnv, cls: jni::jclass, id: jni::jfieldID);
}

/// Types a Java method can return, including `()` for `void`.
pub trait ReturnType: sealed::Sealed + Sized {
    /// Return token, `None` when a class name is required.
    const SIGNATURE: Option<&'static str>;

    #[doc(hidden)]
    unsafe fn call_method(
        env: *mut jni::JNIEnv,
        obj: jni::jobject,
        id: jni::jmethodID,
        args: *const jni::jvalue,
    ) -> Self;
    #[doc(hidden)]
    unsafe fn call_static_method(
        env: *mut jni::JNIEnv,
        cls: jni::jclass,
        id: jni::jmethodID,
        args: *const jni::jvalue,
    ) -> Self;
}

/// Primitive element types of Java arrays, with their allocate, pin and
/// release functions.
pub trait ArrayElement: JavaType + FieldType + Copy + Default + PartialEq + fmt::Debug + 'static {
    const PRIMITIVE: Primitive;

    #[doc(hidden)]
    unsafe fn new_array(env: *mut jni::JNIEnv, len: jni::jsize) -> jni::jarray;
    #[doc(hidden)]
    unsafe fn pin_elements(
        env: *mut jni::JNIEnv,
        array: jni::jarray,
        is_copy: *mut jni::jboolean,
    ) -> *mut Self;
    #[doc(hidden)]
    unsafe fn release_elements(env: *mut jni::JNIEnv, array: jni::jarray, elems: *mut Self, mode: jni::jint);
}

macro_rules! primitive_type {
    (
        $t:ty, $variant:ident,
        $get:ident, $set:ident, $get_static:ident, $set_static:ident,
        $call:ident, $call_static:ident,
        $new:ident, $pin:ident, $release:ident
    ) => {
        impl sealed::Sealed for $t {}

        impl JavaType for $t {
            const KIND: ElementKind = ElementKind::$variant;

            fn into_value(self) -> JValue {
                JValue::$variant(self)
            }
        }

        impl FieldType for $t {
            unsafe fn get_field(env: *mut jni::JNIEnv, obj: jni::jobject, id: jni::jfieldID) -> Self {
                ((**env).$get)(env, obj, id)
            }

            unsafe fn set_field(self, env: *mut jni::JNIEnv, obj: jni::jobject, id: jni::jfieldID) {
                ((**env).$set)(env, obj, id, self)
            }

            unsafe fn get_static_field(env: *mut jni::JNIEnv, cls: jni::jclass, id: jni::jfieldID) -> Self {
                ((**env).$get_static)(env, cls, id)
            }

            unsafe fn set_static_field(self, env: *mut jni::JNIEnv, cls: jni::jclass, id: jni::jfieldID) {
                ((**env).$set_static)(env, cls, id, self)
            }
        }

        impl ReturnType for $t {
            const SIGNATURE: Option<&'static str> = ElementKind::$variant.signature();

            unsafe fn call_method(
                env: *mut jni::JNIEnv,
                obj: jni::jobject,
                id: jni::jmethodID,
                args: *const jni::jvalue,
            ) -> Self {
                ((**env).$call)(env, obj, id, args)
            }

            unsafe fn call_static_method(
                env: *mut jni::JNIEnv,
                cls: jni::jclass,
                id: jni::jmethodID,
                args: *const jni::jvalue,
            ) -> Self {
                ((**env).$call_static)(env, cls, id, args)
            }
        }

        impl ArrayElement for $t {
            const PRIMITIVE: Primitive = Primitive::$variant;

            unsafe fn new_array(env: *mut jni::JNIEnv, len: jni::jsize) -> jni::jarray {
                ((**env).$new)(env, len)
            }

            unsafe fn pin_elements(
                env: *mut jni::JNIEnv,
                array: jni::jarray,
                is_copy: *mut jni::jboolean,
            ) -> *mut Self {
                ((**env).$pin)(env, array, is_copy)
            }

            unsafe fn release_elements(env: *mut jni::JNIEnv, array: jni::jarray, elems: *mut Self, mode: jni::jint) {
                ((**env).$release)(env, array, elems, mode)
            }
        }
    };
}

primitive_type!(
    jni::jboolean, Boolean,
    GetBooleanField, SetBooleanField, GetStaticBooleanField, SetStaticBooleanField,
    CallBooleanMethodA, CallStaticBooleanMethodA,
    NewBooleanArray, GetBooleanArrayElements, ReleaseBooleanArrayElements
);
primitive_type!(
    jni::jbyte, Byte,
    GetByteField, SetByteField, GetStaticByteField, SetStaticByteField,
    CallByteMethodA, CallStaticByteMethodA,
    NewByteArray, GetByteArrayElements, ReleaseByteArrayElements
);
primitive_type!(
    jni::jchar, Char,
    GetCharField, SetCharField, GetStaticCharField, SetStaticCharField,
    CallCharMethodA, CallStaticCharMethodA,
    NewCharArray, GetCharArrayElements, ReleaseCharArrayElements
);
primitive_type!(
    jni::jshort, Short,
    GetShortField, SetShortField, GetStaticShortField, SetStaticShortField,
    CallShortMethodA, CallStaticShortMethodA,
    NewShortArray, GetShortArrayElements, ReleaseShortArrayElements
);
primitive_type!(
    jni::jint, Int,
    GetIntField, SetIntField, GetStaticIntField, SetStaticIntField,
    CallIntMethodA, CallStaticIntMethodA,
    NewIntArray, GetIntArrayElements, ReleaseIntArrayElements
);
primitive_type!(
    jni::jlong, Long,
    GetLongField, SetLongField, GetStaticLongField, SetStaticLongField,
    CallLongMethodA, CallStaticLongMethodA,
    NewLongArray, GetLongArrayElements, ReleaseLongArrayElements
);
primitive_type!(
    jni::jfloat, Float,
    GetFloatField, SetFloatField, GetStaticFloatField, SetStaticFloatField,
    CallFloatMethodA, CallStaticFloatMethodA,
    NewFloatArray, GetFloatArrayElements, ReleaseFloatArrayElements
);
primitive_type!(
    jni::jdouble, Double,
    GetDoubleField, SetDoubleField, GetStaticDoubleField, SetStaticDoubleField,
    CallDoubleMethodA, CallStaticDoubleMethodA,
    NewDoubleArray, GetDoubleArrayElements, ReleaseDoubleArrayElements
);

// `bool` rides on the jboolean accessors.
impl sealed::Sealed for bool {}

impl JavaType for bool {
    const KIND: ElementKind = ElementKind::Boolean;

    fn into_value(self) -> JValue {
        JValue::Boolean(self as jni::jboolean)
    }
}

impl FieldType for bool {
    unsafe fn get_field(env: *mut jni::JNIEnv, obj: jni::jobject, id: jni::jfieldID) -> Self {
        jni::jboolean::get_field(env, obj, id) != jni::JNI_FALSE
    }

    unsafe fn set_field(self, env: *mut jni::JNIEnv, obj: jni::jobject, id: jni::jfieldID) {
        (self as jni::jboolean).set_field(env, obj, id)
    }

    unsafe fn get_static_field(env: *mut jni::JNIEnv, cls: jni::jclass, id: jni::jfieldID) -> Self {
        jni::jboolean::get_static_field(env, cls, id) != jni::JNI_FALSE
    }

    unsafe fn set_static_field(self, env: *mut jni::JNIEnv, cls: jni::jclass, id: jni::jfieldID) {
        (self as jni::jboolean).set_static_field(env, cls, id)
    }
}

impl ReturnType for bool {
    const SIGNATURE: Option<&'static str> = Some("Z");

    unsafe fn call_method(
        env: *mut jni::JNIEnv,
        obj: jni::jobject,
        id: jni::jmethodID,
        args: *const jni::jvalue,
    ) -> Self {
        <jni::jboolean as ReturnType>::call_method(env, obj, id, args) != jni::JNI_FALSE
    }

    unsafe fn call_static_method(
        env: *mut jni::JNIEnv,
        cls: jni::jclass,
        id: jni::jmethodID,
        args: *const jni::jvalue,
    ) -> Self {
        <jni::jboolean as ReturnType>::call_static_method(env, cls, id, args) != jni::JNI_FALSE
    }
}

impl sealed::Sealed for () {}

impl ReturnType for () {
    const SIGNATURE: Option<&'static str> = Some("V");

    unsafe fn call_method(
        env: *mut jni::JNIEnv,
        obj: jni::jobject,
        id: jni::jmethodID,
        args: *const jni::jvalue,
    ) {
        ((**env).CallVoidMethodA)(env, obj, id, args)
    }

    unsafe fn call_static_method(
        env: *mut jni::JNIEnv,
        cls: jni::jclass,
        id: jni::jmethodID,
        args: *const jni::jvalue,
    ) {
        ((**env).CallStaticVoidMethodA)(env, cls, id, args)
    }
}

// Reference types all go through the Object accessors.
macro_rules! reference_type {
    ($t:ty, $kind:expr, $wrap:expr) => {
        impl FieldType for $t {
            unsafe fn get_field(env: *mut jni::JNIEnv, obj: jni::jobject, id: jni::jfieldID) -> Self {
                $wrap(((**env).GetObjectField)(env, obj, id))
            }

            unsafe fn set_field(self, env: *mut jni::JNIEnv, obj: jni::jobject, id: jni::jfieldID) {
                ((**env).SetObjectField)(env, obj, id, self.as_raw())
            }

            unsafe fn get_static_field(env: *mut jni::JNIEnv, cls: jni::jclass, id: jni::jfieldID) -> Self {
                $wrap(((**env).GetStaticObjectField)(env, cls, id))
            }

            unsafe fn set_static_field(self, env: *mut jni::JNIEnv, cls: jni::jclass, id: jni::jfieldID) {
                ((**env).SetStaticObjectField)(env, cls, id, self.as_raw())
            }
        }

        impl ReturnType for $t {
            const SIGNATURE: Option<&'static str> = $kind.signature();

            unsafe fn call_method(
                env: *mut jni::JNIEnv,
                obj: jni::jobject,
                id: jni::jmethodID,
                args: *const jni::jvalue,
            ) -> Self {
                $wrap(((**env).CallObjectMethodA)(env, obj, id, args))
            }

            unsafe fn call_static_method(
                env: *mut jni::JNIEnv,
                cls: jni::jclass,
                id: jni::jmethodID,
                args: *const jni::jvalue,
            ) -> Self {
                $wrap(((**env).CallStaticObjectMethodA)(env, cls, id, args))
            }
        }
    };
}

impl sealed::Sealed for JObject {}

impl JavaType for JObject {
    const KIND: ElementKind = ElementKind::Object;

    fn into_value(self) -> JValue {
        JValue::Object(self)
    }
}

reference_type!(JObject, ElementKind::Object, JObject);

impl sealed::Sealed for JString {}

impl JavaType for JString {
    const KIND: ElementKind = ElementKind::String;

    fn into_value(self) -> JValue {
        JValue::String(self)
    }
}

reference_type!(JString, ElementKind::String, JString);

impl<T: ArrayElement> sealed::Sealed for JArray<T> {}

impl<T: ArrayElement> JavaType for JArray<T> {
    const KIND: ElementKind = ElementKind::Array(T::PRIMITIVE);

    fn into_value(self) -> JValue {
        JValue::Array(T::PRIMITIVE, self.raw)
    }
}

impl<T: ArrayElement> FieldType for JArray<T> {
    unsafe fn get_field(env: *mut jni::JNIEnv, obj: jni::jobject, id: jni::jfieldID) -> Self {
        JArray::from_raw(((**env).GetObjectField)(env, obj, id))
    }

    unsafe fn set_field(self, env: *mut jni::JNIEnv, obj: jni::jobject, id: jni::jfieldID) {
        ((**env).SetObjectField)(env, obj, id, self.raw)
    }

    unsafe fn get_static_field(env: *mut jni::JNIEnv, cls: jni::jclass, id: jni::jfieldID) -> Self {
        JArray::from_raw(((**env).GetStaticObjectField)(env, cls, id))
    }

    unsafe fn set_static_field(self, env: *mut jni::JNIEnv, cls: jni::jclass, id: jni::jfieldID) {
        ((**env).SetStaticObjectField)(env, cls, id, self.raw)
    }
}

impl<T: ArrayElement> ReturnType for JArray<T> {
    const SIGNATURE: Option<&'static str> = Some(T::PRIMITIVE.array_signature());

    unsafe fn call_method(
        env: *mut jni::JNIEnv,
        obj: jni::jobject,
        id: jni::jmethodID,
        args: *const jni::jvalue,
    ) -> Self {
        JArray::from_raw(((**env).CallObjectMethodA)(env, obj, id, args))
    }

    unsafe fn call_static_method(
        env: *mut jni::JNIEnv,
        cls: jni::jclass,
        id: jni::jmethodID,
        args: *const jni::jvalue,
    ) -> Self {
        JArray::from_raw(((**env).CallStaticObjectMethodA)(env, cls, id, args))
    }
}
