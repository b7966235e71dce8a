//! In-process stand-in for a JVM, exposed through a real JNI function table.
//!
//! Objects live in a vector and are addressed by fake handles. Pinning an
//! array hands out a copy, so elements only reach the array through a
//! release or commit, and every outstanding pin stays visible to the test.
//! Misuse (unknown handles, mismatched releases) is recorded in
//! `violations` instead of panicking across the FFI boundary.

#![allow(dead_code)]
#![allow(clippy::missing_safety_doc)]

use jni_marshal::env::JniEnv;
use jni_marshal::kind::Primitive;
use jni_marshal::sys::jni::{
    self, jarray, jboolean, jbyte, jchar, jclass, jdouble, jfieldID, jfloat, jint, jlong, jmethodID, jobject,
    jobjectArray, jshort, jsize, jstring, jthrowable, jvalue, CallPadding, JNIEnv, JNINativeInterface_,
};
use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::ffi::{c_void, CStr};
use std::os::raw::c_char;
use std::ptr;
use std::rc::Rc;

pub const MATKC_CLASS: &str = "KKH/StdLib/Matkc";

/// Body of a fake Java method: `(state, this_or_class, args) -> return value`.
pub type MethodBody = Rc<dyn Fn(&mut State, jobject, &[jvalue]) -> jvalue>;

pub fn void() -> jvalue {
    jvalue { j: 0 }
}

enum Object {
    Class(usize),
    Str(Vec<u16>),
    Array { primitive: Primitive, bytes: Vec<u8> },
    ObjectArray { class: usize, elements: Vec<jobject> },
    Instance { class: usize, fields: HashMap<usize, jvalue> },
    Throwable { class: usize, message: String },
}

struct ClassDef {
    name: String,
    handle: jobject,
}

struct FieldDef {
    class: usize,
    name: String,
    sig: String,
    is_static: bool,
    value: jvalue,
}

struct MethodDef {
    class: usize,
    name: String,
    sig: String,
    is_static: bool,
    body: MethodBody,
}

struct Pin {
    array: jarray,
    primitive: Primitive,
    words: Vec<u64>,
}

#[derive(Default)]
pub struct State {
    objects: Vec<Object>,
    classes: Vec<ClassDef>,
    fields: Vec<FieldDef>,
    methods: Vec<MethodDef>,
    pins: Vec<Pin>,
    string_pins: Vec<Box<[u16]>>,
    pending: Option<jobject>,
    pub release_modes: Vec<jint>,
    pub deleted_refs: usize,
    pub violations: Vec<String>,
}

fn handle(index: usize) -> *mut c_void {
    ((index + 1) * 16) as *mut c_void
}

fn unhandle(ptr: *const c_void) -> Option<usize> {
    let addr = ptr as usize;
    if addr == 0 || addr % 16 != 0 {
        None
    } else {
        Some(addr / 16 - 1)
    }
}

fn to_bytes<T: Copy>(data: &[T]) -> Vec<u8> {
    let len = std::mem::size_of_val(data);
    unsafe { std::slice::from_raw_parts(data.as_ptr() as *const u8, len).to_vec() }
}

fn from_bytes<T: Copy>(bytes: &[u8]) -> Vec<T> {
    let n = bytes.len() / std::mem::size_of::<T>();
    let mut out = Vec::<T>::with_capacity(n);
    unsafe {
        ptr::copy_nonoverlapping(bytes.as_ptr(), out.as_mut_ptr() as *mut u8, n * std::mem::size_of::<T>());
        out.set_len(n);
    }
    out
}

/// Number of arguments in a method signature.
fn arg_count(sig: &str) -> usize {
    let params = sig.strip_prefix('(').and_then(|s| s.split(')').next()).unwrap_or("");
    let bytes = params.as_bytes();
    let mut i = 0;
    let mut count = 0;
    while i < bytes.len() {
        while bytes.get(i) == Some(&b'[') {
            i += 1;
        }
        if bytes.get(i) == Some(&b'L') {
            while i < bytes.len() && bytes[i] != b';' {
                i += 1;
            }
        }
        i += 1;
        count += 1;
    }
    count
}

impl State {
    fn alloc(&mut self, object: Object) -> jobject {
        self.objects.push(object);
        handle(self.objects.len() - 1)
    }

    fn object(&self, obj: jobject) -> Option<&Object> {
        unhandle(obj).and_then(|i| self.objects.get(i))
    }

    fn object_mut(&mut self, obj: jobject) -> Option<&mut Object> {
        unhandle(obj).and_then(move |i| self.objects.get_mut(i))
    }

    fn existing_class(&self, name: &str) -> Option<usize> {
        self.classes.iter().position(|c| c.name == name)
    }

    /// Looks up a class by internal name, defining it if needed.
    pub fn class_index(&mut self, name: &str) -> usize {
        if let Some(index) = self.existing_class(name) {
            return index;
        }
        let index = self.classes.len();
        let handle = self.alloc(Object::Class(index));
        self.classes.push(ClassDef { name: name.to_string(), handle });
        index
    }

    fn class_of_handle(&mut self, cls: jclass) -> Option<usize> {
        match self.object(cls) {
            Some(Object::Class(index)) => Some(*index),
            _ => {
                self.violations.push(format!("{:?} is not a class", cls));
                None
            }
        }
    }

    fn class_of(&mut self, obj: jobject) -> Option<usize> {
        let name = match self.object(obj)? {
            Object::Class(_) => "java/lang/Class".to_string(),
            Object::Str(_) => "java/lang/String".to_string(),
            Object::Array { primitive, .. } => primitive.array_signature().to_string(),
            Object::ObjectArray { class, .. } => {
                let inner = &self.classes[*class].name;
                if inner.starts_with('[') {
                    format!("[{}", inner)
                } else {
                    format!("[L{};", inner)
                }
            }
            Object::Instance { class, .. } | Object::Throwable { class, .. } => return Some(*class),
        };
        Some(self.class_index(&name))
    }

    /// Raises a Java exception of the named class.
    pub fn throw(&mut self, class_name: &str, message: &str) {
        let class = self.class_index(class_name);
        let exc = self.alloc(Object::Throwable { class, message: message.to_string() });
        self.pending = Some(exc);
    }

    // ---- fields -----------------------------------------------------------

    fn lookup_field(&self, class: usize, name: &str, sig: &str, is_static: bool) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.class == class && f.name == name && f.sig == sig && f.is_static == is_static)
    }

    fn get_field(&mut self, obj: jobject, id: jfieldID) -> jvalue {
        let Some(field) = unhandle(id) else {
            self.violations.push("bad field id".to_string());
            return void();
        };
        match self.object(obj) {
            Some(Object::Instance { fields, .. }) => fields.get(&field).copied().unwrap_or_else(void),
            _ => {
                self.violations.push(format!("get_field on non-instance {:?}", obj));
                void()
            }
        }
    }

    fn set_field(&mut self, obj: jobject, id: jfieldID, value: jvalue) {
        let Some(field) = unhandle(id) else {
            self.violations.push("bad field id".to_string());
            return;
        };
        match self.object_mut(obj) {
            Some(Object::Instance { fields, .. }) => {
                fields.insert(field, value);
            }
            _ => self.violations.push(format!("set_field on non-instance {:?}", obj)),
        }
    }

    fn static_field(&mut self, id: jfieldID) -> Option<&mut FieldDef> {
        let index = unhandle(id)?;
        self.fields.get_mut(index).filter(|f| f.is_static)
    }

    fn field_id_by_name(&mut self, obj: jobject, name: &str) -> Option<jfieldID> {
        let class = self.class_of(obj)?;
        let index = self.fields.iter().position(|f| f.class == class && f.name == name && !f.is_static)?;
        Some(handle(index))
    }

    /// Writes an instance field by name, whatever its signature.
    pub fn set_field_by_name(&mut self, obj: jobject, name: &str, value: jvalue) {
        match self.field_id_by_name(obj, name) {
            Some(id) => self.set_field(obj, id, value),
            None => self.violations.push(format!("no field {}", name)),
        }
    }

    pub fn field_by_name(&mut self, obj: jobject, name: &str) -> jvalue {
        match self.field_id_by_name(obj, name) {
            Some(id) => self.get_field(obj, id),
            None => {
                self.violations.push(format!("no field {}", name));
                void()
            }
        }
    }

    // ---- strings ----------------------------------------------------------

    pub fn new_string(&mut self, s: &str) -> jstring {
        self.alloc(Object::Str(s.encode_utf16().collect()))
    }

    pub fn string_value(&self, s: jstring) -> Option<String> {
        match self.object(s)? {
            Object::Str(units) => Some(String::from_utf16_lossy(units)),
            _ => None,
        }
    }

    // ---- arrays -----------------------------------------------------------

    pub fn new_array(&mut self, primitive: Primitive, len: usize) -> jarray {
        self.alloc(Object::Array { primitive, bytes: vec![0; len * primitive.native_size()] })
    }

    pub fn new_array_from<T: Copy>(&mut self, primitive: Primitive, data: &[T]) -> jarray {
        self.alloc(Object::Array { primitive, bytes: to_bytes(data) })
    }

    pub fn array_contents<T: Copy>(&self, array: jarray) -> Vec<T> {
        match self.object(array) {
            Some(Object::Array { bytes, .. }) => from_bytes(bytes),
            _ => Vec::new(),
        }
    }

    fn array_len(&mut self, array: jarray) -> jsize {
        match self.object(array) {
            Some(Object::Array { primitive, bytes }) => (bytes.len() / primitive.native_size()) as jsize,
            Some(Object::ObjectArray { elements, .. }) => elements.len() as jsize,
            _ => {
                self.violations.push(format!("{:?} is not an array", array));
                0
            }
        }
    }

    fn pin_array(&mut self, array: jarray, primitive: Primitive, is_copy: *mut jboolean) -> *mut u8 {
        let bytes = match self.object(array) {
            Some(Object::Array { primitive: actual, bytes }) if *actual == primitive => bytes.clone(),
            _ => {
                self.violations.push(format!("pin of {:?} as {}[]", array, primitive.java_name()));
                return ptr::null_mut();
            }
        };
        let mut words = vec![0u64; ((bytes.len() + 7) / 8).max(1)];
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), words.as_mut_ptr() as *mut u8, bytes.len());
            if !is_copy.is_null() {
                *is_copy = jni::JNI_TRUE;
            }
        }
        let ptr = words.as_mut_ptr() as *mut u8;
        self.pins.push(Pin { array, primitive, words });
        ptr
    }

    fn release_array(&mut self, array: jarray, primitive: Primitive, elems: *mut u8, mode: jint) {
        self.release_modes.push(mode);
        let Some(at) = self.pins.iter().position(|p| p.words.as_ptr() as *mut u8 == elems) else {
            self.violations.push("release of an unknown pointer".to_string());
            return;
        };
        if self.pins[at].array != array || self.pins[at].primitive != primitive {
            self.violations.push("release does not match its pin".to_string());
        }
        if mode == jni::JNI_RELEASE || mode == jni::JNI_COMMIT {
            let words = self.pins[at].words.clone();
            if let Some(Object::Array { bytes, .. }) = self.object_mut(array) {
                let len = bytes.len();
                unsafe { ptr::copy_nonoverlapping(words.as_ptr() as *const u8, bytes.as_mut_ptr(), len) };
            }
        }
        if mode != jni::JNI_COMMIT {
            self.pins.remove(at);
        }
    }

    // ---- methods ----------------------------------------------------------

    fn lookup_method(&self, class: usize, name: &str, sig: &str, is_static: bool) -> Option<usize> {
        self.methods
            .iter()
            .position(|m| m.class == class && m.name == name && m.sig == sig && m.is_static == is_static)
    }

    fn invoke(&mut self, target: jobject, id: jmethodID, args: *const jvalue) -> jvalue {
        let Some(method) = unhandle(id).and_then(|i| self.methods.get(i)) else {
            self.violations.push("bad method id".to_string());
            return void();
        };
        let body = method.body.clone();
        let count = arg_count(&method.sig);
        let args = if count == 0 { &[][..] } else { unsafe { std::slice::from_raw_parts(args, count) } };
        body(self, target, args)
    }
}

// =============================================================================
// Function table
// =============================================================================

#[repr(C)]
struct EnvCell {
    vtable: *const JNINativeInterface_,
    state: RefCell<State>,
}

fn state<'a>(env: *mut JNIEnv) -> RefMut<'a, State> {
    unsafe { (*(env as *const EnvCell)).state.borrow_mut() }
}

unsafe fn c_str<'a>(s: *const c_char) -> &'a str {
    CStr::from_ptr(s).to_str().unwrap_or("")
}

unsafe extern "system" fn get_version(_env: *mut JNIEnv) -> jint {
    jni::JNI_VERSION_1_8
}

unsafe extern "system" fn find_class(env: *mut JNIEnv, name: *const c_char) -> jclass {
    let name = c_str(name);
    let mut st = state(env);
    match st.existing_class(name) {
        Some(index) => st.classes[index].handle,
        None if name.starts_with('[') => {
            let index = st.class_index(name);
            st.classes[index].handle
        }
        None => {
            st.throw("java/lang/NoClassDefFoundError", name);
            ptr::null_mut()
        }
    }
}

unsafe extern "system" fn throw_new(env: *mut JNIEnv, clazz: jclass, msg: *const c_char) -> jint {
    let mut st = state(env);
    let Some(class) = st.class_of_handle(clazz) else {
        return jni::JNI_ERR;
    };
    let name = st.classes[class].name.clone();
    st.throw(&name, c_str(msg));
    jni::JNI_OK
}

unsafe extern "system" fn exception_occurred(env: *mut JNIEnv) -> jthrowable {
    state(env).pending.unwrap_or(ptr::null_mut())
}

unsafe extern "system" fn exception_describe(_env: *mut JNIEnv) {}

unsafe extern "system" fn exception_clear(env: *mut JNIEnv) {
    state(env).pending = None;
}

unsafe extern "system" fn exception_check(env: *mut JNIEnv) -> jboolean {
    if state(env).pending.is_some() {
        jni::JNI_TRUE
    } else {
        jni::JNI_FALSE
    }
}

unsafe extern "system" fn delete_local_ref(env: *mut JNIEnv, _obj: jobject) {
    state(env).deleted_refs += 1;
}

unsafe extern "system" fn new_object_a(
    env: *mut JNIEnv,
    clazz: jclass,
    method: jmethodID,
    args: *const jvalue,
) -> jobject {
    let mut st = state(env);
    let Some(class) = st.class_of_handle(clazz) else {
        return ptr::null_mut();
    };
    let obj = st.alloc(Object::Instance { class, fields: HashMap::new() });
    st.invoke(obj, method, args);
    if st.pending.is_some() {
        ptr::null_mut()
    } else {
        obj
    }
}

unsafe extern "system" fn get_object_class(env: *mut JNIEnv, obj: jobject) -> jclass {
    let mut st = state(env);
    match st.class_of(obj) {
        Some(class) => st.classes[class].handle,
        None => {
            st.violations.push(format!("GetObjectClass on {:?}", obj));
            ptr::null_mut()
        }
    }
}

unsafe fn method_id(env: *mut JNIEnv, clazz: jclass, name: *const c_char, sig: *const c_char, is_static: bool) -> jmethodID {
    let (name, sig) = (c_str(name), c_str(sig));
    let mut st = state(env);
    let Some(class) = st.class_of_handle(clazz) else {
        return ptr::null_mut();
    };
    match st.lookup_method(class, name, sig, is_static) {
        Some(index) => handle(index),
        None => {
            st.throw("java/lang/NoSuchMethodError", name);
            ptr::null_mut()
        }
    }
}

unsafe extern "system" fn get_method_id(
    env: *mut JNIEnv,
    clazz: jclass,
    name: *const c_char,
    sig: *const c_char,
) -> jmethodID {
    method_id(env, clazz, name, sig, false)
}

unsafe extern "system" fn get_static_method_id(
    env: *mut JNIEnv,
    clazz: jclass,
    name: *const c_char,
    sig: *const c_char,
) -> jmethodID {
    method_id(env, clazz, name, sig, true)
}

unsafe fn field_id(env: *mut JNIEnv, clazz: jclass, name: *const c_char, sig: *const c_char, is_static: bool) -> jfieldID {
    let (name, sig) = (c_str(name), c_str(sig));
    let mut st = state(env);
    let Some(class) = st.class_of_handle(clazz) else {
        return ptr::null_mut();
    };
    match st.lookup_field(class, name, sig, is_static) {
        Some(index) => handle(index),
        None => {
            st.throw("java/lang/NoSuchFieldError", name);
            ptr::null_mut()
        }
    }
}

unsafe extern "system" fn get_field_id(
    env: *mut JNIEnv,
    clazz: jclass,
    name: *const c_char,
    sig: *const c_char,
) -> jfieldID {
    field_id(env, clazz, name, sig, false)
}

unsafe extern "system" fn get_static_field_id(
    env: *mut JNIEnv,
    clazz: jclass,
    name: *const c_char,
    sig: *const c_char,
) -> jfieldID {
    field_id(env, clazz, name, sig, true)
}

macro_rules! field_accessors {
    ($get:ident, $set:ident, $get_static:ident, $set_static:ident, $t:ty, $member:ident) => {
        unsafe extern "system" fn $get(env: *mut JNIEnv, obj: jobject, id: jfieldID) -> $t {
            state(env).get_field(obj, id).$member
        }

        unsafe extern "system" fn $set(env: *mut JNIEnv, obj: jobject, id: jfieldID, value: $t) {
            state(env).set_field(obj, id, jvalue { $member: value })
        }

        unsafe extern "system" fn $get_static(env: *mut JNIEnv, _cls: jclass, id: jfieldID) -> $t {
            let mut st = state(env);
            match st.static_field(id) {
                Some(field) => field.value.$member,
                None => {
                    st.violations.push("bad static field id".to_string());
                    void().$member
                }
            }
        }

        unsafe extern "system" fn $set_static(env: *mut JNIEnv, _cls: jclass, id: jfieldID, value: $t) {
            let mut st = state(env);
            match st.static_field(id) {
                Some(field) => field.value = jvalue { $member: value },
                None => st.violations.push("bad static field id".to_string()),
            }
        }
    };
}

field_accessors!(get_object_field, set_object_field, get_static_object_field, set_static_object_field, jobject, l);
field_accessors!(get_boolean_field, set_boolean_field, get_static_boolean_field, set_static_boolean_field, jboolean, z);
field_accessors!(get_byte_field, set_byte_field, get_static_byte_field, set_static_byte_field, jbyte, b);
field_accessors!(get_char_field, set_char_field, get_static_char_field, set_static_char_field, jchar, c);
field_accessors!(get_short_field, set_short_field, get_static_short_field, set_static_short_field, jshort, s);
field_accessors!(get_int_field, set_int_field, get_static_int_field, set_static_int_field, jint, i);
field_accessors!(get_long_field, set_long_field, get_static_long_field, set_static_long_field, jlong, j);
field_accessors!(get_float_field, set_float_field, get_static_float_field, set_static_float_field, jfloat, f);
field_accessors!(get_double_field, set_double_field, get_static_double_field, set_static_double_field, jdouble, d);

macro_rules! call_accessors {
    ($call:ident, $call_static:ident, $t:ty, $member:ident) => {
        unsafe extern "system" fn $call(env: *mut JNIEnv, obj: jobject, id: jmethodID, args: *const jvalue) -> $t {
            state(env).invoke(obj, id, args).$member
        }

        unsafe extern "system" fn $call_static(
            env: *mut JNIEnv,
            cls: jclass,
            id: jmethodID,
            args: *const jvalue,
        ) -> $t {
            state(env).invoke(cls, id, args).$member
        }
    };
}

call_accessors!(call_object, call_static_object, jobject, l);
call_accessors!(call_boolean, call_static_boolean, jboolean, z);
call_accessors!(call_byte, call_static_byte, jbyte, b);
call_accessors!(call_char, call_static_char, jchar, c);
call_accessors!(call_short, call_static_short, jshort, s);
call_accessors!(call_int, call_static_int, jint, i);
call_accessors!(call_long, call_static_long, jlong, j);
call_accessors!(call_float, call_static_float, jfloat, f);
call_accessors!(call_double, call_static_double, jdouble, d);

unsafe extern "system" fn call_void(env: *mut JNIEnv, obj: jobject, id: jmethodID, args: *const jvalue) {
    state(env).invoke(obj, id, args);
}

unsafe extern "system" fn call_static_void(env: *mut JNIEnv, cls: jclass, id: jmethodID, args: *const jvalue) {
    state(env).invoke(cls, id, args);
}

unsafe extern "system" fn new_string(env: *mut JNIEnv, unicode: *const jchar, len: jsize) -> jstring {
    let units = if len == 0 { Vec::new() } else { std::slice::from_raw_parts(unicode, len as usize).to_vec() };
    state(env).alloc(Object::Str(units))
}

unsafe extern "system" fn get_string_length(env: *mut JNIEnv, s: jstring) -> jsize {
    match state(env).object(s) {
        Some(Object::Str(units)) => units.len() as jsize,
        _ => 0,
    }
}

unsafe extern "system" fn get_string_chars(env: *mut JNIEnv, s: jstring, is_copy: *mut jboolean) -> *const jchar {
    let mut st = state(env);
    let units: Box<[u16]> = match st.object(s) {
        Some(Object::Str(units)) if !units.is_empty() => units.clone().into_boxed_slice(),
        Some(Object::Str(_)) => vec![0u16].into_boxed_slice(),
        _ => {
            st.violations.push(format!("GetStringChars on {:?}", s));
            return ptr::null();
        }
    };
    if !is_copy.is_null() {
        *is_copy = jni::JNI_TRUE;
    }
    let ptr = units.as_ptr();
    st.string_pins.push(units);
    ptr
}

unsafe extern "system" fn release_string_chars(env: *mut JNIEnv, _s: jstring, chars: *const jchar) {
    let mut st = state(env);
    match st.string_pins.iter().position(|p| p.as_ptr() == chars) {
        Some(at) => {
            st.string_pins.remove(at);
        }
        None => st.violations.push("release of unknown string chars".to_string()),
    }
}

unsafe extern "system" fn get_array_length(env: *mut JNIEnv, array: jarray) -> jsize {
    state(env).array_len(array)
}

unsafe extern "system" fn new_object_array(env: *mut JNIEnv, len: jsize, clazz: jclass, init: jobject) -> jobjectArray {
    let mut st = state(env);
    let Some(class) = st.class_of_handle(clazz) else {
        return ptr::null_mut();
    };
    st.alloc(Object::ObjectArray { class, elements: vec![init; len.max(0) as usize] })
}

unsafe extern "system" fn get_object_array_element(env: *mut JNIEnv, array: jobjectArray, index: jsize) -> jobject {
    let mut st = state(env);
    let element = match st.object(array) {
        Some(Object::ObjectArray { elements, .. }) => elements.get(index as usize).copied(),
        _ => None,
    };
    match element {
        Some(obj) => obj,
        None => {
            st.throw("java/lang/ArrayIndexOutOfBoundsException", &index.to_string());
            ptr::null_mut()
        }
    }
}

unsafe extern "system" fn set_object_array_element(env: *mut JNIEnv, array: jobjectArray, index: jsize, val: jobject) {
    let mut st = state(env);
    let stored = match st.object_mut(array) {
        Some(Object::ObjectArray { elements, .. }) => match elements.get_mut(index as usize) {
            Some(slot) => {
                *slot = val;
                true
            }
            None => false,
        },
        _ => false,
    };
    if !stored {
        st.throw("java/lang/ArrayIndexOutOfBoundsException", &index.to_string());
    }
}

macro_rules! array_accessors {
    ($new:ident, $get:ident, $release:ident, $t:ty, $primitive:expr) => {
        unsafe extern "system" fn $new(env: *mut JNIEnv, len: jsize) -> jarray {
            state(env).new_array($primitive, len.max(0) as usize)
        }

        unsafe extern "system" fn $get(env: *mut JNIEnv, array: jarray, is_copy: *mut jboolean) -> *mut $t {
            state(env).pin_array(array, $primitive, is_copy) as *mut $t
        }

        unsafe extern "system" fn $release(env: *mut JNIEnv, array: jarray, elems: *mut $t, mode: jint) {
            state(env).release_array(array, $primitive, elems as *mut u8, mode)
        }
    };
}

array_accessors!(new_boolean_array, get_boolean_elements, release_boolean_elements, jboolean, Primitive::Boolean);
array_accessors!(new_byte_array, get_byte_elements, release_byte_elements, jbyte, Primitive::Byte);
array_accessors!(new_char_array, get_char_elements, release_char_elements, jchar, Primitive::Char);
array_accessors!(new_short_array, get_short_elements, release_short_elements, jshort, Primitive::Short);
array_accessors!(new_int_array, get_int_elements, release_int_elements, jint, Primitive::Int);
array_accessors!(new_long_array, get_long_elements, release_long_elements, jlong, Primitive::Long);
array_accessors!(new_float_array, get_float_elements, release_float_elements, jfloat, Primitive::Float);
array_accessors!(new_double_array, get_double_elements, release_double_elements, jdouble, Primitive::Double);

const PAD2: CallPadding = [ptr::null_mut(); 2];

fn function_table() -> JNINativeInterface_ {
    JNINativeInterface_ {
        reserved: [ptr::null_mut(); 4],
        GetVersion: get_version,
        _slot5: [ptr::null_mut(); 1],
        FindClass: find_class,
        _slots7_13: [ptr::null_mut(); 7],
        ThrowNew: throw_new,
        ExceptionOccurred: exception_occurred,
        ExceptionDescribe: exception_describe,
        ExceptionClear: exception_clear,
        _slots18_22: [ptr::null_mut(); 5],
        DeleteLocalRef: delete_local_ref,
        _slots24_29: [ptr::null_mut(); 6],
        NewObjectA: new_object_a,
        GetObjectClass: get_object_class,
        _slot32: [ptr::null_mut(); 1],
        GetMethodID: get_method_id,
        _CallObjectMethod: PAD2,
        CallObjectMethodA: call_object,
        _CallBooleanMethod: PAD2,
        CallBooleanMethodA: call_boolean,
        _CallByteMethod: PAD2,
        CallByteMethodA: call_byte,
        _CallCharMethod: PAD2,
        CallCharMethodA: call_char,
        _CallShortMethod: PAD2,
        CallShortMethodA: call_short,
        _CallIntMethod: PAD2,
        CallIntMethodA: call_int,
        _CallLongMethod: PAD2,
        CallLongMethodA: call_long,
        _CallFloatMethod: PAD2,
        CallFloatMethodA: call_float,
        _CallDoubleMethod: PAD2,
        CallDoubleMethodA: call_double,
        _CallVoidMethod: PAD2,
        CallVoidMethodA: call_void,
        _slots64_93: [ptr::null_mut(); 30],
        GetFieldID: get_field_id,
        GetObjectField: get_object_field,
        GetBooleanField: get_boolean_field,
        GetByteField: get_byte_field,
        GetCharField: get_char_field,
        GetShortField: get_short_field,
        GetIntField: get_int_field,
        GetLongField: get_long_field,
        GetFloatField: get_float_field,
        GetDoubleField: get_double_field,
        SetObjectField: set_object_field,
        SetBooleanField: set_boolean_field,
        SetByteField: set_byte_field,
        SetCharField: set_char_field,
        SetShortField: set_short_field,
        SetIntField: set_int_field,
        SetLongField: set_long_field,
        SetFloatField: set_float_field,
        SetDoubleField: set_double_field,
        GetStaticMethodID: get_static_method_id,
        _CallStaticObjectMethod: PAD2,
        CallStaticObjectMethodA: call_static_object,
        _CallStaticBooleanMethod: PAD2,
        CallStaticBooleanMethodA: call_static_boolean,
        _CallStaticByteMethod: PAD2,
        CallStaticByteMethodA: call_static_byte,
        _CallStaticCharMethod: PAD2,
        CallStaticCharMethodA: call_static_char,
        _CallStaticShortMethod: PAD2,
        CallStaticShortMethodA: call_static_short,
        _CallStaticIntMethod: PAD2,
        CallStaticIntMethodA: call_static_int,
        _CallStaticLongMethod: PAD2,
        CallStaticLongMethodA: call_static_long,
        _CallStaticFloatMethod: PAD2,
        CallStaticFloatMethodA: call_static_float,
        _CallStaticDoubleMethod: PAD2,
        CallStaticDoubleMethodA: call_static_double,
        _CallStaticVoidMethod: PAD2,
        CallStaticVoidMethodA: call_static_void,
        GetStaticFieldID: get_static_field_id,
        GetStaticObjectField: get_static_object_field,
        GetStaticBooleanField: get_static_boolean_field,
        GetStaticByteField: get_static_byte_field,
        GetStaticCharField: get_static_char_field,
        GetStaticShortField: get_static_short_field,
        GetStaticIntField: get_static_int_field,
        GetStaticLongField: get_static_long_field,
        GetStaticFloatField: get_static_float_field,
        GetStaticDoubleField: get_static_double_field,
        SetStaticObjectField: set_static_object_field,
        SetStaticBooleanField: set_static_boolean_field,
        SetStaticByteField: set_static_byte_field,
        SetStaticCharField: set_static_char_field,
        SetStaticShortField: set_static_short_field,
        SetStaticIntField: set_static_int_field,
        SetStaticLongField: set_static_long_field,
        SetStaticFloatField: set_static_float_field,
        SetStaticDoubleField: set_static_double_field,
        NewString: new_string,
        GetStringLength: get_string_length,
        GetStringChars: get_string_chars,
        ReleaseStringChars: release_string_chars,
        _slots167_170: [ptr::null_mut(); 4],
        GetArrayLength: get_array_length,
        NewObjectArray: new_object_array,
        GetObjectArrayElement: get_object_array_element,
        SetObjectArrayElement: set_object_array_element,
        NewBooleanArray: new_boolean_array,
        NewByteArray: new_byte_array,
        NewCharArray: new_char_array,
        NewShortArray: new_short_array,
        NewIntArray: new_int_array,
        NewLongArray: new_long_array,
        NewFloatArray: new_float_array,
        NewDoubleArray: new_double_array,
        GetBooleanArrayElements: get_boolean_elements,
        GetByteArrayElements: get_byte_elements,
        GetCharArrayElements: get_char_elements,
        GetShortArrayElements: get_short_elements,
        GetIntArrayElements: get_int_elements,
        GetLongArrayElements: get_long_elements,
        GetFloatArrayElements: get_float_elements,
        GetDoubleArrayElements: get_double_elements,
        ReleaseBooleanArrayElements: release_boolean_elements,
        ReleaseByteArrayElements: release_byte_elements,
        ReleaseCharArrayElements: release_char_elements,
        ReleaseShortArrayElements: release_short_elements,
        ReleaseIntArrayElements: release_int_elements,
        ReleaseLongArrayElements: release_long_elements,
        ReleaseFloatArrayElements: release_float_elements,
        ReleaseDoubleArrayElements: release_double_elements,
        _slots199_214: [ptr::null_mut(); 16],
        _slots215_227: [ptr::null_mut(); 13],
        ExceptionCheck: exception_check,
        _slots229_235: [ptr::null_mut(); 7],
    }
}

// =============================================================================
// Test-facing handle
// =============================================================================

/// A fake JVM with `java.lang.Class.getName()`, `String` and the standard
/// exception classes defined.
pub struct FakeJvm {
    cell: Box<EnvCell>,
    _table: Box<JNINativeInterface_>,
}

impl FakeJvm {
    pub fn new() -> Self {
        let table = Box::new(function_table());
        let cell = Box::new(EnvCell { vtable: &*table, state: RefCell::new(State::default()) });
        let jvm = FakeJvm { cell, _table: table };
        for name in [
            "java/lang/String",
            "java/lang/IllegalArgumentException",
            "java/lang/IllegalStateException",
            "java/lang/IndexOutOfBoundsException",
            "java/lang/OutOfMemoryError",
            "java/io/IOException",
        ] {
            jvm.add_class(name);
        }
        let class_cls = jvm.add_class("java/lang/Class");
        jvm.add_method(class_cls, "getName", "()Ljava/lang/String;", |st, this, _| {
            let name = match st.object(this) {
                Some(Object::Class(index)) => st.classes[*index].name.replace('/', "."),
                _ => String::new(),
            };
            jvalue { l: st.new_string(&name) }
        });
        jvm
    }

    pub fn env(&self) -> JniEnv {
        let raw = &*self.cell as *const EnvCell as *mut JNIEnv;
        unsafe { JniEnv::from_raw(raw) }
    }

    pub fn state(&self) -> RefMut<'_, State> {
        self.cell.state.borrow_mut()
    }

    pub fn add_class(&self, name: &str) -> jclass {
        let mut st = self.state();
        let index = st.class_index(name);
        st.classes[index].handle
    }

    fn define_field(&self, cls: jclass, name: &str, sig: &str, is_static: bool) {
        let mut st = self.state();
        if let Some(class) = st.class_of_handle(cls) {
            st.fields.push(FieldDef { class, name: name.to_string(), sig: sig.to_string(), is_static, value: void() });
        }
    }

    pub fn add_field(&self, cls: jclass, name: &str, sig: &str) {
        self.define_field(cls, name, sig, false);
    }

    pub fn add_static_field(&self, cls: jclass, name: &str, sig: &str) {
        self.define_field(cls, name, sig, true);
    }

    fn define_method(&self, cls: jclass, name: &str, sig: &str, is_static: bool, body: MethodBody) {
        let mut st = self.state();
        if let Some(class) = st.class_of_handle(cls) {
            st.methods.push(MethodDef { class, name: name.to_string(), sig: sig.to_string(), is_static, body });
        }
    }

    pub fn add_method(&self, cls: jclass, name: &str, sig: &str, body: impl Fn(&mut State, jobject, &[jvalue]) -> jvalue + 'static) {
        self.define_method(cls, name, sig, false, Rc::new(body));
    }

    pub fn add_static_method(
        &self,
        cls: jclass,
        name: &str,
        sig: &str,
        body: impl Fn(&mut State, jobject, &[jvalue]) -> jvalue + 'static,
    ) {
        self.define_method(cls, name, sig, true, Rc::new(body));
    }

    /// Defines `KKH/StdLib/Matkc` with its fields and `(III)V` constructor.
    pub fn with_matkc(self) -> Self {
        let cls = self.add_class(MATKC_CLASS);
        self.add_field(cls, "data", "[D");
        for name in ["nr", "nc", "nch", "ndata", "ndata_per_chan"] {
            self.add_field(cls, name, "I");
        }
        self.add_method(cls, "<init>", "(III)V", |st, this, args| {
            let (nr, nc, nch) = unsafe { (args[0].i, args[1].i, args[2].i) };
            init_matkc(st, this, nr, nc, nch, None);
            void()
        });
        self
    }

    /// Creates a Matkc instance directly, with column-major `data`.
    pub fn new_matkc(&self, rows: i32, cols: i32, channels: i32, data: &[f64]) -> jobject {
        let mut st = self.state();
        let class = st.class_index(MATKC_CLASS);
        let obj = st.alloc(Object::Instance { class, fields: HashMap::new() });
        init_matkc(&mut st, obj, rows, cols, channels, Some(data));
        obj
    }

    // ---- inspection -------------------------------------------------------

    pub fn new_array_from<T: Copy>(&self, primitive: Primitive, data: &[T]) -> jarray {
        self.state().new_array_from(primitive, data)
    }

    pub fn array_contents<T: Copy>(&self, array: jarray) -> Vec<T> {
        self.state().array_contents(array)
    }

    pub fn new_string(&self, s: &str) -> jstring {
        self.state().new_string(s)
    }

    pub fn string_value(&self, s: jstring) -> Option<String> {
        self.state().string_value(s)
    }

    pub fn field(&self, obj: jobject, name: &str) -> jvalue {
        self.state().field_by_name(obj, name)
    }

    pub fn set_field(&self, obj: jobject, name: &str, value: jvalue) {
        self.state().set_field_by_name(obj, name, value)
    }

    pub fn int_field(&self, obj: jobject, name: &str) -> i32 {
        unsafe { self.field(obj, name).i }
    }

    pub fn matkc_data(&self, obj: jobject) -> Vec<f64> {
        let data = unsafe { self.field(obj, "data").l };
        self.array_contents(data)
    }

    pub fn open_pins(&self) -> usize {
        let st = self.state();
        st.pins.len() + st.string_pins.len()
    }

    pub fn release_modes(&self) -> Vec<jint> {
        self.state().release_modes.clone()
    }

    /// Class name and message of the pending exception.
    pub fn pending_exception(&self) -> Option<(String, String)> {
        let st = self.state();
        match st.pending.and_then(|exc| st.object(exc)) {
            Some(Object::Throwable { class, message }) => Some((st.classes[*class].name.clone(), message.clone())),
            _ => None,
        }
    }

    pub fn throw(&self, class_name: &str, message: &str) {
        self.state().throw(class_name, message);
    }

    pub fn violations(&self) -> Vec<String> {
        self.state().violations.clone()
    }
}

fn init_matkc(st: &mut State, this: jobject, nr: i32, nc: i32, nch: i32, data: Option<&[f64]>) {
    let len = (nr.max(0) * nc.max(0) * nch.max(0)) as usize;
    let array = match data {
        Some(values) => st.new_array_from(Primitive::Double, values),
        None => st.new_array(Primitive::Double, len),
    };
    st.set_field_by_name(this, "data", jvalue { l: array });
    st.set_field_by_name(this, "nr", jvalue { i: nr });
    st.set_field_by_name(this, "nc", jvalue { i: nc });
    st.set_field_by_name(this, "nch", jvalue { i: nch });
    st.set_field_by_name(this, "ndata", jvalue { i: nr * nc * nch });
    st.set_field_by_name(this, "ndata_per_chan", jvalue { i: nr * nc });
}
