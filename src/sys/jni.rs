// jni-marshal/src/sys/jni.rs
//
// Raw JNI (Java Native Interface) types and function table.
//
// The table below is laid out slot for slot against jni.h (JDK 8 through 24).
// Only the functions the marshaling layer calls are typed; every other slot
// is kept as opaque pointer padding so the offsets of the typed slots stay
// exact. The "A" (jvalue array) call variants are used throughout, so the
// variadic and va_list entries are padding as well.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(dead_code)]

use std::ffi::c_void;
use std::os::raw::c_char;

// =============================================================================
// Primitive Types
// =============================================================================

pub type jint = i32;
pub type jlong = i64;
pub type jbyte = i8;
pub type jboolean = u8;
pub type jchar = u16;
pub type jshort = i16;
pub type jfloat = f32;
pub type jdouble = f64;
pub type jsize = jint;

// =============================================================================
// Reference Types (opaque pointers)
// =============================================================================

pub type jobject = *mut c_void;
pub type jclass = jobject;
pub type jstring = jobject;
pub type jarray = jobject;
pub type jthrowable = jobject;

// Typed arrays (all just aliases to jobject in FFI)
pub type jobjectArray = jarray;
pub type jbooleanArray = jarray;
pub type jbyteArray = jarray;
pub type jcharArray = jarray;
pub type jshortArray = jarray;
pub type jintArray = jarray;
pub type jlongArray = jarray;
pub type jfloatArray = jarray;
pub type jdoubleArray = jarray;

// =============================================================================
// ID Types (opaque identifiers)
// =============================================================================

pub type jmethodID = *mut c_void;
pub type jfieldID = *mut c_void;

// =============================================================================
// jvalue Union
// =============================================================================

#[repr(C)]
#[derive(Copy, Clone)]
pub union jvalue {
    pub z: jboolean,
    pub b: jbyte,
    pub c: jchar,
    pub s: jshort,
    pub i: jint,
    pub j: jlong,
    pub f: jfloat,
    pub d: jdouble,
    pub l: jobject,
}

// =============================================================================
// Constants
// =============================================================================

pub const JNI_OK: jint = 0;
pub const JNI_ERR: jint = -1;

pub const JNI_TRUE: jboolean = 1;
pub const JNI_FALSE: jboolean = 0;

/// Release mode: copy back and free the native buffer.
pub const JNI_RELEASE: jint = 0;
pub const JNI_COMMIT: jint = 1;
pub const JNI_ABORT: jint = 2;

pub const JNI_VERSION_1_6: jint = 0x00010006;
pub const JNI_VERSION_1_8: jint = 0x00010008;

// =============================================================================
// Function pointer shapes shared by the per-type slots
// =============================================================================

pub type CallMethodA<R> =
    unsafe extern "system" fn(env: *mut JNIEnv, obj: jobject, methodID: jmethodID, args: *const jvalue) -> R;
pub type CallStaticMethodA<R> =
    unsafe extern "system" fn(env: *mut JNIEnv, clazz: jclass, methodID: jmethodID, args: *const jvalue) -> R;
pub type GetField<R> = unsafe extern "system" fn(env: *mut JNIEnv, obj: jobject, fieldID: jfieldID) -> R;
pub type SetField<V> = unsafe extern "system" fn(env: *mut JNIEnv, obj: jobject, fieldID: jfieldID, val: V);
pub type GetStaticField<R> = unsafe extern "system" fn(env: *mut JNIEnv, clazz: jclass, fieldID: jfieldID) -> R;
pub type SetStaticField<V> =
    unsafe extern "system" fn(env: *mut JNIEnv, clazz: jclass, fieldID: jfieldID, value: V);
pub type NewArray = unsafe extern "system" fn(env: *mut JNIEnv, len: jsize) -> jarray;
pub type GetArrayElements<T> =
    unsafe extern "system" fn(env: *mut JNIEnv, array: jarray, isCopy: *mut jboolean) -> *mut T;
pub type ReleaseArrayElements<T> =
    unsafe extern "system" fn(env: *mut JNIEnv, array: jarray, elems: *mut T, mode: jint);

/// Two unused slots (the variadic and va_list forms of a call).
pub type CallPadding = [*mut c_void; 2];

// =============================================================================
// JNINativeInterface_ - The JNI function table (vtable)
// =============================================================================
//
// 236 slots total (4 reserved + 232 functions). Slot numbers are noted on
// each group; padding arrays cover the slots this crate never calls.

#[repr(C)]
pub struct JNINativeInterface_ {
    // 0-3: reserved
    pub reserved: [*mut c_void; 4],

    // 4: GetVersion
    pub GetVersion: unsafe extern "system" fn(env: *mut JNIEnv) -> jint,

    // 5: DefineClass
    pub _slot5: [*mut c_void; 1],

    // 6: FindClass
    pub FindClass: unsafe extern "system" fn(env: *mut JNIEnv, name: *const c_char) -> jclass,

    // 7-13: reflection, class hierarchy, Throw
    pub _slots7_13: [*mut c_void; 7],

    // 14-17: exceptions
    pub ThrowNew: unsafe extern "system" fn(env: *mut JNIEnv, clazz: jclass, msg: *const c_char) -> jint,
    pub ExceptionOccurred: unsafe extern "system" fn(env: *mut JNIEnv) -> jthrowable,
    pub ExceptionDescribe: unsafe extern "system" fn(env: *mut JNIEnv),
    pub ExceptionClear: unsafe extern "system" fn(env: *mut JNIEnv),

    // 18-22: FatalError, local frames, global refs
    pub _slots18_22: [*mut c_void; 5],

    // 23: DeleteLocalRef
    pub DeleteLocalRef: unsafe extern "system" fn(env: *mut JNIEnv, obj: jobject),

    // 24-29: IsSameObject .. NewObjectV
    pub _slots24_29: [*mut c_void; 6],

    // 30-31: object creation and class lookup
    pub NewObjectA: unsafe extern "system" fn(
        env: *mut JNIEnv,
        clazz: jclass,
        methodID: jmethodID,
        args: *const jvalue,
    ) -> jobject,
    pub GetObjectClass: unsafe extern "system" fn(env: *mut JNIEnv, obj: jobject) -> jclass,

    // 32: IsInstanceOf
    pub _slot32: [*mut c_void; 1],

    // 33: GetMethodID
    pub GetMethodID: unsafe extern "system" fn(
        env: *mut JNIEnv,
        clazz: jclass,
        name: *const c_char,
        sig: *const c_char,
    ) -> jmethodID,

    // 34-63: Call<Type>Method{,V,A}
    pub _CallObjectMethod: CallPadding,
    pub CallObjectMethodA: CallMethodA<jobject>,
    pub _CallBooleanMethod: CallPadding,
    pub CallBooleanMethodA: CallMethodA<jboolean>,
    pub _CallByteMethod: CallPadding,
    pub CallByteMethodA: CallMethodA<jbyte>,
    pub _CallCharMethod: CallPadding,
    pub CallCharMethodA: CallMethodA<jchar>,
    pub _CallShortMethod: CallPadding,
    pub CallShortMethodA: CallMethodA<jshort>,
    pub _CallIntMethod: CallPadding,
    pub CallIntMethodA: CallMethodA<jint>,
    pub _CallLongMethod: CallPadding,
    pub CallLongMethodA: CallMethodA<jlong>,
    pub _CallFloatMethod: CallPadding,
    pub CallFloatMethodA: CallMethodA<jfloat>,
    pub _CallDoubleMethod: CallPadding,
    pub CallDoubleMethodA: CallMethodA<jdouble>,
    pub _CallVoidMethod: CallPadding,
    pub CallVoidMethodA: CallMethodA<()>,

    // 64-93: CallNonvirtual<Type>Method{,V,A}
    pub _slots64_93: [*mut c_void; 30],

    // 94: GetFieldID
    pub GetFieldID: unsafe extern "system" fn(
        env: *mut JNIEnv,
        clazz: jclass,
        name: *const c_char,
        sig: *const c_char,
    ) -> jfieldID,

    // 95-103: Get<Type>Field
    pub GetObjectField: GetField<jobject>,
    pub GetBooleanField: GetField<jboolean>,
    pub GetByteField: GetField<jbyte>,
    pub GetCharField: GetField<jchar>,
    pub GetShortField: GetField<jshort>,
    pub GetIntField: GetField<jint>,
    pub GetLongField: GetField<jlong>,
    pub GetFloatField: GetField<jfloat>,
    pub GetDoubleField: GetField<jdouble>,

    // 104-112: Set<Type>Field
    pub SetObjectField: SetField<jobject>,
    pub SetBooleanField: SetField<jboolean>,
    pub SetByteField: SetField<jbyte>,
    pub SetCharField: SetField<jchar>,
    pub SetShortField: SetField<jshort>,
    pub SetIntField: SetField<jint>,
    pub SetLongField: SetField<jlong>,
    pub SetFloatField: SetField<jfloat>,
    pub SetDoubleField: SetField<jdouble>,

    // 113: GetStaticMethodID
    pub GetStaticMethodID: unsafe extern "system" fn(
        env: *mut JNIEnv,
        clazz: jclass,
        name: *const c_char,
        sig: *const c_char,
    ) -> jmethodID,

    // 114-143: CallStatic<Type>Method{,V,A}
    pub _CallStaticObjectMethod: CallPadding,
    pub CallStaticObjectMethodA: CallStaticMethodA<jobject>,
    pub _CallStaticBooleanMethod: CallPadding,
    pub CallStaticBooleanMethodA: CallStaticMethodA<jboolean>,
    pub _CallStaticByteMethod: CallPadding,
    pub CallStaticByteMethodA: CallStaticMethodA<jbyte>,
    pub _CallStaticCharMethod: CallPadding,
    pub CallStaticCharMethodA: CallStaticMethodA<jchar>,
    pub _CallStaticShortMethod: CallPadding,
    pub CallStaticShortMethodA: CallStaticMethodA<jshort>,
    pub _CallStaticIntMethod: CallPadding,
    pub CallStaticIntMethodA: CallStaticMethodA<jint>,
    pub _CallStaticLongMethod: CallPadding,
    pub CallStaticLongMethodA: CallStaticMethodA<jlong>,
    pub _CallStaticFloatMethod: CallPadding,
    pub CallStaticFloatMethodA: CallStaticMethodA<jfloat>,
    pub _CallStaticDoubleMethod: CallPadding,
    pub CallStaticDoubleMethodA: CallStaticMethodA<jdouble>,
    pub _CallStaticVoidMethod: CallPadding,
    pub CallStaticVoidMethodA: CallStaticMethodA<()>,

    // 144: GetStaticFieldID
    pub GetStaticFieldID: unsafe extern "system" fn(
        env: *mut JNIEnv,
        clazz: jclass,
        name: *const c_char,
        sig: *const c_char,
    ) -> jfieldID,

    // 145-153: GetStatic<Type>Field
    pub GetStaticObjectField: GetStaticField<jobject>,
    pub GetStaticBooleanField: GetStaticField<jboolean>,
    pub GetStaticByteField: GetStaticField<jbyte>,
    pub GetStaticCharField: GetStaticField<jchar>,
    pub GetStaticShortField: GetStaticField<jshort>,
    pub GetStaticIntField: GetStaticField<jint>,
    pub GetStaticLongField: GetStaticField<jlong>,
    pub GetStaticFloatField: GetStaticField<jfloat>,
    pub GetStaticDoubleField: GetStaticField<jdouble>,

    // 154-162: SetStatic<Type>Field
    pub SetStaticObjectField: SetStaticField<jobject>,
    pub SetStaticBooleanField: SetStaticField<jboolean>,
    pub SetStaticByteField: SetStaticField<jbyte>,
    pub SetStaticCharField: SetStaticField<jchar>,
    pub SetStaticShortField: SetStaticField<jshort>,
    pub SetStaticIntField: SetStaticField<jint>,
    pub SetStaticLongField: SetStaticField<jlong>,
    pub SetStaticFloatField: SetStaticField<jfloat>,
    pub SetStaticDoubleField: SetStaticField<jdouble>,

    // 163-166: UTF-16 strings
    pub NewString: unsafe extern "system" fn(env: *mut JNIEnv, unicode: *const jchar, len: jsize) -> jstring,
    pub GetStringLength: unsafe extern "system" fn(env: *mut JNIEnv, str: jstring) -> jsize,
    pub GetStringChars:
        unsafe extern "system" fn(env: *mut JNIEnv, str: jstring, isCopy: *mut jboolean) -> *const jchar,
    pub ReleaseStringChars: unsafe extern "system" fn(env: *mut JNIEnv, str: jstring, chars: *const jchar),

    // 167-170: modified UTF-8 strings
    pub _slots167_170: [*mut c_void; 4],

    // 171-174: array length and object arrays
    pub GetArrayLength: unsafe extern "system" fn(env: *mut JNIEnv, array: jarray) -> jsize,
    pub NewObjectArray: unsafe extern "system" fn(
        env: *mut JNIEnv,
        len: jsize,
        clazz: jclass,
        init: jobject,
    ) -> jobjectArray,
    pub GetObjectArrayElement:
        unsafe extern "system" fn(env: *mut JNIEnv, array: jobjectArray, index: jsize) -> jobject,
    pub SetObjectArrayElement:
        unsafe extern "system" fn(env: *mut JNIEnv, array: jobjectArray, index: jsize, val: jobject),

    // 175-182: New<Type>Array
    pub NewBooleanArray: NewArray,
    pub NewByteArray: NewArray,
    pub NewCharArray: NewArray,
    pub NewShortArray: NewArray,
    pub NewIntArray: NewArray,
    pub NewLongArray: NewArray,
    pub NewFloatArray: NewArray,
    pub NewDoubleArray: NewArray,

    // 183-190: Get<Type>ArrayElements
    pub GetBooleanArrayElements: GetArrayElements<jboolean>,
    pub GetByteArrayElements: GetArrayElements<jbyte>,
    pub GetCharArrayElements: GetArrayElements<jchar>,
    pub GetShortArrayElements: GetArrayElements<jshort>,
    pub GetIntArrayElements: GetArrayElements<jint>,
    pub GetLongArrayElements: GetArrayElements<jlong>,
    pub GetFloatArrayElements: GetArrayElements<jfloat>,
    pub GetDoubleArrayElements: GetArrayElements<jdouble>,

    // 191-198: Release<Type>ArrayElements
    pub ReleaseBooleanArrayElements: ReleaseArrayElements<jboolean>,
    pub ReleaseByteArrayElements: ReleaseArrayElements<jbyte>,
    pub ReleaseCharArrayElements: ReleaseArrayElements<jchar>,
    pub ReleaseShortArrayElements: ReleaseArrayElements<jshort>,
    pub ReleaseIntArrayElements: ReleaseArrayElements<jint>,
    pub ReleaseLongArrayElements: ReleaseArrayElements<jlong>,
    pub ReleaseFloatArrayElements: ReleaseArrayElements<jfloat>,
    pub ReleaseDoubleArrayElements: ReleaseArrayElements<jdouble>,

    // 199-214: Get/Set<Type>ArrayRegion
    pub _slots199_214: [*mut c_void; 16],

    // 215-227: natives, monitors, GetJavaVM, critical access, weak refs
    pub _slots215_227: [*mut c_void; 13],

    // 228: ExceptionCheck
    pub ExceptionCheck: unsafe extern "system" fn(env: *mut JNIEnv) -> jboolean,

    // 229-235: direct buffers, GetObjectRefType, GetModule, IsVirtualThread,
    // GetStringUTFLengthAsLong
    pub _slots229_235: [*mut c_void; 7],
}

// =============================================================================
// JNIEnv - Pointer to the JNI function table
// =============================================================================
//
// In C JNI, JNIEnv is directly a pointer to the vtable:
//   typedef const struct JNINativeInterface_ *JNIEnv;

/// JNIEnv is directly the vtable pointer (C ABI definition)
pub type JNIEnv = *const JNINativeInterface_;
