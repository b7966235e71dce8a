use jni_marshal::prelude::*;

// package demo;
// public class Native {
//     static { System.loadLibrary("my_native"); }
//     public static native void scale(Matkc mat, double factor);
//     public static native Matkc crop(Matkc mat, int r0, int r1, int c0, int c1);
//     public static native double[] channelSums(Matkc mat);
// }

#[no_mangle]
pub extern "system" fn Java_demo_Native_scale(
    env: *mut jni::JNIEnv,
    _cls: jni::jclass,
    mat: jni::jobject,
    factor: jni::jdouble,
) {
    let env = unsafe { JniEnv::from_raw(env) };
    let result = Matkc::wrap(&env, JObject(mat)).and_then(|mut m| {
        for v in m.data_mut()? {
            *v *= factor;
        }
        Ok(())
    });
    env.or_throw(result);
}

#[no_mangle]
pub extern "system" fn Java_demo_Native_crop(
    env: *mut jni::JNIEnv,
    _cls: jni::jclass,
    mat: jni::jobject,
    r0: jni::jint,
    r1: jni::jint,
    c0: jni::jint,
    c1: jni::jint,
) -> jni::jobject {
    let env = unsafe { JniEnv::from_raw(env) };
    let result = Matkc::wrap(&env, JObject(mat)).and_then(|m| {
        let spec = AddressSpec::new(AxisRange::new(r0, r1), AxisRange::new(c0, c1), AxisRange::ALL);
        let cropped = m.region(&spec)?;
        log::debug!("{}", cropped.info(Some("crop")));
        Ok(cropped.into_object())
    });
    env.or_throw(result).map_or(std::ptr::null_mut(), |obj| obj.as_raw())
}

#[no_mangle]
pub extern "system" fn Java_demo_Native_channelSums(
    env: *mut jni::JNIEnv,
    _cls: jni::jclass,
    mat: jni::jobject,
) -> jni::jdoubleArray {
    let env = unsafe { JniEnv::from_raw(env) };
    let result = Matkc::wrap(&env, JObject(mat)).and_then(|m| {
        let sums = (0..m.channels())
            .map(|k| Ok(m.region_vec(&AddressSpec::channel(k as i32))?.iter().sum()))
            .collect::<Result<Vec<f64>>>()?;
        env.vec_to_array(&sums)
    });
    env.or_throw(result).map_or(std::ptr::null_mut(), |array| array.as_raw())
}
