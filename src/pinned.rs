//! Pinned access to Java primitive arrays.
//!
//! [`PinnedBuffer`] is the scoped guard for one `Get<Type>ArrayElements`
//! call: it hands out the elements as a slice and calls the matching
//! `Release<Type>ArrayElements` exactly once, when dropped or explicitly
//! released. The pointer may point into the Java heap or at a copy; either
//! way it is only valid while the guard lives.
//!
//! [`ArrayHandle`] builds on it: it owns at most one pin at a time and
//! describes the pinned elements as a [`TensorView`].
//!
//! ```rust,ignore
//! let mut handle = ArrayHandle::<jdouble>::new(&env);
//! handle.wrap_shaped(array, 4, 3, 2, ElementOrder::ColumnMajor)?;
//! let v = handle.get_3d(1, 2, 1)?;
//! handle.set_3d(1, 2, 1, v * 2.0)?;
//! // released (and copied back) when `handle` goes out of scope
//! ```

use crate::copier::CopyPlan;
use crate::env::JniEnv;
use crate::error::{Error, Result};
use crate::kind::{ArrayElement, JArray};
use crate::sys::jni;
use crate::tensor::{AddressSpec, ElementOrder, TensorView};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// What happens to the elements when a pin is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseMode {
    /// Copy changes back to the Java array (mode `0`).
    #[default]
    CopyBack,
    /// Discard changes made through a copied buffer (`JNI_ABORT`).
    NoCopyBack,
}

impl ReleaseMode {
    fn as_jint(self) -> jni::jint {
        match self {
            ReleaseMode::CopyBack => jni::JNI_RELEASE,
            ReleaseMode::NoCopyBack => jni::JNI_ABORT,
        }
    }
}

// =========================================================================
// PinnedBuffer
// =========================================================================

/// The elements of one Java array, pinned for direct native access.
///
/// Not `Clone`: exactly one guard owns each pin.
pub struct PinnedBuffer<'env, T: ArrayElement> {
    env: &'env JniEnv,
    array: JArray<T>,
    ptr: NonNull<T>,
    len: usize,
    is_copy: bool,
    mode: ReleaseMode,
}

impl<'env, T: ArrayElement> PinnedBuffer<'env, T> {
    /// Pins the elements of `array`.
    pub fn pin(env: &'env JniEnv, array: JArray<T>) -> Result<Self> {
        let len = env.get_array_length(array.as_raw())?;
        let mut is_copy: jni::jboolean = jni::JNI_FALSE;
        let raw = unsafe { T::pin_elements(env.raw(), array.as_raw(), &mut is_copy) };
        let ptr = NonNull::new(raw).ok_or(Error::AllocationFailed("pinned array elements"))?;
        log::debug!(
            "pinned {}[{}] (copy: {})",
            T::PRIMITIVE.java_name(),
            len,
            is_copy != jni::JNI_FALSE
        );
        Ok(PinnedBuffer {
            env,
            array,
            ptr,
            len,
            is_copy: is_copy != jni::JNI_FALSE,
            mode: ReleaseMode::default(),
        })
    }

    pub fn array(&self) -> JArray<T> {
        self.array
    }

    /// True if the JVM handed out a copy rather than the array itself.
    pub fn is_copy(&self) -> bool {
        self.is_copy
    }

    pub fn release_mode(&self) -> ReleaseMode {
        self.mode
    }

    pub fn set_release_mode(&mut self, mode: ReleaseMode) {
        self.mode = mode;
    }

    /// Copies the current contents back to the Java array without releasing
    /// the pin (`JNI_COMMIT`).
    pub fn commit(&self) {
        unsafe { T::release_elements(self.env.raw(), self.array.as_raw(), self.ptr.as_ptr(), jni::JNI_COMMIT) }
    }

    /// Releases the pin now instead of at the end of scope.
    pub fn release(self) {
        drop(self)
    }
}

impl<T: ArrayElement> Deref for PinnedBuffer<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: ArrayElement> DerefMut for PinnedBuffer<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: ArrayElement> Drop for PinnedBuffer<'_, T> {
    fn drop(&mut self) {
        unsafe {
            T::release_elements(self.env.raw(), self.array.as_raw(), self.ptr.as_ptr(), self.mode.as_jint());
        }
        log::debug!("released {}[{}] ({:?})", T::PRIMITIVE.java_name(), self.len, self.mode);
    }
}

// =========================================================================
// ArrayHandle
// =========================================================================

struct Pinned<'env, T: ArrayElement> {
    buffer: PinnedBuffer<'env, T>,
    view: TensorView,
}

/// Owns at most one pinned Java array and addresses it as a
/// (rows x cols x channels) tensor.
///
/// Every `wrap*`/`allocate*` call releases the previous pin before taking a
/// new one, and dropping the handle releases whatever is still pinned.
/// Addressing an unpinned handle fails with [`Error::NotPinned`].
pub struct ArrayHandle<'env, T: ArrayElement> {
    env: &'env JniEnv,
    pinned: Option<Pinned<'env, T>>,
    mode: ReleaseMode,
}

impl<'env, T: ArrayElement> ArrayHandle<'env, T> {
    /// Creates an unpinned handle.
    pub fn new(env: &'env JniEnv) -> Self {
        ArrayHandle { env, pinned: None, mode: ReleaseMode::default() }
    }

    /// Creates a handle wrapping `array` as a column vector.
    pub fn from_array(env: &'env JniEnv, array: JArray<T>) -> Result<Self> {
        let mut handle = ArrayHandle::new(env);
        handle.wrap(array)?;
        Ok(handle)
    }

    /// Creates a handle wrapping `array` with the given shape.
    pub fn from_array_shaped(
        env: &'env JniEnv,
        array: JArray<T>,
        rows: usize,
        cols: usize,
        channels: usize,
        order: ElementOrder,
    ) -> Result<Self> {
        let mut handle = ArrayHandle::new(env);
        handle.wrap_shaped(array, rows, cols, channels, order)?;
        Ok(handle)
    }

    /// Release mode applied to every pin this handle takes from now on.
    pub fn set_release_mode(&mut self, mode: ReleaseMode) {
        self.mode = mode;
        if let Some(pinned) = self.pinned.as_mut() {
            pinned.buffer.set_release_mode(mode);
        }
    }

    // =====================================================================
    // Lifecycle
    // =====================================================================

    /// Wraps an existing array as a `len x 1 x 1` column-major tensor.
    pub fn wrap(&mut self, array: JArray<T>) -> Result<()> {
        let len = self.env.get_array_length(array.as_raw())?;
        let view = TensorView::column(len)?;
        self.attach(array, view)
    }

    /// Wraps an existing array with an explicit shape.
    ///
    /// Fails with [`Error::ShapeMismatch`] unless
    /// `rows * cols * channels` equals the array length; the handle keeps its
    /// previous array and view in that case.
    pub fn wrap_shaped(
        &mut self,
        array: JArray<T>,
        rows: usize,
        cols: usize,
        channels: usize,
        order: ElementOrder,
    ) -> Result<()> {
        let len = self.env.get_array_length(array.as_raw())?;
        let view = TensorView::new(rows, cols, channels, order)?;
        view.check_len(len)?;
        self.attach(array, view)
    }

    /// Allocates a new Java array of `len` elements and pins it as a column
    /// vector.
    pub fn allocate(&mut self, len: usize) -> Result<()> {
        let view = TensorView::column(len)?;
        let array = self.env.new_array::<T>(len)?;
        self.attach(array, view)
    }

    /// Allocates a new Java array for a `rows x cols x channels` tensor.
    pub fn allocate_shaped(&mut self, rows: usize, cols: usize, channels: usize, order: ElementOrder) -> Result<()> {
        let view = TensorView::new(rows, cols, channels, order)?;
        let array = self.env.new_array::<T>(view.len())?;
        self.attach(array, view)
    }

    fn attach(&mut self, array: JArray<T>, view: TensorView) -> Result<()> {
        self.release();
        let mut buffer = PinnedBuffer::pin(self.env, array)?;
        buffer.set_release_mode(self.mode);
        view.check_len(buffer.len())?;
        self.pinned = Some(Pinned { buffer, view });
        Ok(())
    }

    /// Releases the current pin. Does nothing if nothing is pinned.
    pub fn release(&mut self) {
        self.pinned = None;
    }

    /// Copies the pinned elements back to Java without unpinning.
    pub fn commit(&self) -> Result<()> {
        self.active()?.buffer.commit();
        Ok(())
    }

    /// Releases the pin and returns the array for handing back to Java.
    pub fn into_array(mut self) -> Option<JArray<T>> {
        self.pinned.take().map(|pinned| {
            let array = pinned.buffer.array();
            drop(pinned);
            array
        })
    }

    // =====================================================================
    // State
    // =====================================================================

    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some()
    }

    pub fn view(&self) -> Option<&TensorView> {
        self.pinned.as_ref().map(|p| &p.view)
    }

    pub fn array(&self) -> Option<JArray<T>> {
        self.pinned.as_ref().map(|p| p.buffer.array())
    }

    /// Element count of the pinned array, 0 when unpinned.
    pub fn len(&self) -> usize {
        self.pinned.as_ref().map_or(0, |p| p.buffer.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> Result<&[T]> {
        Ok(&self.active()?.buffer[..])
    }

    pub fn as_mut_slice(&mut self) -> Result<&mut [T]> {
        Ok(&mut self.active_mut()?.buffer[..])
    }

    fn active(&self) -> Result<&Pinned<'env, T>> {
        self.pinned.as_ref().ok_or(Error::NotPinned)
    }

    fn active_mut(&mut self) -> Result<&mut Pinned<'env, T>> {
        self.pinned.as_mut().ok_or(Error::NotPinned)
    }

    // =====================================================================
    // Element access
    // =====================================================================

    /// Reads the element at a linear address.
    pub fn get(&self, index: usize) -> Result<T> {
        let pinned = self.active()?;
        Ok(pinned.buffer[pinned.view.index_linear(index)?])
    }

    /// Reads `(i, j)` of channel 0.
    pub fn get_2d(&self, i: usize, j: usize) -> Result<T> {
        let pinned = self.active()?;
        Ok(pinned.buffer[pinned.view.index_2d(i, j)?])
    }

    /// Reads `(i, j, k)` under the handle's element order.
    pub fn get_3d(&self, i: usize, j: usize, k: usize) -> Result<T> {
        let pinned = self.active()?;
        Ok(pinned.buffer[pinned.view.index(i, j, k)?])
    }

    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let pinned = self.active_mut()?;
        let at = pinned.view.index_linear(index)?;
        pinned.buffer[at] = value;
        Ok(())
    }

    pub fn set_2d(&mut self, i: usize, j: usize, value: T) -> Result<()> {
        let pinned = self.active_mut()?;
        let at = pinned.view.index_2d(i, j)?;
        pinned.buffer[at] = value;
        Ok(())
    }

    pub fn set_3d(&mut self, i: usize, j: usize, k: usize, value: T) -> Result<()> {
        let pinned = self.active_mut()?;
        let at = pinned.view.index(i, j, k)?;
        pinned.buffer[at] = value;
        Ok(())
    }

    /// Sets every element to `value`.
    pub fn fill(&mut self, value: T) -> Result<()> {
        self.as_mut_slice()?.fill(value);
        Ok(())
    }

    // =====================================================================
    // Regions
    // =====================================================================

    /// Plans a region copy against the current view.
    pub fn plan(&self, spec: &AddressSpec) -> Result<CopyPlan> {
        CopyPlan::new(&self.active()?.view, spec)
    }

    /// Copies a region out into a packed buffer in the handle's element
    /// order.
    pub fn read_region(&self, spec: &AddressSpec) -> Result<(TensorView, Vec<T>)> {
        let pinned = self.active()?;
        let plan = CopyPlan::new(&pinned.view, spec)?;
        let data = plan.gather(&pinned.buffer)?;
        Ok((*plan.shape(), data))
    }

    /// Writes a packed buffer (handle's element order) into a region. The
    /// input length must equal the region size.
    pub fn write_region(&mut self, spec: &AddressSpec, data: &[T]) -> Result<()> {
        let pinned = self.active_mut()?;
        let plan = CopyPlan::new(&pinned.view, spec)?;
        plan.scatter(&mut pinned.buffer, data)
    }

    /// Writes a shaped input into a region. The input's extents must equal
    /// the resolved region on every axis.
    pub fn write_region_shaped(&mut self, spec: &AddressSpec, data: &[T], shape: &TensorView) -> Result<()> {
        let pinned = self.active_mut()?;
        let plan = CopyPlan::new(&pinned.view, spec)?;
        plan.scatter_shaped(&mut pinned.buffer, data, shape)
    }
}
