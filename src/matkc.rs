//! Native view of the Java `Matkc` multi-channel matrix.
//!
//! The Java class holds a column-major `double[]` plus its dimensions:
//!
//! ```text
//! class Matkc {
//!     double[] data;          // data[k*nr*nc + j*nr + i]
//!     int nr, nc, nch;        // rows, columns, channels
//!     int ndata;              // nr * nc * nch
//!     int ndata_per_chan;     // nr * nc
//!     Matkc(int nr, int nc, int nch) { ... }
//! }
//! ```
//!
//! A [`Matkc`] pins `data` for as long as it lives, so reads and writes go
//! straight to the pinned elements; the final values are copied back when the
//! wrapper is dropped or turned back into its Java object with
//! [`Matkc::into_object`]. Class and field names can be changed through
//! [`MatkcLayout`].

use crate::copier::reorder;
use crate::env::{JniEnv, LocalRef};
use crate::error::{Error, Result};
use crate::kind::{JDoubleArray, JObject, JValue};
use crate::pinned::ArrayHandle;
use crate::sys::jni;
use crate::tensor::{AddressSpec, Axis, ElementOrder, TensorView};
use num_traits::AsPrimitive;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Constructor signature: `(rows, cols, channels)`.
const CONSTRUCTOR_SIG: &str = "(III)V";

/// Names of the Java class and fields backing a [`Matkc`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatkcLayout {
    class_name: String,
    data_field: String,
    rows_field: String,
    cols_field: String,
    channels_field: String,
    len_field: String,
    per_channel_field: String,
}

impl Default for MatkcLayout {
    fn default() -> Self {
        MatkcLayout {
            class_name: "KKH/StdLib/Matkc".to_string(),
            data_field: "data".to_string(),
            rows_field: "nr".to_string(),
            cols_field: "nc".to_string(),
            channels_field: "nch".to_string(),
            len_field: "ndata".to_string(),
            per_channel_field: "ndata_per_chan".to_string(),
        }
    }
}

impl MatkcLayout {
    /// Default field names on a different class.
    pub fn new(class_name: impl Into<String>) -> Self {
        MatkcLayout { class_name: class_name.into(), ..MatkcLayout::default() }
    }

    pub fn with_data_field(mut self, name: impl Into<String>) -> Self {
        self.data_field = name.into();
        self
    }

    pub fn with_shape_fields(
        mut self,
        rows: impl Into<String>,
        cols: impl Into<String>,
        channels: impl Into<String>,
    ) -> Self {
        self.rows_field = rows.into();
        self.cols_field = cols.into();
        self.channels_field = channels.into();
        self
    }

    pub fn with_count_fields(mut self, len: impl Into<String>, per_channel: impl Into<String>) -> Self {
        self.len_field = len.into();
        self.per_channel_field = per_channel.into();
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn data_field(&self) -> &str {
        &self.data_field
    }
}

/// A Java `Matkc` object with its data array pinned.
pub struct Matkc<'env> {
    env: &'env JniEnv,
    layout: MatkcLayout,
    obj: JObject,
    view: TensorView,
    data: ArrayHandle<'env, jni::jdouble>,
}

impl<'env> Matkc<'env> {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Creates a zero-filled `rows x cols x channels` matrix on the Java side.
    pub fn new(env: &'env JniEnv, rows: usize, cols: usize, channels: usize) -> Result<Self> {
        Matkc::new_with_layout(env, MatkcLayout::default(), rows, cols, channels)
    }

    pub fn new_with_layout(
        env: &'env JniEnv,
        layout: MatkcLayout,
        rows: usize,
        cols: usize,
        channels: usize,
    ) -> Result<Self> {
        TensorView::new(rows, cols, channels, ElementOrder::ColumnMajor)?;
        let args = [
            JValue::Int(to_jint(Axis::Row, rows)?),
            JValue::Int(to_jint(Axis::Col, cols)?),
            JValue::Int(to_jint(Axis::Channel, channels)?),
        ];
        let cls = LocalRef::new(env, env.find_class(&layout.class_name)?);
        let obj = env.new_object(cls.get(), CONSTRUCTOR_SIG, &args)?;
        Matkc::wrap_with_layout(env, layout, obj)
    }

    /// Wraps an existing Java `Matkc` and pins its data.
    pub fn wrap(env: &'env JniEnv, obj: JObject) -> Result<Self> {
        Matkc::wrap_with_layout(env, MatkcLayout::default(), obj)
    }

    pub fn wrap_with_layout(env: &'env JniEnv, layout: MatkcLayout, obj: JObject) -> Result<Self> {
        let cls = LocalRef::new(env, env.get_object_class(obj.as_raw())?);
        let int_field = |name: &str| -> Result<jni::jint> {
            let id = env.get_field_id(cls.get(), name, "I")?;
            Ok(env.get_field_by_id(obj.as_raw(), id))
        };
        let rows = from_jint(Axis::Row, int_field(&layout.rows_field)?)?;
        let cols = from_jint(Axis::Col, int_field(&layout.cols_field)?)?;
        let channels = from_jint(Axis::Channel, int_field(&layout.channels_field)?)?;
        let len = int_field(&layout.len_field)?;
        let per_channel = int_field(&layout.per_channel_field)?;
        let view = TensorView::new(rows, cols, channels, ElementOrder::ColumnMajor)?;
        if usize::try_from(len) != Ok(view.len()) || usize::try_from(per_channel) != Ok(view.elements_per_channel()) {
            return Err(Error::shape(format!(
                "{}x{}x{} matrix reports ndata = {}, ndata_per_chan = {}",
                rows, cols, channels, len, per_channel
            )));
        }

        let data_id = env.get_field_id(cls.get(), &layout.data_field, "[D")?;
        let data: JDoubleArray = env.get_field_by_id(obj.as_raw(), data_id);
        if data.is_null() {
            return Err(Error::NullReference("matrix data"));
        }
        let handle = ArrayHandle::from_array_shaped(env, data, rows, cols, channels, ElementOrder::ColumnMajor)?;
        log::debug!("wrapped {} {}x{}x{}", layout.class_name, rows, cols, channels);
        Ok(Matkc { env, layout, obj, view, data: handle })
    }

    /// Creates a matrix holding a copy of `data`, laid out as `order`.
    ///
    /// With [`ElementOrder::RowMajor`] the source is read channel-fastest
    /// (`data[i*channels*cols + j*channels + k]`), the usual interleaved
    /// image layout.
    pub fn from_slice<T>(
        env: &'env JniEnv,
        data: &[T],
        rows: usize,
        cols: usize,
        channels: usize,
        order: ElementOrder,
    ) -> Result<Self>
    where
        T: AsPrimitive<f64>,
    {
        TensorView::new(rows, cols, channels, order)?.check_len(data.len())?;
        let mut mat = Matkc::new(env, rows, cols, channels)?;
        mat.load(data, order)?;
        Ok(mat)
    }

    /// Overwrites every element from `data`, laid out as `order`.
    pub fn load<T>(&mut self, data: &[T], order: ElementOrder) -> Result<()>
    where
        T: AsPrimitive<f64>,
    {
        let source = self.view().with_order(order);
        source.check_len(data.len())?;
        let values: Vec<f64> = data.iter().map(|v| v.as_()).collect();
        let column_major = reorder(&values, &source, ElementOrder::ColumnMajor)?;
        self.data.as_mut_slice()?.copy_from_slice(&column_major);
        Ok(())
    }

    /// A new Java matrix with a copy of this one's data.
    pub fn try_clone(&self) -> Result<Matkc<'env>> {
        self.region(&AddressSpec::all())
    }

    /// Releases the pin (copying the data back) and returns the Java object.
    pub fn into_object(self) -> JObject {
        self.obj
    }

    // =========================================================================
    // Shape
    // =========================================================================

    pub fn rows(&self) -> usize {
        self.view().rows()
    }

    pub fn cols(&self) -> usize {
        self.view().cols()
    }

    pub fn channels(&self) -> usize {
        self.view().channels()
    }

    /// Total element count (`ndata`).
    pub fn len(&self) -> usize {
        self.view().len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// `rows * cols` (`ndata_per_chan`).
    pub fn elements_per_channel(&self) -> usize {
        self.view().elements_per_channel()
    }

    /// Column-major view of the data.
    pub fn view(&self) -> TensorView {
        self.view
    }

    pub fn object(&self) -> JObject {
        self.obj
    }

    pub fn layout(&self) -> &MatkcLayout {
        &self.layout
    }

    /// Pinned data in column-major order.
    pub fn data(&self) -> Result<&[f64]> {
        self.data.as_slice()
    }

    pub fn data_mut(&mut self) -> Result<&mut [f64]> {
        self.data.as_mut_slice()
    }

    /// Copies the data out, laid out as `order`.
    pub fn to_vec<T>(&self, order: ElementOrder) -> Result<Vec<T>>
    where
        T: Copy + 'static,
        f64: AsPrimitive<T>,
    {
        let reordered = reorder(self.data()?, &self.view(), order)?;
        Ok(reordered.into_iter().map(|v| v.as_()).collect())
    }

    // =========================================================================
    // Elements
    // =========================================================================

    pub fn get(&self, index: usize) -> Result<f64> {
        self.data.get(index)
    }

    pub fn get_2d(&self, i: usize, j: usize) -> Result<f64> {
        self.data.get_2d(i, j)
    }

    pub fn get_3d(&self, i: usize, j: usize, k: usize) -> Result<f64> {
        self.data.get_3d(i, j, k)
    }

    /// The element at linear address 0.
    pub fn first(&self) -> Result<f64> {
        self.data.get(0)
    }

    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        self.data.set(index, value)
    }

    pub fn set_2d(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        self.data.set_2d(i, j, value)
    }

    pub fn set_3d(&mut self, i: usize, j: usize, k: usize, value: f64) -> Result<()> {
        self.data.set_3d(i, j, k, value)
    }

    pub fn fill(&mut self, value: f64) -> Result<()> {
        self.data.fill(value)
    }

    // =========================================================================
    // Regions
    // =========================================================================

    /// Copies a region into a new Java matrix.
    pub fn region(&self, spec: &AddressSpec) -> Result<Matkc<'env>> {
        let (shape, values) = self.data.read_region(spec)?;
        let mut out = Matkc::new_with_layout(self.env, self.layout.clone(), shape.rows(), shape.cols(), shape.channels())?;
        out.data.as_mut_slice()?.copy_from_slice(&values);
        Ok(out)
    }

    /// Copies a region into a column-major `Vec`.
    pub fn region_vec(&self, spec: &AddressSpec) -> Result<Vec<f64>> {
        Ok(self.data.read_region(spec)?.1)
    }

    /// Writes `src` into a region. The region's resolved extents must equal
    /// `src`'s shape on every axis.
    pub fn set_region(&mut self, spec: &AddressSpec, src: &Matkc<'_>) -> Result<()> {
        let shape = src.view();
        self.data.write_region_shaped(spec, src.data()?, &shape)
    }

    /// Writes column-major values into a region; `data` must hold exactly as
    /// many values as the region.
    pub fn set_region_from_slice(&mut self, spec: &AddressSpec, data: &[f64]) -> Result<()> {
        self.data.write_region(spec, data)
    }

    /// Writes all of `src` with its first element at `(i, j, k)`.
    pub fn place(&mut self, src: &Matkc<'_>, i: usize, j: usize, k: usize) -> Result<()> {
        let spec = AddressSpec::ranges(
            span_bounds(Axis::Row, i, src.rows())?,
            span_bounds(Axis::Col, j, src.cols())?,
            span_bounds(Axis::Channel, k, src.channels())?,
        );
        self.set_region(&spec, src)
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    /// One-line summary, optionally naming the matrix.
    pub fn info(&self, name: Option<&str>) -> String {
        let label = match name {
            Some(name) => format!("Matrix {} info", name),
            None => "Matrix info".to_string(),
        };
        format!(
            "{}: #rows = {}, #ncols = {}, #nchannels = {}",
            label,
            self.rows(),
            self.cols(),
            self.channels()
        )
    }

    /// Writes a header line and then every value (column-major) on its own
    /// line.
    pub fn save_data(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(
            out,
            "Matkc data; nrows = {}, ncols = {}, nchannels = {}",
            self.rows(),
            self.cols(),
            self.channels()
        )?;
        for value in self.data()? {
            writeln!(out, "{}", value)?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Prints every channel as a bracketed block of comma-separated rows.
impl fmt::Display for Matkc<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data().map_err(|_| fmt::Error)?;
        let view = self.view();
        for k in 0..view.channels() {
            writeln!(f, "mat(:,:,{})=[", k + 1)?;
            for i in 0..view.rows() {
                for j in 0..view.cols() {
                    let value = data[view.offset(i, j, k)];
                    if j + 1 < view.cols() {
                        write!(f, "{},\t", value)?;
                    } else {
                        writeln!(f, "{};", value)?;
                    }
                }
            }
            writeln!(f, "];")?;
        }
        Ok(())
    }
}

fn to_jint(axis: Axis, value: usize) -> Result<jni::jint> {
    jni::jint::try_from(value).map_err(|_| Error::out_of_range(axis, value as i64, jni::jint::MAX as usize))
}

fn from_jint(axis: Axis, value: jni::jint) -> Result<usize> {
    if value <= 0 {
        return Err(Error::shape(format!("matrix has {} {} extent", value, axis)));
    }
    Ok(value as usize)
}

fn span_bounds(axis: Axis, start: usize, len: usize) -> Result<(i32, i32)> {
    Ok((to_jint(axis, start)?, to_jint(axis, start + len - 1)?))
}
