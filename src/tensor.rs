//! Logical (rows x cols x channels) views over flat buffers, and the address
//! specs used to select sub-regions of them.
//!
//! A [`TensorView`] never owns data. It only says how a flat buffer of
//! `rows * cols * channels` elements is addressed:
//!
//! | Order                          | Linear address of `(i, j, k)`       |
//! |--------------------------------|-------------------------------------|
//! | [`ElementOrder::ColumnMajor`]  | `k*rows*cols + j*rows + i`          |
//! | [`ElementOrder::RowMajor`]     | `i*channels*cols + j*channels + k`  |

use crate::error::{Error, Result};
use std::fmt;

/// Axis of a (rows x cols x channels) tensor, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Linear,
    Row,
    Col,
    Channel,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::Linear => "linear",
            Axis::Row => "row",
            Axis::Col => "column",
            Axis::Channel => "channel",
        };
        f.write_str(name)
    }
}

/// How a 3-D tensor is laid out in its flat buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementOrder {
    /// Row index varies fastest, then column, then channel.
    #[default]
    ColumnMajor,
    /// Channel index varies fastest, then column, then row.
    RowMajor,
}

/// Shape and element order of a tensor stored in a flat buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TensorView {
    rows: usize,
    cols: usize,
    channels: usize,
    order: ElementOrder,
}

impl TensorView {
    /// Creates a view; every extent must be at least 1.
    pub fn new(rows: usize, cols: usize, channels: usize, order: ElementOrder) -> Result<Self> {
        if rows == 0 || cols == 0 || channels == 0 {
            return Err(Error::shape(format!(
                "{}x{}x{} has an empty dimension",
                rows, cols, channels
            )));
        }
        rows.checked_mul(cols)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| Error::shape(format!("{}x{}x{} overflows", rows, cols, channels)))?;
        Ok(TensorView { rows, cols, channels, order })
    }

    /// One-dimensional column-major view of `len` elements.
    pub fn column(len: usize) -> Result<Self> {
        TensorView::new(len, 1, 1, ElementOrder::ColumnMajor)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn order(&self) -> ElementOrder {
        self.order
    }

    pub fn extent(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.rows,
            Axis::Col => self.cols,
            Axis::Channel => self.channels,
            Axis::Linear => self.len(),
        }
    }

    /// `(rows, cols, channels)`.
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.rows, self.cols, self.channels)
    }

    pub fn elements_per_channel(&self) -> usize {
        self.rows * self.cols
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        self.rows * self.cols * self.channels
    }

    /// Always false; a view has at least one element.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Same shape, different element order.
    pub fn with_order(self, order: ElementOrder) -> Self {
        TensorView { order, ..self }
    }

    /// True if both views have the same extents, ignoring element order.
    pub fn same_shape(&self, other: &TensorView) -> bool {
        self.dims() == other.dims()
    }

    /// Fails with `ShapeMismatch` unless the view covers exactly `len`
    /// elements.
    pub fn check_len(&self, len: usize) -> Result<()> {
        if self.len() == len {
            Ok(())
        } else {
            Err(Error::shape(format!(
                "{}x{}x{} needs {} elements, buffer has {}",
                self.rows,
                self.cols,
                self.channels,
                self.len(),
                len
            )))
        }
    }

    /// Linear address of `(i, j, k)` without bounds checks.
    pub fn offset(&self, i: usize, j: usize, k: usize) -> usize {
        match self.order {
            ElementOrder::ColumnMajor => k * self.rows * self.cols + j * self.rows + i,
            ElementOrder::RowMajor => i * self.channels * self.cols + j * self.channels + k,
        }
    }

    /// Bounds-checked linear address of `(i, j, k)`.
    pub fn index(&self, i: usize, j: usize, k: usize) -> Result<usize> {
        check_axis(Axis::Row, i, self.rows)?;
        check_axis(Axis::Col, j, self.cols)?;
        check_axis(Axis::Channel, k, self.channels)?;
        Ok(self.offset(i, j, k))
    }

    /// Bounds-checked linear address of `(i, j)` in channel 0.
    pub fn index_2d(&self, i: usize, j: usize) -> Result<usize> {
        self.index(i, j, 0)
    }

    /// Checks a linear address.
    pub fn index_linear(&self, index: usize) -> Result<usize> {
        check_axis(Axis::Linear, index, self.len())?;
        Ok(index)
    }

    /// Extents and strides ordered from the fastest varying axis to the
    /// slowest.
    pub(crate) fn physical(&self) -> Physical {
        match self.order {
            ElementOrder::ColumnMajor => Physical {
                axes: [Axis::Row, Axis::Col, Axis::Channel],
                extents: [self.rows, self.cols, self.channels],
            },
            ElementOrder::RowMajor => Physical {
                axes: [Axis::Channel, Axis::Col, Axis::Row],
                extents: [self.channels, self.cols, self.rows],
            },
        }
    }
}

/// A view's axes in memory order, fastest first.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Physical {
    pub axes: [Axis; 3],
    pub extents: [usize; 3],
}

impl Physical {
    pub fn mid_stride(&self) -> usize {
        self.extents[0]
    }

    pub fn slow_stride(&self) -> usize {
        self.extents[0] * self.extents[1]
    }
}

fn check_axis(axis: Axis, index: usize, extent: usize) -> Result<()> {
    if index < extent {
        Ok(())
    } else {
        Err(Error::out_of_range(axis, index as i64, extent))
    }
}

// =============================================================================
// Address specs
// =============================================================================

/// Bound value meaning "the last valid index along this axis".
pub const LAST: i32 = -1;

/// Inclusive index range along one axis. Either bound may be [`LAST`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub start: i32,
    pub end: i32,
}

impl AxisRange {
    /// The whole axis.
    pub const ALL: AxisRange = AxisRange { start: 0, end: LAST };

    pub fn new(start: i32, end: i32) -> Self {
        AxisRange { start, end }
    }

    pub fn single(index: i32) -> Self {
        AxisRange { start: index, end: index }
    }

    /// Resolves [`LAST`] against `extent` and checks both bounds.
    pub fn resolve(&self, axis: Axis, extent: usize) -> Result<Span> {
        let start = resolve_bound(axis, self.start, extent)?;
        let end = resolve_bound(axis, self.end, extent)?;
        if start > end {
            return Err(Error::shape(format!(
                "{} range [{}, {}] is empty",
                axis, self.start, self.end
            )));
        }
        Ok(Span { start, len: end - start + 1 })
    }
}

fn resolve_bound(axis: Axis, bound: i32, extent: usize) -> Result<usize> {
    if bound == LAST {
        return Ok(extent - 1);
    }
    if bound < 0 || bound as usize >= extent {
        return Err(Error::out_of_range(axis, i64::from(bound), extent));
    }
    Ok(bound as usize)
}

/// A resolved, non-empty contiguous run of indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn full(extent: usize) -> Self {
        Span { start: 0, len: extent }
    }

    /// One past the last index.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn covers(&self, extent: usize) -> bool {
        self.start == 0 && self.len == extent
    }

    fn indices(&self) -> Vec<usize> {
        (self.start..self.end()).collect()
    }
}

/// Selection along one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Range(AxisRange),
    /// Explicit indices, in output order. Repeats are allowed.
    Indices(Vec<usize>),
}

impl Selection {
    pub fn all() -> Self {
        Selection::Range(AxisRange::ALL)
    }
}

impl From<AxisRange> for Selection {
    fn from(range: AxisRange) -> Self {
        Selection::Range(range)
    }
}

impl From<Vec<usize>> for Selection {
    fn from(indices: Vec<usize>) -> Self {
        Selection::Indices(indices)
    }
}

impl From<&[usize]> for Selection {
    fn from(indices: &[usize]) -> Self {
        Selection::Indices(indices.to_vec())
    }
}

/// A rectangular or discontinuous sub-region of a tensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSpec {
    pub rows: Selection,
    pub cols: Selection,
    pub channels: Selection,
}

impl AddressSpec {
    pub fn new(rows: impl Into<Selection>, cols: impl Into<Selection>, channels: impl Into<Selection>) -> Self {
        AddressSpec { rows: rows.into(), cols: cols.into(), channels: channels.into() }
    }

    /// The whole tensor.
    pub fn all() -> Self {
        AddressSpec::new(AxisRange::ALL, AxisRange::ALL, AxisRange::ALL)
    }

    /// Inclusive ranges on every axis.
    pub fn ranges(rows: (i32, i32), cols: (i32, i32), channels: (i32, i32)) -> Self {
        AddressSpec::new(
            AxisRange::new(rows.0, rows.1),
            AxisRange::new(cols.0, cols.1),
            AxisRange::new(channels.0, channels.1),
        )
    }

    /// Explicit index lists on every axis.
    pub fn indices(rows: &[usize], cols: &[usize], channels: &[usize]) -> Self {
        AddressSpec::new(rows, cols, channels)
    }

    pub fn row(i: i32) -> Self {
        AddressSpec::rows(i, i)
    }

    /// Rows `start..=end`, all columns and channels.
    pub fn rows(start: i32, end: i32) -> Self {
        AddressSpec::new(AxisRange::new(start, end), AxisRange::ALL, AxisRange::ALL)
    }

    pub fn row_indices(rows: &[usize]) -> Self {
        AddressSpec::new(rows, AxisRange::ALL, AxisRange::ALL)
    }

    pub fn col(j: i32) -> Self {
        AddressSpec::cols(j, j)
    }

    /// Columns `start..=end`, all rows and channels.
    pub fn cols(start: i32, end: i32) -> Self {
        AddressSpec::new(AxisRange::ALL, AxisRange::new(start, end), AxisRange::ALL)
    }

    pub fn col_indices(cols: &[usize]) -> Self {
        AddressSpec::new(AxisRange::ALL, cols, AxisRange::ALL)
    }

    pub fn channel(k: i32) -> Self {
        AddressSpec::channels(k, k)
    }

    /// Channels `start..=end`, all rows and columns.
    pub fn channels(start: i32, end: i32) -> Self {
        AddressSpec::new(AxisRange::ALL, AxisRange::ALL, AxisRange::new(start, end))
    }

    pub fn channel_indices(channels: &[usize]) -> Self {
        AddressSpec::new(AxisRange::ALL, AxisRange::ALL, channels)
    }

    /// Resolves the selections against `view`: [`LAST`] bounds are replaced and
    /// every index is checked.
    ///
    /// If any axis is an index list the region is [`Region::Scattered`] and
    /// range axes are expanded to lists.
    pub fn resolve(&self, view: &TensorView) -> Result<Region> {
        let rows = resolve_selection(&self.rows, Axis::Row, view.rows())?;
        let cols = resolve_selection(&self.cols, Axis::Col, view.cols())?;
        let channels = resolve_selection(&self.channels, Axis::Channel, view.channels())?;
        Ok(match (rows, cols, channels) {
            (Resolved::Span(rows), Resolved::Span(cols), Resolved::Span(channels)) => {
                Region::Block { rows, cols, channels }
            }
            (rows, cols, channels) => Region::Scattered {
                rows: rows.into_indices(),
                cols: cols.into_indices(),
                channels: channels.into_indices(),
            },
        })
    }
}

enum Resolved {
    Span(Span),
    Indices(Vec<usize>),
}

impl Resolved {
    fn into_indices(self) -> Vec<usize> {
        match self {
            Resolved::Span(span) => span.indices(),
            Resolved::Indices(indices) => indices,
        }
    }
}

fn resolve_selection(selection: &Selection, axis: Axis, extent: usize) -> Result<Resolved> {
    match selection {
        Selection::Range(range) => range.resolve(axis, extent).map(Resolved::Span),
        Selection::Indices(indices) => {
            if indices.is_empty() {
                return Err(Error::shape(format!("empty {} index list", axis)));
            }
            for &index in indices {
                check_axis(axis, index, extent)?;
            }
            Ok(Resolved::Indices(indices.clone()))
        }
    }
}

/// A resolved sub-region, valid for the view it was resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    Block { rows: Span, cols: Span, channels: Span },
    Scattered { rows: Vec<usize>, cols: Vec<usize>, channels: Vec<usize> },
}

impl Region {
    /// `(rows, cols, channels)` of the selected sub-tensor.
    pub fn dims(&self) -> (usize, usize, usize) {
        match self {
            Region::Block { rows, cols, channels } => (rows.len, cols.len, channels.len),
            Region::Scattered { rows, cols, channels } => (rows.len(), cols.len(), channels.len()),
        }
    }

    pub fn len(&self) -> usize {
        let (r, c, k) = self.dims();
        r * c * k
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View describing the packed output of this region in `order`.
    pub fn shape(&self, order: ElementOrder) -> Result<TensorView> {
        let (r, c, k) = self.dims();
        TensorView::new(r, c, k, order)
    }
}
