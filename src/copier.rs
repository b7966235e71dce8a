//! Strided region copies between a tensor buffer and a packed region buffer.
//!
//! A [`CopyPlan`] turns an [`AddressSpec`] into the list of contiguous runs
//! that have to be moved, preferring the largest run the region allows:
//!
//! 1. [`CopyTier::FullExtent`]: the two fastest axes are complete, so the
//!    whole region is one run.
//! 2. [`CopyTier::PartialMiddle`]: only the fastest axis is complete; one run
//!    per index of the slowest axis.
//! 3. [`CopyTier::Rectangular`]: one run per (slow, middle) index pair, each
//!    as long as the fastest-axis span.
//! 4. [`CopyTier::Discontinuous`]: any axis given as an index list; elements
//!    are copied one by one.
//!
//! For a column-major view the axes are (row, column, channel), fastest
//! first; for row-major they are (channel, column, row). The packed region
//! always uses the source view's element order.

use crate::error::{Error, Result};
use crate::tensor::{AddressSpec, Axis, ElementOrder, Region, Span, TensorView};

/// Which copy strategy a plan uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTier {
    FullExtent,
    PartialMiddle,
    Rectangular,
    Discontinuous,
}

/// A contiguous run: `len` elements at `tensor` in the tensor buffer and at
/// `packed` in the region buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub tensor: usize,
    pub packed: usize,
    pub len: usize,
}

/// Runs needed to move one region of one view.
#[derive(Debug, Clone)]
pub struct CopyPlan {
    source: TensorView,
    shape: TensorView,
    tier: CopyTier,
    runs: Vec<Run>,
}

impl CopyPlan {
    /// Resolves `spec` against `view` and plans the runs.
    pub fn new(view: &TensorView, spec: &AddressSpec) -> Result<Self> {
        let region = spec.resolve(view)?;
        let shape = region.shape(view.order())?;
        let (tier, runs) = match &region {
            Region::Block { rows, cols, channels } => plan_block(view, *rows, *cols, *channels),
            Region::Scattered { rows, cols, channels } => {
                (CopyTier::Discontinuous, plan_scattered(view, rows, cols, channels))
            }
        };
        Ok(CopyPlan { source: *view, shape, tier, runs })
    }

    pub fn tier(&self) -> CopyTier {
        self.tier
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// View the tensor buffer is addressed with.
    pub fn source(&self) -> &TensorView {
        &self.source
    }

    /// Shape of the packed region, in the source's element order.
    pub fn shape(&self) -> &TensorView {
        &self.shape
    }

    /// Number of elements in the region.
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Copies the region out of `tensor` into a new packed buffer.
    pub fn gather<T: Copy>(&self, tensor: &[T]) -> Result<Vec<T>> {
        self.source.check_len(tensor.len())?;
        let mut out = Vec::with_capacity(self.len());
        for run in &self.runs {
            out.extend_from_slice(&tensor[run.tensor..run.tensor + run.len]);
        }
        Ok(out)
    }

    /// Copies a packed buffer into the region of `tensor`.
    ///
    /// Nothing is written unless `packed` holds exactly the region's element
    /// count.
    pub fn scatter<T: Copy>(&self, tensor: &mut [T], packed: &[T]) -> Result<()> {
        self.source.check_len(tensor.len())?;
        if packed.len() != self.len() {
            return Err(Error::shape(format!(
                "region needs {} elements, input has {}",
                self.len(),
                packed.len()
            )));
        }
        for run in &self.runs {
            tensor[run.tensor..run.tensor + run.len].copy_from_slice(&packed[run.packed..run.packed + run.len]);
        }
        Ok(())
    }

    /// Like [`CopyPlan::scatter`], but the input carries its own shape which
    /// must equal the region's extents on every axis. Input in the other
    /// element order is reordered first.
    pub fn scatter_shaped<T: Copy>(&self, tensor: &mut [T], input: &[T], input_view: &TensorView) -> Result<()> {
        input_view.check_len(input.len())?;
        if !input_view.same_shape(&self.shape) {
            return Err(Error::shape(format!(
                "the input is {}x{}x{} but the region is {}x{}x{}",
                input_view.rows(),
                input_view.cols(),
                input_view.channels(),
                self.shape.rows(),
                self.shape.cols(),
                self.shape.channels()
            )));
        }
        if input_view.order() == self.shape.order() {
            self.scatter(tensor, input)
        } else {
            let reordered = reorder(input, input_view, self.shape.order())?;
            self.scatter(tensor, &reordered)
        }
    }
}

fn plan_block(view: &TensorView, rows: Span, cols: Span, channels: Span) -> (CopyTier, Vec<Run>) {
    let physical = view.physical();
    let span_of = |axis: Axis| match axis {
        Axis::Row => rows,
        Axis::Col => cols,
        _ => channels,
    };
    let fast = span_of(physical.axes[0]);
    let mid = span_of(physical.axes[1]);
    let slow = span_of(physical.axes[2]);
    let mid_stride = physical.mid_stride();
    let slow_stride = physical.slow_stride();

    if fast.covers(physical.extents[0]) && mid.covers(physical.extents[1]) {
        let run = Run { tensor: slow.start * slow_stride, packed: 0, len: slow_stride * slow.len };
        return (CopyTier::FullExtent, vec![run]);
    }

    if fast.covers(physical.extents[0]) {
        let len = mid_stride * mid.len;
        let runs = (slow.start..slow.end())
            .enumerate()
            .map(|(n, s)| Run { tensor: s * slow_stride + mid.start * mid_stride, packed: n * len, len })
            .collect();
        return (CopyTier::PartialMiddle, runs);
    }

    let mut runs = Vec::with_capacity(slow.len * mid.len);
    let mut packed = 0;
    for s in slow.start..slow.end() {
        for m in mid.start..mid.end() {
            runs.push(Run { tensor: s * slow_stride + m * mid_stride + fast.start, packed, len: fast.len });
            packed += fast.len;
        }
    }
    (CopyTier::Rectangular, runs)
}

fn plan_scattered(view: &TensorView, rows: &[usize], cols: &[usize], channels: &[usize]) -> Vec<Run> {
    let physical = view.physical();
    let list_of = |axis: Axis| match axis {
        Axis::Row => rows,
        Axis::Col => cols,
        _ => channels,
    };
    let fast = list_of(physical.axes[0]);
    let mid = list_of(physical.axes[1]);
    let slow = list_of(physical.axes[2]);
    let mid_stride = physical.mid_stride();
    let slow_stride = physical.slow_stride();

    let mut runs = Vec::with_capacity(fast.len() * mid.len() * slow.len());
    for &s in slow {
        for &m in mid {
            for &f in fast {
                let packed = runs.len();
                runs.push(Run { tensor: s * slow_stride + m * mid_stride + f, packed, len: 1 });
            }
        }
    }
    runs
}

/// Copies the region `spec` of `tensor` into a new packed buffer, returning
/// the packed buffer's shape alongside it.
pub fn gather<T: Copy>(tensor: &[T], view: &TensorView, spec: &AddressSpec) -> Result<(TensorView, Vec<T>)> {
    let plan = CopyPlan::new(view, spec)?;
    let out = plan.gather(tensor)?;
    Ok((*plan.shape(), out))
}

/// Writes a packed buffer into the region `spec` of `tensor`.
pub fn scatter<T: Copy>(tensor: &mut [T], view: &TensorView, spec: &AddressSpec, packed: &[T]) -> Result<()> {
    CopyPlan::new(view, spec)?.scatter(tensor, packed)
}

/// Rewrites a buffer laid out as `view` into `order`.
pub fn reorder<T: Copy>(data: &[T], view: &TensorView, order: ElementOrder) -> Result<Vec<T>> {
    view.check_len(data.len())?;
    if view.order() == order {
        return Ok(data.to_vec());
    }
    let target = view.with_order(order);
    let mut out = Vec::with_capacity(data.len());
    let (rows, cols, channels) = target.dims();
    match order {
        ElementOrder::ColumnMajor => {
            for k in 0..channels {
                for j in 0..cols {
                    for i in 0..rows {
                        out.push(data[view.offset(i, j, k)]);
                    }
                }
            }
        }
        ElementOrder::RowMajor => {
            for i in 0..rows {
                for j in 0..cols {
                    for k in 0..channels {
                        out.push(data[view.offset(i, j, k)]);
                    }
                }
            }
        }
    }
    Ok(out)
}
