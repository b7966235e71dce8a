use super::Scale;
use crate::env::JniEnv;
use crate::error::{Error, Result};
use crate::matkc::Matkc;
use crate::tensor::ElementOrder;
use ::ndarray::{Array2, Array3, ArrayBase, ArrayD, ArrayViewD, Data, Ix2, Ix3, IxDyn};
use num_traits::AsPrimitive;

impl<'env> Matkc<'env> {
    /// Copies a 2-D array into a new single-channel matrix.
    pub fn from_array2<S, T>(env: &'env JniEnv, array: &ArrayBase<S, Ix2>) -> Result<Self>
    where
        S: Data<Elem = T>,
        T: AsPrimitive<f64>,
    {
        let (rows, cols) = array.dim();
        let values: Vec<f64> = array.iter().map(|v| v.as_()).collect();
        Matkc::from_slice(env, &values, rows, cols, 1, ElementOrder::RowMajor)
    }

    /// Copies a `(rows, cols, channels)` array into a new matrix.
    pub fn from_array3<S, T>(env: &'env JniEnv, array: &ArrayBase<S, Ix3>) -> Result<Self>
    where
        S: Data<Elem = T>,
        T: AsPrimitive<f64>,
    {
        let (rows, cols, channels) = array.dim();
        let values: Vec<f64> = array.iter().map(|v| v.as_()).collect();
        Matkc::from_slice(env, &values, rows, cols, channels, ElementOrder::RowMajor)
    }

    /// Copies a single-channel matrix out as a 2-D array.
    pub fn to_array2(&self) -> Result<Array2<f64>> {
        if self.channels() != 1 {
            return Err(Error::ChannelMismatch { expected: 1, found: self.channels() });
        }
        let data = self.to_vec::<f64>(ElementOrder::RowMajor)?;
        Array2::from_shape_vec((self.rows(), self.cols()), data).map_err(|e| Error::shape(e.to_string()))
    }

    pub fn to_array3(&self) -> Result<Array3<f64>> {
        let data = self.to_vec::<f64>(ElementOrder::RowMajor)?;
        Array3::from_shape_vec((self.rows(), self.cols(), self.channels()), data)
            .map_err(|e| Error::shape(e.to_string()))
    }

    /// Copies pixel data into a new matrix.
    ///
    /// `pixels` is either `(height, width)` with `channels == 1` or
    /// `(height, width, channels)`. Every sample goes through `scale`.
    pub fn from_pixels<T>(env: &'env JniEnv, pixels: ArrayViewD<'_, T>, channels: usize, scale: Scale) -> Result<Self>
    where
        T: AsPrimitive<f64>,
    {
        let shape = pixels.shape();
        let (rows, cols, found) = match *shape {
            [rows, cols] => (rows, cols, 1),
            [rows, cols, found] => (rows, cols, found),
            _ => return Err(Error::UnsupportedRank(shape.len())),
        };
        if found != channels {
            return Err(Error::ChannelMismatch { expected: channels, found });
        }
        let values: Vec<f64> = pixels.iter().map(|v| scale.import(v.as_())).collect();
        Matkc::from_slice(env, &values, rows, cols, channels, ElementOrder::RowMajor)
    }

    /// Copies the matrix out as pixel data: `(height, width)` for one channel,
    /// `(height, width, channels)` otherwise.
    pub fn to_pixels(&self, channels: usize, scale: Scale) -> Result<ArrayD<f64>> {
        if self.channels() != channels {
            return Err(Error::ChannelMismatch { expected: channels, found: self.channels() });
        }
        let data: Vec<f64> = self
            .to_vec::<f64>(ElementOrder::RowMajor)?
            .into_iter()
            .map(|v| scale.export(v))
            .collect();
        let shape = if channels == 1 {
            IxDyn(&[self.rows(), self.cols()])
        } else {
            IxDyn(&[self.rows(), self.cols(), channels])
        };
        ArrayD::from_shape_vec(shape, data).map_err(|e| Error::shape(e.to_string()))
    }
}
