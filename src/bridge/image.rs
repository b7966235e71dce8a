use super::Scale;
use crate::env::JniEnv;
use crate::error::{Error, Result};
use crate::matkc::Matkc;
use crate::tensor::ElementOrder;
use ::image::{ImageBuffer, Pixel};
use num_traits::AsPrimitive;
use std::ops::Deref;

impl<'env> Matkc<'env> {
    /// Copies an image into a new `height x width x channels` matrix.
    ///
    /// `channels` is the count the caller expects; it must equal the pixel
    /// type's channel count.
    pub fn from_image<P, C>(
        env: &'env JniEnv,
        image: &ImageBuffer<P, C>,
        channels: usize,
        scale: Scale,
    ) -> Result<Self>
    where
        P: Pixel,
        P::Subpixel: AsPrimitive<f64> + 'static,
        C: Deref<Target = [P::Subpixel]>,
    {
        let found = usize::from(P::CHANNEL_COUNT);
        if found != channels {
            return Err(Error::ChannelMismatch { expected: channels, found });
        }
        let (width, height) = image.dimensions();
        let samples: &[P::Subpixel] = image;
        let values: Vec<f64> = samples.iter().map(|v| scale.import(v.as_())).collect();
        Matkc::from_slice(env, &values, height as usize, width as usize, channels, ElementOrder::RowMajor)
    }

    /// Copies the matrix out as an image with pixel type `P`. Samples
    /// outside the subpixel range saturate.
    pub fn to_image<P>(&self, scale: Scale) -> Result<ImageBuffer<P, Vec<P::Subpixel>>>
    where
        P: Pixel,
        P::Subpixel: 'static,
        f64: AsPrimitive<P::Subpixel>,
    {
        let expected = usize::from(P::CHANNEL_COUNT);
        if self.channels() != expected {
            return Err(Error::ChannelMismatch { expected, found: self.channels() });
        }
        let width = u32::try_from(self.cols()).map_err(|_| Error::shape("image width overflows u32"))?;
        let height = u32::try_from(self.rows()).map_err(|_| Error::shape("image height overflows u32"))?;
        let samples: Vec<P::Subpixel> = self
            .to_vec::<f64>(ElementOrder::RowMajor)?
            .into_iter()
            .map(|v| scale.export(v).as_())
            .collect();
        ImageBuffer::from_raw(width, height, samples).ok_or_else(|| Error::shape("image buffer is too small"))
    }
}
