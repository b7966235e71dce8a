//! Conversions between [`Matkc`](crate::matkc::Matkc) and native numeric
//! containers.
//!
//! Every conversion is a full copy. Sources are read in their logical
//! (row, column, channel) order, so memory layout and strides of the source
//! do not matter. Channel counts are checked, never coerced.

#[cfg(feature = "image")]
mod image;
#[cfg(feature = "ndarray")]
mod ndarray;

/// Value scaling applied when pixel data crosses the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    /// Values are copied unchanged.
    #[default]
    Identity,
    /// 8-bit samples map to `[0, 1]`: divided by 255 on import, multiplied
    /// by 255 and rounded on export.
    Unit255,
}

impl Scale {
    /// Applied to every sample coming into a matrix.
    pub fn import(self, value: f64) -> f64 {
        match self {
            Scale::Identity => value,
            Scale::Unit255 => value / 255.0,
        }
    }

    /// Applied to every matrix element going out.
    pub fn export(self, value: f64) -> f64 {
        match self {
            Scale::Identity => value,
            Scale::Unit255 => (value * 255.0).round(),
        }
    }
}
