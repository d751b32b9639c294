//! Element trait for mapping Rust types to DType

use super::{Complex64, Complex128, DType};
use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;

/// Trait for types that can be stored in a `Buffer`
///
/// # Bounds
/// - `Pod + Zeroable` - byte-level staging to and from device memory
/// - `Send + Sync + 'static` - buffers are shared with queue workers
pub trait Element: Copy + Debug + PartialEq + Send + Sync + Pod + Zeroable + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;
}

impl Element for i32 {
    const DTYPE: DType = DType::I32;
}

impl Element for i64 {
    const DTYPE: DType = DType::I64;
}

impl Element for Complex64 {
    const DTYPE: DType = DType::Complex64;
}

impl Element for Complex128 {
    const DTYPE: DType = DType::Complex128;
}
