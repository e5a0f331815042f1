#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `imalgebra-tensor` provides a small owned tensor type with compile-time
//! dimensionality. Data is stored contiguously in row-major order, the last
//! axis varying fastest.
//!
//! ```rust
//! use imalgebra_tensor::Tensor2;
//!
//! let t = Tensor2::from_shape_vec([2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
//! assert_eq!(t.get([1, 2]), Some(&6));
//! assert_eq!(t.strides, [3, 1]);
//! ```

/// Tensor module containing the main tensor implementation and error types.
pub mod tensor;

pub use crate::tensor::{get_strides_from_shape, Tensor, TensorError};

/// Type alias for a 1-dimensional tensor.
pub type Tensor1<T> = Tensor<T, 1>;

/// Type alias for a 2-dimensional tensor.
pub type Tensor2<T> = Tensor<T, 2>;

/// Type alias for a 3-dimensional tensor.
pub type Tensor3<T> = Tensor<T, 3>;

/// Type alias for a 5-dimensional tensor, the storage of pixel arrays.
pub type Tensor5<T> = Tensor<T, 5>;
