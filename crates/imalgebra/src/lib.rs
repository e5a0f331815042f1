#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use imalgebra_tensor as tensor;

#[doc(inline)]
pub use imalgebra_image as image;

#[doc(inline)]
pub use imalgebra_imgproc as imgproc;
