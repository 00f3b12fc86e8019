mod ops;
mod tensor;
mod views;

pub use tensor::Tensor;
