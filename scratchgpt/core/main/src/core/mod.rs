pub mod functional;
pub mod tensor;
