pub mod generator;
pub mod gpt;
pub mod sampling;
pub mod weight_map;
