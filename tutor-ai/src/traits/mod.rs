pub mod annotation;
pub mod generation;
