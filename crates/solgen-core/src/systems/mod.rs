//! Systems - logic that operates on components

mod gravity;
mod integration;

pub use gravity::*;
pub use integration::*;
