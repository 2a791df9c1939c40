//! Ideal functionalities.

pub mod cot;
pub mod mpcot;
