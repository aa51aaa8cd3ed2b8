//! Geometry helpers and the fixed numbers of the flight model.

pub use self::{arena::*, geometry::*};

mod arena;
pub mod constants;
mod geometry;
