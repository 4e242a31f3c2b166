//! Geometry utilities for surface-nav.
//!
//! Plain `[f64; 3]` vector math, triangle/segment value types, reference frames
//! and the intersection/closest-point primitives the graph, search and stepper
//! code build on.

pub mod frame;
pub mod intersection;
pub mod primitives;
pub mod vector;

pub use frame::{AffineFrame, Identity, ReferenceFrame};
pub use primitives::{Segment, Triangle};
pub use vector::Vec3;
