//! Re-export public algorithms.

pub mod builder;
pub mod search;
pub mod solver;
pub mod stepper;

pub use builder::build_surface_graph;
pub use search::{find_path, find_path_to_node, find_path_to_position};
pub use stepper::step_towards;
