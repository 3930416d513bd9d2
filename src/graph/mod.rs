//! The workflow graph model: typed nodes, tagged edges and the
//! adjacency-indexed graph structure the validation and routing engines
//! operate on.

pub mod edge;
pub mod model;
pub mod node;

pub use edge::*;
pub use model::*;
pub use node::*;
