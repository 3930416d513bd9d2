//! Template lifecycle: importing externally authored graphs and freezing
//! validated graphs into immutable, serializable template artifacts.

pub mod artifact;
pub mod conversion;

pub use artifact::*;
pub use conversion::*;
