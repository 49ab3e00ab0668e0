pub mod transform;
pub mod types;

pub use transform::*;
pub use types::*;
