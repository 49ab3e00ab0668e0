pub mod components;
pub mod renderer;
pub mod renders;
pub mod state;
pub mod traits;

pub use components::*;
pub use renderer::*;
pub use renders::*;
pub use traits::*;
