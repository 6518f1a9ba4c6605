pub mod animation_loop;
pub mod frame;
pub mod generation;
pub mod script;

pub use animation_loop::*;
pub use frame::*;
pub use generation::*;
pub use script::*;
