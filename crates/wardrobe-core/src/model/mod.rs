mod item;
mod outfit;
mod recommendation;

pub use item::*;
pub use outfit::*;
pub use recommendation::*;
