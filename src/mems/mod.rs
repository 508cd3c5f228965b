pub mod mmio;
pub mod window;

pub use mmio::*;
pub use window::*;
