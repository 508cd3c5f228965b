pub mod device;
pub mod driver;
pub mod resources;

pub use device::*;
pub use driver::*;
pub use resources::*;
