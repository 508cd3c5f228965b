pub mod config;
pub mod device;
pub mod err;
pub mod host;
pub mod ioctl;
pub mod mems;

pub use config::*;
pub use device::*;
pub use err::*;
pub use host::*;
pub use ioctl::*;
pub use mems::*;
