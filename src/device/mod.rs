pub mod context;
pub mod dispatch;
pub mod request;

pub use context::*;
pub use dispatch::*;
pub use request::*;
