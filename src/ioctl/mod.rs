pub mod code;
pub mod status;

pub use code::*;
pub use status::*;

/// Interface class callers open to reach a CPCI429 card.
/// {dd01f255-19ac-4e7e-ae35-156ba04ac4e6}
pub const GUID_DEVINTERFACE_CPCI429: &str = "{dd01f255-19ac-4e7e-ae35-156ba04ac4e6}";
