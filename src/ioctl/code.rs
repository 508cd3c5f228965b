/// Control codes understood by the CPCI429 card.
use bitfield::bitfield;

use crate::err::RequestError;

pub const FILE_DEVICE_UNKNOWN: u32 = 0x22;
pub const METHOD_BUFFERED: u32 = 0;
pub const FILE_ANY_ACCESS: u32 = 0;

/// Builds a control code the way the platform `CTL_CODE` macro does.
pub const fn ctl_code(device_type: u32, function: u32, method: u32, access: u32) -> u32 {
    (device_type << 16) | (access << 14) | (function << 2) | method
}

// Function numbers below 0x800 are reserved for the platform.
pub const CPCI429_IOCTL_IN_BUFFERED: u32 =
    ctl_code(FILE_DEVICE_UNKNOWN, 0x800, METHOD_BUFFERED, FILE_ANY_ACCESS);
pub const CPCI429_IOCTL_OUT_BUFFERED: u32 =
    ctl_code(FILE_DEVICE_UNKNOWN, 0x801, METHOD_BUFFERED, FILE_ANY_ACCESS);
pub const CPCI429_IOCTL_READ_PADDRESS: u32 =
    ctl_code(FILE_DEVICE_UNKNOWN, 0x802, METHOD_BUFFERED, FILE_ANY_ACCESS);
pub const CPCI429_IOCTL_WRITE_OFFSETADDRESS: u32 =
    ctl_code(FILE_DEVICE_UNKNOWN, 0x803, METHOD_BUFFERED, FILE_ANY_ACCESS);

bitfield! {
    /// Device I/O control code
    ///
    /// Demultiplexing key of every control request.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ControlCode(u32);

    /// Bits [31:16] - Device type
    pub device_type, set_device_type: 31, 16;

    /// Bits [15:14] - Required access
    pub access, set_access: 15, 14;

    /// Bits [13:2] - Function
    pub function, set_function: 13, 2;

    /// Bits [1:0] - Transfer method
    pub method, set_method: 1, 0;
}

impl ControlCode {
    /// Create ControlCode from raw u32 value
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Get raw u32 value
    pub const fn raw(&self) -> u32 {
        self.0
    }

    pub fn is_buffered(&self) -> bool {
        self.method() == METHOD_BUFFERED
    }
}

impl From<u32> for ControlCode {
    fn from(value: u32) -> Self {
        Self::from_raw(value)
    }
}

/// Operations the dispatcher recognizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Write a 32-bit value at the caller's offset
    WriteRegister,
    /// Read a 32-bit value at the caller's offset
    ReadRegister,
    /// Report the card's physical base address
    ReadPhysicalAddress,
    /// Replace the caller's offset
    SetOffset,
}

impl Operation {
    pub const fn code(&self) -> u32 {
        match self {
            Operation::WriteRegister => CPCI429_IOCTL_IN_BUFFERED,
            Operation::ReadRegister => CPCI429_IOCTL_OUT_BUFFERED,
            Operation::ReadPhysicalAddress => CPCI429_IOCTL_READ_PADDRESS,
            Operation::SetOffset => CPCI429_IOCTL_WRITE_OFFSETADDRESS,
        }
    }
}

impl TryFrom<ControlCode> for Operation {
    type Error = RequestError;

    fn try_from(code: ControlCode) -> Result<Self, Self::Error> {
        match code.raw() {
            CPCI429_IOCTL_IN_BUFFERED => Ok(Operation::WriteRegister),
            CPCI429_IOCTL_OUT_BUFFERED => Ok(Operation::ReadRegister),
            CPCI429_IOCTL_READ_PADDRESS => Ok(Operation::ReadPhysicalAddress),
            CPCI429_IOCTL_WRITE_OFFSETADDRESS => Ok(Operation::SetOffset),
            raw => Err(RequestError::UnsupportedOperation(raw)),
        }
    }
}
