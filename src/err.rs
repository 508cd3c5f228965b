use thiserror::Error;

use crate::ioctl::NtStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error(
        "Out of bounds access: offset 0x{offset:x} (size: {size}) exceeds window of 0x{length:x} bytes"
    )]
    OutOfBounds {
        offset: usize,
        size: usize,
        length: usize,
    },

    #[error("Invalid alignment: offset 0x{offset:x} not aligned for {size}-byte access")]
    InvalidAlignment { offset: usize, size: usize },

    #[error("Invalid size: {size} bytes is invalid for a register window")]
    InvalidSize { size: usize },
}

impl WindowError {
    pub fn out_of_bounds(offset: usize, size: usize, length: usize) -> Self {
        Self::OutOfBounds {
            offset,
            size,
            length,
        }
    }

    pub fn invalid_alignment(offset: usize, size: usize) -> Self {
        Self::InvalidAlignment { offset, size }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Buffer too small: {required} bytes required, caller declared {declared}")]
    TooSmall { required: usize, declared: usize },
}

/// Failure of a single control request. Never outlives the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Invalid buffer: {0}")]
    InvalidBuffer(#[from] BufferError),

    #[error("Unsupported control code 0x{0:08x}")]
    UnsupportedOperation(u32),

    #[error("Register window is not mapped")]
    MappingUnavailable,

    #[error("Invalid register offset: {0}")]
    InvalidOffset(#[from] WindowError),

    #[error("Device is not in the working power state")]
    NotPowered,
}

impl From<&RequestError> for NtStatus {
    fn from(err: &RequestError) -> Self {
        match err {
            RequestError::InvalidBuffer(_) => NtStatus::BUFFER_TOO_SMALL,
            RequestError::UnsupportedOperation(_) => NtStatus::INVALID_DEVICE_REQUEST,
            RequestError::MappingUnavailable | RequestError::NotPowered => {
                NtStatus::DEVICE_NOT_READY
            }
            RequestError::InvalidOffset(_) => NtStatus::INVALID_PARAMETER,
        }
    }
}

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Unknown device id {0}")]
    UnknownDevice(u32),

    #[error("No memory resource in the translated resource list")]
    MissingMemoryResource,

    #[error("Hardware already prepared for device {0}")]
    AlreadyPrepared(u32),

    #[error("Hardware not prepared for device {0}")]
    NotPrepared(u32),

    #[error("Invalid power transition from {from:?} to {to:?}")]
    InvalidPowerTransition {
        from: crate::host::PowerState,
        to: crate::host::PowerState,
    },

    #[error("Device {0} lock poisoned by a panicking request")]
    DeviceLockPoisoned(u32),

    #[error("Window error: {0}")]
    Window(#[from] WindowError),
}

impl From<&DriverError> for NtStatus {
    fn from(err: &DriverError) -> Self {
        match err {
            DriverError::MissingMemoryResource => NtStatus::DEVICE_CONFIGURATION_ERROR,
            DriverError::UnknownDevice(_) | DriverError::Window(_) => NtStatus::INVALID_PARAMETER,
            DriverError::AlreadyPrepared(_)
            | DriverError::NotPrepared(_)
            | DriverError::InvalidPowerTransition { .. }
            | DriverError::DeviceLockPoisoned(_) => NtStatus::DEVICE_NOT_READY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_error_message() {
        let err = WindowError::out_of_bounds(0xffe, 4, 0x1000);
        assert!(err.to_string().contains("0xffe"));
        assert!(err.to_string().contains("size: 4"));
        assert!(err.to_string().contains("0x1000"));
    }

    #[test]
    fn test_request_error_status() {
        let err: RequestError = BufferError::TooSmall {
            required: 4,
            declared: 2,
        }
        .into();
        assert_eq!(NtStatus::from(&err), NtStatus::BUFFER_TOO_SMALL);

        let err = RequestError::UnsupportedOperation(0x999);
        assert_eq!(NtStatus::from(&err), NtStatus::INVALID_DEVICE_REQUEST);
        assert!(err.to_string().contains("0x00000999"));

        let err: RequestError = WindowError::invalid_alignment(0x2, 4).into();
        assert_eq!(NtStatus::from(&err), NtStatus::INVALID_PARAMETER);

        assert_eq!(
            NtStatus::from(&RequestError::MappingUnavailable),
            NtStatus::DEVICE_NOT_READY
        );
    }

    #[test]
    fn test_driver_error_status() {
        assert_eq!(
            NtStatus::from(&DriverError::MissingMemoryResource),
            NtStatus::DEVICE_CONFIGURATION_ERROR
        );
        assert_eq!(
            NtStatus::from(&DriverError::UnknownDevice(3)),
            NtStatus::INVALID_PARAMETER
        );
        assert_eq!(
            NtStatus::from(&DriverError::Window(WindowError::InvalidSize { size: 0 })),
            NtStatus::INVALID_PARAMETER
        );
        for err in [
            DriverError::AlreadyPrepared(1),
            DriverError::NotPrepared(1),
            DriverError::InvalidPowerTransition {
                from: crate::host::PowerState::D3,
                to: crate::host::PowerState::D3,
            },
            DriverError::DeviceLockPoisoned(1),
        ] {
            assert_eq!(NtStatus::from(&err), NtStatus::DEVICE_NOT_READY, "{err}");
        }
    }
}
