/// NTSTATUS completion values
use bitfield::bitfield;
use std::fmt;

bitfield! {
    /// Completion status of a control request, laid out as an NTSTATUS.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NtStatus(u32);

    /// Bits [31:30] - Severity (0 success, 1 informational, 2 warning, 3 error)
    pub severity, set_severity: 31, 30;

    /// Bit [29] - Customer code flag
    pub customer, set_customer: 29;

    /// Bits [27:16] - Facility
    pub facility, set_facility: 27, 16;

    /// Bits [15:0] - Code
    pub code, set_code: 15, 0;
}

impl NtStatus {
    pub const SUCCESS: NtStatus = NtStatus(0x0000_0000);
    pub const INVALID_PARAMETER: NtStatus = NtStatus(0xC000_000D);
    pub const INVALID_DEVICE_REQUEST: NtStatus = NtStatus(0xC000_0010);
    pub const BUFFER_TOO_SMALL: NtStatus = NtStatus(0xC000_0023);
    pub const DEVICE_NOT_READY: NtStatus = NtStatus(0xC000_00A3);
    pub const DEVICE_CONFIGURATION_ERROR: NtStatus = NtStatus(0xC000_0182);

    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Success and informational values count as success.
    pub const fn is_success(&self) -> bool {
        (self.0 as i32) >= 0
    }

    fn name(&self) -> Option<&'static str> {
        match *self {
            Self::SUCCESS => Some("STATUS_SUCCESS"),
            Self::INVALID_PARAMETER => Some("STATUS_INVALID_PARAMETER"),
            Self::INVALID_DEVICE_REQUEST => Some("STATUS_INVALID_DEVICE_REQUEST"),
            Self::BUFFER_TOO_SMALL => Some("STATUS_BUFFER_TOO_SMALL"),
            Self::DEVICE_NOT_READY => Some("STATUS_DEVICE_NOT_READY"),
            Self::DEVICE_CONFIGURATION_ERROR => Some("STATUS_DEVICE_CONFIGURATION_ERROR"),
            _ => None,
        }
    }
}

impl Default for NtStatus {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl fmt::Display for NtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} (0x{:08X})", self.0),
            None => write!(f, "0x{:08X}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_check() {
        assert!(NtStatus::SUCCESS.is_success());
        assert!(!NtStatus::BUFFER_TOO_SMALL.is_success());
        assert!(!NtStatus::INVALID_DEVICE_REQUEST.is_success());
        // informational
        assert!(NtStatus::from_raw(0x4000_0000).is_success());
    }

    #[test]
    fn test_fields() {
        let status = NtStatus::DEVICE_NOT_READY;
        assert_eq!(status.severity(), 3);
        assert!(!status.customer());
        assert_eq!(status.facility(), 0);
        assert_eq!(status.code(), 0xA3);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            NtStatus::BUFFER_TOO_SMALL.to_string(),
            "STATUS_BUFFER_TOO_SMALL (0xC0000023)"
        );
        assert_eq!(NtStatus::from_raw(0xC000_0001).to_string(), "0xC0000001");
    }
}
