use crate::err::{BufferError, RequestError};
use crate::ioctl::{ControlCode, NtStatus};

/// A control request as delivered by the queue.
///
/// The declared buffer lengths are the lengths of the slices; the dispatcher
/// never looks past them.
#[derive(Debug)]
pub struct IoRequest<'a> {
    code: ControlCode,
    input: &'a [u8],
    output: &'a mut [u8],
}

impl<'a> IoRequest<'a> {
    pub fn new(code: impl Into<ControlCode>, input: &'a [u8], output: &'a mut [u8]) -> Self {
        Self {
            code: code.into(),
            input,
            output,
        }
    }

    pub fn code(&self) -> ControlCode {
        self.code
    }

    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    pub fn output_len(&self) -> usize {
        self.output.len()
    }
}

/// Returns exactly `required` bytes of the input buffer.
pub fn retrieve_input<'r>(
    request: &'r IoRequest<'_>,
    required: usize,
) -> Result<&'r [u8], BufferError> {
    request
        .input
        .get(..required)
        .ok_or(BufferError::TooSmall {
            required,
            declared: request.input.len(),
        })
}

/// Returns exactly `required` bytes of the output buffer.
pub fn retrieve_output<'r>(
    request: &'r mut IoRequest<'_>,
    required: usize,
) -> Result<&'r mut [u8], BufferError> {
    let declared = request.output.len();
    request
        .output
        .get_mut(..required)
        .ok_or(BufferError::TooSmall { required, declared })
}

pub fn retrieve_input_u32(request: &IoRequest<'_>) -> Result<u32, BufferError> {
    let bytes = retrieve_input(request, size_of::<u32>())?;
    let mut value = [0u8; 4];
    value.copy_from_slice(bytes);
    Ok(u32::from_le_bytes(value))
}

/// Checks the output buffer without writing to it.
pub fn check_output_u32(request: &mut IoRequest<'_>) -> Result<(), BufferError> {
    retrieve_output(request, size_of::<u32>()).map(|_| ())
}

pub fn store_output_u32(request: &mut IoRequest<'_>, value: u32) -> Result<usize, BufferError> {
    let bytes = retrieve_output(request, size_of::<u32>())?;
    bytes.copy_from_slice(&value.to_le_bytes());
    Ok(size_of::<u32>())
}

/// Outcome of one control request. A request is completed exactly once, with
/// one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Success { information: usize },
    Failure { status: NtStatus },
}

impl Completion {
    pub fn status(&self) -> NtStatus {
        match self {
            Completion::Success { .. } => NtStatus::SUCCESS,
            Completion::Failure { status } => *status,
        }
    }

    /// Bytes transferred; always 0 on failure.
    pub fn information(&self) -> usize {
        match self {
            Completion::Success { information } => *information,
            Completion::Failure { .. } => 0,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Completion::Success { .. })
    }
}

impl From<Result<usize, RequestError>> for Completion {
    fn from(result: Result<usize, RequestError>) -> Self {
        match result {
            Ok(information) => Completion::Success { information },
            Err(err) => Completion::Failure {
                status: NtStatus::from(&err),
            },
        }
    }
}
