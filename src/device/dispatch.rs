use crate::device::context::DeviceContext;
use crate::device::request::{
    Completion, IoRequest, check_output_u32, retrieve_input_u32, store_output_u32,
};
use crate::err::{RequestError, WindowError};
use crate::ioctl::Operation;
use crate::mems::{REGISTER_WIDTH, check_bounds};

/// Entry point the queue calls for every device control request.
///
/// Implementors get exclusive access to their state for the duration of
/// one call and must complete the request exactly once, through the
/// returned [`Completion`].
pub trait IoDeviceControl {
    fn device_control(&mut self, request: &mut IoRequest<'_>) -> Completion;
}

impl IoDeviceControl for DeviceContext {
    fn device_control(&mut self, request: &mut IoRequest<'_>) -> Completion {
        let code = request.code();
        log::debug!(
            "device control {:#010x} (function {:#x}), input {} bytes, output {} bytes",
            code.raw(),
            code.function(),
            request.input_len(),
            request.output_len()
        );

        let result = Operation::try_from(code).and_then(|op| self.perform(op, request));
        if let Err(err) = &result {
            log::warn!("request {:#010x} failed: {err}", code.raw());
        }
        Completion::from(result)
    }
}

impl DeviceContext {
    fn perform(
        &mut self,
        operation: Operation,
        request: &mut IoRequest<'_>,
    ) -> Result<usize, RequestError> {
        match operation {
            Operation::SetOffset => {
                let offset = retrieve_input_u32(request)?;
                let length = self.window_len()?;
                let layout = self.layout();
                // Both paths must stay inside the window at the new offset.
                check_register(layout.write_base, offset, length)?;
                check_register(layout.read_base, offset, length)?;
                self.set_offset(offset);
                log::debug!("offset set to {offset:#x}");
                Ok(REGISTER_WIDTH)
            }
            Operation::WriteRegister => {
                let value = retrieve_input_u32(request)?;
                let address = self.register_address(self.layout().write_base)?;
                self.window_mut()
                    .ok_or(RequestError::MappingUnavailable)?
                    .write_u32(address, value)?;
                log::debug!("wrote {value:#010x} at window offset {address:#x}");
                Ok(REGISTER_WIDTH)
            }
            Operation::ReadRegister => {
                check_output_u32(request)?;
                let address = self.register_address(self.layout().read_base)?;
                let value = self
                    .window()
                    .ok_or(RequestError::MappingUnavailable)?
                    .read_u32(address)?;
                log::debug!("read {value:#010x} at window offset {address:#x}");
                Ok(store_output_u32(request, value)?)
            }
            Operation::ReadPhysicalAddress => {
                Ok(store_output_u32(request, self.physical_address())?)
            }
        }
    }

    fn window_len(&self) -> Result<usize, RequestError> {
        self.window()
            .map(|window| window.len())
            .ok_or(RequestError::MappingUnavailable)
    }

    /// Window offset of the register selected by `base` and the caller's offset.
    fn register_address(&self, base: u32) -> Result<usize, RequestError> {
        let length = self.window_len()?;
        Ok(check_register(base, self.offset(), length)?)
    }
}

fn check_register(base: u32, offset: u32, length: usize) -> Result<usize, WindowError> {
    let address = (base as usize)
        .checked_add(offset as usize)
        .ok_or_else(|| WindowError::out_of_bounds(offset as usize, REGISTER_WIDTH, length))?;
    check_bounds(address, REGISTER_WIDTH, length)?;
    Ok(address)
}
