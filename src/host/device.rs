//! Lifecycle of one CPCI429 card as driven by the host.
//!
//! The host brackets the card's working life with four events:
//! prepare-hardware, D0 entry, D0 exit and release-hardware. Control
//! requests reach the dispatcher only between D0 entry and D0 exit.

use crate::config::WindowLayout;
use crate::device::{Completion, DeviceContext, IoDeviceControl, IoRequest};
use crate::err::{DriverError, RequestError};
use crate::host::resources::{CmResource, RegisterMapper};

pub type DeviceId = u32;

/// Device power states the driver distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerState {
    /// Working state
    D0,
    /// Low power; registers not accessible
    D3,
}

#[derive(Debug)]
pub struct Cpci429Device {
    id: DeviceId,
    context: DeviceContext,
    power: PowerState,
}

impl Cpci429Device {
    pub fn new(id: DeviceId, layout: WindowLayout) -> Self {
        Self {
            id,
            context: DeviceContext::new(layout),
            power: PowerState::D3,
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn context(&self) -> &DeviceContext {
        &self.context
    }

    pub fn power_state(&self) -> PowerState {
        self.power
    }

    /// Maps the card's register BAR.
    ///
    /// The window comes from the first memory resource of the translated
    /// list. The address reported to callers is the low 32 bits of the
    /// matching raw resource.
    pub fn prepare_hardware(
        &mut self,
        raw: &[CmResource],
        translated: &[CmResource],
        mapper: &mut dyn RegisterMapper,
    ) -> Result<(), DriverError> {
        if self.context.is_mapped() {
            return Err(DriverError::AlreadyPrepared(self.id));
        }

        for resource in translated {
            if let CmResource::Interrupt { level, vector, .. } = resource {
                log::debug!("device {}: ignoring interrupt level {level} vector {vector}", self.id);
            }
        }

        let (index, (start, length)) = translated
            .iter()
            .enumerate()
            .find_map(|(i, resource)| resource.as_memory().map(|memory| (i, memory)))
            .ok_or(DriverError::MissingMemoryResource)?;

        let physical = raw
            .get(index)
            .and_then(CmResource::as_memory)
            .map_or(start, |(raw_start, _)| raw_start);

        let window = mapper.map(start, length as usize)?;
        self.context.map_window(window, physical as u32);

        log::info!(
            "device {}: mapped {length:#x} bytes at {start:#x} (physical {:#010x})",
            self.id,
            physical as u32
        );
        Ok(())
    }

    pub fn release_hardware(&mut self) -> Result<(), DriverError> {
        if self.power == PowerState::D0 {
            return Err(DriverError::InvalidPowerTransition {
                from: PowerState::D0,
                to: PowerState::D3,
            });
        }
        if !self.context.unmap_window() {
            return Err(DriverError::NotPrepared(self.id));
        }
        log::info!("device {}: register window released", self.id);
        Ok(())
    }

    pub fn d0_entry(&mut self, previous: PowerState) -> Result<(), DriverError> {
        if self.power == PowerState::D0 {
            return Err(DriverError::InvalidPowerTransition {
                from: self.power,
                to: PowerState::D0,
            });
        }
        if !self.context.is_mapped() {
            return Err(DriverError::NotPrepared(self.id));
        }
        self.power = PowerState::D0;
        log::info!("device {}: entered D0 from {previous:?}", self.id);
        Ok(())
    }

    pub fn d0_exit(&mut self, target: PowerState) -> Result<(), DriverError> {
        if self.power != PowerState::D0 || target == PowerState::D0 {
            return Err(DriverError::InvalidPowerTransition {
                from: self.power,
                to: target,
            });
        }
        // Requests complete synchronously under the device lock, so none is
        // in flight here; stopping the queue needs no acknowledgement.
        self.power = target;
        log::info!("device {}: left D0 for {target:?}", self.id);
        Ok(())
    }
}

impl IoDeviceControl for Cpci429Device {
    fn device_control(&mut self, request: &mut IoRequest<'_>) -> Completion {
        if self.power != PowerState::D0 {
            log::warn!(
                "device {}: request {:#010x} while in {:?}",
                self.id,
                request.code().raw(),
                self.power
            );
            return Completion::from(Err(RequestError::NotPowered));
        }
        self.context.device_control(request)
    }
}
