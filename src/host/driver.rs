use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::DriverConfig;
use crate::device::{Completion, IoDeviceControl, IoRequest};
use crate::err::DriverError;
use crate::host::device::{Cpci429Device, DeviceId};
use crate::ioctl::GUID_DEVINTERFACE_CPCI429;

/// A registered device interface, the handle callers use to find a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInterface {
    pub guid: &'static str,
    pub device: DeviceId,
    pub symbolic_link: String,
}

/// Owns every attached card and routes requests to them.
///
/// Each card sits behind its own lock: requests to one card run one at a
/// time, requests to different cards may run in parallel.
#[derive(Default)]
pub struct Driver {
    config: DriverConfig,
    devices: BTreeMap<DeviceId, Arc<Mutex<Cpci429Device>>>,
    interfaces: Vec<DeviceInterface>,
    next_id: DeviceId,
}

impl Driver {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Creates the state for a newly found card and publishes its interface.
    pub fn device_add(&mut self) -> DeviceId {
        let id = self.allocate_id();

        let device = Cpci429Device::new(id, self.config.layout);
        self.devices.insert(id, Arc::new(Mutex::new(device)));
        self.interfaces.push(DeviceInterface {
            guid: GUID_DEVINTERFACE_CPCI429,
            device: id,
            symbolic_link: format!(r"\\?\cpci429#{id:04}#{GUID_DEVINTERFACE_CPCI429}"),
        });

        log::info!("device {id} added");
        id
    }

    /// Next id not held by an attached card. Ids wrap around on overflow.
    fn allocate_id(&mut self) -> DeviceId {
        let mut id = self.next_id;
        while self.devices.contains_key(&id) {
            id = id.wrapping_add(1);
        }
        self.next_id = id.wrapping_add(1);
        id
    }

    pub fn device_remove(&mut self, id: DeviceId) -> Result<(), DriverError> {
        self.devices
            .remove(&id)
            .ok_or(DriverError::UnknownDevice(id))?;
        self.interfaces.retain(|interface| interface.device != id);
        log::info!("device {id} removed");
        Ok(())
    }

    pub fn interfaces(&self) -> &[DeviceInterface] {
        &self.interfaces
    }

    pub fn device(&self, id: DeviceId) -> Result<Arc<Mutex<Cpci429Device>>, DriverError> {
        self.devices
            .get(&id)
            .cloned()
            .ok_or(DriverError::UnknownDevice(id))
    }

    /// Runs `f` with exclusive access to one card.
    pub fn with_device<R>(
        &self,
        id: DeviceId,
        f: impl FnOnce(&mut Cpci429Device) -> R,
    ) -> Result<R, DriverError> {
        let device = self
            .devices
            .get(&id)
            .ok_or(DriverError::UnknownDevice(id))?;
        let mut guard = lock(device, id)?;
        Ok(f(&mut guard))
    }

    /// Delivers one control request to a card and returns its completion.
    pub fn submit(
        &self,
        id: DeviceId,
        request: &mut IoRequest<'_>,
    ) -> Result<Completion, DriverError> {
        self.with_device(id, |device| device.device_control(request))
    }
}

fn lock(
    device: &Mutex<Cpci429Device>,
    id: DeviceId,
) -> Result<MutexGuard<'_, Cpci429Device>, DriverError> {
    device
        .lock()
        .map_err(|_| DriverError::DeviceLockPoisoned(id))
}
