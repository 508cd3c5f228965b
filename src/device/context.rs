use crate::config::WindowLayout;
use crate::mems::RegisterWindow;

/// Per-card device state.
///
/// Created zeroed when the device is added. The window is present only
/// between hardware-prepare and hardware-release.
#[derive(Default)]
pub struct DeviceContext {
    window: Option<Box<dyn RegisterWindow + Send>>,
    mapped_length: usize,
    physical_address_register: u32,
    offset_from_caller: u32,
    layout: WindowLayout,
}

impl DeviceContext {
    pub fn new(layout: WindowLayout) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    pub fn map_window(&mut self, window: Box<dyn RegisterWindow + Send>, physical_address: u32) {
        self.mapped_length = window.len();
        self.window = Some(window);
        self.physical_address_register = physical_address;
        self.offset_from_caller = 0;
    }

    /// Drops the window; returns whether one was mapped.
    pub fn unmap_window(&mut self) -> bool {
        self.mapped_length = 0;
        self.physical_address_register = 0;
        self.offset_from_caller = 0;
        self.window.take().is_some()
    }

    pub fn is_mapped(&self) -> bool {
        self.window.is_some()
    }

    pub fn mapped_length(&self) -> usize {
        self.mapped_length
    }

    pub fn physical_address(&self) -> u32 {
        self.physical_address_register
    }

    pub fn offset(&self) -> u32 {
        self.offset_from_caller
    }

    pub fn layout(&self) -> WindowLayout {
        self.layout
    }

    pub(crate) fn set_offset(&mut self, offset: u32) {
        self.offset_from_caller = offset;
    }

    pub(crate) fn window(&self) -> Option<&(dyn RegisterWindow + Send + 'static)> {
        self.window.as_deref()
    }

    pub(crate) fn window_mut(&mut self) -> Option<&mut (dyn RegisterWindow + Send + 'static)> {
        self.window.as_deref_mut()
    }
}

impl std::fmt::Debug for DeviceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceContext")
            .field("mapped", &self.is_mapped())
            .field("mapped_length", &self.mapped_length)
            .field("physical_address_register", &self.physical_address_register)
            .field("offset_from_caller", &self.offset_from_caller)
            .field("layout", &self.layout)
            .finish()
    }
}
