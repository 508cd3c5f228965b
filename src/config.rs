/// Base of the write path inside the register window.
pub const CPCI429_WRITE_MEMORY_OFFSET: u32 = 0x0000_0000;
/// Base of the read path inside the register window.
pub const CPCI429_READ_MEMORY_OFFSET: u32 = 0x0000_0000;

/// Where register reads and writes land relative to the window start.
/// The caller's offset is added on top of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLayout {
    pub write_base: u32,
    pub read_base: u32,
}

impl Default for WindowLayout {
    fn default() -> Self {
        Self {
            write_base: CPCI429_WRITE_MEMORY_OFFSET,
            read_base: CPCI429_READ_MEMORY_OFFSET,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DriverConfig {
    pub layout: WindowLayout,
}

impl DriverConfig {
    pub fn with_layout(mut self, layout: WindowLayout) -> Self {
        self.layout = layout;
        self
    }
}
