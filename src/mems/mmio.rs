// MMIO
//
// A card's BAR is mapped into our address space by the host before we ever
// see it. All we get is the base pointer and the length of the mapping.
// Register accesses must be volatile, 32-bit wide and naturally aligned, and
// must stay inside the mapping: the card decodes nothing past its BAR length.

use std::ptr::NonNull;

use crate::err::WindowError;
use crate::mems::window::{REGISTER_WIDTH, RegisterWindow, check_aligned_access};

/// Register window over a live memory mapping.
pub struct MmioWindow {
    base: NonNull<u8>,
    length: usize,
}

// SAFETY: the mapping is device memory owned by this window for its whole
// lifetime; `&mut self` serializes writes.
unsafe impl Send for MmioWindow {}

impl MmioWindow {
    /// Wraps an existing mapping.
    ///
    /// # Safety
    /// `base` must point to `length` bytes of mapped memory, aligned to 4
    /// bytes, that stay valid and are not aliased for the lifetime of the
    /// returned window.
    pub unsafe fn from_raw(base: NonNull<u8>, length: usize) -> Result<Self, WindowError> {
        if length == 0 {
            return Err(WindowError::InvalidSize { size: length });
        }
        if base.as_ptr() as usize % REGISTER_WIDTH != 0 {
            return Err(WindowError::invalid_alignment(
                base.as_ptr() as usize,
                REGISTER_WIDTH,
            ));
        }
        Ok(Self { base, length })
    }

    pub fn base(&self) -> NonNull<u8> {
        self.base
    }
}

impl RegisterWindow for MmioWindow {
    fn len(&self) -> usize {
        self.length
    }

    fn read_u32(&self, offset: usize) -> Result<u32, WindowError> {
        check_aligned_access(offset, REGISTER_WIDTH, self.length)?;
        log::trace!("mmio read32 at {offset:#x}");
        // SAFETY: offset + 4 <= length and both base and offset are 4-aligned.
        Ok(unsafe { std::ptr::read_volatile(self.base.as_ptr().add(offset) as *const u32) })
    }

    fn write_u32(&mut self, offset: usize, value: u32) -> Result<(), WindowError> {
        check_aligned_access(offset, REGISTER_WIDTH, self.length)?;
        log::trace!("mmio write32 {value:#x} at {offset:#x}");
        // SAFETY: see read_u32.
        unsafe { std::ptr::write_volatile(self.base.as_ptr().add(offset) as *mut u32, value) };
        Ok(())
    }
}
