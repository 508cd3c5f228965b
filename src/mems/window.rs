use crate::err::WindowError;

/// Width of every register access the card supports.
pub const REGISTER_WIDTH: usize = std::mem::size_of::<u32>();

/// Fixed-length view over a register region.
///
/// Implementations never touch memory outside `0..len()`; any access that
/// would do so is rejected with a [`WindowError`] before it happens.
pub trait RegisterWindow {
    fn len(&self) -> usize;
    fn read_u32(&self, offset: usize) -> Result<u32, WindowError>;
    fn write_u32(&mut self, offset: usize, value: u32) -> Result<(), WindowError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Checks that a `size`-byte access at `offset` stays inside a window of
/// `length` bytes.
pub fn check_bounds(offset: usize, size: usize, length: usize) -> Result<(), WindowError> {
    if !matches!(size, 1 | 2 | 4 | 8) {
        return Err(WindowError::InvalidSize { size });
    }
    match offset.checked_add(size) {
        Some(end) if end <= length => Ok(()),
        _ => Err(WindowError::out_of_bounds(offset, size, length)),
    }
}

/// [`check_bounds`], plus natural alignment of the access.
pub fn check_aligned_access(offset: usize, size: usize, length: usize) -> Result<(), WindowError> {
    check_bounds(offset, size, length)?;
    if offset & (size - 1) != 0 {
        return Err(WindowError::invalid_alignment(offset, size));
    }
    Ok(())
}

/// Heap-backed register window, used where there is no card to map.
#[derive(Debug)]
pub struct MemoryWindow {
    memory: Box<[u8]>,
}

impl MemoryWindow {
    pub fn new(size: usize) -> Result<Self, WindowError> {
        if size == 0 {
            return Err(WindowError::InvalidSize { size });
        }
        Ok(Self {
            memory: vec![0; size].into_boxed_slice(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.memory
    }
}

impl RegisterWindow for MemoryWindow {
    fn len(&self) -> usize {
        self.memory.len()
    }

    fn read_u32(&self, offset: usize) -> Result<u32, WindowError> {
        check_bounds(offset, REGISTER_WIDTH, self.len())?;
        let mut bytes = [0u8; REGISTER_WIDTH];
        bytes.copy_from_slice(&self.memory[offset..offset + REGISTER_WIDTH]);
        Ok(u32::from_le_bytes(bytes))
    }

    fn write_u32(&mut self, offset: usize, value: u32) -> Result<(), WindowError> {
        check_bounds(offset, REGISTER_WIDTH, self.len())?;
        self.memory[offset..offset + REGISTER_WIDTH].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }
}
