use crate::err::WindowError;
use crate::mems::{MemoryWindow, RegisterWindow};

/// One entry of a hardware resource list handed over at prepare time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmResource {
    Memory { start: u64, length: u32 },
    Port { start: u64, length: u32 },
    Interrupt { level: u32, vector: u32, affinity: u64 },
}

impl CmResource {
    pub fn as_memory(&self) -> Option<(u64, u32)> {
        match *self {
            CmResource::Memory { start, length } => Some((start, length)),
            _ => None,
        }
    }
}

/// Maps a translated memory resource into a register window.
pub trait RegisterMapper {
    fn map(
        &mut self,
        start: u64,
        length: usize,
    ) -> Result<Box<dyn RegisterWindow + Send>, WindowError>;
}

/// Mapper backing every BAR with zeroed heap memory.
#[derive(Debug, Default)]
pub struct SimulatedMapper {
    mappings: Vec<(u64, usize)>,
}

impl SimulatedMapper {
    /// `(start, length)` of every mapping handed out so far.
    pub fn mappings(&self) -> &[(u64, usize)] {
        &self.mappings
    }
}

impl RegisterMapper for SimulatedMapper {
    fn map(
        &mut self,
        start: u64,
        length: usize,
    ) -> Result<Box<dyn RegisterWindow + Send>, WindowError> {
        let window = MemoryWindow::new(length)?;
        log::debug!("simulated mapping of {length:#x} bytes at {start:#x}");
        self.mappings.push((start, length));
        Ok(Box::new(window))
    }
}
