use std::fmt::{Display, Formatter};

use crate::error::{Error, Result};
use crate::trace::Address;

/// Index of a frame slot inside a [`FrameTable`], in range `[0, capacity)`.
pub type FrameId = usize;

/// High bit of the 8-bit aging counter.
pub const AGE_REFERENCED: u8 = 0x80;

/// The in-memory state of one physical frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Resident address, None while the slot has never been filled.
    pub address: Option<Address>,
    /// The frame holds data that has to be written back before eviction.
    pub dirty: bool,
    /// The frame has been accessed since the last clearing pass.
    pub referenced: bool,
    /// Aging shift register, the high bit records the most recent interval.
    pub age: u8,
    /// Virtual time of the last access.
    pub last_used: u64,
}

impl Frame {
    fn loaded(address: Address, dirty: bool) -> Self {
        Frame { address: Some(address), dirty, referenced: true, age: 0, last_used: 0 }
    }

    pub fn holds(&self, address: &Address) -> bool {
        self.address.as_ref() == Some(address)
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.address {
            None => write!(f, "-"),
            Some(address) => write!(
                f,
                "{}[{}{} age={:#04x} t={}]",
                address,
                if self.referenced { "r" } else { "-" },
                if self.dirty { "d" } else { "-" },
                self.age,
                self.last_used
            ),
        }
    }
}

/// FrameTable is the fixed size set of physical frames a policy manages.
///
/// Slots are filled strictly in index order, so the occupied frames are always
/// `[0, active)`. Frames are never released individually: once the table is full
/// every fault overwrites a victim in place.
#[derive(Clone, Debug)]
pub struct FrameTable {
    frames: Vec<Frame>,
    /// number of slots filled so far.
    active: usize,
}

impl FrameTable {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity < 1 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(FrameTable { frames: vec![Frame::default(); capacity], active: 0 })
    }

    pub fn capacity(&self) -> usize {
        self.frames.len()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_full(&self) -> bool {
        self.active == self.frames.len()
    }

    /// Find the frame currently holding the given address.
    pub fn find(&self, address: &Address) -> Option<FrameId> {
        self.frames[..self.active].iter().position(|frame| frame.holds(address))
    }

    /// Next never-used slot, None once the table is full.
    pub fn first_free_slot(&self) -> Option<FrameId> {
        if self.active < self.frames.len() {
            Some(self.active)
        } else {
            None
        }
    }

    /// Load the address into the first free slot. The new frame is referenced.
    /// The address is handed back if the table is already full.
    pub fn load(&mut self, address: Address, dirty: bool) -> std::result::Result<FrameId, Address> {
        debug_assert!(self.find(&address).is_none(), "address {} already resident", address);
        let Some(frame_id) = self.first_free_slot() else {
            return Err(address);
        };
        self.frames[frame_id] = Frame::loaded(address, dirty);
        self.active += 1;
        Ok(frame_id)
    }

    /// Overwrite an occupied frame with a new address, returning the evicted frame.
    /// The new frame is referenced.
    pub fn replace(&mut self, frame_id: FrameId, address: Address, dirty: bool) -> Frame {
        debug_assert!(frame_id < self.active, "frame {} is not occupied", frame_id);
        debug_assert!(self.find(&address).is_none(), "address {} already resident", address);
        std::mem::replace(&mut self.frames[frame_id], Frame::loaded(address, dirty))
    }

    pub fn frame(&self, frame_id: FrameId) -> &Frame {
        &self.frames[frame_id]
    }

    pub fn frame_mut(&mut self, frame_id: FrameId) -> &mut Frame {
        &mut self.frames[frame_id]
    }

    pub fn occupied(&self) -> impl Iterator<Item = (FrameId, &Frame)> {
        self.frames[..self.active].iter().enumerate()
    }

    pub fn occupied_mut(&mut self) -> impl Iterator<Item = &mut Frame> {
        self.frames[..self.active].iter_mut()
    }
}

impl Display for FrameTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", frame)?;
        }
        write!(f, "] active={}/{}", self.active, self.frames.len())
    }
}
