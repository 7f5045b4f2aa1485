use crate::timer::{Timer, TIMER_BASE, TIMER_SIZE, WALLCLOCK_OFFSET};
use crate::Trap;

pub trait Bus {
    fn read8(&mut self, addr: u64) -> Result<u8, Trap>;
    fn read16(&mut self, addr: u64) -> Result<u16, Trap>;
    fn read32(&mut self, addr: u64) -> Result<u32, Trap>;
    fn read64(&mut self, addr: u64) -> Result<u64, Trap>;

    fn write8(&mut self, addr: u64, val: u8) -> Result<(), Trap>;
    fn write16(&mut self, addr: u64, val: u16) -> Result<(), Trap>;
    fn write32(&mut self, addr: u64, val: u32) -> Result<(), Trap>;
    fn write64(&mut self, addr: u64, val: u64) -> Result<(), Trap>;

    /// Generic sized load.
    fn load(&mut self, addr: u64, size: u64) -> Result<u64, Trap> {
        match size {
            1 => self.read8(addr).map(|v| v as u64),
            2 => self.read16(addr).map(|v| v as u64),
            4 => self.read32(addr).map(|v| v as u64),
            8 => self.read64(addr),
            _ => Err(Trap::Fatal(format!("Unsupported bus load size: {}", size))),
        }
    }

    /// Generic sized store.
    fn store(&mut self, addr: u64, size: u64, value: u64) -> Result<(), Trap> {
        match size {
            1 => self.write8(addr, value as u8),
            2 => self.write16(addr, value as u16),
            4 => self.write32(addr, value as u32),
            8 => self.write64(addr, value),
            _ => Err(Trap::Fatal(format!("Unsupported bus store size: {}", size))),
        }
    }
}

/// System bus with the timer as its only device.
pub struct SystemBus {
    pub timer: Timer,
}

impl SystemBus {
    pub fn new(timer: Timer) -> Self {
        Self { timer }
    }

    /// Offset into the timer window, if `addr` falls inside it.
    fn timer_offset(addr: u64) -> Option<u64> {
        if addr >= TIMER_BASE && addr < TIMER_BASE + TIMER_SIZE {
            Some(addr - TIMER_BASE)
        } else {
            None
        }
    }

    fn read_bytes<const N: usize>(&mut self, addr: u64) -> Result<[u8; N], Trap> {
        let mut bytes = [0u8; N];
        match Self::timer_offset(addr) {
            Some(offset) if self.timer.load(offset, N, &mut bytes) => Ok(bytes),
            _ => Err(Trap::LoadAccessFault(addr)),
        }
    }

    fn write_bytes(&mut self, addr: u64, bytes: &[u8]) -> Result<(), Trap> {
        match Self::timer_offset(addr) {
            Some(offset) if self.timer.store(offset, bytes.len(), bytes) => Ok(()),
            _ => Err(Trap::StoreAccessFault(addr)),
        }
    }

    /// Advance the timer by one step. Returns the timer's interrupt decision.
    pub fn tick(&mut self) -> bool {
        self.timer.tick()
    }

    /// Raw view of the register window up to and including the wall clock.
    pub fn dump_timer(&mut self) -> Result<Vec<u8>, Trap> {
        let mut out = Vec::with_capacity(32);
        for offset in (0..WALLCLOCK_OFFSET).step_by(4) {
            out.extend_from_slice(&self.read_bytes::<4>(TIMER_BASE + offset)?);
        }
        out.extend_from_slice(&self.read_bytes::<8>(TIMER_BASE + WALLCLOCK_OFFSET)?);
        Ok(out)
    }
}

impl Bus for SystemBus {
    fn read8(&mut self, addr: u64) -> Result<u8, Trap> {
        self.read_bytes::<1>(addr).map(u8::from_le_bytes)
    }

    fn read16(&mut self, addr: u64) -> Result<u16, Trap> {
        self.read_bytes::<2>(addr).map(u16::from_le_bytes)
    }

    fn read32(&mut self, addr: u64) -> Result<u32, Trap> {
        self.read_bytes::<4>(addr).map(u32::from_le_bytes)
    }

    fn read64(&mut self, addr: u64) -> Result<u64, Trap> {
        self.read_bytes::<8>(addr).map(u64::from_le_bytes)
    }

    fn write8(&mut self, addr: u64, val: u8) -> Result<(), Trap> {
        self.write_bytes(addr, &val.to_le_bytes())
    }

    fn write16(&mut self, addr: u64, val: u16) -> Result<(), Trap> {
        self.write_bytes(addr, &val.to_le_bytes())
    }

    fn write32(&mut self, addr: u64, val: u32) -> Result<(), Trap> {
        self.write_bytes(addr, &val.to_le_bytes())
    }

    fn write64(&mut self, addr: u64, val: u64) -> Result<(), Trap> {
        self.write_bytes(addr, &val.to_le_bytes())
    }
}
