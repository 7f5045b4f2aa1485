//! Hart (Hardware Thread) Model
//!
//! Only the machine-mode interrupt CSRs are modeled: `mstatus`, `mie` and
//! `mip`. That is the state a timer device reads and mutates, and what the
//! hart consults when deciding whether to take an interrupt.
//!
//! CSRs are stored in atomics so a device can hold a shared handle to the
//! hart (see [`InterruptTarget`]) while the host loop keeps its own.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::csr::{CSR_MIE, CSR_MIP, CSR_MSTATUS, MIE_MTIE, MIP_MTIP, MSTATUS_MIE};
use crate::timer::{InterruptEnables, InterruptTarget};
use crate::Trap;

pub struct Hart {
    /// Hart ID (0 for primary).
    pub hart_id: usize,

    mstatus: AtomicU64,
    mie: AtomicU64,
    mip: AtomicU64,
}

impl Hart {
    pub fn new(hart_id: usize) -> Self {
        Self {
            hart_id,
            mstatus: AtomicU64::new(0),
            mie: AtomicU64::new(0),
            mip: AtomicU64::new(0),
        }
    }

    fn csr(&self, addr: u16) -> Result<&AtomicU64, Trap> {
        match addr {
            CSR_MSTATUS => Ok(&self.mstatus),
            CSR_MIE => Ok(&self.mie),
            CSR_MIP => Ok(&self.mip),
            _ => Err(Trap::Fatal(format!("Unsupported CSR: 0x{:03x}", addr))),
        }
    }

    pub fn read_csr(&self, addr: u16) -> Result<u64, Trap> {
        self.csr(addr).map(|reg| reg.load(Ordering::Relaxed))
    }

    pub fn write_csr(&self, addr: u16, val: u64) -> Result<(), Trap> {
        self.csr(addr)?.store(val, Ordering::Relaxed);
        Ok(())
    }

    /// Set or clear mstatus.MIE.
    pub fn set_global_interrupts(&self, enabled: bool) {
        set_bits(&self.mstatus, MSTATUS_MIE, enabled);
    }

    /// Set or clear mie.MTIE.
    pub fn set_timer_interrupt_enable(&self, enabled: bool) {
        set_bits(&self.mie, MIE_MTIE, enabled);
    }

    #[inline]
    pub fn timer_pending(&self) -> bool {
        self.mip.load(Ordering::Relaxed) & MIP_MTIP != 0
    }

    /// Interrupt the hart would take right now, if any.
    ///
    /// Only the machine timer interrupt exists on this hart, so the check is
    /// `mip.MTIP & mie.MTIE` gated by `mstatus.MIE`.
    pub fn pending_interrupt(&self) -> Option<Trap> {
        let mstatus = self.mstatus.load(Ordering::Relaxed);
        if mstatus & MSTATUS_MIE == 0 {
            return None;
        }
        let pending = self.mip.load(Ordering::Relaxed) & self.mie.load(Ordering::Relaxed);
        if pending & MIP_MTIP != 0 {
            return Some(Trap::MachineTimerInterrupt);
        }
        None
    }
}

fn set_bits(reg: &AtomicU64, mask: u64, on: bool) {
    if on {
        reg.fetch_or(mask, Ordering::Relaxed);
    } else {
        reg.fetch_and(!mask, Ordering::Relaxed);
    }
}

impl InterruptTarget for Hart {
    fn interrupt_enables(&self) -> InterruptEnables {
        InterruptEnables {
            global: self.mstatus.load(Ordering::Relaxed) & MSTATUS_MIE != 0,
            timer: self.mie.load(Ordering::Relaxed) & MIE_MTIE != 0,
        }
    }

    fn set_timer_pending(&self) {
        self.mip.fetch_or(MIP_MTIP, Ordering::Relaxed);
    }

    fn clear_timer_pending(&self) {
        self.mip.fetch_and(!MIP_MTIP, Ordering::Relaxed);
    }
}
