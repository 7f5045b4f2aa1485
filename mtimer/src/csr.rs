// Machine-level CSR addresses the timer path touches.
pub const CSR_MSTATUS: u16 = 0x300;
pub const CSR_MIE: u16 = 0x304;
pub const CSR_MIP: u16 = 0x344;

/// Interrupt cause number of the machine timer interrupt.
pub const IRQ_M_TIMER: u64 = 7;

/// mstatus.MIE: global machine-mode interrupt enable.
pub const MSTATUS_MIE: u64 = 1 << 3;

/// mie.MTIE: machine timer interrupt enable.
pub const MIE_MTIE: u64 = 1 << IRQ_M_TIMER;

/// mip.MTIP: machine timer interrupt pending.
pub const MIP_MTIP: u64 = 1 << IRQ_M_TIMER;
