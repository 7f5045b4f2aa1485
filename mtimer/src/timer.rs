//! Memory-mapped machine timer.
//!
//! The device owns a free-running 64-bit counter (`mtime`), a compare
//! threshold (`mtimecmp`) and a prescaler divisor (`mtimectrl`). Each of them
//! is exposed on the bus as two independent 32-bit halves; the 64-bit value is
//! reassembled whenever it is used, so software that writes one half and then
//! the other can be observed with a torn value in between.
//!
//! The host loop calls [`Timer::tick`] once per simulated step. Every
//! `mtimectrl` ticks the counter advances by one, and the attached hart's
//! MTIP bit is raised or cleared depending on `mtime >= mtimecmp` and the
//! hart's interrupt enables.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TIMER_BASE: u64 = 0x0200_0000;
pub const TIMER_SIZE: u64 = 0x1000;

pub const MTIME_LO_OFFSET: u64 = 0x00;
pub const MTIME_HI_OFFSET: u64 = 0x04;
pub const MTIMECMP_LO_OFFSET: u64 = 0x08;
pub const MTIMECMP_HI_OFFSET: u64 = 0x0C;
pub const MTIMECTRL_LO_OFFSET: u64 = 0x10;
pub const MTIMECTRL_HI_OFFSET: u64 = 0x14;
/// Read-only host wall clock in nanoseconds, 8 bytes.
pub const WALLCLOCK_OFFSET: u64 = 0x18;

const WORD_SIZE: u64 = 4;
const WALLCLOCK_SIZE: u64 = 8;

/// Reasons a bus access to the timer window is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MmioError {
    #[error("Zero-length access at {0:#x}")]
    ZeroLength(u64),

    #[error("Buffer holds {have} bytes, access needs {want}")]
    BufferTooShort { have: usize, want: usize },

    #[error("Timer is not attached to a hart")]
    NotAttached,

    #[error("No register covers access at {0:#x}")]
    Unmapped(u64),

    #[error("Access at {0:#x} lies outside the timer window")]
    OutOfWindow(u64),
}

/// Snapshot of the hart's interrupt enable state relevant to the timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptEnables {
    /// mstatus.MIE
    pub global: bool,
    /// mie.MTIE
    pub timer: bool,
}

/// What the timer needs from the hart it is attached to.
///
/// The timer never owns the hart; it only reads the enables and drives the
/// timer pending bit.
pub trait InterruptTarget: Send + Sync {
    fn interrupt_enables(&self) -> InterruptEnables;
    fn set_timer_pending(&self);
    fn clear_timer_pending(&self);
}

/// A 64-bit register stored as two independently written 32-bit halves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitReg {
    pub lo: u32,
    pub hi: u32,
}

impl SplitReg {
    #[inline]
    pub const fn get(&self) -> u64 {
        ((self.hi as u64) << 32) | self.lo as u64
    }

    #[inline]
    pub fn set(&mut self, val: u64) {
        self.lo = val as u32;
        self.hi = (val >> 32) as u32;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    MtimeLo,
    MtimeHi,
    MtimecmpLo,
    MtimecmpHi,
    MtimectrlLo,
    MtimectrlHi,
    WallClock,
}

/// Register spans in decode order. They never overlap.
const FIELDS: [(Field, u64, u64); 7] = [
    (Field::MtimeLo, MTIME_LO_OFFSET, WORD_SIZE),
    (Field::MtimeHi, MTIME_HI_OFFSET, WORD_SIZE),
    (Field::MtimecmpLo, MTIMECMP_LO_OFFSET, WORD_SIZE),
    (Field::MtimecmpHi, MTIMECMP_HI_OFFSET, WORD_SIZE),
    (Field::MtimectrlLo, MTIMECTRL_LO_OFFSET, WORD_SIZE),
    (Field::MtimectrlHi, MTIMECTRL_HI_OFFSET, WORD_SIZE),
    (Field::WallClock, WALLCLOCK_OFFSET, WALLCLOCK_SIZE),
];

/// Find the field whose span fully contains `[addr, addr + len)`.
/// Returns the field and the byte offset of `addr` inside it.
fn decode(addr: u64, len: usize) -> Option<(Field, usize)> {
    let end = addr.checked_add(len as u64)?;
    FIELDS
        .iter()
        .find(|&&(_, base, size)| addr >= base && end <= base + size)
        .map(|&(field, base, _)| (field, (addr - base) as usize))
}

fn in_window(addr: u64, len: usize) -> bool {
    matches!(addr.checked_add(len as u64), Some(end) if end <= TIMER_SIZE)
}

pub struct Timer {
    mtime: SplitReg,
    mtimecmp: SplitReg,
    /// Prescaler divisor. Zero disables the timer.
    mtimectrl: SplitReg,
    /// Ticks since the last counter increment. Not bus visible.
    prescaler: SplitReg,

    /// Epoch for the wall clock field.
    epoch: Instant,

    hart: Option<Arc<dyn InterruptTarget>>,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            mtime: SplitReg::default(),
            mtimecmp: SplitReg::default(),
            mtimectrl: SplitReg::default(),
            prescaler: SplitReg::default(),
            epoch: Instant::now(),
            hart: None,
        }
    }

    /// Bind the timer to the hart whose MTIP bit it drives.
    ///
    /// # Panics
    ///
    /// Panics if `hart` is `None`: a timer without a hart is a startup
    /// misconfiguration the simulation cannot run with.
    pub fn attach(&mut self, hart: Option<Arc<dyn InterruptTarget>>) -> bool {
        match hart {
            Some(hart) => {
                if self.hart.is_some() {
                    log::warn!("[Timer] Re-attaching to a different hart");
                }
                self.hart = Some(hart);
                log::debug!("[Timer] Attached");
                true
            }
            None => {
                log::error!("[Timer] No hart available to attach to");
                panic!("timer: no hart available to attach to");
            }
        }
    }

    pub fn is_attached(&self) -> bool {
        self.hart.is_some()
    }

    pub fn mtime(&self) -> u64 {
        self.mtime.get()
    }

    pub fn set_mtime(&mut self, val: u64) {
        self.mtime.set(val);
    }

    pub fn mtimecmp(&self) -> u64 {
        self.mtimecmp.get()
    }

    pub fn set_mtimecmp(&mut self, val: u64) {
        self.mtimecmp.set(val);
    }

    pub fn divisor(&self) -> u64 {
        self.mtimectrl.get()
    }

    pub fn set_divisor(&mut self, val: u64) {
        self.mtimectrl.set(val);
    }

    pub fn prescaler(&self) -> u64 {
        self.prescaler.get()
    }

    /// A zero divisor means the timer is stopped.
    pub fn is_enabled(&self) -> bool {
        self.divisor() != 0
    }

    /// Nanoseconds since the device was created. Recomputed on every call.
    fn wall_clock_nanos(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    fn word(&self, field: Field) -> Option<u32> {
        match field {
            Field::MtimeLo => Some(self.mtime.lo),
            Field::MtimeHi => Some(self.mtime.hi),
            Field::MtimecmpLo => Some(self.mtimecmp.lo),
            Field::MtimecmpHi => Some(self.mtimecmp.hi),
            Field::MtimectrlLo => Some(self.mtimectrl.lo),
            Field::MtimectrlHi => Some(self.mtimectrl.hi),
            Field::WallClock => None,
        }
    }

    fn word_mut(&mut self, field: Field) -> Option<&mut u32> {
        match field {
            Field::MtimeLo => Some(&mut self.mtime.lo),
            Field::MtimeHi => Some(&mut self.mtime.hi),
            Field::MtimecmpLo => Some(&mut self.mtimecmp.lo),
            Field::MtimecmpHi => Some(&mut self.mtimecmp.hi),
            Field::MtimectrlLo => Some(&mut self.mtimectrl.lo),
            Field::MtimectrlHi => Some(&mut self.mtimectrl.hi),
            Field::WallClock => None,
        }
    }

    /// Checks shared by load and store, run before any state is touched.
    fn check_access(&self, addr: u64, len: usize, buf_len: usize) -> Result<(), MmioError> {
        if len == 0 {
            return Err(MmioError::ZeroLength(addr));
        }
        if buf_len < len {
            return Err(MmioError::BufferTooShort { have: buf_len, want: len });
        }
        if self.hart.is_none() {
            return Err(MmioError::NotAttached);
        }
        Ok(())
    }

    /// Read `len` bytes at `addr` (relative to `TIMER_BASE`) into `bytes`.
    pub fn try_load(&self, addr: u64, len: usize, bytes: &mut [u8]) -> Result<(), MmioError> {
        self.check_access(addr, len, bytes.len())?;

        let (field, off) = match decode(addr, len) {
            Some(hit) => hit,
            None if in_window(addr, len) => return Err(MmioError::Unmapped(addr)),
            None => return Err(MmioError::OutOfWindow(addr)),
        };

        let raw = match self.word(field) {
            Some(word) => {
                let mut raw = [0u8; WALLCLOCK_SIZE as usize];
                raw[..WORD_SIZE as usize].copy_from_slice(&word.to_le_bytes());
                raw
            }
            // Sampled fresh on every read.
            None => self.wall_clock_nanos().to_le_bytes(),
        };
        bytes[..len].copy_from_slice(&raw[off..off + len]);
        Ok(())
    }

    /// Write `len` bytes from `bytes` at `addr` (relative to `TIMER_BASE`).
    ///
    /// Stores that land inside the window but not inside a writable
    /// register (reserved space, the wall clock, or a span straddling two
    /// registers) are accepted and ignored.
    pub fn try_store(&mut self, addr: u64, len: usize, bytes: &[u8]) -> Result<(), MmioError> {
        self.check_access(addr, len, bytes.len())?;

        if let Some((field, off)) = decode(addr, len) {
            if let Some(word) = self.word_mut(field) {
                let mut raw = word.to_le_bytes();
                raw[off..off + len].copy_from_slice(&bytes[..len]);
                *word = u32::from_le_bytes(raw);
                return Ok(());
            }
        }

        if in_window(addr, len) {
            log::trace!("[Timer] Ignoring store to 0x{:x} ({} bytes)", addr, len);
            return Ok(());
        }
        Err(MmioError::OutOfWindow(addr))
    }

    /// Bus-facing load. Returns `false` for any rejected access.
    pub fn load(&self, addr: u64, len: usize, bytes: &mut [u8]) -> bool {
        match self.try_load(addr, len, bytes) {
            Ok(()) => true,
            Err(e) => {
                log::trace!("[Timer] Load rejected: {}", e);
                false
            }
        }
    }

    /// Bus-facing store. Returns `false` for any rejected access.
    pub fn store(&mut self, addr: u64, len: usize, bytes: &[u8]) -> bool {
        match self.try_store(addr, len, bytes) {
            Ok(()) => true,
            Err(e) => {
                log::trace!("[Timer] Store rejected: {}", e);
                false
            }
        }
    }

    /// Advance the timer by one step.
    ///
    /// Returns `true` when `mtime >= mtimecmp` and the hart has both the
    /// global and the timer interrupt enabled; MTIP has then been raised.
    /// When the compare is met but interrupts are masked, MTIP is left as it
    /// was. When `mtime < mtimecmp`, MTIP is cleared.
    pub fn tick(&mut self) -> bool {
        let divisor = self.mtimectrl.get();
        if divisor == 0 {
            return false;
        }

        let mut prescaler = self.prescaler.get();
        let mut mtime = self.mtime.get();
        let mtimecmp = self.mtimecmp.get();

        // Exact match only: shrinking the divisor below the current
        // prescaler value delays the next rollover until the prescaler wraps.
        prescaler = prescaler.wrapping_add(1);
        if prescaler == divisor {
            prescaler = 0;
            mtime = mtime.wrapping_add(1);
        }
        self.prescaler.set(prescaler);
        self.mtime.set(mtime);

        let Some(hart) = self.hart.as_ref() else {
            return false;
        };
        let enables = hart.interrupt_enables();

        if mtime >= mtimecmp {
            let active = enables.global && enables.timer;
            if active {
                hart.set_timer_pending();
            }
            if log::log_enabled!(log::Level::Trace) {
                log::trace!(
                    "[Timer] mtime={} >= mtimecmp={} enables={:?} active={}",
                    mtime, mtimecmp, enables, active
                );
            }
            active
        } else {
            hart.clear_timer_pending();
            false
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hart::Hart;

    fn attached() -> (Timer, Arc<Hart>) {
        let hart = Arc::new(Hart::new(0));
        let mut timer = Timer::new();
        assert!(timer.attach(Some(hart.clone() as Arc<dyn InterruptTarget>)));
        (timer, hart)
    }

    fn enable_all(hart: &Hart) {
        hart.set_global_interrupts(true);
        hart.set_timer_interrupt_enable(true);
    }

    fn load_u32(timer: &Timer, addr: u64) -> u32 {
        let mut buf = [0u8; 4];
        assert!(timer.load(addr, 4, &mut buf));
        u32::from_le_bytes(buf)
    }

    fn load_u64(timer: &Timer, addr: u64) -> u64 {
        let mut buf = [0u8; 8];
        assert!(timer.load(addr, 8, &mut buf));
        u64::from_le_bytes(buf)
    }

    #[test]
    fn test_store_then_load_mtimecmp_low() {
        let (mut timer, _hart) = attached();

        assert!(timer.store(MTIMECMP_LO_OFFSET, 4, &5u32.to_le_bytes()));
        assert_eq!(load_u32(&timer, MTIMECMP_LO_OFFSET), 5);
        assert_eq!(timer.mtimecmp(), 5);
    }

    #[test]
    fn test_halves_assemble_into_64bit_values() {
        let (mut timer, _hart) = attached();

        assert!(timer.store(MTIME_LO_OFFSET, 4, &0x9ABC_DEF0u32.to_le_bytes()));
        assert!(timer.store(MTIME_HI_OFFSET, 4, &0x1234_5678u32.to_le_bytes()));
        assert_eq!(timer.mtime(), 0x1234_5678_9ABC_DEF0);

        timer.set_divisor(0xCAFE_BABE_DEAD_BEEF);
        assert_eq!(load_u32(&timer, MTIMECTRL_LO_OFFSET), 0xDEAD_BEEF);
        assert_eq!(load_u32(&timer, MTIMECTRL_HI_OFFSET), 0xCAFE_BABE);
    }

    #[test]
    fn test_torn_value_between_half_writes() {
        let (mut timer, _hart) = attached();
        timer.set_mtimecmp(0x0000_0001_FFFF_FFFF);

        // Software moving the compare to 0x2_0000_0000 writes the low half first.
        assert!(timer.store(MTIMECMP_LO_OFFSET, 4, &0u32.to_le_bytes()));
        assert_eq!(timer.mtimecmp(), 0x0000_0001_0000_0000);

        assert!(timer.store(MTIMECMP_HI_OFFSET, 4, &2u32.to_le_bytes()));
        assert_eq!(timer.mtimecmp(), 0x0000_0002_0000_0000);
    }

    #[test]
    fn test_sub_word_accesses_hit_addressed_bytes() {
        let (mut timer, _hart) = attached();
        timer.set_mtimecmp(0x1122_3344);

        let mut buf = [0u8; 2];
        assert!(timer.load(MTIMECMP_LO_OFFSET + 2, 2, &mut buf));
        assert_eq!(buf, [0x22, 0x11]);

        assert!(timer.store(MTIMECMP_LO_OFFSET + 1, 1, &[0xAA]));
        assert_eq!(timer.mtimecmp(), 0x1122_AA44);

        // Odd length, still inside one register.
        assert!(timer.store(MTIME_HI_OFFSET + 1, 3, &[1, 2, 3]));
        assert_eq!(timer.mtime(), 0x0302_0100_0000_0000);
    }

    #[test]
    fn test_load_store_roundtrip_is_idempotent() {
        let (mut timer, _hart) = attached();
        timer.set_mtime(0x0102_0304_0506_0708);
        timer.set_mtimecmp(0x1112_1314_1516_1718);
        timer.set_divisor(0x2122_2324_2526_2728);

        for addr in (MTIME_LO_OFFSET..WALLCLOCK_OFFSET).step_by(2) {
            let mut buf = [0u8; 2];
            assert!(timer.load(addr, 2, &mut buf));
            assert!(timer.store(addr, 2, &buf));
        }

        assert_eq!(timer.mtime(), 0x0102_0304_0506_0708);
        assert_eq!(timer.mtimecmp(), 0x1112_1314_1516_1718);
        assert_eq!(timer.divisor(), 0x2122_2324_2526_2728);
    }

    #[test]
    fn test_wall_clock_is_non_decreasing() {
        let (timer, _hart) = attached();

        let first = load_u64(&timer, WALLCLOCK_OFFSET);
        let second = load_u64(&timer, WALLCLOCK_OFFSET);
        assert!(second >= first);

        // Upper half alone is readable too.
        let mut buf = [0u8; 4];
        assert!(timer.load(WALLCLOCK_OFFSET + 4, 4, &mut buf));
    }

    #[test]
    fn test_wall_clock_ignores_stores() {
        let (mut timer, _hart) = attached();
        let before = load_u64(&timer, WALLCLOCK_OFFSET);

        assert!(timer.store(WALLCLOCK_OFFSET, 8, &u64::MAX.to_le_bytes()));

        let after = load_u64(&timer, WALLCLOCK_OFFSET);
        assert!(after >= before);
        assert_ne!(after, u64::MAX);
    }

    #[test]
    fn test_reserved_space_store_is_noop_but_load_fails() {
        let (mut timer, _hart) = attached();
        let reserved = WALLCLOCK_OFFSET + WALLCLOCK_SIZE;

        assert!(timer.store(reserved, 4, &0xFFFF_FFFFu32.to_le_bytes()));
        assert!(timer.store(TIMER_SIZE - 4, 4, &[1, 2, 3, 4]));

        let mut buf = [0u8; 4];
        assert!(!timer.load(reserved, 4, &mut buf));
        assert_eq!(
            timer.try_load(reserved, 4, &mut buf),
            Err(MmioError::Unmapped(reserved))
        );
        assert_eq!(timer.mtime(), 0);
        assert_eq!(timer.mtimecmp(), 0);
        assert_eq!(timer.divisor(), 0);
    }

    #[test]
    fn test_access_straddling_two_registers() {
        let (mut timer, _hart) = attached();
        timer.set_mtime(7);

        // Store is swallowed, load is refused.
        assert!(timer.store(MTIME_LO_OFFSET + 2, 4, &[0xFF; 4]));
        assert_eq!(timer.mtime(), 7);

        let mut buf = [0u8; 8];
        assert!(!timer.load(MTIME_LO_OFFSET, 8, &mut buf));
    }

    #[test]
    fn test_out_of_window_access_fails() {
        let (mut timer, _hart) = attached();
        let mut buf = [0u8; 4];

        assert!(!timer.load(TIMER_SIZE, 4, &mut buf));
        assert!(!timer.store(TIMER_SIZE, 4, &buf));
        assert_eq!(
            timer.try_store(TIMER_SIZE - 2, 4, &buf),
            Err(MmioError::OutOfWindow(TIMER_SIZE - 2))
        );

        // addr + len overflows u64
        assert!(!timer.load(u64::MAX, 2, &mut buf));
        assert!(!timer.store(u64::MAX, 2, &buf));
    }

    #[test]
    fn test_invalid_access_is_rejected_before_mutation() {
        let (mut timer, _hart) = attached();
        let mut buf = [0u8; 2];

        assert_eq!(
            timer.try_load(MTIME_LO_OFFSET, 0, &mut buf),
            Err(MmioError::ZeroLength(MTIME_LO_OFFSET))
        );
        assert!(!timer.store(MTIME_LO_OFFSET, 0, &buf));

        assert_eq!(
            timer.try_store(MTIME_LO_OFFSET, 4, &[1, 2]),
            Err(MmioError::BufferTooShort { have: 2, want: 4 })
        );
        assert_eq!(timer.mtime(), 0);
    }

    #[test]
    fn test_unattached_timer_rejects_accesses() {
        let mut timer = Timer::new();
        let mut buf = [0u8; 4];

        assert!(!timer.is_attached());
        assert_eq!(
            timer.try_load(MTIME_LO_OFFSET, 4, &mut buf),
            Err(MmioError::NotAttached)
        );
        assert!(!timer.store(MTIMECMP_LO_OFFSET, 4, &[1, 0, 0, 0]));
        assert_eq!(timer.mtimecmp(), 0);
    }

    #[test]
    #[should_panic(expected = "no hart available")]
    fn test_attach_without_hart_is_fatal() {
        let mut timer = Timer::new();
        timer.attach(None);
    }

    #[test]
    fn test_disabled_timer_never_advances() {
        let (mut timer, hart) = attached();
        enable_all(&hart);
        timer.set_mtime(42);
        hart.set_timer_pending();

        for _ in 0..1000 {
            assert!(!timer.tick());
        }

        assert!(!timer.is_enabled());
        assert_eq!(timer.mtime(), 42);
        assert_eq!(timer.prescaler(), 0);
        assert!(hart.timer_pending());
    }

    #[test]
    fn test_divisor_sets_tick_period() {
        let (mut timer, _hart) = attached();
        timer.set_mtimecmp(u64::MAX);
        timer.set_divisor(3);

        for period in 1..=4 {
            timer.tick();
            timer.tick();
            assert_eq!(timer.mtime(), period - 1);
            assert_eq!(timer.prescaler(), 2);

            timer.tick();
            assert_eq!(timer.mtime(), period);
            assert_eq!(timer.prescaler(), 0);
        }
    }

    #[test]
    fn test_first_tick_raises_interrupt() {
        let (mut timer, hart) = attached();
        enable_all(&hart);
        timer.set_divisor(1);
        timer.set_mtimecmp(0);

        assert!(timer.tick());
        assert_eq!(timer.mtime(), 1);
        assert_eq!(timer.prescaler(), 0);
        assert!(hart.timer_pending());
    }

    #[test]
    fn test_masked_interrupt_leaves_pending_alone() {
        let (mut timer, hart) = attached();
        timer.set_divisor(1);
        timer.set_mtimecmp(0);

        // Global enable only: pending stays clear.
        hart.set_global_interrupts(true);
        assert!(!timer.tick());
        assert!(!hart.timer_pending());

        // Timer enable only: a pending bit set earlier survives.
        hart.set_global_interrupts(false);
        hart.set_timer_interrupt_enable(true);
        hart.set_timer_pending();
        assert!(!timer.tick());
        assert!(hart.timer_pending());
    }

    #[test]
    fn test_counter_below_compare_clears_pending() {
        let (mut timer, hart) = attached();
        timer.set_divisor(1);
        timer.set_mtimecmp(100);

        for enabled in [false, true] {
            hart.set_global_interrupts(enabled);
            hart.set_timer_interrupt_enable(enabled);
            hart.set_timer_pending();
            assert!(!timer.tick());
            assert!(!hart.timer_pending());
        }
    }

    #[test]
    fn test_moving_counter_backward_clears_pending() {
        let (mut timer, hart) = attached();
        enable_all(&hart);
        timer.set_divisor(1);
        timer.set_mtimecmp(10);
        timer.set_mtime(20);

        assert!(timer.tick());
        assert!(hart.timer_pending());

        assert!(timer.store(MTIME_LO_OFFSET, 4, &0u32.to_le_bytes()));
        assert!(!timer.tick());
        assert!(!hart.timer_pending());
        assert_eq!(timer.mtime(), 1);
    }

    #[test]
    fn test_store_does_not_reevaluate_interrupt() {
        let (mut timer, hart) = attached();
        enable_all(&hart);
        timer.set_divisor(1);

        assert!(timer.store(MTIMECMP_HI_OFFSET, 4, &1u32.to_le_bytes()));
        hart.set_timer_pending();
        assert!(timer.store(MTIMECMP_LO_OFFSET, 4, &5u32.to_le_bytes()));
        assert!(hart.timer_pending());
    }

    #[test]
    fn test_shrinking_divisor_waits_for_exact_match() {
        let (mut timer, _hart) = attached();
        timer.set_mtimecmp(u64::MAX);
        timer.set_divisor(10);
        for _ in 0..5 {
            timer.tick();
        }
        assert_eq!(timer.prescaler(), 5);

        timer.set_divisor(3);
        for _ in 0..100 {
            timer.tick();
        }
        assert_eq!(timer.mtime(), 0);
        assert_eq!(timer.prescaler(), 105);
    }

    #[test]
    fn test_unattached_tick_still_counts() {
        let mut timer = Timer::new();
        timer.set_divisor(2);

        for _ in 0..4 {
            assert!(!timer.tick());
        }
        assert_eq!(timer.mtime(), 2);
    }

    #[test]
    fn test_zero_divisor_store_stops_timer() {
        let (mut timer, _hart) = attached();
        timer.set_divisor(1);
        timer.tick();
        assert_eq!(timer.mtime(), 1);

        assert!(timer.store(MTIMECTRL_LO_OFFSET, 4, &0u32.to_le_bytes()));
        assert!(!timer.is_enabled());
        timer.tick();
        assert_eq!(timer.mtime(), 1);
    }
}
