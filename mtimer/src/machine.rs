use std::sync::Arc;

use crate::bus::SystemBus;
use crate::hart::Hart;
use crate::timer::{InterruptTarget, Timer};
use crate::Trap;

/// Counters collected over [`Machine::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub steps: u64,
    /// Ticks on which the timer reported an active, enabled interrupt.
    pub timer_fired: u64,
    /// Timer interrupts hart 0 would have taken.
    pub interrupts_taken: u64,
}

/// Host simulation loop.
///
/// Owns the harts and the system bus. The timer is installed with
/// [`Machine::attach_timer`], which binds it to hart 0 and maps it on the bus;
/// each [`Machine::step`] then advances it by one tick.
///
/// ```ignore
/// let mut machine = Machine::new(1);
/// machine.attach_timer(Timer::new());
/// let stats = machine.run(1_000);
/// ```
pub struct Machine {
    harts: Vec<Arc<Hart>>,
    bus: Option<SystemBus>,
}

impl Machine {
    pub fn new(num_harts: usize) -> Self {
        Self {
            harts: (0..num_harts).map(|id| Arc::new(Hart::new(id))).collect(),
            bus: None,
        }
    }

    pub fn hart(&self, idx: usize) -> Option<Arc<Hart>> {
        self.harts.get(idx).cloned()
    }

    /// Bind `timer` to hart 0 and register it as the machine's timer source.
    ///
    /// # Panics
    ///
    /// Panics if the machine has no harts.
    pub fn attach_timer(&mut self, mut timer: Timer) {
        let hart = self.hart(0).map(|h| h as Arc<dyn InterruptTarget>);
        timer.attach(hart);
        log::info!("[Machine] Timer attached to hart 0");
        self.bus = Some(SystemBus::new(timer));
    }

    pub fn bus(&self) -> Option<&SystemBus> {
        self.bus.as_ref()
    }

    pub fn bus_mut(&mut self) -> Option<&mut SystemBus> {
        self.bus.as_mut()
    }

    /// One simulated time unit: tick the timer, then report the interrupt
    /// hart 0 would take, if any.
    ///
    /// Returns `(timer_fired, interrupt)`.
    pub fn step(&mut self) -> (bool, Option<Trap>) {
        let fired = match self.bus.as_mut() {
            Some(bus) => bus.tick(),
            None => false,
        };
        let trap = self.harts.first().and_then(|hart| hart.pending_interrupt());
        if let Some(trap) = &trap {
            if log::log_enabled!(log::Level::Trace) {
                log::trace!("[Machine] Pending interrupt: {}", trap);
            }
        }
        (fired, trap)
    }

    pub fn run(&mut self, steps: u64) -> RunStats {
        let mut stats = RunStats::default();
        for _ in 0..steps {
            let (fired, trap) = self.step();
            stats.steps += 1;
            if fired {
                stats.timer_fired += 1;
            }
            if trap.is_some() {
                stats.interrupts_taken += 1;
            }
        }
        log::debug!("[Machine] Run finished: {:?}", stats);
        stats
    }
}
