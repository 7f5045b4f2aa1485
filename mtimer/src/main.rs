use clap::Parser;
use mtimer::bus::Bus;
use mtimer::machine::Machine;
use mtimer::timer::{
    Timer, MTIMECMP_HI_OFFSET, MTIMECMP_LO_OFFSET, MTIMECTRL_HI_OFFSET, MTIMECTRL_LO_OFFSET,
    MTIME_HI_OFFSET, MTIME_LO_OFFSET, TIMER_BASE,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Prescaler divisor: ticks per mtime increment (0 disables the timer)
    #[arg(long, default_value_t = 10)]
    divisor: u64,

    /// mtimecmp value at which the timer interrupt fires
    #[arg(long, default_value_t = 100)]
    compare: u64,

    /// Initial mtime value
    #[arg(long, default_value_t = 0)]
    mtime: u64,

    /// Number of simulation steps to run
    #[arg(long, default_value_t = 2000)]
    steps: u64,

    /// Number of harts to create (the timer attaches to hart 0)
    #[arg(long, default_value_t = 1)]
    harts: usize,

    /// Leave mstatus.MIE clear
    #[arg(long)]
    no_mie: bool,

    /// Leave mie.MTIE clear
    #[arg(long)]
    no_mtie: bool,

    /// Hex dump the register window after the run
    #[arg(long)]
    dump: bool,
}

/// Program a split register the way guest software would: low half first.
fn write_split(bus: &mut dyn Bus, lo: u64, hi: u64, val: u64) -> Result<(), mtimer::Trap> {
    bus.write32(TIMER_BASE + lo, val as u32)?;
    bus.write32(TIMER_BASE + hi, (val >> 32) as u32)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut machine = Machine::new(args.harts);
    machine.attach_timer(Timer::new());

    let hart = machine.hart(0).ok_or("No hart 0")?;
    hart.set_global_interrupts(!args.no_mie);
    hart.set_timer_interrupt_enable(!args.no_mtie);

    let bus = machine.bus_mut().ok_or("Timer is not mapped")?;
    write_split(bus, MTIME_LO_OFFSET, MTIME_HI_OFFSET, args.mtime)?;
    write_split(bus, MTIMECMP_LO_OFFSET, MTIMECMP_HI_OFFSET, args.compare)?;
    write_split(bus, MTIMECTRL_LO_OFFSET, MTIMECTRL_HI_OFFSET, args.divisor)?;

    println!(
        "Running {} steps: divisor={} mtimecmp={} mtime={}",
        args.steps, args.divisor, args.compare, args.mtime
    );

    let mut first_fire = None;
    for step in 0..args.steps {
        let (fired, _) = machine.step();
        if fired && first_fire.is_none() {
            first_fire = Some(step + 1);
            log::info!("Timer interrupt raised at step {}", step + 1);
        }
    }

    let bus = machine.bus_mut().ok_or("Timer is not mapped")?;
    println!("Final mtime: {}", bus.timer.mtime());
    println!("MTIP pending: {}", hart.timer_pending());
    match first_fire {
        Some(step) => println!("First timer interrupt at step {}", step),
        None => println!("Timer interrupt never fired"),
    }

    if args.dump {
        let window = bus.dump_timer()?;
        for (i, chunk) in window.chunks(4).enumerate() {
            println!("  +0x{:02x}: {}", i * 4, hex::encode(chunk));
        }
    }

    Ok(())
}
