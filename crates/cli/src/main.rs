//! APEX cycle-accurate simulator CLI.
//!
//! Command dispatch around the core simulation loop. It performs:
//! 1. **Batch run:** Execute a listing to HALT or a cycle budget.
//! 2. **Trace run:** Same, printing per-cycle stage-latch contents.
//! 3. **Single-step:** One cycle per keypress with full trace output.
//! 4. **Memory query:** Run to completion, then print one memory cell.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use apex_core::sim::loader;
use apex_core::{Config, Cpu, Instruction, Simulator, StopReason};

#[derive(Parser, Debug)]
#[command(
    name = "apex",
    version,
    about = "APEX cycle-accurate pipeline simulator",
    long_about = "Simulate an APEX instruction listing through the pipelined core.\n\nExamples:\n  apex simulate programs/input.asm\n  apex display programs/input.asm --cycles 50\n  apex single-step programs/input.asm\n  apex show-mem programs/input.asm 10"
)]
struct Cli {
    /// JSON configuration file overriding machine defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run to HALT (or a cycle budget) and print the final state.
    Simulate {
        /// Instruction listing to execute.
        file: PathBuf,
        /// Stop after this many cycles.
        #[arg(long)]
        cycles: Option<u64>,
    },

    /// Run with a per-cycle trace of every stage latch.
    Display {
        /// Instruction listing to execute.
        file: PathBuf,
        /// Stop after this many cycles.
        #[arg(long)]
        cycles: Option<u64>,
    },

    /// Advance one cycle per keypress, tracing each (q quits).
    SingleStep {
        /// Instruction listing to execute.
        file: PathBuf,
    },

    /// Run to completion, then print a single data-memory cell.
    ShowMem {
        /// Instruction listing to execute.
        file: PathBuf,
        /// Data-memory address to display.
        address: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("apex: {message}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Simulate { file, cycles } => cmd_run(&file, cycles, &config, false),
        Commands::Display { file, cycles } => cmd_run(&file, cycles, &config, true),
        Commands::SingleStep { file } => cmd_single_step(&file, &config),
        Commands::ShowMem { file, address } => cmd_show_mem(&file, address, &config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("apex: {message}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config, String> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read `{}`: {e}", path.display()))?;
    Config::from_json(&text).map_err(|e| format!("bad config `{}`: {e}", path.display()))
}

fn load_simulator(file: &std::path::Path, config: &Config) -> Result<Simulator, String> {
    let program = loader::load_program(file).map_err(|e| e.to_string())?;
    Ok(Simulator::new(program, config))
}

fn cmd_run(
    file: &std::path::Path,
    cycles: Option<u64>,
    config: &Config,
    trace: bool,
) -> Result<(), String> {
    let mut sim = load_simulator(file, config)?;
    let reason = loop {
        if let Some(limit) = cycles {
            if sim.cpu.clock >= limit {
                break StopReason::CycleLimit;
            }
        }
        if trace {
            print_cycle_header(&sim.cpu);
            print_stages(&sim.cpu);
        }
        if sim.tick().map_err(|e| e.to_string())? {
            break StopReason::Halted;
        }
    };
    print_final_state(&sim.cpu, reason);
    Ok(())
}

fn cmd_single_step(file: &std::path::Path, config: &Config) -> Result<(), String> {
    let mut sim = load_simulator(file, config)?;
    let stdin = std::io::stdin();
    let mut line = String::new();
    let reason = loop {
        print_cycle_header(&sim.cpu);
        print_stages(&sim.cpu);
        if sim.tick().map_err(|e| e.to_string())? {
            break StopReason::Halted;
        }

        print!("Press <Enter> to advance the clock or q to quit: ");
        std::io::stdout().flush().ok();
        line.clear();
        if stdin.lock().read_line(&mut line).is_err() || line.trim().eq_ignore_ascii_case("q") {
            break StopReason::CycleLimit;
        }
    };
    print_final_state(&sim.cpu, reason);
    Ok(())
}

fn cmd_show_mem(file: &std::path::Path, address: usize, config: &Config) -> Result<(), String> {
    let mut sim = load_simulator(file, config)?;
    let reason = sim.run(None).map_err(|e| e.to_string())?;
    match sim.cpu.data_memory.get(address) {
        Some(value) => println!("MEM[{address}] = {value}"),
        None => println!(
            "MEM[{address}] is outside data memory ({} words)",
            sim.cpu.data_memory.len()
        ),
    }
    print_summary(&sim.cpu, reason);
    Ok(())
}

fn print_cycle_header(cpu: &Cpu) {
    println!("--------------------------------------------");
    println!("Clock Cycle #: {}", cpu.clock);
    println!("--------------------------------------------");
}

fn print_stages(cpu: &Cpu) {
    print_stage("Fetch", cpu.fetch.pc, cpu.fetch.instr);
    print_stage("Decode/RF", cpu.decode.pc, cpu.decode.instr);
    print_stage("Integer FU", cpu.integer.pc, cpu.integer.instr);
    print_stage("Multiplier FU", cpu.multiplier.pc, cpu.multiplier.instr);
    print_stage("Load/Store FU", cpu.load_store.pc, cpu.load_store.instr);
    print_stage("Writeback", cpu.writeback.pc, cpu.writeback.instr);
}

fn print_stage(name: &str, pc: u64, instr: Option<Instruction>) {
    match instr {
        Some(instr) => println!("{name:<15}: pc({pc}) {instr}"),
        None => println!("{name:<15}: <empty>"),
    }
}

fn print_final_state(cpu: &Cpu, reason: StopReason) {
    println!("----------");
    println!("Registers:");
    println!("----------");
    for (reg, value) in cpu.regs.iter().enumerate() {
        print!("R{reg:<3}[{value:<4}] ");
        if reg % 8 == 7 {
            println!();
        }
    }
    println!("----------");
    println!("Data Memory (non-zero):");
    println!("----------");
    for (addr, value) in cpu.data_memory.iter().enumerate().filter(|(_, v)| **v != 0) {
        print!("MEM[{addr}]={value} ");
    }
    println!();
    print_summary(cpu, reason);
}

fn print_summary(cpu: &Cpu, reason: StopReason) {
    let outcome = match reason {
        StopReason::Halted => "Simulation Complete",
        StopReason::CycleLimit => "Simulation Stopped",
    };
    println!(
        "APEX: {outcome}, cycles = {} instructions = {}",
        cpu.clock,
        cpu.retired()
    );
}
