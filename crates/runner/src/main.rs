use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;
use types::{Exception, MachineState, Register};
use vm::VM;

/// Run a FONZ image, printing the registers after every step
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the binary image
    image: PathBuf,

    /// Trace every executed instruction to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Give up after this many steps
    #[arg(long)]
    max_steps: Option<u64>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut vm = VM::new();
    vm.cpu.verbose = args.verbose;
    vm.load_file(&args.image)
        .with_context(|| format!("couldn't load {}", args.image.display()))?;
    tracing::info!(image = %args.image.display(), "starting");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let state = drive(&mut vm, &mut out, args.max_steps).context("failed to write output")?;
    tracing::info!(%state, ip = vm.register(Register::Ip), "finished");

    if state == MachineState::Exception {
        eprint!("{} {}", "exception:".yellow().bold(), exception_report(&vm));
    }
    Ok(())
}

/// Names of the raised exceptions, IP, and the bytes at IP.
fn exception_report(vm: &VM) -> String {
    let ex = vm.register(Register::Ex);
    let ip = vm.register(Register::Ip) as usize;
    let names: Vec<&str> = Exception::decompose(ex).map(|e| e.name()).collect();
    format!(
        "{} at ip={}\n{}",
        names.join(", "),
        ip,
        vm.dump_memory(ip, ip + 16)
    )
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,vm=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Step until the machine leaves `Ok`, writing a snapshot line after every
/// step and a final `state=<code>` line.
fn drive<W: Write>(vm: &mut VM, out: &mut W, max_steps: Option<u64>) -> io::Result<MachineState> {
    let mut state = MachineState::Undefined;
    let mut steps = 0u64;
    loop {
        if max_steps.is_some_and(|max| steps >= max) {
            break;
        }
        state = vm.step();
        steps += 1;
        writeln!(out, "{}", vm.snapshot())?;
        if state != MachineState::Ok {
            break;
        }
    }
    writeln!(out, "state={}", state.code())?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{DATA_SEGMENT_SIZE, FONZ_MAGIC};

    fn image(code: &[u8]) -> Vec<u8> {
        let mut bytes = FONZ_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; DATA_SEGMENT_SIZE]);
        bytes.extend_from_slice(code);
        bytes
    }

    #[test]
    fn prints_snapshot_per_step() {
        let mut vm = VM::new();
        // mov a0, 5; halt
        vm.load(&image(&[4, 1, 0, 0, 0, 5, 0])[..]).unwrap();
        let mut out = Vec::new();
        let state = drive(&mut vm, &mut out, None).unwrap();
        assert_eq!(state, MachineState::Stopped);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "a0=5, a1=0, a2=0, a3=0, r=0, ip=518, sp=0, fl=0, ex=0",
                "a0=5, a1=0, a2=0, a3=0, r=0, ip=518, sp=0, fl=0, ex=0",
                "state=2",
            ]
        );
    }

    #[test]
    fn exception_state_code() {
        let mut vm = VM::new();
        vm.load(&image(&[0xee])[..]).unwrap();
        let mut out = Vec::new();
        assert_eq!(drive(&mut vm, &mut out, None).unwrap(), MachineState::Exception);
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("ex=32\nstate=1\n"));
    }

    #[test]
    fn exception_report_shows_bytes_at_ip() {
        let mut vm = VM::new();
        vm.load(&image(&[4, 1, 0, 0, 0, 5, 0xee, 7])[..]).unwrap();
        let mut out = Vec::new();
        assert_eq!(drive(&mut vm, &mut out, None).unwrap(), MachineState::Exception);
        let report = exception_report(&vm);
        let name = Exception::InvalidOpCode.name();
        assert!(report.starts_with(&format!("{} at ip=518\n", name)), "{}", report);
        assert!(report.contains("0206  ee07"), "{}", report);
    }

    #[test]
    fn step_budget() {
        let mut vm = VM::new();
        // call 512 forever, stopped by the budget before overflowing
        vm.load(&image(&[39, 0, 0, 2, 0])[..]).unwrap();
        let mut out = Vec::new();
        assert_eq!(drive(&mut vm, &mut out, Some(3)).unwrap(), MachineState::Ok);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 4);
    }

    #[test]
    fn args_need_exactly_one_image() {
        assert!(Args::try_parse_from(["fonz"]).is_err());
        assert!(Args::try_parse_from(["fonz", "a.bin", "b.bin"]).is_err());
        let args = Args::try_parse_from(["fonz", "a.bin", "--max-steps", "9"]).unwrap();
        assert_eq!(args.max_steps, Some(9));
        assert!(!args.verbose);
    }

    #[test]
    fn load_failure_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.fonz");
        std::fs::write(&path, &FONZ_MAGIC).unwrap();
        let mut vm = VM::new();
        let err = vm
            .load_file(&path)
            .with_context(|| format!("couldn't load {}", path.display()))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("data segment truncated"));
    }
}
