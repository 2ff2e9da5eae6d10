use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use arm7_lut::decoder::Decoder;
use arm7_lut::disasm::{fmt_arm, fmt_thumb};
use arm7_lut::fields::Condition;
use arm7_lut::formats::{arm_desc, thumb_desc};
use arm7_lut::isa::arm::ArmDecoder;
use arm7_lut::isa::thumb::ThumbDecoder;
use arm7_lut::{DecodeTables, LutConfig};

mod image;
use image::{load_raw_bin, read_u16, read_u32, Image};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect the ARM7TDMI decode tables", long_about = None)]
struct Cli {
    /// Threads used to build the tables (overrides --config)
    #[arg(long)]
    workers: Option<usize>,
    /// JSON file with a LutConfig
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Entry counts per format and number of distinct handlers
    Stats,
    /// Print every table entry
    Dump {
        #[arg(long, value_enum)]
        mode: Mode,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<String>,
    },
    /// Classify a single instruction word
    Decode {
        /// Instruction word (hex or dec)
        word: String,
        #[arg(long, value_enum)]
        mode: Mode,
    },
    /// List a range [start, end) of a raw binary
    Range {
        /// Input binary path
        #[arg(value_name = "BINFILE")]
        input: String,
        #[arg(long, value_enum)]
        mode: Mode,
        /// Load address for the binary (hex or dec)
        #[arg(long, default_value = "0")]
        base: String,
        /// Skip N bytes at start of file before loading
        #[arg(long, default_value_t = 0usize)]
        skip: usize,
        /// Limit bytes loaded (default: to EOF after --skip)
        #[arg(long)]
        len: Option<usize>,
        /// Start address (hex or dec)
        start: String,
        /// End address (hex or dec, exclusive)
        end: String,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Thumb,
    Arm,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_u32(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

fn load_config(path: Option<&Path>, workers: Option<usize>) -> Result<LutConfig> {
    let mut cfg = match path {
        Some(p) => {
            let txt = std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            serde_json::from_str(&txt).with_context(|| format!("parsing {}", p.display()))?
        }
        None => LutConfig::default(),
    };
    if let Some(w) = workers {
        cfg.workers = w;
    }
    Ok(cfg)
}

fn emit(out: Option<String>, text: String) -> Result<()> {
    if let Some(path) = out {
        std::fs::write(&path, text).with_context(|| format!("writing {path}"))?;
        info!(%path, "output written");
    } else {
        print!("{text}");
    }
    Ok(())
}

fn render_stats(t: &DecodeTables) -> String {
    let mut buf = String::new();
    let _ = writeln!(buf, "THUMB: {} entries, {} handlers", t.thumb_table().len(), t.distinct_thumb());
    for (format, count) in t.thumb_histogram() {
        let d = thumb_desc(format);
        let _ = writeln!(buf, "  {:<9} {:<40} {count:>5}", d.label, d.name);
    }
    let _ = writeln!(buf, "ARM: {} entries, {} handlers", t.arm_table().len(), t.distinct_arm());
    for (format, count) in t.arm_histogram() {
        let d = arm_desc(format);
        let _ = writeln!(buf, "  {:<9} {:<40} {count:>5}", d.label, d.name);
    }
    buf
}

fn thumb_line(t: &DecodeTables, index: usize) -> String {
    let instr = t.lookup_thumb(index);
    format!(
        "{index:#05x}  {:#06x}  {:<9} {}",
        ThumbDecoder::reconstruct(index),
        thumb_desc(instr.format()).label,
        fmt_thumb(&instr)
    )
}

fn arm_line(t: &DecodeTables, index: usize) -> String {
    let instr = t.lookup_arm(index);
    format!(
        "{index:#05x}  {:#010x}  {:<9} {}",
        ArmDecoder::reconstruct(index),
        arm_desc(instr.format()).label,
        fmt_arm(&instr)
    )
}

fn render_dump(t: &DecodeTables, mode: Mode, format: OutputFormat) -> Result<String> {
    Ok(match (mode, format) {
        (Mode::Thumb, OutputFormat::Json) => serde_json::to_string_pretty(t.thumb_table())?,
        (Mode::Arm, OutputFormat::Json) => serde_json::to_string_pretty(t.arm_table())?,
        (Mode::Thumb, OutputFormat::Text) => {
            let mut buf = String::new();
            for index in 0..ThumbDecoder::TABLE_LEN {
                let _ = writeln!(buf, "{}", thumb_line(t, index));
            }
            buf
        }
        (Mode::Arm, OutputFormat::Text) => {
            let mut buf = String::new();
            for index in 0..ArmDecoder::TABLE_LEN {
                let _ = writeln!(buf, "{}", arm_line(t, index));
            }
            buf
        }
    })
}

fn describe(t: &DecodeTables, mode: Mode, word: u32) -> Result<String> {
    match mode {
        Mode::Thumb => {
            anyhow::ensure!(word <= 0xFFFF, "{word:#x} is not a 16-bit THUMB instruction");
            let index = ThumbDecoder::index_of(word as u16);
            Ok(format!("{}\n{:?}", thumb_line(t, index), t.lookup_thumb(index)))
        }
        Mode::Arm => {
            let index = ArmDecoder::index_of(word);
            let cond = Condition::from_bits(word >> 28);
            Ok(format!("{}\ncondition {cond:?}\n{:?}", arm_line(t, index), t.lookup_arm(index)))
        }
    }
}

fn render_range(t: &DecodeTables, img: &Image, mode: Mode, start: u32, end: u32) -> Result<String> {
    anyhow::ensure!(end >= start, "end must be >= start");
    let width = if mode == Mode::Thumb { 2 } else { 4 };
    anyhow::ensure!(start % width == 0, "start {start:#x} is not {width}-byte aligned");

    let mut buf = String::new();
    let mut pc = start;
    while pc < end {
        match mode {
            Mode::Thumb => {
                let Some(raw) = read_u16(img, pc) else {
                    let _ = writeln!(buf, "{pc:#010x}: <oob>");
                    break;
                };
                let _ = writeln!(buf, "{pc:#010x}: {raw:04x}      {}", fmt_thumb(&t.decode_thumb(raw)));
            }
            Mode::Arm => {
                let Some(raw) = read_u32(img, pc) else {
                    let _ = writeln!(buf, "{pc:#010x}: <oob>");
                    break;
                };
                let cond = Condition::from_bits(raw >> 28).suffix();
                let _ = writeln!(buf, "{pc:#010x}: {raw:08x}  {cond:<2}  {}", fmt_arm(&t.decode_arm(raw)));
            }
        }
        pc = pc.wrapping_add(width);
    }
    Ok(buf)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref(), cli.workers)?;
    let tables = DecodeTables::build_with(&cfg);

    match cli.cmd {
        Command::Stats => print!("{}", render_stats(&tables)),
        Command::Dump { mode, format, out } => emit(out, render_dump(&tables, mode, format)?)?,
        Command::Decode { word, mode } => println!("{}", describe(&tables, mode, parse_u32(&word)?)?),
        Command::Range { input, mode, base, skip, len, start, end, out } => {
            let img = load_raw_bin(Path::new(&input), parse_u32(&base)?, skip, len)?;
            info!(base = img.base, end = img.end(), "image loaded");
            let listing = render_range(&tables, &img, mode, parse_u32(&start)?, parse_u32(&end)?)?;
            emit(out, listing)?;
        }
    }

    Ok(())
}
