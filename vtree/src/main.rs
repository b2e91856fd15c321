mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use output::{EncodeOutput, EntriesOutput, EntryInfo, ModeOutput, OutputWriter, TypeOfOutput};
use serde::Deserialize;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use vtree_core::{
    EntryType, Hash20, ObjectId, PathComponent, Platform, TreeEntry, deserialize_entries,
    scan_dir, serialize_entries,
};

/// vtree - inspect serialized tree entries
#[derive(Parser)]
#[command(name = "vtree")]
#[command(about = "Inspect and build serialized tree entries", long_about = None)]
#[command(version)]
struct Cli {
    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Mode table for presenting entries: posix, windows, or native
    #[arg(long, global = true, default_value = "native")]
    platform: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode back-to-back tree entries
    Decode {
        /// Input file ("-" or omitted for stdin)
        input: Option<PathBuf>,

        /// Input is hex text instead of raw bytes
        #[arg(long)]
        hex: bool,
    },

    /// Encode tree entries from a JSON array
    Encode {
        /// Input file ("-" or omitted for stdin)
        input: Option<PathBuf>,

        /// Write hex text instead of raw bytes
        #[arg(long)]
        hex: bool,
    },

    /// Show the mode bits for an entry type
    Mode {
        /// tree, file, executable, or symlink
        entry_type: String,
    },

    /// Show the entry type for octal mode bits
    TypeOf {
        /// Octal mode, e.g. 100644
        mode: String,
    },

    /// Build entries for the children of a local directory
    Scan {
        /// Directory to scan
        dir: PathBuf,
    },
}

/// An entry as accepted by `encode`.
#[derive(Debug, Deserialize)]
struct EntrySpec {
    #[serde(rename = "type")]
    entry_type: String,
    hash: String,
    name: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    sha1: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    // Log filter: VTREE_LOG env var > "warn" default
    let filter = EnvFilter::try_from_env("VTREE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let out = OutputWriter::new(cli.json);
    if let Err(e) = run(cli, &out) {
        out.write_error(&e, 1);
        std::process::exit(1);
    }
}

fn run(cli: Cli, out: &OutputWriter) -> Result<()> {
    let platform = Platform::parse(&cli.platform)
        .with_context(|| format!("Unknown platform: {}", cli.platform))?;
    tracing::debug!(?platform, "vtree {} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Decode { input, hex } => cmd_decode(out, platform, input.as_deref(), hex),
        Commands::Encode { input, hex } => cmd_encode(out, input.as_deref(), hex),
        Commands::Mode { entry_type } => cmd_mode(out, platform, &entry_type),
        Commands::TypeOf { mode } => cmd_type_of(out, platform, &mode),
        Commands::Scan { dir } => cmd_scan(out, platform, &dir),
    }
}

fn cmd_decode(
    out: &OutputWriter,
    platform: Platform,
    input: Option<&Path>,
    hex: bool,
) -> Result<()> {
    let data = read_input(input, !hex)?;
    let data = if hex {
        let text = String::from_utf8(data).context("Hex input is not UTF-8")?;
        let digits: String = text.split_whitespace().collect();
        hex::decode(&digits).context("Invalid hex input")?
    } else {
        data
    };

    let entries = deserialize_entries(&data).context("Failed to decode tree entries")?;
    write_entries(out, platform, &entries)
}

fn cmd_encode(out: &OutputWriter, input: Option<&Path>, hex: bool) -> Result<()> {
    let data = read_input(input, false)?;
    let specs: Vec<EntrySpec> =
        serde_json::from_slice(&data).context("Failed to parse entries JSON")?;

    let entries = specs
        .into_iter()
        .map(entry_from_spec)
        .collect::<Result<Vec<_>>>()?;
    let bytes = serialize_entries(&entries);

    if out.is_json() {
        let output = EncodeOutput {
            success: true,
            result_code: 0,
            entry_count: entries.len(),
            length: bytes.len(),
            bytes: hex::encode(&bytes),
        };
        out.write(&output, String::new)
    } else if hex {
        out.write_raw(format!("{}\n", hex::encode(&bytes)).as_bytes())
    } else {
        out.write_raw(&bytes)
    }
}

fn cmd_mode(out: &OutputWriter, platform: Platform, entry_type: &str) -> Result<()> {
    let entry_type = parse_entry_type(entry_type)?;
    let mode = format!("{:06o}", platform.mode_from_type(entry_type));

    let output = ModeOutput {
        success: true,
        result_code: 0,
        entry_type: entry_type.to_string(),
        mode: mode.clone(),
    };
    out.write(&output, || format!("{}\n", mode))
}

fn cmd_type_of(out: &OutputWriter, platform: Platform, mode_str: &str) -> Result<()> {
    let mode = u32::from_str_radix(mode_str.trim_start_matches("0o"), 8)
        .with_context(|| format!("Invalid octal mode: {}", mode_str))?;
    let entry_type = platform
        .type_from_mode(mode)
        .ok_or_else(|| vtree_core::Error::unsupported_mode(mode))?;

    let output = TypeOfOutput {
        success: true,
        result_code: 0,
        mode: format!("{:06o}", mode),
        entry_type: entry_type.to_string(),
        type_char: entry_type.type_char(),
    };
    out.write(&output, || format!("{}\n", entry_type))
}

fn cmd_scan(out: &OutputWriter, platform: Platform, dir: &Path) -> Result<()> {
    let entries =
        scan_dir(dir).with_context(|| format!("Failed to scan directory: {}", dir.display()))?;
    write_entries(out, platform, &entries)
}

fn write_entries(out: &OutputWriter, platform: Platform, entries: &[TreeEntry]) -> Result<()> {
    let output = EntriesOutput {
        success: true,
        result_code: 0,
        entries: entries
            .iter()
            .map(|entry| EntryInfo::new(entry, platform))
            .collect(),
    };
    out.write(&output, || {
        output.entries.iter().map(EntryInfo::to_line).collect()
    })
}

/// Read a whole file, or stdin for `None` and "-".
///
/// Binary input is never read from an interactive terminal.
fn read_input(input: Option<&Path>, binary: bool) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    match input {
        Some(path) if path != Path::new("-") => {
            data = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
        }
        _ => {
            if binary && atty::is(atty::Stream::Stdin) {
                anyhow::bail!(
                    "Refusing to read binary entries from a terminal (use --hex or a file)"
                );
            }
            io::stdin()
                .read_to_end(&mut data)
                .context("Failed to read stdin")?;
        }
    }
    Ok(data)
}

fn parse_entry_type(s: &str) -> Result<EntryType> {
    match s.to_ascii_lowercase().as_str() {
        "tree" | "dir" | "d" => Ok(EntryType::Tree),
        "file" | "regular_file" | "f" => Ok(EntryType::RegularFile),
        "executable" | "executable_file" | "x" => Ok(EntryType::ExecutableFile),
        "symlink" | "link" | "l" => Ok(EntryType::Symlink),
        _ => anyhow::bail!("Unknown entry type: {}", s),
    }
}

fn entry_from_spec(spec: EntrySpec) -> Result<TreeEntry> {
    let entry_type = parse_entry_type(&spec.entry_type)?;
    let hash =
        ObjectId::from_hex(&spec.hash).with_context(|| format!("Invalid hash: {}", spec.hash))?;
    let name = PathComponent::new(spec.name)?;

    // Encoding panics on these; report them instead.
    if hash.len() > u16::MAX as usize || name.as_bytes().len() > u16::MAX as usize {
        anyhow::bail!("Hash or name of {} longer than {} bytes", name, u16::MAX);
    }

    let sha1 = spec
        .sha1
        .as_deref()
        .map(Hash20::from_hex)
        .transpose()
        .with_context(|| format!("Invalid sha1 for {}", name))?;

    Ok(TreeEntry::with_aux(hash, name, entry_type, spec.size, sha1))
}
