use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tinycoap_tools::{
    collect_message_entries, decode_message_json, encode_message_json, format_decode_pretty,
    inspect_message, sort_by_size, to_hex, InspectReport,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tinycoap-tools",
    version,
    about = "tinycoap message inspection, decoding and encoding tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect message structure and sizes.
    Inspect {
        /// Path to a message file or a directory of message files.
        message_path: PathBuf,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Sort inspected messages.
        #[arg(long, value_enum)]
        sort: Option<InspectSort>,
        /// Limit the number of inspected messages (after sorting).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Decode a message into structured output.
    Decode {
        /// Path to the message bytes.
        message_file: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DecodeFormat::Json)]
        format: DecodeFormat,
    },
    /// Encode a JSON message description.
    Encode {
        /// Path to the message JSON.
        json_file: PathBuf,
        /// Write the bytes here instead of printing them as hex.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectSort {
    Size,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DecodeFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let limits = wire::Limits::default();
    match cli.command {
        Command::Inspect {
            message_path,
            glob,
            sort,
            limit,
        } => {
            if message_path.is_dir() {
                let mut entries = collect_message_entries(&message_path, glob.as_deref())?;
                if let Some(InspectSort::Size) = sort {
                    sort_by_size(&mut entries);
                }
                let limit = limit.or(sort.map(|InspectSort::Size| 10));
                if let Some(limit) = limit {
                    entries.truncate(limit);
                }
                tracing::debug!(count = entries.len(), "inspecting directory");
                for entry in entries {
                    let bytes = read_message(&entry.path)?;
                    println!("== {} ({} bytes) ==", entry.path.display(), entry.size);
                    match inspect_message(&bytes, &limits) {
                        Ok(report) => print_inspect_report(&report),
                        Err(err) => println!("error: {err:#}"),
                    }
                }
            } else {
                let bytes = read_message(&message_path)?;
                let report = inspect_message(&bytes, &limits)?;
                print_inspect_report(&report);
            }
        }
        Command::Decode {
            message_file,
            format,
        } => {
            let bytes = read_message(&message_file)?;
            match format {
                DecodeFormat::Json => {
                    let output = decode_message_json(&bytes, &limits)?;
                    let json = serde_json::to_string_pretty(&output).context("serialize json")?;
                    println!("{json}");
                }
                DecodeFormat::Pretty => {
                    let msg = wire::decode_with_limits(&bytes, &limits).context("decode message")?;
                    println!("{}", format_decode_pretty(&msg));
                }
            }
        }
        Command::Encode { json_file, out } => {
            let json = fs::read_to_string(&json_file)
                .with_context(|| format!("read message json {}", json_file.display()))?;
            let bytes = encode_message_json(&json)?;
            match out {
                Some(path) => {
                    fs::write(&path, &bytes)
                        .with_context(|| format!("write message {}", path.display()))?;
                    println!("wrote {} bytes to {}", bytes.len(), path.display());
                }
                None => println!("{}", to_hex(&bytes)),
            }
        }
    }
    Ok(())
}

fn read_message(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read message {}", path.display()))
}

fn print_inspect_report(report: &InspectReport) {
    println!(
        "type: {} code: {} ({}.{:02}) id: 0x{:04x}",
        report.message_type,
        report.code,
        report.code.class(),
        report.code.detail(),
        report.message_id
    );
    println!(
        "token: {} ({} bytes) total: {} bytes",
        to_hex(&report.token),
        report.token.len(),
        report.total_len
    );
    if report.options.is_empty() {
        println!("options: none");
    } else {
        println!("options:");
        for option in &report.options {
            println!(
                "  {:>3} {:<16} {:>4} bytes  {}",
                option.id, option.name, option.encoded_len, option.value
            );
        }
    }
    println!("payload: {} bytes", report.payload_len);
}
