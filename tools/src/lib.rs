//! Inspection, decoding and encoding tools for tinycoap messages.
//!
//! This crate backs the `tinycoap-tools` binary:
//!
//! - Summarize a message's header, options and payload
//! - Decode a message into JSON or a readable text form
//! - Encode a JSON message description into wire bytes
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what is on the wire.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use serde::Serialize;
use wire::{Code, Limits, Message, MessageType};

/// Structural summary of one encoded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub total_len: usize,
    pub message_type: MessageType,
    pub code: Code,
    pub message_id: u16,
    pub token: Vec<u8>,
    pub options: Vec<OptionSummary>,
    pub payload_len: usize,
}

/// One decoded option entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSummary {
    pub id: u8,
    pub name: String,
    pub encoded_len: usize,
    pub value: String,
}

/// Decodes `bytes` and summarizes the result.
pub fn inspect_message(bytes: &[u8], limits: &Limits) -> Result<InspectReport> {
    let msg = wire::decode_with_limits(bytes, limits).context("decode message")?;
    let options = msg
        .options()
        .iter()
        .map(|opt| OptionSummary {
            id: opt.id.0,
            name: opt.id.to_string(),
            encoded_len: opt.value.encoded_len(),
            value: opt.value.to_string(),
        })
        .collect();
    Ok(InspectReport {
        total_len: bytes.len(),
        message_type: msg.message_type,
        code: msg.code,
        message_id: msg.message_id,
        token: msg.token,
        options,
        payload_len: msg.payload.len(),
    })
}

/// Decodes `bytes` into a JSON value of the message.
pub fn decode_message_json(bytes: &[u8], limits: &Limits) -> Result<serde_json::Value> {
    let msg = wire::decode_with_limits(bytes, limits).context("decode message")?;
    serde_json::to_value(&msg).context("serialize message")
}

/// Renders a message as indented text.
pub fn format_decode_pretty(msg: &Message) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} id=0x{:04x} token={}",
        msg.message_type,
        msg.code,
        msg.message_id,
        to_hex(&msg.token)
    );
    let path = msg.path_string();
    if !path.is_empty() {
        let _ = writeln!(out, "path: /{path}");
    }
    for opt in msg.options() {
        let _ = writeln!(out, "  {:<16} {}", opt.id.to_string(), opt.value);
    }
    if msg.payload.is_empty() {
        out.push_str("payload: none");
    } else {
        match std::str::from_utf8(&msg.payload) {
            Ok(text) => {
                let _ = write!(out, "payload ({} bytes): {text}", msg.payload.len());
            }
            Err(_) => {
                let _ = write!(
                    out,
                    "payload ({} bytes): 0x{}",
                    msg.payload.len(),
                    to_hex(&msg.payload)
                );
            }
        }
    }
    out
}

/// Parses a JSON message description and encodes it.
pub fn encode_message_json(json: &str) -> Result<Vec<u8>> {
    let mut msg: Message = serde_json::from_str(json).context("parse message json")?;
    let bytes = wire::encode(&mut msg).context("encode message")?;
    tracing::debug!(len = bytes.len(), options = msg.options().len(), "encoded message");
    Ok(bytes)
}

/// Lowercase hex without separators.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// A message file found while scanning a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    pub path: PathBuf,
    pub size: u64,
}

/// Lists the regular files of `dir`, keeping those whose path or file name
/// matches `glob`.
pub fn collect_message_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<MessageEntry>> {
    let pattern = glob
        .map(|value| Pattern::new(value).context("invalid glob pattern"))
        .transpose()?;

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                tracing::trace!(path = %path.display(), "skipping unmatched file");
                continue;
            }
        }
        let size = entry.metadata()?.len();
        entries.push(MessageEntry { path, size });
    }
    Ok(entries)
}

/// Sorts entries largest first, then by path.
pub fn sort_by_size(entries: &mut [MessageEntry]) {
    entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
}
