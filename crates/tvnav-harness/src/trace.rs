#![forbid(unsafe_code)]

//! Key-trace record and replay.
//!
//! A trace is JSONL with two record kinds:
//!
//! ```text
//! {"event":"key","code":39}
//! {"event":"check","active":"Basic","focused":1,"checksum":"9a3c...16 hex"}
//! ```
//!
//! `check` records pin the active menu, its focused index and an FNV-1a
//! checksum over every menu's marker state. Replaying a trace into a freshly
//! built navigator must reproduce every checkpoint exactly.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Malformed line or unknown event | `InvalidData` naming the line |
//! | Checkpoint mismatch | `InvalidData` with expected and actual values |
//! | Trace without checkpoints | `InvalidData` |

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use serde_json::{Value, json};
use tracing::debug;
use tvnav_core::KeyCode;
use tvnav_focus::FocusEngine;
use tvnav_input::Navigator;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Result summary for a replay run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub keys: usize,
    pub checks: usize,
    pub last_checksum: Option<u64>,
}

/// Focus state pinned by a `check` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub active: Option<String>,
    pub focused: Option<usize>,
    pub checksum: u64,
}

impl Checkpoint {
    /// Capture the engine's current state.
    #[must_use]
    pub fn capture(engine: &FocusEngine) -> Self {
        Self {
            active: engine.active_menu_name().map(str::to_string),
            focused: engine.active_menu().and_then(|m| m.focused_index()),
            checksum: focus_checksum(engine),
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "event": "check",
            "active": self.active,
            "focused": self.focused,
            "checksum": format!("{:016x}", self.checksum),
        })
    }
}

/// FNV-1a over menu names (sorted), the active flag, focused index and each
/// item's marker bits.
#[must_use]
pub fn focus_checksum(engine: &FocusEngine) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    let active = engine.active_menu_name();
    for name in engine.menu_names() {
        let Some(menu) = engine.get_menu(name) else {
            continue;
        };
        let len = u32::try_from(name.len()).unwrap_or(u32::MAX);
        fnv1a_update(&mut hash, &len.to_le_bytes());
        fnv1a_update(&mut hash, name.as_bytes());
        fnv1a_update(&mut hash, &[u8::from(active == Some(name))]);
        let focused = menu
            .focused_index()
            .map_or(u64::MAX, |i| u64::try_from(i).unwrap_or(u64::MAX));
        fnv1a_update(&mut hash, &focused.to_le_bytes());
        let items = u32::try_from(menu.len()).unwrap_or(u32::MAX);
        fnv1a_update(&mut hash, &items.to_le_bytes());
        for index in 0..menu.len() {
            fnv1a_update(&mut hash, &[menu.marks(index).bits()]);
        }
    }
    hash
}

fn fnv1a_update(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(FNV_PRIME);
    }
}

/// Records key presses and checkpoints while driving a navigator.
#[derive(Debug, Default)]
pub struct TraceRecorder {
    lines: Vec<String>,
}

impl TraceRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch `code` and record it.
    pub fn press(&mut self, nav: &mut Navigator, code: impl Into<KeyCode>) {
        let code = code.into();
        nav.handle_key(code);
        self.lines
            .push(json!({ "event": "key", "code": code.value() }).to_string());
    }

    /// Record the navigator's current focus state.
    pub fn checkpoint(&mut self, nav: &Navigator) -> Checkpoint {
        let checkpoint = Checkpoint::capture(nav.engine());
        self.lines.push(checkpoint.to_json().to_string());
        checkpoint
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The trace as JSONL text.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.to_jsonl().as_bytes())?;
        file.flush()
    }
}

/// Replay a trace file into `nav`.
pub fn replay_key_trace(path: impl AsRef<Path>, nav: &mut Navigator) -> io::Result<ReplaySummary> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let summary = replay_lines(reader, nav)?;
    debug!(
        path = %path.display(),
        keys = summary.keys,
        checks = summary.checks,
        "key trace replayed"
    );
    Ok(summary)
}

/// Replay JSONL from any reader into `nav`.
pub fn replay_lines(reader: impl BufRead, nav: &mut Navigator) -> io::Result<ReplaySummary> {
    let mut keys = 0usize;
    let mut checks = 0usize;
    let mut last_checksum = None;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let line_no = line_idx + 1;
        let value: Value = serde_json::from_str(trimmed).map_err(|err| {
            invalid(format!("invalid JSONL at line {line_no}: {err}"))
        })?;
        let Some(event) = value.get("event").and_then(Value::as_str) else {
            return Err(invalid(format!("missing event at line {line_no}")));
        };

        match event {
            "key" => {
                let code = parse_u64(&value, "code")?;
                let code = u32::try_from(code)
                    .map_err(|_| invalid(format!("code out of range at line {line_no}")))?;
                nav.handle_key(code);
                keys += 1;
            }
            "check" => {
                let expected = Checkpoint {
                    active: parse_optional_str(&value, "active"),
                    focused: parse_optional_usize(&value, "focused")?,
                    checksum: parse_hex_u64(parse_str(&value, "checksum")?)?,
                };
                let actual = Checkpoint::capture(nav.engine());
                if actual != expected {
                    return Err(invalid(format!(
                        "checkpoint mismatch at line {line_no}: expected active={:?} focused={:?} checksum={:016x}, got active={:?} focused={:?} checksum={:016x}",
                        expected.active,
                        expected.focused,
                        expected.checksum,
                        actual.active,
                        actual.focused,
                        actual.checksum,
                    )));
                }
                checks += 1;
                last_checksum = Some(actual.checksum);
            }
            other => {
                return Err(invalid(format!("unknown event {other} at line {line_no}")));
            }
        }
    }

    if checks == 0 {
        return Err(invalid("no check records found".to_string()));
    }

    Ok(ReplaySummary {
        keys,
        checks,
        last_checksum,
    })
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

fn parse_u64(value: &Value, field: &str) -> io::Result<u64> {
    value
        .get(field)
        .and_then(Value::as_u64)
        .ok_or_else(|| invalid(format!("missing {field}")))
}

fn parse_str<'a>(value: &'a Value, field: &str) -> io::Result<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(format!("missing {field}")))
}

fn parse_optional_str(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn parse_optional_usize(value: &Value, field: &str) -> io::Result<Option<usize>> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| invalid(format!("{field} must be a non-negative integer"))),
    }
}

fn parse_hex_u64(value: &str) -> io::Result<u64> {
    let trimmed = value.trim().trim_start_matches("0x");
    if trimmed.len() != 16 {
        return Err(invalid(format!(
            "checksum must be 16 hex chars, got {value}"
        )));
    }
    u64::from_str_radix(trimmed, 16)
        .map_err(|err| invalid(format!("invalid checksum {value}: {err}")))
}
