#![forbid(unsafe_code)]

//! Test harness for tvnav.
//!
//! - [`scene`]: declarative menu scenes with hook-call logging.
//! - [`trace`]: JSONL key traces with focus checkpoints, recorded and replayed.
//!
//! The recording host from `tvnav-core` is re-exported for convenience.

pub mod scene;
pub mod trace;

pub use scene::{HookCall, MenuSpec, Scene, SceneBuilder, keys};
pub use trace::{
    Checkpoint, ReplaySummary, TraceRecorder, focus_checksum, replay_key_trace, replay_lines,
};
pub use tvnav_core::host::testing::RecordingHost;
