//! IO modules - the replay driver's inputs and outputs
//!
//! - `script` - JSONL UI event scripts and replay runners
//! - `snapshot` - serializable controller state for the rendering boundary
//! - `egress` - JSONL snapshot writer (file or stdout)

pub mod egress;
pub mod script;
pub mod snapshot;

pub use egress::SnapshotWriter;
pub use script::{load_script, run_realtime, run_virtual, ReplayReport, UiEvent};
pub use snapshot::StateSnapshot;
