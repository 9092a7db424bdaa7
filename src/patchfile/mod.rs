//! JSON patch files.
//!
//! ```json
//! {
//!   "canvas": { "width": 640, "height": 360 },
//!   "fps": { "num": 30 },
//!   "outputs": [
//!     { "buffer": "o1", "chain": [{ "op": "shape", "args": [4, 0.5, 0] }] },
//!     { "chain": [
//!         { "op": "osc", "args": [10, "=sin(time) * 0.1"] },
//!         { "op": "modulate", "args": [{ "buffer": "o1", "strength": 0.5 }, 0.1] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Two-input operators take their second input as the first argument: a call chain
//! (`{"chain": [...]}`), a buffer name, or a `{"buffer", "strength"}` object.

pub(crate) mod convert;
pub(crate) mod model;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{LoopwaveError, LoopwaveResult};
use crate::graph::patch::Patch;
use crate::patchfile::model::PatchDef;

/// Parsed, not yet validated, patch file.
#[derive(Debug, Clone)]
pub struct PatchFile {
    def: PatchDef,
}

impl PatchFile {
    /// Parse a patch from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LoopwaveResult<Self> {
        let def: PatchDef = serde_json::from_reader(r)
            .map_err(|e| LoopwaveError::serde(format!("parse patch JSON: {e}")))?;
        Ok(Self { def })
    }

    /// Parse a patch from a JSON string.
    pub fn from_json(s: &str) -> LoopwaveResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a patch from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LoopwaveResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LoopwaveError::configuration(format!("open patch JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Number of outputs declared in the file.
    pub fn output_count(&self) -> usize {
        self.def.outputs.len()
    }

    /// Build and validate the patch. Every configuration error surfaces here.
    pub fn to_patch(&self) -> LoopwaveResult<Patch> {
        convert::to_patch(&self.def)
    }
}
