use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct CanvasDef {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct FpsDef {
    pub(crate) num: u32,
    #[serde(default = "one")]
    pub(crate) den: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PatchDef {
    pub(crate) canvas: CanvasDef,
    #[serde(default)]
    pub(crate) fps: Option<FpsDef>,
    /// Explicit buffer set; absent means "register whatever is mentioned".
    #[serde(default)]
    pub(crate) buffers: Option<Vec<String>>,
    /// Presented buffer; absent means `primary`.
    #[serde(default)]
    pub(crate) render: Option<String>,
    pub(crate) outputs: Vec<OutputDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct OutputDef {
    #[serde(default)]
    pub(crate) buffer: Option<String>,
    pub(crate) chain: Vec<CallDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CallDef {
    pub(crate) op: String,
    #[serde(default)]
    pub(crate) args: Vec<ArgDef>,
}

/// One call argument.
///
/// Strings starting with `=` are time expressions; any other string names a buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum ArgDef {
    Number(f64),
    Text(String),
    Buffer {
        buffer: String,
        #[serde(default)]
        strength: Option<f64>,
    },
    Chain {
        chain: Vec<CallDef>,
    },
}
