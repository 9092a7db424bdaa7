use std::sync::Arc;

use crate::expression::TimeExpr;
use crate::foundation::error::LoopwaveResult;

/// A recoverable failure returned by a time function.
///
/// The resolver substitutes the operator default for the affected parameter and keeps going.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("time function failed: {0}")]
pub struct TimeFnError(String);

impl TimeFnError {
    /// Build an error with a human-readable reason.
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// The reason text.
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Pure function of the tick time. A panic is recovered like a returned [`TimeFnError`].
pub type TimeFn = Arc<dyn Fn(f64) -> Result<f64, TimeFnError> + Send + Sync>;

/// Reference to a named buffer's previous-frame contents.
#[derive(Clone, Debug, PartialEq)]
pub struct BufferRef {
    /// Buffer name, case-sensitive.
    pub name: String,
    /// Gain applied to the sampled color; 1.0 when omitted.
    pub strength: f64,
}

impl BufferRef {
    /// Full-strength reference to `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strength: 1.0,
        }
    }

    /// Same reference with a different gain.
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }
}

impl From<&str> for BufferRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for BufferRef {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Shorthand for [`BufferRef::new`].
pub fn buffer(name: impl Into<String>) -> BufferRef {
    BufferRef::new(name)
}

/// One argument of an operator.
#[derive(Clone)]
pub enum ParamSlot {
    /// Fixed value.
    Constant(f64),
    /// Re-evaluated once per tick with the shared time.
    Time(TimeFn),
    /// Front side of a named buffer.
    Buffer(BufferRef),
}

impl ParamSlot {
    /// Wrap an infallible closure.
    pub fn time(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Time(Arc::new(move |t| Ok(f(t))))
    }

    /// Wrap a fallible closure.
    pub fn try_time(f: impl Fn(f64) -> Result<f64, TimeFnError> + Send + Sync + 'static) -> Self {
        Self::Time(Arc::new(f))
    }

    /// Compile an expression string such as `"(sin(time)+1.5)*0.05"`.
    pub fn expr(src: &str) -> LoopwaveResult<Self> {
        Ok(Self::from(TimeExpr::parse(src)?))
    }

    /// Short label used in logs and `inspect` output.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Constant(_) => "const",
            Self::Time(_) => "time",
            Self::Buffer(_) => "buffer",
        }
    }
}

/// Shorthand for [`ParamSlot::time`].
pub fn time(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> ParamSlot {
    ParamSlot::time(f)
}

impl std::fmt::Debug for ParamSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Self::Time(_) => f.write_str("Time(<fn>)"),
            Self::Buffer(b) => f.debug_tuple("Buffer").field(b).finish(),
        }
    }
}

impl From<f64> for ParamSlot {
    fn from(v: f64) -> Self {
        Self::Constant(v)
    }
}

impl From<f32> for ParamSlot {
    fn from(v: f32) -> Self {
        Self::Constant(f64::from(v))
    }
}

impl From<i32> for ParamSlot {
    fn from(v: i32) -> Self {
        Self::Constant(f64::from(v))
    }
}

impl From<BufferRef> for ParamSlot {
    fn from(b: BufferRef) -> Self {
        Self::Buffer(b)
    }
}

impl From<TimeExpr> for ParamSlot {
    fn from(e: TimeExpr) -> Self {
        Self::Time(Arc::new(move |t| e.eval(t)))
    }
}
