//! Small expression language for time-varying parameters.
//!
//! Source text such as `(sin(time*0.5)+1)*0.12` is parsed and lowered to stack bytecode once,
//! then evaluated against the tick time every frame.

pub(crate) mod ast;
pub(crate) mod bytecode;
pub(crate) mod error;
pub(crate) mod lexer;
pub(crate) mod lower;
pub(crate) mod parser;
pub(crate) mod vm;

use std::sync::Arc;

use crate::foundation::error::{LoopwaveError, LoopwaveResult};
use crate::param::slot::TimeFnError;

/// A compiled time expression.
#[derive(Clone)]
pub struct TimeExpr {
    source: Arc<str>,
    program: Arc<bytecode::BytecodeProgram>,
}

impl TimeExpr {
    /// Parse and compile `src`. A leading `=` is accepted.
    pub fn parse(src: &str) -> LoopwaveResult<Self> {
        let ast = parser::parse_expr(src)
            .map_err(|e| LoopwaveError::configuration(format!("time expression '{src}': {e}")))?;
        let program = lower::lower_to_bytecode(&ast)
            .map_err(|e| LoopwaveError::configuration(format!("time expression '{src}': {e}")))?;
        Ok(Self {
            source: Arc::from(src.trim()),
            program: Arc::new(program),
        })
    }

    /// Evaluate at `time`. Boolean results and VM faults are reported as [`TimeFnError`].
    pub fn eval(&self, time: f64) -> Result<f64, TimeFnError> {
        match vm::eval_program(&self.program, time) {
            Ok(vm::ValueSlot::F64(v)) => Ok(v),
            Ok(vm::ValueSlot::Bool(_)) => Err(TimeFnError::new(format!(
                "expression '{}' produced a bool",
                self.source
            ))),
            Err(e) => Err(TimeFnError::new(format!("expression '{}': {e}", self.source))),
        }
    }

    /// Source text as written.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Debug for TimeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TimeExpr").field(&self.source).finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/time_expr.rs"]
mod tests;
