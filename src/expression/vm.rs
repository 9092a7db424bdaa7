use crate::expression::bytecode::{BuiltinId, BytecodeProgram, ConstVal, Op};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ValueSlot {
    F64(f64),
    Bool(bool),
}

#[derive(Debug, Clone)]
pub(crate) struct VmError {
    pub(crate) message: String,
}

impl VmError {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for VmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vm error: {}", self.message)
    }
}

impl std::error::Error for VmError {}

impl ValueSlot {
    pub(crate) fn as_f64(self) -> Result<f64, VmError> {
        match self {
            Self::F64(v) => Ok(v),
            Self::Bool(_) => Err(VmError::new("expected number, got bool")),
        }
    }

    fn as_bool(self) -> Result<bool, VmError> {
        match self {
            Self::Bool(v) => Ok(v),
            Self::F64(v) => Err(VmError::new(format!("expected bool, got {v}"))),
        }
    }
}

pub(crate) fn eval_program(p: &BytecodeProgram, time: f64) -> Result<ValueSlot, VmError> {
    let mut stack: Vec<ValueSlot> = Vec::with_capacity(p.max_stack_depth());

    for &op in &p.ops {
        match op {
            Op::PushConst(idx) => {
                let c = p
                    .consts
                    .get(idx.0 as usize)
                    .ok_or_else(|| VmError::new("const idx out of range"))?;
                stack.push(match *c {
                    ConstVal::F64(v) => ValueSlot::F64(v),
                    ConstVal::Bool(v) => ValueSlot::Bool(v),
                });
            }
            Op::LoadTime => stack.push(ValueSlot::F64(time)),

            Op::Neg => {
                let v = pop(&mut stack)?.as_f64()?;
                stack.push(ValueSlot::F64(-v));
            }
            Op::Not => {
                let v = pop(&mut stack)?.as_bool()?;
                stack.push(ValueSlot::Bool(!v));
            }
            Op::Add => bin_f64(&mut stack, |a, b| a + b)?,
            Op::Sub => bin_f64(&mut stack, |a, b| a - b)?,
            Op::Mul => bin_f64(&mut stack, |a, b| a * b)?,
            Op::Div => bin_f64(&mut stack, |a, b| a / b)?,
            Op::Mod => bin_f64(&mut stack, |a, b| a % b)?,

            Op::Eq => bin_eq(&mut stack, true)?,
            Op::Ne => bin_eq(&mut stack, false)?,
            Op::Lt => bin_cmp(&mut stack, |a, b| a < b)?,
            Op::Le => bin_cmp(&mut stack, |a, b| a <= b)?,
            Op::Gt => bin_cmp(&mut stack, |a, b| a > b)?,
            Op::Ge => bin_cmp(&mut stack, |a, b| a >= b)?,

            Op::And => {
                let b = pop(&mut stack)?.as_bool()?;
                let a = pop(&mut stack)?.as_bool()?;
                stack.push(ValueSlot::Bool(a && b));
            }
            Op::Or => {
                let b = pop(&mut stack)?.as_bool()?;
                let a = pop(&mut stack)?.as_bool()?;
                stack.push(ValueSlot::Bool(a || b));
            }
            Op::Select => {
                let otherwise = pop(&mut stack)?;
                let then = pop(&mut stack)?;
                let cond = pop(&mut stack)?.as_bool()?;
                stack.push(if cond { then } else { otherwise });
            }

            Op::CallBuiltin { id, argc } => call_builtin(&mut stack, id, argc)?,
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(v), true) => Ok(v),
        (None, _) => Err(VmError::new("empty stack at end of program")),
        (Some(_), false) => Err(VmError::new(format!(
            "stack has {} values at end of program",
            stack.len() + 1
        ))),
    }
}

fn pop(stack: &mut Vec<ValueSlot>) -> Result<ValueSlot, VmError> {
    stack.pop().ok_or_else(|| VmError::new("stack underflow"))
}

fn bin_f64(stack: &mut Vec<ValueSlot>, f: impl FnOnce(f64, f64) -> f64) -> Result<(), VmError> {
    let b = pop(stack)?.as_f64()?;
    let a = pop(stack)?.as_f64()?;
    stack.push(ValueSlot::F64(f(a, b)));
    Ok(())
}

fn bin_cmp(stack: &mut Vec<ValueSlot>, f: impl FnOnce(f64, f64) -> bool) -> Result<(), VmError> {
    let b = pop(stack)?.as_f64()?;
    let a = pop(stack)?.as_f64()?;
    stack.push(ValueSlot::Bool(f(a, b)));
    Ok(())
}

fn bin_eq(stack: &mut Vec<ValueSlot>, is_eq: bool) -> Result<(), VmError> {
    let b = pop(stack)?;
    let a = pop(stack)?;
    let res = match (a, b) {
        (ValueSlot::Bool(a), ValueSlot::Bool(b)) => a == b,
        (ValueSlot::F64(a), ValueSlot::F64(b)) => a == b,
        _ => return Err(VmError::new("cannot compare bool with number")),
    };
    stack.push(ValueSlot::Bool(res == is_eq));
    Ok(())
}

fn call_builtin(stack: &mut Vec<ValueSlot>, id: BuiltinId, argc: u8) -> Result<(), VmError> {
    if argc != id.arity() {
        return Err(VmError::new(format!(
            "{id:?} expects {} args, got {argc}",
            id.arity()
        )));
    }
    let argc = usize::from(argc);
    if stack.len() < argc {
        return Err(VmError::new("stack underflow in builtin call"));
    }
    let mut args = [0.0f64; 3];
    for slot in args[..argc].iter_mut().rev() {
        *slot = pop(stack)?.as_f64()?;
    }
    let [a, b, c] = args;

    let v = match id {
        BuiltinId::Sin => a.sin(),
        BuiltinId::Cos => a.cos(),
        BuiltinId::Tan => a.tan(),
        BuiltinId::Abs => a.abs(),
        BuiltinId::Floor => a.floor(),
        BuiltinId::Ceil => a.ceil(),
        BuiltinId::Fract => a - a.floor(),
        BuiltinId::Sqrt => a.sqrt(),
        BuiltinId::Pow => a.powf(b),
        BuiltinId::Min => a.min(b),
        BuiltinId::Max => a.max(b),
        BuiltinId::Clamp => {
            if b > c {
                return Err(VmError::new("clamp lower bound exceeds upper bound"));
            }
            a.clamp(b, c)
        }
        BuiltinId::Mix => a + (b - a) * c,
        BuiltinId::Step => {
            if b < a {
                0.0
            } else {
                1.0
            }
        }
        BuiltinId::Smoothstep => {
            let t = ((c - a) / (b - a)).clamp(0.0, 1.0);
            t * t * (3.0 - 2.0 * t)
        }
    };
    stack.push(ValueSlot::F64(v));
    Ok(())
}
