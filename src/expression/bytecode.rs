#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConstIdx(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ConstVal {
    F64(f64),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuiltinId {
    Sin,
    Cos,
    Tan,
    Abs,
    Floor,
    Ceil,
    Fract,
    Sqrt,
    Pow,
    Min,
    Max,
    Clamp,
    Mix,
    Step,
    Smoothstep,
}

impl BuiltinId {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "abs" => Self::Abs,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "fract" => Self::Fract,
            "sqrt" => Self::Sqrt,
            "pow" => Self::Pow,
            "min" => Self::Min,
            "max" => Self::Max,
            "clamp" => Self::Clamp,
            "mix" | "lerp" => Self::Mix,
            "step" => Self::Step,
            "smoothstep" => Self::Smoothstep,
            _ => return None,
        })
    }

    pub(crate) fn arity(self) -> u8 {
        match self {
            Self::Sin
            | Self::Cos
            | Self::Tan
            | Self::Abs
            | Self::Floor
            | Self::Ceil
            | Self::Fract
            | Self::Sqrt => 1,
            Self::Pow | Self::Min | Self::Max | Self::Step => 2,
            Self::Clamp | Self::Mix | Self::Smoothstep => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    PushConst(ConstIdx),
    /// Push the tick's time in seconds.
    LoadTime,

    Neg,
    Not,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    /// Pops `otherwise`, `then`, `cond`; pushes the chosen branch.
    Select,

    CallBuiltin { id: BuiltinId, argc: u8 },
}

#[derive(Debug, Clone, Default)]
pub(crate) struct BytecodeProgram {
    pub(crate) ops: Vec<Op>,
    pub(crate) consts: Vec<ConstVal>,
}

impl BytecodeProgram {
    pub(crate) fn push_const(&mut self, c: ConstVal) -> ConstIdx {
        let idx = ConstIdx(self.consts.len() as u32);
        self.consts.push(c);
        idx
    }

    /// Upper bound on the operand stack depth, used to size the VM stack once.
    pub(crate) fn max_stack_depth(&self) -> usize {
        let mut depth = 0usize;
        let mut max = 0usize;
        for op in &self.ops {
            match *op {
                Op::PushConst(_) | Op::LoadTime => depth += 1,
                Op::Neg | Op::Not => {}
                Op::Select => depth = depth.saturating_sub(2),
                Op::CallBuiltin { argc, .. } => {
                    depth = depth.saturating_sub(usize::from(argc)) + 1;
                }
                _ => depth = depth.saturating_sub(1),
            }
            max = max.max(depth);
        }
        max
    }
}
