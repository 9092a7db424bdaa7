use crate::expression::ast::{BinaryOp, Expr, Lit, UnaryOp};
use crate::expression::bytecode::{BuiltinId, BytecodeProgram, ConstVal, Op};
use crate::expression::error::ExprError;

pub(crate) fn lower_to_bytecode(expr: &Expr) -> Result<BytecodeProgram, ExprError> {
    let mut out = BytecodeProgram::default();
    lower(expr, &mut out)?;
    Ok(out)
}

fn lower(expr: &Expr, out: &mut BytecodeProgram) -> Result<(), ExprError> {
    match expr {
        Expr::Lit(Lit::F64(v)) => {
            let idx = out.push_const(ConstVal::F64(*v));
            out.ops.push(Op::PushConst(idx));
        }
        Expr::Lit(Lit::Bool(v)) => {
            let idx = out.push_const(ConstVal::Bool(*v));
            out.ops.push(Op::PushConst(idx));
        }
        Expr::Ident(name) => match name.as_str() {
            "time" | "t" => out.ops.push(Op::LoadTime),
            "pi" => {
                let idx = out.push_const(ConstVal::F64(std::f64::consts::PI));
                out.ops.push(Op::PushConst(idx));
            }
            "tau" => {
                let idx = out.push_const(ConstVal::F64(std::f64::consts::TAU));
                out.ops.push(Op::PushConst(idx));
            }
            other => {
                return Err(ExprError::new(0, format!("unknown identifier '{other}'")));
            }
        },
        Expr::Unary { op, expr } => {
            lower(expr, out)?;
            out.ops.push(match op {
                UnaryOp::Neg => Op::Neg,
                UnaryOp::Not => Op::Not,
            });
        }
        Expr::Binary { op, left, right } => {
            lower(left, out)?;
            lower(right, out)?;
            out.ops.push(binary(*op));
        }
        Expr::Cond {
            cond,
            then,
            otherwise,
        } => {
            lower(cond, out)?;
            lower(then, out)?;
            lower(otherwise, out)?;
            out.ops.push(Op::Select);
        }
        Expr::Call { func, args } => {
            let Some(id) = BuiltinId::from_name(func) else {
                return Err(ExprError::new(0, format!("unknown function '{func}'")));
            };
            if args.len() != usize::from(id.arity()) {
                return Err(ExprError::new(
                    0,
                    format!(
                        "{func} expects {} argument(s), got {}",
                        id.arity(),
                        args.len()
                    ),
                ));
            }
            for a in args {
                lower(a, out)?;
            }
            out.ops.push(Op::CallBuiltin {
                id,
                argc: id.arity(),
            });
        }
    }
    Ok(())
}

fn binary(op: BinaryOp) -> Op {
    match op {
        BinaryOp::Add => Op::Add,
        BinaryOp::Sub => Op::Sub,
        BinaryOp::Mul => Op::Mul,
        BinaryOp::Div => Op::Div,
        BinaryOp::Mod => Op::Mod,
        BinaryOp::Eq => Op::Eq,
        BinaryOp::Ne => Op::Ne,
        BinaryOp::Lt => Op::Lt,
        BinaryOp::Le => Op::Le,
        BinaryOp::Gt => Op::Gt,
        BinaryOp::Ge => Op::Ge,
        BinaryOp::And => Op::And,
        BinaryOp::Or => Op::Or,
    }
}
