use crate::expression::ast::{BinaryOp, Expr, Lit, UnaryOp};
use crate::expression::error::ExprError;
use crate::expression::lexer::{Token, TokenKind, lex};

/// Parse a time expression. A leading `=` (patch-file notation) is accepted and ignored.
pub(crate) fn parse_expr(src: &str) -> Result<Expr, ExprError> {
    let trimmed = src.trim();
    let body = trimmed.strip_prefix('=').unwrap_or(trimmed);
    let mut p = Parser {
        tokens: lex(body)?,
        pos: 0,
    };
    let expr = p.parse_cond()?;
    p.expect(&TokenKind::Eof)?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

/// Binding power of each binary operator; higher binds tighter.
fn binary_op(kind: &TokenKind) -> Option<(BinaryOp, u8)> {
    Some(match kind {
        TokenKind::OrOr => (BinaryOp::Or, 1),
        TokenKind::AndAnd => (BinaryOp::And, 2),
        TokenKind::EqEq => (BinaryOp::Eq, 3),
        TokenKind::Ne => (BinaryOp::Ne, 3),
        TokenKind::Lt => (BinaryOp::Lt, 4),
        TokenKind::Le => (BinaryOp::Le, 4),
        TokenKind::Gt => (BinaryOp::Gt, 4),
        TokenKind::Ge => (BinaryOp::Ge, 4),
        TokenKind::Plus => (BinaryOp::Add, 5),
        TokenKind::Minus => (BinaryOp::Sub, 5),
        TokenKind::Star => (BinaryOp::Mul, 6),
        TokenKind::Slash => (BinaryOp::Div, 6),
        TokenKind::Percent => (BinaryOp::Mod, 6),
        _ => return None,
    })
}

impl Parser {
    fn peek(&self) -> &Token {
        // `lex` always terminates the stream with Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> Token {
        let t = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ExprError> {
        if self.consume(kind) {
            return Ok(());
        }
        let found = self.peek();
        Err(ExprError::new(
            found.span.start,
            format!("expected {kind:?}, found {:?}", found.kind),
        ))
    }

    /// `cond ? a : b`, right associative, lowest precedence.
    fn parse_cond(&mut self) -> Result<Expr, ExprError> {
        let cond = self.parse_binary(1)?;
        if !self.consume(&TokenKind::Question) {
            return Ok(cond);
        }
        let then = self.parse_cond()?;
        self.expect(&TokenKind::Colon)?;
        let otherwise = self.parse_cond()?;
        Ok(Expr::Cond {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn parse_binary(&mut self, min_bp: u8) -> Result<Expr, ExprError> {
        let mut left = self.parse_unary()?;
        while let Some((op, bp)) = binary_op(&self.peek().kind) {
            if bp < min_bp {
                break;
            }
            self.bump();
            let right = self.parse_binary(bp + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        let op = if self.consume(&TokenKind::Minus) {
            UnaryOp::Neg
        } else if self.consume(&TokenKind::Bang) {
            UnaryOp::Not
        } else {
            return self.parse_primary();
        };
        let expr = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            expr: Box::new(expr),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let t = self.bump();
        match t.kind {
            TokenKind::Number(v) => Ok(Expr::Lit(Lit::F64(v))),
            TokenKind::True => Ok(Expr::Lit(Lit::Bool(true))),
            TokenKind::False => Ok(Expr::Lit(Lit::Bool(false))),
            TokenKind::Ident(name) => {
                if self.consume(&TokenKind::LParen) {
                    let args = self.parse_args()?;
                    Ok(Expr::Call { func: name, args })
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            TokenKind::LParen => {
                let e = self.parse_cond()?;
                self.expect(&TokenKind::RParen)?;
                Ok(e)
            }
            other => Err(ExprError::new(
                t.span.start,
                format!("unexpected token {other:?}"),
            )),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ExprError> {
        let mut args = Vec::new();
        if self.consume(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_cond()?);
            if !self.consume(&TokenKind::Comma) {
                self.expect(&TokenKind::RParen)?;
                return Ok(args);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let e = parse_expr("=1+2*3").unwrap();
        let Expr::Binary {
            op: BinaryOp::Add,
            right,
            ..
        } = e
        else {
            panic!("unexpected ast: {e:?}");
        };
        assert!(matches!(
            *right,
            Expr::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn subtraction_is_left_associative() {
        let e = parse_expr("5-2-1").unwrap();
        let Expr::Binary { left, .. } = e else {
            panic!("expected binary");
        };
        assert!(matches!(
            *left,
            Expr::Binary {
                op: BinaryOp::Sub,
                ..
            }
        ));
    }

    #[test]
    fn parses_calls_with_nested_args() {
        let e = parse_expr("(sin(time*0.5)+1)*0.12").unwrap();
        assert!(matches!(
            e,
            Expr::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
        let e = parse_expr("clamp(time, 0, 1)").unwrap();
        match e {
            Expr::Call { func, args } => {
                assert_eq!(func, "clamp");
                assert_eq!(args.len(), 3);
            }
            other => panic!("unexpected ast: {other:?}"),
        }
    }

    #[test]
    fn parses_ternary_right_associative() {
        let e = parse_expr("time < 1 ? 0 : time < 2 ? 1 : 2").unwrap();
        let Expr::Cond { otherwise, .. } = e else {
            panic!("expected conditional");
        };
        assert!(matches!(*otherwise, Expr::Cond { .. }));
    }

    #[test]
    fn reports_trailing_tokens() {
        let err = parse_expr("1 2").unwrap_err();
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn reports_unclosed_paren() {
        assert!(parse_expr("sin(time").is_err());
    }
}
