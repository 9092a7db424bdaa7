use crate::expression::error::ExprError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Number(f64),
    True,
    False,

    LParen,
    RParen,
    Comma,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,

    EqEq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,

    Question,
    Colon,

    Eof,
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn eat_digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek_at(0).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn number(&mut self) -> Result<TokenKind, ExprError> {
        let start = self.pos;
        self.eat_digits();
        if self.peek_at(0) == Some(b'.') && self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
            self.eat_digits();
        }
        if matches!(self.peek_at(0), Some(b'e' | b'E')) {
            let e_pos = self.pos;
            self.pos += 1;
            if matches!(self.peek_at(0), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.eat_digits() == 0 {
                return Err(ExprError::new(
                    e_pos,
                    "invalid number exponent (expected digits)",
                ));
            }
        }
        let text = &self.src[start..self.pos];
        let v: f64 = text
            .parse()
            .map_err(|_| ExprError::new(start, format!("invalid number '{text}'")))?;
        Ok(TokenKind::Number(v))
    }

    fn ident(&mut self) -> TokenKind {
        let start = self.pos;
        while self
            .peek_at(0)
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.pos += 1;
        }
        match &self.src[start..self.pos] {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            s => TokenKind::Ident(s.to_owned()),
        }
    }

    fn punct(&mut self) -> Result<TokenKind, ExprError> {
        let start = self.pos;
        let two = self.src.get(start..start + 2).and_then(|s| match s {
            "&&" => Some(TokenKind::AndAnd),
            "||" => Some(TokenKind::OrOr),
            "==" => Some(TokenKind::EqEq),
            "!=" => Some(TokenKind::Ne),
            "<=" => Some(TokenKind::Le),
            ">=" => Some(TokenKind::Ge),
            _ => None,
        });
        if let Some(kind) = two {
            self.pos += 2;
            return Ok(kind);
        }

        let c = self.bytes[start] as char;
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '!' => TokenKind::Bang,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '?' => TokenKind::Question,
            ':' => TokenKind::Colon,
            _ => {
                return Err(ExprError::new(start, format!("unexpected character '{c}'")));
            }
        };
        self.pos += 1;
        Ok(kind)
    }
}

pub(crate) fn lex(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut sc = Scanner {
        src: input,
        bytes: input.as_bytes(),
        pos: 0,
    };
    let mut out = Vec::new();

    while let Some(b) = sc.peek_at(0) {
        if b.is_ascii_whitespace() {
            sc.pos += 1;
            continue;
        }
        if !b.is_ascii() {
            return Err(ExprError::new(sc.pos, "non-ascii character in expression"));
        }

        let start = sc.pos;
        let starts_number =
            b.is_ascii_digit() || (b == b'.' && sc.peek_at(1).is_some_and(|n| n.is_ascii_digit()));
        let kind = if starts_number {
            sc.number()?
        } else if b.is_ascii_alphabetic() || b == b'_' {
            sc.ident()
        } else {
            sc.punct()?
        };
        out.push(Token {
            kind,
            span: Span {
                start,
                end: sc.pos,
            },
        });
    }

    out.push(Token {
        kind: TokenKind::Eof,
        span: Span {
            start: input.len(),
            end: input.len(),
        },
    });
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_numbers_with_fraction_and_exponent() {
        assert_eq!(
            kinds("1.5e2 .25"),
            vec![
                TokenKind::Number(150.0),
                TokenKind::Number(0.25),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lexes_two_char_operators_greedily() {
        assert_eq!(
            kinds("a>=b&&c"),
            vec![
                TokenKind::Ident("a".to_owned()),
                TokenKind::Ge,
                TokenKind::Ident("b".to_owned()),
                TokenKind::AndAnd,
                TokenKind::Ident("c".to_owned()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn rejects_unknown_character_with_offset() {
        let err = lex("time # 2").unwrap_err();
        assert_eq!(err.offset, 5);
    }

    #[test]
    fn rejects_dangling_exponent() {
        assert!(lex("1e").is_err());
    }
}
