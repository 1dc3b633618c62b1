//! Parsing and evaluation of gettext `Plural-Forms` headers
//!
//! A header such as `nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : 2);`
//! is compiled once into a small expression tree and evaluated per lookup.
//! Arithmetic is unsigned with wrapping; division or modulo by zero yields 0.

use std::fmt;
use thiserror::Error;

const MAX_DEPTH: usize = 64;
/// Real headers stay well under this; it also bounds the size of the tree.
const MAX_TOKENS: usize = 512;

/// Error produced by a malformed `Plural-Forms` header
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid Plural-Forms header: {0}")]
pub struct PluralFormsError(pub String);

/// A compiled `Plural-Forms` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralForms {
    nplurals: usize,
    expr: Expr,
    source: String,
}

impl PluralForms {
    /// Parse a header value like `nplurals=2; plural=(n != 1);`
    pub fn parse(header: &str) -> Result<Self, PluralFormsError> {
        let mut nplurals = None;
        let mut plural = None;

        for part in header.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| PluralFormsError(format!("expected key=value, found '{part}'")))?;
            match key.trim() {
                "nplurals" => {
                    let n: usize = value
                        .trim()
                        .parse()
                        .map_err(|_| PluralFormsError(format!("bad nplurals '{}'", value.trim())))?;
                    if n == 0 {
                        return Err(PluralFormsError("nplurals must be at least 1".to_string()));
                    }
                    nplurals = Some(n);
                }
                "plural" => plural = Some(Parser::parse(value)?),
                _ => {}
            }
        }

        let nplurals = nplurals.ok_or_else(|| PluralFormsError("missing nplurals".to_string()))?;
        let expr = match plural {
            Some(expr) => expr,
            None if nplurals == 1 => Expr::Num(0),
            None => return Err(PluralFormsError("missing plural expression".to_string())),
        };

        Ok(Self {
            nplurals,
            expr,
            source: header.trim().to_string(),
        })
    }

    /// Number of plural forms the header declares
    pub fn nplurals(&self) -> usize {
        self.nplurals
    }

    /// Form index for `count`, clamped to `nplurals - 1`
    pub fn index(&self, count: i64) -> usize {
        let raw = self.expr.eval(count.unsigned_abs());
        usize::try_from(raw)
            .unwrap_or(usize::MAX)
            .min(self.nplurals - 1)
    }
}

impl fmt::Display for PluralForms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    N,
    Num(u64),
    Not(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Cond(Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, n: u64) -> u64 {
        match self {
            Self::N => n,
            Self::Num(v) => *v,
            Self::Not(inner) => u64::from(inner.eval(n) == 0),
            Self::Cond(cond, then, otherwise) => {
                if cond.eval(n) != 0 {
                    then.eval(n)
                } else {
                    otherwise.eval(n)
                }
            }
            Self::Binary(op, l, r) => match op {
                BinOp::Or => u64::from(l.eval(n) != 0 || r.eval(n) != 0),
                BinOp::And => u64::from(l.eval(n) != 0 && r.eval(n) != 0),
                BinOp::Eq => u64::from(l.eval(n) == r.eval(n)),
                BinOp::Ne => u64::from(l.eval(n) != r.eval(n)),
                BinOp::Lt => u64::from(l.eval(n) < r.eval(n)),
                BinOp::Le => u64::from(l.eval(n) <= r.eval(n)),
                BinOp::Gt => u64::from(l.eval(n) > r.eval(n)),
                BinOp::Ge => u64::from(l.eval(n) >= r.eval(n)),
                BinOp::Add => l.eval(n).wrapping_add(r.eval(n)),
                BinOp::Sub => l.eval(n).wrapping_sub(r.eval(n)),
                BinOp::Mul => l.eval(n).wrapping_mul(r.eval(n)),
                BinOp::Div => l.eval(n).checked_div(r.eval(n)).unwrap_or(0),
                BinOp::Rem => l.eval(n).checked_rem(r.eval(n)).unwrap_or(0),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    N,
    Num(u64),
    Op(&'static str),
    LParen,
    RParen,
    Question,
    Colon,
}

fn tokenize(input: &str) -> Result<Vec<Token>, PluralFormsError> {
    const OPERATORS: [&str; 16] = [
        "||", "&&", "==", "!=", "<=", ">=", "<", ">", "+", "-", "*", "/", "%", "!", "?", ":",
    ];

    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if tokens.len() >= MAX_TOKENS {
            return Err(PluralFormsError(format!(
                "expression longer than {MAX_TOKENS} tokens"
            )));
        }
        let c = bytes[i];
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let value = input[start..i]
                .parse()
                .map_err(|_| PluralFormsError(format!("number too large: {}", &input[start..i])))?;
            tokens.push(Token::Num(value));
            continue;
        }
        match c {
            b'n' => tokens.push(Token::N),
            b'(' => tokens.push(Token::LParen),
            b')' => tokens.push(Token::RParen),
            _ => {
                let rest = &input[i..];
                let op = OPERATORS
                    .iter()
                    .find(|op| rest.starts_with(**op))
                    .ok_or_else(|| PluralFormsError(format!("unexpected character '{}'", c as char)))?;
                i += op.len();
                tokens.push(match *op {
                    "?" => Token::Question,
                    ":" => Token::Colon,
                    other => Token::Op(other),
                });
                continue;
            }
        }
        i += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn parse(input: &str) -> Result<Expr, PluralFormsError> {
        let mut parser = Self {
            tokens: tokenize(input)?,
            pos: 0,
            depth: 0,
        };
        let expr = parser.ternary()?;
        match parser.peek() {
            None => Ok(expr),
            Some(token) => Err(PluralFormsError(format!("unexpected trailing token {token:?}"))),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat_op(&mut self, ops: &[&'static str]) -> Option<&'static str> {
        match self.peek() {
            Some(Token::Op(op)) if ops.contains(op) => {
                let op = *op;
                self.pos += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn expect(&mut self, token: &Token) -> Result<(), PluralFormsError> {
        if self.peek() == Some(token) {
            self.pos += 1;
            Ok(())
        } else {
            Err(PluralFormsError(format!(
                "expected {token:?}, found {:?}",
                self.peek()
            )))
        }
    }

    fn ternary(&mut self) -> Result<Expr, PluralFormsError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(PluralFormsError("expression nested too deeply".to_string()));
        }

        let cond = self.binary(0)?;
        let expr = if self.peek() == Some(&Token::Question) {
            self.pos += 1;
            let then = self.ternary()?;
            self.expect(&Token::Colon)?;
            let otherwise = self.ternary()?;
            Expr::Cond(Box::new(cond), Box::new(then), Box::new(otherwise))
        } else {
            cond
        };

        self.depth -= 1;
        Ok(expr)
    }

    /// Precedence climbing over the binary operator levels, loosest first.
    fn binary(&mut self, level: usize) -> Result<Expr, PluralFormsError> {
        const LEVELS: [&[&str]; 6] = [
            &["||"],
            &["&&"],
            &["==", "!="],
            &["<", "<=", ">", ">="],
            &["+", "-"],
            &["*", "/", "%"],
        ];

        if level == LEVELS.len() {
            return self.unary();
        }

        let mut lhs = self.binary(level + 1)?;
        while let Some(op) = self.eat_op(LEVELS[level]) {
            let rhs = self.binary(level + 1)?;
            lhs = Expr::Binary(bin_op(op), Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, PluralFormsError> {
        if self.eat_op(&["!"]).is_some() {
            self.depth += 1;
            if self.depth > MAX_DEPTH {
                return Err(PluralFormsError("expression nested too deeply".to_string()));
            }
            let inner = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, PluralFormsError> {
        match self.tokens.get(self.pos).cloned() {
            Some(Token::N) => {
                self.pos += 1;
                Ok(Expr::N)
            }
            Some(Token::Num(v)) => {
                self.pos += 1;
                Ok(Expr::Num(v))
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.ternary()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            other => Err(PluralFormsError(format!("unexpected token {other:?}"))),
        }
    }
}

fn bin_op(op: &str) -> BinOp {
    match op {
        "||" => BinOp::Or,
        "&&" => BinOp::And,
        "==" => BinOp::Eq,
        "!=" => BinOp::Ne,
        "<" => BinOp::Lt,
        "<=" => BinOp::Le,
        ">" => BinOp::Gt,
        ">=" => BinOp::Ge,
        "+" => BinOp::Add,
        "-" => BinOp::Sub,
        "*" => BinOp::Mul,
        "/" => BinOp::Div,
        _ => BinOp::Rem,
    }
}
