//! Function-call expression parsing
//!
//! Grammar, applied to the whole (trimmed) scalar:
//!
//! ```text
//! call  := IDENT '(' [ arg (',' arg)* ] ')'
//! arg   := call | quoted | bare
//! ```
//!
//! Quoted strings use `'` or `"` with backslash escapes. Bare tokens become
//! booleans, null, integers, floats, or plain strings.

use crate::error::ConfigError;
use crate::options::DEFAULT_MAX_DEPTH;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;

static IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").expect("valid regex"));

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("valid regex"));

static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?([0-9]+\.[0-9]*|\.[0-9]+|[0-9]+)([eE][+-]?[0-9]+)?$").expect("valid regex")
});

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Call { name: String, args: Vec<Expr> },
    Literal(Value),
}

/// Parse `input` as a single function call, allowing the default call nesting.
///
/// Returns `Ok(None)` for anything that is not exactly one well-formed call, so callers
/// can pass such strings through untouched.
pub fn parse_call(input: &str) -> Result<Option<Expr>, ConfigError> {
    parse_call_with_limit(input, DEFAULT_MAX_DEPTH)
}

/// Like [`parse_call`], failing with `DepthExceeded` once calls nest deeper than `max_depth`.
pub fn parse_call_with_limit(input: &str, max_depth: usize) -> Result<Option<Expr>, ConfigError> {
    let mut cursor = Cursor {
        src: input.trim(),
        pos: 0,
        depth: 0,
        max_depth,
        exceeded: false,
    };
    let expr = cursor.call();
    if cursor.exceeded {
        return Err(ConfigError::DepthExceeded { limit: max_depth, stage: "parsing expressions" });
    }
    Ok(expr.filter(|_| cursor.at_end()))
}

/// Classify a bare token.
pub fn literal(token: &str) -> Value {
    match token {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" | "~" => return Value::Null,
        _ => {}
    }
    if INTEGER.is_match(token) {
        if let Ok(n) = token.parse::<i64>() {
            return Value::from(n);
        }
        if let Ok(n) = token.parse::<u64>() {
            return Value::from(n);
        }
    }
    if FLOAT.is_match(token) {
        if let Ok(f) = token.parse::<f64>() {
            return Value::from(f);
        }
    }
    Value::String(token.to_string())
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
    max_depth: usize,
    // Set once nesting passes `max_depth`; every open call then unwinds with `None`.
    exceeded: bool,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let m = IDENT.find(rest)?;
        self.pos += m.end();
        Some(&rest[..m.end()])
    }

    fn call(&mut self) -> Option<Expr> {
        if self.exceeded {
            return None;
        }
        let start = self.pos;
        let name = self.ident()?;
        // The paren must follow the name directly: `f (x)` is plain text.
        if !self.eat('(') {
            self.pos = start;
            return None;
        }
        self.depth += 1;
        if self.depth > self.max_depth {
            self.exceeded = true;
            return None;
        }
        let args = self.arguments();
        self.depth -= 1;
        Some(Expr::Call { name: name.to_string(), args: args? })
    }

    fn arguments(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();
        self.skip_ws();
        if self.eat(')') {
            return Some(args);
        }
        loop {
            args.push(self.argument()?);
            self.skip_ws();
            match self.bump()? {
                ',' => continue,
                ')' => return Some(args),
                _ => return None,
            }
        }
    }

    fn argument(&mut self) -> Option<Expr> {
        self.skip_ws();
        match self.peek()? {
            '"' | '\'' => self.quoted().map(|s| Expr::Literal(Value::String(s))),
            _ => {
                let start = self.pos;
                if let Some(call) = self.call() {
                    return Some(call);
                }
                if self.exceeded {
                    return None;
                }
                self.pos = start;
                self.bare()
            }
        }
    }

    fn quoted(&mut self) -> Option<String> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            match self.bump()? {
                c if c == quote => return Some(out),
                '\\' => match self.bump()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    other => out.push(other),
                },
                c => out.push(c),
            }
        }
    }

    fn bare(&mut self) -> Option<Expr> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, ',' | ')' | '(' | '"' | '\'') {
                break;
            }
            self.bump();
        }
        let token = self.src[start..self.pos].trim();
        if token.is_empty() || !matches!(self.peek(), Some(',' | ')')) {
            return None;
        }
        Some(Expr::Literal(literal(token)))
    }
}
