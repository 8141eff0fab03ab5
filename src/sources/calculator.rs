//! Calculator text source for evaluating mathematical expressions

use super::leaves::TextLeaf;
use crate::objects::{ObjectRef, TextSource};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// Bare arithmetic: digits, operators, parentheses
static ARITHMETIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9.\s()+\-*/%^]+$").expect("valid regex"));

/// A binary operator sitting between two operands
static OPERATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9)]\s*[-+*/%^]\s*[-+(]*\s*[0-9.(]").expect("valid regex"));

/// Text source answering arithmetic queries with their value
#[derive(Debug, Default)]
pub struct CalculatorSource;

impl CalculatorSource {
    pub const RANK: i32 = 80;

    pub fn new() -> Self {
        Self
    }

    /// Does the query look like something to evaluate?
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.trim();
        if let Some(rest) = q.strip_prefix('=') {
            return !rest.trim().is_empty();
        }
        ARITHMETIC.is_match(q) && OPERATOR.is_match(q)
    }

    /// Evaluate an expression, `None` when it is malformed or undefined
    pub fn evaluate(&self, expr: &str) -> Option<f64> {
        let expr = expr
            .replace('×', "*")
            .replace('÷', "/")
            .replace('−', "-")
            .replace(',', "")
            .to_lowercase();
        let mut parser = Parser::new(&expr);
        let value = parser.expression()?;
        parser.skip_whitespace();
        if !parser.at_end() || !value.is_finite() {
            return None;
        }
        Some(value)
    }
}

impl TextSource for CalculatorSource {
    fn id(&self) -> &str {
        "calculator"
    }

    fn text_items(&self, key: &str) -> Vec<ObjectRef> {
        if !self.matches_query(key) {
            return Vec::new();
        }
        let expr = key.trim().trim_start_matches('=').trim();
        match self.evaluate(expr) {
            Some(value) => {
                let leaf = TextLeaf::new(format!("{} = {}", expr, format_value(value)))
                    .with_description("Calculator");
                vec![Arc::new(leaf)]
            }
            None => Vec::new(),
        }
    }

    fn rank(&self) -> Option<i32> {
        Some(Self::RANK)
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.6}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Nesting limit for the parser, counted in `unary`/`atom` frames
const MAX_NESTING: usize = 128;

/// Recursive descent over
/// `expr := term (('+'|'-') term)*`,
/// `term := unary (('*'|'/'|'%') unary)*`,
/// `unary := '-' unary | power`,
/// `power := atom ('^' unary)?`
struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            depth: 0,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        self.chars.next_if_eq(&expected).is_some()
    }

    fn expression(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        loop {
            if self.eat('+') {
                value += self.term()?;
            } else if self.eat('-') {
                value -= self.term()?;
            } else {
                return Some(value);
            }
        }
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.unary()?;
        loop {
            if self.eat('*') {
                value *= self.unary()?;
            } else if self.eat('/') {
                let rhs = self.unary()?;
                if rhs == 0.0 {
                    return None;
                }
                value /= rhs;
            } else if self.eat('%') {
                let rhs = self.unary()?;
                if rhs == 0.0 {
                    return None;
                }
                value %= rhs;
            } else {
                return Some(value);
            }
        }
    }

    /// Run `step` one level deeper, failing past [`MAX_NESTING`]
    fn nested(&mut self, step: fn(&mut Self) -> Option<f64>) -> Option<f64> {
        if self.depth >= MAX_NESTING {
            return None;
        }
        self.depth += 1;
        let value = step(self);
        self.depth -= 1;
        value
    }

    fn unary(&mut self) -> Option<f64> {
        self.nested(Self::unary_inner)
    }

    fn unary_inner(&mut self) -> Option<f64> {
        if self.eat('-') {
            return Some(-self.unary()?);
        }
        if self.eat('+') {
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> Option<f64> {
        let base = self.atom()?;
        if self.eat('^') {
            // right associative
            let exponent = self.unary()?;
            return Some(base.powf(exponent));
        }
        Some(base)
    }

    fn atom(&mut self) -> Option<f64> {
        self.nested(Self::atom_inner)
    }

    fn atom_inner(&mut self) -> Option<f64> {
        self.skip_whitespace();
        match *self.chars.peek()? {
            '(' => {
                self.chars.next();
                let value = self.expression()?;
                self.eat(')').then_some(value)
            }
            c if c.is_ascii_digit() || c == '.' => self.number(),
            c if c.is_ascii_alphabetic() => {
                let name = self.identifier();
                self.named(&name)
            }
            _ => None,
        }
    }

    fn number(&mut self) -> Option<f64> {
        let mut text = String::new();
        while let Some(c) = self.chars.next_if(|c| c.is_ascii_digit() || *c == '.') {
            text.push(c);
        }
        text.parse().ok()
    }

    fn identifier(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.chars.next_if(|c| c.is_ascii_alphabetic()) {
            name.push(c);
        }
        name
    }

    fn named(&mut self, name: &str) -> Option<f64> {
        match name {
            "pi" => return Some(std::f64::consts::PI),
            "e" => return Some(std::f64::consts::E),
            _ => {}
        }

        let func: fn(f64) -> f64 = match name {
            "sqrt" => f64::sqrt,
            "sin" => f64::sin,
            "cos" => f64::cos,
            "tan" => f64::tan,
            "log" => f64::log10,
            "ln" => f64::ln,
            "abs" => f64::abs,
            _ => return None,
        };
        let arg = self.power()?;
        Some(func(arg))
    }
}
