//! Second-chance parser for Python-literal skill payloads.
//!
//! Legacy rows serialized skills with `str(list_of_dicts)`, which produces
//! single-quoted records that `serde_json` rejects. This parser accepts the
//! literal subset those rows actually contain: dicts with string keys, lists,
//! tuples, strings (single or double quoted), numbers, and the `True`/
//! `False`/`None` keywords. Everything it returns is mapped onto
//! [`serde_json::Value`] so the normalizer downstream sees one shape.

use serde_json::{Map, Number, Value};

/// Parses a full Python literal. Returns `None` on any syntax it does not
/// recognize; it never panics.
pub fn parse(input: &str) -> Option<Value> {
    let chars: Vec<char> = input.chars().collect();
    let mut parser = Parser { chars, pos: 0 };

    parser.skip_whitespace();
    let value = parser.value(0)?;
    parser.skip_whitespace();

    if parser.at_end() { Some(value) } else { None }
}

// Literal nesting beyond this is not something skill rows legitimately
// contain; bail out instead of recursing further.
const MAX_DEPTH: usize = 16;

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, expected: char) -> Option<()> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    fn value(&mut self, depth: usize) -> Option<Value> {
        if depth > MAX_DEPTH {
            return None;
        }

        match self.peek()? {
            '{' => self.dict(depth),
            '[' => self.sequence(depth, '[', ']'),
            '(' => self.sequence(depth, '(', ')'),
            '\'' | '"' => self.string().map(Value::String),
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            _ => self.keyword(),
        }
    }

    fn dict(&mut self, depth: usize) -> Option<Value> {
        self.eat('{')?;
        self.skip_whitespace();

        let mut map = Map::new();

        if self.peek() == Some('}') {
            self.pos += 1;
            return Some(Value::Object(map));
        }

        loop {
            self.skip_whitespace();
            // Only string keys occur in skill payloads; anything else (which
            // would also cover set literals) is unparseable.
            let key = match self.peek()? {
                '\'' | '"' => self.string()?,
                _ => return None,
            };

            self.skip_whitespace();
            self.eat(':')?;
            self.skip_whitespace();

            let value = self.value(depth + 1)?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.bump()? {
                ',' => {
                    self.skip_whitespace();
                    if self.peek() == Some('}') {
                        self.pos += 1;
                        return Some(Value::Object(map));
                    }
                }
                '}' => return Some(Value::Object(map)),
                _ => return None,
            }
        }
    }

    fn sequence(&mut self, depth: usize, open: char, close: char) -> Option<Value> {
        self.eat(open)?;
        self.skip_whitespace();

        let mut items = Vec::new();

        if self.peek() == Some(close) {
            self.pos += 1;
            return Some(Value::Array(items));
        }

        loop {
            self.skip_whitespace();
            items.push(self.value(depth + 1)?);
            self.skip_whitespace();

            match self.bump()? {
                ',' => {
                    self.skip_whitespace();
                    if self.peek() == Some(close) {
                        self.pos += 1;
                        return Some(Value::Array(items));
                    }
                }
                c if c == close => return Some(Value::Array(items)),
                _ => return None,
            }
        }
    }

    fn string(&mut self) -> Option<String> {
        let quote = self.bump()?;
        let mut out = String::new();

        loop {
            match self.bump()? {
                '\\' => match self.bump()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    '0' => out.push('\0'),
                    other => out.push(other),
                },
                c if c == quote => return Some(out),
                c => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Option<Value> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'))
        {
            self.pos += 1;
        }

        let text: String = self.chars[start..self.pos].iter().collect();
        if let Ok(int) = text.parse::<i64>() {
            return Some(Value::Number(int.into()));
        }
        let float: f64 = text.parse().ok()?;
        Number::from_f64(float).map(Value::Number)
    }

    fn keyword(&mut self) -> Option<Value> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            self.pos += 1;
        }

        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "True" => Some(Value::Bool(true)),
            "False" => Some(Value::Bool(false)),
            "None" => Some(Value::Null),
            _ => None,
        }
    }
}
