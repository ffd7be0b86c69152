//! Path query string parser.

use super::ast::{Axis, NodeTest, Predicate, QueryPath, Step};
use super::error::QueryError;

/// Parser for path query strings.
pub struct Parser {
    input: String,
    position: usize,
}

impl Parser {
    pub fn new(query: &str) -> Self {
        Self {
            input: query.to_string(),
            position: 0,
        }
    }

    /// Parses the query string into a QueryPath.
    pub fn parse(query: &str) -> Result<QueryPath, QueryError> {
        let mut parser = Parser::new(query);
        parser.parse_path()
    }

    fn parse_path(&mut self) -> Result<QueryPath, QueryError> {
        let mut steps = Vec::new();

        self.skip_whitespace();
        if self.is_eof() {
            return Err(QueryError::UnexpectedEnd {
                expected: "'/'".to_string(),
            });
        }

        while !self.is_eof() {
            let pos = self.position;
            match self.peek() {
                Some('/') => {
                    self.next();
                    let axis = if self.peek() == Some('/') {
                        self.next();
                        Axis::Descendant
                    } else {
                        Axis::Child
                    };
                    steps.push(self.parse_step(axis)?);
                }
                Some(ch) => {
                    return Err(QueryError::UnexpectedToken {
                        position: pos,
                        found: ch.to_string(),
                        expected: "'/'".to_string(),
                    })
                }
                None => break,
            }
            self.skip_whitespace();
        }

        Ok(QueryPath::new(steps))
    }

    fn parse_step(&mut self, axis: Axis) -> Result<Step, QueryError> {
        self.skip_whitespace();
        let test = if self.peek() == Some('*') {
            self.next();
            NodeTest::Wildcard
        } else {
            let first = self.parse_identifier()?;
            if self.peek() == Some(':') {
                self.next();
                let name = self.parse_identifier()?;
                NodeTest::Name {
                    module: Some(first),
                    name,
                }
            } else {
                NodeTest::Name {
                    module: None,
                    name: first,
                }
            }
        };

        let mut predicates = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() != Some('[') {
                break;
            }
            predicates.push(self.parse_predicate()?);
        }

        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    /// Parses `[n]`, `[.='v']` or `[key='v']`.
    fn parse_predicate(&mut self) -> Result<Predicate, QueryError> {
        self.expect('[')?;
        self.skip_whitespace();

        let predicate = match self.peek() {
            Some('0'..='9') => {
                let position = self.parse_number()?;
                if position == 0 {
                    return Err(QueryError::InvalidSyntax {
                        message: "positions start at 1".to_string(),
                    });
                }
                Predicate::Position(position)
            }
            Some('.') => {
                self.next();
                self.expect('=')?;
                Predicate::ValueEquals(self.parse_string()?)
            }
            Some(_) => {
                let key = self.parse_identifier()?;
                self.expect('=')?;
                Predicate::KeyEquals {
                    key,
                    value: self.parse_string()?,
                }
            }
            None => {
                return Err(QueryError::UnexpectedEnd {
                    expected: "predicate".to_string(),
                })
            }
        };

        self.expect(']')?;
        Ok(predicate)
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.next();
            } else {
                break;
            }
        }
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Expects a specific character and advances, or returns an error.
    fn expect(&mut self, expected: char) -> Result<(), QueryError> {
        self.skip_whitespace();
        let pos = self.position;
        match self.next() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(QueryError::UnexpectedToken {
                position: pos,
                found: ch.to_string(),
                expected: format!("'{}'", expected),
            }),
            None => Err(QueryError::UnexpectedEnd {
                expected: format!("'{}'", expected),
            }),
        }
    }

    /// Parses a node, module or key name. Names start with a letter or `_`
    /// and may continue with letters, digits, `_`, `-` and `.`.
    fn parse_identifier(&mut self) -> Result<String, QueryError> {
        self.skip_whitespace();
        let pos = self.position;
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            let allowed = if name.is_empty() {
                ch.is_alphabetic() || ch == '_'
            } else {
                ch.is_alphanumeric() || ch == '_' || ch == '-' || ch == '.'
            };
            if !allowed {
                break;
            }
            name.push(ch);
            self.next();
        }

        if !name.is_empty() {
            return Ok(name);
        }
        match self.peek() {
            Some(ch) => Err(QueryError::UnexpectedToken {
                position: pos,
                found: ch.to_string(),
                expected: "name".to_string(),
            }),
            None => Err(QueryError::UnexpectedEnd {
                expected: "name".to_string(),
            }),
        }
    }

    /// Parses a single- or double-quoted string. The quote character is
    /// escaped by doubling it: `'it''s'` reads as `it's`.
    fn parse_string(&mut self) -> Result<String, QueryError> {
        self.skip_whitespace();
        let pos = self.position;
        let quote = match self.next() {
            Some(q @ ('\'' | '"')) => q,
            Some(ch) => {
                return Err(QueryError::UnexpectedToken {
                    position: pos,
                    found: ch.to_string(),
                    expected: "quoted value".to_string(),
                })
            }
            None => {
                return Err(QueryError::UnexpectedEnd {
                    expected: "quoted value".to_string(),
                })
            }
        };

        let mut value = String::new();
        loop {
            match self.next() {
                Some(ch) if ch == quote => {
                    if self.peek() != Some(quote) {
                        return Ok(value);
                    }
                    self.next();
                    value.push(quote);
                }
                Some(ch) => value.push(ch),
                None => {
                    return Err(QueryError::UnexpectedEnd {
                        expected: format!("closing quote {}", quote),
                    })
                }
            }
        }
    }

    fn parse_number(&mut self) -> Result<usize, QueryError> {
        let mut num = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num.push(ch);
                self.next();
            } else {
                break;
            }
        }
        num.parse::<usize>().map_err(|_| QueryError::InvalidSyntax {
            message: format!("Invalid position: {}", num),
        })
    }
}
