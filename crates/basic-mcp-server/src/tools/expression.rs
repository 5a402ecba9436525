//! Recursive-descent arithmetic evaluator.
//!
//! Grammar:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('+' | '-') factor | '(' expr ')' | number
//! ```
//!
//! Only numbers and the four operators are recognised. Nothing is ever
//! looked up or executed.

pub const MAX_EXPRESSION_LEN: usize = 256;
pub const MAX_NESTING_DEPTH: usize = 32;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("expression is empty")]
    Empty,

    #[error("expression is longer than {max} characters")]
    TooLong { max: usize },

    #[error("unexpected character `{ch}` at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected `{token}` at position {pos}")]
    UnexpectedToken { token: String, pos: usize },

    #[error("nesting deeper than {max} levels")]
    TooDeep { max: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    fn describe(self) -> String {
        match self {
            Token::Num(n) => n.to_string(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Star => "*".into(),
            Token::Slash => "/".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
        }
    }
}

/// Evaluate `input` to a finite number.
pub fn evaluate(input: &str) -> Result<f64, ExpressionError> {
    if input.chars().count() > MAX_EXPRESSION_LEN {
        return Err(ExpressionError::TooLong {
            max: MAX_EXPRESSION_LEN,
        });
    }

    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ExpressionError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;

    if let Some(&(token, pos)) = parser.tokens.get(parser.pos) {
        return Err(ExpressionError::UnexpectedToken {
            token: token.describe(),
            pos,
        });
    }

    if value.is_finite() {
        Ok(value)
    } else {
        Err(ExpressionError::NonFinite)
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, ExpressionError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let token = match ch {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| ExpressionError::InvalidNumber(literal.clone()))?;
                tokens.push((Token::Num(value), start));
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => return Err(ExpressionError::UnexpectedChar { ch: other, pos: i }),
        };
        tokens.push((token, i));
        i += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let item = self.tokens.get(self.pos).copied();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn expr(&mut self) -> Result<f64, ExpressionError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, ExpressionError> {
        let mut value = self.factor()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            value = if op == Token::Star {
                value * rhs
            } else if rhs == 0.0 {
                return Err(ExpressionError::DivisionByZero);
            } else {
                value / rhs
            };
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, ExpressionError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(ExpressionError::TooDeep {
                max: MAX_NESTING_DEPTH,
            });
        }
        let result = self.factor_inner();
        self.depth -= 1;
        result
    }

    fn factor_inner(&mut self) -> Result<f64, ExpressionError> {
        match self.next() {
            Some((Token::Num(n), _)) => Ok(n),
            Some((Token::Plus, _)) => self.factor(),
            Some((Token::Minus, _)) => Ok(-self.factor()?),
            Some((Token::LParen, _)) => {
                let value = self.expr()?;
                match self.next() {
                    Some((Token::RParen, _)) => Ok(value),
                    Some((token, pos)) => Err(ExpressionError::UnexpectedToken {
                        token: token.describe(),
                        pos,
                    }),
                    None => Err(ExpressionError::UnexpectedEnd),
                }
            }
            Some((token, pos)) => Err(ExpressionError::UnexpectedToken {
                token: token.describe(),
                pos,
            }),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }
}
