use crate::{
    error::Error,
    tree::{BinaryOp, FunctionKind},
};
use log::debug;

/// Character that marks the end of the input text.
pub const END_MARKER: char = '$';

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Token {
    Open,
    Close,
    Operator(BinaryOp),
    Number(f64),
    Function(FunctionKind),
    Variable(char),
    /// End of input. Every token sequence ends with exactly one of these.
    End,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Open => write!(f, "'('"),
            Token::Close => write!(f, "')'"),
            Token::Operator(op) => write!(f, "'{}'", op.symbol()),
            Token::Number(val) => write!(f, "number {}", val),
            Token::Function(kind) => write!(f, "function '{}'", kind.name()),
            Token::Variable(label) => write!(f, "variable '{}'", label),
            Token::End => write!(f, "end of input"),
        }
    }
}

/// An ordered sequence of tokens with the byte offset each one starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct Tokens {
    tokens: Vec<(Token, usize)>,
}

impl Tokens {
    /// The token at `index`. Reading past the end yields `End`, so the parser
    /// can always peek ahead.
    pub fn get(&self, index: usize) -> Token {
        match self.tokens.get(index) {
            Some((token, _)) => *token,
            None => Token::End,
        }
    }

    /// Byte offset of the token at `index` in the source text.
    pub fn position(&self, index: usize) -> usize {
        match self.tokens.get(index).or(self.tokens.last()) {
            Some((_, pos)) => *pos,
            None => 0,
        }
    }

    /// Number of tokens including the end marker.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().map(|(token, _)| token)
    }
}

/// Split `text` into tokens. Whitespace between tokens is skipped. The input
/// ends at `$` or at the end of the text, whichever comes first. Only
/// whitespace may follow the `$`.
pub fn tokenize(text: &str) -> Result<Tokens, Error> {
    let mut tokens: Vec<(Token, usize)> = Vec::new();
    tokens
        .try_reserve(text.len() + 1)
        .map_err(|_| Error::Allocation("token buffer"))?;
    let bytes = text.as_bytes();
    let mut iter = text.char_indices().peekable();
    while let Some(&(pos, c)) = iter.peek() {
        if c.is_whitespace() {
            iter.next();
            continue;
        }
        if c == END_MARKER {
            iter.next();
            if let Some((pos, c)) = iter.find(|(_, c)| !c.is_whitespace()) {
                return Err(Error::Lex { position: pos, found: c });
            }
            tokens.push((Token::End, pos));
            debug!("Tokenized {} tokens", tokens.len());
            return Ok(Tokens { tokens });
        }
        let token = match c {
            '(' => {
                iter.next();
                Token::Open
            }
            ')' => {
                iter.next();
                Token::Close
            }
            '+' | '-' | '*' | '/' | '^' => {
                iter.next();
                match BinaryOp::from_symbol(c) {
                    Some(op) => Token::Operator(op),
                    None => return Err(Error::Lex { position: pos, found: c }),
                }
            }
            c if c.is_ascii_digit() || (c == '.' && is_digit_at(bytes, pos + 1)) => {
                let end = scan_number(bytes, pos);
                while iter.next_if(|(i, _)| *i < end).is_some() {}
                // Literals too large for a double would overflow to infinity.
                match text[pos..end].parse::<f64>() {
                    Ok(val) if val.is_finite() => Token::Number(val),
                    Ok(_) | Err(_) => return Err(Error::Lex { position: pos, found: c }),
                }
            }
            c if c.is_ascii_alphabetic() => {
                let mut end = pos;
                while let Some((i, _)) = iter.next_if(|(_, c)| c.is_ascii_alphabetic()) {
                    end = i + 1;
                }
                resolve_identifier(&text[pos..end], pos)?
            }
            _ => return Err(Error::Lex { position: pos, found: c }),
        };
        tokens.push((token, pos));
    }
    tokens.push((Token::End, text.len()));
    debug!("Tokenized {} tokens", tokens.len());
    return Ok(Tokens { tokens });
}

/// Resolve a run of letters against the name table. Anything that is not a
/// known name must be a single letter, which is taken to be the variable.
pub(crate) fn resolve_identifier(name: &str, position: usize) -> Result<Token, Error> {
    if name == "e" {
        return Ok(Token::Number(std::f64::consts::E));
    }
    if let Some(kind) = FunctionKind::from_name(name) {
        return Ok(Token::Function(kind));
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(label), None) => Ok(Token::Variable(label)),
        _ => Err(Error::UnknownIdentifier {
            position,
            name: name.to_string(),
        }),
    }
}

pub(crate) fn is_digit_at(bytes: &[u8], index: usize) -> bool {
    bytes.get(index).is_some_and(|b| b.is_ascii_digit())
}

/// Find the end of the longest numeric literal starting at `start`: digits,
/// an optional fraction and an optional exponent. The exponent is only
/// consumed when digits follow it, so `2e` is the number 2 followed by `e`.
pub(crate) fn scan_number(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while is_digit_at(bytes, end) {
        end += 1;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while is_digit_at(bytes, end) {
            end += 1;
        }
    }
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        if is_digit_at(bytes, exp) {
            end = exp;
            while is_digit_at(bytes, end) {
                end += 1;
            }
        }
    }
    end
}
