use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    procedure::{Procedure, ProcedureMap, ProcedureScanner},
};
use thiserror::Error as ThisError;

///
/// ScanError
///
/// Malformed script text. Line numbers are 1-based.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ScanError {
    #[error("line {line}: expected 'def', found '{found}'")]
    UnexpectedToken { line: usize, found: char },

    #[error("line {line}: expected a procedure name after 'def'")]
    MissingName { line: usize },

    #[error("line {line}: procedure '{name}' is missing its parameter list")]
    MissingParams { name: String, line: usize },

    #[error("line {line}: parameter list of '{name}' is not closed")]
    UnterminatedParams { name: String, line: usize },

    #[error("line {line}: invalid parameter '{param}' in '{name}'")]
    InvalidParam {
        name: String,
        param: String,
        line: usize,
    },

    #[error("line {line}: procedure '{name}' is missing its body")]
    MissingBody { name: String, line: usize },

    #[error("line {line}: body of '{name}' is not closed")]
    UnterminatedBody { name: String, line: usize },

    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },

    #[error("line {line}: unterminated block comment")]
    UnterminatedComment { line: usize },

    #[error("line {line}: procedure '{name}' is defined more than once")]
    DuplicateProcedure { name: String, line: usize },
}

impl From<ScanError> for InternalError {
    fn from(err: ScanError) -> Self {
        Self::new(ErrorClass::InvalidInput, ErrorOrigin::Scan, err.to_string())
    }
}

///
/// GroovyScanner
///
/// Extracts top-level `def name(params) { body }` declarations.
/// Only whitespace and comments may appear between declarations.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct GroovyScanner;

impl ProcedureScanner for GroovyScanner {
    fn scan(&self, text: &str) -> Result<ProcedureMap, ScanError> {
        Cursor::new(text).scan_all()
    }
}

const fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

const fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn is_ident(s: &str) -> bool {
    let bytes = s.as_bytes();

    bytes.first().copied().is_some_and(is_ident_start) && bytes.iter().copied().all(is_ident_char)
}

// type annotations may carry generics, arrays, and package paths;
// whitespace and commas are only allowed inside generic arguments
fn is_type_name(s: &str) -> bool {
    let mut depth = 0usize;

    for b in s.bytes() {
        match b {
            b'<' => depth += 1,
            b'>' => {
                let Some(next) = depth.checked_sub(1) else {
                    return false;
                };
                depth = next;
            }
            b',' if depth > 0 => {}
            b if b.is_ascii_whitespace() && depth > 0 => {}
            b if is_ident_char(b) || matches!(b, b'[' | b']' | b'.') => {}
            _ => return false,
        }
    }

    !s.is_empty() && depth == 0
}

// splits a parameter list on commas outside generic arguments
fn split_params(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, b) in raw.bytes().enumerate() {
        match b {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&raw[start..]);

    parts
}

///
/// Cursor
///

struct Cursor<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    const fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn scan_all(mut self) -> Result<ProcedureMap, ScanError> {
        let mut procedures = ProcedureMap::new();

        loop {
            self.skip_trivia()?;
            if self.at_end() {
                break;
            }

            let start = self.pos;
            let procedure = self.definition()?;
            if procedures.contains_key(&procedure.name) {
                return Err(ScanError::DuplicateProcedure {
                    name: procedure.name,
                    line: self.line_at(start),
                });
            }
            procedures.insert(procedure);
        }

        Ok(procedures)
    }

    // def name(params) { body }
    fn definition(&mut self) -> Result<Procedure, ScanError> {
        let start = self.pos;
        if !self.eat_keyword("def") {
            return Err(ScanError::UnexpectedToken {
                line: self.line_at(start),
                found: self.peek_char(),
            });
        }

        self.skip_trivia()?;
        let name = self
            .ident()
            .ok_or_else(|| ScanError::MissingName { line: self.line() })?
            .to_string();

        self.skip_trivia()?;
        if !self.eat(b'(') {
            return Err(ScanError::MissingParams {
                name,
                line: self.line(),
            });
        }
        let params = self.params(&name)?;

        self.skip_trivia()?;
        if !self.eat(b'{') {
            return Err(ScanError::MissingBody {
                name,
                line: self.line(),
            });
        }
        let body = self.block(&name, start)?.to_string();

        Ok(Procedure::new(name, params, body))
    }

    fn params(&mut self, name: &str) -> Result<Vec<String>, ScanError> {
        let start = self.pos;
        let Some(offset) = self.bytes[start..].iter().position(|&b| b == b')') else {
            return Err(ScanError::UnterminatedParams {
                name: name.to_string(),
                line: self.line_at(start),
            });
        };
        let raw = &self.src[start..start + offset];
        self.pos = start + offset + 1;

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        split_params(raw)
            .into_iter()
            .map(|part| {
                let part = part.trim();
                let (ty, param) = match part.rsplit_once(|c: char| c.is_ascii_whitespace()) {
                    Some((ty, param)) => (Some(ty.trim()), param),
                    None => (None, part),
                };

                if is_ident(param) && ty.is_none_or(is_type_name) {
                    Ok(param.to_string())
                } else {
                    Err(ScanError::InvalidParam {
                        name: name.to_string(),
                        param: part.to_string(),
                        line: self.line_at(start),
                    })
                }
            })
            .collect()
    }

    // Consumes a brace-balanced block whose opening brace was already eaten.
    // Returns the text between the braces.
    fn block(&mut self, name: &str, open: usize) -> Result<&'a str, ScanError> {
        let start = self.pos;
        let mut depth = 1usize;

        while !self.at_end() {
            match self.bytes[self.pos] {
                b'\'' | b'"' => self.string()?,
                b'/' if self.starts_with("//") => self.line_comment(),
                b'/' if self.starts_with("/*") => self.block_comment()?,
                b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        return Ok(&self.src[start..self.pos - 1]);
                    }
                }
                _ => self.pos += 1,
            }
        }

        Err(ScanError::UnterminatedBody {
            name: name.to_string(),
            line: self.line_at(open),
        })
    }

    fn string(&mut self) -> Result<(), ScanError> {
        let start = self.pos;
        let quote = self.bytes[self.pos];
        let triple = [quote; 3];

        if self.bytes[self.pos..].starts_with(&triple) {
            self.pos += 3;
            while !self.at_end() {
                if self.bytes[self.pos] == b'\\' {
                    self.pos += 2;
                    continue;
                }
                if self.bytes[self.pos..].starts_with(&triple) {
                    self.pos += 3;
                    return Ok(());
                }
                self.pos += 1;
            }

            return Err(ScanError::UnterminatedString {
                line: self.line_at(start),
            });
        }

        self.pos += 1;
        while !self.at_end() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'\n' => break,
                b if b == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }

        Err(ScanError::UnterminatedString {
            line: self.line_at(start),
        })
    }

    fn line_comment(&mut self) {
        while !self.at_end() && self.bytes[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn block_comment(&mut self) -> Result<(), ScanError> {
        let start = self.pos;
        self.pos += 2;

        match self.src[self.pos..].find("*/") {
            Some(offset) => {
                self.pos += offset + 2;
                Ok(())
            }
            None => Err(ScanError::UnterminatedComment {
                line: self.line_at(start),
            }),
        }
    }

    fn skip_trivia(&mut self) -> Result<(), ScanError> {
        while !self.at_end() {
            let b = self.bytes[self.pos];
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if self.starts_with("//") {
                self.line_comment();
            } else if self.starts_with("/*") {
                self.block_comment()?;
            } else {
                break;
            }
        }

        Ok(())
    }

    fn ident(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if !self.bytes.get(start).copied().is_some_and(is_ident_start) {
            return None;
        }

        let len = self.bytes[start..]
            .iter()
            .take_while(|&&b| is_ident_char(b))
            .count();
        self.pos = start + len;

        Some(&self.src[start..self.pos])
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let end = self.pos + keyword.len();
        let boundary = self.bytes.get(end).is_none_or(|&b| !is_ident_char(b));

        if self.starts_with(keyword) && boundary {
            self.pos = end;
            true
        } else {
            false
        }
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.bytes.get(self.pos) == Some(&b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.bytes[self.pos..].starts_with(s.as_bytes())
    }

    fn peek_char(&self) -> char {
        self.src[self.pos..].chars().next().unwrap_or(' ')
    }

    const fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn line(&self) -> usize {
        self.line_at(self.pos)
    }

    // error paths only
    fn line_at(&self, pos: usize) -> usize {
        let end = pos.min(self.bytes.len());

        self.bytes[..end].iter().filter(|&&b| b == b'\n').count() + 1
    }
}
