//! Recursive-descent parser for condition strings.
//!
//! ```text
//! expression := conjunction ("or" conjunction)*
//! conjunction := unary ("and" unary)*
//! unary := "not" unary | "(" expression ")" | function
//! function := name "(" argument ("," argument)* ")"
//! ```
use std::path::{Component, Path, PathBuf};

use regex::{Regex, RegexBuilder};

use crate::condition::error::ConditionError;
use crate::condition::version::{Comparator, Version};
use crate::kernel::constants::is_regex_name;

/// A parsed condition.
#[derive(Debug, Clone)]
pub enum Expression {
    Function(Function),
    Not(Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
}

/// A condition function call.
#[derive(Debug, Clone)]
pub enum Function {
    /// `file("path")`
    File(PathSpec),
    /// `readable("path")`
    Readable(PathBuf),
    /// `active("plugin")`
    Active(PathSpec),
    /// `many("regex")`
    Many(PathSpec),
    /// `many_active("regex")`
    ManyActive(PathSpec),
    /// `is_master("plugin")`
    IsMaster(String),
    /// `checksum("path", CRC)`
    Checksum(PathBuf, u32),
    /// `version("path", "version", comparator)`
    Version(PathBuf, Version, Comparator),
}

/// A path argument whose file-name part may be a regex.
#[derive(Debug, Clone)]
pub struct PathSpec {
    /// Directory part, relative to the data directory
    pub parent: PathBuf,
    /// File-name part as written
    pub file_name: String,
    /// Compiled, anchored and case-insensitive, when the file name is a regex
    pub regex: Option<Regex>,
}

impl PathSpec {
    /// The full relative path, for literal specs.
    pub fn path(&self) -> PathBuf {
        self.parent.join(&self.file_name)
    }

    pub fn is_regex(&self) -> bool {
        self.regex.is_some()
    }

    /// Whether `name` (a bare file name) matches this spec.
    pub fn matches(&self, name: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(name),
            None => crate::metadata::names_equal(&self.file_name, name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Str(String),
    Comparator(Comparator),
    LeftParen,
    RightParen,
    Comma,
}

/// Parses `condition` into an expression tree.
pub fn parse_condition(condition: &str) -> Result<Expression, ConditionError> {
    let tokens = tokenize(condition)?;
    let mut parser = Parser {
        condition,
        tokens,
        position: 0,
    };
    let expression = parser.expression()?;
    if let Some(&(offset, ref token)) = parser.peek() {
        return Err(ConditionError::syntax(
            condition,
            offset,
            format!("unexpected {:?} after complete expression", token),
        ));
    }
    Ok(expression)
}

fn tokenize(condition: &str) -> Result<Vec<(usize, Token)>, ConditionError> {
    let mut tokens = Vec::new();
    let mut chars = condition.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push((offset, Token::LeftParen));
            }
            ')' => {
                chars.next();
                tokens.push((offset, Token::RightParen));
            }
            ',' => {
                chars.next();
                tokens.push((offset, Token::Comma));
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '"' {
                        closed = true;
                        break;
                    }
                    value.push(c);
                }
                if !closed {
                    return Err(ConditionError::syntax(condition, offset, "unterminated string"));
                }
                tokens.push((offset, Token::Str(value)));
            }
            '=' | '!' | '<' | '>' => {
                let mut symbol = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if matches!(c, '=' | '!' | '<' | '>') {
                        symbol.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let comparator = symbol
                    .parse::<Comparator>()
                    .map_err(|reason| ConditionError::syntax(condition, offset, reason))?;
                tokens.push((offset, Token::Comparator(comparator)));
            }
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((offset, Token::Word(word)));
            }
            other => {
                return Err(ConditionError::syntax(
                    condition,
                    offset,
                    format!("unexpected character '{}'", other),
                ));
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    condition: &'a str,
    tokens: Vec<(usize, Token)>,
    position: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&(usize, Token)> {
        self.tokens.get(self.position)
    }

    fn peek_word(&self, word: &str) -> bool {
        matches!(self.peek(), Some((_, Token::Word(w))) if w == word)
    }

    fn next(&mut self) -> Result<(usize, Token), ConditionError> {
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .ok_or_else(|| ConditionError::syntax(self.condition, self.condition.len(), "unexpected end of condition"))?;
        self.position += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ConditionError> {
        let (offset, token) = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(ConditionError::syntax(
                self.condition,
                offset,
                format!("expected {:?}, found {:?}", expected, token),
            ))
        }
    }

    fn expression(&mut self) -> Result<Expression, ConditionError> {
        let mut left = self.conjunction()?;
        while self.peek_word("or") {
            self.position += 1;
            let right = self.conjunction()?;
            left = Expression::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn conjunction(&mut self) -> Result<Expression, ConditionError> {
        let mut left = self.unary()?;
        while self.peek_word("and") {
            self.position += 1;
            let right = self.unary()?;
            left = Expression::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expression, ConditionError> {
        if self.peek_word("not") {
            self.position += 1;
            return Ok(Expression::Not(Box::new(self.unary()?)));
        }

        if matches!(self.peek(), Some((_, Token::LeftParen))) {
            self.position += 1;
            let inner = self.expression()?;
            self.expect(Token::RightParen)?;
            return Ok(inner);
        }

        self.function().map(Expression::Function)
    }

    fn function(&mut self) -> Result<Function, ConditionError> {
        let (offset, token) = self.next()?;
        let Token::Word(name) = token else {
            return Err(ConditionError::syntax(
                self.condition,
                offset,
                format!("expected a function name, found {:?}", token),
            ));
        };

        self.expect(Token::LeftParen)?;
        let function = match name.as_str() {
            "file" => Function::File(self.path_spec()?),
            "readable" => Function::Readable(self.safe_path()?),
            "active" => Function::Active(self.path_spec()?),
            "many" => Function::Many(self.path_spec()?),
            "many_active" => Function::ManyActive(self.path_spec()?),
            "is_master" => Function::IsMaster(self.string()?),
            "checksum" => {
                let path = self.safe_path()?;
                self.expect(Token::Comma)?;
                Function::Checksum(path, self.crc()?)
            }
            "version" => {
                let path = self.safe_path()?;
                self.expect(Token::Comma)?;
                let version = Version::parse(&self.string()?);
                self.expect(Token::Comma)?;
                Function::Version(path, version, self.comparator()?)
            }
            unknown => {
                return Err(ConditionError::syntax(
                    self.condition,
                    offset,
                    format!("unknown function '{}'", unknown),
                ));
            }
        };
        self.expect(Token::RightParen)?;

        Ok(function)
    }

    fn string(&mut self) -> Result<String, ConditionError> {
        match self.next()? {
            (_, Token::Str(value)) => Ok(value),
            (offset, token) => Err(ConditionError::syntax(
                self.condition,
                offset,
                format!("expected a quoted string, found {:?}", token),
            )),
        }
    }

    fn crc(&mut self) -> Result<u32, ConditionError> {
        let (offset, token) = self.next()?;
        let digits = match &token {
            Token::Word(word) => word.trim_start_matches("0x").trim_start_matches("0X"),
            _ => "",
        };
        u32::from_str_radix(digits, 16).map_err(|_| {
            ConditionError::syntax(self.condition, offset, format!("expected a hexadecimal CRC, found {:?}", token))
        })
    }

    fn comparator(&mut self) -> Result<Comparator, ConditionError> {
        match self.next()? {
            (_, Token::Comparator(comparator)) => Ok(comparator),
            (offset, token) => Err(ConditionError::syntax(
                self.condition,
                offset,
                format!("expected a comparator, found {:?}", token),
            )),
        }
    }

    fn safe_path(&mut self) -> Result<PathBuf, ConditionError> {
        let raw = self.string()?;
        check_path_is_safe(self.condition, &raw)?;
        Ok(PathBuf::from(raw))
    }

    fn path_spec(&mut self) -> Result<PathSpec, ConditionError> {
        let raw = self.string()?;
        check_path_is_safe(self.condition, &raw)?;

        let (parent, file_name) = match raw.rfind('/') {
            Some(split) => (PathBuf::from(&raw[..split]), raw[split + 1..].to_string()),
            None => (PathBuf::new(), raw.clone()),
        };

        let regex = if is_regex_name(&file_name) {
            let compiled = RegexBuilder::new(&format!("^(?:{})$", file_name))
                .case_insensitive(true)
                .build()
                .map_err(|source| ConditionError::InvalidRegex {
                    condition: self.condition.to_string(),
                    pattern: file_name.clone(),
                    source,
                })?;
            Some(compiled)
        } else {
            None
        };

        Ok(PathSpec {
            parent,
            file_name,
            regex,
        })
    }
}

/// Rejects paths that climb out of the game directory, which sits one level
/// above the data directory. Regex file names are left to the caller, so only
/// the directory components are checked for them.
fn check_path_is_safe(condition: &str, raw: &str) -> Result<(), ConditionError> {
    let unsafe_path = || ConditionError::UnsafePath {
        condition: condition.to_string(),
        path: raw.to_string(),
    };

    let directory_part = match raw.rfind('/') {
        Some(split) if is_regex_name(&raw[split + 1..]) => &raw[..split],
        None if is_regex_name(raw) => "",
        _ => raw,
    };

    let mut depth: i32 = 0;
    for component in Path::new(directory_part).components() {
        match component {
            Component::ParentDir => depth -= 1,
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return Err(unsafe_path()),
        }
        if depth < -1 {
            return Err(unsafe_path());
        }
    }
    Ok(())
}
