//! Memory access traces.
//!
//! A trace is a text file with one access per line, `<address> <R|W>`, e.g.
//!
//! ```text
//! 0041f7a0 R
//! 13f5e2c0 W
//! ```
//!
//! The address token is opaque: it is only ever compared for equality.

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};

use regex::Regex;

use crate::error::{Error, Result};
use crate::parse_err;

/// An opaque virtual memory address token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    pub fn new(token: impl Into<String>) -> Self {
        Address(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Address {
    fn from(token: &str) -> Self {
        Address(token.to_string())
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single memory access event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Access {
    pub address: Address,
    pub is_write: bool,
}

impl Access {
    pub fn read(address: impl Into<String>) -> Self {
        Access { address: Address::new(address), is_write: false }
    }

    pub fn write(address: impl Into<String>) -> Self {
        Access { address: Address::new(address), is_write: true }
    }
}

impl Display for Access {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.address, if self.is_write { "W" } else { "R" })
    }
}

/// Parser for the line oriented trace format.
pub struct Parser {
    line: Regex,
}

impl Parser {
    pub fn new() -> Result<Self> {
        let line = Regex::new(r"^\s*(\S+)\s+([RrWw])\s*$")?;
        Ok(Parser { line })
    }

    /// Parse one trace line. `lineno` is 1-based and only used in errors.
    pub fn parse_line(&self, line: &str, lineno: usize) -> Result<Access> {
        let caps = self
            .line
            .captures(line)
            .ok_or_else(|| parse_err!("invalid trace line {}: {:?}", lineno, line))?;
        let is_write = caps[2].eq_ignore_ascii_case("w");
        Ok(Access { address: Address::new(&caps[1]), is_write })
    }

    /// Parse a whole trace, blank lines are skipped.
    pub fn parse<R: Read>(&self, reader: R) -> Result<Trace> {
        let mut accesses = vec![];
        for (i, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            accesses.push(self.parse_line(&line, i + 1)?);
        }
        Ok(Trace { accesses })
    }
}

/// A fully loaded trace, in replay order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trace {
    accesses: Vec<Access>,
}

impl Trace {
    pub fn new(accesses: Vec<Access>) -> Self {
        Trace { accesses }
    }

    pub fn open(path: &str) -> Result<Trace> {
        let file =
            File::open(path).map_err(|err| Error::Io(format!("open trace {}: {}", path, err)))?;
        Parser::new()?.parse(file)
    }

    pub fn len(&self) -> usize {
        self.accesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accesses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Access> {
        self.accesses.iter()
    }

    /// Every address paired with its 0-based position in the trace.
    pub fn positions(&self) -> impl Iterator<Item = (Address, u64)> + '_ {
        self.accesses.iter().enumerate().map(|(i, a)| (a.address.clone(), i as u64))
    }
}

impl FromIterator<Access> for Trace {
    fn from_iter<T: IntoIterator<Item = Access>>(iter: T) -> Self {
        Trace { accesses: iter.into_iter().collect() }
    }
}
