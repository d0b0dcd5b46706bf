//! Reference-tree notation.
//!
//! Reference trees arrive as nested parenthesized lists: `(LABEL child ...)`
//! for internal nodes and `(TAG word)` for preterminals, e.g.
//!
//! ```text
//! (S (NP (DT the) (NN dog)) (VP (VBD barked)))
//! ```
//!
//! [`Sexp`] is the generic value the constraint builders consume; what
//! counts as a preterminal is decided by the active [`Treebank`], not by
//! this module.
//!
//! [`Treebank`]: crate::treebank::Treebank

use crate::error::Error;
use std::fmt;

/// A symbol or a parenthesized list of sub-expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sexp {
    /// A bare symbol: a nonterminal label, part-of-speech tag, or word.
    Sym(String),
    /// A parenthesized list of sub-expressions.
    List(Vec<Sexp>),
}

impl Sexp {
    pub fn sym(s: impl Into<String>) -> Self {
        Sexp::Sym(s.into())
    }

    pub fn list(items: Vec<Sexp>) -> Self {
        Sexp::List(items)
    }

    pub fn as_sym(&self) -> Option<&str> {
        match self {
            Sexp::Sym(s) => Some(s),
            Sexp::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Sexp]> {
        match self {
            Sexp::Sym(_) => None,
            Sexp::List(items) => Some(items),
        }
    }

    /// Read exactly one expression from `input`; trailing non-whitespace
    /// is an error.
    pub fn parse(input: &str) -> Result<Sexp, Error> {
        let mut reader = Reader::new(input);
        let expr = reader.read_expr()?;
        reader.skip_whitespace();
        if reader.pos < reader.bytes.len() {
            return Err(Error::TreeSyntax { at: reader.pos, reason: "trailing input after expression" });
        }
        Ok(expr)
    }

    /// Read every expression in `input`, in order. An empty (or
    /// whitespace-only) input yields an empty vector.
    pub fn parse_all(input: &str) -> Result<Vec<Sexp>, Error> {
        let mut reader = Reader::new(input);
        let mut exprs = Vec::new();
        loop {
            reader.skip_whitespace();
            if reader.pos >= reader.bytes.len() {
                return Ok(exprs);
            }
            exprs.push(reader.read_expr()?);
        }
    }
}

impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sexp::Sym(s) => f.write_str(s),
            Sexp::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

// --- Reader -----------------------------------------------------------------

/// Byte-position scanner over the textual notation. Symbols are maximal
/// runs of non-whitespace, non-parenthesis bytes; anything the treebank
/// wants to treat specially (e.g. `-LRB-` tokens) passes through untouched.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Reader { bytes: input.as_bytes(), pos: 0 }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn read_expr(&mut self) -> Result<Sexp, Error> {
        self.skip_whitespace();
        match self.bytes.get(self.pos) {
            None => Err(Error::TreeSyntax { at: self.pos, reason: "unexpected end of input" }),
            Some(b')') => Err(Error::TreeSyntax { at: self.pos, reason: "unexpected `)`" }),
            Some(b'(') => {
                self.pos += 1;
                let mut items = Vec::new();
                loop {
                    self.skip_whitespace();
                    match self.bytes.get(self.pos) {
                        None => {
                            return Err(Error::TreeSyntax {
                                at: self.pos,
                                reason: "unclosed `(`",
                            });
                        }
                        Some(b')') => {
                            self.pos += 1;
                            return Ok(Sexp::List(items));
                        }
                        Some(_) => items.push(self.read_expr()?),
                    }
                }
            }
            Some(_) => Ok(self.read_symbol()),
        }
    }

    fn read_symbol(&mut self) -> Sexp {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'(' | b')' => break,
                b if b.is_ascii_whitespace() => break,
                _ => self.pos += 1,
            }
        }
        // the scanner only ever splits at ASCII boundaries, so the slice
        // stays valid UTF-8
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or_default();
        Sexp::Sym(text.to_string())
    }
}
