use crate::efmt::{InfixFormatted, DEFAULT_FMT_CFG};
use crate::parse::SymbolParser;
use crate::*;

use once_cell::sync::Lazy;
use regex::Regex;
use slab::Slab;
use std::collections::HashMap;
use std::fmt;

static RE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").unwrap());

/// Names which would be read back as constants
static RESERVED_NAMES: [&str; 2] = ["True", "False"];

/// Associate symbols with their name.
///
/// Adding a new name to the space triggers the creation of a symbol associated to a unique integer UID
/// (using successive UIDs). Symbols can then be used independently of the space.
/// A request with an existing name allows to recover the symbol with the same UID.
///
/// The space is used to retrieve the name associated with existing symbols, which is especially useful
/// to display Boolean expressions, and to parse expressions.
/// A space can be configured to create new symbols when parsing unknown names.
///
/// ```
/// use boolsim::SymbolSpace;
/// use boolsim::parse::SymbolParser;
/// # use boolsim::BoolsimError;
/// # fn main() -> Result<(), BoolsimError> {
///
/// let mut space = SymbolSpace::default();
/// let a = space.provide("A")?;
/// assert_eq!(space.provide("A")?, a);
///
/// // Strict parsing only accepts known names
/// assert!(space.parse_expression("A & B").is_err());
///
/// // Extended parsing creates the missing symbols
/// let expr = space.extend().parse_expression("A & B")?;
/// assert_eq!(space.len(), 2);
/// println!("{}", space.named(&expr));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default, Debug)]
pub struct SymbolSpace {
    /// The name of each symbol
    names: Slab<String>,

    /// Find a symbol by name
    name2uid: HashMap<String, Symbol>,

    /// auto create symbols when parsing
    auto_extend: bool,
}

/// Temporary handle on a symbol space which creates missing symbols when parsing
pub struct ExtendingSpace<'a>(&'a mut SymbolSpace);

impl SymbolSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty space which creates missing symbols when parsing
    pub fn extending() -> Self {
        Self {
            auto_extend: true,
            ..Self::default()
        }
    }

    pub fn set_auto_extend(&mut self, b: bool) {
        self.auto_extend = b;
    }

    /// Borrow this space to parse expressions while creating missing symbols
    pub fn extend(&mut self) -> ExtendingSpace {
        ExtendingSpace(self)
    }

    /// Retrieve a named symbol or create it if needed.
    ///
    /// Returns an error if the name is invalid, in this case the space is not modified.
    pub fn provide(&mut self, name: &str) -> Result<Symbol, BoolsimError> {
        if let Some(s) = self.name2uid.get(name) {
            return Ok(*s);
        }

        // Reject invalid names
        if !RE_NAME.is_match(name) || RESERVED_NAMES.contains(&name) {
            return Err(BoolsimError::InvalidName(name.into()));
        }

        let s = Symbol(self.names.insert(name.into()));
        self.name2uid.insert(name.into(), s);
        Ok(s)
    }

    /// Search a symbol with the given name
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.name2uid.get(name).copied()
    }

    /// Search a symbol with the given name
    pub fn get_or_err(&self, name: &str) -> Result<Symbol, BoolsimError> {
        self.get(name)
            .ok_or_else(|| BoolsimError::UnknownName(name.into()))
    }

    /// Get the name of a symbol
    pub fn name(&self, s: Symbol) -> Option<&str> {
        self.names.get(s.uid()).map(|n| n.as_str())
    }

    /// Check if a symbol is part of the space
    pub fn contains(&self, s: Symbol) -> bool {
        self.names.contains(s.uid())
    }

    /// Get the number of assigned symbols
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Return whether there are no symbols in this space
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate on all symbols of this space with their names
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.names.iter().map(|(uid, name)| (Symbol(uid), name.as_str()))
    }

    /// Apply symbol names from this space to an expression.
    ///
    /// This operation is only useful to display expressions.
    /// Symbols which are not part of this space receive their default UID-based name.
    pub fn named<'a>(&'a self, expr: &'a Expr) -> InfixFormatted<'a> {
        DEFAULT_FMT_CFG.infix(expr, Some(self))
    }

    /// Insert the name of a symbol during a display operation.
    pub fn format_symbol(&self, f: &mut fmt::Formatter, s: Symbol) -> fmt::Result {
        match self.name(s) {
            None => write!(f, "{}", s),
            Some(name) => write!(f, "{}", name),
        }
    }
}

impl SymbolParser for SymbolSpace {
    fn parse_symbol(&mut self, name: &str) -> Result<Symbol, BoolsimError> {
        match self.auto_extend {
            true => self.provide(name),
            false => self.get_or_err(name),
        }
    }
}

impl SymbolParser for ExtendingSpace<'_> {
    fn parse_symbol(&mut self, name: &str) -> Result<Symbol, BoolsimError> {
        self.0.provide(name)
    }
}
