//! Parse, evaluate and simplify Boolean expressions.
//!
//! [Symbols](Symbol) are identified by an integer UID. They can be combined with Boolean operators
//! (negation, disjunction, exclusive disjunction, conjunction, implication and equivalency) to build
//! [expressions](Expr): immutable trees which share their untouched sub-trees when they are transformed.
//! A [State] associates the ```true``` value to a set of symbols: other symbols are implicitly ```false```.
//!
//! ```
//! use boolsim::{Expr, State, Symbol};
//! # use boolsim::BoolsimError;
//! # fn main() -> Result<(), BoolsimError> {
//!
//! // Create some symbols
//! let a = Symbol::from(0);
//! let b = Symbol::from(1);
//! let c = Symbol::from(2);
//!
//! // Define an expression based on these symbols
//! let expr = a & (b | !c);
//! assert_eq!(expr.complexity(), 7);
//!
//! // Evaluate the expression on a state
//! let state: State = "110".parse()?;
//! assert!(expr.eval(&state));
//! # Ok(())
//! # }
//! ```
//!
//! # Named symbols
//!
//! A [SymbolSpace] associates human-readable names to the symbols, which lets us parse and display expressions.
//! Names start with a letter followed by letters or digits. The parser accepts the constants ```0```, ```1```,
//! ```False``` and ```True```, the negation ```!``` (or ```~```) and the binary operators ```|```, ```^```, ```&```,
//! ```=>``` (or ```>```) and ```<=>``` (or ```=```). Binary operators are left associative, implication and
//! equivalency bind less tightly than the other ones.
//!
//! ```
//! use boolsim::SymbolSpace;
//! use boolsim::parse::SymbolParser;
//! # use boolsim::BoolsimError;
//! # fn main() -> Result<(), BoolsimError> {
//!
//! let mut space = SymbolSpace::extending();
//! let expr = space.parse_expression("A => B => !C")?;
//!
//! // The named display can be parsed again
//! assert_eq!(format!("{}", space.named(&expr)), "(A=>B)=>!C");
//! assert_eq!(space.parse_expression("(A=>B)=>!C")?, expr);
//! # Ok(())
//! # }
//! ```
//!
//! # Simplification
//!
//! Truth tables give [normal forms](convert::Algorithm) using Karnaugh maps or the Quine-McCluskey algorithm.
//! The [full simplifier](simplifier::FullSimplifier) combines these normal forms with [rewrite rules](rules::Ruleset)
//! and keeps the least complex equivalent expressions.
//!
//! ```
//! use boolsim::SymbolSpace;
//! use boolsim::convert::Algorithm;
//! use boolsim::parse::SymbolParser;
//! use boolsim::rules::FULL_SIMPLIFICATION_RULES;
//! use boolsim::simplifier::{FullSimplifier, Simplifier};
//! # use boolsim::BoolsimError;
//! # fn main() -> Result<(), BoolsimError> {
//!
//! let mut space = SymbolSpace::extending();
//! let expr = space.parse_expression("(X&Z) | (Z & (!X | (X&Y)))")?;
//! let z = space.parse_expression("Z")?;
//!
//! assert_eq!(Algorithm::Quine.to_dnf(&expr), z);
//!
//! let mut simplifier = FullSimplifier::new(&FULL_SIMPLIFICATION_RULES, &expr)?;
//! assert_eq!(simplifier.step_until_done()?, z);
//! # Ok(())
//! # }
//! ```

mod error;
mod expr;
mod space;
mod states;
mod symbol;

pub mod convert;
pub mod efmt;
pub mod eval;
pub mod implicants;
pub mod karnaugh;
pub mod parse;
pub mod primes;
pub mod reduce;
pub mod rewrite;
pub mod rules;
pub mod simplifier;
pub mod tools;

#[cfg(test)]
mod proptest_helpers;

#[macro_use]
extern crate pest_derive;

// Export public structures and API
pub use efmt::{FormatterConfig, InfixFormatted, PrefixFormatted, DEFAULT_FMT_CFG, SPACED_FMT_CFG};
pub use error::BoolsimError;
pub use expr::{Expr, ExprNode, Operator, PostOrder};
pub use space::{ExtendingSpace, SymbolSpace};
pub use states::State;
pub use symbol::{Iter as SymbolIter, Symbol, SymbolSet};
