//! Parse Boolean expressions from text.
//!
//! The text is first split into tokens, converted into postfix notation with the shunting-yard
//! algorithm and finally assembled on an operand stack. All binary operators are left associative.
//!
//! | Tokens                 | Meaning                          | Precedence |
//! |------------------------|----------------------------------|------------|
//! | `0`, `False`           | constant false                   |            |
//! | `1`, `True`            | constant true                    |            |
//! | `!`, `~`               | negation                         | 10         |
//! | `\|`, `\|\|`           | disjunction                      | 8          |
//! | `^`                    | exclusive disjunction            | 8          |
//! | `&`, `&&`              | conjunction                      | 8          |
//! | `=>`, `>`              | implication                      | 4          |
//! | `<=>`, `=`             | equivalency                      | 4          |
//!
//! Symbol names start with a letter followed by letters and digits.
//! Whitespace is accepted between tokens.
//!
//! The constants `True` and `False` are only recognized as whole words: `Truth` or `Falsehood`
//! are read as symbol names instead of a constant followed by a symbol.

use crate::*;
use pest::Parser;

#[derive(Parser)]
#[grammar_inline = r####"
tokens = _{ SOI ~ token* ~ EOI }
token  = _{ ctrue | cfalse | not_op | or_op | xor_op | and_op | imp_op | eqv_op | symbol | open | close }

ctrue  = @{ "1" | "True" ~ !ASCII_ALPHANUMERIC }
cfalse = @{ "0" | "False" ~ !ASCII_ALPHANUMERIC }
not_op =  { "!" | "~" }
or_op  =  { "||" | "|" }
xor_op =  { "^" }
and_op =  { "&&" | "&" }
imp_op =  { "=>" | ">" }
eqv_op =  { "<=>" | "=" }
symbol = @{ ASCII_ALPHA ~ ASCII_ALPHANUMERIC* }
open   =  { "(" }
close  =  { ")" }

WHITESPACE = _{ " " | "\t" | "\r" | "\n" }
"####]
struct TokenParser;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Token<'a> {
    Constant(bool),
    Symbol(&'a str),
    Not,
    Binary(Operator),
    Open,
    Close,
}

impl Token<'_> {
    /// Priority of a token waiting on the operator stack
    fn precedence(&self) -> u8 {
        match self {
            Token::Not => expr::NEGATION_PRECEDENCE,
            Token::Binary(op) => op.precedence(),
            _ => 0,
        }
    }
}

fn tokenize(s: &str) -> Result<Vec<Token>, BoolsimError> {
    let pairs = TokenParser::parse(Rule::tokens, s).map_err(|_| BoolsimError::InvalidExpression)?;

    let mut tokens = vec![];
    for pair in pairs {
        let token = match pair.as_rule() {
            Rule::ctrue => Token::Constant(true),
            Rule::cfalse => Token::Constant(false),
            Rule::not_op => Token::Not,
            Rule::or_op => Token::Binary(Operator::Disjunction),
            Rule::xor_op => Token::Binary(Operator::ExclusiveDisjunction),
            Rule::and_op => Token::Binary(Operator::Conjunction),
            Rule::imp_op => Token::Binary(Operator::Implication),
            Rule::eqv_op => Token::Binary(Operator::Equivalency),
            Rule::symbol => Token::Symbol(pair.as_str()),
            Rule::open => Token::Open,
            Rule::close => Token::Close,
            Rule::EOI => continue,
            _ => return Err(BoolsimError::InvalidExpression),
        };
        tokens.push(token);
    }
    Ok(tokens)
}

/// Reorder tokens in postfix notation.
///
/// A virtual count of operands rejects most malformed expressions before building anything:
/// each binary operator needs two available operands and exactly one must remain at the end.
fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, BoolsimError> {
    fn pop_operator<'a>(stack: &mut Vec<Token<'a>>, operands: &mut usize) -> Result<Token<'a>, BoolsimError> {
        let token = stack.pop().ok_or(BoolsimError::InvalidExpression)?;
        if let Token::Binary(_) = token {
            if *operands < 2 {
                return Err(BoolsimError::InvalidExpression);
            }
            *operands -= 1;
        }
        Ok(token)
    }

    let mut postfix = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = vec![];
    let mut operands = 0;
    let mut after_operand = false;

    for token in tokens {
        match token {
            // a negation can not follow its operand
            Token::Not if after_operand => return Err(BoolsimError::InvalidExpression),
            Token::Open | Token::Not => stack.push(token),
            Token::Constant(_) | Token::Symbol(_) => {
                operands += 1;
                postfix.push(token);
            }
            Token::Binary(_) => {
                while stack
                    .last()
                    .map_or(false, |top| top.precedence() >= token.precedence())
                {
                    postfix.push(pop_operator(&mut stack, &mut operands)?);
                }
                stack.push(token);
            }
            Token::Close => loop {
                match stack.last() {
                    None => return Err(BoolsimError::InvalidExpression),
                    Some(Token::Open) => {
                        stack.pop();
                        break;
                    }
                    Some(_) => postfix.push(pop_operator(&mut stack, &mut operands)?),
                }
            },
        }
        after_operand = matches!(token, Token::Constant(_) | Token::Symbol(_) | Token::Close);
    }

    while !stack.is_empty() {
        match pop_operator(&mut stack, &mut operands)? {
            Token::Open => return Err(BoolsimError::InvalidExpression),
            op => postfix.push(op),
        }
    }

    match operands {
        1 => Ok(postfix),
        _ => Err(BoolsimError::InvalidExpression),
    }
}

/// Map symbol names to actual symbols while parsing expressions.
///
/// The [symbol space](SymbolSpace) is the main implementation of this trait.
pub trait SymbolParser {
    fn parse_symbol(&mut self, name: &str) -> Result<Symbol, BoolsimError>;

    fn parse_expression(&mut self, s: &str) -> Result<Expr, BoolsimError> {
        let postfix = to_postfix(tokenize(s)?)?;

        let mut operands: Vec<Expr> = vec![];
        for token in postfix {
            let expr = match token {
                Token::Constant(b) => Expr::from(b),
                Token::Symbol(name) => Expr::from(self.parse_symbol(name)?),
                Token::Not => !operands.pop().ok_or(BoolsimError::InvalidExpression)?,
                Token::Binary(op) => {
                    let rhs = operands.pop().ok_or(BoolsimError::InvalidExpression)?;
                    let lhs = operands.pop().ok_or(BoolsimError::InvalidExpression)?;
                    op.join(lhs, rhs)
                }
                Token::Open | Token::Close => return Err(BoolsimError::InvalidExpression),
            };
            operands.push(expr);
        }

        match (operands.pop(), operands.is_empty()) {
            (Some(expr), true) => Ok(expr),
            _ => Err(BoolsimError::InvalidExpression),
        }
    }
}
