//! Formula parser for R-style formulas
//!
//! Supported syntax:
//! - Response variables: `y ~ x1 + x2`
//! - Intercept control: `y ~ 0 + x1`, `y ~ x1 - 1`, `y ~ 1`
//! - Interactions: `x1:x2`, and crossing: `a*b` expands to `a + b + a:b`
//! - Term removal: `a*b - a:b`
//! - Function calls: `log(x)`, `sqrt(x)`, `I(x)`, `poly(x, 2)`

use std::iter::Peekable;
use std::str::Chars;

use crate::formula::error::{FormulaError, FormulaResult};
use crate::formula::{Formula, Term};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Plus,
    Minus,
}

/// Formula parser
pub struct FormulaParser<'a> {
    chars: Peekable<Chars<'a>>,
    original: &'a str,
    position: usize,
}

impl<'a> FormulaParser<'a> {
    /// Create a new parser
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            original: input,
            position: 0,
        }
    }

    /// Parse a formula
    pub fn parse(formula: &str) -> FormulaResult<Formula> {
        FormulaParser::new(formula).parse_formula()
    }

    fn parse_formula(&mut self) -> FormulaResult<Formula> {
        self.skip_whitespace();
        if self.peek_char().is_none() {
            return Err(FormulaError::syntax(self.position, "Empty formula"));
        }

        let response = self.parse_response()?;
        self.expect('~')?;
        let (has_intercept, terms) = self.parse_rhs()?;

        self.skip_whitespace();
        if self.peek_char().is_some() {
            let remaining: String = self.chars.clone().collect();
            return Err(FormulaError::syntax_with_context(
                self.position,
                "Trailing characters after formula",
                format!("Unexpected: '{remaining}'"),
            ));
        }

        Ok(Formula {
            response,
            terms,
            has_intercept,
            original: self.original.trim().to_string(),
        })
    }

    /// Parse response variable (left side of ~)
    fn parse_response(&mut self) -> FormulaResult<Option<String>> {
        if self.peek_char() == Some('~') {
            return Ok(None);
        }

        let ident = self.parse_identifier()?;
        self.skip_whitespace();
        if self.peek_char() == Some('~') {
            Ok(Some(ident))
        } else {
            Err(FormulaError::syntax_with_context(
                self.position,
                "Expected '~' after response variable",
                format!("Found '{}' instead", self.peek_char().unwrap_or(' ')),
            ))
        }
    }

    /// Parse the right-hand side: signed summands joined by '+' and '-'
    fn parse_rhs(&mut self) -> FormulaResult<(bool, Vec<Term>)> {
        let mut has_intercept = true;
        let mut added: Vec<Term> = Vec::new();
        let mut removed: Vec<Term> = Vec::new();

        self.skip_whitespace();
        let mut sign = if self.peek_char() == Some('-') {
            self.bump();
            Sign::Minus
        } else {
            Sign::Plus
        };

        loop {
            self.skip_whitespace();
            match self.peek_char() {
                None => {
                    return Err(FormulaError::syntax(
                        self.position,
                        "Expected term after operator",
                    ));
                }
                Some(c) if c.is_ascii_digit() => {
                    let start = self.position;
                    let literal = self.parse_number()?;
                    has_intercept = match (literal.as_str(), sign) {
                        ("1", Sign::Plus) | ("0", Sign::Minus) => true,
                        ("0", Sign::Plus) | ("1", Sign::Minus) => false,
                        _ => {
                            return Err(FormulaError::syntax(
                                start,
                                format!("Only 0 or 1 may appear as a term, found '{literal}'"),
                            ));
                        }
                    };
                }
                Some(_) => {
                    let expanded = self.parse_product()?;
                    match sign {
                        Sign::Plus => added.extend(expanded),
                        Sign::Minus => removed.extend(expanded),
                    }
                }
            }

            self.skip_whitespace();
            sign = match self.peek_char() {
                Some('+') => Sign::Plus,
                Some('-') => Sign::Minus,
                _ => break,
            };
            self.bump();
        }

        let removed_keys: Vec<Vec<String>> = removed.iter().map(Term::key).collect();
        let mut terms: Vec<Term> = Vec::new();
        for term in added {
            let key = term.key();
            if removed_keys.contains(&key) || terms.iter().any(|t| t.key() == key) {
                continue;
            }
            terms.push(term);
        }
        // Main effects first, then two-way interactions, and so on
        terms.sort_by_key(Term::degree);

        Ok((has_intercept, terms))
    }

    /// Parse `a * b * ...` and expand it into all crossings
    fn parse_product(&mut self) -> FormulaResult<Vec<Term>> {
        let mut operands = vec![self.parse_interaction()?];

        loop {
            self.skip_whitespace();
            if self.peek_char() != Some('*') {
                break;
            }
            self.bump();
            operands.push(self.parse_interaction()?);
        }

        if operands.len() == 1 {
            return Ok(operands);
        }

        let mut expanded: Vec<Term> = Vec::new();
        for mask in 1..(1usize << operands.len()) {
            let factors: Vec<Term> = operands
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, term)| term.clone())
                .collect();
            expanded.push(Term::interaction(factors));
        }
        expanded.sort_by_key(Term::degree);
        Ok(expanded)
    }

    /// Parse `a:b:...`
    fn parse_interaction(&mut self) -> FormulaResult<Term> {
        let mut factors = vec![self.parse_factor()?];

        loop {
            self.skip_whitespace();
            if self.peek_char() != Some(':') {
                break;
            }
            self.bump();
            factors.push(self.parse_factor()?);
        }

        Ok(Term::interaction(factors))
    }

    /// Parse a factor (variable or function call)
    fn parse_factor(&mut self) -> FormulaResult<Term> {
        self.skip_whitespace();

        match self.peek_char() {
            Some(c) if c.is_alphabetic() || c == '.' => {
                let ident = self.parse_identifier()?;
                self.skip_whitespace();
                if self.peek_char() == Some('(') {
                    self.parse_function_call(&ident)
                } else {
                    Ok(Term::variable(&ident))
                }
            }
            Some('(') => Err(FormulaError::syntax_with_context(
                self.position,
                "Grouping parentheses are not supported",
                "write the crossing out explicitly, e.g. a:c + b:c",
            )),
            Some(c) => Err(FormulaError::syntax(
                self.position,
                format!("Unexpected character '{c}' in factor"),
            )),
            None => Err(FormulaError::syntax(
                self.position,
                "Unexpected end of input, expected factor",
            )),
        }
    }

    /// Parse a function call; arguments are factors or numeric literals
    fn parse_function_call(&mut self, func_name: &str) -> FormulaResult<Term> {
        self.bump(); // '('
        let mut args = Vec::new();

        loop {
            self.skip_whitespace();
            let arg = match self.peek_char() {
                Some(c) if c.is_ascii_digit() => {
                    let start = self.position;
                    let literal = self.parse_number()?;
                    let value = literal.parse::<f64>().map_err(|_| {
                        FormulaError::syntax(start, format!("Invalid number '{literal}'"))
                    })?;
                    Term::number(value)
                }
                Some(')') if args.is_empty() => {
                    return Err(FormulaError::syntax(
                        self.position,
                        format!("Function '{func_name}' requires at least one argument"),
                    ));
                }
                _ => self.parse_factor()?,
            };
            args.push(arg);

            self.skip_whitespace();
            match self.peek_char() {
                Some(',') => self.bump(),
                Some(')') => {
                    self.bump();
                    break;
                }
                Some(c) => {
                    return Err(FormulaError::syntax(
                        self.position,
                        format!("Expected ',' or ')', found '{c}'"),
                    ));
                }
                None => {
                    return Err(FormulaError::syntax(
                        self.position,
                        "Unexpected end of input, expected ')'",
                    ));
                }
            }
        }

        Ok(Term::function(func_name, args))
    }

    fn parse_number(&mut self) -> FormulaResult<String> {
        let mut literal = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() || c == '.' {
                literal.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Ok(literal)
    }

    /// Identifiers start with a letter or '.', then letters, digits, '_' or '.'
    fn parse_identifier(&mut self) -> FormulaResult<String> {
        let start_pos = self.position;
        let mut ident = String::new();

        match self.peek_char() {
            Some(c) if c.is_alphabetic() || c == '.' => {}
            Some(c) => {
                return Err(FormulaError::syntax(
                    start_pos,
                    format!("Identifier must start with a letter, found '{c}'"),
                ));
            }
            None => {
                return Err(FormulaError::syntax(
                    start_pos,
                    "Unexpected end of input, expected identifier",
                ));
            }
        }

        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }

        Ok(ident)
    }

    fn expect(&mut self, expected: char) -> FormulaResult<()> {
        self.skip_whitespace();
        match self.peek_char() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(FormulaError::syntax(
                self.position,
                format!("Expected '{expected}', found '{c}'"),
            )),
            None => Err(FormulaError::syntax(
                self.position,
                format!("Unexpected end of formula, expected '{expected}'"),
            )),
        }
    }

    fn bump(&mut self) {
        if self.chars.next().is_some() {
            self.position += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }
}
