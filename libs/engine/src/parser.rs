//! Parser - converts a line of input to a statement
//!
//! Recursive descent with the precedence ladder (lowest to highest):
//! 1. `=` (assignment / equation form, handled by the statement classifier)
//! 2. additive (`+`, `-`), left-associative
//! 3. multiplicative (`*`, `/`), left-associative
//! 4. unary `-`
//! 5. power (`^`, `**`), right-associative
//! 6. atoms: literals, `i`, identifiers and calls, parentheses, matrix
//!    literals
//!
//! A bare `i` in operand position is the imaginary unit. An `i` immediately
//! following a multiplicative factor (`7i`, `3/2i`) is an implicit
//! multiplication at `*`/`/` precedence, which is what makes rendered complex
//! values parse back to the same value.

use crate::ast::{BinaryOp, Expr, Statement};
use crate::error::{Error, Result};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

const MAX_RECURSION_DEPTH: usize = 200;

/// Parser for one input line
pub struct Parser {
    lexer: Lexer,
    current: Token,
    depth: usize,
}

/// Parse a full input line into a classified statement.
pub fn parse_statement(input: &str) -> Result<Statement> {
    Parser::new(input)?.parse_statement()
}

/// Parse a single expression (no `=` form), consuming the whole input.
pub fn parse_expression(input: &str) -> Result<Expr> {
    let mut parser = Parser::new(input)?;
    let expr = parser.parse_expr()?;
    parser.expect_eof()?;
    Ok(expr)
}

impl Parser {
    pub fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<()> {
        if self.current.kind == kind {
            self.advance()
        } else {
            Err(Error::Parse(format!(
                "expected {}, found {} at column {}",
                what,
                self.current.describe(),
                self.current.column
            )))
        }
    }

    fn expect_eof(&mut self) -> Result<()> {
        self.expect(TokenKind::Eof, "end of input")
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_RECURSION_DEPTH {
            return Err(Error::Parse(format!(
                "expression is nested too deeply (max depth: {})",
                MAX_RECURSION_DEPTH
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Top-level form classifier.
    pub fn parse_statement(&mut self) -> Result<Statement> {
        let lhs = self.parse_expr()?;
        match self.current.kind {
            TokenKind::Eof => Ok(Statement::Expression(lhs)),
            TokenKind::Equals => {
                self.advance()?;
                let rhs = self.parse_expr()?;
                if self.check(TokenKind::Question) {
                    self.advance()?;
                    self.expect_eof()?;
                    Ok(Statement::EquationQuery { lhs, rhs })
                } else {
                    self.expect_eof()?;
                    classify_binding(lhs, rhs)
                }
            }
            _ => Err(Error::Parse(format!(
                "unexpected {} at column {}",
                self.current.describe(),
                self.current.column
            ))),
        }
    }

    /// additive := multiplicative (('+' | '-') multiplicative)*
    fn parse_expr(&mut self) -> Result<Expr> {
        self.enter()?;
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Subtract,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.leave();
        Ok(left)
    }

    /// multiplicative := unary (('*' | '/') unary | <juxtaposed i>)*
    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let (op, implicit) = match self.current.kind {
                TokenKind::Star => (BinaryOp::Multiply, false),
                TokenKind::Slash => (BinaryOp::Divide, false),
                TokenKind::Identifier if self.current.text == "i" => (BinaryOp::Multiply, true),
                _ => break,
            };
            if !implicit {
                self.advance()?;
            }
            let right = if implicit {
                // `7i`, `3/2i`: the factor starts at the `i` itself
                self.parse_power()?
            } else {
                self.parse_unary()?
            };
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// unary := '-' unary | power
    fn parse_unary(&mut self) -> Result<Expr> {
        self.enter()?;
        let expr = if self.check(TokenKind::Minus) {
            self.advance()?;
            Expr::Negate(Box::new(self.parse_unary()?))
        } else {
            self.parse_power()?
        };
        self.leave();
        Ok(expr)
    }

    /// power := atom ('^' unary)?   (right-associative through the recursion)
    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_atom()?;
        if self.check(TokenKind::Caret) {
            self.advance()?;
            let exponent = self.parse_unary()?;
            return Ok(Expr::Binary {
                op: BinaryOp::Power,
                left: Box::new(base),
                right: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        match self.current.kind {
            TokenKind::Integer => {
                let value = crate::rational::Rational::from_integer_literal(&self.current.text)?;
                self.advance()?;
                Ok(Expr::Number(value))
            }
            TokenKind::Decimal => {
                let value = crate::rational::Rational::from_decimal_literal(&self.current.text)?;
                self.advance()?;
                Ok(Expr::Number(value))
            }
            TokenKind::Identifier => {
                let name = self.current.text.clone();
                self.advance()?;
                // call position first: `i(...)` must stay a call so the
                // reserved-name check can reject it by name
                if self.check(TokenKind::OpenParen) {
                    self.advance()?;
                    let arg = self.parse_expr()?;
                    self.expect(TokenKind::CloseParen, "')' to close the call")?;
                    return Ok(Expr::Call {
                        name,
                        arg: Box::new(arg),
                    });
                }
                if name == "i" {
                    return Ok(Expr::ImaginaryUnit);
                }
                Ok(Expr::Identifier(name))
            }
            TokenKind::OpenParen => {
                self.advance()?;
                let expr = self.parse_expr()?;
                self.expect(TokenKind::CloseParen, "')'")?;
                Ok(expr)
            }
            TokenKind::OpenBracket => self.parse_matrix(),
            _ => Err(Error::Parse(format!(
                "unexpected {} at column {}",
                self.current.describe(),
                self.current.column
            ))),
        }
    }

    /// matrix := '[' row ((',' | ';') row)* ']'
    ///
    /// Rows may be separated by either `,` or `;`; rendered matrices use `;`.
    fn parse_matrix(&mut self) -> Result<Expr> {
        self.expect(TokenKind::OpenBracket, "'['")?;
        let mut rows = vec![self.parse_matrix_row()?];
        while self.check(TokenKind::Comma) || self.check(TokenKind::Semicolon) {
            self.advance()?;
            rows.push(self.parse_matrix_row()?);
        }
        self.expect(TokenKind::CloseBracket, "']' to close the matrix")?;

        let cols = rows[0].len();
        if rows.iter().any(|row| row.len() != cols) {
            return Err(Error::Shape(
                "matrix rows must all have the same length".into(),
            ));
        }
        Ok(Expr::MatrixLiteral(rows))
    }

    /// row := '[' expr (',' expr)* ']'
    fn parse_matrix_row(&mut self) -> Result<Vec<Expr>> {
        self.expect(TokenKind::OpenBracket, "'[' to open a matrix row")?;
        let mut cells = vec![self.parse_expr()?];
        while self.check(TokenKind::Comma) {
            self.advance()?;
            cells.push(self.parse_expr()?);
        }
        self.expect(TokenKind::CloseBracket, "']' to close the matrix row")?;
        Ok(cells)
    }
}

/// Decide between assignment and function definition from the left side.
fn classify_binding(lhs: Expr, rhs: Expr) -> Result<Statement> {
    match lhs {
        Expr::Identifier(name) => Ok(Statement::Assignment { name, expr: rhs }),
        Expr::ImaginaryUnit => Err(Error::Name(
            "'i' is reserved and cannot be used as an assignment target".into(),
        )),
        Expr::Call { name, arg } => {
            if name == "i" {
                return Err(Error::Name(
                    "'i' is reserved and cannot be used as a function name".into(),
                ));
            }
            match *arg {
                Expr::Identifier(param) => Ok(Statement::FunctionDef {
                    name,
                    param,
                    body: rhs,
                }),
                Expr::ImaginaryUnit => Err(Error::Name(
                    "'i' is reserved and cannot be used as a function parameter".into(),
                )),
                _ => Err(Error::Parse(
                    "a function definition takes a single identifier parameter".into(),
                )),
            }
        }
        _ => Err(Error::Parse(
            "the left side of '=' must be a variable or a function definition".into(),
        )),
    }
}
