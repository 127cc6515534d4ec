//! Recursive-descent / precedence-climbing parser from the token stream
//! (`lexer.rs`) to the raw AST of `expr.rs` (section 3; `Variable`
//! occurrences are left unresolved here, `walk.rs` resolves them).
//!
//! No example repo in the retrieval pack ships a parser-combinator crate
//! worth adopting for a grammar this small (see `DESIGN.md`), so this is
//! a hand-rolled Pratt parser, grounded on `original_source/slang/syntax`'s
//! class list for the exact surface forms to recognize (`let`, `import`,
//! `if/then/else`, `function(...) body`, `namespace { ... }`, `[a, b]`,
//! `expr::name`, `expr[i]`, `(expr)`, the binary/unary operator set, `!expr;`
//! at statement position).

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::expr::{BinaryOp, Expr, ExprRef, FunctionBody, FunctionDef, Param, Stmt, UnaryOp};
use crate::lexer::{self, Spanned, Token};
use crate::position::Position;
use crate::types::Type;

/// Parses a full program: a sequence of statements followed by a tail
/// expression (spec.md section 6), represented as a `Block` so the rest
/// of the pipeline (`walk`, `simplify`) can treat a whole program exactly
/// like a function body's block.
pub fn parse_program(source: &str) -> Result<ExprRef> {
    let tokens = lexer::lex(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let (statements, tail) = parser.parse_block_body(|token| token.is_none())?;
    Ok(Rc::new(Expr::Block { statements, tail }))
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn peek_position(&self) -> Position {
        self.tokens.get(self.pos).map_or_else(
            || self.tokens.last().map_or_else(Position::synthetic, |s| s.position),
            |s| s.position,
        )
    }

    fn advance(&mut self) -> Option<Spanned> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> Result<Spanned> {
        match self.advance() {
            Some(spanned) if std::mem::discriminant(&spanned.token) == std::mem::discriminant(expected) => Ok(spanned),
            Some(spanned) => {
                Err(Error::parse_error(spanned.position, format!("expected {expected}, found {}", spanned.token)))
            }
            None => Err(Error::parse_error(self.peek_position(), format!("expected {expected}, found end of input"))),
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Position)> {
        match self.advance() {
            Some(Spanned { token: Token::Ident(name), position }) => Ok((name, position)),
            Some(spanned) => Err(Error::parse_error(spanned.position, format!("expected identifier, found {}", spanned.token))),
            None => Err(Error::parse_error(self.peek_position(), "expected identifier, found end of input")),
        }
    }

    /// Parses statements until `is_end` reports true of the next token
    /// (`None` meaning end of input), returning them alongside the tail
    /// expression. Used for both whole programs (terminator: end of
    /// input) and `{ ... }` blocks (terminator: `}`, consumed by the
    /// caller).
    fn parse_block_body(&mut self, is_end: impl Fn(Option<&Token>) -> bool) -> Result<(Vec<Stmt>, ExprRef)> {
        let mut statements = Vec::new();
        loop {
            if is_end(self.peek()) {
                return Err(Error::parse_error(self.peek_position(), "expected an expression, found end of block"));
            }
            match self.peek() {
                Some(Token::Let) => statements.push(self.parse_let()?),
                Some(Token::Import) => statements.push(self.parse_import()?),
                _ => {
                    let position = self.peek_position();
                    let expr = self.parse_expr()?;
                    if matches!(self.peek(), Some(Token::Semicolon)) {
                        self.advance();
                        statements.push(Stmt::Bang { expr });
                        if is_end(self.peek()) {
                            return Err(Error::parse_error(position, "block ends with a statement, expected a trailing expression"));
                        }
                        continue;
                    }
                    return Ok((statements, expr));
                }
            }
        }
    }

    fn parse_let(&mut self) -> Result<Stmt> {
        self.expect(&Token::Let)?;
        let (name, _) = self.expect_ident()?;
        self.expect(&Token::Equals)?;
        let value = self.parse_expr()?;
        self.expect(&Token::Semicolon)?;
        Ok(Stmt::Let { name, value })
    }

    fn parse_import(&mut self) -> Result<Stmt> {
        let position = self.expect(&Token::Import)?.position;
        let path = match self.advance() {
            Some(Spanned { token: Token::Str(path), .. }) => path,
            Some(spanned) => return Err(Error::parse_error(spanned.position, format!("expected a string path, found {}", spanned.token))),
            None => return Err(Error::parse_error(position, "expected a string path, found end of input")),
        };
        self.expect(&Token::Semicolon)?;
        Ok(Stmt::Import { path, position })
    }

    fn parse_expr(&mut self) -> Result<ExprRef> {
        self.parse_binary(0)
    }

    /// Standard precedence-climbing loop. Binding powers follow section 3's
    /// operator list, lowest to highest: comparisons, `+ -`, `* / %`, `^`
    /// (right-associative).
    fn parse_binary(&mut self, min_bp: u8) -> Result<ExprRef> {
        let mut lhs = self.parse_unary()?;
        loop {
            let Some((op, l_bp, r_bp, position)) = self.peek_binary_op() else { break };
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_binary(r_bp)?;
            lhs = Rc::new(Expr::BinaryOp { op, lhs, rhs, position });
        }
        Ok(lhs)
    }

    fn peek_binary_op(&self) -> Option<(BinaryOp, u8, u8, Position)> {
        let spanned = self.tokens.get(self.pos)?;
        let (op, l_bp, r_bp) = match spanned.token {
            Token::EqEq => (BinaryOp::Eq, 1, 2),
            Token::Lt => (BinaryOp::Lt, 1, 2),
            Token::Gt => (BinaryOp::Gt, 1, 2),
            Token::Le => (BinaryOp::Le, 1, 2),
            Token::Ge => (BinaryOp::Ge, 1, 2),
            Token::Plus => (BinaryOp::Add, 3, 4),
            Token::Minus => (BinaryOp::Sub, 3, 4),
            Token::Star => (BinaryOp::Mul, 5, 6),
            Token::Slash => (BinaryOp::Div, 5, 6),
            Token::Percent => (BinaryOp::Mod, 5, 6),
            Token::Caret => (BinaryOp::Pow, 8, 7),
            _ => return None,
        };
        Some((op, l_bp, r_bp, spanned.position))
    }

    fn parse_unary(&mut self) -> Result<ExprRef> {
        let (op, position) = match self.peek() {
            Some(Token::Plus) => (UnaryOp::Plus, self.peek_position()),
            Some(Token::Minus) => (UnaryOp::Neg, self.peek_position()),
            Some(Token::Tilde) => (UnaryOp::BitNot, self.peek_position()),
            Some(Token::Bang) => (UnaryOp::Not, self.peek_position()),
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Rc::new(Expr::UnaryOp { op, operand, position }))
    }

    fn parse_postfix(&mut self) -> Result<ExprRef> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek() {
                Some(Token::LParen) => {
                    let position = self.peek_position();
                    self.advance();
                    let args = self.parse_comma_separated(&Token::RParen, Self::parse_expr)?;
                    self.expect(&Token::RParen)?;
                    expr = Rc::new(Expr::Call { callee: expr, args, position });
                }
                Some(Token::LBracket) => {
                    let position = self.peek_position();
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(&Token::RBracket)?;
                    expr = Rc::new(Expr::Index { array: expr, index, position });
                }
                Some(Token::ColonColon) => {
                    let position = self.peek_position();
                    self.advance();
                    let (name, _) = self.expect_ident()?;
                    expr = Rc::new(Expr::Lookup { base: expr, name, position });
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_comma_separated<T>(&mut self, terminator: &Token, mut item: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let mut items = Vec::new();
        if self.peek() == Some(terminator) {
            return Ok(items);
        }
        loop {
            items.push(item(self)?);
            if matches!(self.peek(), Some(Token::Comma)) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(items)
    }

    fn parse_primary(&mut self) -> Result<ExprRef> {
        let position = self.peek_position();
        match self.advance() {
            Some(Spanned { token: Token::Int(value), .. }) => Ok(Expr::int(value)),
            Some(Spanned { token: Token::Float(value), .. }) => Ok(Expr::float(value)),
            Some(Spanned { token: Token::True, .. }) => Ok(Expr::boolean(true)),
            Some(Spanned { token: Token::False, .. }) => Ok(Expr::boolean(false)),
            Some(Spanned { token: Token::Str(value), .. }) => Ok(Expr::string(value)),
            Some(Spanned { token: Token::Ident(name), .. }) => Ok(Rc::new(Expr::Variable { name, position })),
            Some(Spanned { token: Token::LParen, .. }) => {
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Spanned { token: Token::LBracket, .. }) => {
                let elements = self.parse_comma_separated(&Token::RBracket, Self::parse_expr)?;
                self.expect(&Token::RBracket)?;
                Ok(Rc::new(Expr::Array(elements)))
            }
            Some(Spanned { token: Token::If, .. }) => {
                let test = self.parse_expr()?;
                self.expect(&Token::Then)?;
                let then_branch = self.parse_expr()?;
                self.expect(&Token::Else)?;
                let else_branch = self.parse_expr()?;
                Ok(Rc::new(Expr::If { test, then_branch, else_branch, position }))
            }
            Some(Spanned { token: Token::Function, .. }) => self.parse_function_def(),
            Some(Spanned { token: Token::Namespace, .. }) => self.parse_namespace_lit(),
            Some(spanned) => Err(Error::parse_error(spanned.position, format!("unexpected {}", spanned.token))),
            None => Err(Error::parse_error(position, "unexpected end of input")),
        }
    }

    fn parse_function_def(&mut self) -> Result<ExprRef> {
        self.expect(&Token::LParen)?;
        let params = self.parse_comma_separated(&Token::RParen, Self::parse_param)?;
        self.expect(&Token::RParen)?;
        let body = self.parse_function_body()?;
        Ok(Rc::new(Expr::FunctionDef(Rc::new(FunctionDef { params, body: FunctionBody::Expr(body) }))))
    }

    fn parse_param(&mut self) -> Result<Param> {
        let (name, _) = self.expect_ident()?;
        let annotation = if matches!(self.peek(), Some(Token::Colon)) {
            self.advance();
            Some(self.parse_type()?)
        } else {
            None
        };
        Ok(Param { name, annotation })
    }

    /// A small type-annotation grammar: basic type names and `Array<T>`.
    /// Not named by spec.md's own grammar contract (section 6 leaves the
    /// concrete syntax to "the parsing collaborator"); this is this
    /// parser's own minimal choice, recorded in `DESIGN.md`.
    fn parse_type(&mut self) -> Result<Type> {
        let (name, position) = self.expect_ident()?;
        match name.as_str() {
            "Any" => Ok(Type::Any),
            "Void" => Ok(Type::Void),
            "Int" => Ok(Type::Int),
            "Float" => Ok(Type::Float),
            "Bool" => Ok(Type::Bool),
            "String" => Ok(Type::String),
            "Array" => {
                self.expect(&Token::Lt)?;
                let element = self.parse_type()?;
                self.expect(&Token::Gt)?;
                Ok(Type::array(element))
            }
            other => Err(Error::parse_error(position, format!("unknown type '{other}'"))),
        }
    }

    /// A function body is either a `{ ... }` block, or (for single-expression
    /// bodies like `if x==0 then 1 else 2`) a bare expression.
    fn parse_function_body(&mut self) -> Result<ExprRef> {
        if matches!(self.peek(), Some(Token::LBrace)) {
            self.parse_block()
        } else {
            self.parse_expr()
        }
    }

    fn parse_block(&mut self) -> Result<ExprRef> {
        self.expect(&Token::LBrace)?;
        let (statements, tail) = self.parse_block_body(|token| matches!(token, Some(Token::RBrace) | None))?;
        self.expect(&Token::RBrace)?;
        Ok(Rc::new(Expr::Block { statements, tail }))
    }

    fn parse_namespace_lit(&mut self) -> Result<ExprRef> {
        self.expect(&Token::LBrace)?;
        let mut definitions = Vec::new();
        while !matches!(self.peek(), Some(Token::RBrace)) {
            let (name, _) = self.expect_ident()?;
            self.expect(&Token::Equals)?;
            let value = self.parse_expr()?;
            self.expect(&Token::Semicolon)?;
            definitions.push((name, value));
        }
        self.expect(&Token::RBrace)?;
        Ok(Rc::new(Expr::NamespaceLit { definitions }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arithmetic_with_precedence() {
        let program = parse_program("1 + 2 * 3").unwrap();
        match program.as_ref() {
            Expr::Block { tail, .. } => match tail.as_ref() {
                Expr::BinaryOp { op: BinaryOp::Add, rhs, .. } => {
                    assert!(matches!(rhs.as_ref(), Expr::BinaryOp { op: BinaryOp::Mul, .. }));
                }
                other => panic!("expected BinaryOp, got {other:?}"),
            },
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn power_is_right_associative() {
        let program = parse_program("2 ^ 3 ^ 2").unwrap();
        match program.as_ref() {
            Expr::Block { tail, .. } => match tail.as_ref() {
                Expr::BinaryOp { op: BinaryOp::Pow, rhs, .. } => {
                    assert!(matches!(rhs.as_ref(), Expr::BinaryOp { op: BinaryOp::Pow, .. }));
                }
                other => panic!("expected BinaryOp, got {other:?}"),
            },
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn parses_if_then_else() {
        let program = parse_program("if true then 7 else 3").unwrap();
        match program.as_ref() {
            Expr::Block { tail, .. } => assert!(matches!(tail.as_ref(), Expr::If { .. })),
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn parses_function_call() {
        let program = parse_program("(function(x) { x })(0)").unwrap();
        match program.as_ref() {
            Expr::Block { tail, .. } => assert!(matches!(tail.as_ref(), Expr::Call { .. })),
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn parses_bang_statement_vs_unary_not_tail() {
        let program = parse_program("!true;\n!false").unwrap();
        match program.as_ref() {
            Expr::Block { statements, tail } => {
                assert_eq!(statements.len(), 1);
                assert!(matches!(statements[0], Stmt::Bang { .. }));
                assert!(matches!(tail.as_ref(), Expr::UnaryOp { op: UnaryOp::Not, .. }));
            }
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn parses_namespace_literal() {
        let program = parse_program("namespace { x = 1; y = 2; }").unwrap();
        match program.as_ref() {
            Expr::Block { tail, .. } => match tail.as_ref() {
                Expr::NamespaceLit { definitions } => assert_eq!(definitions.len(), 2),
                other => panic!("expected NamespaceLit, got {other:?}"),
            },
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn parses_lookup_and_index() {
        let program = parse_program("builtins::length([1,2,3])").unwrap();
        match program.as_ref() {
            Expr::Block { tail, .. } => assert!(matches!(tail.as_ref(), Expr::Call { .. })),
            other => panic!("expected Block, got {other:?}"),
        }
    }
}
