//! Recursive-descent / precedence-climbing parser: source text to [`Program`].
//!
//! The operator table in §4.3 of the design is unusual in that postfix
//! binds tighter than UFCS `@`, which in turn binds tighter than prefix
//! unary — each precedence level below is a dedicated function, tightest
//! first, rather than a generic binding-power table, to keep that ordering
//! explicit.

use std::rc::Rc;

use frost_core::error::{FrostError, Result};
use frost_core::Value;

use crate::ast::{
    ArrayPattern, BinOp, Expr, ExprKind, FormatSegment, IfBranch, LambdaNode, MapEntry,
    MapKeyExpr, MapPattern, MapPatternEntry, PatternName, Program, UnOp,
};
use crate::lexer::{lex, is_reserved, Token, TokenKind};

pub struct Parser<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    pos: usize,
}

pub fn parse_program(source: &str) -> Result<Program> {
    Parser::new(source).parse_program()
}

/// Parses a single expression, for use by the `exec` path's REPL-adjacent
/// callers and tests. Trailing tokens are an error.
pub fn parse_expr(source: &str) -> Result<Expr> {
    let mut p = Parser::new(source);
    let expr = p.parse_or()?;
    if p.peek_kind().is_some() {
        return Err(p.error("Unexpected trailing input after expression"));
    }
    Ok(expr)
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Self {
        let tokens: Vec<Token> = lex(source).into_iter().filter(|t| t.kind != TokenKind::Garbage).collect();
        Self { source, tokens, pos: 0 }
    }

    fn parse_program(&mut self) -> Result<Program> {
        let mut statements = Vec::new();
        self.skip_semicolons();
        while self.peek_kind().is_some() {
            statements.push(self.parse_statement()?);
            self.skip_semicolons();
        }
        Ok(Program { statements })
    }

    fn skip_semicolons(&mut self) {
        while self.peek_kind() == Some(TokenKind::Semicolon) {
            self.pos += 1;
        }
    }

    fn parse_block(&mut self) -> Result<Vec<Expr>> {
        self.expect(TokenKind::BraceOpen)?;
        let mut statements = Vec::new();
        self.skip_semicolons();
        while self.peek_kind() != Some(TokenKind::BraceClose) {
            if self.peek_kind().is_none() {
                return Err(self.error("Unterminated block, expected '}'"));
            }
            statements.push(self.parse_statement()?);
            self.skip_semicolons();
        }
        self.expect(TokenKind::BraceClose)?;
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Expr> {
        if self.peek_kind() == Some(TokenKind::Export) {
            self.pos += 1;
            self.expect(TokenKind::Def)?;
            return self.parse_def(true);
        }
        if self.peek_kind() == Some(TokenKind::Def) {
            self.pos += 1;
            return self.parse_def(false);
        }
        self.parse_or()
    }

    fn parse_def(&mut self, export: bool) -> Result<Expr> {
        match self.peek_kind() {
            Some(TokenKind::BracketOpen) => {
                let pattern = self.parse_array_pattern()?;
                self.expect(TokenKind::Equals)?;
                let expr = self.parse_or()?;
                Ok(Expr::new(ExprKind::ArrayDestructure { pattern, expr: Box::new(expr), export }))
            }
            Some(TokenKind::BraceOpen) => {
                let pattern = self.parse_map_pattern()?;
                self.expect(TokenKind::Equals)?;
                let expr = self.parse_or()?;
                Ok(Expr::new(ExprKind::MapDestructure { pattern, expr: Box::new(expr), export }))
            }
            Some(TokenKind::Identifier) => {
                let name = self.text_of(self.pos).to_string();
                self.pos += 1;
                self.expect(TokenKind::Equals)?;
                let expr = self.parse_or()?;
                Ok(Expr::new(ExprKind::Define { name, expr: Box::new(expr), export }))
            }
            _ => Err(self.error("Expected a name or destructuring pattern after 'def'")),
        }
    }

    fn parse_pattern_name(&mut self) -> Result<PatternName> {
        match self.peek_kind() {
            Some(TokenKind::Identifier) if self.text_of(self.pos) == "_" => {
                self.pos += 1;
                Ok(PatternName::Discard)
            }
            Some(TokenKind::Identifier) => {
                let name = self.text_of(self.pos).to_string();
                self.pos += 1;
                Ok(PatternName::Bind(name))
            }
            _ => Err(self.error("Expected a binding name or '_' in pattern")),
        }
    }

    fn parse_array_pattern(&mut self) -> Result<ArrayPattern> {
        self.expect(TokenKind::BracketOpen)?;
        let mut names = Vec::new();
        let mut rest = None;
        let mut seen = std::collections::HashSet::new();
        while self.peek_kind() != Some(TokenKind::BracketClose) {
            if self.peek_kind() == Some(TokenKind::Ellipsis) {
                self.pos += 1;
                rest = Some(self.parse_pattern_name()?);
                break;
            }
            let name = self.parse_pattern_name()?;
            if let PatternName::Bind(n) = &name {
                if !seen.insert(n.clone()) {
                    return Err(self.error(&format!("Duplicate binding name '{n}' in array pattern")));
                }
            }
            names.push(name);
            if self.peek_kind() == Some(TokenKind::Comma) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.expect(TokenKind::BracketClose)?;
        Ok(ArrayPattern { names, rest })
    }

    fn parse_map_pattern(&mut self) -> Result<MapPattern> {
        self.expect(TokenKind::BraceOpen)?;
        let mut entries = Vec::new();
        while self.peek_kind() != Some(TokenKind::BraceClose) {
            let key = self.parse_map_key()?;
            self.expect(TokenKind::Colon)?;
            let binding = self.parse_pattern_name()?;
            entries.push(MapPatternEntry { key, binding });
            if self.peek_kind() == Some(TokenKind::Comma) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.expect(TokenKind::BraceClose)?;
        Ok(MapPattern { entries })
    }

    fn parse_map_key(&mut self) -> Result<MapKeyExpr> {
        match self.peek_kind() {
            Some(TokenKind::Identifier) => {
                let name = self.text_of(self.pos).to_string();
                self.pos += 1;
                Ok(MapKeyExpr::Identifier(name))
            }
            Some(TokenKind::BracketOpen) => {
                self.pos += 1;
                let expr = self.parse_or()?;
                self.expect(TokenKind::BracketClose)?;
                Ok(MapKeyExpr::Computed(expr))
            }
            _ => Err(self.error("Expected a map key: identifier or '[expr]'")),
        }
    }

    // ---- precedence levels, loosest (1: or) to tightest (9: postfix) ----

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.peek_kind() == Some(TokenKind::Or) {
            self.pos += 1;
            let right = self.parse_and()?;
            left = Expr::new(ExprKind::Binop { lhs: Box::new(left), op: BinOp::Or, rhs: Box::new(right) });
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_equality()?;
        while self.peek_kind() == Some(TokenKind::And) {
            self.pos += 1;
            let right = self.parse_equality()?;
            left = Expr::new(ExprKind::Binop { lhs: Box::new(left), op: BinOp::And, rhs: Box::new(right) });
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        let left = self.parse_comparison()?;
        let op = match self.peek_kind() {
            Some(TokenKind::EqEq) => BinOp::Equal,
            Some(TokenKind::BangEq) => BinOp::NotEqual,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.parse_comparison()?;
        if matches!(self.peek_kind(), Some(TokenKind::EqEq) | Some(TokenKind::BangEq)) {
            return Err(self.error("Chained equality comparisons are not allowed"));
        }
        Ok(Expr::new(ExprKind::Binop { lhs: Box::new(left), op, rhs: Box::new(right) }))
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let left = self.parse_additive()?;
        let op = match self.peek_kind() {
            Some(TokenKind::Lt) => BinOp::LessThan,
            Some(TokenKind::LtEq) => BinOp::LessThanOrEqual,
            Some(TokenKind::Gt) => BinOp::GreaterThan,
            Some(TokenKind::GtEq) => BinOp::GreaterThanOrEqual,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.parse_additive()?;
        if matches!(
            self.peek_kind(),
            Some(TokenKind::Lt) | Some(TokenKind::LtEq) | Some(TokenKind::Gt) | Some(TokenKind::GtEq)
        ) {
            return Err(self.error("Chained comparisons are not allowed"));
        }
        Ok(Expr::new(ExprKind::Binop { lhs: Box::new(left), op, rhs: Box::new(right) }))
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Subtract,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_multiplicative()?;
            left = Expr::new(ExprKind::Binop { lhs: Box::new(left), op, rhs: Box::new(right) });
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_prefix()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinOp::Multiply,
                Some(TokenKind::Slash) => BinOp::Divide,
                Some(TokenKind::Percent) => BinOp::Modulus,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_prefix()?;
            left = Expr::new(ExprKind::Binop { lhs: Box::new(left), op, rhs: Box::new(right) });
        }
        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expr> {
        match self.peek_kind() {
            Some(TokenKind::Minus) => {
                self.pos += 1;
                let operand = self.parse_prefix()?;
                Ok(Expr::new(ExprKind::Unop { op: UnOp::Negate, operand: Box::new(operand) }))
            }
            Some(TokenKind::Not) => {
                self.pos += 1;
                let operand = self.parse_prefix()?;
                Ok(Expr::new(ExprKind::Unop { op: UnOp::Not, operand: Box::new(operand) }))
            }
            _ => self.parse_ufcs(),
        }
    }

    fn parse_ufcs(&mut self) -> Result<Expr> {
        let mut left = self.parse_postfix()?;
        while self.peek_kind() == Some(TokenKind::At) {
            self.pos += 1;
            let rhs = self.parse_postfix()?;
            left = thread_ufcs(rhs, left, self)?;
        }
        Ok(left)
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                Some(TokenKind::BracketOpen) => {
                    self.pos += 1;
                    let index = self.parse_or()?;
                    self.expect(TokenKind::BracketClose)?;
                    expr = Expr::new(ExprKind::Index { base: Box::new(expr), index: Box::new(index) });
                }
                Some(TokenKind::ParenOpen) => {
                    self.pos += 1;
                    let args = self.parse_call_args()?;
                    expr = Expr::new(ExprKind::FunctionCall { callee: Box::new(expr), args });
                }
                Some(TokenKind::Dot) => {
                    self.pos += 1;
                    let name = self.expect_identifier()?;
                    let index = Expr::new(ExprKind::Literal(Rc::new(Value::String(Rc::from(name.as_str())))));
                    expr = Expr::new(ExprKind::Index { base: Box::new(expr), index: Box::new(index) });
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        while self.peek_kind() != Some(TokenKind::ParenClose) {
            args.push(self.parse_or()?);
            if self.peek_kind() == Some(TokenKind::Comma) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.expect(TokenKind::ParenClose)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.peek_kind() {
            Some(TokenKind::IntLiteral) => {
                let text = self.text_of(self.pos);
                let n: i64 = text.parse().map_err(|_| self.error("Invalid integer literal"))?;
                self.pos += 1;
                Ok(Expr::new(ExprKind::Literal(Rc::new(Value::Int(n)))))
            }
            Some(TokenKind::FloatLiteral) => {
                let text = self.text_of(self.pos);
                let f: f64 = text.parse().map_err(|_| self.error("Invalid float literal"))?;
                self.pos += 1;
                Ok(Expr::new(ExprKind::Literal(Rc::new(Value::Float(f)))))
            }
            Some(TokenKind::StringLiteral) => {
                let text = self.text_of(self.pos);
                let unescaped = unescape(&text[1..text.len() - 1])?;
                self.pos += 1;
                Ok(Expr::new(ExprKind::Literal(Rc::new(Value::String(Rc::from(unescaped.as_str()))))))
            }
            Some(TokenKind::FormatStringLiteral) => {
                let text = self.text_of(self.pos).to_string();
                self.pos += 1;
                let segments = parse_format_string(&text, self)?;
                Ok(Expr::new(ExprKind::FormatString(segments)))
            }
            Some(TokenKind::True) => {
                self.pos += 1;
                Ok(Expr::new(ExprKind::Literal(Rc::new(Value::Bool(true)))))
            }
            Some(TokenKind::False) => {
                self.pos += 1;
                Ok(Expr::new(ExprKind::Literal(Rc::new(Value::Bool(false)))))
            }
            Some(TokenKind::Null) => {
                self.pos += 1;
                Ok(Expr::new(ExprKind::Literal(Rc::new(Value::Null))))
            }
            Some(TokenKind::Identifier) => {
                let name = self.text_of(self.pos).to_string();
                self.pos += 1;
                Ok(Expr::new(ExprKind::NameLookup(name)))
            }
            Some(TokenKind::ParenOpen) => {
                self.pos += 1;
                let expr = self.parse_or()?;
                self.expect(TokenKind::ParenClose)?;
                Ok(expr)
            }
            Some(TokenKind::BracketOpen) => self.parse_array_literal(),
            Some(TokenKind::BraceOpen) => self.parse_map_literal(),
            Some(TokenKind::Fn) => self.parse_lambda(),
            Some(TokenKind::If) => self.parse_if(),
            Some(TokenKind::Map) => self.parse_higher_order(TokenKind::Map),
            Some(TokenKind::Filter) => self.parse_higher_order(TokenKind::Filter),
            Some(TokenKind::Foreach) => self.parse_higher_order(TokenKind::Foreach),
            Some(TokenKind::Reduce) => self.parse_reduce(),
            _ => Err(self.error("Expected an expression")),
        }
    }

    fn parse_array_literal(&mut self) -> Result<Expr> {
        self.expect(TokenKind::BracketOpen)?;
        let mut elems = Vec::new();
        while self.peek_kind() != Some(TokenKind::BracketClose) {
            elems.push(self.parse_or()?);
            if self.peek_kind() == Some(TokenKind::Comma) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.expect(TokenKind::BracketClose)?;
        Ok(Expr::new(ExprKind::ArrayConstructor(elems)))
    }

    fn parse_map_literal(&mut self) -> Result<Expr> {
        self.expect(TokenKind::BraceOpen)?;
        let mut entries = Vec::new();
        while self.peek_kind() != Some(TokenKind::BraceClose) {
            let key = self.parse_map_key()?;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_or()?;
            entries.push(MapEntry { key, value });
            if self.peek_kind() == Some(TokenKind::Comma) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.expect(TokenKind::BraceClose)?;
        Ok(Expr::new(ExprKind::MapConstructor(entries)))
    }

    fn parse_lambda(&mut self) -> Result<Expr> {
        self.expect(TokenKind::Fn)?;
        self.expect(TokenKind::ParenOpen)?;
        let mut params = Vec::new();
        while self.peek_kind() != Some(TokenKind::ParenClose) {
            params.push(self.expect_identifier()?);
            if self.peek_kind() == Some(TokenKind::Comma) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.expect(TokenKind::ParenClose)?;
        self.expect(TokenKind::Arrow)?;
        let body = self.parse_block()?;
        Ok(Expr::new(ExprKind::Lambda(Rc::new(LambdaNode { params, body }))))
    }

    fn parse_if(&mut self) -> Result<Expr> {
        self.expect(TokenKind::If)?;
        let mut branches = vec![self.parse_if_branch()?];
        while self.peek_kind() == Some(TokenKind::Elif) {
            self.pos += 1;
            branches.push(self.parse_if_branch()?);
        }
        let else_body = if self.peek_kind() == Some(TokenKind::Else) {
            self.pos += 1;
            self.expect(TokenKind::Colon)?;
            Some(Box::new(self.parse_or()?))
        } else {
            None
        };
        Ok(Expr::new(ExprKind::If { branches, else_body }))
    }

    fn parse_if_branch(&mut self) -> Result<IfBranch> {
        let condition = self.parse_or()?;
        self.expect(TokenKind::Colon)?;
        let body = self.parse_or()?;
        Ok(IfBranch { condition, body })
    }

    fn parse_higher_order(&mut self, kind: TokenKind) -> Result<Expr> {
        self.pos += 1;
        let structure = Box::new(self.parse_or()?);
        self.expect(TokenKind::With)?;
        let operation = Box::new(self.parse_or()?);
        Ok(Expr::new(match kind {
            TokenKind::Map => ExprKind::Map { structure, operation },
            TokenKind::Filter => ExprKind::Filter { structure, operation },
            TokenKind::Foreach => ExprKind::Foreach { structure, operation },
            _ => unreachable!(),
        }))
    }

    fn parse_reduce(&mut self) -> Result<Expr> {
        self.expect(TokenKind::Reduce)?;
        let structure = Box::new(self.parse_or()?);
        self.expect(TokenKind::With)?;
        let operation = Box::new(self.parse_or()?);
        let init = if self.peek_kind() == Some(TokenKind::Init) {
            self.pos += 1;
            self.expect(TokenKind::Colon)?;
            Some(Box::new(self.parse_or()?))
        } else {
            None
        };
        Ok(Expr::new(ExprKind::Reduce { structure, operation, init }))
    }

    // ---- helpers ----

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn text_of(&self, index: usize) -> &'s str {
        self.tokens[index].text(self.source)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("Expected {kind:?}")))
        }
    }

    fn expect_identifier(&mut self) -> Result<String> {
        if self.peek_kind() == Some(TokenKind::Identifier) {
            let text = self.text_of(self.pos).to_string();
            self.pos += 1;
            Ok(text)
        } else {
            Err(self.error("Expected an identifier"))
        }
    }

    fn error(&self, message: &str) -> FrostError {
        let location = match self.tokens.get(self.pos) {
            Some(tok) => format!(" at byte {}", tok.span.start),
            None => " at end of input".to_string(),
        };
        FrostError::unrecoverable(format!("{message}{location}"))
    }
}

/// `x @ f(a,b,…)` threads `x` into the call nearest the callee, e.g.
/// `a @ f()(b)` becomes `(f(a))(b)`: only the innermost call receives the
/// extra argument, and outer calls applied to its result are untouched.
fn thread_ufcs(rhs: Expr, x: Expr, parser: &Parser) -> Result<Expr> {
    match rhs.kind {
        ExprKind::FunctionCall { callee, args } => {
            if matches!(callee.kind, ExprKind::FunctionCall { .. }) {
                let new_callee = thread_ufcs(*callee, x, parser)?;
                Ok(Expr::new(ExprKind::FunctionCall { callee: Box::new(new_callee), args }))
            } else {
                let mut new_args = Vec::with_capacity(args.len() + 1);
                new_args.push(x);
                new_args.extend(args);
                Ok(Expr::new(ExprKind::FunctionCall { callee, args: new_args }))
            }
        }
        _ => Err(parser.error("Right-hand side of '@' must be a function call")),
    }
}

fn unescape(s: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => return Err(FrostError::unrecoverable(format!("Invalid escape sequence '\\{other}'"))),
            None => return Err(FrostError::unrecoverable("Unterminated escape sequence")),
        }
    }
    Ok(out)
}

/// Parses the interior of a `$"..."` / `$'...'` token into literal and
/// `${name}` placeholder segments.
fn parse_format_string(raw: &str, parser: &Parser) -> Result<Vec<FormatSegment>> {
    let content = &raw[2..raw.len() - 1];
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => literal.push('\n'),
                Some('t') => literal.push('\t'),
                Some('r') => literal.push('\r'),
                Some('\\') => literal.push('\\'),
                Some('"') => literal.push('"'),
                Some('\'') => literal.push('\''),
                Some('$') => literal.push('$'),
                Some(other) => return Err(parser.error(&format!("Invalid escape sequence '\\{other}' in format string"))),
                None => return Err(parser.error("Unterminated escape sequence in format string")),
            }
            continue;
        }
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();
            if !literal.is_empty() {
                segments.push(FormatSegment::Literal(std::mem::take(&mut literal)));
            }
            let mut name = String::new();
            let mut closed = false;
            for nc in chars.by_ref() {
                if nc == '}' {
                    closed = true;
                    break;
                }
                name.push(nc);
            }
            if !closed {
                return Err(parser.error("Unmatched '{' in format string placeholder"));
            }
            if name.is_empty() || !is_valid_identifier(&name) || is_reserved(&name) {
                return Err(parser.error(&format!("Empty or invalid placeholder name '{name}' in format string")));
            }
            segments.push(FormatSegment::Placeholder(name));
            continue;
        }
        if c == '}' {
            return Err(parser.error("Unmatched '}' in format string"));
        }
        literal.push(c);
    }
    if !literal.is_empty() {
        segments.push(FormatSegment::Literal(literal));
    }
    Ok(segments)
}

fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Program {
        parse_program(src).unwrap()
    }

    #[test]
    fn parses_arithmetic_precedence() {
        let program = parse("1 + 2 * 3");
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0].kind {
            ExprKind::Binop { op: BinOp::Add, rhs, .. } => {
                assert!(matches!(rhs.kind, ExprKind::Binop { op: BinOp::Multiply, .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_chained_comparisons() {
        assert!(parse_program("1 < 2 < 3").is_err());
        assert!(parse_program("1 == 2 == 3").is_err());
    }

    #[test]
    fn parses_if_elif_else() {
        let program = parse("if true: 1 elif false: 2 else: 3");
        match &program.statements[0].kind {
            ExprKind::If { branches, else_body } => {
                assert_eq!(branches.len(), 2);
                assert!(else_body.is_some());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_ufcs_into_innermost_call() {
        let program = parse("a @ f()(b)");
        match &program.statements[0].kind {
            ExprKind::FunctionCall { callee, args } => {
                assert_eq!(args.len(), 1);
                match &callee.kind {
                    ExprKind::FunctionCall { args, .. } => {
                        assert_eq!(args.len(), 1);
                    }
                    other => panic!("unexpected {other:?}"),
                }
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_array_destructure_with_rest() {
        let program = parse("def [a, _, ...rest] = [10, 20, 30, 40]");
        assert!(matches!(program.statements[0].kind, ExprKind::ArrayDestructure { .. }));
    }

    #[test]
    fn parses_lambda_and_reduce() {
        let program = parse("reduce {a:1, b:2} with fn(acc,k,v) -> { acc + v } init: 0");
        assert!(matches!(program.statements[0].kind, ExprKind::Reduce { .. }));
    }

    #[test]
    fn parses_format_string_placeholder() {
        let expr = parse_expr(r#"$"hi ${name}""#).unwrap();
        match expr.kind {
            ExprKind::FormatString(segments) => {
                assert_eq!(segments.len(), 2);
                assert!(matches!(segments[1], FormatSegment::Placeholder(ref n) if n == "name"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn dot_access_is_string_key_sugar() {
        let expr = parse_expr("x.y").unwrap();
        match expr.kind {
            ExprKind::Index { index, .. } => {
                assert!(matches!(index.kind, ExprKind::Literal(ref v) if matches!(**v, Value::String(_))));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
