//! Hand-written recursive-descent / precedence-climbing parser producing
//! the AST of [`crate::ast`]. Lexing and parsing are explicitly out of
//! scope for the spec this repo implements (spec.md §1) — this exists
//! only so the rest of the pipeline (the actual subject of the spec) has
//! a real AST to compile and execute, and so the end-to-end scenarios in
//! spec §8 are testable.

use diag::Error as DiagError;
use span::Span;

use crate::ast::{BinOp, Kind, Node, UnOp};
use crate::lexer::{self, Token, TokenKind};

pub fn parse(src: &str) -> Result<Node, Vec<DiagError>> {
  let tokens = lexer::lex(src).map_err(|errs| {
    errs
      .into_iter()
      .map(|e| DiagError::parse(format!("unexpected character {:?}", e.lexeme), e.span))
      .collect::<Vec<_>>()
  })?;
  let mut parser = Parser {
    tokens,
    pos: 0,
    eof: Span {
      start: src.len(),
      end: src.len(),
    },
  };
  parser
    .parse_module()
    .map_err(|e| vec![e])
}

struct Parser<'src> {
  tokens: Vec<Token<'src>>,
  pos: usize,
  eof: Span,
}

type PResult<T> = Result<T, DiagError>;

impl<'src> Parser<'src> {
  fn peek(&self) -> Option<&Token<'src>> {
    self.tokens.get(self.pos)
  }

  fn peek_kind(&self) -> Option<TokenKind> {
    self.peek().map(|t| t.kind)
  }

  fn span(&self) -> Span {
    self.peek().map(|t| t.span).unwrap_or(self.eof)
  }

  fn bump(&mut self) -> Option<Token<'src>> {
    let t = self.tokens.get(self.pos).cloned();
    if t.is_some() {
      self.pos += 1;
    }
    t
  }

  fn at(&self, kind: TokenKind) -> bool {
    self.peek_kind() == Some(kind)
  }

  fn eat(&mut self, kind: TokenKind) -> bool {
    if self.at(kind) {
      self.pos += 1;
      true
    } else {
      false
    }
  }

  fn expect(&mut self, kind: TokenKind) -> PResult<Token<'src>> {
    if self.at(kind) {
      Ok(self.bump().unwrap())
    } else {
      let found = self
        .peek()
        .map(|t| t.kind.describe())
        .unwrap_or("end of input");
      Err(DiagError::parse(
        format!("expected {}, found {found}", kind.describe()),
        self.span(),
      ))
    }
  }

  fn expect_id(&mut self) -> PResult<(String, Span)> {
    let tok = self.expect(TokenKind::Id)?;
    Ok((tok.lexeme.to_string(), tok.span))
  }

  // --- module / blocks -----------------------------------------------

  fn parse_module(&mut self) -> PResult<Node> {
    let start = self.span();
    let body = self.parse_block(&[])?;
    if let Some(tok) = self.peek() {
      return Err(DiagError::parse(
        format!("unexpected {}", tok.kind.describe()),
        tok.span,
      ));
    }
    Ok(Node::new(start.join(self.span()), Kind::Statements(body)))
  }

  /// Parses statements until one of `terminators` is seen (or EOF).
  fn parse_block(&mut self, terminators: &[TokenKind]) -> PResult<Vec<Node>> {
    let mut stmts = vec![];
    while let Some(kind) = self.peek_kind() {
      if terminators.contains(&kind) {
        break;
      }
      stmts.push(self.parse_stmt()?);
    }
    Ok(stmts)
  }

  fn block_node(&mut self, terminators: &[TokenKind]) -> PResult<Node> {
    let start = self.span();
    let stmts = self.parse_block(terminators)?;
    Ok(Node::new(start.join(self.span()), Kind::Statements(stmts)))
  }

  // --- statements ------------------------------------------------------

  fn parse_stmt(&mut self) -> PResult<Node> {
    let start = self.span();
    let node = match self.peek_kind() {
      Some(TokenKind::Kw_If) => self.parse_if()?,
      Some(TokenKind::Kw_While) => self.parse_while()?,
      Some(TokenKind::Kw_For) => self.parse_for()?,
      Some(TokenKind::Kw_Func) => self.parse_func_def()?,
      Some(TokenKind::Kw_Break) => {
        self.bump();
        Node::new(start, Kind::Break)
      }
      Some(TokenKind::Kw_Continue) => {
        self.bump();
        Node::new(start, Kind::Continue)
      }
      Some(TokenKind::Kw_Pass) => {
        self.bump();
        Node::new(start, Kind::Pass)
      }
      Some(TokenKind::Kw_Return) => {
        self.bump();
        let value = if self.stmt_ends_here() {
          None
        } else {
          Some(Box::new(self.parse_assignment()?))
        };
        Node::new(start.join(self.span()), Kind::Return(value))
      }
      _ => self.parse_assignment()?,
    };
    // statements may be separated by `;` or simply adjacency
    self.eat(TokenKind::Semi);
    Ok(node)
  }

  fn stmt_ends_here(&self) -> bool {
    matches!(
      self.peek_kind(),
      None
        | Some(TokenKind::Semi)
        | Some(TokenKind::Kw_End)
        | Some(TokenKind::Kw_Else)
        | Some(TokenKind::Kw_Done)
    )
  }

  fn parse_if(&mut self) -> PResult<Node> {
    let start = self.span();
    self.expect(TokenKind::Kw_If)?;
    let cond = self.parse_assignment()?;
    self.expect(TokenKind::Kw_Then)?;
    let then_branch = self.block_node(&[TokenKind::Kw_Else, TokenKind::Kw_End])?;
    let else_branch = if self.eat(TokenKind::Kw_Else) {
      Some(Box::new(self.block_node(&[TokenKind::Kw_End])?))
    } else {
      None
    };
    self.expect(TokenKind::Kw_End)?;
    Ok(Node::new(
      start.join(self.span()),
      Kind::IfElse(Box::new(cond), Box::new(then_branch), else_branch),
    ))
  }

  fn parse_while(&mut self) -> PResult<Node> {
    let start = self.span();
    self.expect(TokenKind::Kw_While)?;
    let cond = self.parse_assignment()?;
    self.expect(TokenKind::Kw_Do)?;
    let body = self.block_node(&[TokenKind::Kw_Done])?;
    self.expect(TokenKind::Kw_Done)?;
    Ok(Node::new(
      start.join(self.span()),
      Kind::While(Box::new(cond), Box::new(body)),
    ))
  }

  fn parse_for(&mut self) -> PResult<Node> {
    let start = self.span();
    self.expect(TokenKind::Kw_For)?;
    let (name, _) = self.expect_id()?;
    self.expect(TokenKind::Kw_In)?;
    let iter = self.parse_assignment()?;
    self.expect(TokenKind::Kw_Do)?;
    let body = self.block_node(&[TokenKind::Kw_Done])?;
    self.expect(TokenKind::Kw_Done)?;
    Ok(Node::new(
      start.join(self.span()),
      Kind::For(name, Box::new(iter), Box::new(body)),
    ))
  }

  fn parse_params(&mut self) -> PResult<Vec<String>> {
    self.expect(TokenKind::ParenL)?;
    let mut params = vec![];
    if !self.at(TokenKind::ParenR) {
      loop {
        let (name, _) = self.expect_id()?;
        params.push(name);
        if !self.eat(TokenKind::Comma) {
          break;
        }
      }
    }
    self.expect(TokenKind::ParenR)?;
    Ok(params)
  }

  fn parse_func_def(&mut self) -> PResult<Node> {
    let start = self.span();
    self.expect(TokenKind::Kw_Func)?;
    let (name, _) = self.expect_id()?;
    let params = self.parse_params()?;
    let body = self.block_node(&[TokenKind::Kw_End])?;
    self.expect(TokenKind::Kw_End)?;
    Ok(Node::new(
      start.join(self.span()),
      Kind::FuncDef(name, params, Box::new(body)),
    ))
  }

  fn parse_func_expr(&mut self) -> PResult<Node> {
    let start = self.span();
    self.expect(TokenKind::Kw_Func)?;
    let params = self.parse_params()?;
    let body = self.block_node(&[TokenKind::Kw_End])?;
    self.expect(TokenKind::Kw_End)?;
    Ok(Node::new(
      start.join(self.span()),
      // anonymous functions are just function defs under a synthetic name;
      // the compiler binds them like any other local.
      Kind::FuncDef(String::new(), params, Box::new(body)),
    ))
  }

  // --- assignment / expressions ---------------------------------------

  /// Assignment is right-associative and its target must be an lvalue
  /// (identifier or container element). `a = b = e` parses to
  /// `Assign("a", Assign("b", e))` per spec §4.5.
  fn parse_assignment(&mut self) -> PResult<Node> {
    let start = self.span();
    let target = self.parse_binary(0)?;
    if self.eat(TokenKind::Assign) {
      let value = self.parse_assignment()?;
      let span = start.join(self.span());
      return match target.kind {
        Kind::Id(name) => Ok(Node::new(span, Kind::Assign(name, Box::new(value)))),
        Kind::ContainerGet(container, index) => Ok(Node::new(
          span,
          Kind::ContainerPut(container, index, Box::new(value)),
        )),
        _ => Err(DiagError::compile(
          "invalid assignment target",
          target.span,
        )),
      };
    }
    Ok(target)
  }

  fn parse_binary(&mut self, min_bp: u8) -> PResult<Node> {
    check_recursion_limit(self.span())?;
    let mut lhs = self.parse_unary()?;
    loop {
      let Some((op, lbp, rbp)) = self.peek_kind().and_then(binop_binding_power) else {
        break;
      };
      if lbp < min_bp {
        break;
      }
      self.bump();
      let rhs = self.parse_binary(rbp)?;
      let span = lhs.span.join(rhs.span);
      lhs = Node::new(span, Kind::Binary(op, Box::new(lhs), Box::new(rhs)));
    }
    Ok(lhs)
  }

  fn parse_unary(&mut self) -> PResult<Node> {
    let start = self.span();
    let op = match self.peek_kind() {
      Some(TokenKind::Minus) => Some(UnOp::Neg),
      Some(TokenKind::Kw_Not) => Some(UnOp::LgNot),
      Some(TokenKind::Tilde) => Some(UnOp::BwNot),
      _ => None,
    };
    if let Some(op) = op {
      self.bump();
      let operand = self.parse_unary()?;
      let span = start.join(operand.span);
      return Ok(Node::new(span, Kind::Unary(op, Box::new(operand))));
    }
    self.parse_postfix()
  }

  fn parse_postfix(&mut self) -> PResult<Node> {
    let mut node = self.parse_primary()?;
    loop {
      match self.peek_kind() {
        Some(TokenKind::SquareL) => {
          self.bump();
          let index = self.parse_assignment()?;
          let end = self.expect(TokenKind::SquareR)?;
          let span = node.span.join(end.span);
          node = Node::new(span, Kind::ContainerGet(Box::new(node), Box::new(index)));
        }
        Some(TokenKind::ParenL) => {
          self.bump();
          let mut args = vec![];
          if !self.at(TokenKind::ParenR) {
            loop {
              args.push(self.parse_assignment()?);
              if !self.eat(TokenKind::Comma) {
                break;
              }
            }
          }
          let end = self.expect(TokenKind::ParenR)?;
          let span = node.span.join(end.span);
          node = Node::new(span, Kind::Call(Box::new(node), args));
        }
        _ => break,
      }
    }
    Ok(node)
  }

  fn parse_primary(&mut self) -> PResult<Node> {
    let tok = self
      .peek()
      .cloned()
      .ok_or_else(|| DiagError::parse("unexpected end of input", self.eof))?;
    match tok.kind {
      TokenKind::Int => {
        self.bump();
        let v: i64 = tok
          .lexeme
          .parse()
          .map_err(|_| DiagError::parse("invalid integer literal", tok.span))?;
        Ok(Node::new(tok.span, Kind::Int(v)))
      }
      TokenKind::Float => {
        self.bump();
        let v: f64 = tok
          .lexeme
          .parse()
          .map_err(|_| DiagError::parse("invalid float literal", tok.span))?;
        Ok(Node::new(tok.span, Kind::Float(v)))
      }
      TokenKind::Str => {
        self.bump();
        let raw = &tok.lexeme[1..tok.lexeme.len() - 1];
        Ok(Node::new(tok.span, Kind::Str(unescape(raw).into_bytes())))
      }
      TokenKind::Kw_Nil => {
        self.bump();
        Ok(Node::new(tok.span, Kind::Nil))
      }
      TokenKind::Id => {
        self.bump();
        Ok(Node::new(tok.span, Kind::Id(tok.lexeme.to_string())))
      }
      TokenKind::ParenL => {
        self.bump();
        let inner = self.parse_assignment()?;
        let end = self.expect(TokenKind::ParenR)?;
        Ok(Node::new(tok.span.join(end.span), inner.kind))
      }
      TokenKind::SquareL => self.parse_list(),
      TokenKind::CurlyL => self.parse_map(),
      TokenKind::Kw_Func => self.parse_func_expr(),
      _ => Err(DiagError::parse(
        format!("unexpected {}", tok.kind.describe()),
        tok.span,
      )),
    }
  }

  fn parse_list(&mut self) -> PResult<Node> {
    let start = self.expect(TokenKind::SquareL)?;
    let mut items = vec![];
    if !self.at(TokenKind::SquareR) {
      loop {
        items.push(self.parse_assignment()?);
        if !self.eat(TokenKind::Comma) {
          break;
        }
      }
    }
    let end = self.expect(TokenKind::SquareR)?;
    Ok(Node::new(start.span.join(end.span), Kind::ListDef(items)))
  }

  fn parse_map(&mut self) -> PResult<Node> {
    let start = self.expect(TokenKind::CurlyL)?;
    let mut pairs = vec![];
    if !self.at(TokenKind::CurlyR) {
      loop {
        let key = self.parse_assignment()?;
        self.expect(TokenKind::Colon)?;
        let value = self.parse_assignment()?;
        pairs.push((key, value));
        if !self.eat(TokenKind::Comma) {
          break;
        }
      }
    }
    let end = self.expect(TokenKind::CurlyR)?;
    Ok(Node::new(start.span.join(end.span), Kind::MapDef(pairs)))
  }
}

/// Binding powers, low to high: or/and, bitwise or/xor/and, equality,
/// relational, additive, multiplicative, power (right-assoc).
fn binop_binding_power(kind: TokenKind) -> Option<(BinOp, u8, u8)> {
  use TokenKind::*;
  Some(match kind {
    Kw_Or => (BinOp::LgOr, 1, 2),
    Kw_And => (BinOp::LgAnd, 3, 4),
    Pipe => (BinOp::BwOr, 5, 6),
    Caret => (BinOp::BwXor, 7, 8),
    Amp => (BinOp::BwAnd, 9, 10),
    Eq => (BinOp::Eq, 11, 12),
    Neq => (BinOp::Neq, 11, 12),
    Lt => (BinOp::Lt, 13, 14),
    Gt => (BinOp::Gt, 13, 14),
    Lte => (BinOp::Lte, 13, 14),
    Gte => (BinOp::Gte, 13, 14),
    Plus => (BinOp::Add, 15, 16),
    Minus => (BinOp::Sub, 15, 16),
    Star => (BinOp::Mul, 17, 18),
    Slash => (BinOp::Div, 17, 18),
    Percent => (BinOp::Mod, 17, 18),
    StarStar => (BinOp::Pow, 20, 19), // right-associative
    _ => return None,
  })
}

const MINIMUM_STACK_REQUIRED: usize = 64_000;

#[cfg(feature = "check-recursion-limit")]
#[cfg(not(target_family = "wasm"))]
fn check_recursion_limit(span: Span) -> PResult<()> {
  if stacker::remaining_stack()
    .map(|available| available > MINIMUM_STACK_REQUIRED)
    .unwrap_or(true)
  {
    Ok(())
  } else {
    Err(DiagError::compile("nesting limit reached", span))
  }
}

#[cfg(any(not(feature = "check-recursion-limit"), target_family = "wasm"))]
fn check_recursion_limit(_span: Span) -> PResult<()> {
  Ok(())
}

fn unescape(s: &str) -> String {
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
      Some('"') => out.push('"'),
      Some('\\') => out.push('\\'),
      Some(other) => out.push(other),
      None => {}
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse_ok(src: &str) -> Node {
    parse(src).unwrap_or_else(|e| panic!("parse failed: {:?}", e))
  }

  #[test]
  fn parses_arithmetic_precedence() {
    let module = parse_ok("x = 3 + 4 * 2");
    let Kind::Statements(stmts) = module.kind else {
      panic!()
    };
    assert_eq!(stmts.len(), 1);
    let Kind::Assign(name, value) = &stmts[0].kind else {
      panic!()
    };
    assert_eq!(name, "x");
    let Kind::Binary(BinOp::Add, lhs, rhs) = &value.kind else {
      panic!("expected addition at top, got {:?}", value.kind)
    };
    assert!(matches!(lhs.kind, Kind::Int(3)));
    assert!(matches!(rhs.kind, Kind::Binary(BinOp::Mul, ..)));
  }

  #[test]
  fn parses_chained_assignment() {
    let module = parse_ok("a = b = 1");
    let Kind::Statements(stmts) = module.kind else {
      panic!()
    };
    let Kind::Assign(name, inner) = &stmts[0].kind else {
      panic!()
    };
    assert_eq!(name, "a");
    assert!(matches!(inner.kind, Kind::Assign(..)));
  }

  #[test]
  fn parses_for_loop_with_break() {
    let module = parse_ok("for x in l do if x == 2 then break end end");
    let Kind::Statements(stmts) = module.kind else {
      panic!()
    };
    assert!(matches!(stmts[0].kind, Kind::For(..)));
  }

  #[test]
  fn parses_map_literal() {
    let module = parse_ok(r#"m = {"a": 1, "b": 2}"#);
    let Kind::Statements(stmts) = module.kind else {
      panic!()
    };
    let Kind::Assign(_, value) = &stmts[0].kind else {
      panic!()
    };
    let Kind::MapDef(pairs) = &value.kind else {
      panic!()
    };
    assert_eq!(pairs.len(), 2);
  }

  #[test]
  fn parses_recursive_function_expression() {
    let module =
      parse_ok("f = func (n) if n < 2 then return n else return f(n-1) + f(n-2) end end");
    let Kind::Statements(stmts) = module.kind else {
      panic!()
    };
    let Kind::Assign(name, value) = &stmts[0].kind else {
      panic!()
    };
    assert_eq!(name, "f");
    assert!(matches!(value.kind, Kind::FuncDef(..)));
  }

  #[test]
  fn reports_parse_error_with_span() {
    let err = parse("x = ").unwrap_err();
    assert_eq!(err.len(), 1);
  }
}
