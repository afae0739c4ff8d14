#![allow(non_camel_case_types)]

use logos::Logos;
use span::Span;

#[derive(Clone, Debug)]
pub struct Token<'src> {
  pub lexeme: &'src str,
  pub kind: TokenKind,
  pub span: Span,
}

#[derive(Debug)]
pub struct Error {
  pub span: Span,
  pub lexeme: String,
}

pub fn lex(src: &str) -> Result<Vec<Token<'_>>, Vec<Error>> {
  let mut errors = vec![];
  let mut tokens = vec![];
  let mut lexer = TokenKind::lexer(src);
  while let Some(kind) = lexer.next() {
    let lexeme = lexer.slice();
    let span: Span = lexer.span().into();
    match kind {
      TokenKind::Whitespace | TokenKind::Comment => continue,
      TokenKind::Error => errors.push(Error {
        lexeme: lexeme.into(),
        span,
      }),
      _ => tokens.push(Token { lexeme, kind, span }),
    }
  }

  if errors.is_empty() {
    Ok(tokens)
  } else {
    Err(errors)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Logos)]
pub enum TokenKind {
  // Keywords
  #[token("if")]
  Kw_If,
  #[token("then")]
  Kw_Then,
  #[token("else")]
  Kw_Else,
  #[token("end")]
  Kw_End,
  #[token("while")]
  Kw_While,
  #[token("for")]
  Kw_For,
  #[token("in")]
  Kw_In,
  #[token("do")]
  Kw_Do,
  #[token("done")]
  Kw_Done,
  #[token("func")]
  Kw_Func,
  #[token("return")]
  Kw_Return,
  #[token("break")]
  Kw_Break,
  #[token("continue")]
  Kw_Continue,
  #[token("pass")]
  Kw_Pass,
  #[token("nil")]
  Kw_Nil,
  #[token("and")]
  Kw_And,
  #[token("or")]
  Kw_Or,
  #[token("not")]
  Kw_Not,

  // Brackets / punctuation
  #[token("(")]
  ParenL,
  #[token(")")]
  ParenR,
  #[token("[")]
  SquareL,
  #[token("]")]
  SquareR,
  #[token("{")]
  CurlyL,
  #[token("}")]
  CurlyR,
  #[token(",")]
  Comma,
  #[token(":")]
  Colon,
  #[token(";")]
  Semi,

  // Operators
  #[token("=")]
  Assign,
  #[token("==")]
  Eq,
  #[token("!=")]
  Neq,
  #[token("<=")]
  Lte,
  #[token(">=")]
  Gte,
  #[token("<")]
  Lt,
  #[token(">")]
  Gt,
  #[token("+")]
  Plus,
  #[token("-")]
  Minus,
  #[token("*")]
  Star,
  #[token("/")]
  Slash,
  #[token("%")]
  Percent,
  #[token("**")]
  StarStar,
  #[token("^")]
  Caret,
  #[token("|")]
  Pipe,
  #[token("&")]
  Amp,
  #[token("~")]
  Tilde,

  // Literals
  #[regex(r"[0-9]+")]
  Int,
  #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
  Float,
  #[regex(r#""([^"\\]|\\.)*""#)]
  Str,
  #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
  Id,

  #[regex(r"[ \t\r\n]+")]
  Whitespace,
  #[regex(r"#[^\n]*")]
  Comment,

  #[error]
  Error,
}

impl TokenKind {
  pub fn describe(self) -> &'static str {
    use TokenKind::*;
    match self {
      Kw_If => "`if`",
      Kw_Then => "`then`",
      Kw_Else => "`else`",
      Kw_End => "`end`",
      Kw_While => "`while`",
      Kw_For => "`for`",
      Kw_In => "`in`",
      Kw_Do => "`do`",
      Kw_Done => "`done`",
      Kw_Func => "`func`",
      Kw_Return => "`return`",
      Kw_Break => "`break`",
      Kw_Continue => "`continue`",
      Kw_Pass => "`pass`",
      Kw_Nil => "`nil`",
      Kw_And => "`and`",
      Kw_Or => "`or`",
      Kw_Not => "`not`",
      ParenL => "`(`",
      ParenR => "`)`",
      SquareL => "`[`",
      SquareR => "`]`",
      CurlyL => "`{`",
      CurlyR => "`}`",
      Comma => "`,`",
      Colon => "`:`",
      Semi => "`;`",
      Assign => "`=`",
      Eq => "`==`",
      Neq => "`!=`",
      Lte => "`<=`",
      Gte => "`>=`",
      Lt => "`<`",
      Gt => "`>`",
      Plus => "`+`",
      Minus => "`-`",
      Star => "`*`",
      Slash => "`/`",
      Percent => "`%`",
      StarStar => "`**`",
      Caret => "`^`",
      Pipe => "`|`",
      Amp => "`&`",
      Tilde => "`~`",
      Int => "integer literal",
      Float => "float literal",
      Str => "string literal",
      Id => "identifier",
      Whitespace => "whitespace",
      Comment => "comment",
      Error => "invalid token",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lexes_assignment_and_arithmetic() {
    let tokens = lex("x = 3 + 4 * 2").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
      kinds,
      vec![
        TokenKind::Id,
        TokenKind::Assign,
        TokenKind::Int,
        TokenKind::Plus,
        TokenKind::Int,
        TokenKind::Star,
        TokenKind::Int,
      ]
    );
  }

  #[test]
  fn skips_comments_and_whitespace() {
    let tokens = lex("x = 1 # comment\ny = 2").unwrap();
    assert_eq!(tokens.len(), 6);
  }

  #[test]
  fn lexes_string_literal() {
    let tokens = lex(r#""abc""#).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Str);
    assert_eq!(tokens[0].lexeme, "\"abc\"");
  }

  #[test]
  fn reports_invalid_token() {
    let err = lex("x = @").unwrap_err();
    assert_eq!(err[0].lexeme, "@");
  }
}
