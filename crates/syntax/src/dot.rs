//! Graphviz DOT dump of a parsed AST, for the CLI's `-g` flag (spec §6).
//! Lives alongside the parser since it only needs the AST, not anything
//! from the compiler or VM.

use std::fmt::Write;

use crate::ast::{Kind, Node};

pub fn to_dot(root: &Node) -> String {
  let mut out = String::new();
  out.push_str("digraph ast {\n");
  let mut next_id = 0u32;
  emit(root, &mut out, &mut next_id);
  out.push_str("}\n");
  out
}

fn emit(node: &Node, out: &mut String, next_id: &mut u32) -> u32 {
  let id = *next_id;
  *next_id += 1;

  let label = label_for(&node.kind);
  writeln!(out, "  n{id} [label=\"{}\"];", escape(&label)).unwrap();

  for child in children(node) {
    let child_id = emit(child, out, next_id);
    writeln!(out, "  n{id} -> n{child_id};").unwrap();
  }

  id
}

fn label_for(kind: &Kind) -> String {
  match kind {
    Kind::Nil => "nil".into(),
    Kind::Int(v) => format!("int {v}"),
    Kind::Float(v) => format!("float {v}"),
    Kind::Str(bytes) => format!("str {:?}", String::from_utf8_lossy(bytes)),
    Kind::Id(name) => format!("id {name}"),
    Kind::Unary(op, _) => format!("unary {}", op.name()),
    Kind::Binary(op, ..) => format!("binary {}", op.name()),
    Kind::ContainerGet(..) => "cget".into(),
    Kind::ContainerPut(..) => "cput".into(),
    Kind::ListDef(items) => format!("list[{}]", items.len()),
    Kind::MapDef(pairs) => format!("map[{}]", pairs.len()),
    Kind::Assign(name, _) => format!("assign {name}"),
    Kind::While(..) => "while".into(),
    Kind::For(name, ..) => format!("for {name}"),
    Kind::IfElse(.., else_) => format!("if{}", if else_.is_some() { "/else" } else { "" }),
    Kind::Call(..) => "call".into(),
    Kind::FuncDef(name, params, _) => format!("func {name}({})", params.join(",")),
    Kind::Statements(stmts) => format!("block[{}]", stmts.len()),
    Kind::Break => "break".into(),
    Kind::Continue => "continue".into(),
    Kind::Return(_) => "return".into(),
    Kind::Pass => "pass".into(),
  }
}

fn children(node: &Node) -> Vec<&Node> {
  match &node.kind {
    Kind::Unary(_, a) => vec![a],
    Kind::Binary(_, a, b) => vec![a, b],
    Kind::ContainerGet(a, b) => vec![a, b],
    Kind::ContainerPut(a, b, c) => vec![a, b, c],
    Kind::ListDef(items) => items.iter().collect(),
    Kind::MapDef(pairs) => pairs.iter().flat_map(|(k, v)| [k, v]).collect(),
    Kind::Assign(_, v) => vec![v],
    Kind::While(c, b) => vec![c, b],
    Kind::For(_, c, b) => vec![c, b],
    Kind::IfElse(c, t, e) => {
      let mut v = vec![c.as_ref(), t.as_ref()];
      if let Some(e) = e {
        v.push(e.as_ref());
      }
      v
    }
    Kind::Call(callee, args) => {
      let mut v = vec![callee.as_ref()];
      v.extend(args.iter());
      v
    }
    Kind::FuncDef(_, _, body) => vec![body],
    Kind::Statements(stmts) => stmts.iter().collect(),
    Kind::Return(Some(v)) => vec![v],
    _ => vec![],
  }
}

fn escape(s: &str) -> String {
  s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser::parse;

  #[test]
  fn dumps_a_well_formed_graph() {
    let module = parse("x = 1 + 2").unwrap();
    let dot = to_dot(&module);
    assert!(dot.starts_with("digraph ast {"));
    assert!(dot.contains("assign x"));
    assert!(dot.contains("binary add"));
  }
}
