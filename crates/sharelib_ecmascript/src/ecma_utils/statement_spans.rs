use oxc::{
  ast::ast::{ArrowFunctionExpression, Function, IfStatement, Program, ReturnStatement},
  ast_visit::{Visit, walk},
  span::{GetSpan, Span},
  syntax::scope::ScopeFlags,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfStatementSpans {
  pub statement: Span,
  pub test: Span,
}

/// `if` and `return` statements of one function body in source order. Statements of
/// nested functions are not included.
#[derive(Debug, Default, Clone)]
pub struct StatementSpans {
  pub if_statements: Vec<IfStatementSpans>,
  pub return_statements: Vec<Span>,
}

impl StatementSpans {
  pub fn first_if(&self) -> Option<&IfStatementSpans> {
    self.if_statements.first()
  }

  pub fn last_if(&self) -> Option<&IfStatementSpans> {
    self.if_statements.last()
  }

  pub fn last_return(&self) -> Option<Span> {
    self.return_statements.last().copied()
  }
}

/// Collects the statements of a program parsed as a bare function body.
pub fn collect_program_statements(program: &Program) -> StatementSpans {
  let mut collector = StatementCollector::default();
  collector.visit_program(program);
  collector.spans
}

/// Collects the statements of the first function declared or expressed with `name`.
pub fn collect_function_statements(program: &Program, name: &str) -> Option<StatementSpans> {
  let mut finder = FunctionFinder { name, found: None };
  finder.visit_program(program);
  finder.found
}

#[derive(Default)]
struct StatementCollector {
  spans: StatementSpans,
}

impl<'a> Visit<'a> for StatementCollector {
  fn visit_if_statement(&mut self, it: &IfStatement<'a>) {
    self.spans.if_statements.push(IfStatementSpans { statement: it.span, test: it.test.span() });
    walk::walk_if_statement(self, it);
  }

  fn visit_return_statement(&mut self, it: &ReturnStatement<'a>) {
    self.spans.return_statements.push(it.span);
    walk::walk_return_statement(self, it);
  }

  fn visit_function(&mut self, _it: &Function<'a>, _flags: ScopeFlags) {}

  fn visit_arrow_function_expression(&mut self, _it: &ArrowFunctionExpression<'a>) {}
}

struct FunctionFinder<'n> {
  name: &'n str,
  found: Option<StatementSpans>,
}

impl<'a> Visit<'a> for FunctionFinder<'_> {
  fn visit_function(&mut self, it: &Function<'a>, flags: ScopeFlags) {
    if self.found.is_some() {
      return;
    }
    if it.id.as_ref().is_some_and(|id| id.name.as_str() == self.name) {
      if let Some(body) = &it.body {
        let mut collector = StatementCollector::default();
        collector.visit_function_body(body);
        self.found = Some(collector.spans);
      }
      return;
    }
    walk::walk_function(self, it, flags);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::EcmaCompiler;

  fn text(source: &str, span: Span) -> &str {
    &source[span.start as usize..span.end as usize]
  }

  #[test]
  fn collects_statements_of_named_function() {
    let source = "function outer() { return 0; }\n\
                  function check(a) {\n  if (a) { return 1; }\n  var f = function () { if (b) return 2; };\n  if (c && d) { a++; }\n  return 3;\n}";
    let ast = EcmaCompiler::parse(source).unwrap();
    let spans = collect_function_statements(ast.program(), "check").unwrap();

    assert_eq!(spans.if_statements.len(), 2);
    assert_eq!(text(source, spans.first_if().unwrap().test), "a");
    assert_eq!(text(source, spans.last_if().unwrap().test), "c && d");
    assert_eq!(spans.return_statements.len(), 2);
    assert_eq!(text(source, spans.last_return().unwrap()), "return 3;");
  }

  #[test]
  fn missing_function_yields_none() {
    let ast = EcmaCompiler::parse("function a() {}").unwrap();
    assert!(collect_function_statements(ast.program(), "b").is_none());
  }

  #[test]
  fn collects_statements_of_bare_body() {
    let source = "if (x) {\n  return x;\n}\nvar m = {};\nreturn m;";
    let ast = EcmaCompiler::parse_function_body(source).unwrap();
    let spans = collect_program_statements(ast.program());

    assert_eq!(spans.if_statements.len(), 1);
    assert_eq!(text(source, spans.first_if().unwrap().statement), "if (x) {\n  return x;\n}");
    assert_eq!(text(source, spans.last_return().unwrap()), "return m;");
  }
}
