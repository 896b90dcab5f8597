mod ecma_ast;
mod ecma_compiler;
mod ecma_utils;

pub use crate::{
  ecma_ast::EcmaAst,
  ecma_compiler::EcmaCompiler,
  ecma_utils::statement_spans::{
    IfStatementSpans, StatementSpans, collect_function_statements, collect_program_statements,
  },
};
