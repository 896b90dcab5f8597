use arcstr::ArcStr;
use oxc::{
  parser::{ParseOptions, Parser},
  span::SourceType,
};
use sharelib_error::BuildResult;

use crate::ecma_ast::{
  EcmaAst,
  program_cell::{ProgramCell, ProgramCellDependent, ProgramCellOwner},
};

pub struct EcmaCompiler;

impl EcmaCompiler {
  /// Parses a complete script or module.
  pub fn parse(source: impl Into<ArcStr>) -> BuildResult<EcmaAst> {
    Self::parse_with(source.into(), ParseOptions::default())
  }

  /// Parses the body of a function, where a top-level `return` is legal.
  pub fn parse_function_body(source: impl Into<ArcStr>) -> BuildResult<EcmaAst> {
    Self::parse_with(
      source.into(),
      ParseOptions { allow_return_outside_function: true, ..ParseOptions::default() },
    )
  }

  fn parse_with(source: ArcStr, options: ParseOptions) -> BuildResult<EcmaAst> {
    let allocator = oxc::allocator::Allocator::default();
    let owner = ProgramCellOwner { source, allocator };
    let program = ProgramCell::try_new(owner, |owner| {
      let ret =
        Parser::new(&owner.allocator, &owner.source, SourceType::default()).with_options(options).parse();
      if ret.errors.is_empty() && !ret.panicked {
        Ok(ProgramCellDependent { program: ret.program })
      } else {
        Err(anyhow::anyhow!("{:?}", ret.errors))
      }
    })?;

    Ok(EcmaAst { program })
  }
}

#[test]
fn parse_errors_are_reported() {
  assert!(EcmaCompiler::parse("var a = ;").is_err());
  assert!(EcmaCompiler::parse("return 1;").is_err());
  assert!(EcmaCompiler::parse_function_body("if (a) { return 1; }\nreturn 2;").is_ok());
}
