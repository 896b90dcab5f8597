use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub struct InputArgs {
  /// JSON description of the chunk graph to render.
  pub graph: PathBuf,

  /// JSON file with the shared library options, e.g. `{ "libs": ["lodash"] }`.
  #[clap(long, short = 'c')]
  pub config: PathBuf,

  #[clap(long)]
  pub cwd: Option<PathBuf>,
}

#[derive(Args)]
pub struct OutputArgs {
  /// Writes the rendered assets into this directory.
  #[clap(long, short = 'd')]
  pub dir: Option<PathBuf>,

  #[clap(long)]
  pub chunk_filename: Option<String>,

  #[clap(long)]
  pub jsonp_function: Option<String>,

  #[clap(long, short = 's')]
  pub silent: bool,
}
