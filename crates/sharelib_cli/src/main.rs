mod args;
mod graph;

use std::{path::Path, process::ExitCode, time::Instant};

use ansi_term::Colour;
use anyhow::Context;
use args::{InputArgs, OutputArgs};
use clap::Parser;
use graph::GraphDescription;
use sharelib::{
  BuildOutput, BuildResult, Compiler, FileSystem, OsFileSystem, OutputAsset, Plugin,
  SharedLibraryPlugin, SharedLibraryPluginOptions,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Commands {
  #[clap(flatten)]
  input: InputArgs,

  #[clap(flatten)]
  output: OutputArgs,
}

fn init_logging() {
  let filter = EnvFilter::try_from_env("SHARELIB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn print_output_assets(outputs: &[OutputAsset], dir: &str) {
  let mut left = 0;
  let mut right = 0;

  let mut assets = Vec::with_capacity(outputs.len());

  for output in outputs {
    let size = format!("{:.2}", output.content.len() as f64 / 1024.0);

    if size.len() > right {
      right = size.len();
    }

    if output.filename.len() > left {
      left = output.filename.len();
    }

    assets.push((output.filename.as_str(), size));
  }

  let dim = Colour::White.dimmed();
  let color = Colour::Cyan;

  for (filename, size) in assets {
    println!(
      "{}{}{:left$} {}{}{:right$}{} kB",
      dim.paint(format!("{dir}/")),
      color.paint(filename),
      "",
      dim.paint("chunk"),
      dim.paint(" │ size: "),
      "",
      size,
      left = left - filename.len(),
      right = right - size.len()
    );
  }
}

fn shared_library_plugin<Fs: FileSystem + 'static>(
  options: SharedLibraryPluginOptions,
  fs: Fs,
) -> Box<dyn Plugin> {
  Box::new(SharedLibraryPlugin::new(options, fs))
}

fn build(args: &Commands) -> BuildResult<BuildOutput> {
  let base = match &args.input.cwd {
    Some(cwd) => cwd.clone(),
    None => std::env::current_dir().context("Failed to read the working directory")?,
  };

  let config = std::fs::read_to_string(&args.input.config)
    .with_context(|| format!("Failed to read {}", args.input.config.display()))?;
  let options: SharedLibraryPluginOptions = serde_json::from_str(&config)
    .with_context(|| format!("Invalid plugin options in {}", args.input.config.display()))?;

  let (mut compilation, memory_fs) = GraphDescription::read(&args.input.graph)?.into_compilation(&base)?;
  if let Some(chunk_filename) = &args.output.chunk_filename {
    compilation.output.chunk_filename.clone_from(chunk_filename);
  }
  if let Some(jsonp_function) = &args.output.jsonp_function {
    compilation.output.jsonp_function.clone_from(jsonp_function);
  }

  let plugin = match memory_fs {
    Some(fs) => shared_library_plugin(options, fs),
    None => shared_library_plugin(options, OsFileSystem),
  };
  let mut compiler = Compiler::new(compilation.output.clone(), vec![plugin])?;
  compiler.build(compilation)
}

fn write_assets(dir: &Path, assets: &[OutputAsset]) -> anyhow::Result<()> {
  std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
  for asset in assets {
    let path = dir.join(&asset.filename);
    std::fs::write(&path, &asset.content)
      .with_context(|| format!("Failed to write {}", path.display()))?;
  }
  tracing::debug!(dir = %dir.display(), assets = assets.len(), "wrote assets");
  Ok(())
}

fn main() -> ExitCode {
  init_logging();
  let args = Commands::parse();

  let start = Instant::now();
  let output = build(&args).and_then(|output| {
    if let Some(dir) = &args.output.dir {
      write_assets(dir, &output.assets)?;
    }
    Ok(output)
  });

  match output {
    Ok(output) => {
      if !args.output.silent {
        for warning in &output.warnings {
          println!("{} {}", Colour::Yellow.paint("Warning:"), warning);
        }

        if !output.assets.is_empty() {
          let dir = args.output.dir.as_ref().map_or_else(|| "<DIR>".to_string(), |dir| dir.display().to_string());
          print_output_assets(&output.assets, &dir);
        }
      }

      let elapsed = format!("{:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
      println!("\n{} Finished in {}", Colour::Green.paint("✔"), Colour::White.bold().paint(elapsed));
      ExitCode::SUCCESS
    }
    Err(errors) => {
      for error in &*errors {
        println!("{} {error:#}", Colour::Red.paint("Error:"));
      }
      ExitCode::FAILURE
    }
  }
}
