//! CLI entrypoint.

use std::error::Error;
use std::io::{self, IsTerminal, Write};
use std::process;

use clap::{Parser, ValueEnum};
use gofuncs::{
	LoadConfig, PackageListing, Renderer, list_exported_names, list_exported_signatures, list_package, load_packages,
	parse_build_tags,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
/// Output formats the CLI can emit.
enum OutputFormat {
	/// One line per exported function or method.
	Text,
	/// A JSON array with one object per package.
	Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Parsed command-line options for the gofuncs CLI.
struct Cli {
	/// Packages to list: directories, `.go` files, `dir/...`, or import paths
	#[arg(default_value = "./")]
	packages: Vec<String>,

	/// Comma-separated build tags to satisfy
	#[arg(short = 't', long, default_value = "")]
	tags: String,

	/// Include `_test.go` files and external test packages
	#[arg(long, default_value_t = false)]
	include_tests: bool,

	/// Print full signatures instead of bare names
	#[arg(short = 'v', long, default_value_t = false)]
	verbose: bool,

	/// Render variadic parameters by their element type, without `...`
	#[arg(long, default_value_t = false)]
	elide_variadic: bool,

	/// Select the output format
	#[arg(short = 'f', long, value_enum, default_value = "text")]
	format: OutputFormat,

	/// Disable ANSI colors in error output
	#[arg(long, default_value_t = false)]
	no_color: bool,
}

fn main() {
	let cli = Cli::parse();
	init_tracing();

	let color = !cli.no_color && io::stderr().is_terminal();
	if let Err(e) = run(&cli) {
		if color {
			eprintln!("{} {e}", "error:".red().bold());
		} else {
			eprintln!("error: {e}");
		}
		process::exit(1);
	}
}

/// Log to stderr, filtered by `GOFUNCS_LOG` (default `warn`).
fn init_tracing() {
	let filter = EnvFilter::try_from_env("GOFUNCS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.with_target(false)
		.init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
	let config = LoadConfig::from_env()
		.with_tags(parse_build_tags(&cli.tags))
		.with_include_tests(cli.include_tests);
	let renderer = Renderer::default().with_variadic_ellipsis(!cli.elide_variadic);

	let packages = load_packages(&config, &cli.packages)?;
	tracing::debug!(count = packages.len(), "packages loaded");

	// Everything is rendered before the first write, so a failure leaves stdout empty.
	let stdout = io::stdout();
	match cli.format {
		OutputFormat::Text => {
			let mut lines = Vec::new();
			for file in packages.iter().flat_map(|package| &package.files) {
				if cli.verbose {
					lines.extend(list_exported_signatures(file, &renderer)?);
				} else {
					lines.extend(list_exported_names(file)?);
				}
			}
			let mut out = stdout.lock();
			for line in &lines {
				writeln!(out, "{line}")?;
			}
			out.flush()?;
		}
		OutputFormat::Json => {
			let listings = packages
				.iter()
				.map(|package| list_package(package, &renderer, cli.verbose))
				.collect::<gofuncs::Result<Vec<PackageListing>>>()?;
			let mut out = stdout.lock();
			serde_json::to_writer_pretty(&mut out, &listings).map_err(gofuncs::Error::from)?;
			writeln!(out)?;
			out.flush()?;
		}
	}
	Ok(())
}
