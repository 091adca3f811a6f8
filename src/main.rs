use std::ffi::OsString;
use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use jir::{MatchPolicy, Patch};
use crate::krakatau::Krakatau;
use crate::workflow::JarPatch;

mod jar;
mod krakatau;
mod launch;
mod sign;
mod workflow;

/// Patches a jar so that a boolean method of one of its classes always returns `true`.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
	/// Print more output, give twice for all output.
	#[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
	verbose: u8,

	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Args)]
struct Target {
	/// The name of the method to patch.
	#[arg(long = "method", default_value = workflow::DEFAULT_METHOD)]
	method: String,
	/// Fail if the method name matches more than once, instead of patching the first match.
	#[arg(long = "strict")]
	strict: bool,
}

impl Target {
	fn patch(&self) -> Patch {
		let policy = if self.strict { MatchPolicy::Unique } else { MatchPolicy::FirstMatch };
		Patch::return_true(&self.method).with_policy(policy)
	}
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Disassemble, patch, assemble, repackage and sign a jar.
	Jar {
		input: PathBuf,
		output: PathBuf,
		/// The class containing the method, in internal form.
		#[arg(long = "class", default_value = workflow::DEFAULT_CLASS)]
		class: String,
		#[command(flatten)]
		target: Target,
		/// The directory to keep the intermediate files in. It gets cleared!
		#[arg(long = "workdir", default_value = "workdir")]
		workdir: PathBuf,
		/// The Krakatau checkout to use, defaults to `$KRAKATAU_HOME`, or `./Krakatau`. Gets cloned if missing.
		#[arg(long = "krakatau")]
		krakatau: Option<PathBuf>,
		/// The python interpreter to run Krakatau with.
		#[arg(long = "python", default_value = "python")]
		python: OsString,
		/// Don't sign the resulting jar.
		#[arg(long = "no-sign")]
		no_sign: bool,
	},
	/// Patch a single disassembled class file.
	Ir {
		input: PathBuf,
		/// Where to write the patched file, stdout if not given.
		#[arg(short = 'o', long = "output")]
		output: Option<PathBuf>,
		#[command(flatten)]
		target: Target,
	},
}

fn setup_logger(verbose: u8) -> Result<()> {
	let level = match verbose {
		0 => LevelFilter::Info,
		1 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};

	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
		})
		.level(level)
		.chain(std::io::stderr())
		.apply()
		.context("failed to set up logging")
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_logger(cli.verbose)?;

	match cli.command {
		Command::Jar { input, output, class, target, workdir, krakatau, python, no_sign } => {
			let krakatau = match krakatau {
				Some(home) => Krakatau::new(python, home),
				None => Krakatau::from_env_var(python.clone())
					.unwrap_or_else(|| Krakatau::new(python, "Krakatau")),
			};

			JarPatch {
				input,
				output,
				class_name: class,
				patch: target.patch(),
				workdir,
				krakatau,
				sign: !no_sign,
			}.run()
		},
		Command::Ir { input, output, target } => {
			workflow::patch_ir(&target.patch(), &input, output.as_deref())
		},
	}
}
