use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use anyhow::{anyhow, bail, Context, Result};
use log::{info, trace};
use crate::launch;

/// The python version of Krakatau lives on the `v1` branch, `master` is a rewrite in rust with a different format.
const REPOSITORY: &str = "https://github.com/Storyyeller/Krakatau.git";
const BRANCH: &str = "v1";

/// Runs the disassembler and assembler scripts of a Krakatau checkout.
#[derive(Debug, Clone)]
pub(crate) struct Krakatau {
	python: OsString,
	home: PathBuf,
}

impl Krakatau {
	pub(crate) fn new(python: impl Into<OsString>, home: impl Into<PathBuf>) -> Krakatau {
		Krakatau { python: python.into(), home: home.into() }
	}

	/// Uses the checkout given by the `KRAKATAU_HOME` environment variable, if it is set.
	pub(crate) fn from_env_var(python: impl Into<OsString>) -> Option<Krakatau> {
		const KRAKATAU_HOME: &str = "KRAKATAU_HOME";

		std::env::var_os(KRAKATAU_HOME)
			.map(|home| {
				let home = PathBuf::from(home);
				trace!("located Krakatau via env var as {home:?}");
				Krakatau::new(python, home)
			})
	}

	pub(crate) fn home(&self) -> &Path {
		&self.home
	}

	fn script(&self, name: &str) -> PathBuf {
		self.home.join(name)
	}

	/// Clones Krakatau if there's nothing at its home yet.
	pub(crate) fn ensure_present(&self) -> Result<()> {
		if self.script("disassemble.py").is_file() && self.script("assemble.py").is_file() {
			info!("Krakatau is at {:?}", self.home);
			return Ok(());
		}
		if self.home.exists() {
			bail!("{:?} exists, but doesn't contain the Krakatau scripts", self.home);
		}

		info!("cloning Krakatau into {:?}", self.home);
		launch::run(&mut self.clone_command())
			.context("failed to clone Krakatau")
	}

	fn clone_command(&self) -> Command {
		let mut command = Command::new("git");
		command
			.args(["clone", "--depth", "1", "--branch", BRANCH, REPOSITORY])
			.arg(&self.home);
		command
	}

	fn disassemble_command(&self, jar: &Path, class_entry: &str, out: &Path) -> Command {
		let mut command = Command::new(&self.python);
		command
			.arg(self.script("disassemble.py"))
			.arg("-roundtrip")
			.arg("-out").arg(out)
			.arg("-path").arg(jar)
			.arg(class_entry);
		command
	}

	fn assemble_command(&self, source: &Path, out: &Path) -> Command {
		let mut command = Command::new(&self.python);
		command
			.arg(self.script("assemble.py"))
			.arg("-out").arg(out)
			.arg(source);
		command
	}

	/// Disassembles the class `class_name` (like `org/example/Main`) from the jar into the directory `out`.
	///
	/// Returns the path of the written `.j` file.
	pub(crate) fn disassemble(&self, jar: &Path, class_name: &str, out: &Path) -> Result<PathBuf> {
		let class_entry = format!("{class_name}.class");
		launch::run(&mut self.disassemble_command(jar, &class_entry, out))
			.with_context(|| anyhow!("failed to disassemble {class_entry:?} from {jar:?}"))?;

		let source = out.join(format!("{class_name}.j"));
		if !source.is_file() {
			bail!("disassembler didn't write {source:?}");
		}
		Ok(source)
	}

	/// Assembles the `.j` file `source` into the directory `out`.
	///
	/// Returns the path of the written class file for `class_name`.
	pub(crate) fn assemble(&self, source: &Path, class_name: &str, out: &Path) -> Result<PathBuf> {
		launch::run(&mut self.assemble_command(source, out))
			.with_context(|| anyhow!("failed to assemble {source:?}"))?;

		let class_file = out.join(format!("{class_name}.class"));
		if !class_file.is_file() {
			bail!("assembler didn't write {class_file:?}");
		}
		Ok(class_file)
	}
}
