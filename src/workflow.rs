//! The steps from an input jar to the patched (and signed) output jar.
//!
//! All intermediate files are kept in the working directory, which is cleared at the start of each run:
//! ```txt
//! workdir/
//! ├── disassembled/<class>.j
//! ├── patched/<class>.j
//! ├── assembled/<class>.class
//! ├── patched.jar
//! └── keystore
//! ```

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, bail, Context, Result};
use log::info;
use jir::Patch;
use crate::jar;
use crate::krakatau::Krakatau;
use crate::sign;

pub(crate) const DEFAULT_CLASS: &str = "org/tlauncher/tlauncher/minecraft/auth/Account";
pub(crate) const DEFAULT_METHOD: &str = "isPremiumAccount";

#[derive(Debug)]
pub(crate) struct JarPatch {
	pub(crate) input: PathBuf,
	pub(crate) output: PathBuf,
	/// The class in internal form, like `org/example/Main`.
	pub(crate) class_name: String,
	pub(crate) patch: Patch,
	pub(crate) workdir: PathBuf,
	pub(crate) krakatau: Krakatau,
	pub(crate) sign: bool,
}

fn class_entry(class_name: &str) -> String {
	format!("{class_name}.class")
}

fn source_path(dir: &Path, class_name: &str) -> PathBuf {
	dir.join(format!("{class_name}.j"))
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)
			.with_context(|| anyhow!("failed to create directory {parent:?}"))?;
	}
	let mut file = File::create(path)
		.with_context(|| anyhow!("failed to create file {path:?}"))?;
	file.write_all(data)
		.with_context(|| anyhow!("failed to write file {path:?}"))
}

/// Removes everything inside `dir`, and creates it if it doesn't exist.
pub(crate) fn clear_dir(dir: &Path) -> Result<()> {
	if dir.exists() {
		std::fs::remove_dir_all(dir)
			.with_context(|| anyhow!("failed to remove {dir:?}"))?;
	}
	std::fs::create_dir_all(dir)
		.with_context(|| anyhow!("failed to create {dir:?}"))
}

/// Makes `path` absolute, resolving symlinks as far as the path exists.
fn resolve(path: &Path) -> Result<PathBuf> {
	if path.exists() {
		return path.canonicalize()
			.with_context(|| anyhow!("failed to resolve {path:?}"));
	}

	let absolute = if path.is_absolute() {
		path.to_owned()
	} else {
		std::env::current_dir()
			.context("failed to get the current directory")?
			.join(path)
	};

	match (absolute.parent(), absolute.file_name()) {
		(Some(parent), Some(name)) => Ok(resolve(parent)?.join(name)),
		_ => Ok(absolute),
	}
}

/// Reads the `.j` file at `source`, patches it and writes it to `target`.
pub(crate) fn patch_file(patch: &Patch, source: &Path, target: &Path) -> Result<()> {
	let input = std::fs::read_to_string(source)
		.with_context(|| anyhow!("failed to read {source:?}"))?;

	let output = patch.apply_str(&input)
		.with_context(|| anyhow!("failed to patch method {:?} in {source:?}", patch.target_name()))?;

	write_file(target, output.as_bytes())
}

impl JarPatch {
	/// Fails if clearing the working directory would remove the current directory, or any of the paths given.
	fn check_workdir(&self) -> Result<()> {
		let workdir = resolve(&self.workdir)?;

		let current_dir = std::env::current_dir()
			.context("failed to get the current directory")?;
		if resolve(&current_dir)?.starts_with(&workdir) {
			bail!("working directory {:?} contains the current directory, refusing to clear it", self.workdir);
		}

		for (what, path) in [("input", self.input.as_path()), ("output", self.output.as_path()), ("Krakatau", self.krakatau.home())] {
			if resolve(path)?.starts_with(&workdir) {
				bail!("{what} {path:?} is inside the working directory {:?}, which gets cleared", self.workdir);
			}
		}
		Ok(())
	}

	pub(crate) fn run(&self) -> Result<()> {
		let workdir = &self.workdir;
		let class_entry = class_entry(&self.class_name);

		self.check_workdir()?;

		self.krakatau.ensure_present()?;

		info!("clearing working directory {workdir:?}");
		clear_dir(workdir)?;

		// Krakatau reads the class from the jar itself
		jar::ensure_entry(&self.input, &class_entry)?;

		info!("disassembling {:?}", self.class_name);
		let disassembled = self.krakatau.disassemble(&self.input, &self.class_name, &workdir.join("disassembled"))?;

		info!("patching method {:?}", self.patch.target_name());
		let patched = source_path(&workdir.join("patched"), &self.class_name);
		patch_file(&self.patch, &disassembled, &patched)?;

		info!("assembling {patched:?}");
		let assembled = self.krakatau.assemble(&patched, &self.class_name, &workdir.join("assembled"))?;
		let class = std::fs::read(&assembled)
			.with_context(|| anyhow!("failed to read assembled class {assembled:?}"))?;

		info!("repackaging {:?}", self.input);
		let jar = workdir.join("patched.jar");
		jar::repackage_file(&self.input, &jar, &class_entry, &class)?;

		if self.sign {
			sign::sign_jar(&jar, &workdir.join("keystore"))?;
		} else {
			info!("not signing the jar");
		}

		std::fs::copy(&jar, &self.output)
			.with_context(|| anyhow!("failed to copy {jar:?} to {:?}", self.output))?;
		info!("wrote {:?}", self.output);
		Ok(())
	}
}

/// Patches a single `.j` file, writing the result to `output`, or to stdout if there's none.
pub(crate) fn patch_ir(patch: &Patch, input: &Path, output: Option<&Path>) -> Result<()> {
	match output {
		Some(output) => {
			patch_file(patch, input, output)?;
			info!("wrote {output:?}");
			Ok(())
		},
		None => {
			let input_data = std::fs::read_to_string(input)
				.with_context(|| anyhow!("failed to read {input:?}"))?;
			let output_data = patch.apply_str(&input_data)
				.with_context(|| anyhow!("failed to patch method {:?} in {input:?}", patch.target_name()))?;

			let mut stdout = std::io::stdout().lock();
			stdout.write_all(output_data.as_bytes())
				.and_then(|()| stdout.flush())
				.context("failed to write the patched file to stdout")
		},
	}
}

#[cfg(test)]
mod testing {
	use std::path::{Path, PathBuf};
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use jir::Patch;
	use crate::krakatau::Krakatau;
	use crate::workflow::JarPatch;

	const INPUT: &str = concat!(
		".method public [1] : [2] \n",
		"    .attribute [3] .code stack 1 locals 1 \n",
		"L0:     aload_0 \n",
		"L1:     getfield [4] \n",
		"L4:     ireturn \n",
		"    .end code \n",
		".end method \n",
		".const [1] = Utf8 isPremiumAccount \n",
		".const [2] = Utf8 ()Z \n",
	);

	/// A fresh, empty directory for a single test.
	fn test_dir(name: &str) -> Result<PathBuf> {
		let dir = std::env::temp_dir().join(format!("jarpatch-{}-{name}", std::process::id()));
		super::clear_dir(&dir)?;
		Ok(dir)
	}

	fn jar_patch(dir: &Path, input: PathBuf, output: PathBuf, krakatau: PathBuf) -> JarPatch {
		JarPatch {
			input,
			output,
			class_name: super::DEFAULT_CLASS.to_owned(),
			patch: Patch::return_true(super::DEFAULT_METHOD),
			workdir: dir.join("work"),
			krakatau: Krakatau::new("python", krakatau),
			sign: false,
		}
	}

	#[test]
	fn paths() {
		assert_eq!(super::class_entry(super::DEFAULT_CLASS), "org/tlauncher/tlauncher/minecraft/auth/Account.class");
		assert_eq!(
			super::source_path(Path::new("workdir/patched"), "a/b/C"),
			Path::new("workdir/patched/a/b/C.j")
		);
	}

	#[test]
	fn input_inside_workdir_is_kept() -> Result<()> {
		let dir = test_dir("input-inside-workdir")?;
		let krakatau = dir.join("Krakatau");
		std::fs::create_dir_all(&krakatau)?;
		std::fs::write(krakatau.join("disassemble.py"), "")?;
		std::fs::write(krakatau.join("assemble.py"), "")?;
		std::fs::create_dir_all(dir.join("work"))?;
		let input = dir.join("work").join("in.jar");
		std::fs::write(&input, "precious")?;

		let result = jar_patch(&dir, input.clone(), dir.join("out.jar"), krakatau).run();

		assert!(result.is_err());
		assert_eq!(std::fs::read_to_string(&input)?, "precious");
		Ok(())
	}

	#[test]
	fn paths_inside_workdir_are_refused() -> Result<()> {
		let dir = test_dir("paths-inside-workdir")?;
		let input = dir.join("in.jar");
		std::fs::write(&input, "")?;

		let outside = jar_patch(&dir, input.clone(), dir.join("out.jar"), dir.join("Krakatau"));
		assert!(outside.check_workdir().is_ok());

		// doesn't exist yet, but would be cleared on the next run
		let output = jar_patch(&dir, input.clone(), dir.join("work").join("out").join("out.jar"), dir.join("Krakatau"));
		assert!(output.check_workdir().is_err());

		let krakatau = jar_patch(&dir, input.clone(), dir.join("out.jar"), dir.join("work").join("Krakatau"));
		assert!(krakatau.check_workdir().is_err());

		let mut current = jar_patch(&dir, input, dir.join("out.jar"), dir.join("Krakatau"));
		current.workdir = PathBuf::from(".");
		assert!(current.check_workdir().is_err());
		current.workdir = std::env::current_dir()?.join("..");
		assert!(current.check_workdir().is_err());
		Ok(())
	}

	#[test]
	fn patch_file() -> Result<()> {
		let dir = test_dir("patch-file")?;
		let source = dir.join("Account.j");
		std::fs::write(&source, INPUT)?;
		let target = dir.join("patched").join("Account.j");

		super::patch_file(&Patch::return_true("isPremiumAccount"), &source, &target)?;

		assert_eq!(std::fs::read_to_string(&target)?, INPUT.replace("L0:     aload_0 \nL1:     getfield [4] \n", "L0:     iconst_1 \n"));
		Ok(())
	}

	#[test]
	fn failed_patch_writes_nothing() -> Result<()> {
		let dir = test_dir("failed-patch")?;
		let source = dir.join("Account.j");
		std::fs::write(&source, INPUT.replace("Utf8 isPremiumAccount", "Utf8 isFreeAccount"))?;
		let patch = Patch::return_true("isPremiumAccount");

		let target = dir.join("patched").join("Account.j");
		assert!(super::patch_file(&patch, &source, &target).is_err());
		assert!(!target.exists());

		let output = dir.join("out.j");
		assert!(super::patch_ir(&patch, &source, Some(output.as_path())).is_err());
		assert!(!output.exists());
		Ok(())
	}
}
