use std::process::Command;
use anyhow::{anyhow, bail, Context, Result};
use log::{error, trace};

/// Formats a command the way it would be typed into a shell, without any quoting.
pub(crate) fn describe(command: &Command) -> String {
	std::iter::once(command.get_program())
		.chain(command.get_args())
		.map(|x| x.to_string_lossy())
		.collect::<Vec<_>>()
		.join(" ")
}

/// Runs the command to completion, inheriting stdout and stderr.
///
/// Returns `Err(_)` if the command couldn't be started, or if it exited with an error state.
pub(crate) fn run(command: &mut Command) -> Result<()> {
	let description = describe(command);
	trace!("run: {description}");

	let status = command.spawn()
		.with_context(|| anyhow!("failed to start {description:?}"))?
		.wait()
		.with_context(|| anyhow!("failed to wait for {description:?}"))?;

	if !status.success() {
		error!("{description:?} exited with error state {status:?}");
		bail!("{description:?} exited with error state {status}");
	}

	trace!("{description:?} exited with {status:?}");
	Ok(())
}

#[cfg(test)]
mod testing {
	use std::process::Command;
	use pretty_assertions::assert_eq;

	#[test]
	fn describe() {
		let mut command = Command::new("python");
		command.args(["Krakatau/assemble.py", "-out", "workdir/assembled"]);
		assert_eq!(super::describe(&command), "python Krakatau/assemble.py -out workdir/assembled");
	}

	#[cfg(unix)]
	#[test]
	fn run_checks_exit_status() {
		assert!(super::run(&mut Command::new("true")).is_ok());
		assert!(super::run(&mut Command::new("false")).is_err());
	}

	#[test]
	fn run_missing_program() {
		assert!(super::run(&mut Command::new("this-program-does-not-exist-jarpatch")).is_err());
	}
}
