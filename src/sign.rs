use std::path::Path;
use std::process::Command;
use anyhow::{anyhow, Context, Result};
use log::info;
use crate::launch;

const ALIAS: &str = "alias1";
const PASSWORD: &str = "password";
const DISTINGUISHED_NAME: &str = "CN=, OU=, O=, L=, S=, C=";

fn keytool_command(keystore: &Path) -> Command {
	let mut command = Command::new("keytool");
	command
		.args(["-genkey", "-noprompt", "-keyalg", "RSA", "-alias", ALIAS, "-dname", DISTINGUISHED_NAME])
		.arg("-keystore").arg(keystore)
		.args(["-storepass", PASSWORD, "-keypass", PASSWORD]);
	command
}

fn jarsigner_command(jar: &Path, keystore: &Path) -> Command {
	let mut command = Command::new("jarsigner");
	command
		.arg(jar)
		.arg(ALIAS)
		.arg("-keystore").arg(keystore)
		.args(["-storepass", PASSWORD, "-keypass", PASSWORD]);
	command
}

/// Signs the jar in place with a fresh self signed key.
///
/// The key is stored in a new keystore at `keystore`, which must not exist yet.
pub(crate) fn sign_jar(jar: &Path, keystore: &Path) -> Result<()> {
	info!("generating key in {keystore:?}");
	launch::run(&mut keytool_command(keystore))
		.context("failed to generate signing key")?;

	info!("signing {jar:?}");
	launch::run(&mut jarsigner_command(jar, keystore))
		.with_context(|| anyhow!("failed to sign {jar:?}"))
}

#[cfg(test)]
mod testing {
	use std::path::Path;
	use pretty_assertions::assert_eq;
	use crate::launch::describe;

	#[test]
	fn keytool_command() {
		let command = super::keytool_command(Path::new("workdir/keystore"));
		assert_eq!(
			describe(&command),
			"keytool -genkey -noprompt -keyalg RSA -alias alias1 -dname CN=, OU=, O=, L=, S=, C= \
			-keystore workdir/keystore -storepass password -keypass password"
		);
	}

	#[test]
	fn jarsigner_command() {
		let command = super::jarsigner_command(Path::new("workdir/signed.jar"), Path::new("workdir/keystore"));
		assert_eq!(
			describe(&command),
			"jarsigner workdir/signed.jar alias1 -keystore workdir/keystore -storepass password -keypass password"
		);
	}
}
