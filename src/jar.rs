use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, trace};
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

/// Extensions of the files in `META-INF/` that make up a jar signature.
const SIGNATURE_EXTENSIONS: [&str; 4] = ["RSA", "SF", "DSA", "EC"];

/// Checks if the entry is part of a jar signature. The manifest itself is not.
pub(crate) fn is_signature_file(name: &str) -> bool {
	name.strip_prefix("META-INF/")
		.filter(|file_name| !file_name.contains('/'))
		.and_then(|file_name| file_name.rsplit_once('.'))
		.is_some_and(|(_, extension)| {
			SIGNATURE_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(extension))
		})
}

/// Reads the entry `name` from the zip. Gives `Ok(None)` if there's no such entry.
pub(crate) fn read_entry(reader: impl Read + Seek, name: &str) -> Result<Option<Vec<u8>>> {
	let mut zip = ZipArchive::new(reader)?;

	let mut file = match zip.by_name(name) {
		Ok(file) => file,
		Err(ZipError::FileNotFound) => return Ok(None),
		Err(e) => bail!("could not get file {name:?} from zip: {e}"),
	};

	let mut data = Vec::new();
	file.read_to_end(&mut data)
		.with_context(|| anyhow!("failed to read {name:?} from zip"))?;
	Ok(Some(data))
}

/// Writes a copy of the zip from `reader` to `writer`, with the entry `name` replaced by `data`.
///
/// All other entries are copied without recompressing them. The entries of the signature are left out, since the
/// signature doesn't match anymore.
pub(crate) fn repackage<W: Write + Seek>(reader: impl Read + Seek, writer: W, name: &str, data: &[u8]) -> Result<W> {
	let mut zip = ZipArchive::new(reader)?;
	let mut zip_out = ZipWriter::new(writer);

	let mut replaced = false;
	for index in 0..zip.len() {
		let file = zip.by_index_raw(index)?;

		if is_signature_file(file.name()) {
			debug!("dropping signature file {:?}", file.name());
		} else if file.name() == name {
			let options = FileOptions::<()>::default()
				.compression_method(file.compression());
			drop(file);

			trace!("replacing {name:?} with {} bytes", data.len());
			zip_out.start_file(name, options)?;
			zip_out.write_all(data)?;
			replaced = true;
		} else {
			zip_out.raw_copy_file(file)?;
		}
	}

	if !replaced {
		bail!("there's no entry {name:?} to replace");
	}

	Ok(zip_out.finish()?)
}

/// Checks that the jar at `path` has an entry `name`.
pub(crate) fn ensure_entry(path: &Path, name: &str) -> Result<()> {
	let file = File::open(path)
		.with_context(|| anyhow!("failed to open jar {path:?}"))?;

	read_entry(BufReader::new(file), name)
		.with_context(|| anyhow!("failed to read jar {path:?}"))?
		.with_context(|| anyhow!("jar {path:?} has no entry {name:?}"))?;
	Ok(())
}

/// Writes a copy of the jar at `input` to `output`, see [`repackage`].
pub(crate) fn repackage_file(input: &Path, output: &Path, name: &str, data: &[u8]) -> Result<()> {
	let reader = File::open(input)
		.with_context(|| anyhow!("failed to open jar {input:?}"))?;

	// the zip is built in memory, so that a failure doesn't leave a broken jar behind
	let vec = repackage(BufReader::new(reader), Cursor::new(Vec::new()), name, data)
		.with_context(|| anyhow!("failed to repackage {input:?}"))?
		.into_inner();

	let mut writer = BufWriter::new(File::create(output)
		.with_context(|| anyhow!("failed to create jar {output:?}"))?);
	writer.write_all(&vec)
		.and_then(|()| writer.flush())
		.with_context(|| anyhow!("failed to write jar {output:?}"))
}
