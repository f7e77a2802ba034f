//! Zip archive writer.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

use crate::PackageError;

/// Write named entries into a new archive.
///
/// Every parent directory of an entry gets its own record the first time it
/// is needed. Timestamps are left at the zip epoch so equal inputs give equal
/// archives.
pub(crate) fn write_archive<'a, I, B>(entries: I) -> Result<Vec<u8>, PackageError>
where
    I: IntoIterator<Item = (&'a str, B)>,
    B: AsRef<[u8]>,
{
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut directories: HashSet<&str> = HashSet::new();

    for (name, bytes) in entries {
        for dir in parent_dirs(name) {
            if directories.insert(dir) {
                writer.add_directory(dir, options)?;
            }
        }
        writer.start_file(name, options)?;
        writer
            .write_all(bytes.as_ref())
            .map_err(|source| PackageError::Entry {
                part: name.to_owned(),
                source,
            })?;
    }

    let cursor = writer.finish()?;
    tracing::debug!(
        directories = directories.len(),
        size = cursor.get_ref().len(),
        "Wrote package archive"
    );
    Ok(cursor.into_inner())
}

/// Parent directory paths of an entry name, outermost first, each ending in `/`.
fn parent_dirs(name: &str) -> impl Iterator<Item = &str> {
    name.match_indices('/')
        .map(|(index, _)| &name[..=index])
        .filter(|dir| *dir != "/" && !dir.ends_with("//"))
}
