// SPDX-License-Identifier: MIT OR Apache-2.0

//! Index the entries of a binary cache zip archive.

use std::io::Cursor;
use zip::ZipArchive;

use crate::blob::FetchError;
use crate::database::{Database, PackageId};

/// Records for every file entry of `bytes`, owned by `package`.
///
/// Nothing is returned for an archive that fails part way through.
pub fn index_archive(package: &PackageId, bytes: &[u8]) -> Result<Database, FetchError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut database = Database::new();
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        if entry.is_dir() {
            continue;
        }
        database.push(package, &installed_path(entry.name()));
    }
    Ok(database)
}

/// `include\zlib.h` -> `/include/zlib.h`
pub fn installed_path(entry_name: &str) -> String {
    format!("/{}", entry_name.replace('\\', "/"))
}
