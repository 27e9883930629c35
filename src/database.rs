// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory file-ownership database shared by both indexers.
//!
//! Records are kept as already-formatted `<identifier>:<path>` lines in
//! encounter order. Duplicates are preserved.

use std::fmt;

/// Paths under this prefix are also recorded in the headers database.
pub const INCLUDE_PREFIX: &str = "/include/";

/// Qualifier used for packages indexed from the binary cache.
pub const INSTALLED_QUALIFIER: &str = "installed";

/// Package identifier: `<name>:<qualifier>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageId {
    name: String,
    qualifier: String,
}

impl PackageId {
    pub fn new(name: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualifier: qualifier.into(),
        }
    }

    /// Identifier for a package installed from the binary cache.
    pub fn installed(name: impl Into<String>) -> Self {
        Self::new(name, INSTALLED_QUALIFIER)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.qualifier)
    }
}

/// Accumulated file and header records for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Database {
    files: Vec<String>,
    headers: Vec<String>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `package` owns `path`.
    ///
    /// `path` is expected to start with `/`. Paths under [`INCLUDE_PREFIX`]
    /// additionally produce a header record relative to the include root.
    pub fn push(&mut self, package: &PackageId, path: &str) {
        self.files.push(format!("{}:{}", package, path));
        if let Some(header) = path.strip_prefix(INCLUDE_PREFIX) {
            self.headers.push(format!("{}:{}", package, header));
        }
    }

    /// Append every record of `other`, keeping its order.
    pub fn extend(&mut self, other: Database) {
        self.files.extend(other.files);
        self.headers.extend(other.headers);
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_paths_produce_header_records() {
        let pkg = PackageId::new("zlib", "x64-windows");
        let mut db = Database::new();
        db.push(&pkg, "/share/zlib/copyright");
        db.push(&pkg, "/include/zlib.h");

        assert_eq!(
            db.files(),
            [
                "zlib:x64-windows:/share/zlib/copyright",
                "zlib:x64-windows:/include/zlib.h"
            ]
        );
        assert_eq!(db.headers(), ["zlib:x64-windows:zlib.h"]);
    }

    #[test]
    fn include_prefix_requires_leading_slash_and_trailing_separator() {
        let pkg = PackageId::installed("fmt");
        let mut db = Database::new();
        db.push(&pkg, "/includes/fmt.h");
        db.push(&pkg, "/lib/include/fmt.h");
        db.push(&pkg, "/include");

        assert_eq!(db.files().len(), 3);
        assert!(db.headers().is_empty());
    }

    #[test]
    fn duplicates_are_preserved_in_order() {
        let pkg = PackageId::installed("fmt");
        let mut db = Database::new();
        db.push(&pkg, "/include/fmt/core.h");
        db.push(&pkg, "/include/fmt/core.h");

        assert_eq!(db.files().len(), 2);
        assert_eq!(
            db.headers(),
            ["fmt:installed:fmt/core.h", "fmt:installed:fmt/core.h"]
        );
    }

    #[test]
    fn extend_appends_after_existing_records() {
        let mut first = Database::new();
        first.push(&PackageId::installed("a"), "/include/a.h");
        let mut second = Database::new();
        second.push(&PackageId::installed("b"), "/include/b.h");

        first.extend(second);
        assert_eq!(first.headers(), ["a:installed:a.h", "b:installed:b.h"]);
    }

    #[test]
    fn package_id_display_joins_with_colon() {
        assert_eq!(
            PackageId::installed("boost-asio").to_string(),
            "boost-asio:installed"
        );
    }
}
