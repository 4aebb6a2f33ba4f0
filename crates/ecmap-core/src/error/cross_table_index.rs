use super::Error;

/// Error when the properties of one index live in different tables.
#[derive(Debug)]
pub(super) struct CrossTableIndex {
    index: Box<str>,
    tables: Box<[Box<str>]>,
}

impl std::error::Error for CrossTableIndex {}

impl core::fmt::Display for CrossTableIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "index '{}' spans tables ", self.index)?;
        for (i, table) in self.tables.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{table}'")?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates a cross table index error.
    pub fn cross_table_index<I, S>(index: impl Into<String>, tables: I) -> Error
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Error::from(super::ErrorKind::CrossTableIndex(CrossTableIndex {
            index: index.into().into(),
            tables: tables
                .into_iter()
                .map(|table| table.into().into_boxed_str())
                .collect(),
        }))
    }

    /// Returns `true` if this error is a cross table index error.
    pub fn is_cross_table_index(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::CrossTableIndex(_))
    }
}
