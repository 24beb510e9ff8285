//! Writing the merged list.

use std::fs;
use std::path::Path;

use log::info;

use crate::aggregate::Aggregate;
use crate::error::{Error, Result};

/// Render entries sorted, one per line, each line newline-terminated.
pub fn render(aggregate: &Aggregate) -> String {
    let mut out = String::new();
    for entry in aggregate.snapshot() {
        out.push_str(entry);
        out.push('\n');
    }
    out
}

/// Overwrite `path` with the rendered aggregate and return the entry count.
///
/// An empty aggregate is never written; callers get [`Error::EmptyOutput`]
/// and any previous file is left alone.
pub fn write_output(path: impl AsRef<Path>, aggregate: &Aggregate) -> Result<usize> {
    let path = path.as_ref();
    if aggregate.is_empty() {
        return Err(Error::EmptyOutput {
            path: path.to_path_buf(),
        });
    }
    fs::write(path, render(aggregate)).map_err(|source| Error::Output {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Successfully wrote {} configurations to {}", aggregate.len(), path.display());
    Ok(aggregate.len())
}
