/*!
Error types.

Only opening a file-backed dictionary for the first time can fail in a
way callers must handle — every other file operation (a stale refresh,
an append, a rewrite-on-remove) is logged and skipped rather than
propagated, matching the warn-and-continue policy a personal word list
is expected to follow once it's up and running.
*/

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
  #[error("failed to open personal word list at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}
