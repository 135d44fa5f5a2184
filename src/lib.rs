/*!
A file-backed personal word list with approximate-match suggestions.

A [`Dictionary`] is a set of words — typically ones a spell checker's
main dictionary doesn't know about — stored internally as a compressed
trie over NFD-normalized code-point sequences. Membership queries
([`Dictionary::check`]) additionally try title-case and all-caps
variants of a query, and [`Dictionary::suggest`] walks the trie with a
bounded number of insertions, deletions, substitutions, and adjacent
transpositions to propose corrections ranked by edit distance.

When constructed with [`Dictionary::with_file`], the list is backed by a
plain-text file (one word per line, `#`-prefixed lines ignored) that is
transparently reloaded whenever it changes on disk, and kept in sync as
words are added or removed.
*/

mod case_folding;
mod dictionary;
mod edit_distance;
mod error;
mod matcher;
mod suggestion_buffer;
mod trie;

pub use dictionary::Dictionary;
pub use error::DictionaryError;

/// The matcher's error ceiling when no prior suggestions are supplied
/// to [`Dictionary::suggest`], and the hard cap applied regardless of
/// how loose a ceiling prior suggestions would otherwise imply.
pub const MAX_SUGGESTION_ERRORS: u32 = 3;

/// The maximum number of suggestions [`Dictionary::suggest`] returns.
pub const MAX_SUGGESTIONS: usize = suggestion_buffer::CAPACITY;

/// Lines in a backing file longer than this are logged and ignored
/// rather than read as a word.
pub const MAX_LINE_LENGTH: usize = 8 * 1024;
