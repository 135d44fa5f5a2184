/*!
The public personal word list.

A [`Dictionary`] pairs a [`Trie`] of NFD-normalized words with a map back
to each word's original "display" spelling, and optionally a backing
file that is re-read whenever its modification time moves forward.
*/

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use unicode_normalization::UnicodeNormalization;

use crate::case_folding;
use crate::edit_distance;
use crate::error::DictionaryError;
use crate::matcher::{self, CaseMode};
use crate::suggestion_buffer::SuggestionBuffer;
use crate::trie::Trie;
use crate::{MAX_LINE_LENGTH, MAX_SUGGESTION_ERRORS};

/// A personal word list: a growable set of known-good words, queryable
/// for membership and for approximate-match suggestions.
pub struct Dictionary {
  trie: Trie,
  filename: Option<PathBuf>,
  file_changed: Option<SystemTime>,
  /// Maps each word's NFD-normalized form to the spelling it was
  /// originally added with — first insertion wins.
  words_in_trie: HashMap<String, String>,
}

impl Default for Dictionary {
  fn default() -> Dictionary {
    Dictionary::new()
  }
}

impl Dictionary {
  /// Creates an empty, in-memory-only dictionary.
  pub fn new() -> Dictionary {
    Dictionary {
      trie: Trie::empty(),
      filename: None,
      file_changed: None,
      words_in_trie: HashMap::new(),
    }
  }

  /// Opens (creating if necessary) a file-backed dictionary and loads
  /// its current contents. The file is re-read automatically whenever
  /// its modification time advances past what was last seen.
  pub fn with_file(path: impl AsRef<Path>) -> Result<Dictionary, DictionaryError> {
    let path = path.as_ref();
    OpenOptions::new()
      .create(true)
      .append(true)
      .open(path)
      .map_err(|source| DictionaryError::Io {
        path: path.to_path_buf(),
        source,
      })?;

    let mut dict = Dictionary {
      trie: Trie::empty(),
      filename: Some(path.to_path_buf()),
      file_changed: None,
      words_in_trie: HashMap::new(),
    };
    dict.refresh();
    Ok(dict)
  }

  /// True iff `word` is spelled correctly: present verbatim, or — when
  /// `word` is title-cased or all-caps — present in a case that a
  /// human would consider the same word.
  pub fn check(&mut self, word: &str) -> bool {
    self.refresh();

    if self.contains(word) {
      return true;
    }

    let is_title = case_folding::is_title_case(word);
    // Mirrors the reference implementation's short-circuit: a title-case
    // word is never also treated as all-caps, even a single letter that
    // technically satisfies both predicates.
    let is_caps = if is_title {
      false
    } else {
      case_folding::is_all_caps(word)
    };

    if is_title || is_caps {
      let lower = word.to_lowercase();
      if self.contains(&lower) {
        return true;
      }
      if is_caps {
        let title = case_folding::to_title(word);
        if self.contains(&title) {
          return true;
        }
      }
    }

    false
  }

  /// Adds `word`, appending it to the backing file if there is one.
  pub fn add(&mut self, word: &str) {
    self.refresh();
    self.add_to_trie(word);

    let Some(path) = self.filename.clone() else {
      return;
    };
    if let Err(err) = self.append_to_file(&path, word) {
      log::warn!("failed to append {word:?} to personal word list {path:?}: {err}");
    }
  }

  /// Removes `word`, rewriting the backing file without its line if
  /// there is one. A no-op if `word` (in any case form [`check`] would
  /// accept) isn't currently known.
  pub fn remove(&mut self, word: &str) {
    if !self.check(word) {
      return;
    }
    self.refresh();
    self.remove_from_trie(word);

    let Some(path) = self.filename.clone() else {
      return;
    };
    if let Err(err) = self.rewrite_file_without(&path, word) {
      log::warn!("failed to rewrite personal word list {path:?} while removing {word:?}: {err}");
    }
  }

  /// Suggests corrections for `word`, best edit-distance first. When
  /// `prior_suggestions` is non-empty, the search is seeded with a
  /// ceiling no worse than the best distance already achieved among
  /// them, so this dictionary contributes only suggestions at least as
  /// good as what's already on offer.
  pub fn suggest(&mut self, word: &str, prior_suggestions: &[String]) -> Vec<String> {
    self.refresh();

    let normalized_word: Vec<char> = normalize(word).chars().collect();
    let ceiling = if prior_suggestions.is_empty() {
      MAX_SUGGESTION_ERRORS
    } else {
      best_distance(prior_suggestions, &normalized_word).min(MAX_SUGGESTION_ERRORS)
    };

    let normalized_word: String = normalized_word.into_iter().collect();
    let mut buffer = SuggestionBuffer::new();
    matcher::find_matches(
      &self.trie,
      &normalized_word,
      ceiling,
      CaseMode::Insensitive,
      &mut |candidate, errors| buffer.offer(candidate, errors),
    );

    let mut suggestions = buffer.into_words();
    self.case_and_denormalize(word, &mut suggestions);
    suggestions
  }

  fn contains(&self, word: &str) -> bool {
    let normalized = normalize(word);
    let mut found = false;
    matcher::find_matches(&self.trie, &normalized, 0, CaseMode::Sensitive, &mut |_, _| {
      found = true;
      None
    });
    found
  }

  fn add_to_trie(&mut self, word: &str) {
    let normalized = normalize(word);
    if self.words_in_trie.contains_key(&normalized) {
      return;
    }
    self.words_in_trie.insert(normalized.clone(), word.to_string());
    self.trie.insert(&normalized);
  }

  fn remove_from_trie(&mut self, word: &str) {
    let normalized = normalize(word);
    if self.words_in_trie.remove(&normalized).is_some() {
      self.trie.remove(&normalized);
    }
  }

  /// Re-casings applied to each normalized trie match before handing
  /// suggestions back to the caller: look up the original display
  /// spelling, then re-case it to match `word`'s casing, unless the
  /// display spelling is itself all-caps (an acronym is never re-cased).
  fn case_and_denormalize(&self, word: &str, suggestions: &mut [String]) {
    let is_title = case_folding::is_title_case(word);
    let is_caps = if is_title {
      false
    } else {
      case_folding::is_all_caps(word)
    };

    for candidate in suggestions.iter_mut() {
      let display = self
        .words_in_trie
        .get(candidate.as_str())
        .cloned()
        .unwrap_or_else(|| candidate.clone());

      *candidate = if (is_title || is_caps) && !case_folding::is_all_caps(&display) {
        if is_title {
          case_folding::to_title(&display)
        } else {
          display.to_uppercase()
        }
      } else {
        display
      };
    }
  }

  fn refresh(&mut self) {
    let Some(path) = self.filename.clone() else {
      return;
    };

    let mtime = match fs::metadata(&path).and_then(|m| m.modified()) {
      Ok(mtime) => mtime,
      Err(_) => return,
    };
    if self.file_changed == Some(mtime) {
      return;
    }

    self.trie = Trie::empty();
    self.words_in_trie.clear();

    let file = match File::open(&path) {
      Ok(file) => file,
      Err(_) => return,
    };
    self.file_changed = Some(mtime);

    let mut reader = BufReader::new(file);
    let mut line_number: u64 = 1;
    loop {
      let mut raw = Vec::new();
      match reader.read_until(b'\n', &mut raw) {
        Ok(0) => break,
        Ok(_) => {}
        Err(_) => break,
      }

      if raw.last() == Some(&b'\n') {
        raw.pop();
        if raw.last() == Some(&b'\r') {
          raw.pop();
        }
      }

      if raw.len() > MAX_LINE_LENGTH {
        log::warn!("line too long (ignored) in {} at line {line_number}", path.display());
        line_number += 1;
        continue;
      }

      let mut text = match String::from_utf8(raw) {
        Ok(text) => text,
        Err(_) => {
          log::warn!("bad UTF-8 sequence in {} at line {line_number}", path.display());
          line_number += 1;
          continue;
        }
      };

      if line_number == 1 {
        if let Some(stripped) = text.strip_prefix('\u{feff}') {
          text = stripped.to_string();
        }
      }

      let trimmed = text.trim_end();
      if !trimmed.is_empty() && !trimmed.starts_with('#') {
        self.add_to_trie(trimmed);
      }

      line_number += 1;
    }
  }

  fn append_to_file(&mut self, path: &Path, word: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().read(true).append(true).open(path)?;

    let len = file.metadata()?.len();
    let needs_newline = if len == 0 {
      false
    } else {
      file.seek(SeekFrom::End(-1))?;
      let mut last = [0u8; 1];
      file.read_exact(&mut last)?;
      last[0] != b'\n'
    };

    if let Ok(stats) = fs::metadata(path) {
      if let Ok(mtime) = stats.modified() {
        self.file_changed = Some(mtime);
      }
    }

    if needs_newline {
      file.write_all(b"\n")?;
    }
    file.write_all(word.as_bytes())?;
    file.write_all(b"\n")?;

    if let Ok(mtime) = fs::metadata(path).and_then(|m| m.modified()) {
      self.file_changed = Some(mtime);
    }
    Ok(())
  }

  fn rewrite_file_without(&mut self, path: &Path, word: &str) -> std::io::Result<()> {
    let contents = fs::read(path)?;

    const BOM: &[u8] = b"\xef\xbb\xbf";
    let (mut out, body) = if contents.starts_with(BOM) {
      (BOM.to_vec(), &contents[BOM.len()..])
    } else {
      (Vec::with_capacity(contents.len()), &contents[..])
    };

    let needle = word.as_bytes();
    let mut search_from = 0usize;
    loop {
      match find_subslice(&body[search_from..], needle) {
        None => {
          out.extend_from_slice(&body[search_from..]);
          break;
        }
        Some(offset) => {
          let needle_start = search_from + offset;
          let needle_end = needle_start + needle.len();
          let preceded_by_boundary =
            needle_start == 0 || matches!(body[needle_start - 1], b'\n' | b'\r');
          let followed_by_boundary =
            needle_end == body.len() || matches!(body[needle_end], b'\n' | b'\r');

          if preceded_by_boundary && followed_by_boundary {
            out.extend_from_slice(&body[search_from..needle_start]);
            let mut rest = needle_end;
            while rest < body.len() && matches!(body[rest], b'\n' | b'\r') {
              rest += 1;
            }
            search_from = rest;
          } else {
            out.extend_from_slice(&body[search_from..needle_start + 1]);
            search_from = needle_start + 1;
          }
        }
      }
    }

    fs::write(path, &out)?;
    if let Ok(mtime) = fs::metadata(path).and_then(|m| m.modified()) {
      self.file_changed = Some(mtime);
    }
    Ok(())
  }
}

fn normalize(word: &str) -> String {
  word.nfd().collect()
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
  if needle.is_empty() || needle.len() > haystack.len() {
    return None;
  }
  haystack.windows(needle.len()).position(|w| w == needle)
}

fn best_distance(suggestions: &[String], normalized_word: &[char]) -> u32 {
  let mut best = normalized_word.len() as u32;
  for sugg in suggestions {
    let normalized_sugg: Vec<char> = normalize(sugg).chars().collect();
    let dist = edit_distance::distance(normalized_word, &normalized_sugg) as u32;
    best = best.min(dist);
  }
  best
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write as _;
  use tempfile::NamedTempFile;

  #[test]
  fn new_dictionary_knows_nothing() {
    let mut dict = Dictionary::new();
    assert!(!dict.check("hello"));
  }

  #[test]
  fn add_then_check_succeeds() {
    let mut dict = Dictionary::new();
    dict.add("hello");
    assert!(dict.check("hello"));
  }

  #[test]
  fn check_accepts_title_and_caps_variants() {
    let mut dict = Dictionary::new();
    dict.add("hello");
    assert!(dict.check("Hello"));
    assert!(dict.check("HELLO"));
  }

  #[test]
  fn check_does_not_invent_case_variants_for_mixed_case_words() {
    let mut dict = Dictionary::new();
    dict.add("hello");
    assert!(!dict.check("hELLo"));
  }

  #[test]
  fn remove_deletes_an_added_word() {
    let mut dict = Dictionary::new();
    dict.add("hello");
    dict.remove("hello");
    assert!(!dict.check("hello"));
  }

  #[test]
  fn remove_of_absent_word_is_a_no_op() {
    let mut dict = Dictionary::new();
    dict.add("hello");
    dict.remove("world");
    assert!(dict.check("hello"));
  }

  #[test]
  fn remove_of_a_different_case_form_does_not_remove_the_stored_word() {
    // Mirrors the reference implementation: `check` can succeed via a
    // case-folded match, but removal only ever acts on the exact,
    // normalized form that was actually stored.
    let mut dict = Dictionary::new();
    dict.add("hello");
    dict.remove("Hello");
    assert!(dict.check("hello"));
  }

  #[test]
  fn suggest_offers_close_words() {
    let mut dict = Dictionary::new();
    dict.add("hello");
    dict.add("help");
    let suggestions = dict.suggest("helo", &[]);
    assert!(suggestions.contains(&"hello".to_string()));
  }

  #[test]
  fn suggest_re_cases_to_match_the_query() {
    let mut dict = Dictionary::new();
    dict.add("hello");
    let suggestions = dict.suggest("HELO", &[]);
    assert!(suggestions.contains(&"HELLO".to_string()));
  }

  #[test]
  fn with_file_loads_existing_contents() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "hello").unwrap();
    writeln!(file, "# a comment").unwrap();
    writeln!(file, "world").unwrap();

    let mut dict = Dictionary::with_file(file.path()).unwrap();
    assert!(dict.check("hello"));
    assert!(dict.check("world"));
    assert!(!dict.check("# a comment"));
  }

  #[test]
  fn with_file_creates_a_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new_words.txt");
    let mut dict = Dictionary::with_file(&path).unwrap();
    assert!(path.exists());
    assert!(!dict.check("hello"));
  }

  #[test]
  fn add_persists_to_the_backing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.txt");
    let mut dict = Dictionary::with_file(&path).unwrap();
    dict.add("hello");

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.lines().any(|line| line == "hello"));
  }

  #[test]
  fn remove_rewrites_the_backing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.txt");
    let mut dict = Dictionary::with_file(&path).unwrap();
    dict.add("hello");
    dict.add("world");
    dict.remove("hello");

    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.lines().any(|line| line == "hello"));
    assert!(contents.lines().any(|line| line == "world"));
  }

  #[test]
  fn a_second_dictionary_picks_up_changes_written_by_the_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.txt");
    let mut writer = Dictionary::with_file(&path).unwrap();
    writer.add("hello");

    let mut reader = Dictionary::with_file(&path).unwrap();
    assert!(reader.check("hello"));

    writer.add("world");
    reader.refresh();
    assert!(reader.check("world"));
  }
}
