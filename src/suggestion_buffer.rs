/*!
A bounded, best-error-first collection of suggestions.

Holds at most [`CAPACITY`] candidates, ordered by ascending error count,
with duplicates rejected. Once full, the buffer's worst entry sets the
ceiling that the matcher is told to stay within — and every subsequent
insertion tightens that ceiling further, which is what lets the search
prune so aggressively once a handful of close candidates are in hand.
*/

pub(crate) const CAPACITY: usize = 15;

#[derive(Debug, Clone)]
struct Entry {
  candidate: String,
  errors: u32,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SuggestionBuffer {
  entries: Vec<Entry>,
}

impl SuggestionBuffer {
  pub(crate) fn new() -> SuggestionBuffer {
    SuggestionBuffer {
      entries: Vec::with_capacity(CAPACITY),
    }
  }

  /// The ceiling candidates should be screened against before even being
  /// proposed: once the buffer is full, nothing worse than its current
  /// worst entry can possibly earn a place.
  pub(crate) fn ceiling(&self) -> u32 {
    if self.entries.len() < CAPACITY {
      u32::MAX
    } else {
      self.entries.last().map(|e| e.errors).unwrap_or(u32::MAX)
    }
  }

  /// Offers `candidate` with the given error count. Returns the tighter
  /// ceiling to use for the rest of the search, if any — i.e. `Some`
  /// whenever the candidate was actually inserted, carrying its own
  /// error count rather than whatever the buffer's worst entry happens
  /// to be, so the search narrows to at least as good as the best
  /// candidate found so far.
  pub(crate) fn offer(&mut self, candidate: String, errors: u32) -> Option<u32> {
    if errors >= self.ceiling() && self.entries.len() >= CAPACITY {
      return None;
    }

    let pos = self
      .entries
      .iter()
      .position(|e| e.errors > errors)
      .unwrap_or(self.entries.len());

    // Only a tie-or-better existing entry (i.e. one before `pos`) should
    // block this candidate as a duplicate. A stale, strictly-worse entry
    // for the same candidate may still sit at or after `pos` — that one
    // gets superseded below rather than treated as a reason to discard.
    if self.entries[..pos].iter().any(|e| e.candidate == candidate) {
      return None;
    }

    if pos >= CAPACITY {
      return None;
    }

    self.entries.retain(|e| e.candidate != candidate);
    self.entries.insert(pos, Entry { candidate, errors });
    self.entries.truncate(CAPACITY);

    Some(errors)
  }

  pub(crate) fn into_words(self) -> Vec<String> {
    self.entries.into_iter().map(|e| e.candidate).collect()
  }
}
