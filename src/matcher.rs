/*!
Bounded approximate-match traversal over a [`Trie`](crate::trie::Trie).

The matcher descends the trie applying, at each branching node, the four
elementary edit operations against the current head of the input word —
exact advance, insertion, deletion/substitution, and adjacent
transposition — pruning any path whose running error count exceeds a
ceiling. Matches are reported through a callback that may tighten the
ceiling, which is what gives `Dictionary::suggest` its best-error-first
behavior (§4.5 of the design).

Recursion depth is bounded by `word_len + ceiling`, so the straightforward
recursive rendering below is acceptable; an explicit work-stack of
`(node, word_pos, errors)` frames would be the fallback on a
stack-constrained host.
*/

use crate::edit_distance;
use crate::trie::{Edge, EdgeKey, Node, Trie};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CaseMode {
  Sensitive,
  Insensitive,
}

/// Runs a bounded approximate-match search for `word` over `trie`,
/// invoking `on_match(candidate, errors)` for every match within
/// `ceiling` errors. A callback that returns `Some(n)` tightens the
/// ceiling to `n` for the remainder of the search (the matcher never
/// widens it, even if `n` happens to exceed the current ceiling).
pub(crate) fn find_matches(
  trie: &Trie,
  word: &str,
  ceiling: u32,
  mode: CaseMode,
  on_match: &mut impl FnMut(String, u32) -> Option<u32>,
) {
  let Some(root) = trie.root() else {
    return;
  };

  let chars: Vec<char> = match mode {
    CaseMode::Sensitive => word.chars().collect(),
    CaseMode::Insensitive => word.chars().flat_map(char::to_lowercase).collect(),
  };

  let mut search = Search {
    word: chars,
    path: Vec::new(),
    ceiling,
    mode,
    on_match,
  };
  search.visit_node(root, 0, 0);
}

struct Search<'a, F: FnMut(String, u32) -> Option<u32>> {
  word: Vec<char>,
  path: Vec<char>,
  ceiling: u32,
  mode: CaseMode,
  on_match: &'a mut F,
}

impl<F: FnMut(String, u32) -> Option<u32>> Search<'_, F> {
  fn report(&mut self, candidate: String, errors: u32) {
    if let Some(new_ceiling) = (self.on_match)(candidate, errors) {
      self.ceiling = self.ceiling.min(new_ceiling);
    }
  }

  fn remaining(&self, pos: usize) -> &[char] {
    if pos >= self.word.len() {
      &[]
    } else {
      &self.word[pos..]
    }
  }

  fn visit(&mut self, edge: &Edge, pos: usize, errors: u32) {
    if errors > self.ceiling {
      return;
    }
    match edge {
      Edge::End => {
        let remaining = self.word.len().saturating_sub(pos) as u32;
        let total = errors + remaining;
        if total <= self.ceiling {
          let candidate: String = self.path.iter().collect();
          self.report(candidate, total);
        }
      }
      Edge::Node(node) => self.visit_node(node, pos, errors),
    }
  }

  fn visit_node(&mut self, node: &Node, pos: usize, errors: u32) {
    if errors > self.ceiling {
      return;
    }
    match node {
      Node::Singleton(value) => {
        let value_chars: Vec<char> = match self.mode {
          CaseMode::Sensitive => value.chars().collect(),
          CaseMode::Insensitive => value.chars().flat_map(char::to_lowercase).collect(),
        };
        let total = errors + edit_distance::distance(&value_chars, self.remaining(pos)) as u32;
        if total <= self.ceiling {
          let mut candidate: String = self.path.iter().collect();
          candidate.push_str(value);
          self.report(candidate, total);
        }
      }
      Node::Branching(children) => self.visit_branching(children, pos, errors),
    }
  }

  fn visit_branching(&mut self, children: &HashMap<EdgeKey, Edge>, pos: usize, errors: u32) {
    if errors > self.ceiling {
      return;
    }

    let head: EdgeKey = self.word.get(pos).copied();

    // 1. Exact advance: match the current head (with a single-direction
    //    uppercase fold in case-insensitive mode) at no cost.
    if let Some((edge, matched_key)) = lookup_folded(children, head, self.mode) {
      if let Some(c) = matched_key {
        self.path.push(c);
      }
      self.visit(edge, pos + 1, errors);
      if matched_key.is_some() {
        self.path.pop();
      }
    }

    let errors = errors + 1;
    if errors > self.ceiling {
      return;
    }

    // 2. Insertion: the input has a code point absent from the
    //    dictionary. Skip it and stay on this node.
    if head.is_some() {
      self.visit_branching(children, pos + 1, errors);
    }

    // 3. Deletion, substitution, and transposition against every edge
    //    that wasn't already handled as the exact advance above.
    let second: EdgeKey = self.word.get(pos + 1).copied();
    for (key, edge) in children {
      if *key == head {
        continue;
      }

      if let Some(c) = *key {
        self.path.push(c);
      }
      self.visit(edge, pos, errors); // deletion: dictionary has an extra code point
      self.visit(edge, pos + 1, errors); // substitution
      if key.is_some() {
        self.path.pop();
      }

      // Transposition: dictionary expects `key` then `head`, input has
      // `head` then `second` — i.e. the two are swapped.
      if let (Some(k1), Some(k2)) = (head, second) {
        if *key == Some(k2) {
          if let Edge::Node(node) = edge {
            if let Node::Branching(grandchildren) = node.as_ref() {
              if let Some((grandchild, matched_k1)) =
                lookup_folded(grandchildren, Some(k1), self.mode)
              {
                self.path.push(k2);
                self.path.push(matched_k1.expect("k1 lookup key is always Some"));
                self.visit(grandchild, pos + 2, errors);
                self.path.pop();
                self.path.pop();
              }
            }
          }
        }
      }
    }
  }
}

/// Looks up `key` among `children`, falling back — in case-insensitive
/// mode only, and only when uppercasing yields a single code point — to
/// the uppercase form. Returns the edge found together with the key
/// that actually matched (which may differ in case from the key asked
/// for), since the matcher records the trie's stored case in its path.
fn lookup_folded<'n>(
  children: &'n HashMap<EdgeKey, Edge>,
  key: EdgeKey,
  mode: CaseMode,
) -> Option<(&'n Edge, EdgeKey)> {
  if let Some(edge) = children.get(&key) {
    return Some((edge, key));
  }
  if mode == CaseMode::Insensitive {
    if let Some(c) = key {
      let mut upper = c.to_uppercase();
      if let (Some(single), None) = (upper.next(), upper.next()) {
        if let Some(edge) = children.get(&Some(single)) {
          return Some((edge, Some(single)));
        }
      }
    }
  }
  None
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::trie::Trie;

  fn matches(trie: &Trie, word: &str, ceiling: u32, mode: CaseMode) -> Vec<(String, u32)> {
    let mut results = Vec::new();
    find_matches(trie, word, ceiling, mode, &mut |candidate, errors| {
      results.push((candidate, errors));
      None
    });
    results
  }

  #[test]
  fn exact_match_has_zero_errors() {
    let mut trie = Trie::empty();
    trie.insert("hello");
    let found = matches(&trie, "hello", 3, CaseMode::Sensitive);
    assert!(found.contains(&("hello".to_string(), 0)));
  }

  #[test]
  fn one_substitution_is_one_error() {
    let mut trie = Trie::empty();
    trie.insert("hello");
    let found = matches(&trie, "hallo", 3, CaseMode::Sensitive);
    assert!(found.contains(&("hello".to_string(), 1)));
  }

  #[test]
  fn one_deletion_from_input_is_one_error() {
    let mut trie = Trie::empty();
    trie.insert("hello");
    // "helo" is missing an 'l' relative to "hello".
    let found = matches(&trie, "helo", 3, CaseMode::Sensitive);
    assert!(found.contains(&("hello".to_string(), 1)));
  }

  #[test]
  fn one_insertion_into_input_is_one_error() {
    let mut trie = Trie::empty();
    trie.insert("hello");
    let found = matches(&trie, "helllo", 3, CaseMode::Sensitive);
    assert!(found.contains(&("hello".to_string(), 1)));
  }

  #[test]
  fn adjacent_transposition_is_one_error() {
    let mut trie = Trie::empty();
    trie.insert("hello");
    let found = matches(&trie, "hlelo", 3, CaseMode::Sensitive);
    assert!(found.contains(&("hello".to_string(), 1)));
  }

  #[test]
  fn ceiling_of_zero_only_reports_exact_matches() {
    let mut trie = Trie::empty();
    trie.insert("hello");
    trie.insert("help");
    let found = matches(&trie, "helo", 0, CaseMode::Sensitive);
    assert!(found.is_empty());
    let found = matches(&trie, "hello", 0, CaseMode::Sensitive);
    assert_eq!(found, vec![("hello".to_string(), 0)]);
  }

  #[test]
  fn case_sensitive_mode_does_not_fold() {
    let mut trie = Trie::empty();
    trie.insert("Hello");
    let found = matches(&trie, "hello", 0, CaseMode::Sensitive);
    assert!(found.is_empty());
  }

  #[test]
  fn case_insensitive_mode_folds_to_uppercase_edges() {
    let mut trie = Trie::empty();
    trie.insert("Hello");
    let found = matches(&trie, "hello", 0, CaseMode::Insensitive);
    assert_eq!(found, vec![("Hello".to_string(), 0)]);
  }

  #[test]
  fn callback_can_tighten_the_ceiling() {
    let mut trie = Trie::empty();
    trie.insert("hello");
    trie.insert("help");
    let mut best = u32::MAX;
    let mut seen = Vec::new();
    find_matches(&trie, "helo", 3, CaseMode::Sensitive, &mut |candidate, errors| {
      seen.push((candidate, errors));
      if errors < best {
        best = errors;
        Some(errors)
      } else {
        None
      }
    });
    // Once a 1-error match tightens the ceiling to 1, no match requiring
    // more than 1 error should have been found afterwards.
    assert!(seen.iter().all(|(_, errors)| *errors <= 1));
  }

  #[test]
  fn finds_multiple_candidates_without_duplicates() {
    let mut trie = Trie::empty();
    trie.insert("hello");
    trie.insert("help");
    let found = matches(&trie, "helo", 1, CaseMode::Sensitive);
    let mut words: Vec<&str> = found.iter().map(|(w, _)| w.as_str()).collect();
    words.sort();
    words.dedup();
    assert_eq!(words, vec!["hello", "help"]);
  }
}
