/*!
All-caps / title-case classification and re-casing.

Classification is based on `char::is_uppercase` / `char::is_lowercase`,
which are Unicode-aware in the standard library. The one deliberate
simplification versus the reference implementation: Unicode's rare
*titlecase* general category (digraphs such as `ǅ`) is folded into the
uppercase check rather than distinguished, since the standard library
does not expose general-category queries directly. See DESIGN.md.
*/

/// True iff `word` contains at least one uppercase letter and no
/// lowercase letter. Other character categories (digits, punctuation,
/// combining marks) neither satisfy nor falsify the check.
pub fn is_all_caps(word: &str) -> bool {
  let mut has_upper = false;
  for c in word.chars() {
    if c.is_lowercase() {
      return false;
    }
    has_upper |= c.is_uppercase();
  }
  has_upper
}

/// True iff the first code point is uppercase and every subsequent code
/// point is not uppercase.
pub fn is_title_case(word: &str) -> bool {
  let mut chars = word.chars();
  match chars.next() {
    Some(first) if first.is_uppercase() => chars.all(|c| !c.is_uppercase()),
    _ => false,
  }
}

/// Returns the title-case form of `word`: the uppercase of the first
/// code point, followed by the lowercased tail.
pub fn to_title(word: &str) -> String {
  let mut chars = word.chars();
  match chars.next() {
    None => String::new(),
    Some(first) => {
      let mut result: String = first.to_uppercase().collect();
      result.extend(chars.flat_map(|c| c.to_lowercase()));
      result
    }
  }
}
