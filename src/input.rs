// Copyright 2019 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Splitting text into the units a grammar's terminals match.

use unicode_segmentation::UnicodeSegmentation;

/// Splits `s` into Unicode scalar values.
pub fn chars(s: &str) -> Vec<char> {
  s.chars().collect()
}

/// Splits `s` into extended grapheme clusters.
pub fn graphemes(s: &str) -> Vec<String> {
  s.graphemes(true).map(String::from).collect()
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_chars_splits_combining_marks() {
    assert_eq!(chars("e\u{301}"), vec!['e', '\u{301}']);
    assert!(chars("").is_empty());
  }

  #[test]
  fn test_graphemes_keep_combining_marks() {
    assert_eq!(graphemes("e\u{301}x"), vec!["e\u{301}", "x"]);
    assert!(graphemes("").is_empty());
  }
}
