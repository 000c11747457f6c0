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

use std::sync::Arc;

/// The bounds required of anything used as a grammar symbol payload.
///
/// Symbols are compared, ordered and cloned freely by the grammar and the
/// recognizer, and must be shareable between threads so a single grammar can
/// back concurrent recognition runs.
pub trait OrdKey:
  Clone + PartialEq + Eq + PartialOrd + Ord + std::fmt::Debug + Send + Sync + 'static
{
}

impl<
    T: Clone
      + PartialEq
      + Eq
      + PartialOrd
      + Ord
      + std::fmt::Debug
      + Send
      + Sync
      + 'static,
  > OrdKey for T
{
}

/// Conversion into a `pretty` document, used for all diagnostic rendering.
pub trait ToDoc {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA, ()>
  where
    DA::Doc: Clone;
}

impl ToDoc for char {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    da.text(format!("'{}'", self))
  }
}

impl ToDoc for String {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    da.text(format!("'{}'", self))
  }
}

/// Renders a value to a string at the given page width.
pub fn to_pretty_width<D: ToDoc + ?Sized>(value: &D, width: usize) -> String {
  let arena = pretty::Arena::new();
  format!("{}", value.to_doc(&arena).into_doc().pretty(width))
}

/// A refcounted name type, used to avoid duplicating common string values
/// throughout a grammar.
///
/// Names are atomically refcounted so grammars built from them can be shared
/// across threads.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(Arc<str>);

impl Name {
  /// Creates a new Name containing the given string.
  pub fn new(s: &(impl AsRef<str> + ?Sized)) -> Self {
    Name(Arc::from(s.as_ref()))
  }

  /// Returns a reference to the internal string.
  pub fn str(&self) -> &str {
    &self.0
  }
}

impl AsRef<str> for Name {
  fn as_ref(&self) -> &str {
    self.str()
  }
}

impl std::fmt::Debug for Name {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    fmt.write_str(&self.0)
  }
}

impl std::fmt::Display for Name {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    fmt.write_str(&self.0)
  }
}

impl ToDoc for Name {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    da.text(self.str().to_string())
  }
}

/// Records whether an insertion actually changed a collection.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum WasChanged {
  Changed,
  Unchanged,
}

impl WasChanged {
  pub fn from_changed(changed: bool) -> Self {
    if changed {
      WasChanged::Changed
    } else {
      WasChanged::Unchanged
    }
  }

  pub fn is_changed(self) -> bool {
    matches!(self, WasChanged::Changed)
  }

  pub fn join(self, other: Self) -> Self {
    match (self, other) {
      (WasChanged::Changed, _) | (_, WasChanged::Changed) => {
        WasChanged::Changed
      }
      _ => WasChanged::Unchanged,
    }
  }

  pub fn merge(&mut self, other: Self) {
    *self = self.join(other);
  }
}

/// Applies `func` to every item of `iter`, returning `Changed` if any
/// application changed something.
pub fn change_iter<I, F>(iter: I, mut func: F) -> WasChanged
where
  I: Iterator,
  F: FnMut(I::Item) -> WasChanged,
{
  let mut changed = WasChanged::Unchanged;
  for item in iter {
    changed.merge(func(item));
  }

  changed
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_name_compares_by_value() {
    let a = Name::new("expr");
    let b = Name::new(&String::from("expr"));
    assert_eq!(a, b);
    assert_eq!(a.str(), "expr");
    assert_eq!(format!("{:?}", a), "expr");
  }

  #[test]
  fn test_change_iter() {
    let changed = change_iter(vec![false, true, false].into_iter(), |c| {
      WasChanged::from_changed(c)
    });
    assert!(changed.is_changed());

    let unchanged = change_iter(std::iter::empty::<bool>(), |c| {
      WasChanged::from_changed(c)
    });
    assert_eq!(unchanged, WasChanged::Unchanged);
  }

  #[test]
  fn test_char_doc() {
    assert_eq!(to_pretty_width(&'a', 80), "'a'");
  }
}
