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

use std::{cmp, ops};

/// A deref wrapper around a reference to the grammar that owns a view.
///
/// Two views only compare equal through their own fields; the parent
/// references _must_ point at the same grammar, otherwise comparison panics.
/// Rule ids are only meaningful relative to the grammar that issued them.
#[derive(Debug)]
pub struct ParentRef<'a, T>(&'a T);

impl<'a, T> ParentRef<'a, T> {
  pub fn new(r: &'a T) -> Self {
    ParentRef(r)
  }

  fn check_same(&self, other: &Self) {
    assert!(
      std::ptr::eq(self.0, other.0),
      "Compared views from different grammars."
    );
  }
}

impl<T> cmp::PartialEq for ParentRef<'_, T> {
  fn eq(&self, other: &Self) -> bool {
    self.check_same(other);
    true
  }
}

impl<T> cmp::Eq for ParentRef<'_, T> {}

impl<T> cmp::PartialOrd for ParentRef<'_, T> {
  fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
    Some(self.cmp(other))
  }
}

impl<T> cmp::Ord for ParentRef<'_, T> {
  fn cmp(&self, other: &Self) -> cmp::Ordering {
    self.check_same(other);
    cmp::Ordering::Equal
  }
}

impl<'a, T> ops::Deref for ParentRef<'a, T> {
  type Target = &'a T;
  fn deref(&self) -> &&'a T {
    &self.0
  }
}

impl<T> Clone for ParentRef<'_, T> {
  fn clone(&self) -> Self {
    ParentRef(self.0)
  }
}

impl<T> Copy for ParentRef<'_, T> {}
