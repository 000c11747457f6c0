// Copyright 2018 Google LLC
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

use crate::{
  grammar::{Elem, Grammar, Rule, RuleId},
  utils::{to_pretty_width, OrdKey, ToDoc},
};

/// Marks the dot when rendering an item.
pub const DOT_MARKER: &str = "\u{25CF}";

/// A single Earley item.
///
/// An item keeps track of a particular rule, a dot index into the rule's
/// elements, and the chart position at which the rule began matching (its
/// origin). For example:
///
/// ```text
/// T => 'a' ● <T> 'b' (0)
/// ```
///
/// This indicates that the head is T, the elements are 'a' <T> 'b', the
/// 'a' has been matched, and matching began at position 0.
///
/// Items are plain values. Two items with the same rule, dot and origin are
/// the same item.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Item {
  rule: RuleId,

  /// Must be in the range [0, len(rule)].
  dot: usize,

  origin: usize,
}

impl Item {
  /// Creates an item at the start of `rule`, beginning at `origin`.
  pub fn from_start(rule: RuleId, origin: usize) -> Self {
    Item {
      rule,
      dot: 0,
      origin,
    }
  }

  pub fn rule_id(&self) -> RuleId {
    self.rule
  }

  pub fn dot(&self) -> usize {
    self.dot
  }

  pub fn origin(&self) -> usize {
    self.origin
  }

  /// Returns this item with the dot moved past one more element.
  ///
  /// The caller is responsible for only advancing incomplete items.
  pub fn advance(&self) -> Item {
    Item {
      dot: self.dot + 1,
      ..*self
    }
  }

  /// Returns the rule this item belongs to.
  pub fn rule<'a, T, NT>(&self, g: &'a Grammar<T, NT>) -> Rule<'a, T, NT>
  where
    T: OrdKey,
    NT: OrdKey,
  {
    let rule = g.rule(self.rule);
    assert!(
      self.dot <= rule.len(),
      "Dot {} out of range for a rule of length {}.",
      self.dot,
      rule.len()
    );
    rule
  }

  pub fn is_complete<T, NT>(&self, g: &Grammar<T, NT>) -> bool
  where
    T: OrdKey,
    NT: OrdKey,
  {
    self.rule(g).len() == self.dot
  }

  /// Returns the element immediately after the dot. If the item is complete,
  /// returns `None`.
  pub fn next_elem<'a, T, NT>(
    &self,
    g: &'a Grammar<T, NT>,
  ) -> Option<&'a Elem<T, NT>>
  where
    T: OrdKey,
    NT: OrdKey,
  {
    self.rule(g).element_at(self.dot)
  }

  /// Returns `Some(item)` advanced past the next element if that element is
  /// `elem`.
  pub fn advance_if<T, NT>(
    &self,
    g: &Grammar<T, NT>,
    elem: &Elem<T, NT>,
  ) -> Option<Item>
  where
    T: OrdKey,
    NT: OrdKey,
  {
    self
      .next_elem(g)
      .filter(|e| *e == elem)
      .map(|_| self.advance())
  }

  /// Binds this item to its grammar for rendering.
  pub fn display<'a, T, NT>(
    &self,
    g: &'a Grammar<T, NT>,
  ) -> ItemDisplay<'a, T, NT> {
    ItemDisplay {
      grammar: g,
      item: *self,
    }
  }
}

/// An item paired with the grammar it belongs to, for diagnostics.
pub struct ItemDisplay<'a, T, NT> {
  grammar: &'a Grammar<T, NT>,
  item: Item,
}

impl<'a, T, NT> ItemDisplay<'a, T, NT>
where
  T: OrdKey + ToDoc,
  NT: OrdKey + ToDoc,
{
  pub fn to_pretty(&self) -> String {
    to_pretty_width(self, 80)
  }
}

impl<'a, T, NT> ToDoc for ItemDisplay<'a, T, NT>
where
  T: OrdKey + ToDoc,
  NT: OrdKey + ToDoc,
{
  fn to_doc<'b, DA: pretty::DocAllocator<'b>>(
    &self,
    da: &'b DA,
  ) -> pretty::DocBuilder<'b, DA>
  where
    DA::Doc: Clone,
  {
    let rule = self.item.rule(self.grammar);
    let (before, after) = rule.elements().split_at(self.item.dot);

    let mut doc = rule.head().to_doc(da).append(da.text(" =>"));
    for elem in before {
      doc = doc.append(da.space()).append(elem.to_doc(da));
    }
    doc = doc.append(da.space()).append(da.text(DOT_MARKER));
    for elem in after {
      doc = doc.append(da.space()).append(elem.to_doc(da));
    }

    doc
      .append(da.space())
      .append(da.text(format!("({})", self.item.origin)))
  }
}

impl<'a, T, NT> std::fmt::Display for ItemDisplay<'a, T, NT>
where
  T: OrdKey + ToDoc,
  NT: OrdKey + ToDoc,
{
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.write_str(&self.to_pretty())
  }
}
