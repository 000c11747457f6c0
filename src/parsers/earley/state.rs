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

//! Provides the chart data structures built by the Earley recognizer.
//!
//! A chart holds one state set per input position. Each state set is a
//! deduplicated, insertion-ordered collection of items.

use {
  crate::{
    grammar::{Elem, Grammar, RuleId},
    state::Item,
    utils::{OrdKey, WasChanged},
  },
  std::collections::BTreeSet,
};

/// The items at a single chart position.
///
/// Items are kept in insertion order so the set can be walked as a worklist
/// while new items are appended to it. A set is sealed once its position has
/// been fully processed; inserting into a sealed set panics.
#[derive(Clone, Debug, Default)]
pub struct StateSet {
  items: Vec<Item>,
  seen: BTreeSet<Item>,
  sealed: bool,
}

impl StateSet {
  pub fn new() -> Self {
    StateSet::default()
  }

  /// Adds `item` unless an equal item is already present.
  pub fn put(&mut self, item: Item) -> WasChanged {
    assert!(!self.sealed, "Inserted {:?} into a sealed state set.", item);
    let changed = WasChanged::from_changed(self.seen.insert(item));
    if changed.is_changed() {
      self.items.push(item);
    }
    changed
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Returns the item at `index` in insertion order.
  pub fn get(&self, index: usize) -> Option<Item> {
    self.items.get(index).copied()
  }

  pub fn contains(&self, item: &Item) -> bool {
    self.seen.contains(item)
  }

  pub fn iter(&self) -> impl Iterator<Item = Item> + '_ {
    self.items.iter().copied()
  }

  pub fn is_sealed(&self) -> bool {
    self.sealed
  }

  fn seal(&mut self) {
    self.sealed = true;
  }

  /// Returns every item whose next element is `elem`, advanced past it.
  pub fn advance_over<'a, T, NT>(
    &'a self,
    g: &'a Grammar<T, NT>,
    elem: &'a Elem<T, NT>,
  ) -> impl Iterator<Item = Item> + 'a
  where
    T: OrdKey,
    NT: OrdKey,
  {
    self.iter().filter_map(move |item| item.advance_if(g, elem))
  }

  /// Returns the items that have matched their whole rule.
  pub fn completed<'a, T, NT>(
    &'a self,
    g: &'a Grammar<T, NT>,
  ) -> impl Iterator<Item = Item> + 'a
  where
    T: OrdKey,
    NT: OrdKey,
  {
    self.iter().filter(move |item| item.is_complete(g))
  }
}

/// A completed match of a rule over the input units `start..end`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Span {
  pub rule: RuleId,
  pub start: usize,
  pub end: usize,
}

/// The state sets of one recognition run, one per input position.
///
/// A chart for an input of length N has N + 1 state sets. Only the set at the
/// current position and the one after it accept new items; every set before
/// the current position is sealed.
#[derive(Clone, Debug)]
pub struct Chart {
  sets: Vec<StateSet>,
  current: usize,
}

impl Chart {
  /// Creates a chart for `input_len` units, with the first state set seeded
  /// with every rule of `g` at dot 0, origin 0.
  pub fn new<T, NT>(g: &Grammar<T, NT>, input_len: usize) -> Self
  where
    T: OrdKey,
    NT: OrdKey,
  {
    let mut sets = Vec::with_capacity(input_len + 1);
    sets.resize_with(input_len + 1, StateSet::new);

    for rule in g.rules() {
      sets[0].put(Item::from_start(rule.id(), 0));
    }

    Chart { sets, current: 0 }
  }

  /// Returns the number of input units this chart covers.
  pub fn input_len(&self) -> usize {
    self.sets.len() - 1
  }

  /// Returns the number of state sets, which is one more than the input
  /// length.
  pub fn len(&self) -> usize {
    self.sets.len()
  }

  /// Returns the state set at `position`. Panics if `position` is past the
  /// end of the input.
  pub fn at(&self, position: usize) -> &StateSet {
    self.check_position(position);
    &self.sets[position]
  }

  pub fn sets(&self) -> &[StateSet] {
    &self.sets
  }

  /// Inserts `item` into the state set at `position`, which must be the
  /// current position or the one after it.
  pub(super) fn put(&mut self, position: usize, item: Item) -> WasChanged {
    self.check_position(position);
    assert!(
      position == self.current || position == self.current + 1,
      "Inserted into position {} while processing position {}.",
      position,
      self.current
    );
    self.sets[position].put(item)
  }

  /// Seals the current state set and moves to the next position.
  pub(super) fn finish_position(&mut self) {
    self.sets[self.current].seal();
    if self.current < self.input_len() {
      self.current += 1;
    }
  }

  /// Returns every completed item as a span over the input.
  pub fn completed_spans<T, NT>(&self, g: &Grammar<T, NT>) -> Vec<Span>
  where
    T: OrdKey,
    NT: OrdKey,
  {
    self
      .sets
      .iter()
      .enumerate()
      .flat_map(|(end, set)| {
        set.completed(g).map(move |item| Span {
          rule: item.rule_id(),
          start: item.origin(),
          end,
        })
      })
      .collect()
  }

  fn check_position(&self, position: usize) {
    assert!(
      position < self.sets.len(),
      "Chart position {} out of range [0, {}].",
      position,
      self.input_len()
    );
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::grammar::{examples, NonTerminal};

  fn first_rule(g: &Grammar<char, NonTerminal>) -> RuleId {
    g.rules().next().unwrap().id()
  }

  #[test]
  fn test_put_deduplicates() {
    let g = examples::make_anbn();
    let item = Item::from_start(first_rule(&g), 0);
    let mut set = StateSet::new();
    assert_eq!(set.put(item), WasChanged::Changed);
    assert_eq!(set.put(item), WasChanged::Unchanged);
    assert_eq!(set.put(item.advance()), WasChanged::Changed);
    assert_eq!(set.len(), 2);
    assert_eq!(set.get(0), Some(item));
    assert_eq!(set.get(1), Some(item.advance()));
    assert!(set.contains(&item.advance()));
    assert!(!set.contains(&item.advance().advance()));
  }

  #[test]
  #[should_panic]
  fn test_put_into_sealed_set() {
    let g = examples::make_anbn();
    let mut set = StateSet::new();
    set.seal();
    set.put(Item::from_start(first_rule(&g), 0));
  }

  #[test]
  fn test_new_chart_is_seeded() {
    let g = examples::make_arith();
    let chart = Chart::new(&g, 3);
    assert_eq!(chart.len(), 4);
    assert_eq!(chart.input_len(), 3);
    assert_eq!(chart.at(0).len(), g.num_rules());
    assert!(chart.at(0).iter().all(|i| i.dot() == 0 && i.origin() == 0));
    assert!(chart.sets()[1..].iter().all(StateSet::is_empty));
  }

  #[test]
  #[should_panic]
  fn test_at_out_of_range() {
    let g = examples::make_anbn();
    let chart = Chart::new(&g, 2);
    chart.at(3);
  }

  #[test]
  #[should_panic]
  fn test_put_outside_window() {
    let g = examples::make_anbn();
    let mut chart = Chart::new(&g, 3);
    chart.put(2, Item::from_start(first_rule(&g), 0));
  }

  #[test]
  fn test_advance_over() {
    let g = examples::make_anbn();
    let ids: Vec<_> = g.rules().map(|r| r.id()).collect();
    let mut set = StateSet::new();
    set.put(Item::from_start(ids[0], 0).advance());
    set.put(Item::from_start(ids[1], 0).advance());
    set.put(Item::from_start(ids[1], 0).advance().advance().advance());

    let t = Elem::NonTerm(NonTerminal::new("T"));
    let advanced: Vec<_> = set.advance_over(&g, &t).collect();
    assert_eq!(
      advanced,
      vec![Item::from_start(ids[1], 0).advance().advance()]
    );

    let b: Vec<_> = set.advance_over(&g, &Elem::Term('b')).collect();
    assert_eq!(b, vec![Item::from_start(ids[0], 0).advance().advance()]);
  }
}
