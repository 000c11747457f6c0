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

//! An Earley recognizer for any grammar.
//!
//! The recognizer builds a chart with one state set per input position,
//! applying predict, scan and complete to every item until each set reaches
//! a fixed point. It answers accept or reject only; it does not build parse
//! trees.

mod span_graph;
mod state;

pub use state::{Chart, Span, StateSet};

use {
  crate::{
    grammar::{Elem, Grammar},
    input,
    parsers::Recognizer,
    state::Item,
    utils::{change_iter, to_pretty_width, OrdKey, ToDoc, WasChanged},
  },
  span_graph::SpanGraph,
};

/// Recognizes inputs against a borrowed grammar.
///
/// The recognizer holds no state between runs; each call builds a fresh
/// chart. Any number of recognizers may share one grammar, including from
/// different threads.
pub struct EarleyRecognizer<'g, T, NT> {
  grammar: &'g Grammar<T, NT>,
}

impl<'g, T, NT> EarleyRecognizer<'g, T, NT>
where
  T: OrdKey,
  NT: OrdKey,
{
  pub fn new(grammar: &'g Grammar<T, NT>) -> Self {
    EarleyRecognizer { grammar }
  }

  pub fn grammar(&self) -> &'g Grammar<T, NT> {
    self.grammar
  }

  /// Builds the full chart for `input` and decides acceptance.
  pub fn run(&self, input: &[T]) -> Recognition<'g, T, NT> {
    let mut chart = Chart::new(self.grammar, input.len());

    for position in 0..=input.len() {
      self.process_position(&mut chart, position, input);
      log::debug!(
        "Position {} settled with {} items.",
        position,
        chart.at(position).len()
      );
      chart.finish_position();
    }

    let accepted = self.is_accepted(&chart);
    log::debug!(
      "Input of {} units {}.",
      input.len(),
      if accepted { "accepted" } else { "rejected" }
    );

    Recognition {
      grammar: self.grammar,
      chart,
      accepted,
    }
  }

  /// Returns true if `input` is in the language of the grammar.
  pub fn recognize(&self, input: &[T]) -> bool {
    self.run(input).accepted()
  }

  /// Walks the state set at `position` as a worklist. Items appended to the
  /// set during the walk are visited as well.
  fn process_position(&self, chart: &mut Chart, position: usize, input: &[T]) {
    let mut cursor = 0;
    while let Some(item) = chart.at(position).get(cursor) {
      cursor += 1;
      match item.next_elem(self.grammar) {
        None => self.complete(chart, position, item),
        Some(Elem::Term(unit)) => self.scan(chart, position, item, unit, input),
        Some(Elem::NonTerm(nt)) => self.predict(chart, position, item, nt),
      }
    }
  }

  /// Advances every item at the completed item's origin that was waiting on
  /// its head, placing the results at the current position.
  fn complete(&self, chart: &mut Chart, position: usize, item: Item) {
    let head = item.rule(self.grammar).head();
    log::trace!(
      "Completing {:?} over {}..{}.",
      item.rule(self.grammar),
      item.origin(),
      position
    );

    let advanced: Vec<Item> = chart
      .at(item.origin())
      .advance_over(self.grammar, &Elem::NonTerm(head.clone()))
      .collect();

    for next in advanced {
      self.put(chart, position, next);
    }
  }

  /// Advances `item` into the next position if the next input unit is
  /// `unit`.
  fn scan(
    &self,
    chart: &mut Chart,
    position: usize,
    item: Item,
    unit: &T,
    input: &[T],
  ) {
    match input.get(position) {
      Some(next_unit) if next_unit == unit => {
        log::trace!("Scanned {:?} at {}.", unit, position);
        self.put(chart, position + 1, item.advance());
      }
      _ => {}
    }
  }

  /// Adds a fresh item for every rule of `nt`, starting at `position`.
  fn predict(&self, chart: &mut Chart, position: usize, item: Item, nt: &NT) {
    let changed = change_iter(self.grammar.rules_for(nt), |rule| {
      self.put(chart, position, Item::from_start(rule.id(), position))
    });
    if changed.is_changed() {
      log::trace!("Predicted {:?} at {} for {:?}.", nt, position, item);
    }
  }

  fn put(&self, chart: &mut Chart, position: usize, item: Item) -> WasChanged {
    let changed = chart.put(position, item);
    if changed.is_changed() {
      log::trace!("Added {:?} at {}.", item, position);
    }
    changed
  }

  fn is_accepted(&self, chart: &Chart) -> bool {
    let start = self.grammar.start_nt();
    chart
      .at(chart.input_len())
      .completed(self.grammar)
      .any(|item| {
        item.origin() == 0 && item.rule(self.grammar).head() == start
      })
  }
}

impl<'g, NT> EarleyRecognizer<'g, char, NT>
where
  NT: OrdKey,
{
  /// Recognizes a string, one unit per Unicode scalar value.
  pub fn recognize_str(&self, s: &str) -> bool {
    self.recognize(&input::chars(s))
  }
}

impl<'g, NT> EarleyRecognizer<'g, String, NT>
where
  NT: OrdKey,
{
  /// Recognizes a string, one unit per extended grapheme cluster.
  pub fn recognize_graphemes(&self, s: &str) -> bool {
    self.recognize(&input::graphemes(s))
  }
}

impl<'g, T, NT> Recognizer<T> for EarleyRecognizer<'g, T, NT>
where
  T: OrdKey,
  NT: OrdKey,
{
  fn recognize(&self, input: &[T]) -> bool {
    EarleyRecognizer::recognize(self, input)
  }
}

/// The outcome of one recognition run, along with the chart it built.
pub struct Recognition<'g, T, NT> {
  grammar: &'g Grammar<T, NT>,
  chart: Chart,
  accepted: bool,
}

impl<'g, T, NT> Recognition<'g, T, NT>
where
  T: OrdKey,
  NT: OrdKey,
{
  pub fn accepted(&self) -> bool {
    self.accepted
  }

  pub fn grammar(&self) -> &'g Grammar<T, NT> {
    self.grammar
  }

  pub fn chart(&self) -> &Chart {
    &self.chart
  }

  /// Returns every completed rule match recorded in the chart.
  pub fn completed_spans(&self) -> Vec<Span> {
    self.chart.completed_spans(self.grammar)
  }
}

impl<'g, T, NT> Recognition<'g, T, NT>
where
  T: OrdKey + ToDoc,
  NT: OrdKey + ToDoc,
{
  /// Renders every state set, in order, as a header line followed by its
  /// items in insertion order.
  pub fn to_pretty(&self) -> String {
    to_pretty_width(self, 80)
  }

  /// Writes the completed spans of the chart as a GraphViz digraph. Nodes are
  /// chart positions; each edge is a completed rule labelled with the rule.
  pub fn write_dot<W: std::io::Write>(&self, w: &mut W) -> std::io::Result<()> {
    let graph = SpanGraph::new(self.grammar, &self.chart);
    dot::render(&graph, w)
  }

  pub fn to_dot(&self) -> String {
    let mut buffer = Vec::new();
    self
      .write_dot(&mut buffer)
      .expect("Writing to a Vec does not fail.");
    String::from_utf8(buffer).expect("Dot output is valid UTF-8.")
  }
}

impl<'g, T, NT> ToDoc for Recognition<'g, T, NT>
where
  T: OrdKey + ToDoc,
  NT: OrdKey + ToDoc,
{
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    da.intersperse(
      self.chart.sets().iter().enumerate().map(|(position, set)| {
        da.text(format!("==== {} ====", position)).append(da.concat(
          set.iter().map(|item| {
            da.hardline().append(item.display(self.grammar).to_doc(da))
          }),
        ))
      }),
      da.hardline(),
    )
  }
}

/// Returns true if `input` is in the language of `grammar`.
pub fn recognize<T, NT>(grammar: &Grammar<T, NT>, input: &[T]) -> bool
where
  T: OrdKey,
  NT: OrdKey,
{
  EarleyRecognizer::new(grammar).recognize(input)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::grammar::{examples, NonTerminal};
  use std::collections::BTreeSet;

  fn accepts(g: &Grammar<char, NonTerminal>, s: &str) -> bool {
    EarleyRecognizer::new(g).recognize_str(s)
  }

  #[test]
  fn test_anbn() {
    let g = examples::make_anbn();
    for s in &["ab", "aabb", "aaabbb"] {
      assert!(accepts(&g, s), "expected {:?} to be accepted", s);
    }
    for s in &["a", "abb", "", "ba", "abba", "aab"] {
      assert!(!accepts(&g, s), "expected {:?} to be rejected", s);
    }
  }

  #[test]
  fn test_single_terminal() {
    let g = examples::make_single_x();
    assert!(accepts(&g, "x"));
    assert!(!accepts(&g, "y"));
    assert!(!accepts(&g, ""));
    assert!(!accepts(&g, "xx"));
  }

  #[test]
  fn test_arith() {
    let g = examples::make_arith();
    for s in &["1", "1+2", "1+2*3", "(1+2)*3", "((4))", "1*2*3+4*5"] {
      assert!(accepts(&g, s), "expected {:?} to be accepted", s);
    }
    for s in &["", "+", "1+", "(1", "1)", "12", "1+*2"] {
      assert!(!accepts(&g, s), "expected {:?} to be rejected", s);
    }
  }

  #[test]
  fn test_ambiguous() {
    let g = examples::make_ambiguous();
    assert!(accepts(&g, "n+n+n+n"));
    assert!(!accepts(&g, "n+"));
    assert!(!accepts(&g, "nn"));
  }

  #[test]
  fn test_undefined_nonterminal_never_matches() {
    let g = examples::make_undefined_reference();
    assert!(accepts(&g, "b"));
    assert!(!accepts(&g, "a"));
    assert!(!accepts(&g, "ab"));
  }

  #[test]
  fn test_only_start_rule_accepts() {
    let g = examples::make_non_start_match();
    assert!(accepts(&g, "ab!"));
    assert!(!accepts(&g, "ab"));

    let word = g.with_start(NonTerminal::new("word")).unwrap();
    assert!(accepts(&word, "ab"));
    assert!(!accepts(&word, "ab!"));
  }

  #[test]
  fn test_unit_cycle_terminates() -> anyhow::Result<()> {
    let g: Grammar<char, NonTerminal> = crate::grammar::build("A", |gb| {
      gb.add_rule("A", |rb| {
        rb.add_nonterm("B");
      })
      .add_rule("B", |rb| {
        rb.add_nonterm("A");
      })
      .add_rule("B", |rb| {
        rb.add_term('x');
      });
    })?;
    assert!(accepts(&g, "x"));
    assert!(!accepts(&g, "xx"));
    assert!(!accepts(&g, ""));
    Ok(())
  }

  #[test]
  fn test_chart_sets_are_sealed_and_deduplicated() {
    let g = examples::make_ambiguous();
    let input = input::chars("n+n+n");
    let recognition = EarleyRecognizer::new(&g).run(&input);
    assert!(recognition.accepted());

    let chart = recognition.chart();
    assert_eq!(chart.len(), input.len() + 1);
    for set in chart.sets() {
      assert!(set.is_sealed());
      let unique: BTreeSet<_> = set.iter().collect();
      assert_eq!(unique.len(), set.len());
      assert!(set.iter().all(|item| set.contains(&item)));
    }
  }

  #[test]
  fn test_items_only_come_from_earlier_or_same_positions() {
    let g = examples::make_arith();
    let input = input::chars("(1+2)*3");
    let recognition = EarleyRecognizer::new(&g).run(&input);
    for (position, set) in recognition.chart().sets().iter().enumerate() {
      for item in set.iter() {
        assert!(item.origin() <= position);
        assert!(item.dot() <= item.rule(&g).len());
      }
    }
  }

  #[test]
  fn test_rejected_input_chart_is_still_complete() {
    let g = examples::make_anbn();
    let input = input::chars("abb");
    let recognition = EarleyRecognizer::new(&g).run(&input);
    assert!(!recognition.accepted());
    assert!(recognition.chart().at(3).is_empty());
    assert!(!recognition.chart().at(2).is_empty());
  }

  #[test]
  fn test_completed_spans() {
    let g = examples::make_anbn();
    let recognition = EarleyRecognizer::new(&g).run(&input::chars("aabb"));
    let spans: BTreeSet<_> = recognition
      .completed_spans()
      .into_iter()
      .map(|span| (span.rule.index(), span.start, span.end))
      .collect();
    let expected: BTreeSet<_> =
      vec![(0, 1, 3), (1, 0, 4)].into_iter().collect();
    assert_eq!(spans, expected);
  }

  #[test]
  fn test_pretty_trace() {
    let g = examples::make_single_x();
    let recognition = EarleyRecognizer::new(&g).run(&input::chars("x"));
    assert_eq!(
      recognition.to_pretty(),
      "==== 0 ====\nS => \u{25CF} 'x' (0)\n==== 1 ====\nS => 'x' \u{25CF} (0)"
    );
  }

  #[test]
  fn test_long_items_stay_on_one_line() -> anyhow::Result<()> {
    let g: Grammar<char, NonTerminal> = crate::grammar::build("S", |gb| {
      gb.add_rule("S", |rb| {
        rb.add_terms("abcdefghijklmnopqrstuvwxyzabcd".chars());
      });
    })?;
    let recognition = EarleyRecognizer::new(&g).run(&input::chars("a"));
    let trace = recognition.to_pretty();
    let lines: Vec<_> = trace.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("S => \u{25CF} 'a' 'b'"));
    assert!(lines[1].ends_with("'c' 'd' (0)"));
    assert_eq!(lines[2], "==== 1 ====");
    Ok(())
  }

  #[test]
  fn test_graphemes() {
    let g = examples::make_graphemes();
    let recognizer = EarleyRecognizer::new(&g);
    assert!(recognizer.recognize_graphemes("he\u{301}llo"));
    assert!(!recognizer.recognize_graphemes("hello"));
  }

  #[test]
  fn test_free_function() {
    let g = examples::make_anbn();
    assert!(recognize(&g, &['a', 'b']));
    assert!(!recognize(&g, &['b', 'a']));
  }
}
