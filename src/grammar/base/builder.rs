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

use super::{Elem, Grammar, GrammarError, NonTerminal, RuleInner};
use crate::utils::OrdKey;

/// A helper trait to allow builder methods to either take a type `T`, or a
/// reference to `T` if it is clonable.
pub trait BuilderInto<T> {
  /// Consumes self and produces a value of type `T`.
  fn builder_into(self) -> T;
}

impl<T> BuilderInto<T> for T {
  fn builder_into(self) -> T {
    self
  }
}

impl<'a, T> BuilderInto<T> for &'a T
where
  T: Clone,
{
  fn builder_into(self) -> T {
    self.clone()
  }
}

impl BuilderInto<NonTerminal> for &'_ str {
  fn builder_into(self) -> NonTerminal {
    NonTerminal::new(self)
  }
}

/// Builds the body of a single rule.
pub struct RuleBuilder<T, NT> {
  elems: Vec<Elem<T, NT>>,
}

impl<T, NT> RuleBuilder<T, NT> {
  fn new() -> Self {
    RuleBuilder { elems: Vec::new() }
  }

  pub fn add_term(&mut self, term: impl BuilderInto<T>) -> &mut Self {
    self.elems.push(Elem::Term(term.builder_into()));
    self
  }

  pub fn add_nonterm(&mut self, nonterm: impl BuilderInto<NT>) -> &mut Self {
    self.elems.push(Elem::NonTerm(nonterm.builder_into()));
    self
  }

  /// Adds a terminal for each unit yielded by `terms`.
  pub fn add_terms(&mut self, terms: impl IntoIterator<Item = T>) -> &mut Self {
    self.elems.extend(terms.into_iter().map(Elem::Term));
    self
  }
}

// ----------------

pub struct GrammarBuilder<T, NT> {
  start: NT,
  rules: Vec<RuleInner<T, NT>>,
}

impl<T, NT> GrammarBuilder<T, NT>
where
  T: OrdKey,
  NT: OrdKey,
{
  fn new(start: NT) -> Self {
    GrammarBuilder {
      start,
      rules: Vec::new(),
    }
  }

  fn build(self) -> Result<Grammar<T, NT>, GrammarError> {
    let GrammarBuilder { start, rules } = self;
    Grammar::new(start, rules)
  }

  /// Adds a rule with the given head. Rules are numbered in the order they
  /// are added.
  pub fn add_rule<F>(
    &mut self,
    head: impl BuilderInto<NT>,
    build_fn: F,
  ) -> &mut Self
  where
    F: FnOnce(&mut RuleBuilder<T, NT>),
  {
    let mut rule_builder = RuleBuilder::new();
    build_fn(&mut rule_builder);
    self
      .rules
      .push(RuleInner::new(head.builder_into(), rule_builder.elems));
    self
  }
}

/// Builds a grammar using a builder function.
///
/// Example:
///
/// ```rust
/// # use gearley::grammar::{Grammar, NonTerminal};
/// let t = NonTerminal::new("T");
/// let g: Grammar<char, NonTerminal> = gearley::grammar::build(&t, |gb| {
///   gb.add_rule(&t, |rb| {
///     rb.add_term('a').add_term('b');
///   })
///   .add_rule(&t, |rb| {
///     rb.add_term('a').add_nonterm(&t).add_term('b');
///   });
/// })
/// .unwrap();
/// assert_eq!(g.num_rules(), 2);
/// ```
///
/// Arguments that take a terminal or nonterminal can either take a
/// non-reference value, or a cloneable reference value.
pub fn build<T, NT>(
  start: impl BuilderInto<NT>,
  build_fn: impl FnOnce(&mut GrammarBuilder<T, NT>),
) -> Result<Grammar<T, NT>, GrammarError>
where
  T: OrdKey,
  NT: OrdKey,
{
  let mut builder = GrammarBuilder::new(start.builder_into());
  build_fn(&mut builder);
  builder.build()
}

/// Builds a grammar from `(head, elements)` pairs, in order.
pub fn build_from_rules<T, NT>(
  start: NT,
  rules: impl IntoIterator<Item = (NT, Vec<Elem<T, NT>>)>,
) -> Result<Grammar<T, NT>, GrammarError>
where
  T: OrdKey,
  NT: OrdKey,
{
  Grammar::new(
    start,
    rules
      .into_iter()
      .map(|(head, elems)| RuleInner::new(head, elems)),
  )
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_build_from_rules_matches_builder() {
    let s = NonTerminal::new("S");
    let from_rules = build_from_rules(
      s.clone(),
      vec![
        (s.clone(), vec![Elem::Term('x')]),
        (s.clone(), vec![Elem::Term('x'), Elem::NonTerm(s.clone())]),
      ],
    )
    .unwrap();

    let built: Grammar<char, NonTerminal> = build("S", |gb| {
      gb.add_rule("S", |rb| {
        rb.add_term('x');
      })
      .add_rule("S", |rb| {
        rb.add_term('x').add_nonterm("S");
      });
    })
    .unwrap();

    let left: Vec<_> = from_rules.rules().map(|r| r.elements().to_vec()).collect();
    let right: Vec<_> = built.rules().map(|r| r.elements().to_vec()).collect();
    assert_eq!(left, right);
  }

  #[test]
  fn test_add_terms() {
    let g: Grammar<char, NonTerminal> = build("word", |gb| {
      gb.add_rule("word", |rb| {
        rb.add_terms("let".chars());
      });
    })
    .unwrap();
    let rule = g.rules().next().unwrap();
    assert_eq!(
      rule.elements(),
      &[Elem::Term('l'), Elem::Term('e'), Elem::Term('t')]
    );
  }
}
