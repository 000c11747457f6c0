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

pub mod builder;
mod cmp_wrappers;
mod element_types;

use {
  crate::utils::{to_pretty_width, OrdKey, ToDoc},
  std::collections::{BTreeMap, BTreeSet},
};

use std::fmt::Debug;

use cmp_wrappers::ParentRef;
pub use element_types::NonTerminal;

/// A single element (terminal or non-terminal).
///
/// A terminal carries the input unit it matches. A non-terminal carries the
/// name of the rules that define it.
#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum Elem<T, NT> {
  Term(T),
  NonTerm(NT),
}

impl<T, NT> ToDoc for Elem<T, NT>
where
  T: ToDoc,
  NT: ToDoc,
{
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    match self {
      Elem::NonTerm(nt) => {
        da.text("<").append(nt.to_doc(da)).append(da.text(">"))
      }
      Elem::Term(t) => t.to_doc(da),
    }
  }
}

impl<T, NT> std::fmt::Debug for Elem<T, NT>
where
  T: Debug,
  NT: Debug,
{
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Elem::Term(term) => write!(fmt, "{:?}", term),
      Elem::NonTerm(nt) => write!(fmt, "<{:?}>", nt),
    }
  }
}

/// The index of a rule within the grammar that owns it.
///
/// Ids are issued in declaration order, starting from zero, and are only
/// meaningful for the grammar that issued them.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RuleId(usize);

impl RuleId {
  pub fn index(self) -> usize {
    self.0
  }
}

/// A concrete raw rule value as stored inside a Grammar struct.
#[derive(Clone, Debug)]
struct RuleInner<T, NT> {
  head: NT,
  elements: Vec<Elem<T, NT>>,
}

impl<T, NT> RuleInner<T, NT> {
  fn new(head: NT, elements: Vec<Elem<T, NT>>) -> Self {
    RuleInner { head, elements }
  }
}

impl<T, NT> ToDoc for RuleInner<T, NT>
where
  T: ToDoc,
  NT: ToDoc,
{
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    self
      .head
      .to_doc(da)
      .append(da.text(" =>"))
      .append(da.space())
      .append(da.intersperse(
        self.elements.iter().map(|e| e.to_doc(da)),
        da.space(),
      ))
  }
}

/// Errors raised while assembling a grammar.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
  #[error("start nonterminal {start} has no rules")]
  StartWithoutRules { start: String },
  #[error("empty productions are not supported (heads: {})", .heads.join(", "))]
  EmptyProductions { heads: Vec<String> },
}

/// A context-free grammar.
///
/// This consists of
///
/// - A start nonterminal
/// - An ordered list of rules, each of which consists of
///   - A head nonterminal
///   - A non-empty list of elements, each either a terminal (an input unit)
///     or a nonterminal.
///
/// A nonterminal may head any number of rules. Nonterminals referenced from a
/// rule body but never defined are allowed; they simply never match.
///
/// Grammars are read-only. Rules are held in persistent collections, so
/// cloning a grammar is cheap and the clone shares all rule storage.
#[derive(Clone)]
pub struct Grammar<T, NT> {
  start_symbol: NT,
  rules: im::Vector<RuleInner<T, NT>>,
  rules_by_head: im::OrdMap<NT, im::Vector<RuleId>>,
}

impl<T, NT> std::fmt::Debug for Grammar<T, NT>
where
  T: OrdKey,
  NT: OrdKey,
{
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    let mut dbg_struct = f.debug_struct("Grammar");
    dbg_struct.field("Start", &self.start_symbol);
    dbg_struct.field("Rules", &self.rules().collect::<Vec<_>>());
    dbg_struct.finish()
  }
}

impl<T, NT> Grammar<T, NT>
where
  T: OrdKey,
  NT: OrdKey,
{
  fn new(
    start: NT,
    rules: impl IntoIterator<Item = RuleInner<T, NT>>,
  ) -> Result<Self, GrammarError> {
    let rules: im::Vector<_> = rules.into_iter().collect();

    let mut by_head: BTreeMap<NT, Vec<RuleId>> = BTreeMap::new();
    for (i, rule) in rules.iter().enumerate() {
      by_head
        .entry(rule.head.clone())
        .or_insert_with(Vec::new)
        .push(RuleId(i));
    }

    let g = Grammar {
      start_symbol: start,
      rules,
      rules_by_head: by_head
        .into_iter()
        .map(|(nt, ids)| {
          let ids: im::Vector<RuleId> = ids.into_iter().collect();
          (nt, ids)
        })
        .collect(),
    };

    g.check_grammar().map(|_| g)
  }

  fn check_grammar(&self) -> Result<(), GrammarError> {
    let empty_heads: BTreeSet<&NT> = self
      .rules
      .iter()
      .filter(|r| r.elements.is_empty())
      .map(|r| &r.head)
      .collect();
    if !empty_heads.is_empty() {
      return Err(GrammarError::EmptyProductions {
        heads: empty_heads.iter().map(|nt| format!("{:?}", nt)).collect(),
      });
    }

    if !self.rules_by_head.contains_key(&self.start_symbol) {
      return Err(GrammarError::StartWithoutRules {
        start: format!("{:?}", self.start_symbol),
      });
    }

    Ok(())
  }

  /// Returns the start nonterminal for this grammar.
  pub fn start_nt(&self) -> &NT {
    &self.start_symbol
  }

  /// Returns the number of rules in the grammar.
  pub fn num_rules(&self) -> usize {
    self.rules.len()
  }

  /// Returns a view of the rule with the given id.
  ///
  /// Panics if the id was not issued by this grammar.
  pub fn rule(&self, id: RuleId) -> Rule<'_, T, NT> {
    assert!(
      id.0 < self.rules.len(),
      "Rule id {} out of range for a grammar with {} rules.",
      id.0,
      self.rules.len()
    );
    Rule {
      grammar: ParentRef::new(self),
      id,
    }
  }

  /// Returns an iterator over all of the rules for this grammar, in
  /// declaration order.
  pub fn rules(&self) -> impl Iterator<Item = Rule<'_, T, NT>> {
    (0..self.rules.len()).map(move |i| Rule {
      grammar: ParentRef::new(self),
      id: RuleId(i),
    })
  }

  /// Returns the rules with `nt` as their head, in declaration order.
  ///
  /// A nonterminal with no rules yields an empty iterator.
  pub fn rules_for<'a>(
    &'a self,
    nt: &NT,
  ) -> impl Iterator<Item = Rule<'a, T, NT>> + 'a {
    self
      .rules_by_head
      .get(nt)
      .into_iter()
      .flat_map(|ids| ids.iter())
      .map(move |id| Rule {
        grammar: ParentRef::new(self),
        id: *id,
      })
  }

  /// Returns a grammar sharing this grammar's rules, with `start` as the
  /// designated start nonterminal.
  pub fn with_start(&self, start: NT) -> Result<Self, GrammarError> {
    let g = Grammar {
      start_symbol: start,
      rules: self.rules.clone(),
      rules_by_head: self.rules_by_head.clone(),
    };

    g.check_grammar().map(|_| g)
  }

  fn inner(&self, id: RuleId) -> &RuleInner<T, NT> {
    self
      .rules
      .get(id.0)
      .expect("Rule ids are only issued for existing rules.")
  }
}

impl<T, NT> Grammar<T, NT>
where
  T: OrdKey + ToDoc,
  NT: OrdKey + ToDoc,
{
  pub fn to_pretty(&self) -> String {
    to_pretty_width(self, 80)
  }
}

impl<T, NT> ToDoc for Grammar<T, NT>
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
    let start_entry = da
      .text("Start =")
      .group()
      .append(da.softline())
      .append(self.start_symbol.to_doc(da));
    let rules_entry = da.text("Rules ").append(
      da.line()
        .append(da.concat(self.rules.iter().map(|rule| {
          rule.to_doc(da).append(da.text(";")).append(da.line())
        })))
        .nest(2)
        .braces(),
    );

    da.concat(
      vec![start_entry, rules_entry]
        .into_iter()
        .map(|doc| doc.append(da.text(",")).append(da.line())),
    )
  }
}

// ------------

/// A single rule in a grammar.
///
/// A rule has a head, which is the nonterminal it derives, and a non-empty
/// sequence of elements.
///
/// Rules compare by id. Rules from different grammars must not be compared;
/// doing so panics.
#[derive(Derivative)]
#[derivative(
  Copy(bound = ""),
  Clone(bound = ""),
  PartialEq(bound = ""),
  Eq(bound = ""),
  PartialOrd(bound = ""),
  Ord(bound = "")
)]
pub struct Rule<'a, T, NT> {
  grammar: ParentRef<'a, Grammar<T, NT>>,
  id: RuleId,
}

impl<'a, T, NT> Rule<'a, T, NT>
where
  T: OrdKey,
  NT: OrdKey,
{
  fn inner(&self) -> &'a RuleInner<T, NT> {
    let grammar: &'a Grammar<T, NT> = *self.grammar;
    grammar.inner(self.id)
  }

  /// Returns the id of this rule within its grammar.
  pub fn id(&self) -> RuleId {
    self.id
  }

  /// Returns the head nonterminal.
  pub fn head(&self) -> &'a NT {
    &self.inner().head
  }

  /// Returns the elements of this rule.
  pub fn elements(&self) -> &'a [Elem<T, NT>] {
    &self.inner().elements
  }

  /// Returns the element at the given index, or `None` past the end.
  pub fn element_at(&self, index: usize) -> Option<&'a Elem<T, NT>> {
    self.elements().get(index)
  }

  /// Returns the number of elements in this rule.
  pub fn len(&self) -> usize {
    self.elements().len()
  }
}

impl<'a, T, NT> ToDoc for Rule<'a, T, NT>
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
    self.inner().to_doc(da)
  }
}

impl<'a, T, NT> std::fmt::Debug for Rule<'a, T, NT>
where
  T: OrdKey,
  NT: OrdKey,
{
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    let mut dbg_struct = fmt.debug_struct("Rule");
    dbg_struct.field("id", &self.id.0);
    dbg_struct.field("head", self.head());
    dbg_struct.field("elems", &self.elements());
    dbg_struct.finish()
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::grammar::{build, examples};

  #[test]
  fn test_rules_for_in_declaration_order() {
    let g = examples::make_anbn();
    let t = NonTerminal::new("T");
    let lens: Vec<_> = g.rules_for(&t).map(|r| r.len()).collect();
    assert_eq!(lens, vec![2, 3]);
    assert_eq!(g.num_rules(), 2);
  }

  #[test]
  fn test_undefined_nonterminal_has_no_rules() {
    let g = examples::make_undefined_reference();
    assert_eq!(g.rules_for(&NonTerminal::new("missing")).count(), 0);
  }

  #[test]
  fn test_empty_production_rejected() {
    let s = NonTerminal::new("S");
    let result: Result<Grammar<char, NonTerminal>, _> = build(&s, |gb| {
      gb.add_rule(&s, |rb| {
        rb.add_term('x');
      })
      .add_rule(&s, |_rb| {});
    });
    let err = result.unwrap_err();
    assert_eq!(
      err,
      GrammarError::EmptyProductions {
        heads: vec!["S".to_string()]
      }
    );
  }

  #[test]
  fn test_start_without_rules_rejected() {
    let s = NonTerminal::new("S");
    let a = NonTerminal::new("A");
    let result: Result<Grammar<char, NonTerminal>, _> = build(&s, |gb| {
      gb.add_rule(&a, |rb| {
        rb.add_term('x');
      });
    });
    let err = result.unwrap_err();
    assert!(matches!(err, GrammarError::StartWithoutRules { .. }));
    assert_eq!(err.to_string(), "start nonterminal S has no rules");
  }

  #[test]
  fn test_with_start_shares_rules() {
    let g = examples::make_arith();
    let term = g.with_start(NonTerminal::new("term")).unwrap();
    assert_eq!(term.start_nt(), &NonTerminal::new("term"));
    assert_eq!(term.num_rules(), g.num_rules());
    assert!(g.with_start(NonTerminal::new("nope")).is_err());
  }

  #[test]
  fn test_rule_view() {
    let g = examples::make_anbn();
    let rule = g.rule(RuleId(1));
    assert_eq!(rule.head(), &NonTerminal::new("T"));
    assert_eq!(rule.element_at(0), Some(&Elem::Term('a')));
    assert_eq!(
      rule.element_at(1),
      Some(&Elem::NonTerm(NonTerminal::new("T")))
    );
    assert_eq!(rule.element_at(3), None);
    assert_eq!(rule, g.rule(RuleId(1)));
    assert!(rule != g.rule(RuleId(0)));
  }

  #[test]
  #[should_panic]
  fn test_rule_out_of_range() {
    let g = examples::make_single_x();
    g.rule(RuleId(5));
  }

  #[test]
  fn test_pretty() {
    let g = examples::make_anbn();
    let rule = g.rule(RuleId(1));
    assert_eq!(to_pretty_width(&rule, 80), "T => 'a' <T> 'b'");
    let pretty = g.to_pretty();
    assert!(pretty.contains("Start = T"));
    assert!(pretty.contains("T => 'a' 'b';"));
  }
}
