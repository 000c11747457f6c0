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

//! GraphViz rendering of the completed spans in a chart.

use {
  super::state::{Chart, Span},
  crate::{
    grammar::Grammar,
    utils::{to_pretty_width, OrdKey, ToDoc},
  },
  std::borrow::Cow,
};

const LABEL_WIDTH: usize = 200;

/// A graph whose nodes are chart positions and whose edges are completed
/// rule matches, from the match's origin to the position it ended at.
pub(super) struct SpanGraph {
  positions: Vec<usize>,
  spans: Vec<Span>,
  /// Edge labels, already escaped for use as HTML labels.
  labels: Vec<String>,
}

impl SpanGraph {
  pub fn new<T, NT>(g: &Grammar<T, NT>, chart: &Chart) -> Self
  where
    T: OrdKey + ToDoc,
    NT: OrdKey + ToDoc,
  {
    let spans = chart.completed_spans(g);
    let labels = spans
      .iter()
      .map(|span| {
        dot::escape_html(&to_pretty_width(&g.rule(span.rule), LABEL_WIDTH))
      })
      .collect();

    SpanGraph {
      positions: (0..chart.len()).collect(),
      spans,
      labels,
    }
  }
}

impl<'a> dot::Labeller<'a, usize, usize> for SpanGraph {
  fn graph_id(&'a self) -> dot::Id<'a> {
    dot::Id::new("chart").expect("Static graph id is valid.")
  }

  fn node_id(&'a self, n: &usize) -> dot::Id<'a> {
    dot::Id::new(format!("p{}", n)).expect("Position ids are valid.")
  }

  fn node_label(&'a self, n: &usize) -> dot::LabelText<'a> {
    dot::LabelText::LabelStr(Cow::Owned(n.to_string()))
  }

  fn edge_label(&'a self, e: &usize) -> dot::LabelText<'a> {
    dot::LabelText::HtmlStr(Cow::Borrowed(&self.labels[*e]))
  }
}

impl<'a> dot::GraphWalk<'a, usize, usize> for SpanGraph {
  fn nodes(&'a self) -> dot::Nodes<'a, usize> {
    Cow::Borrowed(&self.positions)
  }

  fn edges(&'a self) -> dot::Edges<'a, usize> {
    Cow::Owned((0..self.spans.len()).collect())
  }

  fn source(&'a self, e: &usize) -> usize {
    self.spans[*e].start
  }

  fn target(&'a self, e: &usize) -> usize {
    self.spans[*e].end
  }
}

#[cfg(test)]
mod test {
  use crate::grammar::examples;
  use crate::input;
  use crate::parsers::earley::EarleyRecognizer;

  #[test]
  fn test_dot_output() {
    let g = examples::make_anbn();
    let recognition = EarleyRecognizer::new(&g).run(&input::chars("ab"));
    let dot = recognition.to_dot();
    assert!(dot.starts_with("digraph chart {"));
    assert!(dot.contains("p0 -> p2"));
    assert!(dot.contains("label=<T =&gt; 'a' 'b'>"));
    assert!(!dot.contains("p1 -> p2"));
  }

  #[test]
  fn test_dot_labels_keep_unicode() {
    let g = examples::make_graphemes();
    let input = input::graphemes("he\u{301}llo");
    let recognition = EarleyRecognizer::new(&g).run(&input);
    assert!(recognition.accepted());
    let dot = recognition.to_dot();
    assert!(dot.contains("p0 -> p5"));
    assert!(dot.contains("'h' 'e\u{301}' 'l' 'l' 'o'"));
    assert!(!dot.contains("\\u{301}"));
    assert!(!dot.contains("\\'"));
  }
}
