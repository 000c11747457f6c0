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

//! Small grammars used in documentation and tests.

use super::{build, Grammar, NonTerminal};

/// `T => 'a' 'b' | 'a' <T> 'b'`, the language a^n b^n for n >= 1.
pub fn make_anbn() -> Grammar<char, NonTerminal> {
  let t = NonTerminal::new("T");
  build(&t, |gb| {
    gb.add_rule(&t, |rb| {
      rb.add_term('a').add_term('b');
    })
    .add_rule(&t, |rb| {
      rb.add_term('a').add_nonterm(&t).add_term('b');
    });
  })
  .expect("a^n b^n grammar is valid")
}

/// `S => 'x'`.
pub fn make_single_x() -> Grammar<char, NonTerminal> {
  build("S", |gb| {
    gb.add_rule("S", |rb| {
      rb.add_term('x');
    });
  })
  .expect("single terminal grammar is valid")
}

/// A left-recursive arithmetic grammar over single digits:
///
/// ```text
/// expr => <expr> '+' <term> | <term>
/// term => <term> '*' <factor> | <factor>
/// factor => '(' <expr> ')' | <digit>
/// digit => '0' | ... | '9'
/// ```
pub fn make_arith() -> Grammar<char, NonTerminal> {
  build("expr", |gb| {
    gb.add_rule("expr", |rb| {
      rb.add_nonterm("expr").add_term('+').add_nonterm("term");
    })
    .add_rule("expr", |rb| {
      rb.add_nonterm("term");
    })
    .add_rule("term", |rb| {
      rb.add_nonterm("term").add_term('*').add_nonterm("factor");
    })
    .add_rule("term", |rb| {
      rb.add_nonterm("factor");
    })
    .add_rule("factor", |rb| {
      rb.add_term('(').add_nonterm("expr").add_term(')');
    })
    .add_rule("factor", |rb| {
      rb.add_nonterm("digit");
    });

    for d in '0'..='9' {
      gb.add_rule("digit", |rb| {
        rb.add_term(d);
      });
    }
  })
  .expect("arithmetic grammar is valid")
}

/// `E => <E> '+' <E> | 'n'`, an ambiguous grammar.
pub fn make_ambiguous() -> Grammar<char, NonTerminal> {
  build("E", |gb| {
    gb.add_rule("E", |rb| {
      rb.add_nonterm("E").add_term('+').add_nonterm("E");
    })
    .add_rule("E", |rb| {
      rb.add_term('n');
    });
  })
  .expect("ambiguous grammar is valid")
}

/// `S => 'a' <missing> | 'b'`, where `missing` has no rules.
pub fn make_undefined_reference() -> Grammar<char, NonTerminal> {
  build("S", |gb| {
    gb.add_rule("S", |rb| {
      rb.add_term('a').add_nonterm("missing");
    })
    .add_rule("S", |rb| {
      rb.add_term('b');
    });
  })
  .expect("grammars may reference undefined nonterminals")
}

/// A grammar whose start nonterminal is declared after a rule that can match
/// the whole input on its own:
///
/// ```text
/// word => 'a' 'b'
/// S => <word> '!'
/// ```
///
/// `"ab"` is derivable from `word`, but not from the start `S`.
pub fn make_non_start_match() -> Grammar<char, NonTerminal> {
  build("S", |gb| {
    gb.add_rule("word", |rb| {
      rb.add_term('a').add_term('b');
    })
    .add_rule("S", |rb| {
      rb.add_nonterm("word").add_term('!');
    });
  })
  .expect("non-start grammar is valid")
}

/// Word-level grammar over grapheme clusters: `greeting => 'hé' 'llo'`
/// split per cluster.
pub fn make_graphemes() -> Grammar<String, NonTerminal> {
  build("greeting", |gb| {
    gb.add_rule("greeting", |rb| {
      rb.add_terms(
        vec!["h", "e\u{301}", "l", "l", "o"]
          .into_iter()
          .map(String::from),
      );
    });
  })
  .expect("grapheme grammar is valid")
}
