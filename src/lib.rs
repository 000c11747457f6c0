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

//! An Earley recognizer for arbitrary context-free grammars.
//!
//! Build a [`grammar::Grammar`] with [`grammar::build`], then ask whether an
//! input belongs to its language:
//!
//! ```rust
//! use gearley::grammar::{build, Grammar, NonTerminal};
//!
//! let g: Grammar<char, NonTerminal> = build("T", |gb| {
//!   gb.add_rule("T", |rb| {
//!     rb.add_term('a').add_term('b');
//!   })
//!   .add_rule("T", |rb| {
//!     rb.add_term('a').add_nonterm("T").add_term('b');
//!   });
//! })
//! .unwrap();
//!
//! assert!(gearley::recognize(&g, &gearley::input::chars("aabb")));
//! assert!(!gearley::recognize(&g, &gearley::input::chars("abba")));
//! ```

#[macro_use]
extern crate derivative;

pub mod grammar;
pub mod input;
pub mod parsers;
pub mod state;
pub mod utils;

pub use parsers::{
  earley::{recognize, Chart, EarleyRecognizer, Recognition, Span, StateSet},
  Recognizer,
};
