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

use crate::utils::{Name, ToDoc};

/// A named nonterminal.
///
/// This is the default nonterminal type. Any `OrdKey + ToDoc` type can stand
/// in for it, but names are what the builder helpers accept from `&str`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonTerminal(Name);

impl NonTerminal {
  pub fn new(s: &str) -> Self {
    NonTerminal(Name::new(s))
  }

  pub fn name(&self) -> &Name {
    &self.0
  }
}

impl From<&'_ str> for NonTerminal {
  fn from(s: &str) -> Self {
    NonTerminal::new(s)
  }
}

impl std::fmt::Debug for NonTerminal {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    std::fmt::Debug::fmt(&self.0, fmt)
  }
}

impl ToDoc for NonTerminal {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    da.text(self.0.str().to_string())
  }
}
