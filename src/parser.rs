// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

/*!
The character cursor shared by the wildcard pattern parser and the
reference evaluator.

```
use mushlist::parser::State;

let mut ps = State::new("add(1,2)");
assert_eq!(ps.take_while(|c| c.is_alphanumeric()), "add");
assert!(ps.consume_if_eq('('));
assert_eq!(ps.peek(), Some('1'));
```
*/

/// This is the parser state data structure. It holds the to be read
/// source text and keeps track of the parse head position.
#[derive(Debug, Clone)]
pub struct State {
    input:  Vec<char>,
    ch_ptr: usize,
}

impl State {
    pub fn new(code: &str) -> Self {
        Self { input: code.chars().collect(), ch_ptr: 0 }
    }

    /// Returns the next character under the parse head.
    /// Returns `None` when the parse head is at EOF.
    pub fn peek(&self) -> Option<char> {
        self.input.get(self.ch_ptr).copied()
    }

    /// Returns the character `offs` characters after the parse head.
    pub fn peek_at(&self, offs: usize) -> Option<char> {
        self.input.get(self.ch_ptr + offs).copied()
    }

    /// Returns if the end of the input was reached.
    #[inline]
    pub fn at_end(&self) -> bool { self.ch_ptr >= self.input.len() }

    /// Returns the rest of the text after the parse head,
    /// including the current character under the parse head.
    pub fn rest(&self) -> String {
        self.input[self.ch_ptr..].iter().collect()
    }

    /// Advances the parse head by one character.
    pub fn consume(&mut self) {
        if !self.at_end() { self.ch_ptr += 1; }
    }

    /// Consumes and returns the character under the parse head.
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.peek();
        self.consume();
        c
    }

    pub fn consume_if_eq(&mut self, expected_char: char) -> bool {
        if self.peek() == Some(expected_char) {
            self.consume();
            return true;
        }
        false
    }

    /// Consumes characters while `pred` returns true and returns them.
    pub fn take_while<F>(&mut self, pred: F) -> String
        where F: Fn(char) -> bool {

        let start = self.ch_ptr;
        while self.peek().map(&pred).unwrap_or(false) {
            self.ch_ptr += 1;
        }
        self.input[start..self.ch_ptr].iter().collect()
    }
}
