// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

/*!
Fixed capacity output buffers.

Every function of the library appends its result to an `OutBuf`. The
buffer never grows past its capacity, appends that don't fit are cut at a
character boundary and reported by returning `true`:

```
use mushlist::buffer::OutBuf;

let mut out = OutBuf::new(6);
assert!(!out.push_str("ab"));
assert!(out.push_str("cdefg"));
assert_eq!(out.as_str(), "abcde");
assert!(out.is_full());
```
*/

#[derive(Debug, Clone)]
pub struct OutBuf {
    buf:        String,
    cap:        usize,
    truncated:  bool,
}

impl OutBuf {
    /// Creates a buffer for `buffer_len` bytes. One byte is reserved
    /// for the terminator of the classic buffers, so the usable
    /// capacity is `buffer_len - 1`.
    pub fn new(buffer_len: usize) -> Self {
        let cap = buffer_len.saturating_sub(1);
        Self {
            buf: String::with_capacity(cap.min(1024)),
            cap,
            truncated: false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize { self.buf.len() }
    #[inline]
    pub fn is_empty(&self) -> bool { self.buf.is_empty() }
    #[inline]
    pub fn capacity(&self) -> usize { self.cap }
    #[inline]
    pub fn remaining(&self) -> usize { self.cap - self.buf.len() }
    #[inline]
    pub fn is_full(&self) -> bool { self.buf.len() >= self.cap }

    /// Whether any append so far lost data.
    pub fn truncated(&self) -> bool { self.truncated }

    pub fn as_str(&self) -> &str { &self.buf }
    pub fn into_string(self) -> String { self.buf }

    /// Appends as much of `s` as fits. Returns `true` if `s` was cut.
    pub fn push_str(&mut self, s: &str) -> bool {
        let room = self.remaining();
        if s.len() <= room {
            self.buf.push_str(s);
            return false;
        }

        let mut end = room;
        while end > 0 && !s.is_char_boundary(end) { end -= 1; }
        self.buf.push_str(&s[..end]);
        self.truncated = true;
        true
    }

    pub fn push_char(&mut self, c: char) -> bool {
        if c.len_utf8() > self.remaining() {
            self.truncated = true;
            return true;
        }
        self.buf.push(c);
        false
    }

    /// Appends `n` copies of `c`.
    pub fn push_fill(&mut self, c: char, n: usize) -> bool {
        for _ in 0..n {
            if self.push_char(c) { return true; }
        }
        false
    }

    /// Cuts the buffer back to `len` bytes, used to drop partial output.
    pub fn truncate(&mut self, len: usize) {
        if len < self.buf.len() && self.buf.is_char_boundary(len) {
            self.buf.truncate(len);
        }
    }

    /// The part of the buffer written after position `from`.
    pub fn since(&self, from: usize) -> &str {
        self.buf.get(from..).unwrap_or("")
    }
}

impl std::fmt::Display for OutBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_truncation() {
        let mut o = OutBuf::new(5);
        assert_eq!(o.capacity(), 4);
        assert!(!o.push_str("ab"));
        assert!(o.push_str("cde"));
        assert_eq!(o.as_str(), "abcd");
        assert!(o.is_full());
        assert!(o.truncated());
        assert!(o.push_char('x'));
        assert_eq!(o.len(), 4);
    }

    #[test]
    fn check_utf8_boundary() {
        let mut o = OutBuf::new(4);
        assert!(o.push_str("aäö"));
        assert_eq!(o.as_str(), "aä");
        assert_eq!(o.remaining(), 0);
    }

    #[test]
    fn check_fill_and_since() {
        let mut o = OutBuf::new(10);
        o.push_str("ab");
        assert!(!o.push_fill('-', 3));
        assert_eq!(o.since(2), "---");
        o.truncate(1);
        assert_eq!(o.as_str(), "a");
        assert!(!o.truncated());
    }
}
