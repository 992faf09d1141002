// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

/*!
The register frame stack.

Every callback invocation and every iteration level pushes a `RegFrame`.
Lookups walk the stack from the top down to the nearest frame that owns
the requested kind of register. A `NEWATTR` frame marks the boundary of a
user function call, iteration introspection does not look past it.

The bottom frame is a q-register scope that lives as long as the stack,
so frame indices handed out by `push` stay valid.
*/

use fnv::FnvHashMap;

pub const RF_Q:        u32 = 0x01;
pub const RF_ARG:      u32 = 0x02;
pub const RF_ITER:     u32 = 0x04;
pub const RF_REGEXP:   u32 = 0x08;
pub const RF_NEWATTR:  u32 = 0x10;
pub const RF_IBREAK:   u32 = 0x20;

#[derive(Debug, Clone, Default)]
pub struct RegFrame {
    pub flags:      u32,
    pub args:       Vec<String>,
    pub qregs:      FnvHashMap<String, String>,
    pub itext:      String,
    pub inum:       usize,
    pub captures:   Vec<Option<String>>,
    pub named:      FnvHashMap<String, String>,
    /// What pushed the frame, used in log output only.
    pub label:      &'static str,
}

impl RegFrame {
    pub fn new(flags: u32, label: &'static str) -> Self {
        Self { flags, label, ..Default::default() }
    }

    /// A callback frame with positional arguments.
    pub fn with_args(flags: u32, label: &'static str, args: Vec<String>) -> Self {
        Self { flags: flags | RF_ARG, label, args, ..Default::default() }
    }

    pub fn has(&self, flag: u32) -> bool { self.flags & flag != 0 }
}

#[derive(Debug, Clone)]
pub struct RegStack {
    frames: Vec<RegFrame>,
}

impl Default for RegStack {
    fn default() -> Self { Self::new() }
}

impl RegStack {
    pub fn new() -> Self {
        Self { frames: vec![RegFrame::new(RF_Q, "qregs")] }
    }

    /// Number of frames pushed above the base frame.
    pub fn depth(&self) -> usize { self.frames.len() - 1 }

    /// Drops all pushed frames and the base q-registers.
    pub fn clear(&mut self) {
        self.frames.truncate(1);
        self.frames[0].qregs.clear();
    }

    /// Pushes a frame and returns its index.
    pub fn push(&mut self, frame: RegFrame) -> usize {
        log::trace!("push frame {} ({:#x}) at {}", frame.label, frame.flags, self.frames.len());
        self.frames.push(frame);
        self.frames.len() - 1
    }

    /// Pops the frame at `idx` and everything above it. The base frame
    /// is never popped.
    pub fn pop_to(&mut self, idx: usize) {
        while self.frames.len() > idx.max(1) {
            if let Some(f) = self.frames.pop() {
                log::trace!("pop frame {} at {}", f.label, self.frames.len());
            }
        }
    }

    pub fn frame(&self, idx: usize) -> Option<&RegFrame> { self.frames.get(idx) }
    pub fn frame_mut(&mut self, idx: usize) -> Option<&mut RegFrame> { self.frames.get_mut(idx) }

    fn nearest(&self, flag: u32) -> Option<&RegFrame> {
        self.frames.iter().rev().find(|f| f.has(flag))
    }

    fn nearest_mut(&mut self, flag: u32) -> Option<&mut RegFrame> {
        self.frames.iter_mut().rev().find(|f| f.has(flag))
    }

    /// `%0` to `%9`. Missing arguments are empty.
    pub fn arg(&self, i: usize) -> &str {
        self.nearest(RF_ARG)
            .and_then(|f| f.args.get(i))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    pub fn get_q(&self, name: &str) -> &str {
        let name = name.to_ascii_lowercase();
        self.frames.iter().rev()
            .filter(|f| f.has(RF_Q))
            .find_map(|f| f.qregs.get(&name))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    /// Sets a q-register in the nearest q-register scope, the base
    /// frame if nothing above it has one.
    pub fn set_q(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(f) = self.nearest_mut(RF_Q) {
            f.qregs.insert(name, value.to_string());
        }
    }

    /// Indices of the `ITER` frames above the nearest `NEWATTR`
    /// boundary, innermost first.
    fn iter_frames(&self) -> Vec<usize> {
        let mut v = vec![];
        for (i, f) in self.frames.iter().enumerate().rev() {
            if f.has(RF_ITER) { v.push(i); }
            if f.has(RF_NEWATTR) { break; }
        }
        v
    }

    /// The nesting level of the innermost iteration, -1 outside of one.
    pub fn ilev(&self) -> i64 {
        self.iter_frames().len() as i64 - 1
    }

    /// The element at iteration level `n`, 0 being the innermost.
    pub fn itext(&self, n: usize) -> Option<&str> {
        let idx = *self.iter_frames().get(n)?;
        Some(self.frames[idx].itext.as_str())
    }

    pub fn inum(&self, n: usize) -> Option<usize> {
        let idx = *self.iter_frames().get(n)?;
        Some(self.frames[idx].inum)
    }

    /// Marks up to `n` enclosing iterations for an early break.
    pub fn ibreak(&mut self, n: usize) {
        let mut left = n;
        for f in self.frames.iter_mut().rev() {
            if left == 0 { break; }
            if f.has(RF_ITER) {
                f.flags |= RF_IBREAK;
                left -= 1;
            }
            if f.has(RF_NEWATTR) { break; }
        }
    }

    /// Whether the frame at `idx` got an early break signal.
    pub fn is_broken(&self, idx: usize) -> bool {
        self.frames.get(idx).map(|f| f.has(RF_IBREAK)).unwrap_or(false)
    }

    /// `$n` of the nearest capture scope.
    pub fn capture(&self, i: usize) -> &str {
        self.nearest(RF_REGEXP)
            .and_then(|f| f.captures.get(i))
            .and_then(|c| c.as_deref())
            .unwrap_or("")
    }

    /// `$<name>` of the nearest capture scope.
    pub fn named_capture(&self, name: &str) -> &str {
        self.nearest(RF_REGEXP)
            .and_then(|f| f.named.get(name))
            .map(|s| s.as_str())
            .unwrap_or("")
    }
}
