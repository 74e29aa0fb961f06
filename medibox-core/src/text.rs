//! Bounded text helpers

use core::fmt::{self, Write};

use heapless::String;

/// Copy `text` into a fixed-capacity string, cutting at the last char
/// boundary that fits
pub fn bounded<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    let mut end = text.len().min(N);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    // `end <= N` and lies on a char boundary, so this cannot fail
    let _ = out.push_str(&text[..end]);
    out
}

/// Format into a fixed-capacity string, keeping whatever fits
pub fn format_bounded<const N: usize>(args: fmt::Arguments<'_>) -> String<N> {
    let mut out = String::new();
    let _ = Truncating(&mut out).write_fmt(args);
    out
}

/// Writer that fills up char by char and stops at capacity
struct Truncating<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            self.0.push(ch).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}
