//! Copying values to the system clipboard through the terminal.
//!
//! Uses the OSC 52 escape sequence, which most terminal emulators (and tmux
//! with `set-clipboard on`) forward to the system clipboard, including over
//! SSH.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::{self, Write};

pub trait Clipboard {
    fn copy(&mut self, text: &str) -> io::Result<()>;
}

pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Osc52Clipboard<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_base64_payload_in_osc52_sequence() {
        let mut clipboard = Osc52Clipboard::new(Vec::new());
        clipboard.copy("800000").unwrap();
        let written = String::from_utf8(clipboard.into_inner()).unwrap();
        assert_eq!(written, "\x1b]52;c;ODAwMDAw\x07");
    }
}
