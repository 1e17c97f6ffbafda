//! Chunk stitching.
//!
//! Joins template chunks with placeholder identifiers. A placeholder in code
//! position gets a trailing newline so that automatic semicolon insertion
//! separates a statement-position hole from the following chunk (`a++;
//! ${false} b++` must parse as three statements). Inside strings, template
//! text, and comments the newline would corrupt the literal, so a small
//! lexical state tracker follows the chunks and suppresses it there. The one
//! carve-out in code position is a following `++`/`--`, whose grammar forbids
//! a preceding line terminator.

use crate::error::{Error, Result};

pub(super) fn stitch(chunks: &[&str], holes: usize) -> Result<String> {
    if chunks.len() != holes + 1 {
        return Err(Error::Template(format!(
            "template needs {} chunks for {holes} holes, got {}",
            holes + 1,
            chunks.len()
        )));
    }
    let mut out =
        String::with_capacity(chunks.iter().map(|c| c.len()).sum::<usize>() + holes * 16);
    let mut state = LexState::default();
    for (i, chunk) in chunks.iter().enumerate() {
        out.push_str(chunk);
        state.feed(chunk);
        if i < holes {
            out.push_str(&super::placeholder_name(i));
            if state.is_code() && !starts_with_update_op(chunks[i + 1]) {
                out.push('\n');
            }
        }
    }
    Ok(out)
}

fn starts_with_update_op(chunk: &str) -> bool {
    let t = chunk.trim_start();
    t.starts_with("++") || t.starts_with("--")
}

#[derive(Default)]
struct LexState {
    mode: Mode,
    /// Brace depth of each open `${` interpolation, innermost last.
    interp: Vec<u32>,
    pending_slash: bool,
    pending_dollar: bool,
}

#[derive(Default, PartialEq)]
enum Mode {
    #[default]
    Code,
    Str {
        quote: char,
        escaped: bool,
    },
    Template {
        escaped: bool,
    },
    LineComment,
    BlockComment {
        star: bool,
    },
}

impl LexState {
    fn is_code(&self) -> bool {
        self.mode == Mode::Code
    }

    fn feed(&mut self, text: &str) {
        for c in text.chars() {
            self.advance(c);
        }
    }

    fn advance(&mut self, c: char) {
        match &mut self.mode {
            Mode::Code => {
                if self.pending_slash {
                    self.pending_slash = false;
                    match c {
                        '/' => {
                            self.mode = Mode::LineComment;
                            return;
                        }
                        '*' => {
                            self.mode = Mode::BlockComment { star: false };
                            return;
                        }
                        _ => {}
                    }
                }
                match c {
                    '/' => self.pending_slash = true,
                    '\'' | '"' => {
                        self.mode = Mode::Str {
                            quote: c,
                            escaped: false,
                        }
                    }
                    '`' => self.mode = Mode::Template { escaped: false },
                    '{' => {
                        if let Some(depth) = self.interp.last_mut() {
                            *depth += 1;
                        }
                    }
                    '}' => match self.interp.last_mut() {
                        Some(0) => {
                            self.interp.pop();
                            self.mode = Mode::Template { escaped: false };
                        }
                        Some(depth) => *depth -= 1,
                        None => {}
                    },
                    _ => {}
                }
            }
            Mode::Str { quote, escaped } => {
                if *escaped {
                    *escaped = false;
                } else if c == '\\' {
                    *escaped = true;
                } else if c == *quote || c == '\n' {
                    self.mode = Mode::Code;
                }
            }
            Mode::Template { escaped } => {
                if *escaped {
                    *escaped = false;
                    self.pending_dollar = false;
                } else if c == '\\' {
                    *escaped = true;
                } else if c == '`' {
                    self.mode = Mode::Code;
                    self.pending_dollar = false;
                } else if self.pending_dollar && c == '{' {
                    self.pending_dollar = false;
                    self.interp.push(0);
                    self.mode = Mode::Code;
                } else {
                    self.pending_dollar = c == '$';
                }
            }
            Mode::LineComment => {
                if c == '\n' {
                    self.mode = Mode::Code;
                }
            }
            Mode::BlockComment { star } => {
                if *star && c == '/' {
                    self.mode = Mode::Code;
                } else {
                    *star = c == '*';
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_chunks_with_placeholders() {
        let s = stitch(&["a = ", " + ", ";"], 2).unwrap();
        assert_eq!(s, "a = __cg_hole_0\n + __cg_hole_1\n;");
    }

    #[test]
    fn rejects_mismatched_counts() {
        assert!(matches!(stitch(&["a"], 1), Err(Error::Template(_))));
    }

    #[test]
    fn no_newline_inside_strings() {
        let s = stitch(&["f('hi ", "')"], 1).unwrap();
        assert_eq!(s, "f('hi __cg_hole_0')");
    }

    #[test]
    fn no_newline_inside_template_text() {
        let s = stitch(&["`a ", " b`"], 1).unwrap();
        assert_eq!(s, "`a __cg_hole_0 b`");
    }

    #[test]
    fn newline_inside_template_interpolation() {
        let s = stitch(&["`a ${", "} b`"], 1).unwrap();
        assert_eq!(s, "`a ${__cg_hole_0\n} b`");
    }

    #[test]
    fn no_newline_before_postfix_update() {
        let s = stitch(&["", "++"], 1).unwrap();
        assert_eq!(s, "__cg_hole_0++");
    }

    #[test]
    fn no_newline_inside_comments() {
        let s = stitch(&["a; // ", "\nb;"], 1).unwrap();
        assert_eq!(s, "a; // __cg_hole_0\nb;");
    }

    #[test]
    fn statement_separation_via_asi() {
        let s = stitch(&["a++; ", " b++"], 1).unwrap();
        assert_eq!(s, "a++; __cg_hole_0\n b++");
    }
}
