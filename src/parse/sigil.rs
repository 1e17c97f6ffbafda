//! `@`/`#` sigil tunneling.
//!
//! Sigil identifiers are not valid ECMAScript, so the adapter rewrites them to
//! identifiers the parser accepts before parsing and restores the sigil when
//! lowering identifier names. The scan skips string literals, template quasis,
//! and comments so sigil characters in text are left alone. Regex literal
//! bodies are not lexed.

const AT_TUNNEL: &str = "__cg_at__";
const HASH_TUNNEL: &str = "__cg_hash__";

/// Rewrite `@name` / `#name` occurrences in code positions to tunneled
/// identifiers.
pub(crate) fn tunnel(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 16);
    let mut chars = source.chars().peekable();

    // Brace depth of each open `${` interpolation, innermost last. Code at
    // depth zero of the innermost entry returns to template text on `}`.
    let mut interpolations: Vec<u32> = Vec::new();

    'code: while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                out.push(c);
                copy_string(&mut out, &mut chars, c);
            }
            '`' => {
                out.push(c);
                // Template text until the closing backtick or a `${`.
                while let Some(t) = chars.next() {
                    out.push(t);
                    match t {
                        '\\' => {
                            if let Some(esc) = chars.next() {
                                out.push(esc);
                            }
                        }
                        '`' => continue 'code,
                        '$' if chars.peek() == Some(&'{') => {
                            out.push(chars.next().unwrap());
                            interpolations.push(0);
                            continue 'code;
                        }
                        _ => {}
                    }
                }
            }
            '{' => {
                if let Some(depth) = interpolations.last_mut() {
                    *depth += 1;
                }
                out.push(c);
            }
            '}' => {
                match interpolations.last_mut() {
                    Some(0) => {
                        // Close of an interpolation: resume template text by
                        // re-entering the backtick loop.
                        interpolations.pop();
                        out.push(c);
                        while let Some(t) = chars.next() {
                            out.push(t);
                            match t {
                                '\\' => {
                                    if let Some(esc) = chars.next() {
                                        out.push(esc);
                                    }
                                }
                                '`' => continue 'code,
                                '$' if chars.peek() == Some(&'{') => {
                                    out.push(chars.next().unwrap());
                                    interpolations.push(0);
                                    continue 'code;
                                }
                                _ => {}
                            }
                        }
                    }
                    Some(depth) => {
                        *depth -= 1;
                        out.push(c);
                    }
                    None => out.push(c),
                }
            }
            '/' => match chars.peek() {
                Some('/') => {
                    out.push(c);
                    for t in chars.by_ref() {
                        out.push(t);
                        if t == '\n' {
                            break;
                        }
                    }
                }
                Some('*') => {
                    out.push(c);
                    out.push(chars.next().unwrap());
                    let mut prev = '\0';
                    for t in chars.by_ref() {
                        out.push(t);
                        if prev == '*' && t == '/' {
                            break;
                        }
                        prev = t;
                    }
                }
                _ => out.push(c),
            },
            '@' | '#' if chars.peek().is_some_and(|&n| is_ident_start(n)) => {
                out.push_str(if c == '@' { AT_TUNNEL } else { HASH_TUNNEL });
            }
            _ => out.push(c),
        }
    }

    out
}

fn copy_string(out: &mut String, chars: &mut std::iter::Peekable<std::str::Chars>, quote: char) {
    while let Some(c) = chars.next() {
        out.push(c);
        match c {
            '\\' => {
                if let Some(esc) = chars.next() {
                    out.push(esc);
                }
            }
            c if c == quote => return,
            _ => {}
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Undo [`tunnel`] on a single identifier name.
pub(crate) fn restore(name: &str) -> String {
    if let Some(rest) = name.strip_prefix(AT_TUNNEL) {
        format!("@{rest}")
    } else if let Some(rest) = name.strip_prefix(HASH_TUNNEL) {
        format!("#{rest}")
    } else {
        name.to_string()
    }
}
