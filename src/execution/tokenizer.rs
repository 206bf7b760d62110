//! Quote-aware splitting of command strings into argument words.

/// Split a command string into argument tokens.
///
/// Spaces separate tokens unless they appear inside single or double
/// quotes. A quote only closes on the same character that opened it, and
/// the quote characters themselves are dropped. An unterminated quote runs
/// to the end of the input. Empty tokens are never produced, so `''` or
/// `""` on their own contribute nothing.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == ' ' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
