//! Quote-aware line tokenizer.
//!
//! Splits on ASCII spaces, groups double-quoted segments into a single
//! token, and never fails: an unterminated quote swallows the rest of the
//! line.

/// Tokenize a command line.
///
/// - Runs of unquoted spaces separate tokens and never produce empty ones.
/// - `"..."` keeps its contents (spaces included) as one token. The quote
///   characters themselves are dropped.
/// - A closing quote always emits the quoted text, so `""` yields an empty
///   token.
/// - An opening quote with no partner consumes the remainder of the line.
///
/// Case is preserved; see [`command_name`] for the upper-cased command word.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut sticky = String::new();
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' if quoted => {
                tokens.push(std::mem::take(&mut sticky));
                quoted = false;
            },
            '"' => quoted = true,
            ' ' if !quoted => {
                if !sticky.is_empty() {
                    tokens.push(std::mem::take(&mut sticky));
                }
            },
            _ => sticky.push(ch),
        }
    }

    if !sticky.is_empty() {
        tokens.push(sticky);
    }

    tokens
}

/// The dispatch name for a token list: its first token, ASCII upper-cased.
pub fn command_name(tokens: &[String]) -> Option<String> {
    tokens.first().map(|t| t.to_ascii_uppercase())
}
