//! Free-text query translation
//!
//! Accepts a small, safe query language and renders it as an FTS5 match
//! expression:
//!
//! - `dev` - term, `dev*` - prefix, `"senior dev"` - phrase
//! - `jobTitle:dev` - term restricted to one field
//! - `AND`, `OR`, `NOT` (upper case) and parentheses
//!
//! Every term is re-quoted, so FTS5 syntax characters in user input are
//! always matched literally. An empty query or `*` matches everything.

use std::iter::Peekable;
use std::str::Chars;

use super::error::SearchError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Operator(&'static str),
    Term {
        field: Option<String>,
        text: String,
        prefix: bool,
    },
}

/// Translate user input into an FTS5 expression; `None` means match all
pub fn translate(input: &str, fields: &[&str]) -> Result<Option<String>, SearchError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "*" {
        return Ok(None);
    }

    let tokens = tokenize(trimmed)?;
    validate(&tokens)?;

    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        out.push(match token {
            Token::Open => "(".to_string(),
            Token::Close => ")".to_string(),
            Token::Operator(op) => op.to_string(),
            Token::Term {
                field,
                text,
                prefix,
            } => {
                if let Some(field) = &field
                    && !fields.contains(&field.as_str())
                {
                    return Err(invalid(format!("unknown field '{}'", field)));
                }
                let mut term = format!("\"{}\"", text.replace('"', "\"\""));
                if prefix {
                    term.push_str(" *");
                }
                match field {
                    Some(field) => format!("{} : {}", field, term),
                    None => term,
                }
            }
        });
    }
    Ok(Some(out.join(" ")))
}

fn invalid(reason: impl Into<String>) -> SearchError {
    SearchError::InvalidQuery(reason.into())
}

fn tokenize(input: &str) -> Result<Vec<Token>, SearchError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            _ => tokens.push(read_word(&mut chars)?),
        }
    }
    Ok(tokens)
}

/// Read one word: optional `field:` prefix, bare or quoted text, optional trailing `*`
fn read_word(chars: &mut Peekable<Chars<'_>>) -> Result<Token, SearchError> {
    let mut field = None;
    let mut text = String::new();
    let mut quoted = false;
    let mut tail_star = false;

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() || c == '(' || c == ')' {
            break;
        }
        chars.next();
        match c {
            '"' => {
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => text.push(c),
                        None => return Err(invalid("unterminated quote")),
                    }
                }
                quoted = true;
                tail_star = false;
            }
            ':' if field.is_none() && !quoted && !text.is_empty() => {
                field = Some(std::mem::take(&mut text));
                tail_star = false;
            }
            c => {
                text.push(c);
                tail_star = c == '*';
            }
        }
    }

    if field.is_none() && !quoted {
        match text.as_str() {
            "AND" => return Ok(Token::Operator("AND")),
            "OR" => return Ok(Token::Operator("OR")),
            "NOT" => return Ok(Token::Operator("NOT")),
            _ => {}
        }
    }
    if tail_star {
        text.pop();
    }
    if text.trim().is_empty() {
        return Err(invalid("empty search term"));
    }
    Ok(Token::Term {
        field,
        text,
        prefix: tail_star,
    })
}

/// Operators need an operand on both sides; parentheses must balance
fn validate(tokens: &[Token]) -> Result<(), SearchError> {
    let mut depth = 0usize;
    // true when the previous token ends an operand
    let mut after_operand = false;

    for token in tokens {
        match token {
            Token::Open => {
                depth += 1;
                after_operand = false;
            }
            Token::Close => {
                if depth == 0 {
                    return Err(invalid("unbalanced ')'"));
                }
                if !after_operand {
                    return Err(invalid("empty group or dangling operator"));
                }
                depth -= 1;
            }
            Token::Operator(op) => {
                if !after_operand {
                    return Err(invalid(format!("'{}' needs a term on its left", op)));
                }
                after_operand = false;
            }
            Token::Term { .. } => after_operand = true,
        }
    }

    if depth > 0 {
        return Err(invalid("unbalanced '('"));
    }
    if !after_operand {
        return Err(invalid("query ends with an operator"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[&str] = &["id", "jobTitle", "minSalary"];

    fn ok(input: &str) -> String {
        translate(input, FIELDS).unwrap().unwrap()
    }

    fn err(input: &str) -> String {
        match translate(input, FIELDS) {
            Err(SearchError::InvalidQuery(reason)) => reason,
            other => panic!("expected invalid query for {:?}, got {:?}", input, other),
        }
    }

    #[test]
    fn test_match_all() {
        assert_eq!(translate("", FIELDS).unwrap(), None);
        assert_eq!(translate("  * ", FIELDS).unwrap(), None);
    }

    #[test]
    fn test_terms_and_prefixes_are_quoted() {
        assert_eq!(ok("dev"), "\"dev\"");
        assert_eq!(ok("dev*"), "\"dev\" *");
        assert_eq!(ok("dev ops"), "\"dev\" \"ops\"");
    }

    #[test]
    fn test_phrases() {
        assert_eq!(ok("\"senior dev\""), "\"senior dev\"");
        assert_eq!(ok("jobTitle:\"senior dev\""), "jobTitle : \"senior dev\"");
        assert_eq!(ok("\"a:b\""), "\"a:b\"");
    }

    #[test]
    fn test_field_terms() {
        assert_eq!(ok("jobTitle:dev*"), "jobTitle : \"dev\" *");
        assert_eq!(err("salary:10"), "unknown field 'salary'");
    }

    #[test]
    fn test_operators_and_groups() {
        assert_eq!(
            ok("(dev OR ops) AND lead"),
            "( \"dev\" OR \"ops\" ) AND \"lead\""
        );
        assert_eq!(ok("dev NOT ops"), "\"dev\" NOT \"ops\"");
        assert_eq!(ok("\"AND\""), "\"AND\"");
    }

    #[test]
    fn test_syntax_characters_are_literal() {
        assert_eq!(ok("c++"), "\"c++\"");
        assert_eq!(ok("NEAR/2"), "\"NEAR/2\"");
    }

    #[test]
    fn test_rejects_malformed_queries() {
        err("OR dev");
        err("dev AND");
        err("dev AND OR ops");
        err("(dev");
        err("dev)");
        err("()");
        err("\"open");
        err("jobTitle:");
    }
}
