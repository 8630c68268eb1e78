//! A minimal reference query-string parser producing the external tree
//! shape the Translator consumes (§4.7). Not part of the invariant surface:
//! callers may supply their own parser and skip this module entirely (§1).
//!
//! Grammar, informally:
//! ```text
//! group    := term*
//! term     := sign? ( field ':' )? value
//! sign     := '+' | '-'
//! value    := '"' .. '"' | '(' group ')' | bareword
//! ```
//! `implicitPlus` decides whether an unsigned bareword joins the mandatory
//! or the optional bucket.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{Error, ErrorKind, Result};
use crate::query::tree::{FieldValue, Group, SubQuery};

pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Parser
    }

    pub fn parse(&self, query: &str, implicit_plus: bool) -> Result<Group> {
        let mut chars = query.chars().peekable();
        let group = parse_group(&mut chars, implicit_plus, false)?;
        Ok(group)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_group(chars: &mut Peekable<Chars>, implicit_plus: bool, nested: bool) -> Result<Group> {
    let mut group = Group::default();

    loop {
        skip_whitespace(chars);
        match chars.peek() {
            None => break,
            Some(')') if nested => break,
            Some(')') => {
                return Err(Error::new(ErrorKind::BadRegex, "unmatched ')' in query"));
            }
            _ => {}
        }

        let sign = match chars.peek() {
            Some('+') => {
                chars.next();
                Sign::Mandatory
            }
            Some('-') => {
                chars.next();
                Sign::Negative
            }
            _ => {
                if implicit_plus {
                    Sign::Mandatory
                } else {
                    Sign::Optional
                }
            }
        };

        skip_whitespace(chars);
        if chars.peek() == Some(&'(') {
            chars.next();
            let inner = parse_group(chars, implicit_plus, true)?;
            skip_whitespace(chars);
            if chars.next() != Some(')') {
                return Err(Error::new(ErrorKind::BadRegex, "unterminated '(' in query"));
            }
            push(&mut group, sign, SubQuery::Paren(Box::new(inner)));
            continue;
        }

        let token = read_token(chars);
        if token.is_empty() {
            break;
        }

        let (field, rest) = split_field(&token);
        let value = if rest.starts_with('"') {
            FieldValue::Single(rest.trim_matches('"').to_string())
        } else {
            FieldValue::Single(rest.to_string())
        };
        push(&mut group, sign, SubQuery::Field { field, value });
    }

    Ok(group)
}

enum Sign {
    Mandatory,
    Optional,
    Negative,
}

fn push(group: &mut Group, sign: Sign, sub: SubQuery) {
    match sign {
        Sign::Mandatory => group.mandatory.push(sub),
        Sign::Optional => group.optional.push(sub),
        Sign::Negative => group.negative.push(sub),
    }
}

fn skip_whitespace(chars: &mut Peekable<Chars>) {
    while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
        chars.next();
    }
}

/// Reads one bareword or one quoted phrase (quotes included), stopping at
/// unescaped whitespace or an unquoted `(`/`)`.
fn read_token(chars: &mut Peekable<Chars>) -> String {
    let mut token = String::new();

    if chars.peek() == Some(&'"') {
        token.push(chars.next().unwrap());
        for c in chars.by_ref() {
            token.push(c);
            if c == '"' {
                break;
            }
        }
        return token;
    }

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() || c == '(' || c == ')' {
            break;
        }
        token.push(c);
        chars.next();
    }
    token
}

/// Splits `field:value` on the first unquoted `:`; returns `(None, token)`
/// when there's no field prefix.
fn split_field(token: &str) -> (Option<String>, &str) {
    if token.starts_with('"') {
        return (None, token);
    }
    match token.find(':') {
        Some(idx) => (Some(token[..idx].to_string()), &token[idx + 1..]),
        None => (None, token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_words_with_implicit_plus_are_mandatory() {
        let group = Parser::new().parse("brown fox", true).unwrap();
        assert_eq!(group.mandatory.len(), 2);
        assert!(group.optional.is_empty());
    }

    #[test]
    fn bare_words_without_implicit_plus_are_optional() {
        let group = Parser::new().parse("brown fox", false).unwrap();
        assert_eq!(group.optional.len(), 2);
        assert!(group.mandatory.is_empty());
    }

    #[test]
    fn explicit_signs_override_implicit_plus() {
        let group = Parser::new().parse("+brown -dogs", false).unwrap();
        assert_eq!(group.mandatory.len(), 1);
        assert_eq!(group.negative.len(), 1);
    }

    #[test]
    fn quoted_phrase_becomes_a_single_subquery_value() {
        let group = Parser::new().parse("\"quick brown\"", true).unwrap();
        assert_eq!(group.mandatory.len(), 1);
        match &group.mandatory[0] {
            SubQuery::Field { field: None, value: FieldValue::Single(s) } => {
                assert_eq!(s, "quick brown")
            }
            other => panic!("unexpected subquery: {other:?}"),
        }
    }

    #[test]
    fn field_prefix_is_parsed_out() {
        let group = Parser::new().parse("title:rust", true).unwrap();
        match &group.mandatory[0] {
            SubQuery::Field { field, value: FieldValue::Single(s) } => {
                assert_eq!(field.as_deref(), Some("title"));
                assert_eq!(s, "rust");
            }
            other => panic!("unexpected subquery: {other:?}"),
        }
    }

    #[test]
    fn parenthesized_group_nests() {
        let group = Parser::new().parse("+(brown fox) -dogs", false).unwrap();
        assert_eq!(group.mandatory.len(), 1);
        assert!(matches!(&group.mandatory[0], SubQuery::Paren(_)));
        assert_eq!(group.negative.len(), 1);
    }
}
