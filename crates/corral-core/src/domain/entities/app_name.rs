//! Validated application name and its casing variants.

use std::fmt;

use crate::domain::error::DomainError;

/// Names the generator refuses to create an application for.
///
/// Compared case-insensitively. The tool's own name would shadow the `corral`
/// binary inside the generated project's `bin/` directory.
pub const FORBIDDEN_NAMES: &[&str] = &["corral"];

/// Application name as typed by the user, validated.
///
/// Invariant: non-empty, not forbidden, a single path segment made of ASCII
/// alphanumerics, `-` and `_`, not starting with `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppName(String);

impl AppName {
    /// Validate and wrap a name.
    ///
    /// Checks run in a fixed order: empty, forbidden, then shape.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let name = raw.trim();

        if name.is_empty() {
            return Err(DomainError::EmptyName);
        }

        if FORBIDDEN_NAMES
            .iter()
            .any(|forbidden| forbidden.eq_ignore_ascii_case(name))
        {
            return Err(DomainError::ForbiddenName {
                name: name.to_string(),
            });
        }

        let invalid = |reason: &str| DomainError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.starts_with('.') {
            return Err(invalid("name cannot start with '.'"));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(invalid("name cannot contain path separators"));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(invalid(&format!("character '{bad}' is not allowed")));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `hello_world`
    pub fn snake(&self) -> String {
        split_words(&self.0).join("_")
    }

    /// `hello-world`
    pub fn kebab(&self) -> String {
        split_words(&self.0).join("-")
    }

    /// `HelloWorld`
    pub fn pascal(&self) -> String {
        split_words(&self.0)
            .into_iter()
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => {
                        let mut out = String::new();
                        out.extend(first.to_uppercase());
                        out.push_str(chars.as_str());
                        out
                    }
                    None => String::new(),
                }
            })
            .collect()
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AppName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split a string into lowercase words on separators and case transitions.
///
/// `_`, `-` and whitespace always split; `aB` splits between `a` and `B`;
/// `HTTPServer` splits between `P` and `S`.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(next) = chars.peek() {
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
