//! Named-placeholder prompt templates
//!
//! A template is plain text with `{name}` placeholders. Literal braces are
//! written as `{{` and `}}`. The declared input variables must match the
//! placeholders in the text exactly, and rendering must be given exactly
//! those keys, no more and no fewer.

use crate::error::{FormchatError, Result};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};

const PLACEHOLDER_PATTERN: &str = r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed prompt template with a fixed set of input variables
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use formchat::prompts::PromptTemplate;
///
/// let template = PromptTemplate::new("greeting", &["name"], "Hello, {name}!").unwrap();
/// let values = HashMap::from([("name", "Ada")]);
/// assert_eq!(template.render(&values).unwrap(), "Hello, Ada!");
/// ```
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    name: String,
    variables: BTreeSet<String>,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse a template and check it against its declared input variables
    ///
    /// # Errors
    ///
    /// Returns `FormchatError::Template` if the text contains an unmatched
    /// brace, or if the placeholders found differ from `input_variables`.
    pub fn new(name: impl Into<String>, input_variables: &[&str], text: &str) -> Result<Self> {
        let name = name.into();
        let pattern = Regex::new(PLACEHOLDER_PATTERN)
            .map_err(|e| FormchatError::Template(format!("invalid placeholder pattern: {}", e)))?;

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut found = BTreeSet::new();
        let mut cursor = 0;

        for captures in pattern.captures_iter(text) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            push_literal(&name, &mut literal, &text[cursor..whole.start()])?;
            cursor = whole.end();

            match captures.get(1) {
                Some(key) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    found.insert(key.as_str().to_string());
                    segments.push(Segment::Placeholder(key.as_str().to_string()));
                }
                None if whole.as_str() == "{{" => literal.push('{'),
                None => literal.push('}'),
            }
        }
        push_literal(&name, &mut literal, &text[cursor..])?;
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let declared: BTreeSet<String> = input_variables.iter().map(|v| v.to_string()).collect();
        if declared != found {
            return Err(FormchatError::Template(format!(
                "template '{}' declares {} but uses {}",
                name,
                join_keys(declared.iter().map(String::as_str)),
                join_keys(found.iter().map(String::as_str))
            ))
            .into());
        }

        Ok(Self {
            name,
            variables: declared,
            segments,
        })
    }

    /// Template name, used in logs and error messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the template uses the given placeholder
    pub fn uses(&self, key: &str) -> bool {
        self.variables.contains(key)
    }

    /// Substitute every placeholder
    ///
    /// # Errors
    ///
    /// Returns `FormchatError::Template` if `values` is missing a declared
    /// variable or supplies a key the template does not declare.
    pub fn render(&self, values: &HashMap<&str, &str>) -> Result<String> {
        let missing: Vec<&str> = self
            .variables
            .iter()
            .map(String::as_str)
            .filter(|key| !values.contains_key(key))
            .collect();
        let mut unexpected: Vec<&str> = values
            .keys()
            .copied()
            .filter(|key| !self.variables.contains(*key))
            .collect();
        unexpected.sort_unstable();

        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(FormchatError::Template(format!(
                "template '{}' rendered with missing keys {} and unexpected keys {}",
                self.name,
                join_keys(missing.into_iter()),
                join_keys(unexpected.into_iter())
            ))
            .into());
        }

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(key) => out.push_str(values.get(key.as_str()).unwrap_or(&"")),
            }
        }
        Ok(out)
    }
}

fn push_literal(name: &str, literal: &mut String, text: &str) -> Result<()> {
    if let Some(offset) = text.find(['{', '}']) {
        return Err(FormchatError::Template(format!(
            "template '{}' has an unmatched brace near '{}'",
            name,
            &text[offset..].chars().take(20).collect::<String>()
        ))
        .into());
    }
    literal.push_str(text);
    Ok(())
}

fn join_keys<'a>(keys: impl Iterator<Item = &'a str>) -> String {
    let keys: Vec<&str> = keys.collect();
    if keys.is_empty() {
        "[]".to_string()
    } else {
        format!("[{}]", keys.join(", "))
    }
}
