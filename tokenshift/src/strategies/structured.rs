//! Structural rewriting for JSON and YAML.
//!
//! Both formats are parsed into the same tree, `serde_json::Value` with an
//! insertion-ordered object map, and go through one recursive [`rewrite_value`]:
//! object keys containing the token are renamed in place, strings are substring-replaced,
//! arrays are mapped element by element and other scalars pass through.
//!
//! Text that does not parse is returned unchanged with a warning. There is no textual
//! fallback. A tree that comes out identical to what went in is not re-serialized, so
//! files without the token keep their exact formatting.
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::trace;

use super::rules::token_regex;
use super::Rewritten;
use crate::errors::RenameResult;
use crate::options::{RenameMap, RenameOptions};

fn replace_all(regex: &regex::Regex, text: String, new: &str) -> String {
    if !regex.is_match(&text) {
        return text;
    }
    regex.replace_all(&text, regex::NoExpand(new)).into_owned()
}

fn rewrite_with(value: Value, regex: &regex::Regex, new: &str) -> Value {
    match value {
        Value::String(s) => Value::String(replace_all(regex, s, new)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| rewrite_with(item, regex, new))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, item)| (replace_all(regex, key, new), rewrite_with(item, regex, new)))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

/// Applies every pair of `map`, in order, to the whole tree
pub fn rewrite_value(value: Value, map: &RenameMap, case_sensitive: bool) -> RenameResult<Value> {
    let mut current = value;
    for pair in map {
        let regex = token_regex(&pair.old, case_sensitive)?;
        current = rewrite_with(current, &regex, &pair.new);
    }
    Ok(current)
}

fn match_trailing_newline(original: &str, mut output: String) -> String {
    let wanted = original.ends_with('\n');
    let has = output.ends_with('\n');
    if wanted && !has {
        output.push('\n');
    } else if !wanted && has {
        output.pop();
    }
    output
}

/// Rewrites a JSON document, re-emitting it with 2-space indentation when it changed
pub fn rewrite_json(text: &str, options: &RenameOptions) -> RenameResult<Rewritten> {
    let parsed: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => return Ok(Rewritten::skipped(text, format!("Skipping unparsable JSON: {}", e))),
    };

    let rewritten = rewrite_value(parsed.clone(), &options.rename_map, options.case_sensitive)?;
    if rewritten == parsed {
        trace!("JSON tree unchanged");
        return Ok(Rewritten::new(text.to_string()));
    }

    let output = serde_json::to_string_pretty(&rewritten)?;
    Ok(Rewritten::new(match_trailing_newline(text, output)))
}

/// Rewrites a YAML stream, one document at a time
pub fn rewrite_yaml(text: &str, options: &RenameOptions) -> RenameResult<Rewritten> {
    if text.trim().is_empty() {
        return Ok(Rewritten::new(text.to_string()));
    }

    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        match Value::deserialize(document) {
            Ok(value) => documents.push(value),
            Err(e) => {
                return Ok(Rewritten::skipped(text, format!("Skipping unparsable YAML: {}", e)))
            }
        }
    }

    let mut changed = false;
    let mut rewritten = Vec::with_capacity(documents.len());
    for document in documents {
        let next = rewrite_value(document.clone(), &options.rename_map, options.case_sensitive)?;
        changed |= next != document;
        rewritten.push(next);
    }
    if !changed {
        trace!("YAML tree unchanged");
        return Ok(Rewritten::new(text.to_string()));
    }

    // Empty documents stay empty instead of turning into a literal `null`
    let multiple = rewritten.len() > 1;
    let mut output = String::new();
    for (i, document) in rewritten.iter().enumerate() {
        if i > 0 || (multiple && document.is_null()) {
            output.push_str("---\n");
        }
        if !document.is_null() {
            output.push_str(&serde_yaml::to_string(document)?);
        }
    }
    Ok(Rewritten::new(match_trailing_newline(text, output)))
}
