use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::ops::Range;
use std::sync::Arc;
use tracing::trace;

use crate::classifier::FileKind;
use crate::errors::{RenameError, RenameResult};
use crate::options::RenameOptions;

static RULE_CACHE: Lazy<DashMap<(FileKind, String, bool), Arc<RuleSet>>> = Lazy::new(DashMap::new);
static TOKEN_CACHE: Lazy<DashMap<(String, bool), Arc<Regex>>> = Lazy::new(DashMap::new);

/// How the new token is written into the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Substitution {
    Verbatim,
    Uppercase,
}

#[derive(Debug)]
enum RuleKind {
    /// Replace the `tok` capture group of every match
    Token,
    /// Replace every match of the inner regex inside the `body` capture group
    Within(Regex),
}

/// One named substitution inside a strategy's pipeline
#[derive(Debug)]
pub(crate) struct Rule {
    name: &'static str,
    pattern: Regex,
    kind: RuleKind,
    substitution: Substitution,
}

impl Rule {
    pub(crate) fn token(name: &'static str, pattern: Regex, substitution: Substitution) -> Self {
        Self {
            name,
            pattern,
            kind: RuleKind::Token,
            substitution,
        }
    }

    pub(crate) fn within(name: &'static str, pattern: Regex, inner: Regex) -> Self {
        Self {
            name,
            pattern,
            kind: RuleKind::Within(inner),
            substitution: Substitution::Verbatim,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    fn edits(&self, text: &str, replacement: &str) -> Vec<(Range<usize>, String)> {
        let mut edits = Vec::new();
        for caps in self.pattern.captures_iter(text) {
            match &self.kind {
                RuleKind::Token => {
                    if let Some(tok) = caps.name("tok") {
                        edits.push((tok.range(), replacement.to_string()));
                    }
                }
                RuleKind::Within(inner) => {
                    if let Some(body) = caps.name("body") {
                        edits.extend(inner.find_iter(body.as_str()).map(|m| {
                            (
                                body.start() + m.start()..body.start() + m.end(),
                                replacement.to_string(),
                            )
                        }));
                    }
                }
            }
        }
        edits
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Ordered rules for one token.
///
/// Rules run in order over the output of the previous rule. Text a rule has already
/// written is protected from every later rule of the same pass, which is what keeps the
/// generic whole-word rule from touching an import path the import rule just rewrote.
#[derive(Debug)]
pub(crate) struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub(crate) fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    #[cfg(test)]
    pub(crate) fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(Rule::name).collect()
    }

    /// Runs every rule once, replacing the token with `new`
    pub(crate) fn apply(&self, text: &str, new: &str) -> String {
        let upper = new.to_uppercase();
        let mut current = text.to_string();
        let mut protected: Vec<Range<usize>> = Vec::new();

        for rule in &self.rules {
            let replacement = match rule.substitution {
                Substitution::Verbatim => new,
                Substitution::Uppercase => upper.as_str(),
            };
            let edits: Vec<_> = rule
                .edits(&current, replacement)
                .into_iter()
                .filter(|(range, _)| !protected.iter().any(|p| overlaps(p, range)))
                .collect();
            if edits.is_empty() {
                continue;
            }
            trace!("Rule '{}' rewrote {} occurrence(s)", rule.name(), edits.len());

            let (next, next_protected) = splice(&current, &protected, edits);
            current = next;
            protected = next_protected;
        }

        current
    }
}

/// Applies sorted, non-overlapping edits and returns the new text together with the
/// protected ranges (old ones shifted, plus everything just inserted).
fn splice(
    text: &str,
    protected: &[Range<usize>],
    edits: Vec<(Range<usize>, String)>,
) -> (String, Vec<Range<usize>>) {
    let shift = |pos: usize| -> usize {
        let delta: isize = edits
            .iter()
            .filter(|(range, _)| range.end <= pos)
            .map(|(range, rep)| rep.len() as isize - range.len() as isize)
            .sum();
        (pos as isize + delta) as usize
    };
    let mut next_protected: Vec<Range<usize>> =
        protected.iter().map(|p| shift(p.start)..shift(p.end)).collect();

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (range, replacement) in &edits {
        out.push_str(&text[cursor..range.start]);
        let start = out.len();
        out.push_str(replacement);
        next_protected.push(start..out.len());
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);

    next_protected.sort_by_key(|r| r.start);
    (out, next_protected)
}

pub(crate) fn compile(pattern: &str, case_sensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Escaped token with `\b` on each side whose edge character is a word character
pub(crate) fn word_pattern(token: &str) -> String {
    let mut pattern = String::new();
    if token.chars().next().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(token));
    if token.chars().last().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern
}

/// Escaped token with a trailing `\b` when it ends in a word character
pub(crate) fn suffix_bounded(token: &str) -> String {
    let mut pattern = regex::escape(token);
    if token.chars().last().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern
}

/// The token or its uppercase spelling, as used for variable names
pub(crate) fn name_variants(token: &str) -> String {
    let upper = token.to_uppercase();
    if upper == token {
        regex::escape(token)
    } else {
        format!("(?:{}|{})", regex::escape(token), regex::escape(&upper))
    }
}

/// Compiled rule set for `token`, built once per strategy, token and case mode
pub(crate) fn cached_rules(
    kind: FileKind,
    token: &str,
    case_sensitive: bool,
    build: fn(&str, bool) -> Result<Vec<Rule>, regex::Error>,
) -> RenameResult<Arc<RuleSet>> {
    let key = (kind, token.to_string(), case_sensitive);
    if let Some(entry) = RULE_CACHE.get(&key) {
        return Ok(entry.clone());
    }
    let rules = build(token, case_sensitive)
        .map_err(|e| RenameError::invalid_pattern(format!("{} rules for '{}': {}", kind, token, e)))?;
    let set = Arc::new(RuleSet::new(rules));
    RULE_CACHE.insert(key, set.clone());
    Ok(set)
}

/// Plain substring matcher for `token`
pub(crate) fn token_regex(token: &str, case_sensitive: bool) -> RenameResult<Arc<Regex>> {
    let key = (token.to_string(), case_sensitive);
    if let Some(entry) = TOKEN_CACHE.get(&key) {
        return Ok(entry.clone());
    }
    let regex = compile(&regex::escape(token), case_sensitive)
        .map(Arc::new)
        .map_err(|e| RenameError::invalid_pattern(e.to_string()))?;
    TOKEN_CACHE.insert(key, regex.clone());
    Ok(regex)
}

/// Runs the strategy's rules for every pair in order, each pair seeing the previous output
pub(crate) fn apply_pairs(
    kind: FileKind,
    text: &str,
    options: &RenameOptions,
    build: fn(&str, bool) -> Result<Vec<Rule>, regex::Error>,
) -> RenameResult<String> {
    let mut current = text.to_string();
    for pair in &options.rename_map {
        let rules = cached_rules(kind, &pair.old, options.case_sensitive, build)?;
        current = rules.apply(&current, &pair.new);
    }
    Ok(current)
}
