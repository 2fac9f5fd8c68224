//! Markdown documents.
//!
//! Code blocks, inline code and link targets are located first and rewritten in place;
//! whatever prose is left is rewritten by a whole-word match afterwards.
use super::rules::{apply_pairs, compile, word_pattern, Rule, Substitution};
use crate::classifier::FileKind;
use crate::errors::RenameResult;
use crate::options::RenameOptions;

pub(crate) fn build_rules(token: &str, case_sensitive: bool) -> Result<Vec<Rule>, regex::Error> {
    let word = word_pattern(token);
    Ok(vec![
        Rule::within(
            "fenced-code",
            compile(r"(?s)```[^\n]*\n(?P<body>.*?)```", case_sensitive)?,
            compile(&word, case_sensitive)?,
        ),
        Rule::within(
            "inline-code",
            compile(r"`(?P<body>[^`\n]+)`", case_sensitive)?,
            compile(&word, case_sensitive)?,
        ),
        Rule::within(
            "link",
            compile(r"\[[^\]\n]*\]\((?P<body>[^)\s]+)", case_sensitive)?,
            compile(&regex::escape(token), case_sensitive)?,
        ),
        Rule::token(
            "prose",
            compile(&format!("(?P<tok>{})", word), case_sensitive)?,
            Substitution::Verbatim,
        ),
    ])
}

/// Rewrites code, links and prose in Markdown
pub fn rewrite(text: &str, options: &RenameOptions) -> RenameResult<String> {
    apply_pairs(FileKind::Markdown, text, options, build_rules)
}
