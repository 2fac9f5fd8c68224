//! `.env` files.
//!
//! `env-name` rewrites the token when it is a whole `_`, `.` or `-` separated segment run
//! of a variable name, and always writes the new token in uppercase, even when it was
//! given in lowercase. `env-value` rewrites a value that starts with the token and keeps
//! the new token as given.
use super::rules::{apply_pairs, compile, name_variants, Rule, Substitution};
use crate::classifier::FileKind;
use crate::errors::RenameResult;
use crate::options::RenameOptions;

pub(crate) fn build_rules(token: &str, case_sensitive: bool) -> Result<Vec<Rule>, regex::Error> {
    let name = format!(
        r"(?m)^[ \t]*(?:export[ \t]+)?(?:[A-Za-z0-9_.\-]*?[_.\-])?(?P<tok>{})(?:[_.\-][A-Za-z0-9_.\-]*)?[ \t]*=",
        name_variants(token)
    );
    let value = format!(
        r#"(?m)=[ \t]*["']?(?P<tok>{})"#,
        regex::escape(token)
    );
    Ok(vec![
        Rule::token("env-name", compile(&name, case_sensitive)?, Substitution::Uppercase),
        Rule::token("env-value", compile(&value, case_sensitive)?, Substitution::Verbatim),
    ])
}

/// Rewrites variable names and values in env files
pub fn rewrite(text: &str, options: &RenameOptions) -> RenameResult<String> {
    apply_pairs(FileKind::Env, text, options, build_rules)
}
