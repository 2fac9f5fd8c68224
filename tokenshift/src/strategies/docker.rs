//! Dockerfiles and docker-compose style files without a YAML extension.
//!
//! `image` rewrites the token inside `FROM` / `image:` references and keeps the rest of
//! the path. `docker-var` rewrites `ENV` / `ARG` names where the token is a whole
//! `_`-separated segment run, uppercasing the new token.
use super::rules::{apply_pairs, compile, name_variants, Rule, Substitution};
use crate::classifier::FileKind;
use crate::errors::RenameResult;
use crate::options::RenameOptions;

pub(crate) fn build_rules(token: &str, case_sensitive: bool) -> Result<Vec<Rule>, regex::Error> {
    let image = format!(
        r#"(?m)^[ \t]*(?:(?i:FROM)[ \t]+(?:--platform=\S+[ \t]+)?|-?[ \t]*image:[ \t]*["']?)[^\s"']*?(?P<tok>{})"#,
        regex::escape(token)
    );
    let var = format!(
        r"(?m)^[ \t]*(?i:ENV|ARG)[ \t]+(?:[A-Za-z0-9_]*?_)?(?P<tok>{})(?:[^A-Za-z0-9]|$)",
        name_variants(token)
    );
    Ok(vec![
        Rule::token("image", compile(&image, case_sensitive)?, Substitution::Verbatim),
        Rule::token("docker-var", compile(&var, case_sensitive)?, Substitution::Uppercase),
    ])
}

/// Rewrites image references and build variables
pub fn rewrite(text: &str, options: &RenameOptions) -> RenameResult<String> {
    apply_pairs(FileKind::Docker, text, options, build_rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_registry() {
        let options = RenameOptions::new("old-registry", "new-registry");
        assert_eq!(
            rewrite("FROM old-registry/image:tag", &options).unwrap(),
            "FROM new-registry/image:tag"
        );
    }

    #[test]
    fn test_only_token_inside_path_changes() {
        let options = RenameOptions::new("old-app", "new-app");
        let text = "FROM --platform=linux/amd64 ghcr.io/acme/old-app:1.2 AS old-app-build\n";
        assert_eq!(
            rewrite(text, &options).unwrap(),
            "FROM --platform=linux/amd64 ghcr.io/acme/new-app:1.2 AS old-app-build\n"
        );
    }

    #[test]
    fn test_image_key() {
        let options = RenameOptions::new("old-api", "new-api");
        let text = "services:\n  api:\n    image: \"registry.local/old-api:latest\"\n";
        assert_eq!(
            rewrite(text, &options).unwrap(),
            "services:\n  api:\n    image: \"registry.local/new-api:latest\"\n"
        );
    }

    #[test]
    fn test_env_and_arg_uppercased() {
        let options = RenameOptions::new("old_var", "new_var");
        let text = "ARG old_var\nENV OLD_VAR_PATH=/opt\nRUN echo $old_var\n";
        assert_eq!(
            rewrite(text, &options).unwrap(),
            "ARG NEW_VAR\nENV NEW_VAR_PATH=/opt\nRUN echo $old_var\n"
        );
    }

    #[test]
    fn test_var_needs_segment_boundaries() {
        let options = RenameOptions::new("old", "new");
        let text = "ENV GOLDEN=1
ARG OLDER
ENV APP_OLD_URL=x
";
        assert_eq!(
            rewrite(text, &options).unwrap(),
            "ENV GOLDEN=1
ARG OLDER
ENV APP_NEW_URL=x
"
        );
    }

    #[test]
    fn test_lowercase_keyword() {
        let options = RenameOptions::new("old-base", "new-base");
        assert_eq!(
            rewrite("from old-base:3\n", &options).unwrap(),
            "from new-base:3\n"
        );
    }
}
