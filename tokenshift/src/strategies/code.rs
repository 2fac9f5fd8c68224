//! TypeScript / JavaScript family.
//!
//! Rules, most specific first:
//!
//! | Rule | Matches |
//! |---|---|
//! | `import` | `import … from '<old>…'`, `import '<old>…'`, `import('<old>…')` |
//! | `export` | `export … from '<old>…'` |
//! | `require` | `require('<old>…')` |
//! | `scoped` | `@<old>` |
//! | `word` | any remaining whole word `<old>` |
use regex::Regex;

use super::rules::{apply_pairs, compile, suffix_bounded, word_pattern, Rule, Substitution};
use crate::classifier::FileKind;
use crate::errors::RenameResult;
use crate::options::RenameOptions;

fn token_rule(name: &'static str, pattern: String, case_sensitive: bool) -> Result<Rule, regex::Error> {
    let regex: Regex = compile(&pattern, case_sensitive)?;
    Ok(Rule::token(name, regex, Substitution::Verbatim))
}

pub(crate) fn build_rules(token: &str, case_sensitive: bool) -> Result<Vec<Rule>, regex::Error> {
    let old = regex::escape(token);
    Ok(vec![
        token_rule(
            "import",
            format!(
                r#"\bimport\s*(?:\(\s*|[^'";]*?\bfrom\s*)?['"`](?P<tok>{})"#,
                old
            ),
            case_sensitive,
        )?,
        token_rule(
            "export",
            format!(r#"\bexport\s[^'";]*?\bfrom\s*['"`](?P<tok>{})"#, old),
            case_sensitive,
        )?,
        token_rule(
            "require",
            format!(r#"\brequire\s*\(\s*['"`](?P<tok>{})"#, old),
            case_sensitive,
        )?,
        token_rule(
            "scoped",
            format!("@(?P<tok>{})", suffix_bounded(token)),
            case_sensitive,
        )?,
        token_rule(
            "word",
            format!("(?P<tok>{})", word_pattern(token)),
            case_sensitive,
        )?,
    ])
}

/// Rewrites module specifiers and identifiers in JS/TS sources
pub fn rewrite(text: &str, options: &RenameOptions) -> RenameResult<String> {
    apply_pairs(FileKind::Code, text, options, build_rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RenameMap;
    use crate::strategies::rules::RuleSet;

    fn single_rule(name: &str, token: &str, text: &str, new: &str) -> String {
        let rule = build_rules(token, true)
            .unwrap()
            .into_iter()
            .find(|r| r.name() == name)
            .unwrap();
        RuleSet::new(vec![rule]).apply(text, new)
    }

    #[test]
    fn test_rule_order() {
        let set = RuleSet::new(build_rules("pkg", true).unwrap());
        assert_eq!(set.names(), vec!["import", "export", "require", "scoped", "word"]);
    }

    #[test]
    fn test_import_rule() {
        let out = single_rule(
            "import",
            "old-package",
            "import { a } from 'old-package';\nimport 'old-package/styles.css';",
            "new-package",
        );
        assert_eq!(
            out,
            "import { a } from 'new-package';\nimport 'new-package/styles.css';"
        );

        let out = single_rule(
            "import",
            "old-package",
            "import {\n  a,\n  b,\n} from \"old-package/sub\";",
            "new-package",
        );
        assert!(out.contains("from \"new-package/sub\""));

        let out = single_rule("import", "lib", "const m = await import('lib');", "core");
        assert_eq!(out, "const m = await import('core');");
    }

    #[test]
    fn test_import_rule_ignores_other_paths() {
        let text = "import old from 'other';";
        assert_eq!(single_rule("import", "old", text, "new"), text);
    }

    #[test]
    fn test_export_rule() {
        let out = single_rule("export", "old-ui", "export * from 'old-ui';", "new-ui");
        assert_eq!(out, "export * from 'new-ui';");
        let out = single_rule(
            "export",
            "old-ui",
            "export { Button as B } from \"old-ui/button\";",
            "new-ui",
        );
        assert_eq!(out, "export { Button as B } from \"new-ui/button\";");
    }

    #[test]
    fn test_require_rule() {
        let out = single_rule("require", "old-lib", "const x = require( 'old-lib' );", "new-lib");
        assert_eq!(out, "const x = require( 'new-lib' );");
    }

    #[test]
    fn test_scoped_rule() {
        let out = single_rule("scoped", "acme", "import x from '@acme/ui';", "globex");
        assert_eq!(out, "import x from '@globex/ui';");
        let text = "@acmecorp/ui";
        assert_eq!(single_rule("scoped", "acme", text, "globex"), text);
    }

    #[test]
    fn test_word_rule() {
        let out = single_rule("word", "oldName", "oldName(); myoldName(); oldName_x", "newName");
        assert_eq!(out, "newName(); myoldName(); oldName_x");
    }

    #[test]
    fn test_import_scenario() {
        let options = RenameOptions::new("old-package", "new-package");
        let out = rewrite("import { a } from 'old-package';", &options).unwrap();
        assert!(out.contains("from 'new-package'"));
    }

    #[test]
    fn test_import_not_remangled_when_new_contains_old() {
        let options = RenameOptions::new("pkg", "pkg-next");
        let out = rewrite("import { pkg } from 'pkg';\nconsole.log(pkg);", &options).unwrap();
        assert_eq!(
            out,
            "import { pkg-next } from 'pkg-next';\nconsole.log(pkg-next);"
        );
    }

    #[test]
    fn test_batch_mapping() {
        let options = RenameOptions::new("pkg1", "newpkg1")
            .with_map(RenameMap::from_pairs([("pkg1", "newpkg1"), ("pkg2", "newpkg2")]));
        let text = "import a from 'pkg1';\nconst b = require('pkg2');\n";
        let out = rewrite(text, &options).unwrap();
        assert_eq!(
            out,
            "import a from 'newpkg1';\nconst b = require('newpkg2');\n"
        );
    }

    #[test]
    fn test_case_insensitive() {
        let mut options = RenameOptions::new("oldlib", "newlib");
        options.case_sensitive = false;
        let out = rewrite("import x from 'OldLib';\nOLDLIB.run();", &options).unwrap();
        assert_eq!(out, "import x from 'newlib';\nnewlib.run();");
    }

    #[test]
    fn test_untouched_text_is_identical() {
        let options = RenameOptions::new("absent", "present");
        let text = "const a = 1;\r\n// trailing spaces   \n";
        assert_eq!(rewrite(text, &options).unwrap(), text);
    }
}
