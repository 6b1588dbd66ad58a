//! # Annotation Parser
//!
//! Extracts typed annotations from free-form documentation text.
//!
//! Each extractor is an independent pattern over the same text and returns
//! every match, in order. Text that does not match simply yields nothing;
//! the parser never fails.
//!
//! An annotation tag must start a line, optionally preceded by whitespace and
//! a single `*`, so both `///` doc lines and `/** ... */` blocks are accepted:
//!
//! ```text
//! /// @action save_post, 5
//! /// @filter the_content
//! /// @ajax
//! /// @command acme items list
//! ```
//!
//! Class-level text carries `@api-<key> <value>` lines instead.

use docwire_core::HookKind;
use regex::Regex;
use std::sync::LazyLock;

static HOOK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?m)^[ \t]*(?:\*[ \t]*)?@(?P<kind>filter|action|shortcode)[ \t]+(?P<name>[a-z0-9/=\-._]+)(?:,[ \t]+(?P<priority>\d+))?",
    )
});

static COMMAND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?m)^[ \t]*(?:\*[ \t]*)?@command[ \t]+(?P<name>[a-z0-9/=\-._: ]+)")
});

static AJAX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?m)^[ \t]*(?:\*[ \t]*)?@ajax\b(?:[ \t]+(?P<name>[a-z0-9/=\-._]+))?")
});

static API_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?m)^[ \t]*(?:\*[ \t]*)?@api-(?P<key>\S+)[ \t]+(?P<value>.+)$")
});

// Patterns are literals covered by the tests below.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("annotation pattern is valid")
}

/// An `@action`, `@filter` or `@shortcode` annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookAnnotation<'a> {
    /// Which of the three kinds matched.
    pub kind: HookKind,
    /// The hook name.
    pub name: &'a str,
    /// The explicit priority, if one followed the name.
    pub priority: Option<i32>,
}

/// An `@api-<key> <value>` class annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiAnnotation<'a> {
    /// The key after `@api-`, as written.
    pub key: &'a str,
    /// The rest of the line, trimmed.
    pub value: &'a str,
}

/// Every `@action`/`@filter`/`@shortcode` annotation in `doc`.
pub fn hooks(doc: &str) -> Vec<HookAnnotation<'_>> {
    HOOK_PATTERN
        .captures_iter(doc)
        .filter_map(|caps| {
            let kind = HookKind::from_tag(caps.name("kind")?.as_str())?;
            let name = caps.name("name")?.as_str();
            // A bare `0` and an out-of-range number read as no priority.
            let priority = caps
                .name("priority")
                .filter(|p| p.as_str() != "0")
                .and_then(|p| p.as_str().parse().ok());
            Some(HookAnnotation {
                kind,
                name,
                priority,
            })
        })
        .collect()
}

/// Every `@command` name in `doc`.
///
/// Names may contain spaces and colons; trailing whitespace is dropped.
pub fn commands(doc: &str) -> Vec<&str> {
    COMMAND_PATTERN
        .captures_iter(doc)
        .filter_map(|caps| {
            let name = caps.name("name")?.as_str().trim_end();
            (!name.is_empty()).then_some(name)
        })
        .collect()
}

/// Every `@ajax` annotation in `doc`, with its optional explicit name.
pub fn ajax(doc: &str) -> Vec<Option<&str>> {
    AJAX_PATTERN
        .captures_iter(doc)
        .map(|caps| caps.name("name").map(|m| m.as_str()))
        .collect()
}

/// Every `@api-<key> <value>` annotation in class-level `doc`.
pub fn api(doc: &str) -> Vec<ApiAnnotation<'_>> {
    API_PATTERN
        .captures_iter(doc)
        .filter_map(|caps| {
            let key = caps.name("key")?.as_str();
            let value = caps.name("value")?.as_str().trim_end();
            let value = value.strip_suffix("*/").unwrap_or(value).trim_end();
            (!value.is_empty()).then_some(ApiAnnotation { key, value })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_with_priority() {
        let found = hooks(" @action foo, 5");
        assert_eq!(
            found,
            vec![HookAnnotation {
                kind: HookKind::Action,
                name: "foo",
                priority: Some(5),
            }]
        );
    }

    #[test]
    fn test_hook_without_priority() {
        let found = hooks(" @filter the_content");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, HookKind::Filter);
        assert_eq!(found[0].priority, None);
    }

    #[test]
    fn test_hooks_repeat_within_block() {
        let doc = " Saves things.\n\n @action save_post, 20\n @action edit_post\n @shortcode acme-box\n @filter acme/title=x.y";
        let found = hooks(doc);
        let names: Vec<_> = found.iter().map(|h| (h.kind, h.name)).collect();
        assert_eq!(
            names,
            vec![
                (HookKind::Action, "save_post"),
                (HookKind::Action, "edit_post"),
                (HookKind::Shortcode, "acme-box"),
                (HookKind::Filter, "acme/title=x.y"),
            ]
        );
        assert_eq!(found[0].priority, Some(20));
        assert_eq!(found[1].priority, None);
    }

    #[test]
    fn test_block_comment_style() {
        let doc = "*\n     * Renders.\n     *\n     * @action wp_footer, 99\n     ";
        let found = hooks(doc);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "wp_footer");
        assert_eq!(found[0].priority, Some(99));
    }

    #[test]
    fn test_non_matching_text_yields_nothing() {
        assert!(hooks("").is_empty());
        assert!(hooks(" plain prose, no tags").is_empty());
        assert!(hooks(" @action Foo").is_empty());
        assert!(hooks(" @actions foo").is_empty());
        assert!(hooks(" see the @action foo docs").is_empty());
        assert!(commands(" @command").is_empty());
        assert!(api(" @api-namespace").is_empty());
    }

    #[test]
    fn test_priority_needs_separating_space() {
        let found = hooks(" @action foo,5");
        assert_eq!(found[0].name, "foo");
        assert_eq!(found[0].priority, None);
    }

    #[test]
    fn test_zero_priority_reads_as_missing() {
        assert_eq!(hooks(" @action foo, 0")[0].priority, None);
        assert_eq!(hooks(" @action foo, 00")[0].priority, Some(0));
    }

    #[test]
    fn test_oversized_priority_is_ignored() {
        let found = hooks(" @action foo, 99999999999");
        assert_eq!(found[0].priority, None);
    }

    #[test]
    fn test_command_names_with_spaces_and_colons() {
        let doc = " @command acme items list  \n @command acme:sync";
        assert_eq!(commands(doc), vec!["acme items list", "acme:sync"]);
    }

    #[test]
    fn test_ajax_with_and_without_name() {
        let doc = " @ajax\n @ajax acme_submit\n @ajaxed nope";
        assert_eq!(ajax(doc), vec![None, Some("acme_submit")]);
    }

    #[test]
    fn test_api_annotations() {
        let doc = " Widgets API.\n\n @api-namespace acme\n @api-version 2\n @api-subspace widgets  \n";
        let found = api(doc);
        assert_eq!(
            found,
            vec![
                ApiAnnotation {
                    key: "namespace",
                    value: "acme",
                },
                ApiAnnotation {
                    key: "version",
                    value: "2",
                },
                ApiAnnotation {
                    key: "subspace",
                    value: "widgets",
                },
            ]
        );
    }

    #[test]
    fn test_api_annotation_in_single_line_block() {
        let found = api("* @api-namespace acme */");
        assert_eq!(found[0].value, "acme");
    }
}
