//! Content and name substitution for one old name → new name pair.
//!
//! Every rule goes through [`RenameContext::is_protected`]: an occurrence of
//! the old name immediately followed by the protected suffix (`Foo.Core`) is
//! never rewritten, in file contents or in paths.

use regex::{Captures, Regex};

use crate::config::RenameSettings;
use crate::error::{Error, Result};
use crate::utils::validation::{self, is_identifier_char};

// ============================================================================
// Rename context
// ============================================================================

/// The old/new name pair and the suffix that protects old-name compounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameContext {
    old_name: String,
    new_name: String,
    protected_suffix: String,
}

impl RenameContext {
    pub fn new(old_name: &str, new_name: &str, protected_suffix: &str) -> Result<Self> {
        let old_name = validation::require_identifier(old_name, "old_name")?;
        let new_name = validation::require_identifier(new_name, "new_name")?;
        let protected_suffix =
            validation::require_non_empty(protected_suffix, "protected_suffix", "Protected suffix cannot be empty")?;

        Ok(Self {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
            protected_suffix: protected_suffix.to_string(),
        })
    }

    pub fn old_name(&self) -> &str {
        &self.old_name
    }

    pub fn new_name(&self) -> &str {
        &self.new_name
    }

    pub fn protected_suffix(&self) -> &str {
        &self.protected_suffix
    }

    /// True when the old-name occurrence ending at byte `match_end` is part of
    /// a protected compound such as `Foo.Core`.
    pub fn is_protected(&self, text: &str, match_end: usize) -> bool {
        text.get(match_end..)
            .is_some_and(|rest| rest.starts_with(self.protected_suffix.as_str()))
    }

    /// Replace old-name occurrences in a path or name string.
    ///
    /// Substring matching (`TemplateAppTests` → `AcmeTests`), protected
    /// compounds left alone.
    pub fn substitute_path(&self, path: &str) -> String {
        self.replace_unprotected(path, Boundary::Substring).0
    }

    /// Replace every unprotected occurrence, returning the new text and the count.
    fn replace_unprotected(&self, text: &str, boundary: Boundary) -> (String, usize) {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let mut count = 0;

        for start in find_matches(text, &self.old_name, boundary) {
            let end = start + self.old_name.len();
            if self.is_protected(text, end) {
                continue;
            }
            out.push_str(&text[last..start]);
            out.push_str(&self.new_name);
            last = end;
            count += 1;
        }

        if count == 0 {
            return (text.to_string(), 0);
        }
        out.push_str(&text[last..]);
        (out, count)
    }
}

// ============================================================================
// Matching
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    /// Neighbouring characters must not be identifier characters.
    Word,
    /// Any occurrence.
    Substring,
}

/// Non-overlapping occurrences of `term` in `text`, left to right.
///
/// With `Boundary::Word`:
/// - `Foo` in `class Foo {` and `Foo.Services` matches
/// - `Foo` in `FooBar`, `MyFoo` or `Foo_1` does not
fn find_matches(text: &str, term: &str, boundary: Boundary) -> Vec<usize> {
    let mut matches = Vec::new();
    if term.is_empty() || term.len() > text.len() {
        return matches;
    }

    let mut start = 0;
    while let Some(pos) = text[start..].find(term) {
        let abs = start + pos;
        let end = abs + term.len();

        let accepted = match boundary {
            Boundary::Substring => true,
            Boundary::Word => {
                let left_ok = !text[..abs].chars().next_back().is_some_and(is_identifier_char);
                let right_ok = !text[end..].chars().next().is_some_and(is_identifier_char);
                left_ok && right_ok
            }
        };

        if accepted {
            matches.push(abs);
            start = end;
        } else {
            // Advance one whole character to stay on a UTF-8 boundary.
            start = abs + text[abs..].chars().next().map_or(1, char::len_utf8);
        }
    }

    matches
}

/// Case-sensitive file-name suffix test, so multi-dot extensions such as
/// `.sln.DotSettings` work. A name equal to the extension matches too.
pub fn has_extension(file_name: &str, extensions: &[String]) -> bool {
    extensions
        .iter()
        .any(|ext| !ext.is_empty() && file_name.ends_with(ext.as_str()))
}

// ============================================================================
// Text rewriter
// ============================================================================

/// Result of rewriting one file's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    pub replacements: usize,
}

impl Rewrite {
    pub fn changed(&self) -> bool {
        self.replacements > 0
    }
}

/// Applies the three content rules for a [`RenameContext`].
#[derive(Debug, Clone)]
pub struct TextRewriter {
    context: RenameContext,
    source_extensions: Vec<String>,
    manifest_extensions: Vec<String>,
    using_pattern: Regex,
    reference_pattern: Regex,
}

impl TextRewriter {
    pub fn new(context: RenameContext, settings: &RenameSettings) -> Result<Self> {
        let using_pattern = Regex::new(&format!(
            r"\busing(\s+){}\.",
            regex::escape(context.old_name())
        ))
        .map_err(|e| Error::internal_unexpected(format!("using-statement pattern: {}", e)))?;

        let reference_pattern = Regex::new(r#"<ProjectReference(\s+)Include="([^"]*)""#)
            .map_err(|e| Error::internal_unexpected(format!("project-reference pattern: {}", e)))?;

        Ok(Self {
            context,
            source_extensions: settings.source_extensions.clone(),
            manifest_extensions: settings.manifest_extensions.clone(),
            using_pattern,
            reference_pattern,
        })
    }

    /// Apply the generic rule, then the using rule (source/markup files), then
    /// the reference rule (manifest files).
    pub fn rewrite(&self, file_name: &str, content: &str) -> Rewrite {
        let (mut text, mut replacements) = self.rewrite_identifiers(content);

        if has_extension(file_name, &self.source_extensions) {
            let (next, count) = self.rewrite_using_statements(&text);
            text = next;
            replacements += count;
        }

        if has_extension(file_name, &self.manifest_extensions) {
            let (next, count) = self.rewrite_project_references(&text);
            text = next;
            replacements += count;
        }

        Rewrite {
            content: text,
            replacements,
        }
    }

    /// Whole-word replacement of the old name.
    pub fn rewrite_identifiers(&self, content: &str) -> (String, usize) {
        self.context.replace_unprotected(content, Boundary::Word)
    }

    /// `using Old.X;` → `using New.X;` unless `Old.X` is protected.
    pub fn rewrite_using_statements(&self, content: &str) -> (String, usize) {
        let mut count = 0;
        let new_name = self.context.new_name();

        let rewritten = self.using_pattern.replace_all(content, |caps: &Captures| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let old_end = caps.get(0).map_or(0, |m| m.end() - 1);
            if self.context.is_protected(content, old_end) {
                return whole.to_string();
            }
            count += 1;
            format!("using{}{}.", &caps[1], new_name)
        });

        (rewritten.into_owned(), count)
    }

    /// Rewrite `<ProjectReference Include="...">` values, keeping the
    /// surrounding path text verbatim.
    pub fn rewrite_project_references(&self, content: &str) -> (String, usize) {
        let mut count = 0;

        let rewritten = self.reference_pattern.replace_all(content, |caps: &Captures| {
            let (value, replaced) = self
                .context
                .replace_unprotected(&caps[2], Boundary::Substring);
            count += replaced;
            format!("<ProjectReference{}Include=\"{}\"", &caps[1], value)
        });

        (rewritten.into_owned(), count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(old: &str, new: &str) -> RenameContext {
        RenameContext::new(old, new, ".Core").unwrap()
    }

    fn rewriter(old: &str, new: &str) -> TextRewriter {
        TextRewriter::new(context(old, new), &RenameSettings::default()).unwrap()
    }

    #[test]
    fn context_rejects_invalid_names() {
        assert!(RenameContext::new("", "Bar", ".Core").is_err());
        assert!(RenameContext::new("Foo", "Bad Name", ".Core").is_err());
        assert!(RenameContext::new("Foo", "Bar", "").is_err());
    }

    #[test]
    fn protected_compound_is_untouched() {
        let (out, count) = rewriter("Foo", "Bar").rewrite_identifiers("Foo.Core.Models");
        assert_eq!(out, "Foo.Core.Models");
        assert_eq!(count, 0);
    }

    #[test]
    fn standalone_occurrences_are_replaced() {
        let (out, count) =
            rewriter("Foo", "Bar").rewrite_identifiers("class Foo : Foo.Base { Foo.Core.X x; }");
        assert_eq!(out, "class Bar : Bar.Base { Foo.Core.X x; }");
        assert_eq!(count, 2);
    }

    #[test]
    fn partial_identifiers_are_not_replaced() {
        let rw = rewriter("Foo", "Bar");
        for text in ["FooBarExtensions", "class FooService", "MyFoo", "Foo_1", "Foo2"] {
            let (out, count) = rw.rewrite_identifiers(text);
            assert_eq!(out, text);
            assert_eq!(count, 0, "{} should not match", text);
        }
    }

    #[test]
    fn dotted_template_names_match_whole() {
        let rw = rewriter("Myrtus.Clarity", "Acme");
        let (out, _) = rw.rewrite_identifiers(
            "namespace Myrtus.Clarity.Api;\nusing Myrtus.Clarity.Core.Domain;\nMyrtus.ClarityX",
        );
        assert_eq!(
            out,
            "namespace Acme.Api;\nusing Myrtus.Clarity.Core.Domain;\nMyrtus.ClarityX"
        );
    }

    #[test]
    fn unicode_neighbours_count_as_identifier_chars() {
        let (out, count) = rewriter("Foo", "Bar").rewrite_identifiers("éFoo Foo→x");
        assert_eq!(out, "éFoo Bar→x");
        assert_eq!(count, 1);
    }

    #[test]
    fn using_statements_skip_core_imports() {
        let rw = rewriter("TemplateApp", "Acme");
        let (out, count) = rw.rewrite_using_statements(
            "using TemplateApp.Services;\nusing  TemplateApp.Core.Models;\n@using TemplateApp.Web\n",
        );
        assert_eq!(
            out,
            "using Acme.Services;\nusing  TemplateApp.Core.Models;\n@using Acme.Web\n"
        );
        assert_eq!(count, 2);
    }

    #[test]
    fn project_reference_keeps_surrounding_path() {
        let rw = rewriter("TemplateApp", "Acme");
        let (out, count) = rw.rewrite_project_references(
            r#"<ProjectReference Include="..\TemplateAppLib\TemplateAppLib.csproj" />"#,
        );
        assert_eq!(
            out,
            r#"<ProjectReference Include="..\AcmeLib\AcmeLib.csproj" />"#
        );
        assert_eq!(count, 2);
    }

    #[test]
    fn project_reference_to_core_is_protected() {
        let rw = rewriter("TemplateApp", "Acme");
        let input = r#"<ProjectReference Include="../TemplateApp.Core/TemplateApp.Core.csproj"/>"#;
        let (out, count) = rw.rewrite_project_references(input);
        assert_eq!(out, input);
        assert_eq!(count, 0);
    }

    #[test]
    fn rewrite_applies_rules_by_extension() {
        let rw = rewriter("TemplateApp", "Acme");

        let cs = rw.rewrite("Service.cs", "using TemplateApp.Services;\n");
        assert_eq!(cs.content, "using Acme.Services;\n");
        assert!(cs.changed());

        let csproj = rw.rewrite(
            "TemplateApp.csproj",
            r#"<ProjectReference Include="../TemplateAppShared/X.csproj"/>"#,
        );
        assert_eq!(
            csproj.content,
            r#"<ProjectReference Include="../AcmeShared/X.csproj"/>"#
        );

        // Reference rule only runs on manifests.
        let md = rw.rewrite(
            "README.md",
            r#"<ProjectReference Include="../TemplateAppShared/X.csproj"/>"#,
        );
        assert!(!md.changed());
    }

    #[test]
    fn rename_to_same_name_changes_nothing_visible() {
        let rw = rewriter("Acme", "Acme");
        let rewrite = rw.rewrite("A.cs", "namespace Acme;");
        assert_eq!(rewrite.content, "namespace Acme;");
    }

    #[test]
    fn substitute_path_is_substring_based_and_protected() {
        let ctx = context("TemplateApp", "Acme");
        assert_eq!(ctx.substitute_path("TemplateAppTests"), "AcmeTests");
        assert_eq!(
            ctx.substitute_path("TemplateApp.Core/TemplateApp.Core.csproj"),
            "TemplateApp.Core/TemplateApp.Core.csproj"
        );
        assert_eq!(
            ctx.substitute_path("src/TemplateApp.Web/TemplateApp.Web.csproj"),
            "src/Acme.Web/Acme.Web.csproj"
        );
    }

    #[test]
    fn has_extension_handles_multi_dot_suffixes() {
        let exts = vec![".sln.DotSettings".to_string()];
        assert!(has_extension("Solution.sln.DotSettings", &exts));
        assert!(!has_extension("Solution.sln", &exts));
        assert!(!has_extension(".sln.DotSettings.user", &exts));
        assert!(has_extension(".sln.DotSettings", &exts));
        assert!(!has_extension("Solution.sln", &[String::new()]));
    }
}
