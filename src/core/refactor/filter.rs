//! Exclusion rules for the tree walk.

use std::path::{Component, Path};

use crate::config::RenameSettings;

/// Decides which paths are left out of renaming.
///
/// A path is skipped when its root-relative form contains one of the markers
/// (plain, case-sensitive substring test), ends with the protected suffix, or
/// has the protected suffix as a whole segment.
#[derive(Debug, Clone)]
pub struct PathFilter {
    markers: Vec<String>,
    protected_suffix: String,
}

impl PathFilter {
    pub fn new(markers: Vec<String>, protected_suffix: impl Into<String>) -> Self {
        Self {
            markers,
            protected_suffix: protected_suffix.into(),
        }
    }

    pub fn from_settings(settings: &RenameSettings) -> Self {
        Self::new(settings.skip_markers.clone(), settings.protected_suffix.clone())
    }

    /// `relative` must be relative to the working root.
    pub fn should_skip(&self, relative: &Path) -> bool {
        let normalized = to_slash(relative);

        if self
            .markers
            .iter()
            .any(|marker| normalized.contains(marker.as_str()))
        {
            return true;
        }

        normalized.ends_with(self.protected_suffix.as_str())
            || normalized
                .split('/')
                .any(|segment| segment == self.protected_suffix)
    }
}

/// Join normal path components with `/` regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> PathFilter {
        PathFilter::from_settings(&RenameSettings::default())
    }

    #[test]
    fn skips_vcs_and_build_output() {
        let f = filter();
        assert!(f.should_skip(Path::new(".git/config")));
        assert!(f.should_skip(Path::new("src/App/bin/Debug/App.dll")));
        assert!(f.should_skip(Path::new("src/App/obj")));
        assert!(f.should_skip(Path::new("src/App.Infrastructure/Migrations/001_Init.cs")));
        assert!(f.should_skip(Path::new("tests/App.Tests/UnitTest1.cs")));
    }

    #[test]
    fn marker_matching_is_case_sensitive_substring() {
        let f = filter();
        assert!(!f.should_skip(Path::new("src/App/Obj.cs")));
        assert!(!f.should_skip(Path::new("src/App/Tests.cs")));
        // Substring semantics: `bin` inside a longer name still matches.
        assert!(f.should_skip(Path::new("src/Cabinet/Item.cs")));
    }

    #[test]
    fn skips_protected_suffix_paths() {
        let f = filter();
        assert!(f.should_skip(Path::new("src/TemplateApp.Core")));
        assert!(f.should_skip(Path::new("src/.Core/readme.md")));
        assert!(!f.should_skip(Path::new("src/TemplateApp.Core/TemplateApp.Core.csproj")));
        assert!(!f.should_skip(Path::new("src/TemplateApp.Web/Program.cs")));
    }

    #[test]
    fn custom_markers_replace_defaults() {
        let f = PathFilter::new(vec!["node_modules".to_string()], ".Core");
        assert!(f.should_skip(Path::new("web/node_modules/x.js")));
        assert!(!f.should_skip(Path::new("src/App/bin/x.dll")));
    }

    #[test]
    fn to_slash_drops_root_and_dot_components() {
        assert_eq!(to_slash(Path::new("./a/b/c.cs")), "a/b/c.cs");
        assert_eq!(to_slash(Path::new("a")), "a");
    }
}
