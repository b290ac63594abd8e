use std::fs;
use std::path::{Path, PathBuf};

use claritygen::config::AppSettings;
use claritygen::git::TemplateSource;
use claritygen::refactor::FaultPolicy;
use claritygen::{EntryOutcome, Error, ErrorCode, GenerateRequest, ProjectGenerator, Result};
use tempfile::{tempdir, TempDir};

#[derive(Clone, PartialEq)]
enum Failure {
    None,
    Fetch,
    Submodules,
    /// Fetch succeeds but leaves one unreadable source file in the tree.
    Unreadable,
    /// Someone else creates this directory while the fetch runs.
    DestinationAppears(PathBuf),
}

/// Materializes a small solution instead of cloning.
struct FixtureSource {
    failure: Failure,
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

impl TemplateSource for FixtureSource {
    fn fetch(&self, _url: &str, dest: &Path) -> Result<()> {
        write(
            dest,
            "TemplateApp/TemplateApp.csproj",
            r#"<ProjectReference Include="../TemplateApp.Core/TemplateApp.Core.csproj" />"#,
        );
        write(dest, "TemplateApp/Service.cs", "using TemplateApp.Services;\nnamespace TemplateApp;");
        write(dest, "TemplateApp.Core/TemplateApp.Core.csproj", "<Project />");
        write(dest, "TemplateApp.sln", "Project(\"TemplateApp\")");
        write(dest, "TemplateApp.sln.DotSettings", "<wpf:ResourceDictionary />");
        write(dest, ".git/HEAD", "ref: refs/heads/main");

        match &self.failure {
            Failure::Fetch => {
                return Err(Error::git_command_failed("git clone", Some(128), "fatal: early EOF"));
            }
            Failure::Unreadable => {
                write(dest, "TemplateApp/Secret.cs", "namespace TemplateApp;");
                lock_out(&dest.join("TemplateApp/Secret.cs"));
            }
            Failure::DestinationAppears(path) => write(path, "precious.txt", "not yours"),
            Failure::None | Failure::Submodules => {}
        }
        Ok(())
    }

    fn update_submodules(&self, _dir: &Path) -> Result<()> {
        if self.failure == Failure::Submodules {
            return Err(Error::git_command_failed(
                "git submodule update",
                Some(1),
                "fatal: no url found",
            ));
        }
        Ok(())
    }
}

#[cfg(unix)]
fn lock_out(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o000)).unwrap();
}

#[cfg(not(unix))]
fn lock_out(_path: &Path) {}

/// False when file permissions do not stop reads (running as root).
#[cfg(unix)]
fn permissions_enforced() -> bool {
    let dir = tempdir().unwrap();
    let path = dir.path().join("locked.txt");
    fs::write(&path, "x").unwrap();
    lock_out(&path);
    fs::read(&path).is_err()
}

fn settings() -> AppSettings {
    AppSettings::from_json(
        r#"{"Template":{"GitRepoUrl":"https://example.invalid/template.git","TemplateName":"TemplateApp"}}"#,
    )
    .unwrap()
}

struct Dirs {
    work: TempDir,
    out: TempDir,
}

impl Dirs {
    fn new() -> Self {
        Self {
            work: tempdir().unwrap(),
            out: tempdir().unwrap(),
        }
    }

    fn generator(&self, failure: Failure) -> ProjectGenerator<FixtureSource> {
        ProjectGenerator::new(settings(), FixtureSource { failure }).with_work_parent(self.work.path())
    }

    fn request(&self, force: bool) -> GenerateRequest {
        GenerateRequest {
            project_name: "Acme".to_string(),
            output_dir: self.out.path().to_path_buf(),
            force,
        }
    }

    fn work_is_empty(&self) -> bool {
        fs::read_dir(self.work.path()).unwrap().next().is_none()
    }
}

#[test]
fn generates_renamed_project_at_destination() {
    let dirs = Dirs::new();

    let output = dirs.generator(Failure::None).generate(&dirs.request(false)).unwrap();

    let dest = dirs.out.path().join("Acme");
    assert_eq!(output.location, dest.display().to_string());
    assert_eq!(output.project_name, "Acme");
    assert_eq!(output.template_name, "TemplateApp");

    assert_eq!(
        fs::read_to_string(dest.join("Acme/Acme.csproj")).unwrap(),
        r#"<ProjectReference Include="../TemplateApp.Core/TemplateApp.Core.csproj" />"#
    );
    assert_eq!(
        fs::read_to_string(dest.join("Acme/Service.cs")).unwrap(),
        "using Acme.Services;\nnamespace Acme;"
    );
    assert_eq!(fs::read_to_string(dest.join("Acme.sln")).unwrap(), "Project(\"Acme\")");
    assert!(dest.join("TemplateApp.Core/TemplateApp.Core.csproj").is_file());
    assert!(!dest.join("TemplateApp.sln.DotSettings").exists());
    assert!(!dest.join("Acme.sln.DotSettings").exists());
    assert_eq!(fs::read_to_string(dest.join(".git/HEAD")).unwrap(), "ref: refs/heads/main");

    assert!(dirs.work_is_empty());
    assert!(!output.report.has_failures());
    assert_eq!(output.report.summary.files_deleted, 1);
}

#[test]
fn existing_destination_is_refused_before_fetch() {
    let dirs = Dirs::new();
    write(dirs.out.path(), "Acme/keep.txt", "mine");
    let generator = dirs.generator(Failure::None);

    let err = generator.generate(&dirs.request(false)).unwrap_err();

    assert_eq!(err.code, ErrorCode::DestinationExists);
    assert_eq!(
        fs::read_to_string(dirs.out.path().join("Acme/keep.txt")).unwrap(),
        "mine"
    );
    assert!(dirs.work_is_empty());
}

#[test]
fn force_replaces_existing_destination() {
    let dirs = Dirs::new();
    write(dirs.out.path(), "Acme/stale.txt", "old");

    dirs.generator(Failure::None).generate(&dirs.request(true)).unwrap();

    let dest = dirs.out.path().join("Acme");
    assert!(!dest.join("stale.txt").exists());
    assert!(dest.join("Acme/Acme.csproj").is_file());
}

#[test]
fn fetch_failure_leaves_nothing_behind() {
    let dirs = Dirs::new();

    let err = dirs.generator(Failure::Fetch).generate(&dirs.request(false)).unwrap_err();

    assert_eq!(err.code, ErrorCode::GitCommandFailed);
    assert!(dirs.work_is_empty());
    assert!(!dirs.out.path().join("Acme").exists());
}

#[test]
fn submodule_failure_keeps_existing_destination_when_forced() {
    let dirs = Dirs::new();
    write(dirs.out.path(), "Acme/keep.txt", "mine");

    let err = dirs
        .generator(Failure::Submodules)
        .generate(&dirs.request(true))
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::GitCommandFailed);
    assert!(dirs.work_is_empty());
    assert_eq!(
        fs::read_to_string(dirs.out.path().join("Acme/keep.txt")).unwrap(),
        "mine"
    );
}

#[test]
fn fail_fast_run_on_clean_template_matches_default() {
    let dirs = Dirs::new();
    let generator = dirs
        .generator(Failure::None)
        .with_fault_policy(FaultPolicy::FailFast);

    let output = generator.generate(&dirs.request(false)).unwrap();

    assert!(output
        .report
        .entries
        .iter()
        .any(|e| matches!(e, EntryOutcome::Renamed { to, .. } if to == "Acme")));
}

#[test]
fn output_directory_is_created_when_missing() {
    let dirs = Dirs::new();
    let request = GenerateRequest {
        project_name: "Acme".to_string(),
        output_dir: dirs.out.path().join("nested/projects"),
        force: false,
    };

    dirs.generator(Failure::None).generate(&request).unwrap();

    assert!(dirs
        .out
        .path()
        .join("nested/projects/Acme/Acme/Acme.csproj")
        .is_file());
}

#[test]
fn destination_created_during_fetch_is_not_replaced() {
    let dirs = Dirs::new();
    let dest = dirs.out.path().join("Acme");

    let err = dirs
        .generator(Failure::DestinationAppears(dest.clone()))
        .generate(&dirs.request(false))
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::DestinationExists);
    assert_eq!(fs::read_to_string(dest.join("precious.txt")).unwrap(), "not yours");
    assert!(!dest.join("Acme").exists());
    assert!(dirs.work_is_empty());
}

#[test]
#[cfg(unix)]
fn unreadable_file_is_reported_and_project_still_created() {
    if !permissions_enforced() {
        return;
    }
    let dirs = Dirs::new();

    let output = dirs
        .generator(Failure::Unreadable)
        .generate(&dirs.request(false))
        .unwrap();

    let dest = dirs.out.path().join("Acme");
    assert!(output.report.failures().any(|f| matches!(
        f,
        EntryOutcome::Failed { path, .. } if path == "Acme/Secret.cs"
    )));
    assert_eq!(output.report.exit_code(), 1);
    assert_eq!(
        fs::read_to_string(dest.join("Acme/Service.cs")).unwrap(),
        "using Acme.Services;\nnamespace Acme;"
    );
    assert!(dirs.work_is_empty());
}

#[test]
#[cfg(unix)]
fn unreadable_file_fails_fast_without_leftovers() {
    if !permissions_enforced() {
        return;
    }
    let dirs = Dirs::new();

    let err = dirs
        .generator(Failure::Unreadable)
        .with_fault_policy(FaultPolicy::FailFast)
        .generate(&dirs.request(false))
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InternalIoError);
    assert!(dirs.work_is_empty());
    assert!(!dirs.out.path().join("Acme").exists());
}
