use std::fs;
use std::path::{Path, PathBuf};

use helpsync_generate::config::SyncConfig;
use helpsync_generate::defaults::install_default_templates;
use helpsync_generate::emit::Dialect;
use helpsync_generate::pipeline::{Pipeline, SyncEvent};
use helpsync_generate::SyncError;
use tempfile::TempDir;

const EXPECTED_COMMANDS: &str = "capabilities check clean fetch list push stat";

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Repository layout with the fixture tool, README and bundled templates.
fn workspace() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::copy(
        fixture_path("git-remote-gcrypt"),
        dir.path().join("git-remote-gcrypt"),
    )
    .expect("copy source fixture");
    fs::copy(fixture_path("README.rst"), dir.path().join("README.rst"))
        .expect("copy README fixture");
    install_default_templates(dir.path(), &SyncConfig::default(), false)
        .expect("install templates");
    dir
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap_or_else(|e| panic!("failed to read {rel}: {e}"))
}

fn run_sync(root: &Path) -> Vec<SyncEvent> {
    let pipeline = Pipeline::new(root, SyncConfig::default());
    let mut events = Vec::new();
    pipeline
        .sync(|event| events.push(event.clone()))
        .expect("sync succeeds");
    events
}

#[test]
fn test_sync_writes_all_completions() {
    let dir = workspace();
    let events = run_sync(dir.path());

    assert_eq!(
        events.first().map(ToString::to_string).as_deref(),
        Some(format!("Detected commands: {EXPECTED_COMMANDS}").as_str())
    );
    assert_eq!(events.last(), Some(&SyncEvent::Finished));
    let written: Vec<Dialect> = events
        .iter()
        .filter_map(|e| match e {
            SyncEvent::UpdatingCompletion { dialect, .. } => Some(*dialect),
            _ => None,
        })
        .collect();
    assert_eq!(written, Dialect::ALL);

    let bash = read(dir.path(), "completions/bash/git-remote-gcrypt");
    assert!(bash.contains(&format!("commands=\"{EXPECTED_COMMANDS}\"")));
    assert!(bash.contains("compgen -W \"-f --force --init -h --help $remotes\""));
    assert!(bash.contains("awk '{print $1}'"));

    let zsh = read(dir.path(), "completions/zsh/_git-remote-gcrypt");
    assert!(zsh.contains(&format!("'1:command:({EXPECTED_COMMANDS})'")));
    assert!(zsh.contains("'(-f --force --init)'{-f,--force,--init}'[actually delete files]' \\"));

    let fish = read(dir.path(), "completions/fish/git-remote-gcrypt.fish");
    assert!(fish.contains(&format!(
        "-n \"not __fish_seen_subcommand_from {EXPECTED_COMMANDS}\" -a 'check'"
    )));
    for (marker, name) in [("-s", "f"), ("-l", "force"), ("-l", "init")] {
        let line = format!(
            "complete -c git-remote-gcrypt -f -n \"__fish_seen_subcommand_from clean\" {marker} {name} -d 'actually delete files'"
        );
        assert!(fish.contains(&line), "missing fish line: {line}");
    }
    assert!(!fish.contains("{clean_flags}"));
}

#[test]
fn test_command_list_recoverable_from_every_dialect() {
    let dir = workspace();
    run_sync(dir.path());

    let config = SyncConfig::default();
    let expected: Vec<String> = EXPECTED_COMMANDS.split(' ').map(String::from).collect();
    for dialect in Dialect::ALL {
        let script = fs::read_to_string(dir.path().join(&config.completions.target(dialect).output))
            .expect("completion written");
        assert_eq!(
            dialect.recover_command_list(&script),
            Some(expected.clone()),
            "{dialect} command list"
        );
    }
}

#[test]
fn test_sync_rewrites_readme_sections() {
    let dir = workspace();
    let events = run_sync(dir.path());
    assert!(events.contains(&SyncEvent::UpdatingReadme(dir.path().join("README.rst"))));

    let readme = read(dir.path(), "README.rst");
    assert!(!readme.contains("Outdated detection text."));
    assert!(!readme.contains("Outdated cleaning text."));
    assert!(readme.contains("    git-remote-gcrypt check url\n"));
    assert!(readme.contains("Exit status is 0 if the URL is a gcrypt repository, 1 otherwise."));
    assert!(readme.contains("    git-remote-gcrypt clean url --force\n"));
    assert!(readme.starts_with("=================\ngit-remote-gcrypt\n"));
    assert!(readme.contains("Quickstart\n==========\n\nCreate an encrypted remote."));
    assert!(readme.ends_with("Known issues\n============\n\nEvery push rewrites the manifest.\n"));
}

#[test]
fn test_second_run_is_byte_identical() {
    let dir = workspace();
    run_sync(dir.path());

    let config = SyncConfig::default();
    let mut paths: Vec<PathBuf> = Dialect::ALL
        .iter()
        .map(|&d| dir.path().join(&config.completions.target(d).output))
        .collect();
    paths.push(dir.path().join("README.rst"));
    let first: Vec<String> = paths
        .iter()
        .map(|p| fs::read_to_string(p).unwrap())
        .collect();

    let events = run_sync(dir.path());
    assert!(events.contains(&SyncEvent::ReadmeUpToDate(dir.path().join("README.rst"))));
    let second: Vec<String> = paths
        .iter()
        .map(|p| fs::read_to_string(p).unwrap())
        .collect();
    assert_eq!(first, second);
}

#[test]
fn test_check_reports_drift_until_synced() {
    let dir = workspace();
    let pipeline = Pipeline::new(dir.path(), SyncConfig::default());

    let stale = pipeline.check().unwrap();
    assert_eq!(stale.len(), 4);
    assert!(stale.contains(&dir.path().join("README.rst")));
    assert!(!dir.path().join("completions/bash/git-remote-gcrypt").exists());

    pipeline.sync(|_| {}).unwrap();
    assert!(pipeline.check().unwrap().is_empty());
}

#[test]
fn test_readme_without_known_headings_is_untouched() {
    let dir = workspace();
    let original = "Title\n=====\n\nNothing to see here.\n";
    fs::write(dir.path().join("README.rst"), original).unwrap();

    let events = run_sync(dir.path());
    assert!(events.contains(&SyncEvent::ReadmeUpToDate(dir.path().join("README.rst"))));
    assert_eq!(read(dir.path(), "README.rst"), original);
}

#[test]
fn test_missing_readme_is_skipped() {
    let dir = workspace();
    fs::remove_file(dir.path().join("README.rst")).unwrap();

    let pipeline = Pipeline::new(dir.path(), SyncConfig::default());
    let report = pipeline.sync(|_| {}).unwrap();
    assert_eq!(report.readme_updated, None);
    assert_eq!(report.completions.len(), 3);
    assert!(!dir.path().join("README.rst").exists());
}

#[test]
fn test_missing_template_aborts_after_earlier_writes() {
    let dir = workspace();
    let config = SyncConfig::default();
    let zsh_template = config.template_path(dir.path(), &config.completions.zsh.template);
    fs::remove_file(&zsh_template).unwrap();

    let pipeline = Pipeline::new(dir.path(), config.clone());
    let err = pipeline.sync(|_| {}).unwrap_err();
    match err {
        SyncError::TemplateNotFound(path) => assert_eq!(path, zsh_template),
        other => panic!("expected TemplateNotFound, got {other:?}"),
    }

    assert!(dir.path().join(&config.completions.bash.output).exists());
    assert!(!dir.path().join(&config.completions.zsh.output).exists());
    assert!(!dir.path().join(&config.completions.fish.output).exists());
}

#[test]
fn test_flags_come_from_help_text_not_template() {
    let dir = workspace();
    let source = fs::read_to_string(dir.path().join("git-remote-gcrypt")).unwrap();
    let trimmed: String = source
        .lines()
        .filter(|line| !line.starts_with("    clean --init"))
        .map(|line| format!("{line}\n"))
        .collect();
    fs::write(dir.path().join("git-remote-gcrypt"), trimmed).unwrap();

    run_sync(dir.path());
    let bash = read(dir.path(), "completions/bash/git-remote-gcrypt");
    assert!(bash.contains("compgen -W \"-f --force -h --help $remotes\""));
    let zsh = read(dir.path(), "completions/zsh/_git-remote-gcrypt");
    assert!(zsh.contains("'(-f --force)'{-f,--force}'[actually delete files]'"));
}

#[test]
fn test_failing_write_is_announced_first() {
    let dir = workspace();
    let config = SyncConfig::default();
    // A directory where the zsh script should go makes the write fail.
    let zsh_output = dir.path().join(&config.completions.zsh.output);
    fs::create_dir_all(&zsh_output).unwrap();

    let pipeline = Pipeline::new(dir.path(), config.clone());
    let mut events = Vec::new();
    let err = pipeline.sync(|event| events.push(event.clone())).unwrap_err();
    assert!(matches!(err, SyncError::Io { .. }), "unexpected error: {err:?}");
    assert_eq!(
        events.last(),
        Some(&SyncEvent::UpdatingCompletion {
            dialect: Dialect::Zsh,
            path: zsh_output,
        })
    );
}
