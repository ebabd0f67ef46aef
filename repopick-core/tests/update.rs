use repopick_core::{FailureReason, RepoError};

mod fixture;

use fixture::GitFixture;

#[tokio::test]
async fn test_update_fast_forwards() {
    let fixture = GitFixture::new();
    fixture.push_upstream("new.txt", "from upstream\n");

    let log = fixture
        .orchestrator(|_| {})
        .update(&fixture.root(), "master")
        .await
        .unwrap();

    assert_eq!(log.len(), 2);
    assert!(log.entries()[0].command_line.ends_with("fetch --all"));
    assert!(log.entries()[1]
        .command_line
        .ends_with("pull --ff-only -- origin master"));
    assert_eq!(
        std::fs::read_to_string(fixture.work.join("new.txt")).unwrap(),
        "from upstream\n"
    );
    assert!(log.to_string().starts_with("$ git -C "));
}

#[tokio::test]
async fn test_update_already_up_to_date_is_idempotent() {
    let fixture = GitFixture::new();
    let orchestrator = fixture.orchestrator(|_| {});

    let first = orchestrator.update(&fixture.root(), "master").await.unwrap();
    let second = orchestrator.update(&fixture.root(), "master").await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
}

#[tokio::test]
async fn test_update_with_prune() {
    let fixture = GitFixture::new();

    let log = fixture
        .orchestrator(|settings| settings.repo.prune = true)
        .update(&fixture.root(), "master")
        .await
        .unwrap();

    assert!(log.entries()[0].command_line.ends_with("fetch --all --prune"));
}

#[tokio::test]
async fn test_non_fast_forward_fails_and_skips_script() {
    let fixture = GitFixture::new();
    fixture.push_upstream("upstream.txt", "theirs\n");
    fixture.commit_local("local.txt", "ours\n");

    let config_dir = fixture.config_dir();
    let marker = config_dir.join("hook-ran");
    std::fs::write(
        config_dir.join("hook.sh"),
        format!("touch {}\n", marker.display()),
    )
    .unwrap();

    let failure = fixture
        .orchestrator(|settings| settings.repo.post_update = Some("hook.sh".into()))
        .update(&fixture.root(), "master")
        .await
        .unwrap_err();

    assert_eq!(failure.log.len(), 2);
    assert!(!marker.exists());
    assert!(!fixture.work.join("upstream.txt").exists());
    match failure.error {
        RepoError::CommandFailed { command, reason } => {
            assert!(command.contains("pull --ff-only -- origin master"));
            assert!(matches!(reason, FailureReason::Exit(code) if code != 0));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_branch_fails() {
    let fixture = GitFixture::new();

    let failure = fixture
        .orchestrator(|_| {})
        .update(&fixture.root(), "no-such-branch")
        .await
        .unwrap_err();

    assert_eq!(failure.log.len(), 2);
    assert!(failure.log.entries()[1]
        .command_line
        .ends_with("pull --ff-only -- origin no-such-branch"));
    assert!(!failure.log.entries()[1].output.is_empty());
}

#[tokio::test]
async fn test_post_update_script_runs_in_root() {
    let fixture = GitFixture::new();
    let config_dir = fixture.config_dir();
    std::fs::write(
        config_dir.join("deploy.sh"),
        "pwd > deployed.txt\necho deployed\n",
    )
    .unwrap();

    let log = fixture
        .orchestrator(|settings| settings.repo.post_update = Some("deploy.sh".into()))
        .update(&fixture.root(), "master")
        .await
        .unwrap();

    assert_eq!(log.len(), 3);
    assert!(log.entries()[2].command_line.starts_with("bash "));
    assert_eq!(log.entries()[2].output, "deployed\n");
    let written = std::fs::read_to_string(fixture.work.join("deployed.txt")).unwrap();
    assert_eq!(written.trim(), fixture.work.to_string_lossy());
}

#[tokio::test]
async fn test_failing_post_update_script() {
    let fixture = GitFixture::new();
    let config_dir = fixture.config_dir();
    std::fs::write(config_dir.join("broken.sh"), "echo broken >&2\nexit 7\n").unwrap();

    let failure = fixture
        .orchestrator(|settings| settings.repo.post_update = Some("broken.sh".into()))
        .update(&fixture.root(), "master")
        .await
        .unwrap_err();

    assert_eq!(failure.log.len(), 3);
    assert_eq!(failure.log.entries()[2].output, "broken\n");
    assert!(matches!(
        failure.error,
        RepoError::CommandFailed {
            reason: FailureReason::Exit(7),
            ..
        }
    ));
}

#[tokio::test]
async fn test_concurrent_updates_are_serialised() {
    let fixture = GitFixture::new();
    fixture.push_upstream("new.txt", "x\n");
    let orchestrator = fixture.orchestrator(|_| {});
    let root = fixture.root();

    let (a, b) = tokio::join!(
        orchestrator.update(&root, "master"),
        orchestrator.update(&root, "master")
    );

    assert!(a.is_ok());
    assert!(b.is_ok());
}

#[tokio::test]
async fn test_option_like_branch_is_rejected_before_git_runs() {
    let fixture = GitFixture::new();
    let marker = fixture.temp.path().join("pwned");
    let branch = format!("--upload-pack=touch {};git-upload-pack", marker.display());

    let failure = fixture
        .orchestrator(|_| {})
        .update(&fixture.root(), &branch)
        .await
        .unwrap_err();

    assert!(matches!(&failure.error, RepoError::IllegalBranch(b) if *b == branch));
    assert!(failure.error.is_client_error());
    assert!(failure.log.is_empty());
    assert!(!marker.exists(), "the branch must never reach git as an option");
}
