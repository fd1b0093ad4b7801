mod common;

use std::error::Error;
use std::fs;
use std::time::Duration;

use common::{init_tracing, set_mtime, stamp, success, write_at, FakeRunner};
use watchserve::exec::{BuildCommand, BuildOutcome, CommandRunner};
use watchserve::watch::{FileStamp, WatchSet, Watcher, WatcherOptions};

type TestResult = Result<(), Box<dyn Error>>;

fn options() -> WatcherOptions {
    WatcherOptions {
        poll_interval: Duration::from_millis(10),
        use_hash: false,
    }
}

#[tokio::test]
async fn init_records_every_path_and_absent_for_missing() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let csv = dir.path().join("data.csv");
    let script = dir.path().join("plot.py");
    write_at(&script, "print('chart')", 1);

    let set = WatchSet::new([csv.clone(), script.clone()])?;
    let watcher = Watcher::new(set, FakeRunner::new(), options());

    assert_eq!(watcher.record().len(), 2);
    assert_eq!(watcher.record().get(&csv), Some(FileStamp::Absent));
    assert_eq!(watcher.record().get(&script), Some(FileStamp::Present(stamp(1))));
    assert_eq!(watcher.runner().calls, 0);

    Ok(())
}

#[tokio::test]
async fn priming_issues_exactly_one_build_even_when_it_fails() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let set = WatchSet::new([dir.path().join("data.csv")])?;
    let failing = FakeRunner::with_outcomes([BuildOutcome::Failed {
        code: Some(1),
        stdout: String::new(),
        stderr: "no data".into(),
    }]);
    let mut watcher = Watcher::new(set, failing, options());

    let outcome = watcher.prime().await;
    assert!(!outcome.is_success());
    assert_eq!(watcher.runner().calls, 1);

    // Nothing changed, so polling does not build again.
    assert!(watcher.tick().await.is_none());
    assert_eq!(watcher.runner().calls, 1);

    Ok(())
}

#[tokio::test]
async fn changed_stamp_triggers_one_build_and_updates_record() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let csv = dir.path().join("data.csv");
    write_at(&csv, "a,1\n", 1);

    let set = WatchSet::new([csv.clone()])?;
    let mut watcher = Watcher::new(set, FakeRunner::new(), options());
    watcher.prime().await;

    write_at(&csv, "a,2\n", 2);
    let report = watcher.tick().await.expect("change should trigger a build");

    assert_eq!(report.path, csv);
    assert_eq!(report.previous, FileStamp::Present(stamp(1)));
    assert_eq!(report.current, FileStamp::Present(stamp(2)));
    assert_eq!(watcher.record().get(&csv), Some(FileStamp::Present(stamp(2))));
    assert_eq!(watcher.runner().calls, 2);

    // The same stamp is not reported twice.
    assert!(watcher.tick().await.is_none());
    assert_eq!(watcher.runner().calls, 2);

    Ok(())
}

#[tokio::test]
async fn file_created_after_startup_triggers_one_build() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let csv = dir.path().join("data.csv");

    let set = WatchSet::new([csv.clone()])?;
    let mut watcher = Watcher::new(set, FakeRunner::new(), options());
    assert_eq!(watcher.record().get(&csv), Some(FileStamp::Absent));
    watcher.prime().await;

    write_at(&csv, "model,score\n", 5);
    let report = watcher.tick().await.expect("absent -> present is a change");

    assert_eq!(report.previous, FileStamp::Absent);
    assert!(report.current.is_present());
    assert_eq!(watcher.runner().calls, 2);

    Ok(())
}

#[tokio::test]
async fn deleted_file_triggers_one_build() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let script = dir.path().join("plot.py");
    write_at(&script, "x = 1", 1);

    let set = WatchSet::new([script.clone()])?;
    let mut watcher = Watcher::new(set, FakeRunner::new(), options());
    watcher.prime().await;

    fs::remove_file(&script)?;
    let report = watcher.tick().await.expect("present -> absent is a change");

    assert_eq!(report.current, FileStamp::Absent);
    assert_eq!(watcher.record().get(&script), Some(FileStamp::Absent));
    assert_eq!(watcher.runner().calls, 2);

    Ok(())
}

#[tokio::test]
async fn two_files_touched_in_one_interval_build_once_per_tick() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let csv = dir.path().join("data.csv");
    let script = dir.path().join("plot.py");
    write_at(&csv, "a,1\n", 1);
    write_at(&script, "x = 1", 1);

    let set = WatchSet::new([csv.clone(), script.clone()])?;
    let mut watcher = Watcher::new(set, FakeRunner::new(), options());
    watcher.prime().await;

    set_mtime(&csv, 2);
    set_mtime(&script, 3);

    // First tick: only the first changed path is recorded and built for.
    let report = watcher.tick().await.expect("first tick should build");
    assert_eq!(report.path, csv);
    assert_eq!(watcher.runner().calls, 2);
    assert_eq!(watcher.record().get(&csv), Some(FileStamp::Present(stamp(2))));
    assert_eq!(watcher.record().get(&script), Some(FileStamp::Present(stamp(1))));

    // Second tick picks up the remaining change.
    let report = watcher.tick().await.expect("second tick should build");
    assert_eq!(report.path, script);
    assert_eq!(watcher.runner().calls, 3);
    assert_eq!(watcher.record().get(&script), Some(FileStamp::Present(stamp(3))));

    assert!(watcher.tick().await.is_none());
    assert_eq!(watcher.runner().calls, 3);

    Ok(())
}

#[tokio::test]
async fn timed_out_build_does_not_stop_polling() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let csv = dir.path().join("data.csv");
    write_at(&csv, "a,1\n", 1);

    let runner = FakeRunner::with_outcomes([
        success(),
        BuildOutcome::TimedOut {
            timeout: Duration::from_secs(30),
        },
    ]);
    let set = WatchSet::new([csv.clone()])?;
    let mut watcher = Watcher::new(set, runner, options());
    watcher.prime().await;

    set_mtime(&csv, 2);
    let report = watcher.tick().await.expect("first change");
    assert!(matches!(report.outcome, BuildOutcome::TimedOut { .. }));
    assert!(report.outcome.to_string().contains("timed out"));

    set_mtime(&csv, 3);
    let report = watcher.tick().await.expect("second change");
    assert!(report.outcome.is_success());
    assert_eq!(watcher.runner().calls, 3);

    Ok(())
}

#[tokio::test]
async fn hash_guard_ignores_touch_without_edit() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let csv = dir.path().join("data.csv");
    write_at(&csv, "a,1\n", 1);

    let set = WatchSet::new([csv.clone()])?;
    let mut watcher = Watcher::new(
        set,
        FakeRunner::new(),
        WatcherOptions {
            use_hash: true,
            ..options()
        },
    );
    watcher.prime().await;

    set_mtime(&csv, 2);
    assert!(watcher.tick().await.is_none());
    assert_eq!(watcher.record().get(&csv), Some(FileStamp::Present(stamp(2))));
    assert_eq!(watcher.runner().calls, 1);

    write_at(&csv, "a,2\n", 3);
    assert!(watcher.tick().await.is_some());
    assert_eq!(watcher.runner().calls, 2);

    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn failing_generator_reports_stderr_and_watcher_keeps_going() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let csv = dir.path().join("data.csv");
    let flag = dir.path().join("fail");
    write_at(&csv, "a,1\n", 1);
    fs::write(&flag, "")?;

    // Fails while the flag file exists, then writes the artifact.
    let cmd = "if [ -e fail ]; then echo boom >&2; exit 1; fi; echo '<html></html>' > chart.html";
    let runner = CommandRunner::new(BuildCommand::new(cmd, dir.path(), Duration::from_secs(10)));

    let set = WatchSet::new([csv.clone()])?;
    let mut watcher = Watcher::new(set, runner, options());

    let outcome = watcher.prime().await;
    assert!(outcome.to_string().contains("boom"), "{outcome}");

    fs::remove_file(&flag)?;
    set_mtime(&csv, 2);
    let report = watcher.tick().await.expect("watcher still responds to changes");
    assert!(report.outcome.is_success(), "{}", report.outcome);
    assert!(dir.path().join("chart.html").is_file());

    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn run_primes_then_polls() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let csv = dir.path().join("data.csv");
    let artifact = dir.path().join("builds.log");

    let cmd = "echo build >> builds.log";
    let runner = CommandRunner::new(BuildCommand::new(cmd, dir.path(), Duration::from_secs(10)));

    let set = WatchSet::new([csv.clone()])?;
    let watcher = Watcher::new(set, runner, options());
    let handle = tokio::spawn(watcher.run());

    let first = wait_for_lines(&artifact, 1).await;
    assert_eq!(first, 1);

    write_at(&csv, "a,1\n", 1);
    let second = wait_for_lines(&artifact, 2).await;
    assert!(second >= 2, "expected a rebuild after the file appeared");

    handle.abort();
    Ok(())
}

async fn wait_for_lines(path: &std::path::Path, want: usize) -> usize {
    for _ in 0..500 {
        let count = fs::read_to_string(path)
            .map(|s| s.lines().count())
            .unwrap_or(0);
        if count >= want {
            return count;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    0
}
