//! Integration tests for the sandsh REPL.
//!
//! These run scripts through the REPL against a temp sandbox and check the
//! replies a user would see.

use std::sync::Arc;

use sandsh_kernel::{MemorySink, ShellConfig};
use sandsh_repl::{Reply, Repl};
use tempfile::TempDir;

fn new_repl() -> (TempDir, Repl, MemorySink) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = ShellConfig::default().with_root(dir.path().join("files"));
    let sink = MemorySink::new();
    let repl = Repl::with_sink(config, Arc::new(sink.clone())).expect("Failed to create REPL");
    (dir, repl, sink)
}

/// Run lines through the REPL, stopping at `exit`. Errors are prefixed.
fn run_script(repl: &mut Repl, script: &str) -> Vec<String> {
    let mut outputs = Vec::new();

    for line in script.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match repl.process_line(line) {
            Some(Reply::Output(out)) => outputs.push(out),
            Some(Reply::Error(err)) => outputs.push(format!("ERROR: {}", err)),
            Some(Reply::Exit) => break,
            None => {}
        }
    }

    outputs
}

#[test]
fn session_builds_and_lists_a_tree() {
    let (_dir, mut repl, _sink) = new_repl();
    let outputs = run_script(
        &mut repl,
        r#"
        mkdir docs
        cd docs
        echo hello note.txt
        cat note.txt
        pwd
        cd /
        ls
    "#,
    );
    assert_eq!(outputs[0], "hello");
    assert_eq!(outputs[1], "/docs");
    assert!(outputs[2].starts_with("docs  dir"), "{}", outputs[2]);
    repl.shutdown();
}

#[test]
fn errors_are_reported_and_session_continues() {
    let (_dir, mut repl, _sink) = new_repl();
    let outputs = run_script(
        &mut repl,
        r#"
        cat missing
        launch
        echo ok
    "#,
    );
    assert_eq!(outputs.len(), 3);
    assert!(outputs[0].starts_with("ERROR: cat: "));
    assert_eq!(outputs[1], "ERROR: Unknown command: launch");
    assert_eq!(outputs[2], "ok");
    repl.shutdown();
}

#[test]
fn exit_stops_the_script() {
    let (_dir, mut repl, _sink) = new_repl();
    let outputs = run_script(
        &mut repl,
        r#"
        echo before
        exit
        echo after
    "#,
    );
    assert_eq!(outputs, vec!["before"]);
    repl.shutdown();
}

#[test]
fn shutdown_drains_background_copies() {
    let (dir, mut repl, sink) = new_repl();
    let root = repl.kernel().root().to_path_buf();
    std::fs::write(root.join("big"), vec![7u8; 300_000]).unwrap();

    let outputs = run_script(&mut repl, "cp big copy -d");
    assert_eq!(outputs, vec!["queued /big -> /copy"]);

    repl.shutdown();
    assert_eq!(std::fs::read(root.join("copy")).unwrap().len(), 300_000);
    assert_eq!(sink.lines(), vec!["[bg] cp /big -> /copy: done"]);
    drop(dir);
}
