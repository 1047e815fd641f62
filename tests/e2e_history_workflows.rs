//! End-to-end tests: editing sessions driven through the CLI layer
//!
//! Each test runs commands against a history file in a temp dir, then
//! reopens the history the way a later session would.

use std::path::{Path, PathBuf};

use clap::Parser;
use specflow_cli::{Cli, CommandRouter, Context};
use specflow_history::{
    Agent, AgentCollection, FieldPath, HistoryConfig, HistoryManager, HistoryState, Impact,
    JsonFileStore, Operation,
};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, agents: Vec<Agent>) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(&AgentCollection::from(agents))?)?;
    Ok(path)
}

fn session(dir: &TempDir) -> Context {
    let config = HistoryConfig::default()
        .with_history_path(dir.path().join("history.json"))
        .with_checkpoint_interval(2);
    Context::new(config)
}

fn run(ctx: &Context, args: &[&str]) -> anyhow::Result<()> {
    let cli = Cli::parse_from(std::iter::once("specflow").chain(args.iter().copied()));
    CommandRouter::execute(&cli, ctx)?;
    Ok(())
}

fn stored_state(dir: &TempDir) -> anyhow::Result<HistoryState> {
    let state: HistoryState = specflow_common::load_json(dir.path().join("history.json"))?;
    Ok(state)
}

#[test]
fn test_constraint_edit_round_trip() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let ctx = session(&dir);
    let base = write(dir.path(), "base.json", vec![Agent::new("a")])?;
    let edit = write(
        dir.path(),
        "edit.json",
        vec![Agent::new("a").with_constraints(["x"])],
    )?;

    run(&ctx, &["init", base.to_str().unwrap()])?;
    run(&ctx, &["commit", edit.to_str().unwrap()])?;

    let state = stored_state(&dir)?;
    assert_eq!(state.patches.len(), 1);
    let diff = &state.patches[0].diffs()[0];
    assert_eq!(diff.entity_name, "a");
    assert_eq!(diff.path, FieldPath::Constraints);
    assert_eq!(diff.operation, Operation::Add);
    assert_eq!(specflow_history::classify(&state.patches[0]), Impact::High);

    run(&ctx, &["undo"])?;
    let history = ctx.open_history()?;
    assert_eq!(history.current_state(), &AgentCollection::from(vec![Agent::new("a")]));

    run(&ctx, &["redo"])?;
    let history = ctx.open_history()?;
    assert_eq!(
        history.current_state(),
        &AgentCollection::from(vec![Agent::new("a").with_constraints(["x"])])
    );
    Ok(())
}

#[test]
fn test_stored_history_wire_format() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let ctx = session(&dir);
    let base = write(dir.path(), "base.json", vec![Agent::new("a")])?;
    let edit = write(
        dir.path(),
        "edit.json",
        vec![Agent::new("a"), Agent::new("b").with_role("reviewer")],
    )?;

    run(&ctx, &["init", base.to_str().unwrap()])?;
    run(&ctx, &["commit", edit.to_str().unwrap(), "--name", "add reviewer"])?;
    run(&ctx, &["undo"])?;

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("history.json"))?)?;
    assert_eq!(raw["currentIndex"], -1);
    let patch = &raw["patches"][0];
    assert_eq!(patch["kind"], "SpecPatch");
    assert_eq!(patch["version"], "v1");
    assert_eq!(patch["metadata"]["name"], "add reviewer");
    assert_eq!(patch["metadata"]["author"], "human");
    assert_eq!(patch["spec"]["diffs"][0]["agentName"], "b");
    assert_eq!(patch["spec"]["diffs"][0]["path"], "agent");
    assert_eq!(patch["spec"]["diffs"][0]["after"]["role"], "reviewer");
    Ok(())
}

#[test]
fn test_long_session_checkpoints_and_truncation() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let ctx = session(&dir);
    let version = |n: usize| Agent::new("a").with_role(format!("v{}", n));

    let base = write(dir.path(), "v0.json", vec![version(0)])?;
    run(&ctx, &["init", base.to_str().unwrap()])?;
    for n in 1..=7 {
        let file = write(dir.path(), &format!("v{}.json", n), vec![version(n)])?;
        run(&ctx, &["commit", file.to_str().unwrap()])?;
    }

    // Interval 2 over indices 0..=6
    let indices: Vec<usize> = stored_state(&dir)?
        .checkpoints
        .iter()
        .map(|c| c.patch_index)
        .collect();
    assert_eq!(indices, vec![2, 4, 6]);

    for _ in 0..4 {
        run(&ctx, &["undo"])?;
    }
    let fork = write(dir.path(), "fork.json", vec![version(99)])?;
    run(&ctx, &["commit", fork.to_str().unwrap()])?;

    let state = stored_state(&dir)?;
    assert_eq!(state.patches.len(), 4);
    assert_eq!(state.current_index, Some(3));
    assert!(state.checkpoints.iter().all(|c| c.patch_index <= 3));

    // Redo past the fork is a notice, not a failure
    run(&ctx, &["redo"])?;
    assert_eq!(ctx.open_history()?.current_state().get("a").map(|a| a.role.as_str()), Some("v99"));
    Ok(())
}

#[test]
fn test_revert_by_logged_id() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let ctx = session(&dir);
    let v0 = write(dir.path(), "v0.json", vec![Agent::new("a")])?;
    let v1 = write(dir.path(), "v1.json", vec![Agent::new("a").with_capabilities(["read"])])?;
    let v2 = write(
        dir.path(),
        "v2.json",
        vec![Agent::new("a").with_capabilities(["read", "write"])],
    )?;

    run(&ctx, &["init", v0.to_str().unwrap()])?;
    run(&ctx, &["commit", v1.to_str().unwrap()])?;
    run(&ctx, &["commit", v2.to_str().unwrap()])?;
    run(&ctx, &["log"])?;

    let first = stored_state(&dir)?.patches[0].id().to_string();
    run(&ctx, &["revert", first.as_str()])?;

    let history = ctx.open_history()?;
    assert_eq!(history.current_index(), Some(0));
    assert_eq!(history.current_state().get("a").unwrap().capabilities, vec!["read"]);
    assert!(history.can_redo());
    Ok(())
}

#[test]
fn test_resume_with_library_after_cli_session() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let ctx = session(&dir);
    let v0 = write(dir.path(), "v0.json", vec![Agent::new("a")])?;
    let v1 = write(dir.path(), "v1.json", vec![Agent::new("a"), Agent::new("b")])?;
    run(&ctx, &["init", v0.to_str().unwrap()])?;
    run(&ctx, &["commit", v1.to_str().unwrap()])?;

    let store = JsonFileStore::new(dir.path().join("history.json"));
    let mut manager = HistoryManager::with_store(ctx.config().clone(), Box::new(store))?;
    assert_eq!(manager.current_state().len(), 2);

    let collection = manager.undo()?.into_value();
    assert_eq!(collection.len(), 1);
    assert!(!manager.can_undo());
    Ok(())
}

#[test]
fn test_analyze_and_diff_leave_history_alone() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let ctx = session(&dir);
    let a = write(dir.path(), "a.json", vec![Agent::new("a").with_send_to(["b"])])?;
    let b = write(dir.path(), "b.json", vec![Agent::new("b")])?;

    run(&ctx, &["analyze", a.to_str().unwrap()])?;
    run(&ctx, &["diff", a.to_str().unwrap(), b.to_str().unwrap()])?;
    run(&ctx, &["diff", "--json", a.to_str().unwrap(), b.to_str().unwrap()])?;
    assert!(!dir.path().join("history.json").exists());
    Ok(())
}
