use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gettysburg"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch the gettysburg binary")
}

#[test]
fn lee_routs_an_idle_union_in_the_skirmish() {
    let output = run(&[
        "skirmish",
        "--seed",
        "1",
        "--union",
        "idle",
        "--confed-difficulty",
        "4",
        "--max-turns",
        "400",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Seed: 1\n"));
    assert!(stdout.contains("=== Skirmish ==="));
    assert!(stdout.contains("BATTLE OVER: Confed wins."));
    assert!(stdout.contains("Winner: Confed after "));
}

#[test]
fn same_seed_prints_the_same_battle() {
    let args = ["skirmish", "--seed", "42", "--union-difficulty", "1"];
    let first = run(&args);
    let second = run(&args);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
    assert!(!String::from_utf8_lossy(&first.stdout).contains("refused"));
}

#[test]
fn idle_union_loses_the_campaign_on_the_first_day() {
    let output = run(&[
        "campaign",
        "--seed",
        "7",
        "--union",
        "idle",
        "--confed-difficulty",
        "4",
        "--max-turns",
        "400",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== Day 1: Meeting Engagement ==="));
    assert!(stdout.contains("CAMPAIGN FAILED on Day 1: Meeting Engagement."));
    assert!(stdout.contains("Campaign: Defeat"));
}

#[test]
fn difficulty_outside_the_scale_is_refused() {
    let output = run(&["skirmish", "--union-difficulty", "5"]);
    assert!(!output.status.success());
}

#[test]
fn missing_config_file_is_reported() {
    let output = run(&["skirmish", "--config", "/nonexistent/gettysburg.toml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read config file"));
}
