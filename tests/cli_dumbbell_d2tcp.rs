use std::process::Command;

#[test]
fn dumbbell_d2tcp_runs_two_deadline_flows_to_completion() {
    let output = Command::new(env!("CARGO_BIN_EXE_dumbbell_d2tcp"))
        .args([
            "--quiet",
            "--flows",
            "2",
            "--data-bytes",
            "146000",
            "--deadline-us",
            "100000",
            "--queue",
            "pfabric",
            "--until-ms",
            "1000",
        ])
        .output()
        .expect("run dumbbell_d2tcp");
    assert!(
        output.status.success(),
        "dumbbell_d2tcp failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("flow 1:"), "stdout was: {stdout}");
    assert!(stdout.contains("flow 2:"), "stdout was: {stdout}");
    assert!(stdout.contains("finished=true"), "stdout was: {stdout}");
    assert!(stdout.contains("net: delivered_pkts="), "stdout was: {stdout}");
}

#[test]
fn dumbbell_d2tcp_rejects_unknown_queue_kind() {
    let output = Command::new(env!("CARGO_BIN_EXE_dumbbell_d2tcp"))
        .args(["--quiet", "--queue", "red"])
        .output()
        .expect("run dumbbell_d2tcp");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown queue kind"), "stderr: {stderr}");
}
