use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn change_order(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_change-order"))
        .args(args)
        .env("APP_ENV", "test")
        .env("APP_OUTPUT_PRETTY", "false")
        .env("RUST_LOG", "off")
        .output()
        .expect("binary runs")
}

fn json_output(args: &[&str]) -> Value {
    let output = change_order(args);
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

fn case_path() -> String {
    fixture("negotiating_case.json").display().to_string()
}

#[test]
fn status_reports_derived_case_status() {
    let body = json_output(&["status", "--case", &case_path()]);

    assert_eq!(body["case_id"], json!("CO-3100"));
    assert_eq!(body["status"], json!("negotiating"));
    assert_eq!(body["awaiting_response"], json!(["time_extension"]));
    assert_eq!(body["tracks"][0]["settled"], json!(true));
    assert_eq!(body["tracks"][1]["status"], json!("partially_approved"));
}

#[test]
fn evaluate_shows_subsidiary_result_for_late_special_line() {
    let body = json_output(&[
        "evaluate",
        "--case",
        &case_path(),
        "--track",
        "compensation",
    ]);

    let evaluation = &body["evaluation"];
    assert_eq!(evaluation["principal"], json!("partially_approved"));
    assert_eq!(evaluation["subsidiary"], json!("approved"));
    assert_eq!(
        evaluation["triggers"],
        json!(["preclusion_on_site_overhead"])
    );
    assert_eq!(evaluation["totals"]["total_approved"], json!(100_000.0));
    assert_eq!(
        evaluation["totals"]["total_approved_incl_precluded"],
        json!(130_000.0)
    );
    assert!(body.get("grounds").is_none());
}

#[test]
fn guidance_follows_role_and_context() {
    let claimant = json_output(&["guidance", "--case", &case_path(), "--role", "claimant"]);
    assert_eq!(
        claimant["message"]["rule"],
        json!("claimant.compensation_response")
    );
    assert_eq!(
        claimant["message"]["action"],
        json!({ "action": "accept", "track": "compensation" })
    );

    let respondent = json_output(&["guidance", "--case", &case_path(), "--role", "respondent"]);
    assert_eq!(
        respondent["message"]["rule"],
        json!("respondent.time_extension_pending")
    );

    let context = fixture("final_order_context.json").display().to_string();
    let pending = json_output(&[
        "guidance",
        "--case",
        &case_path(),
        "--role",
        "claimant",
        "--context",
        &context,
    ]);
    assert_eq!(
        pending["message"]["rule"],
        json!("claimant.final_order_pending")
    );
}

#[test]
fn guidance_today_flag_dates_the_grounds_reminder() {
    let draft = fixture("draft_variation_case.json").display().to_string();
    let body = json_output(&[
        "guidance",
        "--case",
        &draft,
        "--role",
        "claimant",
        "--today",
        "2025-04-15",
    ]);

    assert_eq!(body["message"]["rule"], json!("claimant.grounds_not_sent"));
    let text = body["message"]["body"].as_str().expect("body is text");
    assert!(text.contains("known for 14 days"), "unexpected body: {text}");
}

#[test]
fn payload_is_flat_and_carries_subsidiary_fields() {
    let body = json_output(&[
        "payload",
        "--case",
        &case_path(),
        "--track",
        "compensation",
        "--justification",
        "Site overhead notified six weeks after discovery.",
    ]);

    assert_eq!(body["event_type"], json!("compensation_response"));
    assert_eq!(body["responded_version"], json!(1));
    assert_eq!(body["subsidiary_outcome"], json!("approved"));
    assert_eq!(body["subsidiary_total_approved"], json!(130_000.0));
    assert_eq!(
        body["justification"],
        json!("Site overhead notified six weeks after discovery.")
    );
}

#[test]
fn payload_without_response_fails() {
    let output = change_order(&[
        "payload",
        "--case",
        &case_path(),
        "--track",
        "time-extension",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("the time extension track has no recorded response"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn apply_records_the_time_extension_response() {
    let event = fixture("respond_time_extension.json").display().to_string();
    let body = json_output(&["apply", "--case", &case_path(), "--event", &event]);

    let time_extension = &body["time_extension"];
    assert_eq!(time_extension["status"], json!("approved"));
    assert_eq!(time_extension["versions"]["responded_version"], json!(1));
    assert_eq!(time_extension["response"]["specified_claim_in_time"], json!(false));
}
