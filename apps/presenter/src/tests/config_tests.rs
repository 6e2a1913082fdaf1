use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

#[test]
fn defaults_point_at_local_server() {
    let settings = Settings::default();
    assert_eq!(settings.server_url, "http://localhost:8080");
    assert_eq!(settings.request_timeout, Duration::from_secs(10));
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        "server_url = \"http://quiz.local:9000\"\nrequest_timeout_secs = 3\n",
    )
    .expect("apply");
    assert_eq!(settings.server_url, "http://quiz.local:9000");
    assert_eq!(settings.request_timeout, Duration::from_secs(3));
}

#[test]
fn negative_timeout_is_rejected() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "request_timeout_secs = -1").is_err());
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("JEOPARDY_SERVER_URL", "http://plain:1"),
        ("APP__SERVER_URL", "http://app:2"),
        ("APP__REQUEST_TIMEOUT_SECS", "4"),
    ]);
    let mut settings = Settings::default();
    apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string())).expect("apply");
    assert_eq!(settings.server_url, "http://app:2");
    assert_eq!(settings.request_timeout, Duration::from_secs(4));
}

#[test]
fn zero_timeout_is_rejected_from_file_and_env() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "request_timeout_secs = 0").is_err());
    assert!(apply_env(&mut settings, |key| {
        (key == "APP__REQUEST_TIMEOUT_SECS").then(|| "0".to_string())
    })
    .is_err());
    assert_eq!(settings.request_timeout, Duration::from_secs(10));
}

#[test]
fn unparsable_env_timeout_is_reported() {
    let mut settings = Settings::default();
    let err = apply_env(&mut settings, |key| {
        (key == "APP__REQUEST_TIMEOUT_SECS").then(|| "not-a-number".to_string())
    })
    .expect_err("bad timeout");
    assert!(err.to_string().contains("APP__REQUEST_TIMEOUT_SECS"));
    assert_eq!(settings.request_timeout, Duration::from_secs(10));
}

#[test]
fn missing_file_yields_defaults() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("presenter_missing_{suffix}.toml"));
    let settings = load_settings(&path).expect("load");
    assert_eq!(settings.request_timeout, Settings::default().request_timeout);
}

#[test]
fn malformed_file_is_reported() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("presenter_bad_{suffix}.toml"));
    fs::write(&path, "server_url = [").expect("write");
    let err = load_settings(&path).expect_err("malformed");
    assert!(err.to_string().contains("invalid settings file"));
    fs::remove_file(path).expect("cleanup");
}
