use pokerroom_cli::config::{BOT_DELAY_ENV, CONFIG_ENV, SEED_ENV};
use pokerroom_cli::run;
use serde_json::Value;
use serial_test::serial;
use std::io::Write;

fn clear_env() {
    for key in [CONFIG_ENV, SEED_ENV, BOT_DELAY_ENV] {
        unsafe {
            std::env::remove_var(key);
        }
    }
}

fn cfg_json() -> (i32, Value) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(["pokerroom", "cfg"], &mut out, &mut err);
    let json = serde_json::from_slice(&out).unwrap_or(Value::Null);
    (code, json)
}

#[test]
#[serial]
fn cfg_shows_defaults_without_file_or_env() {
    clear_env();
    let (code, json) = cfg_json();
    assert_eq!(code, 0);
    assert_eq!(json["starting_chips"]["value"], 1000);
    assert_eq!(json["starting_chips"]["source"], "default");
    assert_eq!(json["bot_delay_ms"]["value"], 1200);
    assert_eq!(json["bot_count"]["value"], 3);
    assert!(json["seed"]["value"].is_null());
}

#[test]
#[serial]
fn env_overrides_the_config_file() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "seed = 5\nstarting_chips = 500\nbot_delay_ms = 800").unwrap();
    unsafe {
        std::env::set_var(CONFIG_ENV, file.path());
        std::env::set_var(SEED_ENV, "99");
    }

    let (code, json) = cfg_json();
    clear_env();

    assert_eq!(code, 0);
    assert_eq!(json["seed"]["value"], 99);
    assert_eq!(json["seed"]["source"], "env");
    assert_eq!(json["starting_chips"]["value"], 500);
    assert_eq!(json["starting_chips"]["source"], "file");
    assert_eq!(json["bot_delay_ms"]["value"], 800);
    assert_eq!(json["small_blind"]["source"], "default");
}

#[test]
#[serial]
fn invalid_blinds_in_file_fail() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "small_blind = 50\nbig_blind = 20").unwrap();
    unsafe {
        std::env::set_var(CONFIG_ENV, file.path());
    }

    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(["pokerroom", "cfg"], &mut out, &mut err);
    clear_env();

    assert_eq!(code, 2);
    assert!(String::from_utf8_lossy(&err).contains("Configuration error"));
}

#[test]
#[serial]
fn unparseable_env_seed_fails() {
    clear_env();
    unsafe {
        std::env::set_var(SEED_ENV, "not-a-number");
    }
    let (code, _) = cfg_json();
    clear_env();
    assert_eq!(code, 2);
}
