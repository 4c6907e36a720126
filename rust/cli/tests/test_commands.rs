use pokerroom_cli::run;

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(args.iter().copied(), &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

#[test]
fn eval_names_the_best_hand() {
    let (code, out, _) = run_cli(&["pokerroom", "eval", "Kh", "Kd", "Ks", "9c", "9d", "2h", "3s"]);
    assert_eq!(code, 0);
    assert!(out.contains("Full House (K 9)"), "unexpected output:\n{}", out);
    assert!(out.contains("Category: 6"));
}

#[test]
fn eval_finds_the_wheel() {
    let (code, out, _) = run_cli(&["pokerroom", "eval", "Ah", "2d", "3c", "4s", "5h", "Kd", "Qc"]);
    assert_eq!(code, 0);
    assert!(out.contains("Straight (5)"), "unexpected output:\n{}", out);
}

#[test]
fn eval_rejects_duplicate_cards() {
    let (code, out, err) = run_cli(&["pokerroom", "eval", "Ah", "Ah", "3c", "4s", "5h"]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.contains("Error:"));
}

#[test]
fn sim_is_deterministic_with_same_seed() {
    let args = ["pokerroom", "sim", "--hands", "25", "--players", "3", "--seed", "11"];
    let (code1, out1, _) = run_cli(&args);
    let (code2, out2, _) = run_cli(&args);
    assert_eq!(code1, 0);
    assert_eq!(code2, 0);
    assert_eq!(out1, out2, "same seed should replay the same hands");
    assert!(out1.contains("Chip conservation: ok"));
}

#[test]
fn sim_rejects_a_single_player() {
    let (code, _, err) = run_cli(&["pokerroom", "sim", "--players", "1"]);
    assert_eq!(code, 2);
    assert!(err.contains("Commands:"));
}

#[test]
fn practice_rejects_too_many_bots() {
    let (code, _, err) = run_cli(&["pokerroom", "practice", "--bots", "9"]);
    assert_eq!(code, 2);
    assert!(!err.is_empty());
}

#[test]
fn version_goes_to_stdout() {
    let (code, out, err) = run_cli(&["pokerroom", "--version"]);
    assert_eq!(code, 0);
    assert!(out.contains("pokerroom"));
    assert!(err.is_empty());
}
