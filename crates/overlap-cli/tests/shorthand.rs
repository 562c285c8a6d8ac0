use overlap_cli::shorthand::expand_threshold_shorthand;

fn expand(args: &[&str]) -> Vec<String> {
    expand_threshold_shorthand(args.iter().map(|arg| (*arg).to_string()))
}

#[test]
fn dashed_and_bare_numbers_become_threshold_flags() {
    assert_eq!(
        expand(&["drug-overlap", "run", "--90"]),
        ["drug-overlap", "run", "--threshold", "90"]
    );
    assert_eq!(
        expand(&["drug-overlap", "run", "75", "--format", "json"]),
        ["drug-overlap", "run", "--threshold", "75", "--format", "json"]
    );
}

#[test]
fn option_values_pass_through() {
    assert_eq!(
        expand(&["drug-overlap", "run", "-t", "80", "-o", "2024", "--source", "a.csv"]),
        ["drug-overlap", "run", "-t", "80", "-o", "2024", "--source", "a.csv"]
    );
    assert_eq!(
        expand(&["drug-overlap", "run", "--threshold=80", "-v"]),
        ["drug-overlap", "run", "--threshold=80", "-v"]
    );
}

#[test]
fn program_name_is_left_alone() {
    assert_eq!(expand(&["42"]), ["42"]);
}
