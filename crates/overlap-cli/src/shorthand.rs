//! Threshold shorthand: `--90` or a bare `90` stands for `--threshold 90`.

/// Options whose next argument is their value and must not be rewritten.
const VALUE_OPTIONS: [&str; 15] = [
    "-t",
    "--threshold",
    "-o",
    "--output-tag",
    "--output-dir",
    "--format",
    "--assignment",
    "--source",
    "--target",
    "--gold",
    "--thresholds",
    "--log-level",
    "--log-format",
    "--log-file",
    "--color",
];

/// Rewrite shorthand threshold arguments before clap sees them.
///
/// The program name (first argument) and option values are never rewritten.
pub fn expand_threshold_shorthand<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut expanded: Vec<String> = args.next().into_iter().collect();
    let mut expects_value = false;
    for arg in args {
        if expects_value {
            expects_value = false;
            expanded.push(arg);
            continue;
        }
        if let Some(digits) = arg.strip_prefix("--").filter(|rest| is_all_digits(rest)) {
            expanded.push("--threshold".to_string());
            expanded.push(digits.to_string());
        } else if is_all_digits(&arg) {
            expanded.push("--threshold".to_string());
            expanded.push(arg);
        } else {
            expects_value = VALUE_OPTIONS.contains(&arg.as_str());
            expanded.push(arg);
        }
    }
    expanded
}

fn is_all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
