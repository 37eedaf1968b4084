//! Label/value lookups over OCR lines.
//!
//! Screenshot OCR puts a value either on the same line as its label
//! ("Energy added 16.7 kWh") or on the next non-empty line.

use super::dates::find_time_in;
use super::patterns::PERCENT;

/// Trimmed lines of `text`, empty lines kept so indexes stay meaningful.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).collect()
}

/// Return the value associated with `label`, if any.
///
/// An inline value is only accepted when it starts like a quantity (a digit or
/// one of `+-($`), so "Charge details" is not read as the value of "Charge".
pub fn extract_label_value(lines: &[&str], label: &str) -> Option<String> {
    let target = label.to_lowercase();
    let prefix = format!("{} ", target);

    for (idx, line) in lines.iter().enumerate() {
        let clean = line.trim();
        if clean.is_empty() {
            continue;
        }
        let lowered = clean.to_lowercase();

        if lowered.trim_end_matches(':') == target {
            return next_value(&lines[idx + 1..], &target, &prefix);
        }

        let labelled = lowered
            .strip_prefix(&target)
            .is_some_and(|rest| rest.starts_with([' ', ':']));
        if labelled {
            let inline = clean
                .get(target.len()..)
                .unwrap_or("")
                .trim()
                .trim_start_matches(':')
                .trim();
            if inline.starts_with(|c: char| c.is_ascii_digit() || "+-($".contains(c)) {
                return Some(inline.to_string());
            }
        }
    }
    None
}

fn next_value(followers: &[&str], target: &str, prefix: &str) -> Option<String> {
    followers
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .find(|l| {
            let lowered = l.to_lowercase();
            lowered != target && !lowered.starts_with(prefix)
        })
        .map(str::to_string)
}

/// First clock time at or after `start`.
pub fn find_time(lines: &[&str], start: usize) -> Option<String> {
    lines.iter().skip(start).find_map(|line| find_time_in(line))
}

/// First percentage value at or after `start`.
pub fn find_percentage(lines: &[&str], start: usize) -> Option<u32> {
    lines
        .iter()
        .skip(start)
        .find_map(|line| PERCENT.captures(line).and_then(|c| c[1].parse().ok()))
}

/// Index of the first line containing `needle` (case-insensitive).
pub fn find_line(lines: &[&str], needle: &str) -> Option<usize> {
    let needle = needle.to_lowercase();
    lines.iter().position(|l| l.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_on_next_line() {
        let lines = split_lines("Time charging\n\n2 hrs 50 min\n");
        assert_eq!(
            extract_label_value(&lines, "time charging"),
            Some("2 hrs 50 min".to_string())
        );
    }

    #[test]
    fn test_inline_value() {
        let lines = split_lines("Energy added: 16.7 kWh");
        assert_eq!(
            extract_label_value(&lines, "energy added"),
            Some("16.7 kWh".to_string())
        );
    }

    #[test]
    fn test_inline_text_is_not_a_value() {
        let lines = split_lines("Charge details\n\nCharge\n29% (+86 mi)");
        assert_eq!(
            extract_label_value(&lines, "charge"),
            Some("29% (+86 mi)".to_string())
        );
    }

    #[test]
    fn test_missing_label() {
        let lines = split_lines("Summary\nSomething");
        assert_eq!(extract_label_value(&lines, "energy added"), None);
    }

    #[test]
    fn test_find_time_and_percentage() {
        let lines = split_lines("Start\n12:32\n71%");
        assert_eq!(find_time(&lines, 0), Some("12:32".to_string()));
        assert_eq!(find_percentage(&lines, 1), Some(71));
        assert_eq!(find_percentage(&lines, 3), None);
    }
}
