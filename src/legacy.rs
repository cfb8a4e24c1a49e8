//! Support for trajectory files written by older tools.
//!
//! Older files list one observation per line as whitespace-separated `run fitness solution`
//! triples, rather than one transition per line. [`upgrade`] rewrites those into the
//! five-field transition form that [`crate::parse::LineParser`] expects.

/// Rewrites old-style observation lines into transition lines.
///
/// Every line is first normalized by trimming it and turning each run of whitespace into a
/// comma. Then each pair of consecutive lines which belong to the same run becomes one
/// transition, provided the line before the pair is itself an old-style line of at most three
/// fields. The first line's predecessor is the last line.
///
/// If no pair qualifies, the normalized lines are returned as they are, so files already in the
/// current format pass through unchanged.
///
/// ```
/// use stn_partition::legacy::upgrade;
///
/// let old = ["1 10 1100", "1  8 1101", "1 5 1110", "2 7 0000"];
/// assert_eq!(upgrade(&old), vec!["1,10,1100,8,1101", "1,8,1101,5,1110"]);
///
/// let current = ["1,10,1100,8,1101"];
/// assert_eq!(upgrade(&current), vec!["1,10,1100,8,1101"]);
/// ```
pub fn upgrade<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let normalized: Vec<String> = lines
        .iter()
        .map(|line| {
            line.as_ref()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();

    let count = normalized.len();
    let mut upgraded = Vec::new();
    for i in 0..count.saturating_sub(1) {
        let previous = &normalized[(i + count - 1) % count];
        let current = &normalized[i];
        let next = &normalized[i + 1];
        if previous.split(',').count() > 3 || run_field(current) != run_field(next) {
            continue;
        }
        let mut transition: Vec<&str> = current.split(',').take(3).collect();
        transition.extend(next.split(',').skip(1).take(2));
        upgraded.push(transition.join(","));
    }

    if upgraded.is_empty() {
        normalized
    } else {
        upgraded
    }
}

fn run_field(line: &str) -> &str {
    line.split(',').next().unwrap_or("")
}

/// Guesses whether a trajectory file describes a discrete problem, by checking that the first
/// solution on its third line is an integer literal (bit strings are; real-valued vectors are
/// not). Returns `None` if the file is too short to tell.
///
/// ```
/// use stn_partition::legacy::looks_discrete;
///
/// let lines = ["Run,Fitness1,Solution1,Fitness2,Solution2", "1,3,0110,2,0111", "1,2,0111,1,1111"];
/// assert_eq!(looks_discrete(&lines), Some(true));
///
/// let lines = ["1,3,0.5;1.5,2,0.4;1.5", "1,2,0.4;1.5,1,0.3;1.5", "1,1,0.3;1.5,0,0.3;1.4"];
/// assert_eq!(looks_discrete(&lines), Some(false));
///
/// assert_eq!(looks_discrete(&["1,3,0110,2,0111"]), None);
/// ```
pub fn looks_discrete<S: AsRef<str>>(lines: &[S]) -> Option<bool> {
    let field = lines.get(2)?.as_ref().split(',').nth(2)?;
    Some(is_integer_literal(field.trim()))
}

fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(&['+', '-'][..]).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
