use std::path::MAIN_SEPARATOR;

/// Shorten `path` for display so it fits into `max` characters.
///
/// The last two segments are kept intact where possible; leading segments
/// are kept while they fit and the rest is replaced with `...`.
#[must_use]
pub fn shorten_path(path: &str, max: usize) -> String {
    let len = path.chars().count();
    if len == 0 || len <= max {
        return path.to_string();
    }

    let segments: Vec<&str> = path.split(MAIN_SEPARATOR).collect();
    let split = segments.len().saturating_sub(2);
    let last = join(&segments[split..]);
    let last_len = last.chars().count();

    if last_len > max {
        return cut_front(&last, max);
    }

    // every kept segment costs a separator
    let budget = max.saturating_sub(split);
    let mut head = MAIN_SEPARATOR.to_string();
    for seg in segments[..split].iter().filter(|s| !s.is_empty()) {
        if head.chars().count() + seg.chars().count() + last_len + 4 > budget {
            break;
        }
        if !head.ends_with(MAIN_SEPARATOR) {
            head.push(MAIN_SEPARATOR);
        }
        head.push_str(seg);
    }

    if !head.ends_with(MAIN_SEPARATOR) {
        head.push(MAIN_SEPARATOR);
    }
    let short = format!("{head}...{MAIN_SEPARATOR}{last}");
    if short.chars().count() > max {
        return cut_front(&last, max);
    }
    short
}

/// `...` followed by the tail of `s`, `max` characters in total.
///
/// Below three characters only dots are left.
fn cut_front(s: &str, max: usize) -> String {
    if max < 3 {
        return ".".repeat(max);
    }
    let len = s.chars().count();
    let tail: String = s.chars().skip((len + 3).saturating_sub(max)).collect();
    format!("...{tail}")
}

fn join(segments: &[&str]) -> String {
    segments
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(&MAIN_SEPARATOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: &str = "/home/tux/src/other/lo-design/dark_with_sidebar";

    #[test]
    fn short_enough_is_unchanged() {
        assert_eq!(shorten_path("/1/2/3/4/5/6/7/8/9", 18), "/1/2/3/4/5/6/7/8/9");
        assert_eq!(shorten_path(LONG, 50), LONG);
        assert_eq!(shorten_path("", 0), "");
    }

    #[test]
    fn cuts_middle_segments() {
        assert_eq!(shorten_path(LONG, 40), "/.../lo-design/dark_with_sidebar");
        assert_eq!(
            shorten_path("/home/tux/go/src/github.com/nsf/gocode/docs", 30),
            "/home/tux/.../gocode/docs"
        );
    }

    #[test]
    fn cuts_into_last_segments() {
        assert_eq!(shorten_path(LONG, 20), "...dark_with_sidebar");
        assert_eq!(shorten_path(LONG, 30), "...lo-design/dark_with_sidebar");
    }

    #[test]
    fn never_longer_than_max() {
        for max in 0..47 {
            let short = shorten_path(LONG, max);
            assert!(short.chars().count() <= max, "{max}: {short}");
        }
    }

    #[test]
    fn tiny_width_keeps_dots() {
        assert_eq!(shorten_path(LONG, 2), "..");
        assert_eq!(shorten_path(LONG, 0), "");
    }
}
