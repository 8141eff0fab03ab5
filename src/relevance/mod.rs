//! Approximate subsequence matching and relevance scoring
//!
//! A query matches a text when all of its characters appear in the text in
//! order, ignoring case. The score rewards short match windows, contiguous
//! runs, matches that begin words and short texts. Contiguous matches always
//! land in `[0.9, 1.0]`, fragmented ones in `[0.0, 0.9)`.
//!
//! All positions are character (not byte) offsets into the text.

/// Characters after which a new "word" begins
const WORD_BOUNDARIES: [char; 6] = [' ', '-', '.', '(', '[', '_'];

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn folded(s: &str) -> Vec<char> {
    s.chars().map(fold).collect()
}

/// Find `needle` in `haystack[from..to)`
fn find(haystack: &[char], needle: char, from: usize, to: usize) -> Option<usize> {
    let to = to.min(haystack.len());
    if from >= to {
        return None;
    }
    haystack[from..to]
        .iter()
        .position(|&c| c == needle)
        .map(|pos| pos + from)
}

/// Shortest window `[start, end)` of `text` containing `query` as a subsequence.
///
/// Both inputs must already be case folded.
fn best_window(text: &[char], query: &[char]) -> Option<(usize, usize)> {
    let (&first_char, &last_char) = (query.first()?, query.last()?);
    // Nothing past the last occurrence of the final query char can be used
    let last = text.iter().rposition(|&c| c == last_char)?;
    let last_start = (last + 1).checked_sub(query.len())?;

    let mut best: Option<(usize, usize)> = None;
    let mut index = find(text, first_char, 0, text.len());

    while let Some(start) = index {
        if start > last_start {
            break;
        }

        let mut cur = start + 1;
        for &qc in &query[1..] {
            match find(text, qc, cur, last + 1) {
                Some(pos) => cur = pos + 1,
                // a later start cannot find it either
                None => return best,
            }
        }

        if best.map_or(true, |(s, e)| cur - start < e - s) {
            best = Some((start, cur));
            if cur - start == query.len() {
                break;
            }
        }

        index = find(text, first_char, start + 1, text.len());
    }

    best
}

/// Locate the best match window of `query` in `text`.
///
/// Returns `(start, end)` character offsets, or `None` when `query` is empty
/// or not a case-insensitive subsequence of `text`.
pub fn find_best_match(text: &str, query: &str) -> Option<(usize, usize)> {
    best_window(&folded(text), &folded(query))
}

/// Score how well `query` matches `text`, in `[0.0, 1.0]`.
///
/// An empty query matches everything with `1.0`; a query that is not an
/// ordered subsequence of the text scores `0.0`.
pub fn score(text: &str, query: &str) -> f64 {
    if query.is_empty() {
        return 1.0;
    }
    score_folded(&folded(text), &folded(query))
}

fn score_folded(text: &[char], query: &[char]) -> f64 {
    let Some((first, last)) = best_window(text, query) else {
        return 0.0;
    };

    let query_len = query.len() as f64;
    let window_len = last - first;

    // Shortest window relative to the query, weighted toward short texts
    let mut base = query_len / window_len as f64;
    base *= 0.7 + 0.3 * query_len / text.len() as f64;

    let mut first_count: u32 = 0;
    let mut bad: u32 = 1;
    for i in first..last.saturating_sub(1) {
        if WORD_BOUNDARIES.contains(&text[i]) {
            if query.contains(&text[i + 1]) {
                first_count += 1;
            } else {
                bad += 1;
            }
        }
    }
    if query[0] == text[0] {
        first_count += 2;
    }

    let mut good = 4 * first_count * first_count;
    if first == 0 {
        good += 2;
    }
    if query == text {
        good += 2 * window_len as u32 + 4;
    }

    let (good, bad) = (f64::from(good), f64::from(bad));
    let score = (base + 3.0 * good / (good + bad)) / 4.0;

    if window_len == query.len() {
        0.9 + 0.1 * score
    } else {
        0.9 * score
    }
}

/// Fast path for single character queries.
pub fn score_single(text: &str, ch: char) -> f64 {
    let ch = fold(ch);
    let mut len = 0usize;
    let mut found = None;
    for (pos, c) in text.chars().enumerate() {
        if found.is_none() && fold(c) == ch {
            found = Some(pos);
        }
        len += 1;
    }

    match found {
        None => 0.0,
        Some(pos) => {
            let mut score = 0.9 + 0.025 / len as f64;
            if pos == 0 {
                score += 0.07;
            }
            score
        }
    }
}

/// Render `text` with the runs matched by `query` passed through `match_fmt`
/// and everything else through `clean_fmt`.
///
/// Uses the same window search as [`score`], so the highlighted characters are
/// exactly the ones that earned the score.
pub fn format_common_substrings<C, M>(text: &str, query: &str, clean_fmt: C, match_fmt: M) -> String
where
    C: Fn(&str) -> String,
    M: Fn(&str) -> String,
{
    let original: Vec<char> = text.chars().collect();
    let folded_text: Vec<char> = original.iter().map(|&c| fold(c)).collect();
    let folded_query = folded(query);
    let mut out = String::with_capacity(text.len());
    format_runs(
        &original,
        &folded_text,
        &folded_query,
        &clean_fmt,
        &match_fmt,
        &mut out,
    );
    out
}

fn format_runs(
    original: &[char],
    text: &[char],
    query: &[char],
    clean_fmt: &dyn Fn(&str) -> String,
    match_fmt: &dyn Fn(&str) -> String,
    out: &mut String,
) {
    let emit = |chars: &[char], fmt: &dyn Fn(&str) -> String, out: &mut String| {
        if !chars.is_empty() {
            out.push_str(&fmt(&chars.iter().collect::<String>()));
        }
    };

    let Some((first, last)) = best_window(text, query) else {
        emit(original, clean_fmt, out);
        return;
    };

    // Longest prefix of the query matched contiguously at the window start
    let run = (1..=query.len())
        .rev()
        .find(|&n| first + n <= text.len() && text[first..first + n] == query[..n])
        .unwrap_or(1);

    emit(&original[..first], clean_fmt, out);
    emit(&original[first..first + run], match_fmt, out);
    format_runs(
        &original[first + run..last],
        &text[first + run..last],
        &query[run..],
        clean_fmt,
        match_fmt,
        out,
    );
    emit(&original[last..], clean_fmt, out);
}

/// Escape text for Pango-style markup
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Markup with matched runs in bold
pub fn markup_matches(text: &str, query: &str) -> String {
    format_common_substrings(text, query, escape_markup, |s| {
        format!("<b>{}</b>", escape_markup(s))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_scores_one() {
        for text in ["terminal", "a", "Firefox Web Browser", "x-y_z"] {
            assert_eq!(score(text, ""), 1.0);
        }
    }

    #[test]
    fn test_non_subsequence_scores_zero() {
        assert_eq!(score("terminal", "yl"), 0.0);
        assert_eq!(score("terminal", "lt"), 0.0);
        assert_eq!(score("abc", "abcd"), 0.0);
        assert_eq!(score("", "a"), 0.0);
    }

    #[test]
    fn test_contiguous_beats_fragmented() {
        let contiguous = score("terminal", "term");
        let fragmented = score("terminal", "trml");
        assert!(contiguous >= 0.9);
        assert!(fragmented < 0.9);
        assert!(contiguous > fragmented);
    }

    #[test]
    fn test_score_range() {
        let pairs = [
            ("terminal", "tl"),
            ("gnome-terminal", "gt"),
            ("Open Office Writer", "oow"),
            ("total told", "tl"),
            ("firefox", "firefox"),
        ];
        for (text, query) in pairs {
            let s = score(text, query);
            assert!((0.0..=1.0).contains(&s), "{text}/{query} -> {s}");
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(score("Terminal", "TERM"), score("terminal", "term"));
        assert!(score("README.md", "readme") >= 0.9);
    }

    #[test]
    fn test_exact_match_beats_longer_text() {
        assert!(score("firefox", "firefox") > score("firefox-esr", "firefox"));
        assert!(score("firefox", "fire") > score("campfire", "fire"));
    }

    #[test]
    fn test_word_start_bonus() {
        assert!(score("gnome-terminal", "gt") > score("gnomexterminal", "gt"));
        assert!(score("open_office", "oo") > score("openxoffice", "oo"));
    }

    #[test]
    fn test_find_best_match() {
        assert_eq!(find_best_match("terminal", "trml"), Some((0, 8)));
        assert_eq!(find_best_match("total told", "tl"), Some((2, 5)));
        assert_eq!(find_best_match("terminal", "yl"), None);
        assert_eq!(find_best_match("terminal", ""), None);
        assert_eq!(find_best_match("Terminal", "T"), Some((0, 1)));
    }

    #[test]
    fn test_find_best_match_prefers_contiguous() {
        assert_eq!(find_best_match("axbxab", "ab"), Some((4, 6)));
    }

    #[test]
    fn test_score_single() {
        assert_eq!(score_single("terminal", 'q'), 0.0);
        let at_start = score_single("Terminal", 't');
        assert!((at_start - (0.9 + 0.025 / 8.0 + 0.07)).abs() < 1e-12);
        let inside = score_single("terminal", 'm');
        assert!((inside - (0.9 + 0.025 / 8.0)).abs() < 1e-12);
        assert!(at_start > inside);
        assert!(score_single("vi", 'v') > score_single("vim", 'v'));
    }

    #[test]
    fn test_format_common_substrings() {
        let rendered = format_common_substrings(
            "terminal",
            "trml",
            |s| s.to_string(),
            |s| format!("[{s}]"),
        );
        assert_eq!(rendered, "[t]e[rm]ina[l]");

        let rendered = format_common_substrings(
            "Terminal",
            "term",
            |s| s.to_string(),
            |s| format!("[{s}]"),
        );
        assert_eq!(rendered, "[Term]inal");
    }

    #[test]
    fn test_format_without_match_is_clean() {
        let rendered =
            format_common_substrings("terminal", "xyz", |s| s.to_uppercase(), |s| format!("[{s}]"));
        assert_eq!(rendered, "TERMINAL");
        let rendered =
            format_common_substrings("terminal", "", |s| s.to_uppercase(), |s| format!("[{s}]"));
        assert_eq!(rendered, "TERMINAL");
    }

    #[test]
    fn test_markup_escapes() {
        assert_eq!(markup_matches("a<b", "b"), "a&lt;<b>b</b>");
        assert_eq!(markup_matches("R&D", "d"), "R&amp;<b>D</b>");
    }
}
