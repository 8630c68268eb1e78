//! Merged, highlighted contextual snippets extracted from a buffer using a
//! compiled regex (§4.9).
//!
//! The regex returned by `search` alternates un-normalized and normalized
//! term joins and is matched case-insensitively but not accent-folded, so a
//! normalized-only surface form in the corpus may silently evade it. This is
//! a known limitation, kept as specified rather than patched.

use regex::Regex;

pub struct ExcerptConfig {
    pub ctxt_num_chars: usize,
    pub max_excerpts: usize,
    pub pre_match: String,
    pub post_match: String,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        ExcerptConfig {
            ctxt_num_chars: 35,
            max_excerpts: 5,
            pre_match: "<b>".to_string(),
            post_match: "</b>".to_string(),
        }
    }
}

struct Fragment {
    start: usize,
    end: usize,
    count: usize,
}

pub fn excerpts(buf: &str, regex: &Regex, config: &ExcerptConfig) -> Vec<String> {
    let fragments = merge_fragments(buf, regex, config.ctxt_num_chars);
    let mut fragments = expand_fragments(fragments, buf, config.ctxt_num_chars);

    fragments.sort_by(|a, b| b.count.cmp(&a.count));
    fragments.truncate(config.max_excerpts);

    fragments
        .into_iter()
        .map(|frag| highlight(&buf[frag.start..frag.end], regex, config))
        .collect()
}

fn merge_fragments(buf: &str, regex: &Regex, ctxt_num_chars: usize) -> Vec<Fragment> {
    let mut fragments: Vec<Fragment> = Vec::new();

    for m in regex.find_iter(buf) {
        match fragments.last_mut() {
            Some(last) if m.start() <= last.end.saturating_add(ctxt_num_chars) => {
                last.end = m.end();
                last.count += 1;
            }
            _ => fragments.push(Fragment { start: m.start(), end: m.end(), count: 1 }),
        }
    }

    fragments
}

fn expand_fragments(fragments: Vec<Fragment>, buf: &str, ctxt_num_chars: usize) -> Vec<Fragment> {
    fragments
        .into_iter()
        .map(|frag| Fragment {
            start: back_n_chars(buf, frag.start, ctxt_num_chars),
            end: forward_n_chars(buf, frag.end, ctxt_num_chars),
            count: frag.count,
        })
        .collect()
}

/// The byte offset `n` chars before `byte_pos` (a char boundary), clamped to
/// the start of `buf`.
fn back_n_chars(buf: &str, byte_pos: usize, n: usize) -> usize {
    if n == 0 {
        return byte_pos;
    }
    buf[..byte_pos].char_indices().rev().nth(n - 1).map(|(i, _)| i).unwrap_or(0)
}

/// The byte offset `n` chars after `byte_pos` (a char boundary), clamped to
/// the end of `buf`.
fn forward_n_chars(buf: &str, byte_pos: usize, n: usize) -> usize {
    if n == 0 {
        return byte_pos;
    }
    buf[byte_pos..].char_indices().nth(n).map(|(i, _)| byte_pos + i).unwrap_or(buf.len())
}

fn highlight(slice: &str, regex: &Regex, config: &ExcerptConfig) -> String {
    let mut out = String::from("...");
    let mut last_end = 0;
    for m in regex.find_iter(slice) {
        out.push_str(&slice[last_end..m.start()]);
        out.push_str(&config.pre_match);
        out.push_str(m.as_str());
        out.push_str(&config.post_match);
        last_end = m.end();
    }
    out.push_str(&slice[last_end..]);
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_near_matches_and_highlights_both() {
        let buf = "aa FOO bb FOO cc";
        let regex = Regex::new(r"(?i)foo").unwrap();
        let config = ExcerptConfig {
            ctxt_num_chars: 4,
            max_excerpts: 1,
            pre_match: "[".to_string(),
            post_match: "]".to_string(),
        };

        let result = excerpts(buf, &regex, &config);
        assert_eq!(result, vec!["...aa [FOO] bb [FOO] cc...".to_string()]);
    }

    #[test]
    fn far_apart_matches_stay_separate_fragments() {
        let buf = "FOO aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa FOO";
        let regex = Regex::new(r"(?i)foo").unwrap();
        let config = ExcerptConfig {
            ctxt_num_chars: 3,
            max_excerpts: 5,
            pre_match: "[".to_string(),
            post_match: "]".to_string(),
        };

        let result = excerpts(buf, &regex, &config);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn max_excerpts_truncates_by_match_count_descending() {
        let buf = format!("FOO FOO FOO {} FOO", "b".repeat(60));
        let regex = Regex::new(r"(?i)foo").unwrap();
        let config = ExcerptConfig {
            ctxt_num_chars: 1,
            max_excerpts: 1,
            pre_match: "[".to_string(),
            post_match: "]".to_string(),
        };

        let result = excerpts(&buf, &regex, &config);
        assert_eq!(result.len(), 1);
        // The denser fragment (3 merged matches) wins over the lone trailing one.
        assert_eq!(result[0].matches("[FOO]").count(), 3);
    }

    #[test]
    fn context_is_clamped_to_buffer_bounds() {
        let buf = "FOO";
        let regex = Regex::new(r"(?i)foo").unwrap();
        let config = ExcerptConfig {
            ctxt_num_chars: 50,
            max_excerpts: 5,
            pre_match: "[".to_string(),
            post_match: "]".to_string(),
        };

        let result = excerpts(buf, &regex, &config);
        assert_eq!(result, vec!["...[FOO]...".to_string()]);
    }

    #[test]
    fn expansion_snaps_to_char_boundaries_on_multibyte_context() {
        // Each "é" is 2 bytes; a byte-counted expansion would land mid-char
        // and panic on the slice. ctxt_num_chars counts the 4 "é"s as 4, not 8.
        let buf = "ééééFOOéééé";
        let regex = Regex::new(r"(?i)foo").unwrap();
        let config = ExcerptConfig {
            ctxt_num_chars: 4,
            max_excerpts: 5,
            pre_match: "[".to_string(),
            post_match: "]".to_string(),
        };

        let result = excerpts(buf, &regex, &config);
        assert_eq!(result, vec!["...éééé[FOO]éééé...".to_string()]);
    }

    #[test]
    fn expansion_clamps_past_buffer_edge_on_multibyte_context() {
        let buf = "éFOOé";
        let regex = Regex::new(r"(?i)foo").unwrap();
        let config = ExcerptConfig {
            ctxt_num_chars: 50,
            max_excerpts: 5,
            pre_match: "[".to_string(),
            post_match: "]".to_string(),
        };

        let result = excerpts(buf, &regex, &config);
        assert_eq!(result, vec!["...é[FOO]é...".to_string()]);
    }
}
