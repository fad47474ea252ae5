//! Text helpers for Slack mrkdwn: highlight translation, interaction scrubbing, escape decoding.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};

/// Slack collapses section text behind "Show more" past this many characters on desktop.
const SHOW_MORE_CHARS: usize = 300;

static GLUED_HIGHLIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\S)<hi>(.*?)</hi>").expect("valid regex"));
static USER_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@([^>|]+)(?:\|[^>]*)?>").expect("valid regex"));
static CHANNEL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<#([A-Z0-9]+)(?:\|([^>]*))?>").expect("valid regex"));
static SPECIAL_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!(channel|here|everyone)(?:\|[^>]*)?>").expect("valid regex"));
static ANGLE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^#@!>][^>]*)>").expect("valid regex"));
static SPECIAL_CATCHALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!([^|>]+)(?:\|([^>]+))?>").expect("valid regex"));

/// Replace every whitespace character (newlines, tabs, ...) with a plain space.
pub fn normalize_whitespace(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect()
}

/// Convert search-engine `<hi>` match markup to Slack bold and join the excerpts.
///
/// `used_chars` is what the caller already spends on the same line (title and prefix),
/// the excerpt is cut so the whole section stays under Slack's "Show more" fold. The cut
/// is skipped when a highlight would be hidden by it.
pub fn translate_highlights(match_strs: &[String], used_chars: usize) -> String {
    let combined = match_strs
        .iter()
        .filter(|m| !m.is_empty())
        .map(|m| normalize_whitespace(&bold_highlights(m)).trim().to_string())
        .collect::<Vec<_>>()
        .join("... ");

    let remaining = SHOW_MORE_CHARS.saturating_sub(used_chars);
    let total = combined.chars().count();
    if total <= remaining {
        return combined;
    }

    let tail_has_highlight = combined.chars().skip(remaining).any(|c| c == '*');
    if tail_has_highlight {
        return combined;
    }

    let mut truncated: String = combined.chars().take(remaining.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

fn bold_highlights(s: &str) -> String {
    // Bold markers glued to a word would not render in mrkdwn, drop the markup there.
    // The match consumes the preceding character, so back-to-back highlights need another pass.
    let mut unglued = s.to_string();
    loop {
        let next = GLUED_HIGHLIGHT.replace_all(&unglued, "${1}${2}").into_owned();
        if next == unglued {
            break;
        }
        unglued = next;
    }
    unglued.replace("</hi>", "*").replace("<hi>", "*")
}

/// Neutralize Slack's interactive syntax in untrusted text so it renders inert.
///
/// Mentions, channel links, `<!here>`-style broadcasts and `<url|label>` links are
/// reduced to their visible text, and a zero-width space after every `@` keeps Slack
/// from re-linking mentions.
pub fn remove_interactions(s: &str) -> String {
    let s = USER_MENTION.replace_all(s, "@${1}");
    let s = CHANNEL_LINK.replace_all(&s, |caps: &Captures| match caps.get(2) {
        Some(name) if !name.as_str().is_empty() => format!("#{}", name.as_str()),
        _ => format!("#{}", &caps[1]),
    });
    let s = SPECIAL_MENTION.replace_all(&s, "@${1}");
    let s = ANGLE_LINK.replace_all(&s, |caps: &Captures| {
        let inner = &caps[1];
        match inner.split('|').nth(1) {
            Some(label) => label.to_string(),
            None => inner.to_string(),
        }
    });
    let s = SPECIAL_CATCHALL.replace_all(&s, |caps: &Captures| match caps.get(2) {
        Some(label) => label.as_str().to_string(),
        None => caps[1].to_string(),
    });
    s.replace('@', "@\u{200B}")
}

/// Decode backslash escape sequences left in model output: the single-character escapes
/// (`\n`, `\t`, `\r`, `\a`, `\b`, `\f`, `\v`, quotes, backslash), octal `\NNN` and hex
/// `\xHH`, `\uHHHH`, `\UHHHHHHHH`. Unknown or malformed escapes are kept verbatim.
pub fn decode_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(&next) = chars.peek() else {
            out.push('\\');
            break;
        };
        let simple = match next {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0C}'),
            'v' => Some('\u{0B}'),
            '\\' => Some('\\'),
            '"' => Some('"'),
            '\'' => Some('\''),
            _ => None,
        };
        if let Some(decoded) = simple {
            chars.next();
            out.push(decoded);
            continue;
        }
        if next.is_digit(8) {
            let mut value = 0;
            let mut taken = 0;
            while taken < 3 {
                match chars.peek().and_then(|d| d.to_digit(8)) {
                    Some(d) => {
                        value = value * 8 + d;
                        chars.next();
                        taken += 1;
                    }
                    None => break,
                }
            }
            // At most 0o777, always a valid scalar value.
            out.extend(char::from_u32(value));
            continue;
        }
        let width = match next {
            'x' => 2,
            'u' => 4,
            'U' => 8,
            _ => {
                out.push('\\');
                continue;
            }
        };
        let digits: String = chars.clone().skip(1).take(width).collect();
        let decoded = (digits.len() == width)
            .then(|| u32::from_str_radix(&digits, 16).ok())
            .flatten()
            .and_then(char::from_u32);
        match decoded {
            Some(ch) => {
                for _ in 0..=width {
                    chars.next();
                }
                out.push(ch);
            }
            None => out.push('\\'),
        }
    }

    out
}

const AGO_STEPS: [f64; 6] = [60.0, 60.0, 24.0, 7.0, 365.0 / 7.0 / 12.0, 12.0];
const AGO_UNITS: [&str; 7] = ["second", "minute", "hour", "day", "week", "month", "year"];

/// Human "N units ago" phrasing. Timestamps in the future read as "just now".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let mut value = (now - then).num_seconds().max(0) as f64;
    let mut unit = 0;
    while unit < AGO_STEPS.len() && value >= AGO_STEPS[unit] {
        value /= AGO_STEPS[unit];
        unit += 1;
    }

    let n = value as u64;
    match (unit, n) {
        (0, 0..=9) => "just now".to_string(),
        (_, 1) => format!("1 {} ago", AGO_UNITS[unit]),
        _ => format!("{n} {}s ago", AGO_UNITS[unit]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn highlights_become_bold() {
        let out = translate_highlights(&strings(&["the <hi>deploy</hi> step"]), 10);
        assert_eq!(out, "the *deploy* step");
    }

    #[test]
    fn glued_highlights_are_unwrapped() {
        let out = translate_highlights(&strings(&["re<hi>deploy</hi> now"]), 10);
        assert_eq!(out, "redeploy now");
    }

    #[test]
    fn back_to_back_glued_highlights_are_unwrapped() {
        let out = translate_highlights(&strings(&["a<hi>b</hi><hi>c</hi> and <hi>d</hi>"]), 10);
        assert_eq!(out, "abc and *d*");
    }

    #[test]
    fn excerpts_joined_and_whitespace_normalized() {
        let out = translate_highlights(&strings(&["first\nline ", "", "\tsecond"]), 0);
        assert_eq!(out, "first line... second");
    }

    #[test]
    fn long_excerpt_truncated_to_fold() {
        let long = "a".repeat(400);
        let out = translate_highlights(&[long], 100);
        assert_eq!(out.chars().count(), 200);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn truncation_skipped_when_highlight_past_fold() {
        let long = format!("{} <hi>key</hi>", "a".repeat(400));
        let out = translate_highlights(&[long], 0);
        assert!(out.ends_with("*key*"));
    }

    #[test]
    fn mentions_are_neutralized() {
        let out = remove_interactions("ping <@U123> and <!here>");
        assert_eq!(out, "ping @\u{200B}U123 and @\u{200B}here");
    }

    #[test]
    fn channel_links_keep_name() {
        assert_eq!(remove_interactions("see <#C42|general>"), "see #general");
        assert_eq!(remove_interactions("see <#C42>"), "see #C42");
    }

    #[test]
    fn links_reduced_to_label() {
        assert_eq!(
            remove_interactions("read <https://a.com|the docs> or <https://b.com>"),
            "read the docs or https://b.com"
        );
    }

    #[test]
    fn special_catchall_keeps_label() {
        assert_eq!(
            remove_interactions("<!subteam^S1|eng-team> hi"),
            "eng-team hi"
        );
    }

    #[test]
    fn unlabeled_special_commands_are_neutralized() {
        assert_eq!(
            remove_interactions("ping <!subteam^S0123ABC> now"),
            "ping subteam^S0123ABC now"
        );
        assert!(!remove_interactions("<!date^1392734382^{date}>").contains('<'));
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(remove_interactions("nothing to see"), "nothing to see");
    }

    #[test]
    fn decodes_common_escapes() {
        assert_eq!(decode_escapes(r"line\nnext\ttab \\ \'q\'"), "line\nnext\ttab \\ 'q'");
    }

    #[test]
    fn decodes_unicode_escapes() {
        assert_eq!(decode_escapes(r"café \x41 \U0001F600"), "café A 😀");
    }

    #[test]
    fn decodes_control_and_octal_escapes() {
        assert_eq!(decode_escapes(r"\a\b\f\v"), "\u{07}\u{08}\u{0C}\u{0B}");
        assert_eq!(decode_escapes(r"\101\0 \1014"), "A\0 A4");
        assert_eq!(decode_escapes(r"\8"), r"\8");
    }

    #[test]
    fn keeps_unknown_and_malformed_escapes() {
        assert_eq!(decode_escapes(r"\q \u12 end\"), r"\q \u12 end\");
    }

    #[test]
    fn keeps_non_ascii_text() {
        assert_eq!(decode_escapes("日本語"), "日本語");
    }

    #[test]
    fn time_ago_phrasing() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(time_ago(now - Duration::seconds(5), now), "just now");
        assert_eq!(time_ago(now - Duration::seconds(30), now), "30 seconds ago");
        assert_eq!(time_ago(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(time_ago(now - Duration::days(2), now), "2 days ago");
        assert_eq!(time_ago(now - Duration::days(14), now), "2 weeks ago");
        assert_eq!(time_ago(now - Duration::days(400), now), "1 year ago");
        assert_eq!(time_ago(now + Duration::hours(1), now), "just now");
    }
}
