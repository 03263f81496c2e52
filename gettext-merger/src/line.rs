// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Classification of single lines in a PO or POT file.

use regex::Regex;
use std::sync::OnceLock;

/// The comment channels of a PO entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CommentKind {
    /// `# ` free-form notes from translators.
    Translator,
    /// `#. ` notes extracted from the source code.
    Extracted,
    /// `#: ` source locations.
    Reference,
    /// `#, ` flags such as `fuzzy`.
    Flag,
    /// `#| ` the previous untranslated string.
    Previous,
}

impl CommentKind {
    /// The marker written in front of a comment of this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            CommentKind::Translator => "#",
            CommentKind::Extracted => "#.",
            CommentKind::Reference => "#:",
            CommentKind::Flag => "#,",
            CommentKind::Previous => "#|",
        }
    }
}

/// The field a line belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LineKind {
    Comment(CommentKind),
    Msgid,
    MsgidPlural,
    Msgctxt,
    /// A `msgstr` line, with the index from `msgstr[n]` (0 if absent).
    Msgstr(usize),
    /// A bare quoted string which continues the previously opened field.
    Continuation,
}

/// A classified line.
///
/// For keyword and continuation lines, `value` is the quoted text with
/// the surrounding quotes removed. For comments, `value` is the text
/// after the marker, verbatim.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    pub kind: LineKind,
    pub value: &'a str,
}

/// Remove one pair of surrounding double quotes from `text`.
///
/// A quote is only removed from a side where it is present, so
/// unbalanced input such as `"foo` becomes `foo`.
///
/// ```
/// use gettext_merger::line::strip_quotes;
///
/// assert_eq!(strip_quotes(r#""Hello""#), "Hello");
/// assert_eq!(strip_quotes(r#""""#), "");
/// assert_eq!(strip_quotes("bare"), "bare");
/// ```
pub fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

fn msgstr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = r"(?x)
              ^msgstr
              (?:\[(?<index>\d+)\])?    # optional plural index
              (?<rest>.*)$
        ";
        Regex::new(pattern).expect("well-formed regex")
    })
}

/// Strip `keyword` from the start of `line` and return the quoted
/// value that follows it.
fn keyword_value<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    line.strip_prefix(keyword)
        .map(|rest| strip_quotes(rest.trim_start()))
}

fn comment(kind: CommentKind, rest: &str) -> Line<'_> {
    Line {
        kind: LineKind::Comment(kind),
        value: rest.trim_start(),
    }
}

/// Classify a single line of a PO file.
///
/// Returns `None` for blank lines, which terminate an entry, and for
/// lines which are not recognized at all.
///
/// ```
/// use gettext_merger::line::{classify, CommentKind, Line, LineKind};
///
/// assert_eq!(
///     classify(r#"msgstr[1] "%d files""#),
///     Some(Line { kind: LineKind::Msgstr(1), value: "%d files" }),
/// );
/// assert_eq!(
///     classify("#: src/main.php:12"),
///     Some(Line {
///         kind: LineKind::Comment(CommentKind::Reference),
///         value: "src/main.php:12",
///     }),
/// );
/// assert_eq!(classify("   "), None);
/// ```
pub fn classify(line: &str) -> Option<Line<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(rest) = line.strip_prefix('#') {
        // The order matters: `#` alone is the fallback for everything
        // which is not one of the special markers.
        let line = match rest.chars().next() {
            Some('.') => comment(CommentKind::Extracted, &rest[1..]),
            Some(':') => comment(CommentKind::Reference, &rest[1..]),
            Some(',') => comment(CommentKind::Flag, &rest[1..]),
            Some('|') => comment(CommentKind::Previous, &rest[1..]),
            _ => comment(CommentKind::Translator, rest),
        };
        return Some(line);
    }

    // `msgid_plural` must be tried before `msgid` since the latter is a
    // prefix of the former.
    if let Some(value) = keyword_value(line, "msgid_plural") {
        return Some(Line {
            kind: LineKind::MsgidPlural,
            value,
        });
    }
    if !line.starts_with("msgid_") {
        if let Some(value) = keyword_value(line, "msgid") {
            return Some(Line {
                kind: LineKind::Msgid,
                value,
            });
        }
    }
    if let Some(captures) = msgstr_regex().captures(line) {
        let index = match captures.name("index") {
            Some(index) => index.as_str().parse().ok()?,
            None => 0,
        };
        let rest = captures.name("rest").map_or("", |rest| rest.as_str());
        return Some(Line {
            kind: LineKind::Msgstr(index),
            value: strip_quotes(rest.trim_start()),
        });
    }
    if let Some(value) = keyword_value(line, "msgctxt") {
        return Some(Line {
            kind: LineKind::Msgctxt,
            value,
        });
    }
    if line.starts_with('"') {
        return Some(Line {
            kind: LineKind::Continuation,
            value: strip_quotes(line),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[track_caller]
    fn assert_classified(line: &str, kind: LineKind, value: &str) {
        assert_eq!(classify(line), Some(Line { kind, value }));
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes(r#""foo bar""#), "foo bar");
        assert_eq!(strip_quotes(r#""foo"#), "foo");
        assert_eq!(strip_quotes(r#"foo""#), "foo");
        assert_eq!(strip_quotes(r#""'quoted'""#), "'quoted'");
        assert_eq!(strip_quotes("\"\"\"\""), "\"\"");
        assert_eq!(strip_quotes(""), "");
    }

    #[test]
    fn test_classify_blank() {
        assert_eq!(classify(""), None);
        assert_eq!(classify(" \t"), None);
    }

    #[test]
    fn test_classify_unrecognized() {
        assert_eq!(classify("garbage here"), None);
        assert_eq!(classify("msgfoo \"bar\""), None);
    }

    #[test]
    fn test_classify_comments() {
        use CommentKind::*;
        assert_classified("#. Extracted note", LineKind::Comment(Extracted), "Extracted note");
        assert_classified("#: a.php:1 b.php:2", LineKind::Comment(Reference), "a.php:1 b.php:2");
        assert_classified("#, fuzzy, c-format", LineKind::Comment(Flag), "fuzzy, c-format");
        assert_classified(r#"#| msgid "Old""#, LineKind::Comment(Previous), r#"msgid "Old""#);
        assert_classified("# Translator note", LineKind::Comment(Translator), "Translator note");
        assert_classified("#Tight note", LineKind::Comment(Translator), "Tight note");
    }

    #[test]
    fn test_classify_bare_hash() {
        assert_classified("#", LineKind::Comment(CommentKind::Translator), "");
    }

    #[test]
    fn test_classify_comment_keeps_quotes() {
        assert_classified(
            r#"#. "Save" button"#,
            LineKind::Comment(CommentKind::Extracted),
            r#""Save" button"#,
        );
    }

    #[test]
    fn test_classify_msgid_plural_before_msgid() {
        assert_classified(r#"msgid_plural "%d apples""#, LineKind::MsgidPlural, "%d apples");
        assert_classified(r#"msgid "%d apple""#, LineKind::Msgid, "%d apple");
    }

    #[test]
    fn test_classify_unknown_msgid_suffix() {
        assert_eq!(classify(r#"msgid_other "x""#), None);
    }

    #[test]
    fn test_classify_msgstr() {
        assert_classified(r#"msgstr "Hola""#, LineKind::Msgstr(0), "Hola");
        assert_classified(r#"msgstr[0] "manzana""#, LineKind::Msgstr(0), "manzana");
        assert_classified(r#"msgstr[12] "x""#, LineKind::Msgstr(12), "x");
        assert_classified(r#"msgstr """#, LineKind::Msgstr(0), "");
    }

    #[test]
    fn test_classify_msgctxt() {
        assert_classified(r#"msgctxt "menu""#, LineKind::Msgctxt, "menu");
    }

    #[test]
    fn test_classify_continuation() {
        assert_classified(
            r#""Project-Id-Version: Foo\n""#,
            LineKind::Continuation,
            r"Project-Id-Version: Foo\n",
        );
    }

    #[test]
    fn test_classify_ignores_surrounding_whitespace() {
        assert_classified("  msgid \"Hello\"\r", LineKind::Msgid, "Hello");
    }
}
