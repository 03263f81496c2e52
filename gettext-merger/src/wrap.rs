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

//! Line wrapping for rendered PO fields.

use textwrap::core::{display_width, Fragment};
use textwrap::wrap_algorithms::wrap_first_fit;
use textwrap::WordSeparator;

/// The line width used when nothing else is configured.
pub const DEFAULT_LINE_WIDTH: usize = 80;

/// A word together with the whitespace following it.
///
/// Unlike [`textwrap::core::Word`], the whitespace is counted as part
/// of the width: PO fragments keep the separating space at the end of
/// the line so that concatenating them gives back the original text.
#[derive(Debug)]
struct Piece<'a> {
    word: &'a str,
    whitespace: &'a str,
    width: f64,
}

impl Fragment for Piece<'_> {
    fn width(&self) -> f64 {
        self.width
    }

    fn whitespace_width(&self) -> f64 {
        0.0
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// Break `text` on spaces into lines of at most `width` columns.
///
/// Concatenating the returned lines gives back `text`. A word wider
/// than `width` ends up alone on an over-long line.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let pieces = WordSeparator::AsciiSpace
        .find_words(text)
        .map(|word| Piece {
            word: word.word,
            whitespace: word.whitespace,
            width: (display_width(word.word) + display_width(word.whitespace)) as f64,
        })
        .collect::<Vec<_>>();

    wrap_first_fit(&pieces, &[width as f64])
        .into_iter()
        .map(|line| {
            line.iter()
                .flat_map(|piece| [piece.word, piece.whitespace])
                .collect()
        })
        .collect()
}

/// Render a keyword line such as `msgid "Hello"`.
///
/// Values which contain a newline have been split into several quoted
/// segments by whoever wrote the file. They are written back segment
/// by segment and never re-wrapped.
///
/// Other values which make the line wider than `line_width` are
/// wrapped gettext-style: the keyword gets an empty string and the
/// value follows on continuation lines.
///
/// ```
/// use gettext_merger::wrap::render_field;
///
/// assert_eq!(render_field("msgid", "Hello", 80), r#"msgid "Hello""#);
/// assert_eq!(
///     render_field("msgstr", "one two three", 12),
///     "msgstr \"\"\n\"one two \"\n\"three\"",
/// );
/// ```
pub fn render_field(keyword: &str, value: &str, line_width: usize) -> String {
    if value.contains('\n') {
        let mut segments = value.split('\n');
        let mut rendered = format!("{keyword} \"{}\"", segments.next().unwrap_or_default());
        for segment in segments {
            rendered.push_str(&format!("\n\"{segment}\""));
        }
        return rendered;
    }

    let single_line = format!("{keyword} \"{value}\"");
    if display_width(&single_line) <= line_width {
        return single_line;
    }

    // Leave room for the two quotes around each fragment.
    let fragments = wrap_words(value, line_width.saturating_sub(2));
    if fragments.len() < 2 {
        return single_line;
    }

    let mut rendered = format!("{keyword} \"\"");
    for fragment in fragments {
        rendered.push_str(&format!("\n\"{fragment}\""));
    }
    rendered
}

/// Render a comment line, splitting it on whitespace if it is wider
/// than `line_width`.
///
/// A comment without any whitespace is returned as a single line even
/// if it is too wide.
pub fn render_wrapped_comment(prefix: &str, value: &str, line_width: usize) -> Vec<String> {
    let single_line = format!("{prefix} {value}");
    if display_width(&single_line) <= line_width {
        return vec![single_line];
    }

    wrap_words(value, line_width.saturating_sub(display_width(prefix) + 1))
        .iter()
        .map(|line| line.trim_end())
        .filter(|line| !line.is_empty())
        .map(|line| format!("{prefix} {line}"))
        .collect()
}
