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

//! The metadata entry at the top of a PO or POT file.

use std::fmt::{self, Display, Formatter};

use crate::block::{logical_value, Block};

/// The header entry of a file: an entry with an empty `msgid` whose
/// translation holds `Key: Value` metadata lines.
///
/// A header is written back exactly as it was read, so it is never
/// wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    block: Block,
}

impl Header {
    /// Parse the lines of the header entry.
    pub fn parse_from_lines<'a, I>(lines: I) -> Header
    where
        I: IntoIterator<Item = &'a str>,
    {
        Header {
            block: Block::parse_from_lines(lines),
        }
    }

    /// The underlying entry.
    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn into_block(self) -> Block {
        self.block
    }

    /// Render the header as PO text, without a trailing newline.
    pub fn render(&self) -> String {
        self.block.render(usize::MAX)
    }

    /// The metadata fields in the order they appear.
    ///
    /// ```
    /// use gettext_merger::header::Header;
    ///
    /// let header = Header::parse_from_lines([
    ///     "msgid \"\"",
    ///     "msgstr \"\"",
    ///     "\"Project-Id-Version: Unicorn Plugin 1.0\\n\"",
    ///     "\"Language: de\\n\"",
    /// ]);
    /// assert_eq!(
    ///     header.metadata(),
    ///     vec![
    ///         (String::from("Project-Id-Version"), String::from("Unicorn Plugin 1.0")),
    ///         (String::from("Language"), String::from("de")),
    ///     ]
    /// );
    /// ```
    pub fn metadata(&self) -> Vec<(String, String)> {
        let Some(msgstr) = self.block.msgstr.first() else {
            return Vec::new();
        };
        // Fields are separated by escaped newlines, not real ones.
        logical_value(msgstr)
            .split("\\n")
            .filter_map(|field| {
                let (key, value) = field.split_once(':')?;
                Some((String::from(key.trim()), String::from(value.trim())))
            })
            .collect()
    }

    /// The value of the `Project-Id-Version` field, if there is one.
    pub fn project_id_version(&self) -> Option<String> {
        self.metadata()
            .into_iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("Project-Id-Version"))
            .map(|(_, value)| value)
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = r#"# Copyright (C) 2024 FantasyTech
# This file is distributed under the same license as the Unicorn Plugin.
msgid ""
msgstr ""
"Project-Id-Version: Unicorn Plugin 1.0.0\n"
"Report-Msgid-Bugs-To: https://wordpress.org/support/plugin/unicorn-plugin\n"
"POT-Creation-Date: 2021-02-15 18:30+0000\n"
"Language-Team: LANGUAGE <LL@li.org>\n"
"Content-Type: text/plain; charset=UTF-8\n""#;

    fn header() -> Header {
        Header::parse_from_lines(HEADER.lines())
    }

    #[test]
    fn test_render_verbatim() {
        assert_eq!(header().render(), HEADER);
        assert_eq!(header().to_string(), HEADER);
    }

    #[test]
    fn test_render_long_comment() {
        let text = format!("# {}\nmsgid \"\"\nmsgstr \"\"", "Copyright ".repeat(12).trim_end());
        assert_eq!(Header::parse_from_lines(text.lines()).render(), text);
    }

    #[test]
    fn test_metadata() {
        assert_eq!(
            header().metadata(),
            vec![
                (
                    String::from("Project-Id-Version"),
                    String::from("Unicorn Plugin 1.0.0")
                ),
                (
                    String::from("Report-Msgid-Bugs-To"),
                    String::from("https://wordpress.org/support/plugin/unicorn-plugin")
                ),
                (
                    String::from("POT-Creation-Date"),
                    String::from("2021-02-15 18:30+0000")
                ),
                (
                    String::from("Language-Team"),
                    String::from("LANGUAGE <LL@li.org>")
                ),
                (
                    String::from("Content-Type"),
                    String::from("text/plain; charset=UTF-8")
                ),
            ]
        );
    }

    #[test]
    fn test_project_id_version() {
        assert_eq!(
            header().project_id_version().as_deref(),
            Some("Unicorn Plugin 1.0.0")
        );
    }

    #[test]
    fn test_project_id_version_case_insensitive() {
        let header = Header::parse_from_lines([
            "msgid \"\"",
            "msgstr \"project-id-version: demo\\n\"",
        ]);
        assert_eq!(header.project_id_version().as_deref(), Some("demo"));
    }

    #[test]
    fn test_metadata_without_msgstr() {
        let header = Header::parse_from_lines(["msgid \"\""]);
        assert!(header.metadata().is_empty());
        assert_eq!(header.project_id_version(), None);
    }
}
