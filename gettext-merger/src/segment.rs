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

//! Splitting file contents into entries.

use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::block::Block;
use crate::header::Header;
use crate::set::SetOfBlocks;

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)project-id-version").expect("well-formed regex"))
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Split the leading header entry off `text`.
///
/// Leading blank lines are skipped. The first paragraph is the header
/// if one of its lines mentions `Project-Id-Version`. In that case the
/// header is returned together with the text following it, otherwise
/// `None` and the whole text are returned.
///
/// ```
/// use gettext_merger::segment::extract_header;
///
/// let text = "msgid \"\"\nmsgstr \"Project-Id-Version: X\\n\"\n\nmsgid \"Hello\"\n";
/// let (header, rest) = extract_header(text);
/// assert_eq!(header.unwrap().project_id_version().as_deref(), Some("X"));
/// assert_eq!(rest, "\nmsgid \"Hello\"\n");
///
/// let (header, rest) = extract_header("msgid \"Hello\"\n");
/// assert!(header.is_none());
/// assert_eq!(rest, "msgid \"Hello\"\n");
/// ```
pub fn extract_header(text: &str) -> (Option<Header>, &str) {
    let mut paragraph = Vec::new();
    let mut end = 0;
    for line in text.split_inclusive('\n') {
        if is_blank(line) {
            if !paragraph.is_empty() {
                break;
            }
        } else {
            paragraph.push(line.trim_end());
        }
        end += line.len();
    }

    if !paragraph.iter().any(|line| header_regex().is_match(line)) {
        return (None, text);
    }
    (Some(Header::parse_from_lines(paragraph)), &text[end..])
}

/// Split `text` into groups of lines, one per entry.
///
/// Entries are separated by one or more blank lines. Both `\n` and
/// `\r\n` line endings are accepted.
pub fn split_entries(text: &str) -> Vec<Vec<&str>> {
    let mut entries = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if is_blank(line) {
            if !current.is_empty() {
                entries.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        entries.push(current);
    }
    entries
}

/// Parse every entry of `text`, in the order they appear.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    split_entries(text)
        .into_iter()
        .map(Block::parse_from_lines)
        .collect()
}

/// The contents of one file.
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    pub header: Option<Header>,
    pub blocks: SetOfBlocks,
}

/// Parse the contents of a PO or POT file.
///
/// Duplicate entries within the file are merged.
pub fn parse_file(text: &str) -> ParsedFile {
    let (header, body) = extract_header(text);
    let blocks = parse_blocks(body).into_iter().collect::<SetOfBlocks>();
    debug!(
        "Parsed {} entries ({})",
        blocks.len(),
        if header.is_some() { "with header" } else { "no header" }
    );
    ParsedFile { header, blocks }
}
