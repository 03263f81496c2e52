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

//! A single entry of a PO or POT file.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::line::{classify, CommentKind, LineKind};
use crate::wrap::{render_field, render_wrapped_comment, DEFAULT_LINE_WIDTH};

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// The comments attached to a [`Block`], one list per channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
    pub translator: Vec<String>,
    pub extracted: Vec<String>,
    pub reference: Vec<String>,
    /// The flag line, e.g. `fuzzy, c-format`.
    pub flag: Option<String>,
    pub previous: Vec<String>,
}

fn split_flags(flag: &str) -> impl Iterator<Item = &str> {
    flag.split(',').map(str::trim).filter(|flag| !flag.is_empty())
}

/// Append `other` to `current`, dropping repeated lines.
///
/// The first occurrence of each line determines its position.
fn merge_unique(current: &mut Vec<String>, other: Vec<String>) {
    let mut seen = HashSet::new();
    let merged = std::mem::take(current)
        .into_iter()
        .chain(other)
        .filter(|line| seen.insert(line.clone()))
        .collect();
    *current = merged;
}

impl Comments {
    /// Add a comment line to the channel given by `kind`.
    pub fn push(&mut self, kind: CommentKind, value: &str) {
        match kind {
            CommentKind::Translator => self.translator.push(String::from(value)),
            CommentKind::Extracted => self.extracted.push(String::from(value)),
            CommentKind::Reference => self.reference.push(String::from(value)),
            CommentKind::Previous => self.previous.push(String::from(value)),
            // The first flag line is kept as written.
            CommentKind::Flag if self.flag.is_none() && !value.trim().is_empty() => {
                self.flag = Some(String::from(value))
            }
            CommentKind::Flag => self.add_flags(value),
        }
    }

    /// Iterate over the individual flags.
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flag.as_deref().into_iter().flat_map(split_flags)
    }

    /// Add the comma-separated flags in `flags` which are not set yet.
    pub fn add_flags(&mut self, flags: &str) {
        let mut merged = self.flags().map(String::from).collect::<Vec<_>>();
        merge_unique(&mut merged, split_flags(flags).map(String::from).collect());
        self.flag = (!merged.is_empty()).then(|| merged.join(", "));
    }

    /// Check if the `fuzzy` flag is set.
    pub fn is_fuzzy(&self) -> bool {
        self.flags().any(|flag| flag == "fuzzy")
    }

    /// Union every channel with the corresponding channel of `other`.
    pub fn merge(&mut self, other: Comments) {
        merge_unique(&mut self.translator, other.translator);
        merge_unique(&mut self.extracted, other.extracted);
        merge_unique(&mut self.reference, other.reference);
        merge_unique(&mut self.previous, other.previous);
        if let Some(flag) = other.flag {
            self.add_flags(&flag);
        }
    }
}

/// One translation entry: the source string, its translations and
/// the comments around it.
///
/// String values are raw PO text: escape sequences such as `\n` or
/// `\"` are kept as written. A value which spanned several quoted
/// segments in the input keeps those segments, separated by a real
/// newline character. Use [`logical_value`] to join them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgctxt: Option<String>,
    pub msgstr: Vec<String>,
    pub comments: Comments,
}

/// Join the quoted segments of a field value into one string.
///
/// ```
/// use gettext_merger::block::logical_value;
///
/// assert_eq!(logical_value("\nHello, \nworld!"), "Hello, world!");
/// ```
pub fn logical_value(value: &str) -> String {
    value.split('\n').collect()
}

/// Compute the 32-bit FNV-1a hash of `text`, one code point at a time.
fn fnv1a(text: &str) -> u32 {
    text.chars().fold(FNV_OFFSET_BASIS, |hash, ch| {
        (hash ^ u32::from(ch)).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Debug, Copy, Clone)]
enum Field {
    Comment(CommentKind),
    Msgid,
    MsgidPlural,
    Msgctxt,
    Msgstr(usize),
}

fn append_segment(text: &mut String, segment: &str) {
    text.push('\n');
    text.push_str(segment);
}

/// Fields collected while parsing, before defaults are applied.
///
/// Translations are keyed by their `msgstr[n]` index so that entries
/// listing the plural forms out of order keep their positions.
#[derive(Debug, Default)]
struct RawBlock {
    msgid: Option<String>,
    msgid_plural: Option<String>,
    msgctxt: Option<String>,
    msgstr: BTreeMap<usize, String>,
    comments: Comments,
}

/// Lay out indexed translations as a vector, filling gaps with empty
/// strings.
///
/// An index larger than the number of translations in the entry is
/// malformed and its translation is dropped, which keeps the padding
/// bounded.
fn positional(indexed: BTreeMap<usize, String>) -> Vec<String> {
    let limit = indexed.len();
    let mut msgstr = Vec::new();
    for (index, value) in indexed {
        if index > limit {
            break;
        }
        msgstr.resize(index, String::new());
        msgstr.push(value);
    }
    msgstr
}

impl RawBlock {
    fn push(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::Comment(kind) => {
                self.comments.push(kind, value);
                return;
            }
            Field::Msgid => &mut self.msgid,
            Field::MsgidPlural => &mut self.msgid_plural,
            Field::Msgctxt => &mut self.msgctxt,
            Field::Msgstr(index) => {
                match self.msgstr.entry(index) {
                    Entry::Vacant(entry) => {
                        entry.insert(String::from(value));
                    }
                    Entry::Occupied(mut entry) => append_segment(entry.get_mut(), value),
                }
                return;
            }
        };
        match slot.as_mut() {
            Some(text) => append_segment(text, value),
            None => *slot = Some(String::from(value)),
        }
    }

    fn finish(self) -> Block {
        Block {
            msgid: self.msgid.unwrap_or_default(),
            msgid_plural: self.msgid_plural,
            msgctxt: self.msgctxt,
            msgstr: positional(self.msgstr),
            comments: self.comments,
        }
    }
}

impl Block {
    /// Parse the lines of a single entry.
    ///
    /// The lines must not contain the blank lines which separate
    /// entries. Lines which cannot be classified are skipped. An entry
    /// without a `msgid` line still gives a `Block`, with an empty
    /// `msgid`.
    ///
    /// ```
    /// use gettext_merger::block::Block;
    ///
    /// let block = Block::parse_from_lines([
    ///     "#: src/app.php:12",
    ///     "msgctxt \"menu\"",
    ///     "msgid \"Open\"",
    ///     "msgstr \"Abrir\"",
    /// ]);
    /// assert_eq!(block.msgctxt.as_deref(), Some("menu"));
    /// assert_eq!(block.msgid, "Open");
    /// assert_eq!(block.msgstr, vec!["Abrir"]);
    /// assert_eq!(block.comments.reference, vec!["src/app.php:12"]);
    /// ```
    pub fn parse_from_lines<'a, I>(lines: I) -> Block
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut raw = RawBlock::default();
        let mut current = None;

        for line in lines {
            let Some(line) = classify(line) else {
                continue;
            };
            let field = match line.kind {
                LineKind::Comment(kind) => Field::Comment(kind),
                LineKind::Msgid => Field::Msgid,
                LineKind::MsgidPlural => Field::MsgidPlural,
                LineKind::Msgctxt => Field::Msgctxt,
                LineKind::Msgstr(index) => Field::Msgstr(index),
                // A string without a keyword in front of it is taken
                // to be the `msgid`.
                LineKind::Continuation => current.unwrap_or(Field::Msgid),
            };
            raw.push(field, line.value);
            current = Some(field);
        }

        raw.finish()
    }

    /// Start building a block from individual fields.
    ///
    /// ```
    /// use gettext_merger::block::Block;
    ///
    /// let block = Block::builder("Hello")
    ///     .with_msgstr("Hola")
    ///     .with_reference("src/app.php:3")
    ///     .done();
    /// assert_eq!(block.to_string(), "#: src/app.php:3\nmsgid \"Hello\"\nmsgstr \"Hola\"");
    /// ```
    pub fn builder(msgid: impl Into<String>) -> BlockBuilder {
        BlockBuilder {
            block: Block {
                msgid: msgid.into(),
                ..Block::default()
            },
        }
    }

    /// The identity hash of the block.
    ///
    /// Only the context and the `msgid` contribute: two blocks with
    /// the same hash are treated as the same translatable string. The
    /// values are hashed with their segments joined, so wrapping a
    /// value does not change the identity.
    pub fn hash(&self) -> u32 {
        let msgctxt = self.msgctxt.as_deref().map(logical_value).unwrap_or_default();
        fnv1a(&format!("{msgctxt}|{}", logical_value(&self.msgid)))
    }

    /// Blocks without a `msgid` carry nothing worth writing out.
    pub fn is_significant(&self) -> bool {
        self.msgid.chars().any(|ch| ch != '\n')
    }

    /// Merge `other` into `self`.
    ///
    /// Nothing happens unless both blocks have the same `msgid`, once
    /// segments are joined. The
    /// `msgid_plural`, `msgctxt` and `msgstr` fields of `self` win;
    /// the values from `other` are only used when `self` has none.
    /// The comments are combined, without duplicates.
    pub fn merge(&mut self, other: Block) {
        if logical_value(&self.msgid) != logical_value(&other.msgid) {
            return;
        }

        self.msgid_plural = self.msgid_plural.take().or(other.msgid_plural);
        self.msgctxt = self.msgctxt.take().or(other.msgctxt);
        if self.msgstr.is_empty() {
            self.msgstr = other.msgstr;
        }
        self.comments.merge(other.comments);
    }

    /// Render the block as PO text, without a trailing newline.
    ///
    /// Field lines wider than `line_width` are wrapped.
    pub fn render(&self, line_width: usize) -> String {
        let mut lines = Vec::new();
        let comments = &self.comments;

        for comment in &comments.translator {
            lines.push(comment_line(CommentKind::Translator, comment));
        }
        for comment in &comments.extracted {
            lines.push(comment_line(CommentKind::Extracted, comment));
        }
        // Source references are the only comments which get wrapped,
        // like `xgettext` does it.
        for reference in &comments.reference {
            lines.extend(render_wrapped_comment(
                CommentKind::Reference.prefix(),
                reference,
                line_width,
            ));
        }
        if let Some(flag) = &comments.flag {
            lines.push(comment_line(CommentKind::Flag, flag));
        }
        for comment in &comments.previous {
            lines.push(comment_line(CommentKind::Previous, comment));
        }

        if let Some(msgctxt) = &self.msgctxt {
            lines.push(render_field("msgctxt", msgctxt, line_width));
        }
        lines.push(render_field("msgid", &self.msgid, line_width));
        if let Some(msgid_plural) = &self.msgid_plural {
            lines.push(render_field("msgid_plural", msgid_plural, line_width));
        }

        match self.msgstr.as_slice() {
            [] => lines.push(render_field("msgstr", "", line_width)),
            [msgstr] if self.msgid_plural.is_none() => {
                lines.push(render_field("msgstr", msgstr, line_width))
            }
            msgstrs => {
                for (idx, msgstr) in msgstrs.iter().enumerate() {
                    lines.push(render_field(&format!("msgstr[{idx}]"), msgstr, line_width));
                }
            }
        }

        lines.join("\n")
    }

    /// Structured view of the block, with segments joined.
    pub fn to_json(&self) -> BlockJson {
        let joined = |lines: &[String]| lines.join("\n");
        BlockJson {
            msgctxt: self.msgctxt.as_deref().map(logical_value).unwrap_or_default(),
            msgid: logical_value(&self.msgid),
            msgid_plural: self
                .msgid_plural
                .as_deref()
                .map(logical_value)
                .unwrap_or_default(),
            msgstr: self.msgstr.iter().map(|msgstr| logical_value(msgstr)).collect(),
            comments: CommentsJson {
                translator: joined(&self.comments.translator),
                extracted: joined(&self.comments.extracted),
                reference: joined(&self.comments.reference),
                flag: self.comments.flag.clone().unwrap_or_default(),
                previous: joined(&self.comments.previous),
            },
        }
    }
}

fn comment_line(kind: CommentKind, value: &str) -> String {
    if value.is_empty() {
        String::from(kind.prefix())
    } else {
        format!("{} {value}", kind.prefix())
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_LINE_WIDTH))
    }
}

/// Builder returned by [`Block::builder`].
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    block: Block,
}

impl BlockBuilder {
    pub fn with_msgctxt(mut self, msgctxt: impl Into<String>) -> Self {
        self.block.msgctxt = Some(msgctxt.into());
        self
    }

    pub fn with_msgid_plural(mut self, msgid_plural: impl Into<String>) -> Self {
        self.block.msgid_plural = Some(msgid_plural.into());
        self
    }

    /// Append a translation. Call repeatedly for plural forms.
    pub fn with_msgstr(mut self, msgstr: impl Into<String>) -> Self {
        self.block.msgstr.push(msgstr.into());
        self
    }

    pub fn with_translator_comment(mut self, comment: impl Into<String>) -> Self {
        self.block.comments.translator.push(comment.into());
        self
    }

    pub fn with_extracted_comment(mut self, comment: impl Into<String>) -> Self {
        self.block.comments.extracted.push(comment.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.block.comments.reference.push(reference.into());
        self
    }

    /// Add one or more comma-separated flags.
    pub fn with_flag(mut self, flag: &str) -> Self {
        self.block.comments.add_flags(flag);
        self
    }

    pub fn with_previous(mut self, previous: impl Into<String>) -> Self {
        self.block.comments.previous.push(previous.into());
        self
    }

    pub fn done(self) -> Block {
        self.block
    }
}

/// JSON representation of a [`Block`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockJson {
    pub msgctxt: String,
    pub msgid: String,
    pub msgid_plural: String,
    pub msgstr: Vec<String>,
    pub comments: CommentsJson,
}

/// JSON representation of [`Comments`], one newline-joined string per
/// channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommentsJson {
    pub translator: String,
    pub extracted: String,
    pub reference: String,
    pub flag: String,
    pub previous: String,
}
