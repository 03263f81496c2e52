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

//! An ordered collection of blocks which merges duplicates on insertion.

use std::collections::{BTreeMap, HashMap};

use log::trace;

use crate::block::{logical_value, Block, BlockJson};
use crate::wrap::DEFAULT_LINE_WIDTH;

/// The order in which [`SetOfBlocks::render`] writes the blocks.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    /// Ascending identity hash. Stable across runs and input orders.
    #[default]
    Hash,
    /// By context, then by `msgid`.
    Msgid,
    /// The order in which the blocks were first seen.
    Insertion,
}

/// Options for rendering blocks as text.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub line_width: usize,
    pub sort: SortOrder,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            sort: SortOrder::default(),
        }
    }
}

impl RenderOptions {
    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}

/// Blocks which are unique by their identity hash.
///
/// Adding a block whose identity is already present merges it into
/// the existing block, which keeps its position.
#[derive(Debug, Clone, Default)]
pub struct SetOfBlocks {
    blocks: Vec<Block>,
    index: HashMap<u32, usize>,
}

impl SetOfBlocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `block`, merging it into the block with the same identity
    /// if there is one.
    pub fn add(&mut self, block: Block) {
        let hash = block.hash();
        match self.index.get(&hash) {
            Some(&position) => {
                trace!("Merging duplicate of {:?} ({hash})", block.msgid);
                self.blocks[position].merge(block);
            }
            None => {
                self.index.insert(hash, self.blocks.len());
                self.blocks.push(block);
            }
        }
    }

    pub fn add_all(&mut self, blocks: impl IntoIterator<Item = Block>) {
        for block in blocks {
            self.add(block);
        }
    }

    /// The block with the given identity hash.
    pub fn get_duplicate(&self, hash: u32) -> Option<&Block> {
        self.index.get(&hash).map(|&position| &self.blocks[position])
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over the blocks in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// The blocks worth writing, in the requested order.
    fn sorted(&self, sort: SortOrder) -> Vec<&Block> {
        let mut blocks = self
            .blocks
            .iter()
            .filter(|block| block.is_significant())
            .collect::<Vec<_>>();
        match sort {
            SortOrder::Hash => blocks.sort_by_key(|block| block.hash()),
            SortOrder::Msgid => blocks.sort_by_cached_key(|block| {
                let msgctxt = block.msgctxt.as_deref().map(logical_value);
                (msgctxt.unwrap_or_default(), logical_value(&block.msgid))
            }),
            SortOrder::Insertion => {}
        }
        blocks
    }

    /// Render the blocks as PO text.
    ///
    /// Blocks with an empty `msgid` are skipped. Every block is
    /// followed by a blank line.
    pub fn render(&self, options: &RenderOptions) -> String {
        self.sorted(options.sort)
            .into_iter()
            .map(|block| format!("{}\n\n", block.render(options.line_width)))
            .collect()
    }

    /// Group the JSON view of the blocks by context and then by
    /// `msgid`. Blocks without a context are found under `""`.
    pub fn to_lookup(&self) -> BTreeMap<String, BTreeMap<String, BlockJson>> {
        let mut lookup = BTreeMap::<String, BTreeMap<String, BlockJson>>::new();
        for block in self.blocks.iter().filter(|block| block.is_significant()) {
            let msgctxt = block.msgctxt.as_deref().map(logical_value).unwrap_or_default();
            lookup
                .entry(msgctxt)
                .or_default()
                .insert(logical_value(&block.msgid), block.to_json());
        }
        lookup
    }
}

impl Extend<Block> for SetOfBlocks {
    fn extend<T: IntoIterator<Item = Block>>(&mut self, iter: T) {
        self.add_all(iter);
    }
}

impl FromIterator<Block> for SetOfBlocks {
    fn from_iter<T: IntoIterator<Item = Block>>(iter: T) -> Self {
        let mut set = SetOfBlocks::new();
        set.add_all(iter);
        set
    }
}

impl IntoIterator for SetOfBlocks {
    type Item = Block;
    type IntoIter = std::vec::IntoIter<Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.into_iter()
    }
}

impl<'a> IntoIterator for &'a SetOfBlocks {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn msgids(set: &SetOfBlocks) -> Vec<&str> {
        set.iter().map(|block| block.msgid.as_str()).collect()
    }

    #[track_caller]
    fn assert_render_order(set: &SetOfBlocks, sort: SortOrder, expected: &[&str]) {
        let rendered = set.render(&RenderOptions::default().with_sort(sort));
        let order = rendered
            .lines()
            .filter_map(|line| line.strip_prefix("msgid \""))
            .map(|line| line.trim_end_matches('"'))
            .collect::<Vec<_>>();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_add_unique() {
        let set = SetOfBlocks::from_iter([
            Block::builder("a").done(),
            Block::builder("b").done(),
            Block::builder("a").with_msgctxt("other").done(),
        ]);
        assert_eq!(set.len(), 3);
        assert_eq!(msgids(&set), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_add_merges_duplicates() {
        let mut set = SetOfBlocks::new();
        set.add(Block::builder("Hello").with_msgstr("Hola").done());
        set.add(Block::builder("Goodbye").done());
        set.add(Block::builder("Hello").with_msgstr("Bonjour").done());

        assert_eq!(set.len(), 2);
        assert_eq!(msgids(&set), vec!["Hello", "Goodbye"]);
        assert_eq!(set.blocks()[0].msgstr, vec!["Hola"]);
    }

    #[test]
    fn test_add_merges_references() {
        let mut set = SetOfBlocks::new();
        set.add(
            Block::builder("Hello")
                .with_reference("file.php:82")
                .with_reference("file.php:83")
                .done(),
        );
        set.add(Block::builder("Hello").with_reference("file.php:83").done());

        let hello = set.get_duplicate(4068970281).unwrap();
        assert_eq!(hello.comments.reference, vec!["file.php:82", "file.php:83"]);
    }

    #[test]
    fn test_add_order_keeps_membership() {
        let blocks = [
            Block::builder("Hello").with_msgstr("Hola").done(),
            Block::builder("Open").with_msgctxt("menu").done(),
            Block::builder("Goodbye").done(),
            Block::builder("Hello").with_msgstr("Bonjour").done(),
            Block::builder("Open").done(),
        ];
        let hashes = |set: &SetOfBlocks| {
            let mut hashes = set.iter().map(Block::hash).collect::<Vec<_>>();
            hashes.sort();
            hashes
        };

        let forward = SetOfBlocks::from_iter(blocks.clone());
        let backward = SetOfBlocks::from_iter(blocks.into_iter().rev());
        assert_eq!(hashes(&forward), hashes(&backward));
        assert_eq!(forward.len(), 4);
        // Membership is the same, but the first block added wins.
        assert_eq!(forward.blocks()[0].msgstr, vec!["Hola"]);
        assert_eq!(backward.get_duplicate(4068970281).unwrap().msgstr, vec!["Bonjour"]);
    }

    #[test]
    fn test_get_duplicate() {
        let set = SetOfBlocks::from_iter([Block::builder("Hello").with_msgctxt("Context").done()]);
        assert!(set.get_duplicate(3577899576).is_some());
        assert!(set.get_duplicate(4068970281).is_none());
    }

    #[test]
    fn test_extend() {
        let mut set = SetOfBlocks::from_iter([Block::builder("a").done()]);
        set.extend([Block::builder("b").done(), Block::builder("a").done()]);
        assert_eq!(msgids(&set), vec!["a", "b"]);
    }

    #[test]
    fn test_render_sorted_by_hash() {
        let set = SetOfBlocks::from_iter(["a", "b", "c"].map(|msgid| Block::builder(msgid).done()));
        assert_eq!(
            set.render(&RenderOptions::default()),
            "msgid \"c\"\nmsgstr \"\"\n\n\
             msgid \"b\"\nmsgstr \"\"\n\n\
             msgid \"a\"\nmsgstr \"\"\n\n"
        );
    }

    #[test]
    fn test_render_sort_orders() {
        let set = SetOfBlocks::from_iter(
            ["Hello", "Goodbye", "Thank you"].map(|msgid| Block::builder(msgid).done()),
        );
        assert_render_order(&set, SortOrder::Hash, &["Goodbye", "Thank you", "Hello"]);
        assert_render_order(&set, SortOrder::Msgid, &["Goodbye", "Hello", "Thank you"]);
        assert_render_order(&set, SortOrder::Insertion, &["Hello", "Goodbye", "Thank you"]);
    }

    #[test]
    fn test_render_sort_by_msgid_ignores_wrapping() {
        let wrapped = Block::parse_from_lines(["msgid \"\"", "\"b\""]);
        let set = SetOfBlocks::from_iter([wrapped, Block::builder("a").done()]);
        assert_render_order(&set, SortOrder::Msgid, &["a", ""]);
    }

    #[test]
    fn test_render_sort_by_context() {
        let set = SetOfBlocks::from_iter([
            Block::builder("Open").with_msgctxt("menu").done(),
            Block::builder("Open").done(),
            Block::builder("Close").done(),
        ]);
        let rendered = set.render(&RenderOptions::default().with_sort(SortOrder::Msgid));
        assert_eq!(
            rendered,
            "msgid \"Close\"\nmsgstr \"\"\n\n\
             msgid \"Open\"\nmsgstr \"\"\n\n\
             msgctxt \"menu\"\nmsgid \"Open\"\nmsgstr \"\"\n\n"
        );
    }

    #[test]
    fn test_render_skips_empty_msgid() {
        let set = SetOfBlocks::from_iter([
            Block::builder("").with_msgstr("Project-Id-Version: X\\n").done(),
            Block::builder("Hello").done(),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.render(&RenderOptions::default()),
            "msgid \"Hello\"\nmsgstr \"\"\n\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(SetOfBlocks::new().render(&RenderOptions::default()), "");
    }

    #[test]
    fn test_render_line_width() {
        let msgid = "These words should be spread over a couple of lines when narrow";
        let set = SetOfBlocks::from_iter([Block::builder(msgid).done()]);
        let rendered = set.render(&RenderOptions::default().with_line_width(30));
        assert!(rendered.starts_with("msgid \"\"\n"));
        assert!(rendered.lines().all(|line| line.chars().count() <= 30));
    }

    #[test]
    fn test_to_lookup() {
        let set = SetOfBlocks::from_iter([
            Block::builder("Open").with_msgctxt("menu").with_msgstr("Abrir").done(),
            Block::builder("Open").with_msgstr("Abrir").done(),
            Block::builder("").with_msgstr("header").done(),
        ]);
        let lookup = set.to_lookup();

        assert_eq!(lookup.keys().collect::<Vec<_>>(), vec!["", "menu"]);
        assert_eq!(lookup[""].keys().collect::<Vec<_>>(), vec!["Open"]);
        assert_eq!(lookup["menu"]["Open"].msgctxt, "menu");
        assert_eq!(lookup["menu"]["Open"].msgstr, vec!["Abrir"]);
    }
}
