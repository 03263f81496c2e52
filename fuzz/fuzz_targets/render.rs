#![no_main]

use gettext_merger::block::logical_value;
use gettext_merger::segment::parse_blocks;
use gettext_merger::{Block, RenderOptions, SetOfBlocks};
use gettext_merger_fuzz::Entry;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|input: (Vec<Entry>, u8)| {
    let (entries, width) = input;
    let options = RenderOptions::default().with_line_width(20 + usize::from(width));
    let set = entries.into_iter().map(Block::from).collect::<SetOfBlocks>();
    let rendered = set.render(&options);

    // Wrapping must not change the values.
    for block in parse_blocks(&rendered) {
        let original = set
            .get_duplicate(block.hash())
            .expect("Rendered entry should be in the set");
        if original.msgstr.is_empty() {
            continue;
        }
        let msgstr = block.msgstr.iter().map(|msgstr| logical_value(msgstr)).collect::<Vec<_>>();
        assert_eq!(msgstr, original.msgstr);
    }
});
