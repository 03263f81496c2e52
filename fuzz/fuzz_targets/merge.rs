#![no_main]

use gettext_merger::merge_contents;
use gettext_merger_fuzz::{create_pot, Entry};
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|files: Vec<Vec<Entry>>| {
    let contents = files.into_iter().map(create_pot).collect::<Vec<_>>();
    let merged = merge_contents(&contents);

    let mut reversed = contents.clone();
    reversed.reverse();
    let merged_reversed = merge_contents(&reversed);

    // The order of the inputs decides which values win, not which
    // entries exist.
    let mut hashes = merged.blocks.iter().map(|block| block.hash()).collect::<Vec<_>>();
    let mut hashes_reversed = merged_reversed
        .blocks
        .iter()
        .map(|block| block.hash())
        .collect::<Vec<_>>();
    hashes.sort();
    hashes_reversed.sort();
    assert_eq!(hashes, hashes_reversed);
});
