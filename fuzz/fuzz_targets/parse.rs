#![no_main]

use gettext_merger::segment::{parse_blocks, parse_file};
use gettext_merger::{RenderOptions, SetOfBlocks};
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|text: String| {
    let options = RenderOptions::default();
    let rendered = parse_file(&text).blocks.render(&options);

    // Rendering normalizes the entries, so a second round must not
    // change anything.
    let reparsed = parse_blocks(&rendered)
        .into_iter()
        .collect::<SetOfBlocks>()
        .render(&options);
    assert_eq!(rendered, reparsed);
});
