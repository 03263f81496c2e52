use arbitrary::Arbitrary;
use gettext_merger::{Block, RenderOptions, SetOfBlocks};

/// Remove the characters which cannot appear unescaped in a quoted PO
/// string.
fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|ch| !matches!(ch, '"' | '\\' | '\n' | '\r'))
        .collect()
}

/// Wrapper struct for generating arbitrary entries.
#[derive(Arbitrary, Debug)]
pub struct Entry {
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgstr: Vec<String>,
    pub references: Vec<String>,
    pub fuzzy: bool,
}

impl From<Entry> for Block {
    fn from(entry: Entry) -> Block {
        let mut builder = Block::builder(sanitize(&entry.msgid));
        if let Some(msgctxt) = entry.msgctxt {
            builder = builder.with_msgctxt(sanitize(&msgctxt));
        }
        if entry.msgstr.len() > 1 {
            builder = builder.with_msgid_plural(sanitize(&entry.msgid));
        }
        for msgstr in entry.msgstr {
            builder = builder.with_msgstr(sanitize(&msgstr));
        }
        for reference in entry.references {
            builder = builder.with_reference(sanitize(&reference).trim());
        }
        if entry.fuzzy {
            builder = builder.with_flag("fuzzy");
        }
        builder.done()
    }
}

/// Generate the contents of a POT file for fuzzing.
pub fn create_pot(entries: Vec<Entry>) -> String {
    entries
        .into_iter()
        .map(Block::from)
        .collect::<SetOfBlocks>()
        .render(&RenderOptions::default())
}
