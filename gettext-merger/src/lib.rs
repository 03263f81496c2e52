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

//! Merge and deduplicate gettext translation templates.
//!
//! Several `.pot` files, typically extracted from different parts of
//! one project, are combined into a single template. Entries with the
//! same context and source string are merged: their comments and
//! references are combined and the translation of the first file which
//! has one is kept.
//!
//! ```
//! use gettext_merger::{merge_contents, MergeOptions};
//!
//! let merged = merge_contents(&[
//!     "msgid \"Hello\"\nmsgstr \"Hola\"\n",
//!     "msgid \"Hello\"\nmsgstr \"Bonjour\"\n\nmsgid \"Goodbye\"\nmsgstr \"\"\n",
//! ]);
//! assert_eq!(merged.blocks.len(), 2);
//! assert!(merged.to_text(&MergeOptions::default()).contains("msgstr \"Hola\""));
//! ```

pub mod block;
pub mod error;
pub mod header;
pub mod line;
pub mod merge;
pub mod segment;
pub mod set;
pub mod wrap;

pub use block::Block;
pub use error::{Error, Result};
pub use header::Header;
pub use merge::{
    merge_contents, merge_files, merge_sets, write_po, HeaderPolicy, MergeOptions, MergedPot,
};
pub use segment::{parse_file, ParsedFile};
pub use set::{RenderOptions, SetOfBlocks, SortOrder};
