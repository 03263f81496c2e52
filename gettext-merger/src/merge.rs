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

//! Merging several files into one template.

use std::fs;
use std::path::Path;

use log::debug;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::header::Header;
use crate::segment::{parse_file, ParsedFile};
use crate::set::{RenderOptions, SetOfBlocks};

/// Which file headers are written to the merged output.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum HeaderPolicy {
    /// Only the header of the first file which has one.
    #[default]
    First,
    /// The headers of all files, in input order.
    All,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub render: RenderOptions,
    pub headers: HeaderPolicy,
}

impl MergeOptions {
    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    pub fn with_headers(mut self, headers: HeaderPolicy) -> Self {
        self.headers = headers;
        self
    }
}

/// The result of merging several files.
#[derive(Debug, Clone, Default)]
pub struct MergedPot {
    /// The headers found in the inputs, in input order.
    pub headers: Vec<Header>,
    pub blocks: SetOfBlocks,
}

impl MergedPot {
    /// Fold parsed files into one, in the order given.
    ///
    /// Earlier files take precedence when the same entry has
    /// conflicting values.
    pub fn from_files(files: impl IntoIterator<Item = ParsedFile>) -> MergedPot {
        let mut merged = MergedPot::default();
        for file in files {
            merged.headers.extend(file.header);
            merged.blocks.extend(file.blocks);
        }
        debug!(
            "Merged into {} entries with {} header(s)",
            merged.blocks.len(),
            merged.headers.len()
        );
        merged
    }

    /// Render the merged template: the selected headers, two blank
    /// lines and the entries.
    pub fn to_text(&self, options: &MergeOptions) -> String {
        let headers = match options.headers {
            HeaderPolicy::First => &self.headers[..self.headers.len().min(1)],
            HeaderPolicy::All => &self.headers[..],
        };
        let body = self.blocks.render(&options.render);
        if headers.is_empty() {
            return body;
        }

        let headers = headers.iter().map(Header::render).collect::<Vec<_>>();
        format!("{}\n\n\n{body}", headers.join("\n\n"))
    }

    /// The entries as pretty-printed JSON, grouped by context and
    /// `msgid`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.blocks.to_lookup())?)
    }
}

/// Merge already parsed collections, in order.
pub fn merge_sets(sets: impl IntoIterator<Item = SetOfBlocks>) -> SetOfBlocks {
    sets.into_iter().flatten().collect()
}

/// Merge the contents of several files.
///
/// ```
/// use gettext_merger::merge::{merge_contents, MergeOptions};
///
/// let merged = merge_contents(&[
///     "#: a.php:1\nmsgid \"Hello\"\nmsgstr \"\"\n",
///     "#: b.php:2\nmsgid \"Hello\"\nmsgstr \"\"\n",
/// ]);
/// assert_eq!(
///     merged.to_text(&MergeOptions::default()),
///     "#: a.php:1\n#: b.php:2\nmsgid \"Hello\"\nmsgstr \"\"\n\n"
/// );
/// ```
pub fn merge_contents<S: AsRef<str>>(contents: &[S]) -> MergedPot {
    MergedPot::from_files(contents.iter().map(|text| parse_file(text.as_ref())))
}

/// Read, parse and merge the files at `paths`.
///
/// The files are read in parallel, but merged in the order given. At
/// least two files are needed. Nothing is merged if any file cannot be
/// read.
pub fn merge_files<P: AsRef<Path> + Sync>(paths: &[P]) -> Result<MergedPot> {
    if paths.len() < 2 {
        return Err(Error::NotEnoughInputs(paths.len()));
    }

    let files = paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            let text = fs::read_to_string(path).map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            })?;
            debug!("Parsing {}", path.display());
            Ok(parse_file(&text))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MergedPot::from_files(files))
}

/// Render `merged` and write it to `path`, replacing any existing file.
///
/// Returns the text which was written.
pub fn write_po(path: &Path, merged: &MergedPot, options: &MergeOptions) -> Result<String> {
    let text = merged.to_text(options);
    fs::write(path, &text).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text)
}
