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

//! Merge several gettext POT files into a single template.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use gettext_merger::wrap::DEFAULT_LINE_WIDTH;
use gettext_merger::{
    merge_files, write_po, HeaderPolicy, MergeOptions, RenderOptions, SortOrder,
};
use log::{debug, info};

#[derive(Clone, Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Input .pot files to merge (at least two).
    #[arg(short, long = "in", value_name = "FILE", num_args = 1.., required = true)]
    inputs: Vec<PathBuf>,
    /// Output path for the merged .pot file.
    #[arg(short, long, value_name = "FILE")]
    out: PathBuf,
    /// Wrap lines longer than this many columns.
    #[arg(short, long, default_value_t = DEFAULT_LINE_WIDTH)]
    width: usize,
    /// Which input headers to keep.
    #[arg(long, value_enum, default_value_t)]
    headers: HeaderPolicy,
    /// Order of the merged entries.
    #[arg(long, value_enum, default_value_t)]
    sort: SortOrder,
    /// Also write the merged entries as JSON to this file.
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,
}

impl Args {
    fn merge_options(&self) -> MergeOptions {
        MergeOptions::default()
            .with_headers(self.headers)
            .with_render(
                RenderOptions::default()
                    .with_line_width(self.width)
                    .with_sort(self.sort),
            )
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let inputs = args
        .inputs
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>();
    info!("Merging {} into {}", inputs.join(", "), args.out.display());

    let merged = merge_files(&args.inputs).context("Could not merge the input files")?;
    if let Some(version) = merged.headers.first().and_then(|h| h.project_id_version()) {
        debug!("Using header of {version}");
    }
    write_po(&args.out, &merged, &args.merge_options())?;

    if let Some(json) = &args.json {
        fs::write(json, merged.to_json()?)
            .with_context(|| format!("Could not write {}", json.display()))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let start = Instant::now();
    let args = Args::parse();
    run(&args)?;
    info!("Done in {:.3}s", start.elapsed().as_secs_f64());
    Ok(())
}
