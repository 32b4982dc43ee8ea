// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Generate floor tape bands along zone outlines.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "floortape")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Layout JSON file with the zones to tape
    pub layout: PathBuf,

    /// Scene snapshot destination (stdout when absent)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Batch report destination
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Engine configuration file; overrides the layout's embedded config
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
