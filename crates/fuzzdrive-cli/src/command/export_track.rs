use std::path::PathBuf;

use fuzzdrive_engine::{TrackLayout, TrackMap};

use crate::util;

/// Grid cell of the built-in circuit's start pose, on the top road band.
const RING_START_CELL: (usize, usize) = (14, 17);

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ExportTrackArg {
    /// Output file path; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ExportTrackArg) -> anyhow::Result<()> {
    let map = TrackMap::ring_circuit();
    let layout = TrackLayout::from_map(&map, RING_START_CELL, 0.0);
    util::save_json(&layout, arg.output.as_ref())?;

    if let Some(path) = &arg.output {
        eprintln!("Track layout saved to {}", path.display());
    }
    Ok(())
}
