use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use geo_types::Point;

pub struct GpxTrack {
    pub name: String,
    pub points: Vec<Point>,
}

/// Every track in the file, segments joined in order.
pub fn read_tracks(path: &Path) -> Result<Vec<GpxTrack>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let gpx = gpx::read(reader).with_context(|| format!("Failed to parse gpx {}", path.display()))?;

    let mut tracks = Vec::new();
    for (i, track) in gpx.tracks.into_iter().enumerate() {
        let name = track.name.unwrap_or_else(|| format!("Track {}", i + 1));
        let points = track
            .segments
            .into_iter()
            .flat_map(|segment| segment.points)
            .map(|waypoint| waypoint.point())
            .collect();

        tracks.push(GpxTrack { name, points });
    }

    tracing::debug!("Read {} tracks from {}", tracks.len(), path.display());
    Ok(tracks)
}
