//! Animation track export.
//!
//! Keyed frames of an object's active action are collected into a
//! [`KeyframeTable`], the host evaluates the object's world transform at each
//! of them, and the resulting poses are written as a `.animation` file.

mod interpolation;
mod keyframes;
mod track;
pub mod format;

pub use interpolation::*;
pub use keyframes::*;
pub use track::*;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::SceneHost;
use crate::util::Result;

/// Result of exporting one object's track.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackExport {
    pub path: PathBuf,
    pub records: usize,
}

/// Build the keyframe table of an object's active action.
///
/// `Ok(None)` when the object has no animation data, no action, or an action
/// without slots. A slot picked by default is stored back on the host.
pub fn collect_keyframes<H: SceneHost + ?Sized>(
    host: &mut H,
    object: &str,
) -> Result<Option<KeyframeTable>> {
    let Some(data) = host.animation_data(object)? else {
        return Ok(None);
    };
    let Some((slot, defaulted)) = data.resolve_slot()? else {
        return Ok(None);
    };
    if defaulted {
        debug!(object, slot, "assigning default action slot");
        host.set_action_slot(object, slot)?;
    }
    Ok(Some(KeyframeTable::from_channels(data.channels(slot))))
}

/// Exports animation tracks of scene objects into one directory.
#[derive(Clone, Debug)]
pub struct AnimationExporter {
    dir: PathBuf,
    options: TrackOptions,
}

impl AnimationExporter {
    pub fn new(dir: impl Into<PathBuf>, options: TrackOptions) -> Self {
        Self {
            dir: dir.into(),
            options,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of an object's track file.
    pub fn track_path(&self, object: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", object, format::ANIMATION_EXTENSION))
    }

    /// Sample an object without writing anything.
    pub fn sample<H: SceneHost + ?Sized>(
        &self,
        host: &mut H,
        object: &str,
    ) -> Result<Vec<SampledPose>> {
        let Some(table) = collect_keyframes(host, object)? else {
            return Ok(Vec::new());
        };
        let is_camera = host.object_kind(object)?.is_camera();
        TrackSampler::new(host, self.options).sample(object, is_camera, &table)
    }

    /// Sample and write an object's track.
    ///
    /// `Ok(None)` when nothing was keyed; no file is touched in that case.
    pub fn export<H: SceneHost + ?Sized>(
        &self,
        host: &mut H,
        object: &str,
    ) -> Result<Option<TrackExport>> {
        let poses = self.sample(host, object)?;
        let path = self.track_path(object);
        if !format::write_track(&path, &poses)? {
            debug!(object, "no keyframes, skipping track");
            return Ok(None);
        }
        info!("Wrote {} ({} records)", path.display(), poses.len());
        Ok(Some(TrackExport {
            path,
            records: poses.len(),
        }))
    }
}
