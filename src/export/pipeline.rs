//! Collection-level export driver.

use std::fs;
use std::path::Path;

use tracing::{info, info_span};

use super::ExportConfig;
use crate::anim::AnimationExporter;
use crate::core::SceneHost;
use crate::mesh::MeshExporter;
use crate::util::{Error, Result};

/// Counters of one export run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// OBJ files written.
    pub meshes: usize,
    /// `.animation` files written.
    pub tracks: usize,
    /// Objects without keyed animation.
    pub skipped_tracks: usize,
    /// Pose records written across all tracks.
    pub records: usize,
}

impl ExportStats {
    pub fn files(&self) -> usize {
        self.meshes + self.tracks
    }
}

/// Exports every object of a collection: mesh first (cameras have none),
/// then its animation track.
#[derive(Clone, Debug)]
pub struct Exporter {
    collection: String,
    meshes: MeshExporter,
    tracks: AnimationExporter,
}

impl Exporter {
    /// Build an exporter whose output directories resolve against `base`.
    pub fn new(config: &ExportConfig, base: &Path) -> Self {
        Self {
            collection: config.collection.clone(),
            meshes: MeshExporter::new(config.mesh_dir(base)),
            tracks: AnimationExporter::new(config.animation_dir(base), config.track_options()),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn mesh_dir(&self) -> &Path {
        self.meshes.dir()
    }

    pub fn animation_dir(&self) -> &Path {
        self.tracks.dir()
    }

    /// Export the configured collection.
    pub fn export_collection<H: SceneHost + ?Sized>(&self, host: &mut H) -> Result<ExportStats> {
        let Some(objects) = host.collection_objects(&self.collection) else {
            return Err(Error::CollectionNotFound(self.collection.clone()));
        };

        fs::create_dir_all(self.meshes.dir())?;
        fs::create_dir_all(self.tracks.dir())?;

        info!(
            "Exporting {} objects from '{}'",
            objects.len(),
            self.collection
        );

        let mut stats = ExportStats::default();
        for name in &objects {
            self.export_object(host, name, &mut stats)?;
        }

        info!(
            "Export complete: {} meshes, {} tracks ({} records)",
            stats.meshes, stats.tracks, stats.records
        );
        Ok(stats)
    }

    /// Export one object; the host frame cursor is left where it was found.
    pub fn export_object<H: SceneHost + ?Sized>(
        &self,
        host: &mut H,
        name: &str,
        stats: &mut ExportStats,
    ) -> Result<()> {
        let _span = info_span!("export_object", object = name).entered();
        let cursor = host.current_frame();

        if !host.object_kind(name)?.is_camera() {
            self.meshes.export(host, name)?;
            stats.meshes += 1;
        }

        match self.tracks.export(host, name)? {
            Some(track) => {
                stats.tracks += 1;
                stats.records += track.records;
            }
            None => stats.skipped_tracks += 1,
        }

        host.set_current_frame(cursor)?;
        Ok(())
    }
}
