//! OBJ export with the appended `TRANSFORM` line.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::{MeshExportOptions, SceneHost};
use crate::util::{fmt_float, from_row_major, to_row_major, to_y_up, DMat4, Error, Result};

/// File extension of mesh files.
pub const OBJ_EXTENSION: &str = "obj";

/// Keyword of the trailing world-matrix line.
pub const TRANSFORM_KEYWORD: &str = "TRANSFORM";

/// Format the trailing matrix line, without surrounding newlines.
///
/// `matrix` is the Z-up world matrix; the line carries its Y-up form, row by row.
pub fn format_transform_line(matrix: &DMat4) -> String {
    let mut line = String::from(TRANSFORM_KEYWORD);
    for v in to_row_major(&to_y_up(*matrix)) {
        line.push(' ');
        line.push_str(&fmt_float(v));
    }
    line
}

/// Append the `TRANSFORM` line to an existing OBJ file.
pub fn append_transform(path: &Path, matrix: &DMat4) -> Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    write!(file, "\n{}\n", format_transform_line(matrix))?;
    Ok(())
}

/// Parse a `TRANSFORM` line back into the Y-up matrix it holds.
pub fn parse_transform_line(text: &str, line: usize) -> Result<DMat4> {
    let mut parts = text.split_whitespace();
    if parts.next() != Some(TRANSFORM_KEYWORD) {
        return Err(Error::parse(line, "missing TRANSFORM keyword"));
    }
    let values = parts
        .map(|p| {
            p.parse::<f64>()
                .map_err(|e| Error::parse(line, format!("'{}': {}", p, e)))
        })
        .collect::<Result<Vec<f64>>>()?;
    let values: [f64; 16] = values
        .try_into()
        .map_err(|v: Vec<f64>| Error::parse(line, format!("expected 16 values, got {}", v.len())))?;
    Ok(from_row_major(&values))
}

/// Find the last `TRANSFORM` line of an OBJ file.
pub fn read_obj_transform(path: &Path) -> Result<Option<DMat4>> {
    let text = fs::read_to_string(path)?;
    text.lines()
        .enumerate()
        .filter(|(_, l)| l.starts_with(TRANSFORM_KEYWORD))
        .last()
        .map(|(i, l)| parse_transform_line(l, i + 1))
        .transpose()
}

/// Exports object meshes through the host's OBJ writer.
#[derive(Clone, Debug)]
pub struct MeshExporter {
    dir: PathBuf,
    options: MeshExportOptions,
}

impl MeshExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            options: MeshExportOptions::default(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn mesh_path(&self, object: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", object, OBJ_EXTENSION))
    }

    /// Export a single object.
    ///
    /// Every object is deselected and only `object` selected; its world matrix
    /// is reset to identity for the host export and restored afterwards. The
    /// original matrix goes into the trailing `TRANSFORM` line.
    pub fn export<H: SceneHost + ?Sized>(&self, host: &mut H, object: &str) -> Result<PathBuf> {
        for name in host.enumerate_objects() {
            host.select(&name, false)?;
        }
        host.select(object, true)?;

        let path = self.mesh_path(object);
        File::create(&path)?;

        let original = host.world_matrix(object)?;
        host.set_world_matrix(object, DMat4::IDENTITY)?;
        debug!(object, path = %path.display(), "host mesh export");
        let exported = host.export_selected_mesh(&path, &self.options);
        host.set_world_matrix(object, original)?;
        exported?;

        append_transform(&path, &original)?;
        host.select(object, false)?;

        info!("Wrote {}", path.display());
        Ok(path)
    }
}
