//! Sampling evaluated transforms at keyed frames.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Interpolation, KeyframeTable};
use crate::core::{SceneHost, SceneTiming};
use crate::util::{Chrono, DMat3, DMat4, DQuat, DVec3, Error, Frame, Result};

/// One emitted pose of a track.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampledPose {
    /// Seconds since the scene start frame.
    pub time: Chrono,
    pub interpolation: Interpolation,
    pub position: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
}

/// Where the sign-continuity check sits relative to the camera correction.
///
/// The correction is a right-multiplication by a fixed unit quaternion, which
/// preserves dot products, so both stages emit the same signs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuityStage {
    /// Compare the rotations as emitted.
    #[default]
    AfterCamera,
    /// Compare the rotations as decomposed, then correct cameras.
    BeforeCamera,
}

/// Sampling knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackOptions {
    /// Apply the camera forward-axis correction to camera objects.
    pub camera_correction: bool,
    pub continuity_stage: ContinuityStage,
}

impl Default for TrackOptions {
    fn default() -> Self {
        Self {
            camera_correction: true,
            continuity_stage: ContinuityStage::AfterCamera,
        }
    }
}

/// Rotation appended to camera orientations: -90° about local X.
///
/// Host cameras look down -Z with +Y up in their local frame; the renderer
/// expects the camera's forward axis a quarter turn away.
pub fn camera_correction() -> DQuat {
    DQuat::from_rotation_x(-FRAC_PI_2)
}

/// Sign-continuity state carried across consecutive frames.
///
/// Only the immediately preceding rotation is consulted.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuatContinuity {
    prev: Option<DQuat>,
}

impl QuatContinuity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Negate `q` if it sits in the opposite hemisphere of the previous
    /// rotation, then remember the result.
    pub fn apply(&mut self, q: DQuat) -> DQuat {
        let q = match self.prev {
            Some(prev) if q.dot(prev) < 0.0 => -q,
            _ => q,
        };
        self.prev = Some(q);
        q
    }
}

/// Samples one object's evaluated transform at every keyed frame.
pub struct TrackSampler<'h, H: SceneHost + ?Sized> {
    host: &'h mut H,
    timing: SceneTiming,
    options: TrackOptions,
}

impl<'h, H: SceneHost + ?Sized> TrackSampler<'h, H> {
    pub fn new(host: &'h mut H, options: TrackOptions) -> Self {
        let timing = host.timing();
        Self {
            host,
            timing,
            options,
        }
    }

    /// One pose per distinct frame of `table`, ascending.
    pub fn sample(
        &mut self,
        object: &str,
        is_camera: bool,
        table: &KeyframeTable,
    ) -> Result<Vec<SampledPose>> {
        let correction = (is_camera && self.options.camera_correction).then(camera_correction);
        let mut continuity = QuatContinuity::new();
        let mut last_raw = DQuat::IDENTITY;
        let mut poses = Vec::with_capacity(table.len());

        for (frame, tags) in table.iter() {
            let matrix = self.host.evaluate_world_transform(object, frame)?;
            let (scale, raw, position) = decompose(object, frame, &matrix, last_raw)?;
            last_raw = raw;

            let rotation = match self.options.continuity_stage {
                ContinuityStage::AfterCamera => {
                    continuity.apply(correction.map_or(raw, |c| raw * c))
                }
                ContinuityStage::BeforeCamera => {
                    let r = continuity.apply(raw);
                    correction.map_or(r, |c| r * c)
                }
            };

            let interpolation = super::dominant_interpolation(tags).ok_or_else(|| {
                Error::other(format!("frame {} of '{}' has no keyframes", frame, object))
            })?;

            debug!(object, frame, %interpolation, "sampled frame");

            poses.push(SampledPose {
                time: self.timing.frame_to_time(frame),
                interpolation,
                position,
                rotation,
                scale,
            });
        }

        Ok(poses)
    }
}

/// Split a world matrix into scale, unit rotation and translation.
///
/// A mirrored basis negates all three scale axes and keeps a proper rotation.
/// A basis with a zero-length axis carries no rotation; `fallback` is used.
fn decompose(
    object: &str,
    frame: Frame,
    m: &DMat4,
    fallback: DQuat,
) -> Result<(DVec3, DQuat, DVec3)> {
    if !m.is_finite() {
        return Err(Error::Evaluation {
            object: object.to_string(),
            frame,
            message: "world matrix is not finite".into(),
        });
    }

    let basis = DMat3::from_mat4(*m);
    let mut scale = DVec3::new(
        basis.x_axis.length(),
        basis.y_axis.length(),
        basis.z_axis.length(),
    );
    if basis.determinant() < 0.0 {
        scale = -scale;
    }

    let rotation = if scale.cmpeq(DVec3::ZERO).any() {
        fallback
    } else {
        let unit = DMat3::from_cols(
            basis.x_axis / scale.x,
            basis.y_axis / scale.y,
            basis.z_axis / scale.z,
        );
        let q = DQuat::from_mat3(&unit).normalize();
        if q.is_finite() {
            q
        } else {
            fallback
        }
    };

    Ok((scale, rotation, m.w_axis.truncate()))
}
