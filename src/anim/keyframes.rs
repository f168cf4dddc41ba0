//! Animation data as recorded by the host, and per-frame aggregation of it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Interpolation;
use crate::util::{Error, Frame, Result};

/// A single key on a channel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Frame coordinate; may be fractional on the host side.
    pub frame: f64,
    #[serde(default)]
    pub interpolation: Interpolation,
}

impl Keyframe {
    pub fn new(frame: f64, interpolation: Interpolation) -> Self {
        Self {
            frame,
            interpolation,
        }
    }

    /// Integer frame bucket of this key (truncated toward zero).
    #[inline]
    pub fn frame_index(&self) -> Frame {
        self.frame as Frame
    }
}

/// One animated property curve, e.g. `location[2]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub data_path: String,
    #[serde(default)]
    pub array_index: usize,
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
}

impl Channel {
    pub fn new(data_path: impl Into<String>, array_index: usize) -> Self {
        Self {
            data_path: data_path.into(),
            array_index,
            keyframes: Vec::new(),
        }
    }

    /// Builder-style key insertion.
    pub fn with_key(mut self, frame: f64, interpolation: Interpolation) -> Self {
        self.keyframes.push(Keyframe::new(frame, interpolation));
        self
    }
}

/// Channel bag of an action for one animated slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionSlot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

/// A named set of slots, each holding channels.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slots: Vec<ActionSlot>,
}

impl Action {
    /// Single-slot action holding `channels`.
    pub fn with_channels(name: impl Into<String>, channels: Vec<Channel>) -> Self {
        Self {
            name: name.into(),
            slots: vec![ActionSlot {
                name: String::new(),
                channels,
            }],
        }
    }
}

/// Animation attached to an object: an optional active action and slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationData {
    #[serde(default)]
    pub action: Option<Action>,
    #[serde(default)]
    pub action_slot: Option<usize>,
}

impl AnimationData {
    pub fn new(action: Action) -> Self {
        Self {
            action: Some(action),
            action_slot: None,
        }
    }

    /// Pick the slot to read channels from.
    ///
    /// Returns `Ok(None)` when there is nothing to export (no action, or an
    /// action without slots). The bool is true when the slot was not set and
    /// the first one was chosen; the caller should store it back on the host.
    pub fn resolve_slot(&self) -> Result<Option<(usize, bool)>> {
        let Some(action) = &self.action else {
            return Ok(None);
        };
        match self.action_slot {
            Some(slot) if slot < action.slots.len() => Ok(Some((slot, false))),
            Some(slot) => Err(Error::other(format!(
                "action '{}' has no slot {} ({} slots)",
                action.name,
                slot,
                action.slots.len()
            ))),
            None if action.slots.is_empty() => Ok(None),
            None => Ok(Some((0, true))),
        }
    }

    /// Channels of a resolved slot.
    pub fn channels(&self, slot: usize) -> &[Channel] {
        self.action
            .as_ref()
            .and_then(|a| a.slots.get(slot))
            .map(|s| s.channels.as_slice())
            .unwrap_or(&[])
    }
}

/// Interpolation tags recorded at each keyed frame, in ascending frame order.
///
/// Tags keep the order in which channels were scanned; that order is what
/// breaks ties in [`dominant_interpolation`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyframeTable {
    frames: BTreeMap<Frame, Vec<Interpolation>>,
}

impl KeyframeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan every key of every channel.
    pub fn from_channels<'a, I>(channels: I) -> Self
    where
        I: IntoIterator<Item = &'a Channel>,
    {
        let mut table = Self::new();
        for channel in channels {
            for key in &channel.keyframes {
                table.insert(key.frame_index(), key.interpolation);
            }
        }
        table
    }

    pub fn insert(&mut self, frame: Frame, interpolation: Interpolation) {
        self.frames.entry(frame).or_default().push(interpolation);
    }

    /// Number of distinct keyed frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Distinct keyed frames, ascending.
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        self.frames.keys().copied()
    }

    pub fn tags(&self, frame: Frame) -> Option<&[Interpolation]> {
        self.frames.get(&frame).map(Vec::as_slice)
    }

    /// `(frame, tags)` pairs, ascending by frame.
    pub fn iter(&self) -> impl Iterator<Item = (Frame, &[Interpolation])> + '_ {
        self.frames.iter().map(|(f, t)| (*f, t.as_slice()))
    }
}

/// Most frequent tag; on equal counts the one seen first wins.
pub fn dominant_interpolation(tags: &[Interpolation]) -> Option<Interpolation> {
    let mut counts: Vec<(Interpolation, usize)> = Vec::new();
    for &tag in tags {
        match counts.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, n)) => *n += 1,
            None => counts.push((tag, 1)),
        }
    }

    let mut best: Option<(Interpolation, usize)> = None;
    for (tag, n) in counts {
        if best.map_or(true, |(_, b)| n > b) {
            best = Some((tag, n));
        }
    }
    best.map(|(tag, _)| tag)
}
