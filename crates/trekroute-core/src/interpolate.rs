//! Placement policy for stops that could not be resolved.
//!
//! Endpoints are pinned to the trek anchor so the line always begins and ends
//! at the trek's known location. Interior stops are placed between their
//! nearest resolved neighbours; a missing neighbour is the anchor.

use std::str::FromStr;

use crate::geo::{lerp, Coordinate};
use crate::types::ResolutionStatus;

/// How an unresolved interior stop is positioned between its neighbours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InterpolationMode {
    /// Halfway between the nearest resolved neighbours.
    #[default]
    Midpoint,
    /// Proportional to the stop's day number (or list position when day
    /// numbers do not increase) between its neighbours, so runs of
    /// consecutive unresolved stops are spread along the segment.
    DayProportional,
}

impl FromStr for InterpolationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "midpoint" => Ok(Self::Midpoint),
            "day-proportional" | "day_proportional" | "proportional" => Ok(Self::DayProportional),
            other => Err(format!(
                "unknown interpolation mode '{other}' (expected midpoint or day-proportional)"
            )),
        }
    }
}

impl std::fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Midpoint => write!(f, "midpoint"),
            Self::DayProportional => write!(f, "day-proportional"),
        }
    }
}

/// A concrete position and how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub coordinate: Coordinate,
    pub status: ResolutionStatus,
}

/// One stop's state once every lookup has settled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub day: u32,
    pub placement: Option<Placement>,
}

/// Gives every slot a placement. Resolved slots are returned unchanged.
///
/// Only originally-resolved slots act as neighbours, so an interpolated stop
/// never feeds the position of another.
#[must_use]
pub fn place_unresolved(slots: &[Slot], anchor: Coordinate, mode: InterpolationMode) -> Vec<Placement> {
    let last = slots.len().saturating_sub(1);

    slots
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            if let Some(placement) = slot.placement {
                return placement;
            }
            if i == 0 || i == last {
                return Placement {
                    coordinate: anchor,
                    status: ResolutionStatus::Anchored,
                };
            }

            let (prev_idx, prev) = slots[..i]
                .iter()
                .enumerate()
                .rev()
                .find_map(|(j, s)| s.placement.map(|p| (j, p.coordinate)))
                .unwrap_or((0, anchor));
            let (next_idx, next) = slots[i + 1..]
                .iter()
                .enumerate()
                .find_map(|(k, s)| s.placement.map(|p| (i + 1 + k, p.coordinate)))
                .unwrap_or((last, anchor));

            let t = match mode {
                InterpolationMode::Midpoint => 0.5,
                InterpolationMode::DayProportional => {
                    proportional_fraction(slots, prev_idx, i, next_idx)
                }
            };

            Placement {
                coordinate: lerp(prev, next, t),
                status: ResolutionStatus::Interpolated,
            }
        })
        .collect()
}

/// Fraction of the way from `prev` to `next` at which `i` sits, using day
/// numbers when they strictly increase across the span and list positions
/// otherwise.
#[allow(clippy::cast_precision_loss)]
fn proportional_fraction(slots: &[Slot], prev: usize, i: usize, next: usize) -> f64 {
    let (d_prev, d_i, d_next) = (slots[prev].day, slots[i].day, slots[next].day);
    if d_prev < d_i && d_i < d_next {
        return f64::from(d_i - d_prev) / f64::from(d_next - d_prev);
    }
    (i - prev) as f64 / (next - prev) as f64
}
