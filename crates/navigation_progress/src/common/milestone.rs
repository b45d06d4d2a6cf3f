/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::{route_progress::RouteProgress, types::*};
use tracing::debug;

/// Instruction with the smallest trigger distance that is still ahead of (or at) the truncated
/// remaining distance. Ties keep the first listed instruction.
fn find_current_instruction<T>(
    instructions: &[T],
    distance_along_geometry: impl Fn(&T) -> f64,
    step_distance_remaining: f64,
) -> Option<&T> {
    let remaining = step_distance_remaining.trunc();
    instructions
        .iter()
        .filter(|instruction| distance_along_geometry(instruction) >= remaining)
        .min_by(|a, b| distance_along_geometry(a).total_cmp(&distance_along_geometry(b)))
}

pub fn find_current_voice_instructions(
    step: &LegStep,
    step_distance_remaining: f64,
) -> Option<&VoiceInstruction> {
    find_current_instruction(
        &step.voice_instructions,
        |instruction| instruction.distance_along_geometry,
        step_distance_remaining,
    )
}

pub fn find_current_banner_instructions(
    step: &LegStep,
    step_distance_remaining: f64,
) -> Option<&BannerInstruction> {
    find_current_instruction(
        &step.banner_instructions,
        |instruction| instruction.distance_along_geometry,
        step_distance_remaining,
    )
}

/// Primary or secondary text of the banner currently shown for `step`.
pub fn find_current_banner_text(
    step: &LegStep,
    step_distance_remaining: f64,
    primary: bool,
) -> Option<&BannerText> {
    let instruction = find_current_banner_instructions(step, step_distance_remaining)?;
    if primary {
        Some(&instruction.primary)
    } else {
        instruction.secondary.as_ref()
    }
}

fn is_newly_due<T: PartialEq>(
    previous: Option<&T>,
    found: &T,
    distance_along_geometry: f64,
    step_distance_remaining: f64,
) -> bool {
    previous != Some(found) && distance_along_geometry >= step_distance_remaining
}

/// Fires each voice instruction of a step once, when the remaining step distance reaches its
/// trigger distance.
#[derive(Debug, Default, Clone)]
pub struct VoiceInstructionMilestone {
    instruction: Option<VoiceInstruction>,
}

impl VoiceInstructionMilestone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_occurring(&mut self, route_progress: &RouteProgress) -> bool {
        let step_distance_remaining = route_progress.step_distance_remaining();
        let Some(found) =
            find_current_voice_instructions(route_progress.current_step(), step_distance_remaining)
        else {
            return false;
        };

        if !is_newly_due(
            self.instruction.as_ref(),
            found,
            found.distance_along_geometry,
            step_distance_remaining,
        ) {
            return false;
        }

        debug!(
            tag = "[VOICE_INSTRUCTION]",
            distance_along_geometry = found.distance_along_geometry,
            step_distance_remaining,
            "{}",
            found.announcement
        );
        self.instruction = Some(found.clone());
        true
    }

    pub fn current_instruction(&self) -> Option<&VoiceInstruction> {
        self.instruction.as_ref()
    }

    /// Plain text announcement, empty before any instruction fired.
    pub fn announcement(&self) -> &str {
        self.instruction
            .as_ref()
            .map_or("", |instruction| instruction.announcement.as_str())
    }

    pub fn ssml_announcement(&self) -> &str {
        self.instruction
            .as_ref()
            .map_or("", |instruction| instruction.ssml_announcement.as_str())
    }

    /// Text to speak for this progress, the step name until an instruction fired.
    pub fn instruction<'a>(&'a self, route_progress: &RouteProgress<'a>) -> &'a str {
        match self.instruction.as_ref() {
            Some(instruction) => instruction.announcement.as_str(),
            None => route_progress.current_step().name.as_str(),
        }
    }

    pub fn clear(&mut self) {
        self.instruction = None;
    }
}

/// Same firing rule as [`VoiceInstructionMilestone`], for banner instructions.
#[derive(Debug, Default, Clone)]
pub struct BannerInstructionMilestone {
    instruction: Option<BannerInstruction>,
}

impl BannerInstructionMilestone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_occurring(&mut self, route_progress: &RouteProgress) -> bool {
        let step_distance_remaining = route_progress.step_distance_remaining();
        let Some(found) =
            find_current_banner_instructions(route_progress.current_step(), step_distance_remaining)
        else {
            return false;
        };

        if !is_newly_due(
            self.instruction.as_ref(),
            found,
            found.distance_along_geometry,
            step_distance_remaining,
        ) {
            return false;
        }

        debug!(
            tag = "[BANNER_INSTRUCTION]",
            distance_along_geometry = found.distance_along_geometry,
            step_distance_remaining,
            "{}",
            found.primary.text
        );
        self.instruction = Some(found.clone());
        true
    }

    pub fn banner_instructions(&self) -> Option<&BannerInstruction> {
        self.instruction.as_ref()
    }

    pub fn clear(&mut self) {
        self.instruction = None;
    }
}

/// Arrival fires once the last banner of the step leading into (or being) the arrival maneuver
/// has been shown.
pub fn is_arrival_event(
    route_progress: &RouteProgress,
    banner_milestone: &BannerInstructionMilestone,
) -> bool {
    let current_step = route_progress.current_step();
    let arrival_maneuver = current_step.is_arrival()
        || route_progress
            .upcoming_step()
            .is_some_and(|upcoming_step| upcoming_step.is_arrival());
    if !arrival_maneuver {
        return false;
    }

    match (
        banner_milestone.banner_instructions(),
        current_step.banner_instructions.last(),
    ) {
        (Some(current), Some(last)) => current == last,
        _ => false,
    }
}

/// A route is new when there was none before or any leg geometry differs.
pub fn is_new_route(previous: Option<&Route>, current: &Route) -> bool {
    previous.map_or(true, |previous| {
        previous
            .legs
            .iter()
            .map(RouteLeg::geometry)
            .ne(current.legs.iter().map(RouteLeg::geometry))
    })
}
