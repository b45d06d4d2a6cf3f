/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::{
    detection::{OffRouteDetector, OffRouteVerdict},
    milestone::*,
    route_progress::RouteProgress,
    snap::{snap_engine, Snap},
    types::*,
};
use crate::domain::types::navigation::LocationUpdate;
use crate::environment::NavigationOptions;
use crate::tools::error::NavigationError;
use crate::tools::logger::*;

/// State of one active navigation, fed one location fix at a time.
pub struct NavigationSession {
    options: NavigationOptions,
    off_route_detector: OffRouteDetector,
    snap: Box<dyn Snap + Send>,
    voice_instruction_milestone: VoiceInstructionMilestone,
    banner_instruction_milestone: BannerInstructionMilestone,
    current_route: Option<Route>,
}

impl NavigationSession {
    pub fn new(options: NavigationOptions) -> Result<Self, NavigationError> {
        options.validate()?;

        Ok(Self {
            snap: snap_engine(&options),
            options,
            off_route_detector: OffRouteDetector::new(),
            voice_instruction_milestone: VoiceInstructionMilestone::new(),
            banner_instruction_milestone: BannerInstructionMilestone::new(),
            current_route: None,
        })
    }

    pub fn options(&self) -> &NavigationOptions {
        &self.options
    }

    pub fn off_route_detector(&self) -> &OffRouteDetector {
        &self.off_route_detector
    }

    pub fn process_location(
        &mut self,
        location: &LocationFix,
        route_progress: &RouteProgress,
    ) -> LocationUpdate {
        if is_new_route(self.current_route.as_ref(), route_progress.route()) {
            if self.current_route.is_some() {
                info!(tag = "[NEW_ROUTE]", "Route geometry changed, resetting milestones");
            }
            self.reset_for_new_route();
            self.current_route = Some(route_progress.route().clone());
        }

        let verdict = if self.options.enable_off_route_detection {
            self.off_route_detector
                .is_user_off_route(location, route_progress, &self.options)
        } else {
            OffRouteVerdict::OnRoute
        };

        let snapped_location = if verdict.is_off_route() {
            location.clone()
        } else {
            self.snap.get_snapped_location(location, route_progress)
        };

        let voice_instruction = if self.voice_instruction_milestone.is_occurring(route_progress) {
            self.voice_instruction_milestone.current_instruction().cloned()
        } else {
            None
        };

        let (banner_instruction, arrived) =
            if self.banner_instruction_milestone.is_occurring(route_progress) {
                (
                    self.banner_instruction_milestone.banner_instructions().cloned(),
                    is_arrival_event(route_progress, &self.banner_instruction_milestone),
                )
            } else {
                (None, false)
            };

        if arrived {
            info!(
                tag = "[ARRIVAL]",
                leg_index = route_progress.leg_index(),
                step_index = route_progress.step_index(),
                "Arrival event"
            );
        }

        debug!(
            tag = "[LOCATION_PROCESSED]",
            ?verdict,
            leg_index = route_progress.leg_index(),
            step_index = route_progress.step_index(),
            step_distance_remaining = route_progress.step_distance_remaining(),
            "Processed location fix"
        );

        LocationUpdate {
            location: snapped_location,
            verdict,
            voice_instruction,
            banner_instruction,
            arrived,
        }
    }

    /// Forgets trend and milestone memory, called on reroutes and new routes.
    pub fn reset_for_new_route(&mut self) {
        self.off_route_detector.clear_distances_away_from_maneuver();
        self.voice_instruction_milestone.clear();
        self.banner_instruction_milestone.clear();
    }
}
