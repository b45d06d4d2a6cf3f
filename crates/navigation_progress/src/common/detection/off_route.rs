/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::{
    detection::OffRouteVerdict,
    ring_buffer::RingBuffer,
    route_progress::RouteProgress,
    tolerance::off_route_radius,
    types::*,
    utils::{
        distance_between_in_meters, find_closest_point_on_route, line_length, line_slice,
        user_true_distance_from_step,
    },
};
use crate::environment::NavigationOptions;
use tracing::{debug, info};

const DISTANCES_AWAY_FROM_MANEUVER_CAPACITY: usize = 3;
const TWO_POINTS: usize = 2;

/// Decides, fix by fix, whether the device left the planned route.
///
/// One detector per navigation session. It remembers where the last reroute was triggered and
/// the last few "distance to maneuver" samples that kept growing.
#[derive(Debug, Clone)]
pub struct OffRouteDetector {
    last_reroute_point: Option<Point>,
    distances_away_from_maneuver: RingBuffer<i64>,
}

impl Default for OffRouteDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl OffRouteDetector {
    pub fn new() -> Self {
        Self {
            last_reroute_point: None,
            distances_away_from_maneuver: RingBuffer::new(DISTANCES_AWAY_FROM_MANEUVER_CAPACITY),
        }
    }

    pub fn last_reroute_point(&self) -> Option<&Point> {
        self.last_reroute_point.as_ref()
    }

    pub fn distances_away_from_maneuver(&self) -> &RingBuffer<i64> {
        &self.distances_away_from_maneuver
    }

    /// Runs the off-route checks in order:
    ///
    /// 1. No route distance remaining: always off-route, the caller then falls back to the raw
    ///    location.
    /// 2. Fewer than `minimum_distance_before_rerouting` meters travelled since the last reroute
    ///    point (or this is the first fix): on-route.
    /// 3. Within the off-route radius of the current step: off-route only if the device has been
    ///    moving away from the maneuver for the last three samples.
    /// 4. Outside the radius: advance the step if the upcoming step is within
    ///    `maneuver_zone_radius`, otherwise off-route.
    #[macros::measure_duration]
    pub fn is_user_off_route(
        &mut self,
        location: &LocationFix,
        route_progress: &RouteProgress,
        options: &NavigationOptions,
    ) -> OffRouteVerdict {
        if route_progress.distance_remaining() == 0.0 {
            debug!(tag = "[OFF_ROUTE_NO_DISTANCE_REMAINING]", "No route distance remaining");
            return OffRouteVerdict::OffRoute;
        }

        if !self.valid_off_route(location, options) {
            return OffRouteVerdict::OnRoute;
        }

        let current_point = location.point;
        let distance_from_current_step =
            user_true_distance_from_step(&current_point, route_progress.current_step());
        let off_route_radius = off_route_radius(location, &current_point, route_progress, options);

        if distance_from_current_step <= off_route_radius {
            return if self.is_moving_away_from_maneuver(location, route_progress, options) {
                info!(
                    tag = "[OFF_ROUTE_MOVING_AWAY_FROM_MANEUVER]",
                    distance_from_current_step, off_route_radius, "User is heading away from the maneuver"
                );
                OffRouteVerdict::OffRoute
            } else {
                OffRouteVerdict::OnRoute
            };
        }

        if close_to_upcoming_step(options, &current_point, route_progress.upcoming_step()) {
            info!(
                tag = "[OFF_ROUTE_CLOSE_TO_UPCOMING_STEP]",
                step_index = route_progress.step_index(),
                "Outside of the current step but inside the upcoming maneuver zone"
            );
            return OffRouteVerdict::AdvanceStepAndOnRoute;
        }

        self.update_last_reroute_point(location);
        info!(
            tag = "[OFF_ROUTE_DETECTED]",
            distance_from_current_step, off_route_radius, "User is off route"
        );
        OffRouteVerdict::OffRoute
    }

    /// Forgets the recent distances away from the maneuver, for new routes and reroutes.
    pub fn clear_distances_away_from_maneuver(&mut self) {
        self.distances_away_from_maneuver.clear();
    }

    fn valid_off_route(&mut self, location: &LocationFix, options: &NavigationOptions) -> bool {
        let distance_from_last_reroute = match self.last_reroute_point.as_ref() {
            Some(last_reroute_point) => {
                distance_between_in_meters(last_reroute_point, &location.point)
            }
            None => {
                // First update, it becomes the reference point
                self.update_last_reroute_point(location);
                0.0
            }
        };
        distance_from_last_reroute > options.minimum_distance_before_rerouting
    }

    fn is_moving_away_from_maneuver(
        &mut self,
        location: &LocationFix,
        route_progress: &RouteProgress,
        options: &NavigationOptions,
    ) -> bool {
        if self.moving_away_from_maneuver(route_progress, &location.point, options) {
            self.update_last_reroute_point(location);
            true
        } else {
            false
        }
    }

    fn moving_away_from_maneuver(
        &mut self,
        route_progress: &RouteProgress,
        current_point: &Point,
        options: &NavigationOptions,
    ) -> bool {
        let step_points = route_progress.current_step_points();
        if route_progress.upcoming_step().is_none() || step_points.len() < TWO_POINTS {
            return false;
        }

        let Some(maneuver_point) = step_points.last() else {
            return false;
        };
        let Some(user_point_on_step) = find_closest_point_on_route(current_point, step_points)
            .map(|projection| projection.projection_point)
        else {
            return false;
        };
        if user_point_on_step == *maneuver_point {
            return false;
        }

        let Ok(remaining_step_points) = line_slice(&user_point_on_step, maneuver_point, step_points)
        else {
            return false;
        };
        let user_distance_to_maneuver = line_length(&remaining_step_points) as i64;

        self.record_distance_to_maneuver(user_distance_to_maneuver, options)
    }

    /// Feeds one "distance to maneuver" sample and reports whether the last three growing samples
    /// span more than `off_route_minimum_distance_meters_before_wrong_direction`.
    fn record_distance_to_maneuver(
        &mut self,
        user_distance_to_maneuver: i64,
        options: &NavigationOptions,
    ) -> bool {
        let distances = &mut self.distances_away_from_maneuver;

        match distances.last().copied() {
            Err(_) => distances.add_last(user_distance_to_maneuver),
            Ok(last) if user_distance_to_maneuver > last => {
                // full buffer drops its oldest sample
                distances.add_last(user_distance_to_maneuver)
            }
            Ok(last)
                if (last - user_distance_to_maneuver) as f64
                    > options.off_route_minimum_distance_meters_before_right_direction =>
            {
                debug!(
                    tag = "[OFF_ROUTE_RIGHT_DIRECTION]",
                    last, user_distance_to_maneuver, "Heading towards the maneuver again"
                );
                distances.clear()
            }
            Ok(_) => {}
        }

        if distances.size() < DISTANCES_AWAY_FROM_MANEUVER_CAPACITY {
            return false;
        }

        match (distances.first(), distances.last()) {
            (Ok(first), Ok(last)) => {
                (last - first) as f64 > options.off_route_minimum_distance_meters_before_wrong_direction
            }
            _ => false,
        }
    }

    fn update_last_reroute_point(&mut self, location: &LocationFix) {
        self.last_reroute_point = Some(location.point);
        self.distances_away_from_maneuver.clear();
    }
}

fn close_to_upcoming_step(
    options: &NavigationOptions,
    current_point: &Point,
    upcoming_step: Option<&LegStep>,
) -> bool {
    upcoming_step.is_some_and(|upcoming_step| {
        user_true_distance_from_step(current_point, upcoming_step) < options.maneuver_zone_radius
    })
}
