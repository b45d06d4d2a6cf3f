/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::{
    route_progress::RouteProgress,
    types::*,
    utils::{
        bearing_between, distance_between_in_meters, find_closest_point_on_route, line_length,
        point_along,
    },
};
use crate::environment::NavigationOptions;
use tracing::{debug, warn};

const LOOK_AHEAD_DISTANCE_METERS: f64 = 1.0;
const MINIMUM_UPCOMING_LEG_STEPS: usize = 2;
const MINIMUM_UPCOMING_LEG_POINTS: usize = 2;

/// Turns a raw location fix into the location reported to the rest of the navigation loop.
pub trait Snap {
    fn get_snapped_location(
        &mut self,
        location: &LocationFix,
        route_progress: &RouteProgress,
    ) -> LocationFix;
}

/// Picks the snap engine configured by `snap_to_route`.
pub fn snap_engine(options: &NavigationOptions) -> Box<dyn Snap + Send> {
    if options.snap_to_route {
        Box::<SnapToRoute>::default()
    } else {
        Box::new(RawLocation)
    }
}

/// Passes fixes through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawLocation;

impl Snap for RawLocation {
    fn get_snapped_location(
        &mut self,
        location: &LocationFix,
        _route_progress: &RouteProgress,
    ) -> LocationFix {
        location.clone()
    }
}

/// Projects fixes onto the current step and derives the bearing from the route geometry.
///
/// Keeps the last computed bearing so that fixes at the very end of a leg, where no geometry
/// is left to look ahead on, keep pointing the same way.
#[derive(Debug, Default, Clone)]
pub struct SnapToRoute {
    last_snapped_bearing: Option<f64>,
}

impl SnapToRoute {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_snapped_bearing(&self) -> Option<f64> {
        self.last_snapped_bearing
    }

    fn snapped_bearing(
        &mut self,
        location: &LocationFix,
        snapped: &ProjectionPoint,
        route_progress: &RouteProgress,
    ) -> Option<f64> {
        let look_ahead_bearing = look_ahead_point(snapped, route_progress)
            .filter(|future_point| {
                distance_between_in_meters(&snapped.projection_point, future_point) > 0.0
            })
            .map(|future_point| bearing_between(&snapped.projection_point, &future_point));

        match look_ahead_bearing {
            Some(bearing) => {
                self.last_snapped_bearing = Some(bearing);
                Some(bearing)
            }
            None => {
                debug!(
                    tag = "[SNAP_BEARING_FALLBACK]",
                    leg_index = route_progress.leg_index(),
                    step_index = route_progress.step_index(),
                    "No geometry ahead, keeping previous bearing"
                );
                self.last_snapped_bearing
                    .or(location.bearing.map(|bearing| bearing.inner()))
            }
        }
    }
}

impl Snap for SnapToRoute {
    fn get_snapped_location(
        &mut self,
        location: &LocationFix,
        route_progress: &RouteProgress,
    ) -> LocationFix {
        let Some(snapped) =
            find_closest_point_on_route(&location.point, route_progress.current_step_points())
        else {
            warn!(
                tag = "[SNAP_EMPTY_STEP_GEOMETRY]",
                leg_index = route_progress.leg_index(),
                step_index = route_progress.step_index(),
                "Current step has no geometry, using raw location"
            );
            return location.clone();
        };

        let bearing = self.snapped_bearing(location, &snapped, route_progress);

        LocationFix {
            point: snapped.projection_point,
            bearing: bearing.map(Bearing),
            ..location.clone()
        }
    }
}

/// Point one look-ahead distance past the snapped point, on the current leg while enough of it
/// is left, otherwise at the start of the next leg.
fn look_ahead_point(snapped: &ProjectionPoint, route_progress: &RouteProgress) -> Option<Point> {
    if route_progress.leg_distance_remaining() > LOOK_AHEAD_DISTANCE_METERS {
        let leg = route_progress.current_leg();
        let distance_before_step: f64 = leg
            .steps
            .iter()
            .take(route_progress.step_index())
            .map(|step| line_length(&step.geometry))
            .sum();

        return point_along(
            &leg.geometry(),
            distance_before_step
                + snapped.projection_point_to_line_start_distance
                + LOOK_AHEAD_DISTANCE_METERS,
        );
    }

    let upcoming_leg = route_progress.next_leg()?;
    if upcoming_leg.steps.len() < MINIMUM_UPCOMING_LEG_STEPS {
        return None;
    }

    let upcoming_leg_points = upcoming_leg.geometry();
    if upcoming_leg_points.len() < MINIMUM_UPCOMING_LEG_POINTS {
        return None;
    }

    point_along(&upcoming_leg_points, LOOK_AHEAD_DISTANCE_METERS)
}
