/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::*;
use crate::tools::error::NavigationError;

/// Read-only snapshot of where the navigation loop believes the device is along the route.
///
/// Rebuilt by the caller for every location fix; this crate never mutates it.
#[derive(Debug, Clone)]
pub struct RouteProgress<'a> {
    route: &'a Route,
    leg_index: usize,
    step_index: usize,
    step_distance_remaining: f64,
    leg_distance_remaining: f64,
    distance_remaining: f64,
}

impl<'a> RouteProgress<'a> {
    pub fn new(
        route: &'a Route,
        leg_index: usize,
        step_index: usize,
        step_distance_remaining: f64,
        leg_distance_remaining: f64,
        distance_remaining: f64,
    ) -> Result<Self, NavigationError> {
        let leg = route.legs.get(leg_index).ok_or_else(|| {
            NavigationError::InvalidRouteProgress(format!(
                "Leg index {leg_index} out of bounds for route with {} legs",
                route.legs.len()
            ))
        })?;

        if step_index >= leg.steps.len() {
            return Err(NavigationError::InvalidRouteProgress(format!(
                "Step index {step_index} out of bounds for leg {leg_index} with {} steps",
                leg.steps.len()
            )));
        }

        Ok(Self {
            route,
            leg_index,
            step_index,
            step_distance_remaining,
            leg_distance_remaining,
            distance_remaining,
        })
    }

    pub fn route(&self) -> &'a Route {
        self.route
    }

    pub fn leg_index(&self) -> usize {
        self.leg_index
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn step_distance_remaining(&self) -> f64 {
        self.step_distance_remaining
    }

    pub fn leg_distance_remaining(&self) -> f64 {
        self.leg_distance_remaining
    }

    pub fn distance_remaining(&self) -> f64 {
        self.distance_remaining
    }

    pub fn current_leg(&self) -> &'a RouteLeg {
        &self.route.legs[self.leg_index]
    }

    pub fn current_step(&self) -> &'a LegStep {
        &self.current_leg().steps[self.step_index]
    }

    /// Next step of the current leg, `None` on the leg's last step.
    pub fn upcoming_step(&self) -> Option<&'a LegStep> {
        self.current_leg().steps.get(self.step_index + 1)
    }

    pub fn current_step_points(&self) -> &'a [Point] {
        &self.current_step().geometry
    }

    pub fn next_leg(&self) -> Option<&'a RouteLeg> {
        self.route.legs.get(self.leg_index + 1)
    }

    pub fn is_final_leg(&self) -> bool {
        self.leg_index + 1 == self.route.legs.len()
    }

    pub fn step_distance_traveled(&self) -> f64 {
        (self.current_step().distance - self.step_distance_remaining).max(0.0)
    }

    pub fn leg_distance_traveled(&self) -> f64 {
        (self.current_leg().distance - self.leg_distance_remaining).max(0.0)
    }
}
