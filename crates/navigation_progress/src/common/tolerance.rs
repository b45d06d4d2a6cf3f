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
    utils::{distance_between_in_meters, line_slice},
};
use crate::environment::NavigationOptions;

/// Off-route tolerance derived from how dense the remaining geometry of the current step is.
///
/// The mean spacing of the remaining (non zero-length) segments approximates the local corridor
/// width: a curvy road is drawn with closely spaced points and gets a tight radius, a straight
/// highway gets a wide one. The value is bounded by `minimum_distance_off_route` and
/// `maximum_distance_off_route`.
pub fn dynamic_reroute_distance_tolerance(
    current_point: &Point,
    route_progress: &RouteProgress,
    options: &NavigationOptions,
) -> f64 {
    let step_points = route_progress.current_step_points();
    let remaining_step_points = match step_points.last() {
        Some(maneuver_point) => match line_slice(current_point, maneuver_point, step_points) {
            Ok(remaining_step_points) => remaining_step_points,
            Err(_) => return options.maximum_distance_off_route,
        },
        None => return options.maximum_distance_off_route,
    };

    let (remaining_length, segments) = remaining_step_points
        .windows(2)
        .map(|segment| distance_between_in_meters(&segment[0], &segment[1]))
        .filter(|segment_length| *segment_length > 0.0)
        .fold((0.0, 0_usize), |(length, segments), segment_length| {
            (length + segment_length, segments + 1)
        });

    if segments == 0 {
        return options.minimum_distance_off_route;
    }

    (remaining_length / segments as f64)
        .max(options.minimum_distance_off_route)
        .min(options.maximum_distance_off_route)
}

pub fn accuracy_tolerance(location: &LocationFix, options: &NavigationOptions) -> f64 {
    location.accuracy.inner() * options.dead_reckoning_time_interval
}

/// Radius around the current step inside which a fix still counts as on-route.
pub fn off_route_radius(
    location: &LocationFix,
    current_point: &Point,
    route_progress: &RouteProgress,
    options: &NavigationOptions,
) -> f64 {
    let dynamic_tolerance = dynamic_reroute_distance_tolerance(current_point, route_progress, options);
    let accuracy_tolerance = accuracy_tolerance(location, options);
    dynamic_tolerance.max(accuracy_tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::route_progress::fixtures::*;
    use crate::common::utils::destination;
    use chrono::Utc;

    fn route_with_spacing(spacing: f64, points: usize) -> Route {
        let geometry = (0..points)
            .map(|i| destination(&Point::new(0.0, 0.0), 0.0, spacing * i as f64))
            .collect();
        let first = leg(vec![
            step("spaced", geometry, ManeuverType::Depart, vec![], vec![]),
            step(
                "arrive",
                vec![Point::new(1.0, 0.0), Point::new(1.0, 0.0)],
                ManeuverType::Arrive,
                vec![],
                vec![],
            ),
        ]);
        Route {
            distance: first.distance,
            legs: vec![first],
        }
    }

    fn fix_with_accuracy(point: Point, accuracy: f64) -> LocationFix {
        LocationFix {
            provider: "test".to_string(),
            point,
            bearing: None,
            accuracy: Accuracy(accuracy),
            timestamp: TimeStamp(Utc::now()),
        }
    }

    #[test]
    fn dense_geometry_gives_minimum_tolerance() {
        let route = route_with_spacing(5.0, 40);
        let progress = progress_at_start_of(&route, 0, 0);
        let options = NavigationOptions::default();

        let tolerance =
            dynamic_reroute_distance_tolerance(&Point::new(0.0, 0.0), &progress, &options);

        assert_eq!(tolerance, options.minimum_distance_off_route);
    }

    #[test]
    fn sparse_geometry_gives_maximum_tolerance() {
        let route = route_with_spacing(500.0, 4);
        let progress = progress_at_start_of(&route, 0, 0);
        let options = NavigationOptions::default();

        let tolerance =
            dynamic_reroute_distance_tolerance(&Point::new(0.0, 0.0), &progress, &options);

        assert_eq!(tolerance, options.maximum_distance_off_route);
    }

    #[test]
    fn medium_geometry_tracks_point_spacing() {
        let route = route_with_spacing(30.0, 10);
        let progress = progress_at_start_of(&route, 0, 0);

        let tolerance = dynamic_reroute_distance_tolerance(
            &Point::new(0.0, 0.0),
            &progress,
            &NavigationOptions::default(),
        );

        assert!((tolerance - 30.0).abs() < 1e-3, "{tolerance}");
    }

    #[test]
    fn at_the_maneuver_there_is_no_corridor_left() {
        let route = route_with_spacing(30.0, 10);
        let progress = progress_at_start_of(&route, 0, 0);
        let maneuver_point = *route.legs[0].steps[0].geometry.last().unwrap();
        let options = NavigationOptions::default();

        let tolerance = dynamic_reroute_distance_tolerance(&maneuver_point, &progress, &options);

        assert_eq!(tolerance, options.minimum_distance_off_route);
    }

    #[test]
    fn poor_accuracy_widens_the_radius() {
        let route = route_with_spacing(30.0, 10);
        let progress = progress_at_start_of(&route, 0, 0);
        let options = NavigationOptions {
            dead_reckoning_time_interval: 2.0,
            ..Default::default()
        };
        let point = Point::new(0.0, 0.0);

        let radius = off_route_radius(&fix_with_accuracy(point, 40.0), &point, &progress, &options);
        assert!((radius - 80.0).abs() < 1e-9);

        let radius = off_route_radius(&fix_with_accuracy(point, 3.0), &point, &progress, &options);
        assert!((radius - 30.0).abs() < 1e-3);
    }
}
