/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use super::types::*;
use crate::tools::error::NavigationError;
use geo::{HaversineDistance, HaversineLength, LineString};
use std::f64::consts::PI;

/// Mean earth radius, the same one `geo` uses for its haversine measurements.
pub const EARTH_RADIUS_IN_METERS: f64 = 6371008.8;

fn deg2rad(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

fn rad2deg(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Normalizes any angle in degrees into `[0, 360)`.
pub fn wrap_bearing(bearing: f64) -> f64 {
    let wrapped = bearing.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

pub fn distance_between_in_meters(latlong1: &Point, latlong2: &Point) -> f64 {
    geo::Point::from(latlong1).haversine_distance(&geo::Point::from(latlong2))
}

/// Initial great-circle bearing from `from` to `to`, in degrees `[0, 360)`.
pub fn bearing_between(from: &Point, to: &Point) -> f64 {
    let lat1 = deg2rad(from.lat.inner());
    let lat2 = deg2rad(to.lat.inner());
    let dlon = deg2rad(to.lon.inner() - from.lon.inner());

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    wrap_bearing(rad2deg(y.atan2(x)))
}

/// Point reached by travelling `distance` meters from `origin` along `bearing`.
pub fn destination(origin: &Point, bearing: f64, distance: f64) -> Point {
    let lat1 = deg2rad(origin.lat.inner());
    let lon1 = deg2rad(origin.lon.inner());
    let bearing = deg2rad(bearing);
    let angular_distance = distance / EARTH_RADIUS_IN_METERS;

    let lat2 = (lat1.sin() * angular_distance.cos()
        + lat1.cos() * angular_distance.sin() * bearing.cos())
    .asin();
    let lon2 = lon1
        + (bearing.sin() * angular_distance.sin() * lat1.cos())
            .atan2(angular_distance.cos() - lat1.sin() * lat2.sin());

    Point::new(rad2deg(lat2), rad2deg(lon2))
}

/// Sum of the great-circle lengths of consecutive segments.
pub fn line_length(line: &[Point]) -> f64 {
    line.iter()
        .map(geo::Coord::<f64>::from)
        .collect::<LineString<f64>>()
        .haversine_length()
}

// Projection happens on a local equirectangular plane scaled at the query point latitude,
// the result is interpolated back in lat/lon.
fn find_closest_point_on_segment(p1: &Point, p2: &Point, p: &Point) -> Point {
    let scale = deg2rad(p.lat.inner()).cos();

    let x = p.lon.inner() * scale;
    let y = p.lat.inner();
    let x1 = p1.lon.inner() * scale;
    let y1 = p1.lat.inner();
    let x2 = p2.lon.inner() * scale;
    let y2 = p2.lat.inner();

    let a = x - x1;
    let b = y - y1;
    let c = x2 - x1;
    let d = y2 - y1;

    let dot = a * c + b * d;
    let len_sq = c * c + d * d;
    let mut param = -1.0;

    if len_sq != 0.0 {
        param = dot / len_sq;
    }

    if param <= 0.0 {
        *p1
    } else if param >= 1.0 {
        *p2
    } else {
        Point::new(
            y1 + param * d,
            p1.lon.inner() + param * (p2.lon.inner() - p1.lon.inner()),
        )
    }
}

/// Projects `point` onto `line`, returning `None` only when the line has no points.
pub fn find_closest_point_on_route(point: &Point, line: &[Point]) -> Option<ProjectionPoint> {
    match line {
        [] => None,
        [only] => Some(ProjectionPoint {
            segment_index: 0,
            projection_point: *only,
            projection_point_to_point_distance: distance_between_in_meters(point, only),
            projection_point_to_line_start_distance: 0.0,
        }),
        _ => {
            let mut closest: Option<ProjectionPoint> = None;
            let mut travelled = 0.0;

            for (segment_index, segment) in line.windows(2).enumerate() {
                let (start, end) = (&segment[0], &segment[1]);
                let projection_point = find_closest_point_on_segment(start, end, point);
                let distance = distance_between_in_meters(&projection_point, point);

                if closest
                    .as_ref()
                    .map_or(true, |closest| distance < closest.projection_point_to_point_distance)
                {
                    closest = Some(ProjectionPoint {
                        segment_index,
                        projection_point,
                        projection_point_to_point_distance: distance,
                        projection_point_to_line_start_distance: travelled
                            + distance_between_in_meters(start, &projection_point),
                    });
                }

                travelled += distance_between_in_meters(start, end);
            }

            closest
        }
    }
}

/// Sub-line between the projections of `start` and `stop` onto `line`.
///
/// When both project onto the same place the result is a zero-length two point line.
pub fn line_slice(start: &Point, stop: &Point, line: &[Point]) -> Result<Vec<Point>, NavigationError> {
    if line.len() < 2 {
        return Err(NavigationError::DegenerateGeometry(line.len()));
    }

    let start_vertex = find_closest_point_on_route(start, line)
        .ok_or(NavigationError::DegenerateGeometry(line.len()))?;
    let stop_vertex = find_closest_point_on_route(stop, line)
        .ok_or(NavigationError::DegenerateGeometry(line.len()))?;

    let (first, last) = if start_vertex.segment_index <= stop_vertex.segment_index {
        (start_vertex, stop_vertex)
    } else {
        (stop_vertex, start_vertex)
    };

    let mut clipped = Vec::with_capacity(last.segment_index - first.segment_index + 2);
    clipped.push(first.projection_point);
    clipped.extend_from_slice(&line[first.segment_index + 1..=last.segment_index]);
    clipped.push(last.projection_point);

    Ok(clipped)
}

/// Point `distance` meters along `line`, or its last point when the line is shorter.
pub fn point_along(line: &[Point], distance: f64) -> Option<Point> {
    let first = line.first()?;
    if distance <= 0.0 {
        return Some(*first);
    }

    let mut travelled = 0.0;
    for segment in line.windows(2) {
        let segment_length = distance_between_in_meters(&segment[0], &segment[1]);
        if segment_length > 0.0 && travelled + segment_length >= distance {
            return Some(destination(
                &segment[0],
                bearing_between(&segment[0], &segment[1]),
                distance - travelled,
            ));
        }
        travelled += segment_length;
    }

    line.last().copied()
}

/// Distance between a point and the closest point of the step geometry.
pub fn user_true_distance_from_step(point: &Point, step: &LegStep) -> f64 {
    match step.geometry.as_slice() {
        [] => 0.0,
        [only] => distance_between_in_meters(point, only),
        line => find_closest_point_on_route(point, line)
            .map(|projection| projection.projection_point_to_point_distance)
            .unwrap_or(0.0),
    }
}

fn decode_polyline_value(encoded: &[u8], index: &mut usize) -> Result<i64, NavigationError> {
    let mut shift = 0;
    let mut result: i64 = 0;

    loop {
        let byte = *encoded.get(*index).ok_or_else(|| {
            NavigationError::InvalidPolyline(format!("Unexpected end of input at byte {index}"))
        })?;
        if !(63..127).contains(&byte) || shift > 60 {
            return Err(NavigationError::InvalidPolyline(format!(
                "Invalid character at byte {index}"
            )));
        }
        let chunk = (byte - 63) as i64;
        *index += 1;
        result |= (chunk & 0x1F) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Decodes a Google encoded polyline, `precision` being 5 for classic polylines and 6 for
/// polyline6 geometries.
pub fn decode_polyline(encoded: &str, precision: u32) -> Result<Vec<Point>, NavigationError> {
    let factor = 10_f64.powi(precision as i32);
    let encoded = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < encoded.len() {
        lat += decode_polyline_value(encoded, &mut index)?;
        lng += decode_polyline_value(encoded, &mut index)?;

        points.push(Point::new(lat as f64 / factor, lng as f64 / factor));
    }

    Ok(points)
}
