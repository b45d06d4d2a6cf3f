/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::utils::decode_polyline;
use crate::tools::error::NavigationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Copy)]
#[macros::impl_getter]
pub struct Latitude(pub f64);
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Copy)]
#[macros::impl_getter]
pub struct Longitude(pub f64);
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, PartialOrd, Copy)]
#[macros::impl_getter]
pub struct Bearing(pub f64);
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, PartialOrd, Copy)]
#[macros::impl_getter]
pub struct Accuracy(pub f64);
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Hash, Ord)]
#[macros::impl_getter]
pub struct TimeStamp(pub DateTime<Utc>);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lat: Latitude,
    pub lon: Longitude,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Point {
            lat: Latitude(lat),
            lon: Longitude(lon),
        }
    }
}

impl From<&Point> for geo::Point<f64> {
    fn from(point: &Point) -> Self {
        geo::point!(x: point.lon.inner(), y: point.lat.inner())
    }
}

impl From<&Point> for geo::Coord<f64> {
    fn from(point: &Point) -> Self {
        geo::Coord {
            x: point.lon.inner(),
            y: point.lat.inner(),
        }
    }
}

/// A raw (or corrected) device location.
///
/// `bearing` is `None` when the provider did not report one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationFix {
    pub provider: String,
    pub point: Point,
    pub bearing: Option<Bearing>,
    pub accuracy: Accuracy,
    pub timestamp: TimeStamp,
}

#[derive(
    Debug, Clone, EnumString, Display, Serialize, Deserialize, Eq, Hash, PartialEq, Copy,
)]
pub enum ManeuverType {
    #[strum(serialize = "depart")]
    #[serde(rename = "depart")]
    Depart,
    #[strum(serialize = "turn")]
    #[serde(rename = "turn")]
    Turn,
    #[strum(serialize = "continue")]
    #[serde(rename = "continue")]
    Continue,
    #[strum(serialize = "new name")]
    #[serde(rename = "new name")]
    NewName,
    #[strum(serialize = "merge")]
    #[serde(rename = "merge")]
    Merge,
    #[strum(serialize = "on ramp")]
    #[serde(rename = "on ramp")]
    OnRamp,
    #[strum(serialize = "off ramp")]
    #[serde(rename = "off ramp")]
    OffRamp,
    #[strum(serialize = "fork")]
    #[serde(rename = "fork")]
    Fork,
    #[strum(serialize = "end of road")]
    #[serde(rename = "end of road")]
    EndOfRoad,
    #[strum(serialize = "roundabout")]
    #[serde(rename = "roundabout")]
    Roundabout,
    #[strum(serialize = "rotary")]
    #[serde(rename = "rotary")]
    Rotary,
    #[strum(serialize = "notification")]
    #[serde(rename = "notification")]
    Notification,
    #[strum(serialize = "arrive")]
    #[serde(rename = "arrive")]
    Arrive,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepManeuver {
    pub location: Point,
    #[serde(rename = "type")]
    pub maneuver_type: ManeuverType,
    pub modifier: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceInstruction {
    pub distance_along_geometry: f64,
    pub announcement: String,
    pub ssml_announcement: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BannerText {
    pub text: String,
    #[serde(rename = "type")]
    pub banner_type: Option<String>,
    pub modifier: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BannerInstruction {
    pub distance_along_geometry: f64,
    pub primary: BannerText,
    pub secondary: Option<BannerText>,
    pub sub: Option<BannerText>,
}

/// One maneuver-to-maneuver segment of a leg.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LegStep {
    pub name: String,
    pub distance: f64,
    pub geometry: Vec<Point>,
    pub maneuver: StepManeuver,
    #[serde(default)]
    pub voice_instructions: Vec<VoiceInstruction>,
    #[serde(default)]
    pub banner_instructions: Vec<BannerInstruction>,
}

impl LegStep {
    /// Builds a step whose geometry comes from a Google encoded polyline with the given
    /// precision (5 or 6 decimal places).
    pub fn from_encoded_polyline(
        name: &str,
        encoded_geometry: &str,
        precision: u32,
        maneuver: StepManeuver,
    ) -> Result<Self, NavigationError> {
        let geometry = decode_polyline(encoded_geometry, precision)?;
        Ok(LegStep {
            name: name.to_owned(),
            distance: crate::common::utils::line_length(&geometry),
            geometry,
            maneuver,
            voice_instructions: vec![],
            banner_instructions: vec![],
        })
    }

    pub fn is_arrival(&self) -> bool {
        self.maneuver.maneuver_type == ManeuverType::Arrive
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteLeg {
    pub distance: f64,
    pub steps: Vec<LegStep>,
}

impl RouteLeg {
    /// Geometry of the whole leg, the steps' points concatenated in travel order.
    pub fn geometry(&self) -> Vec<Point> {
        self.steps
            .iter()
            .flat_map(|step| step.geometry.iter().copied())
            .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub distance: f64,
    pub legs: Vec<RouteLeg>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionPoint {
    pub segment_index: usize,
    pub projection_point: Point,
    pub projection_point_to_point_distance: f64,
    pub projection_point_to_line_start_distance: f64,
}
