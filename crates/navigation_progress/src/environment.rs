/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::tools::{error::NavigationError, logger::LoggerConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    pub logger_cfg: LoggerConfig,
    pub navigation_options: NavigationOptions,
}

/// Thresholds consumed by the off-route detector, the tolerance model and the snap engine.
/// Distances are in meters.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NavigationOptions {
    pub minimum_distance_before_rerouting: f64,
    pub maneuver_zone_radius: f64,
    pub dead_reckoning_time_interval: f64,
    pub off_route_minimum_distance_meters_before_right_direction: f64,
    pub off_route_minimum_distance_meters_before_wrong_direction: f64,
    pub minimum_distance_off_route: f64,
    pub maximum_distance_off_route: f64,
    pub snap_to_route: bool,
    pub enable_off_route_detection: bool,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            minimum_distance_before_rerouting: 50.0,
            maneuver_zone_radius: 40.0,
            dead_reckoning_time_interval: 1.0,
            off_route_minimum_distance_meters_before_right_direction: 20.0,
            off_route_minimum_distance_meters_before_wrong_direction: 50.0,
            minimum_distance_off_route: 20.0,
            maximum_distance_off_route: 50.0,
            snap_to_route: true,
            enable_off_route_detection: true,
        }
    }
}

impl NavigationOptions {
    pub fn validate(&self) -> Result<(), NavigationError> {
        let thresholds = [
            (
                "minimum_distance_before_rerouting",
                self.minimum_distance_before_rerouting,
            ),
            ("maneuver_zone_radius", self.maneuver_zone_radius),
            (
                "dead_reckoning_time_interval",
                self.dead_reckoning_time_interval,
            ),
            (
                "off_route_minimum_distance_meters_before_right_direction",
                self.off_route_minimum_distance_meters_before_right_direction,
            ),
            (
                "off_route_minimum_distance_meters_before_wrong_direction",
                self.off_route_minimum_distance_meters_before_wrong_direction,
            ),
            ("minimum_distance_off_route", self.minimum_distance_off_route),
            ("maximum_distance_off_route", self.maximum_distance_off_route),
        ];

        if let Some((name, value)) = thresholds
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(NavigationError::InvalidConfiguration(format!(
                "{name} must be a finite non-negative number, got {value}"
            )));
        }

        if self.minimum_distance_off_route > self.maximum_distance_off_route {
            return Err(NavigationError::InvalidConfiguration(format!(
                "minimum_distance_off_route ({}) is greater than maximum_distance_off_route ({})",
                self.minimum_distance_off_route, self.maximum_distance_off_route
            )));
        }

        Ok(())
    }
}

pub fn read_dhall_config(config_path: &str) -> Result<AppConfig, NavigationError> {
    let config = serde_dhall::from_file(config_path)
        .parse::<AppConfig>()
        .map_err(|err| {
            NavigationError::InvalidConfiguration(format!("Error reading config: {}", err))
        })?;

    config.navigation_options.validate()?;

    info!(tag = "[CONFIG_LOADED]", config_path, "Navigation options : {:?}", config.navigation_options);

    Ok(config)
}
