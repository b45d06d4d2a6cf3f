/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    error_message: String,
    pub error_code: String,
}

#[macros::add_error]
pub enum NavigationError {
    EmptyBuffer,
    DegenerateGeometry(usize),
    InvalidPolyline(String),
    InvalidRouteProgress(String),
    InvalidConfiguration(String),
}

impl NavigationError {
    pub fn error_body(&self) -> ErrorBody {
        ErrorBody {
            error_message: self.message(),
            error_code: self.code(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            NavigationError::EmptyBuffer => "Ring buffer is empty".to_string(),
            NavigationError::DegenerateGeometry(points) => {
                format!("Polyline needs at least 2 points, found {points}")
            }
            NavigationError::InvalidPolyline(err) => format!("Invalid encoded polyline : {err}"),
            NavigationError::InvalidRouteProgress(err) => {
                format!("Invalid route progress : {err}")
            }
            NavigationError::InvalidConfiguration(err) => err.to_string(),
        }
    }

    pub fn code(&self) -> String {
        match self {
            NavigationError::EmptyBuffer => "EMPTY_BUFFER",
            NavigationError::DegenerateGeometry(_) => "DEGENERATE_GEOMETRY",
            NavigationError::InvalidPolyline(_) => "INVALID_POLYLINE",
            NavigationError::InvalidRouteProgress(_) => "INVALID_ROUTE_PROGRESS",
            NavigationError::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
        }
        .to_string()
    }
}
