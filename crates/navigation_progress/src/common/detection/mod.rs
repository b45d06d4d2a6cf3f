/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use serde::{Deserialize, Serialize};

mod off_route;

pub use off_route::OffRouteDetector;

/// Outcome of one off-route evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub enum OffRouteVerdict {
    OnRoute,
    OffRoute,
    /// Outside the current step but already inside the upcoming maneuver zone, the caller should
    /// move on to the next step instead of rerouting.
    AdvanceStepAndOnRoute,
}

impl OffRouteVerdict {
    pub fn is_off_route(&self) -> bool {
        matches!(self, OffRouteVerdict::OffRoute)
    }

    pub fn should_increase_step_index(&self) -> bool {
        matches!(self, OffRouteVerdict::AdvanceStepAndOnRoute)
    }
}
