/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::{detection::OffRouteVerdict, types::*};
use serde::{Deserialize, Serialize};

/// What the navigation loop gets back for one location fix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    /// Raw fix when off-route, otherwise the output of the configured snap engine.
    pub location: LocationFix,
    pub verdict: OffRouteVerdict,
    /// Voice instruction that became due with this fix.
    pub voice_instruction: Option<VoiceInstruction>,
    /// Banner instruction that became due with this fix.
    pub banner_instruction: Option<BannerInstruction>,
    pub arrived: bool,
}
