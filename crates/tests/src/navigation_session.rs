/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use chrono::{Duration, TimeZone, Utc};
use navigation_progress::common::{
    detection::OffRouteVerdict,
    route_progress::RouteProgress,
    types::*,
    utils::{find_closest_point_on_route, line_length, line_slice},
};
use navigation_progress::domain::action::navigation::NavigationSession;
use navigation_progress::domain::types::navigation::LocationUpdate;
use navigation_progress::environment::{read_dhall_config, NavigationOptions};
use serde_json::json;

fn point(lat: f64, lon: f64) -> serde_json::Value {
    json!({ "lat": lat, "lon": lon })
}

/// North for about a kilometer, right turn, east for about a kilometer, arrive.
fn l_shaped_route() -> anyhow::Result<Route> {
    let route = json!({
        "distance": 2001.5,
        "legs": [{
            "distance": 2001.5,
            "steps": [
                {
                    "name": "Depart Road",
                    "distance": 1000.75,
                    "geometry": [point(0.0, 0.0), point(0.0045, 0.0), point(0.009, 0.0)],
                    "maneuver": { "location": point(0.009, 0.0), "type": "depart", "modifier": null },
                    "voiceInstructions": [
                        {
                            "distanceAlongGeometry": 500.0,
                            "announcement": "In 500 meters, turn right",
                            "ssmlAnnouncement": "<speak>In 500 meters, turn right</speak>"
                        },
                        {
                            "distanceAlongGeometry": 100.0,
                            "announcement": "Turn right",
                            "ssmlAnnouncement": "<speak>Turn right</speak>"
                        }
                    ],
                    "bannerInstructions": [{
                        "distanceAlongGeometry": 1000.0,
                        "primary": { "text": "Turn Street", "type": "turn", "modifier": "right" },
                        "secondary": null,
                        "sub": null
                    }]
                },
                {
                    "name": "Turn Street",
                    "distance": 1000.75,
                    "geometry": [point(0.009, 0.0), point(0.009, 0.0045), point(0.009, 0.009)],
                    "maneuver": { "location": point(0.009, 0.009), "type": "turn", "modifier": "right" },
                    "voiceInstructions": [],
                    "bannerInstructions": [{
                        "distanceAlongGeometry": 200.0,
                        "primary": { "text": "You will arrive", "type": "arrive", "modifier": null },
                        "secondary": { "text": "Destination", "type": null, "modifier": null },
                        "sub": null
                    }]
                },
                {
                    "name": "Destination",
                    "distance": 0.0,
                    "geometry": [point(0.009, 0.009), point(0.009, 0.009)],
                    "maneuver": { "location": point(0.009, 0.009), "type": "arrive", "modifier": null }
                }
            ]
        }]
    });

    Ok(serde_json::from_value(route)?)
}

fn fix(lat: f64, lon: f64, seconds: i64) -> LocationFix {
    LocationFix {
        provider: "fused".to_string(),
        point: Point::new(lat, lon),
        bearing: None,
        accuracy: Accuracy(4.0),
        timestamp: TimeStamp(
            Utc.with_ymd_and_hms(2023, 9, 1, 8, 0, 0).unwrap() + Duration::seconds(seconds),
        ),
    }
}

/// Progress the way a navigation loop would derive it: remaining step distance measured from
/// the fix projection to the maneuver.
fn progress_for<'a>(
    route: &'a Route,
    step_index: usize,
    location: &LocationFix,
) -> anyhow::Result<RouteProgress<'a>> {
    let leg = &route.legs[0];
    let step_points = &leg.steps[step_index].geometry;
    let maneuver = step_points.last().copied().unwrap_or(location.point);
    let step_distance_remaining =
        line_length(&line_slice(&location.point, &maneuver, step_points)?);
    let later_steps: f64 = leg.steps[step_index + 1..]
        .iter()
        .map(|step| line_length(&step.geometry))
        .sum();

    Ok(RouteProgress::new(
        route,
        0,
        step_index,
        step_distance_remaining,
        step_distance_remaining + later_steps,
        step_distance_remaining + later_steps,
    )?)
}

/// Feeds fixes through a session, advancing the step whenever the maneuver is reached or the
/// detector asks for it.
fn drive(
    session: &mut NavigationSession,
    route: &Route,
    fixes: &[LocationFix],
) -> anyhow::Result<Vec<LocationUpdate>> {
    let last_step_index = route.legs[0].steps.len() - 1;
    let mut step_index = 0;
    let mut updates = Vec::with_capacity(fixes.len());

    for location in fixes {
        let progress = progress_for(route, step_index, location)?;
        let update = session.process_location(location, &progress);

        if (update.verdict.should_increase_step_index() || progress.step_distance_remaining() < 1.0)
            && step_index < last_step_index
        {
            step_index += 1;
        }
        updates.push(update);
    }

    Ok(updates)
}

fn along_route_fixes() -> Vec<LocationFix> {
    let north = (0..=9).map(|i| (i as f64 * 0.001, 0.0));
    let east = (1..=9).map(|i| (0.009, i as f64 * 0.001));
    north
        .chain(east)
        .enumerate()
        .map(|(second, (lat, lon))| fix(lat, lon, second as i64 * 8))
        .collect()
}

#[test]
fn driving_the_route_stays_on_route_and_fires_milestones() -> anyhow::Result<()> {
    let route = l_shaped_route()?;
    let mut session = NavigationSession::new(NavigationOptions::default())?;

    let fixes = along_route_fixes();
    let updates = drive(&mut session, &route, &fixes)?;

    let (destination, on_the_way) = updates
        .split_last()
        .ok_or_else(|| anyhow::anyhow!("no updates"))?;
    assert!(on_the_way
        .iter()
        .all(|update| update.verdict == OffRouteVerdict::OnRoute));

    // nothing left to travel at the destination, the raw fix is reported as is
    assert_eq!(destination.verdict, OffRouteVerdict::OffRoute);
    assert_eq!(fixes.last(), Some(&destination.location));

    let announcements = updates
        .iter()
        .filter_map(|update| update.voice_instruction.as_ref())
        .map(|instruction| instruction.announcement.as_str())
        .collect::<Vec<_>>();
    assert_eq!(announcements, vec!["In 500 meters, turn right", "Turn right"]);

    let arrivals = updates
        .iter()
        .enumerate()
        .filter(|(_, update)| update.arrived)
        .map(|(index, _)| index)
        .collect::<Vec<_>>();
    assert_eq!(arrivals, vec![17]);

    Ok(())
}

#[test]
fn snapped_locations_stay_on_the_route() -> anyhow::Result<()> {
    let route = l_shaped_route()?;
    let geometry = route.legs[0].geometry();
    let mut session = NavigationSession::new(NavigationOptions::default())?;

    let noisy_fixes = along_route_fixes()
        .into_iter()
        .enumerate()
        .map(|(index, mut location)| {
            let jitter = if index % 2 == 0 { 0.00008 } else { -0.00008 };
            if location.point.lon.inner() == 0.0 {
                location.point.lon = Longitude(jitter);
            } else {
                location.point.lat = Latitude(0.009 + jitter);
            }
            location
        })
        .collect::<Vec<_>>();

    let updates = drive(&mut session, &route, &noisy_fixes)?;

    let (destination, on_the_way) = updates
        .split_last()
        .ok_or_else(|| anyhow::anyhow!("no updates"))?;
    assert_eq!(destination.verdict, OffRouteVerdict::OffRoute);
    assert_eq!(noisy_fixes.last(), Some(&destination.location));

    for update in on_the_way {
        assert_eq!(update.verdict, OffRouteVerdict::OnRoute);
        let projection = find_closest_point_on_route(&update.location.point, &geometry)
            .ok_or_else(|| anyhow::anyhow!("route has no geometry"))?;
        assert!(projection.projection_point_to_point_distance < 0.5);
        assert_eq!(update.location.provider, "fused");
    }

    Ok(())
}

#[test]
fn detour_is_reported_and_reroute_resets_the_session() -> anyhow::Result<()> {
    let route = l_shaped_route()?;
    let mut session = NavigationSession::new(NavigationOptions::default())?;
    let detour = fix(0.002, 0.002, 24);

    let updates = drive(
        &mut session,
        &route,
        &[fix(0.0, 0.0, 0), fix(0.001, 0.0, 8), fix(0.002, 0.0, 16), detour.clone()],
    )?;

    let verdicts = updates.iter().map(|update| update.verdict).collect::<Vec<_>>();
    assert_eq!(
        verdicts,
        vec![
            OffRouteVerdict::OnRoute,
            OffRouteVerdict::OnRoute,
            OffRouteVerdict::OnRoute,
            OffRouteVerdict::OffRoute
        ]
    );
    assert_eq!(updates[3].location, detour);
    assert_eq!(
        session.off_route_detector().last_reroute_point(),
        Some(&detour.point)
    );

    // new route from the detour point straight north to the destination latitude
    let mut rerouted = route.clone();
    rerouted.legs[0].steps[0].geometry =
        vec![Point::new(0.002, 0.002), Point::new(0.009, 0.002)];
    rerouted.legs[0].steps[1].geometry =
        vec![Point::new(0.009, 0.002), Point::new(0.009, 0.009)];
    session.reset_for_new_route();

    let updates = drive(
        &mut session,
        &rerouted,
        &[fix(0.0021, 0.002, 32), fix(0.005, 0.002, 40), fix(0.006, 0.002, 48)],
    )?;

    assert!(updates
        .iter()
        .all(|update| update.verdict == OffRouteVerdict::OnRoute));
    assert!(updates[1]
        .voice_instruction
        .as_ref()
        .is_some_and(|instruction| instruction.announcement == "In 500 meters, turn right"));

    Ok(())
}

#[test]
fn session_from_dev_config() -> anyhow::Result<()> {
    let config = read_dhall_config(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../dhall-configs/dev/navigation_progress.dhall"
    ))?;
    let route = l_shaped_route()?;
    let mut session = NavigationSession::new(config.navigation_options.clone())?;

    let location = fix(0.0005, 0.0001, 0);
    let update = session.process_location(&location, &progress_for(&route, 0, &location)?);

    assert_eq!(session.options(), &config.navigation_options);
    assert_eq!(update.verdict, OffRouteVerdict::OnRoute);

    Ok(())
}

#[test]
fn location_update_serializes_for_the_navigation_loop() -> anyhow::Result<()> {
    use navigation_progress::tools::logger::{setup_tracing, LoggerConfig};

    let _guard = setup_tracing(LoggerConfig::default());
    let route = l_shaped_route()?;
    let mut session = NavigationSession::new(NavigationOptions::default())?;

    let location = fix(0.0005, 0.0001, 0);
    let update = session.process_location(&location, &progress_for(&route, 0, &location)?);
    let value = serde_json::to_value(&update)?;

    assert_eq!(value["verdict"], json!("OnRoute"));
    assert_eq!(value["arrived"], json!(false));
    assert_eq!(value["location"]["provider"], json!("fused"));
    assert!(value["voiceInstruction"].is_null());

    Ok(())
}
