//! Aircraft marker lifecycle, click selection, and the highlight pulse.

use bevy::asset::LoadState;
use bevy::gltf::GltfAssetLabel;
use bevy::picking::Pickable;
use bevy::picking::events::{Click, Pointer};
use bevy::prelude::ChildOf;
use bevy::prelude::*;

use crate::core::coordinates::GeoPosition;
use crate::flights::{FlightData, FlightRecord};
use crate::ui::state::SelectedFlight;
use crate::visualization::earth::Earth;

const AIRCRAFT_MODEL_PATH: &str = "models/plane.glb";
const MARKER_SCALE: f32 = 5.0;
const GLOW_RADIUS: f32 = 4.0;

#[derive(Component, Clone)]
pub struct AircraftMarker {
    pub flight: FlightRecord,
}

/// Glow child mesh, shown only while its marker's aircraft is selected.
#[derive(Component)]
pub struct SelectionGlow;

/// Shared marker assets, created once at startup and cloned per marker.
#[derive(Resource)]
pub struct AircraftAssets {
    pub scene: Handle<Scene>,
    pub fallback_mesh: Handle<Mesh>,
    pub fallback_material: Handle<StandardMaterial>,
    pub glow_mesh: Handle<Mesh>,
    pub glow_material: Handle<StandardMaterial>,
}

pub struct MarkersPlugin;

impl Plugin for MarkersPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_aircraft_assets).add_systems(
            Update,
            (
                replace_aircraft_markers,
                handle_marker_clicks,
                sync_selection_glow,
                animate_selection_glow,
            )
                .chain(),
        );
    }
}

fn setup_aircraft_assets(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(AIRCRAFT_MODEL_PATH));

    // Stand-in for a missing or corrupt model file.
    let fallback_mesh = meshes.add(Cuboid::new(10.0, 5.0, 20.0));
    let fallback_material = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.0, 0.0),
        unlit: true,
        ..default()
    });

    let glow_mesh = meshes.add(Sphere::new(GLOW_RADIUS).mesh().ico(3).unwrap());
    let glow_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.0, 0.0, 1.0, 0.35),
        emissive: LinearRgba::new(0.0, 0.0, 0.8, 1.0),
        alpha_mode: AlphaMode::Add,
        unlit: true,
        ..default()
    });

    commands.insert_resource(AircraftAssets {
        scene,
        fallback_mesh,
        fallback_material,
        glow_mesh,
        glow_material,
    });
}

/// Full replace, never diff: every applied refresh despawns the previous
/// marker set and spawns one marker per accepted flight. Commands are
/// deferred, so the render side only ever sees the complete new set.
pub fn replace_aircraft_markers(
    data: Res<FlightData>,
    assets: Res<AircraftAssets>,
    asset_server: Res<AssetServer>,
    existing: Query<Entity, With<AircraftMarker>>,
    mut commands: Commands,
) {
    if !data.is_changed() {
        return;
    }

    for entity in existing.iter() {
        commands.entity(entity).despawn_children();
        commands.entity(entity).despawn();
    }

    let model_failed = matches!(
        asset_server.get_load_state(assets.scene.id()),
        Some(LoadState::Failed(_))
    );

    let accepted = accepted_flights(&data.flights);
    let skipped = data.flights.len() - accepted.len();
    if skipped > 0 {
        warn!("Skipped {skipped} aircraft with out-of-range coordinates");
    }

    for (geo, flight) in accepted {
        let marker = commands
            .spawn((
                marker_transform(&geo, flight.altitude, flight.heading),
                Visibility::Visible,
                AircraftMarker {
                    flight: flight.clone(),
                },
                Name::new(format!("Aircraft {}", flight.callsign)),
            ))
            .id();

        commands.entity(marker).with_children(|parent| {
            if model_failed {
                parent.spawn((
                    Mesh3d(assets.fallback_mesh.clone()),
                    MeshMaterial3d(assets.fallback_material.clone()),
                    Transform::default(),
                    Pickable::default(),
                ));
            } else {
                parent.spawn((SceneRoot(assets.scene.clone()), Transform::default()));
            }
            parent.spawn((
                Mesh3d(assets.glow_mesh.clone()),
                MeshMaterial3d(assets.glow_material.clone()),
                Transform::default(),
                Visibility::Hidden,
                Pickable::IGNORE,
                SelectionGlow,
            ));
        });
    }
}

/// Drops records whose coordinates fall outside the valid ranges, pairing
/// the survivors with their validated positions.
pub(crate) fn accepted_flights(flights: &[FlightRecord]) -> Vec<(GeoPosition, &FlightRecord)> {
    flights
        .iter()
        .filter_map(|flight| {
            GeoPosition::from_degrees(flight.latitude, flight.longitude)
                .ok()
                .map(|geo| (geo, flight))
        })
        .collect()
}

/// Places a marker on the globe, spun about the world vertical axis by the
/// negated heading, at a fixed uniform scale.
pub(crate) fn marker_transform(geo: &GeoPosition, altitude_m: f64, heading_deg: f32) -> Transform {
    Transform::from_translation(geo.to_render_position(altitude_m))
        .with_rotation(Quat::from_rotation_y(-heading_deg.to_radians()))
        .with_scale(Vec3::splat(MARKER_SCALE))
}

/// Routes pointer clicks: a marker (or any of its scene descendants)
/// toggles the selection, the bare globe clears it, anything else is left
/// alone. Clicks into empty space hit no entity and produce no event.
pub fn handle_marker_clicks(
    mut click_events: MessageReader<Pointer<Click>>,
    markers: Query<&AircraftMarker>,
    globes: Query<(), With<Earth>>,
    parents: Query<&ChildOf>,
    mut selected: ResMut<SelectedFlight>,
) {
    for ev in click_events.read() {
        let mut entity = ev.entity;
        let marker = loop {
            if let Ok(marker) = markers.get(entity) {
                break Some(marker);
            }
            if let Ok(parent) = parents.get(entity) {
                entity = parent.parent();
                continue;
            }
            break None;
        };

        if let Some(marker) = marker {
            selected.toggle(&marker.flight);
        } else if globes.contains(entity) {
            selected.clear();
        }
    }
}

pub fn sync_selection_glow(
    selected: Res<SelectedFlight>,
    markers: Query<(&AircraftMarker, &Children)>,
    mut glows: Query<&mut Visibility, With<SelectionGlow>>,
) {
    for (marker, children) in markers.iter() {
        let on = selected
            .0
            .as_ref()
            .is_some_and(|f| f.icao24 == marker.flight.icao24);
        for child in children.iter() {
            if let Ok(mut visibility) = glows.get_mut(child) {
                *visibility = if on {
                    Visibility::Visible
                } else {
                    Visibility::Hidden
                };
            }
        }
    }
}

/// Breathes the highlight every frame. The glow material is shared, but
/// only the selected marker's glow is visible, so the pulse reads as
/// belonging to the selection.
pub fn animate_selection_glow(
    time: Res<Time>,
    assets: Res<AircraftAssets>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut glows: Query<&mut Transform, With<SelectionGlow>>,
) {
    let pulse = pulse_intensity(time.elapsed_secs());
    if let Some(material) = materials.get_mut(&assets.glow_material) {
        material.emissive = LinearRgba::new(0.0, 0.1, 1.0, 1.0) * pulse;
    }
    for mut transform in glows.iter_mut() {
        transform.scale = Vec3::splat(1.0 + 0.1 * pulse);
    }
}

/// Oscillating highlight intensity as a function of elapsed seconds.
pub(crate) fn pulse_intensity(elapsed_secs: f32) -> f32 {
    (elapsed_secs * 5.0).sin() * 0.5 + 0.8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coordinates::{ALTITUDE_SCALE_M, GLOBE_RADIUS};

    fn record(icao24: &str, latitude: f64, longitude: f64) -> FlightRecord {
        FlightRecord {
            icao24: icao24.to_string(),
            callsign: "TEST01".to_string(),
            latitude,
            longitude,
            altitude: 10_000.0,
            velocity: 240.0,
            heading: 90.0,
            vertical_rate: 0.0,
            country: "Unknown".to_string(),
        }
    }

    #[test]
    fn accepted_flights_one_marker_per_valid_record() {
        let flights = vec![
            record("a", 47.0, 8.0),
            record("b", -33.9, 151.2),
            record("c", 41.9, -87.9),
            record("d", 35.7, 139.7),
            record("e", 51.5, -0.1),
        ];
        assert_eq!(accepted_flights(&flights).len(), 5);
    }

    #[test]
    fn accepted_flights_rejects_out_of_range_coordinates() {
        let flights = vec![
            record("a", 47.0, 8.0),
            record("bad-lat", 95.0, 8.0),
            record("bad-lon", 47.0, 191.0),
        ];
        let accepted = accepted_flights(&flights);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].1.icao24, "a");
    }

    #[test]
    fn marker_transform_sits_at_projected_radius() {
        let geo = GeoPosition::from_degrees(47.0, 8.0).unwrap();
        let transform = marker_transform(&geo, 10_000.0, 90.0);
        let expected = GLOBE_RADIUS + 10_000.0 / ALTITUDE_SCALE_M;
        assert!((transform.translation.length() - expected).abs() < 1e-3);
        assert_eq!(transform.scale, Vec3::splat(MARKER_SCALE));
    }

    #[test]
    fn marker_transform_zero_heading_is_unrotated() {
        let geo = GeoPosition::from_degrees(0.0, 0.0).unwrap();
        let transform = marker_transform(&geo, 0.0, 0.0);
        assert!(transform.rotation.angle_between(Quat::IDENTITY) < 1e-6);
    }

    #[test]
    fn marker_transform_heading_spins_clockwise() {
        let geo = GeoPosition::from_degrees(0.0, 0.0).unwrap();
        let transform = marker_transform(&geo, 0.0, 90.0);
        // -90 degrees about y sends +z to -x.
        let nose = transform.rotation * Vec3::Z;
        assert!((nose - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn pulse_intensity_oscillates_in_band() {
        assert!((pulse_intensity(0.0) - 0.8).abs() < 1e-6);
        for step in 0..100 {
            let value = pulse_intensity(step as f32 * 0.1);
            assert!((0.3..=1.3).contains(&value), "{value} out of band");
        }
    }
}
