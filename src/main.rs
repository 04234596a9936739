use bevy::light::GlobalAmbientLight;
use bevy::picking::prelude::*;
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};

use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};

mod core;
mod flights;
mod ui;
mod visualization;

use flights::FlightsPlugin;
use ui::UiPlugin;
use visualization::{EarthPlugin, MarkersPlugin};

// ~3.5x the globe radius, matching the default framing of the whole Earth.
const INITIAL_CAMERA_DISTANCE: f32 = 700.0;

fn setup(mut commands: Commands) {
    // Keep the night side readable.
    commands.insert_resource(GlobalAmbientLight {
        brightness: 300.0,
        ..default()
    });

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            near: 1.0,
            far: 10_000.0,
            ..default()
        }),
        Camera {
            order: 0,
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        PanOrbitCamera {
            focus: Vec3::ZERO,
            radius: Some(INITIAL_CAMERA_DISTANCE),
            yaw: Some(0.0),
            pitch: Some(0.0),
            force_update: true,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, INITIAL_CAMERA_DISTANCE).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(500.0, 500.0, 500.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Live Flight Globe".to_string(),
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(PanOrbitCameraPlugin)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EarthPlugin)
        .add_plugins(FlightsPlugin)
        .add_plugins(MarkersPlugin)
        .add_plugins(UiPlugin)
        .add_systems(Startup, setup)
        .run();
}
