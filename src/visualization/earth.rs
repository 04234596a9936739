//! Globe rendering: textured sphere, cloud shell, slow spin.

use bevy::mesh::{SphereKind, SphereMeshBuilder};
use bevy::picking::Pickable;
use bevy::prelude::*;

use crate::core::coordinates::GLOBE_RADIUS;

/// Radial gap between the globe surface and the cloud shell.
const CLOUD_SHELL_OFFSET: f32 = 0.15;

pub struct EarthPlugin;

impl Plugin for EarthPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GlobeConfig>()
            .add_systems(Startup, spawn_globe)
            .add_systems(Update, spin_globe);
    }
}

#[derive(Resource, Clone, Debug)]
pub struct GlobeConfig {
    pub spin_rad_per_sec: f32,
    pub cloud_spin_rad_per_sec: f32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            spin_rad_per_sec: 0.01,
            cloud_spin_rad_per_sec: 0.02,
        }
    }
}

#[derive(Component)]
pub struct Earth;

#[derive(Component)]
pub struct CloudLayer;

fn spawn_globe(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
) {
    let sphere = |radius: f32| {
        SphereMeshBuilder::new(
            radius,
            SphereKind::Uv {
                sectors: 64,
                stacks: 64,
            },
        )
    };

    commands.spawn((
        Mesh3d(meshes.add(sphere(GLOBE_RADIUS))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            base_color_texture: Some(asset_server.load("textures/earth_daymap.jpg")),
            metallic_roughness_texture: Some(asset_server.load("textures/earth_specular.png")),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(0.0, 0.0, 0.0),
        Earth,
        Name::new("Earth"),
    ));

    // The cloud shell must not swallow picks meant for the surface below it.
    commands.spawn((
        Mesh3d(meshes.add(sphere(GLOBE_RADIUS + CLOUD_SHELL_OFFSET))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, 0.6),
            base_color_texture: Some(asset_server.load("textures/earth_clouds.png")),
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
        Transform::from_xyz(0.0, 0.0, 0.0),
        CloudLayer,
        Pickable::IGNORE,
        Name::new("Clouds"),
    ));
}

fn spin_globe(
    time: Res<Time>,
    config: Res<GlobeConfig>,
    mut earths: Query<&mut Transform, (With<Earth>, Without<CloudLayer>)>,
    mut clouds: Query<&mut Transform, (With<CloudLayer>, Without<Earth>)>,
) {
    let delta = time.delta_secs();
    for mut transform in earths.iter_mut() {
        transform.rotate_y(config.spin_rad_per_sec * delta);
    }
    for mut transform in clouds.iter_mut() {
        transform.rotate_y(config.cloud_spin_rad_per_sec * delta);
    }
}
