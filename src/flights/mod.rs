//! Live flight state feed (OpenSky Network).

use bevy::prelude::*;

pub mod fetcher;
pub mod systems;
pub mod types;

pub use types::{FlightConfig, FlightData, FlightFeedState, FlightRecord};

pub struct FlightsPlugin;

impl Plugin for FlightsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FlightConfig>()
            .init_resource::<FlightFeedState>()
            .init_resource::<FlightData>()
            .add_systems(Startup, systems::setup_flight_worker)
            .add_systems(
                Update,
                (systems::poll_flight_states, systems::apply_flight_results).chain(),
            );
    }
}
