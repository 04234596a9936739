//! HUD overlay and selection state.

use bevy::prelude::*;

pub mod hud;
pub mod state;

pub use state::SelectedFlight;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectedFlight>()
            .add_systems(Startup, hud::setup_hud)
            .add_systems(
                Update,
                (
                    hud::update_status_readout,
                    hud::update_flight_info_panel,
                    hud::handle_zoom_buttons,
                ),
            );
    }
}
