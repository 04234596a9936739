//! Flight feed systems (polling + apply).

use crate::flights::fetcher::start_flight_worker;
use crate::flights::types::{
    FlightChannels, FlightCommand, FlightConfig, FlightData, FlightFeedState, FlightResult,
};
use crate::ui::state::SelectedFlight;
use bevy::prelude::*;
use chrono::Utc;
use std::time::Instant;

pub fn setup_flight_worker(mut commands: Commands) {
    let channels = start_flight_worker();
    println!("[INIT] Flight state worker started");
    commands.insert_resource(channels);
}

/// Queues one fetch per refresh interval. Ticks that land while a previous
/// cycle is still in flight are dropped, not queued.
pub fn poll_flight_states(
    config: Res<FlightConfig>,
    mut state: ResMut<FlightFeedState>,
    channels: Option<Res<FlightChannels>>,
) {
    let Some(channels) = channels else { return };
    if state.is_loading {
        return;
    }

    let now = Instant::now();
    if now.duration_since(state.last_request) < config.refresh_interval {
        return;
    }
    state.last_request = now;

    let url = config.states_url.clone();
    if channels
        .cmd_tx
        .send(FlightCommand::FetchStates { url })
        .is_ok()
    {
        state.is_loading = true;
    } else {
        state.error = Some("flight worker unavailable".to_string());
    }
}

/// Drains worker results into the ECS.
///
/// A successful fetch replaces the flight set wholesale and invalidates a
/// selection whose aircraft disappeared. A failed fetch only records the
/// diagnostic; the previous flight set (and its markers) stay on screen.
pub fn apply_flight_results(
    mut data: ResMut<FlightData>,
    mut state: ResMut<FlightFeedState>,
    mut selected: ResMut<SelectedFlight>,
    channels: Option<Res<FlightChannels>>,
) {
    let Some(channels) = channels else { return };
    let Ok(guard) = channels.res_rx.lock() else {
        return;
    };

    while let Ok(msg) = guard.try_recv() {
        match msg {
            FlightResult::States(flights) => {
                state.is_loading = false;
                state.error = None;
                selected.retain_if_present(&flights);
                info!("Applied flight refresh: {} aircraft", flights.len());
                data.flights = flights;
                data.updated_utc = Some(Utc::now());
            }
            FlightResult::Error { message } => {
                state.is_loading = false;
                warn!("Flight refresh failed: {message}");
                state.error = Some(message);
            }
        }
    }
}
