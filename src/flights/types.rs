//! Flight feed data types and resources.

use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::sync::{
    Arc, Mutex,
    mpsc::{Receiver, Sender},
};
use std::time::{Duration, Instant};

/// One aircraft state vector, snapshotted per refresh cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct FlightRecord {
    /// ICAO 24-bit transponder address, unique per airframe.
    pub icao24: String,
    /// Callsign with surrounding whitespace trimmed.
    pub callsign: String,
    /// Degrees, in [-90, 90].
    pub latitude: f64,
    /// Degrees, in [-180, 180].
    pub longitude: f64,
    /// Geometric altitude in meters.
    pub altitude: f64,
    /// Ground velocity in m/s.
    pub velocity: f64,
    /// True track in degrees clockwise from north.
    pub heading: f32,
    /// Vertical rate in m/s, positive climbing.
    pub vertical_rate: f64,
    pub country: String,
}

#[derive(Resource, Clone, Debug)]
pub struct FlightConfig {
    pub states_url: String,
    pub refresh_interval: Duration,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            states_url: "https://opensky-network.org/api/states/all".to_string(),
            refresh_interval: Duration::from_secs(30),
        }
    }
}

/// Refresh bookkeeping for the flight feed.
///
/// `is_loading` serializes refresh cycles: while a fetch is in flight the
/// poll system skips its tick instead of queueing another request.
#[derive(Resource)]
pub struct FlightFeedState {
    pub last_request: Instant,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for FlightFeedState {
    fn default() -> Self {
        Self {
            // Backdate so the first poll fires immediately.
            last_request: Instant::now() - Duration::from_secs(3600),
            is_loading: false,
            error: None,
        }
    }
}

/// The most recent successfully fetched flight set.
#[derive(Resource, Default, Debug)]
pub struct FlightData {
    pub flights: Vec<FlightRecord>,
    pub updated_utc: Option<DateTime<Utc>>,
}

pub enum FlightCommand {
    FetchStates { url: String },
}

pub enum FlightResult {
    States(Vec<FlightRecord>),
    Error { message: String },
}

#[derive(Resource)]
pub struct FlightChannels {
    pub cmd_tx: Sender<FlightCommand>,
    pub res_rx: Arc<Mutex<Receiver<FlightResult>>>,
}
