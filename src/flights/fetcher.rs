//! OpenSky state-vector fetcher worker.

use crate::flights::types::{FlightChannels, FlightCommand, FlightRecord, FlightResult};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::sync::{
    Arc, Mutex,
    mpsc::{self},
};
use std::thread;

// Fixed positions inside an OpenSky state vector.
const IDX_ICAO24: usize = 0;
const IDX_CALLSIGN: usize = 1;
const IDX_COUNTRY: usize = 2;
const IDX_LONGITUDE: usize = 5;
const IDX_LATITUDE: usize = 6;
const IDX_ALTITUDE: usize = 7;
const IDX_VELOCITY: usize = 9;
const IDX_HEADING: usize = 10;
const IDX_VERTICAL_RATE: usize = 11;

#[derive(Deserialize)]
struct StatesResponse {
    // "states" is null (not an empty array) when no aircraft are reported.
    #[serde(default)]
    states: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
}

pub fn start_flight_worker() -> FlightChannels {
    let (cmd_tx, cmd_rx) = mpsc::channel::<FlightCommand>();
    let (res_tx, res_rx) = mpsc::channel::<FlightResult>();

    thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
        rt.block_on(async move {
            let client = reqwest::Client::new();

            while let Ok(cmd) = cmd_rx.recv() {
                let FlightCommand::FetchStates { url } = cmd;
                let msg = match fetch_states(&client, &url).await {
                    Ok(flights) => FlightResult::States(flights),
                    Err(err) => {
                        eprintln!("[FLIGHTS] fetch failed: {err:#}");
                        FlightResult::Error {
                            message: err.to_string(),
                        }
                    }
                };
                let _ = res_tx.send(msg);
            }
        });
    });

    FlightChannels {
        cmd_tx,
        res_rx: Arc::new(Mutex::new(res_rx)),
    }
}

async fn fetch_states(client: &reqwest::Client, url: &str) -> Result<Vec<FlightRecord>> {
    let resp = client.get(url).send().await.context("request failed")?;
    let status = resp.status();
    let body = resp.text().await.context("read response")?;
    if !status.is_success() {
        match api_error_message(&body) {
            Some(message) => anyhow::bail!("{}", message),
            None => anyhow::bail!("HTTP {} for {}", status, url),
        }
    }
    parse_states(&body)
}

/// Error bodies carry a "message" field when the API rejects a request.
fn api_error_message(body: &str) -> Option<String> {
    let err: ApiError = serde_json::from_str(body).ok()?;
    err.message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

pub(crate) fn parse_states(body: &str) -> Result<Vec<FlightRecord>> {
    let response: StatesResponse = serde_json::from_str(body).context("invalid json")?;
    let Some(states) = response.states else {
        return Ok(Vec::new());
    };

    let mut flights = Vec::with_capacity(states.len());
    for state in &states {
        if let Some(flight) = parse_state(state) {
            flights.push(flight);
        }
    }
    Ok(flights)
}

/// A state is unusable without position, altitude and callsign; everything
/// else falls back to a default.
fn parse_state(state: &Value) -> Option<FlightRecord> {
    let fields = state.as_array()?;

    let longitude = get_f64(fields, IDX_LONGITUDE)?;
    let latitude = get_f64(fields, IDX_LATITUDE)?;
    let altitude = get_f64(fields, IDX_ALTITUDE)?;
    let callsign = get_str(fields, IDX_CALLSIGN).filter(|s| !s.is_empty())?;

    Some(FlightRecord {
        icao24: get_str(fields, IDX_ICAO24).unwrap_or_default().to_string(),
        callsign: callsign.trim().to_string(),
        latitude,
        longitude,
        altitude,
        velocity: get_f64(fields, IDX_VELOCITY).unwrap_or(0.0),
        heading: get_f64(fields, IDX_HEADING).unwrap_or(0.0) as f32,
        vertical_rate: get_f64(fields, IDX_VERTICAL_RATE).unwrap_or(0.0),
        country: get_str(fields, IDX_COUNTRY)
            .filter(|s| !s.is_empty())
            .unwrap_or("Unknown")
            .to_string(),
    })
}

fn get_f64(fields: &[Value], idx: usize) -> Option<f64> {
    fields.get(idx)?.as_f64()
}

fn get_str(fields: &[Value], idx: usize) -> Option<&str> {
    fields.get(idx)?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn parse_states_keeps_well_formed_records() {
        let body = r#"{
            "time": 1722697573,
            "states": [
                ["4b1816", "SWR193H ", "Switzerland", 1722697572, 1722697573,
                 8.5492, 47.4612, 11582.4, false, 245.87, 316.43, 0.0,
                 null, 11887.2, "1021", false, 0]
            ]
        }"#;
        let flights = parse_states(body).unwrap();
        assert_eq!(flights.len(), 1);
        let flight = &flights[0];
        assert_eq!(flight.icao24, "4b1816");
        assert_eq!(flight.callsign, "SWR193H");
        assert_eq!(flight.country, "Switzerland");
        assert!((flight.latitude - 47.4612).abs() < 1e-9);
        assert!((flight.longitude - 8.5492).abs() < 1e-9);
        assert!((flight.altitude - 11582.4).abs() < 1e-9);
        assert!((flight.velocity - 245.87).abs() < 1e-9);
        assert!((flight.heading - 316.43).abs() < 1e-4);
    }

    #[test]
    fn parse_states_excludes_record_missing_latitude() {
        let body = r#"{
            "states": [
                ["3c6675", "DLH9CK", "Germany", null, null,
                 13.2878, null, 10668.0, false, 233.0, 270.5, 0.0,
                 null, 10972.8, "1000", false, 0],
                ["4b1816", "SWR193H", "Switzerland", null, null,
                 8.5492, 47.4612, 11582.4, false, 245.87, 316.43, 0.0,
                 null, 11887.2, "1021", false, 0]
            ]
        }"#;
        let flights = parse_states(body).unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].icao24, "4b1816");
    }

    #[test]
    fn parse_states_excludes_record_missing_callsign() {
        let body = r#"{
            "states": [
                ["7c6b2d", null, "Australia", null, null,
                 151.1772, -33.9461, 304.8, false, 77.2, 165.0, 5.2,
                 null, 396.2, "3020", false, 0],
                ["7c6b2e", "", "Australia", null, null,
                 151.1772, -33.9461, 304.8, false, 77.2, 165.0, 5.2,
                 null, 396.2, "3020", false, 0]
            ]
        }"#;
        assert!(parse_states(body).unwrap().is_empty());
    }

    #[test]
    fn parse_states_applies_defaults() {
        let body = r#"{
            "states": [
                ["ab12cd", " TEST01 ", null, null, null,
                 -0.1278, 51.5074, 0.0, false, null, null, null,
                 null, null, null, false, 0]
            ]
        }"#;
        let flights = parse_states(body).unwrap();
        assert_eq!(flights.len(), 1);
        let flight = &flights[0];
        assert_eq!(flight.callsign, "TEST01");
        assert_eq!(flight.country, "Unknown");
        assert_eq!(flight.velocity, 0.0);
        assert_eq!(flight.heading, 0.0);
        assert_eq!(flight.vertical_rate, 0.0);
    }

    #[test]
    fn parse_states_null_states_is_empty() {
        let flights = parse_states(r#"{"time": 1722697573, "states": null}"#).unwrap();
        assert!(flights.is_empty());
    }

    #[test]
    fn parse_states_rejects_invalid_json() {
        assert!(parse_states("not json").is_err());
    }

    #[test]
    fn api_error_message_extraction() {
        let msg = api_error_message(r#"{"message": "rate limit exceeded"}"#);
        assert_eq!(msg.as_deref(), Some("rate limit exceeded"));
        assert!(api_error_message(r#"{"message": ""}"#).is_none());
        assert!(api_error_message(r#"{"other": 1}"#).is_none());
        assert!(api_error_message("<html>502</html>").is_none());
    }

    #[test]
    fn parse_states_fixture_file() {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("tests");
        path.push("opensky_states.json");
        let body = fs::read_to_string(path).expect("read opensky fixture");
        let flights = parse_states(&body).unwrap();
        // Two of the five fixture states survive the null filter.
        assert_eq!(flights.len(), 2);
        assert_eq!(flights[0].callsign, "SWR193H");
        assert_eq!(flights[1].callsign, "UAL1452");
    }
}
