//! Selection state.

use crate::flights::FlightRecord;
use bevy::prelude::*;

/// The aircraft currently highlighted and detailed in the HUD, if any.
///
/// At most one aircraft is selected, and a non-empty selection always names
/// an `icao24` present in the latest successful fetch.
#[derive(Resource, Default)]
pub struct SelectedFlight(pub Option<FlightRecord>);

impl SelectedFlight {
    /// Click semantics: clicking the selected aircraft toggles it off,
    /// clicking any other replaces the selection.
    pub fn toggle(&mut self, flight: &FlightRecord) {
        match &self.0 {
            Some(current) if current.icao24 == flight.icao24 => self.0 = None,
            _ => self.0 = Some(flight.clone()),
        }
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Drops the selection when its aircraft is absent from `flights`.
    pub fn retain_if_present(&mut self, flights: &[FlightRecord]) {
        if let Some(current) = &self.0 {
            if !flights.iter().any(|f| f.icao24 == current.icao24) {
                self.0 = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(icao24: &str) -> FlightRecord {
        FlightRecord {
            icao24: icao24.to_string(),
            callsign: "TEST01".to_string(),
            latitude: 47.0,
            longitude: 8.0,
            altitude: 10_000.0,
            velocity: 240.0,
            heading: 90.0,
            vertical_rate: 0.0,
            country: "Switzerland".to_string(),
        }
    }

    #[test]
    fn toggle_same_aircraft_twice_clears() {
        let mut selected = SelectedFlight::default();
        let flight = record("4b1816");
        selected.toggle(&flight);
        assert_eq!(selected.0.as_ref().map(|f| f.icao24.as_str()), Some("4b1816"));
        selected.toggle(&flight);
        assert!(selected.0.is_none());
    }

    #[test]
    fn toggle_other_aircraft_replaces() {
        let mut selected = SelectedFlight::default();
        selected.toggle(&record("4b1816"));
        selected.toggle(&record("a835af"));
        assert_eq!(selected.0.as_ref().map(|f| f.icao24.as_str()), Some("a835af"));
    }

    #[test]
    fn selection_cleared_when_aircraft_disappears() {
        let mut selected = SelectedFlight::default();
        selected.toggle(&record("4b1816"));
        selected.retain_if_present(&[record("a835af"), record("3c6675")]);
        assert!(selected.0.is_none());
    }

    #[test]
    fn selection_survives_when_aircraft_present() {
        let mut selected = SelectedFlight::default();
        selected.toggle(&record("4b1816"));
        selected.retain_if_present(&[record("4b1816"), record("a835af")]);
        assert!(selected.0.is_some());
    }

    #[test]
    fn empty_selection_ignores_refresh() {
        let mut selected = SelectedFlight::default();
        selected.retain_if_present(&[record("4b1816")]);
        assert!(selected.0.is_none());
    }
}
