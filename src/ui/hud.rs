//! HUD overlay: status readout, flight details panel, zoom controls.

use crate::flights::{FlightData, FlightFeedState};
use crate::ui::state::SelectedFlight;
use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;

const ZOOM_STEP: f32 = 50.0;
const MIN_CAMERA_RADIUS: f32 = 240.0;
const MAX_CAMERA_RADIUS: f32 = 2_500.0;

const PANEL_BACKGROUND: Color = Color::srgba(0.08, 0.10, 0.14, 0.88);
const BUTTON_BACKGROUND: Color = Color::srgba(0.24, 0.26, 0.30, 0.9);

#[derive(Component)]
pub struct StatusReadout;

#[derive(Component)]
pub struct FlightInfoPanel;

#[derive(Component, Clone, Copy)]
pub enum ZoomButton {
    In,
    Out,
}

pub fn setup_hud(mut commands: Commands) {
    // Feed status, top left.
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            left: Val::Px(16.0),
            padding: UiRect::all(Val::Px(10.0)),
            ..default()
        },
        BackgroundColor(PANEL_BACKGROUND),
        Text::new("Loading flights..."),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::WHITE),
        StatusReadout,
    ));

    // Flight details, top right, hidden until something is selected.
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            right: Val::Px(16.0),
            width: Val::Px(280.0),
            padding: UiRect::all(Val::Px(12.0)),
            ..default()
        },
        BackgroundColor(PANEL_BACKGROUND),
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgb(0.85, 0.87, 0.90)),
        Visibility::Hidden,
        FlightInfoPanel,
    ));

    // Zoom buttons, stacked on the right edge.
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            right: Val::Px(16.0),
            bottom: Val::Px(32.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(8.0),
            ..default()
        })
        .with_children(|parent| {
            for (label, button) in [("+", ZoomButton::In), ("\u{2212}", ZoomButton::Out)] {
                parent
                    .spawn((
                        Button,
                        button,
                        Node {
                            width: Val::Px(44.0),
                            height: Val::Px(44.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(BUTTON_BACKGROUND),
                    ))
                    .with_children(|parent| {
                        parent.spawn((
                            Text::new(label),
                            TextFont {
                                font_size: 22.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });
            }
        });
}

pub fn update_status_readout(
    feed: Res<FlightFeedState>,
    data: Res<FlightData>,
    mut readouts: Query<&mut Text, With<StatusReadout>>,
) {
    if !feed.is_changed() && !data.is_changed() {
        return;
    }
    let Ok(mut text) = readouts.single_mut() else {
        return;
    };
    text.0 = if let Some(error) = &feed.error {
        format!("Error: {error}")
    } else if data.updated_utc.is_none() {
        "Loading flights...".to_string()
    } else {
        format!("Live flights updated ({} aircraft)", data.flights.len())
    };
}

pub fn update_flight_info_panel(
    selected: Res<SelectedFlight>,
    mut panels: Query<(&mut Text, &mut Visibility), With<FlightInfoPanel>>,
) {
    if !selected.is_changed() {
        return;
    }
    let Ok((mut text, mut visibility)) = panels.single_mut() else {
        return;
    };
    match &selected.0 {
        Some(flight) => {
            text.0 = flight_info_text(
                &flight.callsign,
                &flight.icao24,
                flight.altitude,
                flight.velocity,
                flight.heading,
                &flight.country,
            );
            *visibility = Visibility::Visible;
        }
        None => {
            *visibility = Visibility::Hidden;
        }
    }
}

fn flight_info_text(
    callsign: &str,
    icao24: &str,
    altitude: f64,
    velocity: f64,
    heading: f32,
    country: &str,
) -> String {
    format!(
        "Flight Info\n\nCallsign: {callsign}\nICAO24: {icao24}\n\
         Altitude: {altitude:.0} m\nVelocity: {velocity:.1} m/s\n\
         Heading: {heading:.0}\u{00b0}\nCountry: {country}"
    )
}

/// Zoom buttons step the orbit camera radius by a fixed amount, clamped so
/// the camera can neither enter the globe nor lose it entirely.
pub fn handle_zoom_buttons(
    interactions: Query<(&Interaction, &ZoomButton), Changed<Interaction>>,
    mut cameras: Query<&mut PanOrbitCamera>,
) {
    for (interaction, button) in interactions.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        let Ok(mut camera) = cameras.single_mut() else {
            continue;
        };
        let step = match button {
            ZoomButton::In => -ZOOM_STEP,
            ZoomButton::Out => ZOOM_STEP,
        };
        camera.target_radius =
            (camera.target_radius + step).clamp(MIN_CAMERA_RADIUS, MAX_CAMERA_RADIUS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flight_info_lists_every_field() {
        let text = flight_info_text("SWR193H", "4b1816", 11582.4, 245.87, 316.43, "Switzerland");
        for needle in [
            "SWR193H",
            "4b1816",
            "11582 m",
            "245.9 m/s",
            "316\u{00b0}",
            "Switzerland",
        ] {
            assert!(text.contains(needle), "missing {needle} in {text}");
        }
    }
}
