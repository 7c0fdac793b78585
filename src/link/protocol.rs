//! Wire types for the presentation-controller channel.
//!
//! Messages are single-line JSON objects discriminated by a `type` field.
//! Anything that fails to parse — unknown type, unknown target, malformed
//! JSON — is dropped by the channel without touching state.

use serde::{Deserialize, Serialize};

/// Identifier of a controller-backed slider value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliderTarget {
    Volume,
    Brightness,
    Vibration,
    Presentation,
}

impl SliderTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Volume => "volume",
            Self::Brightness => "brightness",
            Self::Vibration => "vibration",
            Self::Presentation => "presentation",
        }
    }

    /// Display title for the slider header.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Volume => "Volume",
            Self::Brightness => "Brightness",
            Self::Vibration => "Vibration",
            Self::Presentation => "Seek playback",
        }
    }
}

/// Playback transport commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationAction {
    Play,
    Pause,
}

/// Messages sent to the controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Outbound {
    #[serde(rename = "slider:update")]
    SliderUpdate { target: SliderTarget, value: f64 },
    #[serde(rename = "presentation:command")]
    PresentationCommand { action: PresentationAction },
}

/// Messages received from the controller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Inbound {
    #[serde(rename = "presentation:state")]
    PresentationState {
        /// Total length in seconds.
        duration: f64,
        #[serde(rename = "currentTime")]
        current_time: f64,
        playing: bool,
    },
    #[serde(rename = "slider:update")]
    SliderUpdate { target: SliderTarget, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_slider_update_shape() {
        let msg = Outbound::SliderUpdate {
            target: SliderTarget::Volume,
            value: 0.5,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"type":"slider:update","target":"volume","value":0.5}"#
        );
    }

    #[test]
    fn test_outbound_presentation_command_shape() {
        let msg = Outbound::PresentationCommand {
            action: PresentationAction::Play,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"presentation:command","action":"play"}"#);
    }

    #[test]
    fn test_inbound_presentation_state_parses() {
        let msg: Inbound = serde_json::from_str(
            r#"{"type":"presentation:state","duration":750,"currentTime":12.3,"playing":true}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            Inbound::PresentationState {
                duration: 750.0,
                current_time: 12.3,
                playing: true,
            }
        );
    }

    #[test]
    fn test_inbound_slider_update_parses() {
        let msg: Inbound =
            serde_json::from_str(r#"{"type":"slider:update","target":"brightness","value":0.7}"#)
                .unwrap();
        assert_eq!(
            msg,
            Inbound::SliderUpdate {
                target: SliderTarget::Brightness,
                value: 0.7,
            }
        );
    }

    #[test]
    fn test_unknown_type_and_target_are_errors() {
        assert!(serde_json::from_str::<Inbound>(r#"{"type":"mystery","value":1}"#).is_err());
        assert!(serde_json::from_str::<Inbound>(
            r#"{"type":"slider:update","target":"contrast","value":0.5}"#
        )
        .is_err());
    }
}
