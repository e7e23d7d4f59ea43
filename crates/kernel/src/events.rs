use serde::{Deserialize, Serialize};
use wavefield_common::GridCoord;

use crate::error::WaveError;
use crate::field::WaveField;
use crate::params::WaveParams;

/// One mutating call made against a [`WaveField`].
///
/// The field itself keeps no history; hosts that want replay record these
/// alongside their own calls. Because the solver is deterministic, applying
/// the same events in order to a field built from the same parameters
/// reproduces its state bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WaveEvent {
    /// Simulated time advanced by a frame delta.
    Advanced { delta_time: f32 },
    /// An impulse was injected at an interior vertex.
    Disturbed { at: GridCoord, magnitude: f32 },
}

impl WaveEvent {
    /// Perform the call this event describes.
    pub fn apply(&self, field: &mut WaveField) -> Result<(), WaveError> {
        match *self {
            WaveEvent::Advanced { delta_time } => {
                field.update(delta_time);
                Ok(())
            }
            WaveEvent::Disturbed { at, magnitude } => field.disturb(at.row, at.col, magnitude),
        }
    }
}

impl WaveField {
    /// Rebuild a field from its construction parameters and call history.
    pub fn replay(params: WaveParams, events: &[WaveEvent]) -> Result<Self, WaveError> {
        let mut field = Self::new(params)?;
        for event in events {
            event.apply(&mut field)?;
        }
        tracing::debug!(
            events = events.len(),
            steps = field.steps(),
            "wave field replayed"
        );
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> WaveParams {
        WaveParams::new(16, 16, 16.0, 0.03, 4.0, 0.2)
    }

    fn drive(field: &mut WaveField, log: &mut Vec<WaveEvent>, event: WaveEvent) {
        event.apply(field).unwrap();
        log.push(event);
    }

    #[test]
    fn replay_reconstructs_state() {
        let mut field = WaveField::new(params()).unwrap();
        let mut log = Vec::new();
        for frame in 0..120 {
            if frame % 15 == 0 {
                drive(
                    &mut field,
                    &mut log,
                    WaveEvent::Disturbed {
                        at: GridCoord::new(4 + frame % 7, 9),
                        magnitude: 0.35,
                    },
                );
            }
            drive(
                &mut field,
                &mut log,
                WaveEvent::Advanced {
                    delta_time: 0.016 + (frame % 3) as f32 * 0.004,
                },
            );
        }

        let replayed = WaveField::replay(params(), &log).unwrap();
        assert_eq!(replayed.steps(), field.steps());
        assert_eq!(replayed.heights(), field.heights());
        assert_eq!(replayed.state_hash(), field.state_hash());
        for i in 0..field.vertex_count() {
            assert_eq!(replayed.normal(i), field.normal(i));
        }
    }

    #[test]
    fn replay_surfaces_invalid_disturbance() {
        let events = [WaveEvent::Disturbed {
            at: GridCoord::new(0, 5),
            magnitude: 0.2,
        }];
        assert!(matches!(
            WaveField::replay(params(), &events),
            Err(WaveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn events_serialize() {
        let event = WaveEvent::Disturbed {
            at: GridCoord::new(3, 4),
            magnitude: 0.5,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: WaveEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
