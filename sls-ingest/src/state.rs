//! Playback state mapping

use sls_common::{Error, PlaybackState, Result};

/// Record field carrying the playback state code
pub const STATE: &str = "state";

/// Map a wire status code to its canonical state
///
/// Total over 0..=3; every other code is [`Error::UnknownState`].
pub fn map_state(code: i32) -> Result<PlaybackState> {
    match code {
        0 => Ok(PlaybackState::Start),
        1 => Ok(PlaybackState::Resume),
        2 => Ok(PlaybackState::Pause),
        3 => Ok(PlaybackState::Complete),
        other => Err(Error::UnknownState(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(map_state(0).unwrap(), PlaybackState::Start);
        assert_eq!(map_state(1).unwrap(), PlaybackState::Resume);
        assert_eq!(map_state(2).unwrap(), PlaybackState::Pause);
        assert_eq!(map_state(3).unwrap(), PlaybackState::Complete);
    }

    #[test]
    fn test_inverse_of_code() {
        for state in PlaybackState::ALL {
            assert_eq!(map_state(state.code()).unwrap(), state);
        }
    }

    #[test]
    fn test_unknown_codes_rejected() {
        for code in [-1, 4, 9, i32::MIN, i32::MAX] {
            assert!(matches!(map_state(code), Err(Error::UnknownState(c)) if c == code));
        }
    }

    #[test]
    fn test_mapping_is_stable() {
        for _ in 0..3 {
            assert_eq!(map_state(2).unwrap(), PlaybackState::Pause);
            assert!(map_state(9).is_err());
        }
    }
}
