use thiserror::Error;

/// Errors raised while building pairing inputs
///
/// Ranking itself never fails; these surface when raw strings are turned into
/// typed values (clock times, event timestamps).
#[derive(Debug, Error)]
pub enum PairingError {
    #[error("Invalid clock time '{0}': expected HH:MM (24-hour)")]
    InvalidClockTime(String),

    #[error("Invalid event timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
