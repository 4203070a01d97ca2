use crate::SpeedSample;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSpeedsError {
    #[display("no speeds were provided")]
    Empty,
    #[display("speed #{position} is missing")]
    MissingValue { position: usize },
    #[display("could not convert '{token}' to a speed")]
    InvalidNumber { token: String },
    #[display("speed '{token}' is not a finite number")]
    NonFinite { token: String },
}

/// Parses a comma-separated list of speeds, e.g. `"60, 70.5, 80"`.
///
/// Whitespace around each value is ignored. Every value must be a finite
/// number; `NaN` and infinities are rejected.
///
/// # Errors
///
/// Returns [`ParseSpeedsError`] naming the first offending value, or
/// [`ParseSpeedsError::Empty`] if `text` holds no values at all.
///
/// # Examples
///
/// ```
/// use speedstat_sample::{ParseSpeedsError, parse_speeds};
///
/// let sample = parse_speeds(" 60,65.5 , 70 ").unwrap();
/// assert_eq!(sample.as_slice(), &[60.0, 65.5, 70.0]);
///
/// assert_eq!(parse_speeds("   "), Err(ParseSpeedsError::Empty));
/// ```
pub fn parse_speeds(text: &str) -> Result<SpeedSample, ParseSpeedsError> {
    if text.trim().is_empty() {
        return Err(ParseSpeedsError::Empty);
    }

    let values = text
        .split(',')
        .map(str::trim)
        .enumerate()
        .map(|(idx, token)| parse_speed(idx + 1, token))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SpeedSample { values })
}

fn parse_speed(position: usize, token: &str) -> Result<f64, ParseSpeedsError> {
    if token.is_empty() {
        return Err(ParseSpeedsError::MissingValue { position });
    }
    let value = token
        .parse::<f64>()
        .map_err(|_| ParseSpeedsError::InvalidNumber {
            token: token.to_owned(),
        })?;
    if !value.is_finite() {
        return Err(ParseSpeedsError::NonFinite {
            token: token.to_owned(),
        });
    }
    Ok(value)
}
