use jiff::SpanRelativeTo;

/// Accepts `"30s"`, `"5m"`, `"PT1H30M"` or a plain number of seconds.
pub fn parse_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        return Ok(duration);
    }

    if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        return Ok(duration);
    }

    if let Ok(seconds) = input.parse::<f64>() {
        return jiff::SignedDuration::try_from_secs_f64(seconds.abs())
            .map_err(|err| err.to_string());
    }

    Err(format!("Invalid duration: {}", input))
}
