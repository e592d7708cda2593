use crate::engine::CommandError;

/// Display name from a `"Web Browser" as ` prefix, or `None` when there is none.
pub fn display_name(full: Option<&str>) -> Option<String> {
    let caps = regex!(r#"^"([^"]+)""#).captures(full?)?;
    Some(caps[1].trim().to_string())
}

/// A time tick: `100` is absolute, `+50` is relative to `now`.
pub fn resolve_time(text: &str, now: i64) -> Result<i64, CommandError> {
    let invalid = || CommandError::semantic(format!("Invalid time {text}"));
    match text.strip_prefix('+') {
        Some(delta) => {
            let delta: i64 = delta.parse().map_err(|_| invalid())?;
            now.checked_add(delta).ok_or_else(invalid)
        }
        None => text.parse().map_err(|_| invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_unquoted() {
        assert_eq!(display_name(Some("\"Web Browser\" as ")).as_deref(), Some("Web Browser"));
        assert_eq!(display_name(None), None);
    }

    #[test]
    fn relative_and_absolute_ticks() {
        assert_eq!(resolve_time("100", 40).unwrap(), 100);
        assert_eq!(resolve_time("+20", 40).unwrap(), 60);
        assert_eq!(resolve_time("-5", 40).unwrap(), -5);
        assert_eq!(resolve_time("99999999999999999999", 0).unwrap_err().message, "Invalid time 99999999999999999999");
    }
}
