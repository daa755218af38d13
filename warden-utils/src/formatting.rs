/// Convert internal action identifiers to user-facing names.
pub fn action_display_name(action: &str) -> String {
    match action {
        "kick" => "Kick".to_owned(),
        "ban" => "Ban".to_owned(),
        "softban" => "Softban".to_owned(),
        "unban" => "Unban".to_owned(),
        "mute" => "Mute".to_owned(),
        "unmute" => "Unmute".to_owned(),
        "auto_unmute" => "Unmute (Auto)".to_owned(),
        "warn" => "Warn".to_owned(),
        "purge" => "Clear Messages".to_owned(),
        "prefix" => "Prefix Change".to_owned(),
        other => title_case_words(other),
    }
}

fn title_case_words(raw: &str) -> String {
    let words = raw
        .trim()
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!(
                    "{}{}",
                    first.to_uppercase(),
                    chars.as_str().to_ascii_lowercase()
                ),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>();

    if words.is_empty() {
        "Unknown".to_owned()
    } else {
        words.join(" ")
    }
}

/// Format seconds into a compact human-readable duration (e.g. 59s, 1m, 1h 30m, 1d 2h).
pub fn format_compact_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let parts = if days > 0 {
        vec![(days, 'd'), (hours, 'h')]
    } else if hours > 0 {
        vec![(hours, 'h'), (minutes, 'm'), (seconds, 's')]
    } else if minutes > 0 {
        vec![(minutes, 'm'), (seconds, 's')]
    } else {
        return format!("{}s", seconds);
    };

    parts
        .into_iter()
        .enumerate()
        .filter(|(idx, (value, _))| *idx == 0 || *value > 0)
        .map(|(_, (value, unit))| format!("{}{}", value, unit))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Break user/role/everyone pings in free text that gets echoed back.
pub fn escape_mentions(raw: &str) -> String {
    raw.replace('@', "@\u{200B}")
}

/// Cut `raw` to at most `max_chars` characters, adding an ellipsis when shortened.
pub fn truncate_chars(raw: &str, max_chars: usize) -> String {
    if raw.chars().count() <= max_chars {
        return raw.to_owned();
    }

    let mut out: String = raw.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::{action_display_name, escape_mentions, format_compact_duration, truncate_chars};

    #[test]
    fn action_names_are_user_friendly() {
        assert_eq!(action_display_name("warn"), "Warn");
        assert_eq!(action_display_name("auto_unmute"), "Unmute (Auto)");
        assert_eq!(action_display_name("mass_kick"), "Mass Kick");
        assert_eq!(action_display_name("automod_keywords"), "Automod Keywords");
        assert_eq!(action_display_name("  "), "Unknown");
    }

    #[test]
    fn compact_duration_formatting() {
        assert_eq!(format_compact_duration(0), "0s");
        assert_eq!(format_compact_duration(59), "59s");
        assert_eq!(format_compact_duration(60), "1m");
        assert_eq!(format_compact_duration(61), "1m 1s");
        assert_eq!(format_compact_duration(3600), "1h");
        assert_eq!(format_compact_duration(3660), "1h 1m");
        assert_eq!(format_compact_duration(3605), "1h 5s");
        assert_eq!(format_compact_duration(86400), "1d");
        assert_eq!(format_compact_duration(90000), "1d 1h");
    }

    #[test]
    fn mentions_are_defused() {
        assert_eq!(escape_mentions("@everyone hi"), "@\u{200B}everyone hi");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("ééééé", 3), "éé…");
    }
}
