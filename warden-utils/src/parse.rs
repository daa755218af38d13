/// Parse a compact duration token like `30s`, `10m`, `2h`, `1d`, `1h30m`, or plain seconds.
///
/// A bare number is only accepted on its own; `1h30` is rejected.
pub fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    if let Ok(seconds) = compact.parse::<u64>() {
        return (seconds > 0).then_some(seconds);
    }

    let mut total = 0_u64;
    let mut digits = String::new();
    for ch in compact.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }

        let multiplier = match ch.to_ascii_lowercase() {
            's' => 1,
            'm' => 60,
            'h' => 3_600,
            'd' => 86_400,
            _ => return None,
        };

        let value = digits.parse::<u64>().ok().filter(|value| *value > 0)?;
        total = total.checked_add(value.checked_mul(multiplier)?)?;
        digits.clear();
    }

    if !digits.is_empty() || total == 0 {
        return None;
    }

    Some(total)
}

/// Parse `<#id>` or a bare id.
pub fn parse_channel_id(raw: &str) -> Option<u64> {
    parse_mention_id(raw, "<#")
}

/// Parse `<@&id>` or a bare id.
pub fn parse_role_id(raw: &str) -> Option<u64> {
    parse_mention_id(raw, "<@&")
}

/// Parse `<@id>`, `<@!id>` or a bare id.
pub fn parse_user_id(raw: &str) -> Option<u64> {
    parse_mention_id(raw, "<@!").or_else(|| parse_mention_id(raw, "<@"))
}

/// Split `@a @b 123 some reason` into the leading user ids and the rest.
pub fn split_targets_and_reason(raw: &str) -> (Vec<u64>, Option<String>) {
    let mut targets = Vec::new();
    let mut rest = raw.trim_start();

    while let Some(token) = rest.split_whitespace().next() {
        let Some(id) = parse_user_id(token) else {
            break;
        };
        if !targets.contains(&id) {
            targets.push(id);
        }
        rest = rest[token.len()..].trim_start();
    }

    let reason = Some(rest.trim())
        .filter(|reason| !reason.is_empty())
        .map(str::to_owned);
    (targets, reason)
}

/// Discord ids are never zero.
fn parse_mention_id(raw: &str, open: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<u64>() {
        return Some(id).filter(|id| *id != 0);
    }

    raw.strip_prefix(open)?
        .strip_suffix('>')?
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
}

/// Parse `#rrggbb` / `rrggbb` into an RGB integer.
pub fn parse_hex_color(raw: &str) -> Option<u32> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    u32::from_str_radix(hex, 16).ok()
}

/// Split an argument string on whitespace, keeping `"double quoted"` runs together.
pub fn split_quoted_args(raw: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in raw.chars() {
        match ch {
            '"' | '“' | '”' => {
                if in_quotes && !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
                in_quotes = !in_quotes;
            }
            ch if ch.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            ch => current.push(ch),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

#[cfg(test)]
mod tests {
    use super::{
        parse_channel_id, parse_duration_seconds, parse_hex_color, parse_role_id, parse_user_id,
        split_quoted_args, split_targets_and_reason,
    };

    #[test]
    fn durations() {
        assert_eq!(parse_duration_seconds("90"), Some(90));
        assert_eq!(parse_duration_seconds("30s"), Some(30));
        assert_eq!(parse_duration_seconds("10m"), Some(600));
        assert_eq!(parse_duration_seconds("1h 30m"), Some(5_400));
        assert_eq!(parse_duration_seconds("2D"), Some(172_800));
        assert_eq!(parse_duration_seconds("0"), None);
        assert_eq!(parse_duration_seconds("0m"), None);
        assert_eq!(parse_duration_seconds("1h30"), None);
        assert_eq!(parse_duration_seconds("5w"), None);
        assert_eq!(parse_duration_seconds(""), None);
    }

    #[test]
    fn mention_ids() {
        assert_eq!(parse_channel_id("<#123>"), Some(123));
        assert_eq!(parse_channel_id(" 456 "), Some(456));
        assert_eq!(parse_channel_id("<@123>"), None);
        assert_eq!(parse_role_id("<@&77>"), Some(77));
        assert_eq!(parse_role_id("<#77>"), None);
        assert_eq!(parse_user_id("<@!9>"), Some(9));
        assert_eq!(parse_user_id("<@9>"), Some(9));
        assert_eq!(parse_user_id("<@&9>"), None);
        assert_eq!(parse_user_id("0"), None);
        assert_eq!(parse_user_id("<@0>"), None);
        assert_eq!(parse_channel_id("<#0>"), None);
        assert_eq!(parse_role_id("<@&0>"), None);
    }

    #[test]
    fn targets_then_reason() {
        let (targets, reason) = split_targets_and_reason("<@1> 2  <@!3> <@1> raid  accounts");
        assert_eq!(targets, vec![1, 2, 3]);
        assert_eq!(reason.as_deref(), Some("raid  accounts"));

        let (targets, reason) = split_targets_and_reason("  <@5>  ");
        assert_eq!(targets, vec![5]);
        assert_eq!(reason, None);

        let (targets, reason) = split_targets_and_reason("no targets 4");
        assert!(targets.is_empty());
        assert_eq!(reason.as_deref(), Some("no targets 4"));

        let (targets, reason) = split_targets_and_reason("0 spam");
        assert!(targets.is_empty());
        assert_eq!(reason.as_deref(), Some("0 spam"));
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#ff0000"), Some(0xff0000));
        assert_eq!(parse_hex_color("00ff00"), Some(0x00ff00));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
    }

    #[test]
    fn quoted_args() {
        assert_eq!(
            split_quoted_args(r#""Best pizza?" "Pineapple yes" no"#),
            vec!["Best pizza?", "Pineapple yes", "no"]
        );
        assert_eq!(split_quoted_args("  a   b "), vec!["a", "b"]);
        assert_eq!(split_quoted_args(r#""unterminated quote"#), vec!["unterminated quote"]);
    }
}
