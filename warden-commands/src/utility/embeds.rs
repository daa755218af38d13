use crate::CommandMeta;

/// Reaction emoji for poll options, in order.
pub const POLL_EMOJIS: [&str; 9] = ["1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣"];

pub fn unknown_category_message(wanted_category: &str, valid_categories: &[&str]) -> String {
    let valid = valid_categories
        .iter()
        .map(|category| display_category(category))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Unknown category: {}\nValid categories: {}",
        display_category(wanted_category),
        valid
    )
}

pub fn no_commands_message(category: Option<&str>) -> String {
    match category {
        Some(cat) => format!("No commands found in category: {}", display_category(cat)),
        None => "No commands are registered.".to_owned(),
    }
}

pub fn page_out_of_range_message(requested_page: usize, total_pages: usize) -> String {
    format!(
        "Page {} does not exist. Available pages: 1-{}.",
        requested_page, total_pages
    )
}

pub fn grouped_help_description(commands: &[&CommandMeta]) -> String {
    let mut out = String::new();
    let mut current_category: Option<&str> = None;

    for command in commands {
        if current_category != Some(command.category) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", display_category(command.category)));
            current_category = Some(command.category);
        }

        out.push_str(&format!("`{}`: {}\n", command.name, command.desc));
    }

    if out.is_empty() {
        out.push_str("No commands available.");
    }

    out.trim_end().to_owned()
}

pub fn poll_description(question: &str, options: &[String]) -> String {
    let mut out = format!("**{}**\n\n", question);
    for (emoji, option) in POLL_EMOJIS.iter().zip(options) {
        out.push_str(&format!("{emoji} {option}\n"));
    }
    out.trim_end().to_owned()
}

fn display_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{grouped_help_description, poll_description, unknown_category_message};
    use crate::CommandMeta;

    const A: CommandMeta = CommandMeta {
        name: "afk",
        desc: "Go away.",
        category: "utility",
        usage: "!afk",
    };
    const B: CommandMeta = CommandMeta {
        name: "ban",
        desc: "Ban.",
        category: "moderation",
        usage: "!ban",
    };

    #[test]
    fn help_groups_by_category() {
        let text = grouped_help_description(&[&B, &A]);
        assert_eq!(text, "**Moderation**\n`ban`: Ban.\n\n**Utility**\n`afk`: Go away.");
    }

    #[test]
    fn unknown_category_lists_valid_ones() {
        let text = unknown_category_message("games", &["fun", "utility"]);
        assert_eq!(text, "Unknown category: Games\nValid categories: Fun, Utility");
    }

    #[test]
    fn poll_numbers_each_option() {
        let text = poll_description("Lunch?", &["Pizza".to_owned(), "Tacos".to_owned()]);
        assert_eq!(text, "**Lunch?**\n\n1️⃣ Pizza\n2️⃣ Tacos");
    }
}
