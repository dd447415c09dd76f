//! Group-chat addressing rules and client-number extraction.
//!
//! In private chats every message is for the bot. In groups it only
//! answers when mentioned by `@username` or when someone replies to one
//! of its own messages; everything else stays untouched.

use crate::telegram::{Message, User};

/// Message text resolved against chat context. `direct` is true when the
/// sender spoke to the bot explicitly (private chat or a mention); only
/// direct messages earn a validation reply when no number is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addressed {
    pub text: String,
    pub direct: bool,
}

impl Addressed {
    pub fn direct(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            direct: true,
        }
    }

    fn indirect(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            direct: false,
        }
    }
}

/// Decide whether a group message addresses `bot`, and with what text.
///
/// A mention match is case-insensitive and the mention itself is cut out
/// of the processed text. A reply to the bot passes the text through
/// unchanged.
pub fn group_addressed(message: &Message, bot: &User) -> Option<Addressed> {
    let text = message.text.as_deref().unwrap_or("").trim();
    let username = bot.username.as_deref().unwrap_or("");

    if !username.is_empty() {
        let mention = format!("@{}", username.to_lowercase());
        let lowered = text.to_lowercase();
        if lowered.contains(&mention) {
            return Some(Addressed::direct(lowered.replace(&mention, "").trim()));
        }
    }

    let replies_to_bot = message
        .reply_to_message
        .as_deref()
        .and_then(|quoted| quoted.from.as_ref())
        .is_some_and(|sender| sender.id == bot.id);
    if replies_to_bot {
        return Some(Addressed::indirect(text));
    }
    None
}

/// Collect every digit in the text into one client number. Text without
/// digits yields `None`.
pub fn extract_digits(text: &str) -> Option<String> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    (!digits.is_empty()).then_some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::{Chat, ChatKind};
    use pretty_assertions::assert_eq;

    fn bot() -> User {
        User {
            id: 555,
            first_name: "Desk".to_string(),
            last_name: None,
            username: Some("Desk_Bot".to_string()),
        }
    }

    fn group_message(text: &str, reply_from: Option<User>) -> Message {
        Message {
            message_id: 1,
            from: Some(User {
                id: 777,
                first_name: "Ana".to_string(),
                last_name: None,
                username: Some("ana_v".to_string()),
            }),
            chat: Chat {
                id: -100200,
                kind: ChatKind::Supergroup,
                title: Some("Soporte".to_string()),
            },
            text: Some(text.to_string()),
            reply_to_message: reply_from.map(|from| {
                Box::new(Message {
                    message_id: 0,
                    from: Some(from),
                    chat: Chat {
                        id: -100200,
                        kind: ChatKind::Supergroup,
                        title: Some("Soporte".to_string()),
                    },
                    text: Some("listo".to_string()),
                    reply_to_message: None,
                })
            }),
        }
    }

    #[test]
    fn mention_is_cut_out_and_counts_as_direct() {
        let message = group_message("@Desk_Bot 00123 hola", None);
        let addressed = group_addressed(&message, &bot()).expect("addressed");
        assert!(addressed.direct);
        assert_eq!(addressed.text, "00123 hola");
    }

    #[test]
    fn mention_matching_ignores_case() {
        let message = group_message("oye @desk_bot busca 42", None);
        let addressed = group_addressed(&message, &bot()).expect("addressed");
        assert_eq!(addressed.text, "oye  busca 42");
    }

    #[test]
    fn reply_to_the_bot_is_addressed_but_not_direct() {
        let message = group_message("10234", Some(bot()));
        let addressed = group_addressed(&message, &bot()).expect("addressed");
        assert!(!addressed.direct);
        assert_eq!(addressed.text, "10234");
    }

    #[test]
    fn reply_to_someone_else_is_ignored() {
        let other = User {
            id: 999,
            first_name: "Otro".to_string(),
            last_name: None,
            username: None,
        };
        let message = group_message("10234", Some(other));
        assert_eq!(group_addressed(&message, &bot()), None);
    }

    #[test]
    fn unaddressed_group_chatter_is_ignored() {
        let message = group_message("el pedido 10234 ya salió", None);
        assert_eq!(group_addressed(&message, &bot()), None);
    }

    #[test]
    fn digits_concatenate_across_the_text() {
        assert_eq!(extract_digits("@bot_user 00123 hola"), Some("00123".to_string()));
        assert_eq!(extract_digits("cliente 12 lote 34"), Some("1234".to_string()));
    }

    #[test]
    fn text_without_digits_yields_none() {
        assert_eq!(extract_digits("hola, ¿cómo va todo?"), None);
    }
}
