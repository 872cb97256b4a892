//! JSON control-message decoder.
//!
//! The browser posts `{"Command": "move", "Direction": "left", "Pressed": "true"}`
//! to `/api`.  All three fields are strings.  Decoding is permissive:
//!
//! * field names match as `Command` or `command` (likewise for the other
//!   two) and no other spelling, so `COMMAND` counts as missing;
//! * a body carrying both spellings of one field is malformed;
//! * missing or `null` fields decode as the empty string;
//! * extra fields are ignored;
//! * only the first JSON value in the body is read, trailing bytes are not
//!   inspected;
//! * unknown command, direction, and pressed values are kept as `Unknown` /
//!   `Indeterminate` so the dispatcher can ignore them.
//!
//! Only bodies that are not a JSON object with string-or-null fields fail.
//! Arrays in particular are rejected, even when their elements line up with
//! the three fields.

use serde::Deserialize;
use serde_json::Value;
use sticker_types::{CommandEnvelope, CommandKind, Direction, PressState};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty command body")]
    Empty,

    #[error("malformed command body: {0}")]
    Malformed(String),
}

#[derive(Deserialize)]
struct RawCommand {
    #[serde(default, rename = "Command", alias = "command")]
    command: Option<String>,
    #[serde(default, rename = "Direction", alias = "direction")]
    direction: Option<String>,
    #[serde(default, rename = "Pressed", alias = "pressed")]
    pressed: Option<String>,
}

/// Decode one control message from a raw request body.
pub fn decode(raw: &[u8]) -> Result<CommandEnvelope, DecodeError> {
    let mut values = serde_json::Deserializer::from_slice(raw).into_iter::<Value>();
    let value = match values.next() {
        None => return Err(DecodeError::Empty),
        Some(result) => result.map_err(|e| DecodeError::Malformed(e.to_string()))?,
    };
    if !value.is_object() {
        return Err(DecodeError::Malformed(
            "control message must be a JSON object".to_string(),
        ));
    }
    let message: RawCommand =
        serde_json::from_value(value).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    Ok(CommandEnvelope::new(
        CommandKind::parse(message.command.as_deref().unwrap_or_default()),
        Direction::parse(message.direction.as_deref().unwrap_or_default()),
        PressState::parse(message.pressed.as_deref().unwrap_or_default()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_move_left_pressed() {
        let env = decode(br#"{"Command":"move","Direction":"left","Pressed":"true"}"#).unwrap();
        assert_eq!(env.command, CommandKind::Move);
        assert_eq!(env.direction, Direction::Left);
        assert_eq!(env.pressed, PressState::Pressed);
    }

    #[test]
    fn decodes_look_release() {
        let env = decode(br#"{"Command":"look","Direction":"up","Pressed":"false"}"#).unwrap();
        assert_eq!(env.command, CommandKind::Look);
        assert_eq!(env.direction, Direction::Up);
        assert_eq!(env.pressed, PressState::Released);
    }

    #[test]
    fn lowercase_field_names_are_accepted() {
        let env = decode(br#"{"command":"move","direction":"down","pressed":"true"}"#).unwrap();
        assert_eq!(env.command, CommandKind::Move);
        assert_eq!(env.direction, Direction::Down);
        assert_eq!(env.pressed, PressState::Pressed);
    }

    #[test]
    fn unknown_command_is_not_an_error() {
        let env = decode(br#"{"Command":"dance","Direction":"left","Pressed":"true"}"#).unwrap();
        assert_eq!(env.command, CommandKind::Unknown("dance".to_string()));
    }

    #[test]
    fn odd_pressed_value_is_indeterminate() {
        let env = decode(br#"{"Command":"move","Direction":"left","Pressed":"yes"}"#).unwrap();
        assert_eq!(env.pressed, PressState::Indeterminate("yes".to_string()));
    }

    #[test]
    fn missing_and_null_fields_decode_as_empty() {
        let env = decode(br#"{"Command":"move","Direction":null}"#).unwrap();
        assert_eq!(env.direction, Direction::Unknown(String::new()));
        assert_eq!(env.pressed, PressState::Indeterminate(String::new()));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let env = decode(
            br#"{"Command":"look","Direction":"right","Pressed":"true","Speed":3}"#,
        )
        .unwrap();
        assert_eq!(env.direction, Direction::Right);
    }

    #[test]
    fn trailing_bytes_after_first_value_are_ignored() {
        let env = decode(br#"{"Command":"move","Direction":"up","Pressed":"true"} trailing"#)
            .unwrap();
        assert_eq!(env.direction, Direction::Up);
    }

    #[test]
    fn empty_body_is_an_error() {
        assert_eq!(decode(b""), Err(DecodeError::Empty));
        assert_eq!(decode(b"   "), Err(DecodeError::Empty));
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(matches!(decode(b"not json at all"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn array_body_is_malformed() {
        let result = decode(br#"["move","left","true"]"#);
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn scalar_body_is_malformed() {
        assert!(matches!(decode(b"\"move\""), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode(b"null"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn other_casings_count_as_missing() {
        let env = decode(br#"{"COMMAND":"move","Direction":"left","Pressed":"true"}"#).unwrap();
        assert_eq!(env.command, CommandKind::Unknown(String::new()));
    }

    #[test]
    fn both_spellings_of_a_field_is_malformed() {
        let result = decode(br#"{"Command":"move","command":"look","Direction":"up","Pressed":"true"}"#);
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn boolean_pressed_is_malformed() {
        let result = decode(br#"{"Command":"move","Direction":"left","Pressed":true}"#);
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }
}
