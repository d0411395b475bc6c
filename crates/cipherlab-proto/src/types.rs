//! Shared domain values carried by requests and replies.
//!
//! Enum spellings follow the server exactly, including the historical
//! `ceasar` algorithm name, since the server matches them as raw strings.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ProtoError;

/// Server-assigned user id.
pub type UserId = i64;

/// Server-assigned message id (crypto and stego messages share the space).
pub type MessageId = i64;

/// Password attack strategy run by `/api/attack_auth/start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackMethod {
    /// Exhaustive search over 6 characters.
    Bruteforce,
    /// Dictionary of 3-character passwords.
    Dictionary3,
    /// Dictionary of 5-digit passwords.
    Dictionary5,
}

impl AttackMethod {
    /// All methods, in selector order.
    pub const ALL: [Self; 3] = [Self::Bruteforce, Self::Dictionary3, Self::Dictionary5];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bruteforce => "bruteforce",
            Self::Dictionary3 => "dictionary3",
            Self::Dictionary5 => "dictionary5",
        }
    }

    /// Human description of the search space, shown in the attack log.
    pub fn description(self) -> &'static str {
        match self {
            Self::Bruteforce => "Brute force (6 characters: a-z, A-Z, 0-9, +, *)",
            Self::Dictionary3 => "Dictionary attack (3 characters)",
            Self::Dictionary5 => "Dictionary attack (5 digits)",
        }
    }
}

impl fmt::Display for AttackMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttackMethod {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ProtoError::UnknownVariant { kind: "attack method", value: s.into() })
    }
}

/// Cipher attack accepted by `/api/crypto/attack` as `cipher_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherAttackKind {
    /// Try all 26 Caesar shifts.
    Caesar,
    /// Playfair with keys from the server's word list.
    PlayfairDict,
    /// Full Hill 2x2 key search.
    HillBrute,
    /// Hill 2x2 with keys from the server's word list.
    HillDict,
}

impl CipherAttackKind {
    /// All kinds, in selector order.
    pub const ALL: [Self; 4] = [Self::Caesar, Self::PlayfairDict, Self::HillBrute, Self::HillDict];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Caesar => "caesar",
            Self::PlayfairDict => "playfair_dict",
            Self::HillBrute => "hill_brute",
            Self::HillDict => "hill_dict",
        }
    }
}

impl fmt::Display for CipherAttackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CipherAttackKind {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ProtoError::UnknownVariant { kind: "cipher attack", value: s.into() })
    }
}

/// Classical cipher implemented by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Caesar shift. The server spells it `ceasar`.
    #[serde(rename = "ceasar", alias = "caesar")]
    Caesar,
    /// Playfair 5x5 digraph cipher.
    #[serde(rename = "playfair")]
    Playfair,
    /// Hill matrix cipher.
    #[serde(rename = "hill")]
    Hill,
}

impl Algorithm {
    /// All algorithms, in selector order.
    pub const ALL: [Self; 3] = [Self::Caesar, Self::Playfair, Self::Hill];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Caesar => "ceasar",
            Self::Playfair => "playfair",
            Self::Hill => "hill",
        }
    }

    /// Display name with a capital initial.
    pub fn label(self) -> &'static str {
        match self {
            Self::Caesar => "Caesar",
            Self::Playfair => "Playfair",
            Self::Hill => "Hill",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ceasar" | "caesar" => Ok(Self::Caesar),
            "playfair" => Ok(Self::Playfair),
            "hill" => Ok(Self::Hill),
            other => Err(ProtoError::UnknownVariant { kind: "algorithm", value: other.into() }),
        }
    }
}

/// Caesar shift direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShiftDirection {
    /// Shift forward through the alphabet.
    #[default]
    #[serde(rename = "droite")]
    Right,
    /// Shift backward through the alphabet.
    #[serde(rename = "gauche")]
    Left,
}

impl FromStr for ShiftDirection {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "right" | "droite" => Ok(Self::Right),
            "left" | "gauche" => Ok(Self::Left),
            other => Err(ProtoError::UnknownVariant { kind: "direction", value: other.into() }),
        }
    }
}

/// Key material sent alongside encrypt/decrypt/send requests.
///
/// Serialized as a bare JSON object: `{"shift":3,"direction":"droite"}`,
/// `{"key":"MONARCHY"}` or `{}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyParams {
    /// Caesar shift parameters.
    Shift {
        /// Number of positions, 1..=25.
        shift: u8,
        /// Shift direction.
        #[serde(default)]
        direction: ShiftDirection,
    },
    /// Keyword for Playfair or Hill.
    Keyword {
        /// Key text.
        key: String,
    },
    /// No parameters; the server applies its defaults.
    Empty {},
}

impl KeyParams {
    /// The defaults the server falls back to for each algorithm.
    pub fn default_for(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Caesar => Self::Shift { shift: 3, direction: ShiftDirection::Right },
            Algorithm::Playfair => Self::Keyword { key: "MONARCHY".into() },
            Algorithm::Hill => Self::Keyword { key: "FRID".into() },
        }
    }

    /// Parse the `algorithm_key` JSON string stored with a message.
    ///
    /// Absent or malformed keys yield [`KeyParams::Empty`].
    pub fn from_stored(raw: Option<&str>) -> Self {
        raw.and_then(|s| serde_json::from_str(s).ok()).unwrap_or(Self::Empty {})
    }
}

/// Key that produced an [`AttackResult`]: a shift number or a key word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultKey {
    /// Numeric key (Caesar shift).
    Number(i64),
    /// Textual key (dictionary word, matrix).
    Text(String),
}

impl fmt::Display for ResultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One candidate decryption produced by a server-side cipher attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResult {
    /// Key tried.
    pub key: ResultKey,
    /// Plaintext under that key.
    pub plaintext: String,
    /// Server heuristic: the plaintext looks like natural language.
    #[serde(default)]
    pub is_likely: bool,
}

/// Entry of `/api/users` listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User id.
    pub id: UserId,
    /// Login name.
    #[serde(alias = "email")]
    pub username: String,
}

/// Embedded sender/receiver reference inside a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// Login name.
    #[serde(alias = "email")]
    pub username: String,
}

/// Message exchanged between two users, as listed by a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "message_type", rename_all = "lowercase")]
pub enum ConversationMessage {
    /// Text encrypted with a classical cipher.
    Crypto(CryptoMessage),
    /// Text hidden in a WAV file.
    Stego(StegoMessage),
}

impl ConversationMessage {
    /// Message id.
    pub fn id(&self) -> MessageId {
        match self {
            Self::Crypto(m) => m.id,
            Self::Stego(m) => m.id,
        }
    }

    /// Sender id.
    pub fn sender_id(&self) -> UserId {
        match self {
            Self::Crypto(m) => m.sender_id,
            Self::Stego(m) => m.sender_id,
        }
    }

    /// Embedded sender, if the server joined it.
    pub fn sender(&self) -> Option<&UserRef> {
        match self {
            Self::Crypto(m) => m.sender.as_ref(),
            Self::Stego(m) => m.sender.as_ref(),
        }
    }

    /// Embedded receiver, if the server joined it.
    pub fn receiver(&self) -> Option<&UserRef> {
        match self {
            Self::Crypto(m) => m.receiver.as_ref(),
            Self::Stego(m) => m.receiver.as_ref(),
        }
    }

    /// Creation timestamp as sent by the server.
    pub fn date_created(&self) -> &str {
        match self {
            Self::Crypto(m) => &m.date_created,
            Self::Stego(m) => &m.date_created,
        }
    }
}

/// Cipher-text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoMessage {
    /// Message id.
    pub id: MessageId,
    /// Author.
    pub sender_id: UserId,
    /// Recipient.
    pub receiver_id: UserId,
    /// Joined author record.
    #[serde(default)]
    pub sender: Option<UserRef>,
    /// Joined recipient record.
    #[serde(default)]
    pub receiver: Option<UserRef>,
    /// Creation timestamp.
    #[serde(default)]
    pub date_created: String,
    /// Ciphertext.
    pub encrypted: String,
    /// Cipher used.
    pub algo_name: Algorithm,
    /// Key params as a JSON string.
    #[serde(default)]
    pub algorithm_key: Option<String>,
}

/// Audio message carrying a hidden text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StegoMessage {
    /// Message id.
    pub id: MessageId,
    /// Author.
    pub sender_id: UserId,
    /// Recipient.
    pub receiver_id: UserId,
    /// Joined author record.
    #[serde(default)]
    pub sender: Option<UserRef>,
    /// Joined recipient record.
    #[serde(default)]
    pub receiver: Option<UserRef>,
    /// Creation timestamp.
    #[serde(default)]
    pub date_created: String,
    /// Stored WAV file, served by `/api/stego/audio/:filename`.
    pub audio_filename: String,
}

/// WAV header facts reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioProfile {
    /// Channel count.
    pub channels: u16,
    /// Bytes per sample.
    pub sample_width: u16,
    /// Samples per second.
    pub framerate: u32,
    /// Frame count.
    pub n_frames: u64,
    /// Length in seconds.
    pub duration: f64,
    /// Bits available for hiding (one per frame).
    pub capacity_bits: u64,
    /// Characters available for hiding.
    pub capacity_chars: u64,
}

/// Summary of which sample LSBs changed while hiding a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LsbComparison {
    /// Bits written.
    pub message_length_bits: u64,
    /// Samples whose LSB actually flipped.
    pub total_changes: u64,
    /// Share of written bits that flipped a sample, in percent.
    pub change_percentage: f64,
}

/// Before/after analysis returned by `/api/stego/send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StegoAnalysis {
    /// Carrier before hiding.
    pub original: AudioProfile,
    /// Carrier after hiding.
    pub modified: AudioProfile,
    /// Secret length in characters.
    pub message_length: u64,
    /// Secret length in bits, terminator included.
    pub binary_length: u64,
    /// LSB statistics, when the server computed them.
    #[serde(default)]
    pub lsb_comparison: Option<LsbComparison>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn attack_method_wire_names() {
        for method in AttackMethod::ALL {
            let encoded = serde_json::to_value(method).unwrap();
            assert_eq!(encoded, json!(method.as_str()));
            assert_eq!(method.as_str().parse::<AttackMethod>().unwrap(), method);
        }
        assert!("dictionary4".parse::<AttackMethod>().is_err());
    }

    #[test]
    fn caesar_keeps_server_spelling() {
        assert_eq!(serde_json::to_value(Algorithm::Caesar).unwrap(), json!("ceasar"));
        let decoded: Algorithm = serde_json::from_value(json!("caesar")).unwrap();
        assert_eq!(decoded, Algorithm::Caesar);
    }

    #[test]
    fn key_params_serialize_as_bare_objects() {
        let shift = KeyParams::default_for(Algorithm::Caesar);
        assert_eq!(serde_json::to_value(&shift).unwrap(), json!({"shift": 3, "direction": "droite"}));

        let keyword = KeyParams::default_for(Algorithm::Playfair);
        assert_eq!(serde_json::to_value(&keyword).unwrap(), json!({"key": "MONARCHY"}));

        assert_eq!(serde_json::to_value(KeyParams::Empty {}).unwrap(), json!({}));
    }

    #[test]
    fn stored_key_params_fall_back_to_empty() {
        assert_eq!(KeyParams::from_stored(None), KeyParams::Empty {});
        assert_eq!(KeyParams::from_stored(Some("not json")), KeyParams::Empty {});
        assert_eq!(KeyParams::from_stored(Some("{}")), KeyParams::Empty {});
        assert_eq!(
            KeyParams::from_stored(Some(r#"{"shift":5,"direction":"gauche"}"#)),
            KeyParams::Shift { shift: 5, direction: ShiftDirection::Left }
        );
    }

    #[test]
    fn result_key_accepts_numbers_and_text() {
        let results: Vec<AttackResult> = serde_json::from_value(json!([
            {"key": 3, "plaintext": "HELLO", "is_likely": true},
            {"key": "MONARCHY", "plaintext": "XQ"}
        ]))
        .unwrap();

        assert_eq!(results[0].key, ResultKey::Number(3));
        assert_eq!(results[0].key.to_string(), "3");
        assert_eq!(results[1].key.to_string(), "MONARCHY");
        assert!(!results[1].is_likely);
    }

    #[test]
    fn conversation_messages_are_tagged() {
        let messages: Vec<ConversationMessage> = serde_json::from_value(json!([
            {
                "message_type": "crypto",
                "id": 1, "sender_id": 2, "receiver_id": 3,
                "sender": {"username": "bob"},
                "date_created": "2024-01-01T10:00:00",
                "encrypted": "KHOOR", "algo_name": "ceasar",
                "algorithm_key": "{\"shift\":3}"
            },
            {
                "message_type": "stego",
                "id": 2, "sender_id": 3, "receiver_id": 2,
                "audio_filename": "stego_1.wav"
            }
        ]))
        .unwrap();

        assert!(matches!(&messages[0], ConversationMessage::Crypto(m) if m.encrypted == "KHOOR"));
        assert_eq!(messages[0].sender().map(|u| u.username.as_str()), Some("bob"));
        assert!(matches!(&messages[1], ConversationMessage::Stego(m) if m.audio_filename == "stego_1.wav"));
        assert_eq!(messages[1].id(), 2);
    }
}
