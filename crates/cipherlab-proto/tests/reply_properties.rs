//! Property-based tests for reply decoding and endpoint paths.

use cipherlab_proto::{Ack, Endpoint, ProtoError, Reply, UNKNOWN_ERROR, UserCheck};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn prop_rejection_message_is_preserved(message in "\\PC{0,64}") {
        let reply = Reply::<Ack>::from_value(json!({"success": false, "message": message.clone()}))
            .unwrap();

        let expected = if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message.trim().to_string()
        };
        prop_assert_eq!(reply, Reply::Err { message: expected });
    }

    #[test]
    fn prop_rejection_ignores_payload_shape(exists in any::<bool>(), extra in "x[a-z]{1,8}") {
        // A rejected check-user never yields a payload, even if the object
        // happens to carry one.
        let reply = Reply::<UserCheck>::from_value(json!({
            "success": false, "exists": exists, extra: 1
        }))
        .unwrap();
        prop_assert!(matches!(reply, Reply::Err { .. }), "expected Reply::Err, got {:?}", reply);
    }

    #[test]
    fn prop_audio_path_never_contains_separator(prefix in "[a-z0-9_]{0,8}", suffix in "[a-z0-9_.]{0,8}") {
        let name = format!("{prefix}/{suffix}");
        prop_assert_eq!(
            Endpoint::StegoAudio(name.clone()).path(),
            Err(ProtoError::InvalidPathSegment(name))
        );
    }

    #[test]
    fn prop_audio_path_refuses_percent_escapes(prefix in "[a-z0-9_]{0,8}", escape in "%(2[eEfF]|5[cC])") {
        let name = format!("{prefix}{escape}stego.wav");
        prop_assert_eq!(
            Endpoint::StegoAudio(name.clone()).path(),
            Err(ProtoError::InvalidPathSegment(name))
        );
    }
}
