use std::fmt;

use serde::Deserialize;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};

use crate::domain::{ApiErrorPayload, FieldMessages};
use crate::transport::TransportError;

#[derive(Debug, Default, Deserialize)]
struct ErrorPayloadJson {
    #[serde(default)]
    detail: LenientText,
    #[serde(default)]
    message: LenientText,
    #[serde(default)]
    errors: Option<FieldMessagesJson>,
    #[serde(default)]
    details: Option<FieldMessagesJson>,
}

/// A string, or nothing when the API sent another JSON type.
#[derive(Debug, Default)]
struct LenientText(Option<String>);

impl<'de> Deserialize<'de> for LenientText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(text) => Self(Some(text)),
            _ => Self(None),
        })
    }
}

/// Field map that keeps the key order of the JSON object.
///
/// Each value may be a list of strings or a single string; other JSON values are
/// kept as their JSON text. A non-object value decodes as an empty map.
#[derive(Debug, Default)]
struct FieldMessagesJson(Vec<(String, Vec<String>)>);

impl<'de> Deserialize<'de> for FieldMessagesJson {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(FieldMessagesVisitor)
    }
}

struct FieldMessagesVisitor;

impl<'de> Visitor<'de> for FieldMessagesVisitor {
    type Value = FieldMessagesJson;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of field names to messages")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::new();
        while let Some((field, value)) = map.next_entry::<String, serde_json::Value>()? {
            entries.push((field, messages_from_value(value)));
        }
        Ok(FieldMessagesJson(entries))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(FieldMessagesJson::default())
    }

    fn visit_str<E>(self, _: &str) -> Result<Self::Value, E> {
        Ok(FieldMessagesJson::default())
    }

    fn visit_bool<E>(self, _: bool) -> Result<Self::Value, E> {
        Ok(FieldMessagesJson::default())
    }

    fn visit_i64<E>(self, _: i64) -> Result<Self::Value, E> {
        Ok(FieldMessagesJson::default())
    }

    fn visit_u64<E>(self, _: u64) -> Result<Self::Value, E> {
        Ok(FieldMessagesJson::default())
    }

    fn visit_f64<E>(self, _: f64) -> Result<Self::Value, E> {
        Ok(FieldMessagesJson::default())
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(FieldMessagesJson::default())
    }
}

fn messages_from_value(value: serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::String(text) => vec![text],
        serde_json::Value::Array(items) => items.into_iter().map(message_text).collect(),
        serde_json::Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

fn message_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Decode an error response body.
pub fn decode_api_error_payload(json: &str) -> Result<ApiErrorPayload, TransportError> {
    let parsed: ErrorPayloadJson = serde_json::from_str(json)?;
    Ok(ApiErrorPayload {
        detail: parsed.detail.0,
        message: parsed.message.0,
        errors: parsed.errors.map(|map| FieldMessages::new(map.0)),
        details: parsed.details.map(|map| FieldMessages::new(map.0)),
    })
}

#[cfg(test)]
mod tests {
    use crate::domain::ApiErrorBody;

    use super::*;

    #[test]
    fn field_order_follows_the_response_body() {
        let json = r#"
        {
          "details": {
            "telefono": ["Ingrese un teléfono válido"],
            "email": ["Ya existe un cliente con este email", "Formato inválido"],
            "apellido": "Este campo es requerido"
          }
        }
        "#;

        let payload = decode_api_error_payload(json).unwrap();
        let details = payload.details.unwrap();
        assert_eq!(
            details.pairs().collect::<Vec<_>>(),
            vec![
                ("telefono", "Ingrese un teléfono válido"),
                ("email", "Ya existe un cliente con este email"),
                ("email", "Formato inválido"),
                ("apellido", "Este campo es requerido"),
            ]
        );
    }

    #[test]
    fn flat_strings_and_missing_parts() {
        let payload = decode_api_error_payload(r#"{"detail": "No encontrado."}"#).unwrap();
        assert_eq!(payload.detail.as_deref(), Some("No encontrado."));
        assert_eq!(payload.message, None);
        assert_eq!(payload.errors, None);
        assert_eq!(
            payload.body(),
            Some(ApiErrorBody::Detail("No encontrado.".to_owned()))
        );
    }

    #[test]
    fn unexpected_types_are_tolerated() {
        let json = r#"
        {
          "detail": {"code": 7},
          "message": "Solicitud inválida",
          "errors": "not a map",
          "details": [1, 2]
        }
        "#;
        let payload = decode_api_error_payload(json).unwrap();
        assert_eq!(payload.detail, None);
        assert_eq!(
            payload.body(),
            Some(ApiErrorBody::Message("Solicitud inválida".to_owned()))
        );
    }

    #[test]
    fn non_string_messages_keep_their_json_text() {
        let payload =
            decode_api_error_payload(r#"{"errors": {"plazo_meses": [12, {"max": 600}]}}"#)
                .unwrap();
        assert_eq!(
            payload.errors.unwrap().pairs().collect::<Vec<_>>(),
            vec![("plazo_meses", "12"), ("plazo_meses", r#"{"max":600}"#)]
        );
    }

    #[test]
    fn non_json_body_is_an_error() {
        assert!(decode_api_error_payload("<html>502 Bad Gateway</html>").is_err());
        assert!(decode_api_error_payload("").is_err());
    }
}
