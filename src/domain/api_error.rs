use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::domain::validation::FieldValidationError;

/// Field-keyed validation messages, in the order the API sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMessages(Vec<(String, Vec<String>)>);

impl FieldMessages {
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        Self(entries)
    }

    /// `true` when no field carries at least one message.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|(_, messages)| messages.is_empty())
    }

    /// Every `(field, message)` pair, fields in order, messages in order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(field, messages)| {
            messages
                .iter()
                .map(move |message| (field.as_str(), message.as_str()))
        })
    }

    /// Group form errors by field, fields in order of first appearance.
    pub fn from_field_errors(errors: &[FieldValidationError]) -> Self {
        let mut entries: Vec<(String, Vec<String>)> = Vec::new();
        for error in errors {
            match entries.iter_mut().find(|(field, _)| *field == error.field_key) {
                Some((_, messages)) => messages.push(error.message.clone()),
                None => entries.push((error.field_key.clone(), vec![error.message.clone()])),
            }
        }
        Self(entries)
    }
}

impl Serialize for FieldMessages {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, messages) in &self.0 {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

impl<K, M> FromIterator<(K, M)> for FieldMessages
where
    K: Into<String>,
    M: IntoIterator,
    M::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, M)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(field, messages)| {
                    (
                        field.into(),
                        messages.into_iter().map(Into::into).collect(),
                    )
                })
                .collect(),
        )
    }
}

/// Error body returned by the lending API.
///
/// Every part is optional and several may be present at once; use
/// [`ApiErrorPayload::body`] to pick the one that should be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiErrorPayload {
    pub detail: Option<String>,
    pub message: Option<String>,
    pub errors: Option<FieldMessages>,
    pub details: Option<FieldMessages>,
}

/// The single part of an [`ApiErrorPayload`] that is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorBody {
    Details(FieldMessages),
    Errors(FieldMessages),
    Detail(String),
    Message(String),
}

impl ApiErrorPayload {
    /// Highest-priority populated part: `details`, then `errors`, then
    /// `detail`, then `message`. Empty maps and blank strings are skipped.
    pub fn body(&self) -> Option<ApiErrorBody> {
        let populated_map = |map: &Option<FieldMessages>| {
            map.as_ref().filter(|map| !map.is_empty()).cloned()
        };
        let populated_text = |text: &Option<String>| {
            text.as_ref()
                .filter(|text| !text.trim().is_empty())
                .cloned()
        };

        populated_map(&self.details)
            .map(ApiErrorBody::Details)
            .or_else(|| populated_map(&self.errors).map(ApiErrorBody::Errors))
            .or_else(|| populated_text(&self.detail).map(ApiErrorBody::Detail))
            .or_else(|| populated_text(&self.message).map(ApiErrorBody::Message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(field: &str, message: &str) -> FieldMessages {
        [(field, [message])].into_iter().collect()
    }

    #[test]
    fn details_win_over_everything_else() {
        let payload = ApiErrorPayload {
            detail: Some("detail".to_owned()),
            message: Some("message".to_owned()),
            errors: Some(messages("nombre", "from errors")),
            details: Some(messages("email", "required")),
        };
        assert_eq!(
            payload.body(),
            Some(ApiErrorBody::Details(messages("email", "required")))
        );
    }

    #[test]
    fn empty_parts_fall_through() {
        let payload = ApiErrorPayload {
            detail: Some("   ".to_owned()),
            message: Some("Algo salió mal".to_owned()),
            errors: Some(FieldMessages::new(vec![("email".to_owned(), Vec::new())])),
            details: Some(FieldMessages::default()),
        };
        assert_eq!(
            payload.body(),
            Some(ApiErrorBody::Message("Algo salió mal".to_owned()))
        );
        assert_eq!(ApiErrorPayload::default().body(), None);
    }

    #[test]
    fn form_errors_group_by_field_and_serialize_in_order() {
        let errors = [
            FieldValidationError::new("termMonths", "a"),
            FieldValidationError::new("principal", "b"),
            FieldValidationError::new("termMonths", "c"),
        ];
        let fields = FieldMessages::from_field_errors(&errors);
        assert_eq!(
            serde_json::to_string(&fields).unwrap(),
            r#"{"termMonths":["a","c"],"principal":["b"]}"#
        );
    }

    #[test]
    fn pairs_flatten_in_order() {
        let fields: FieldMessages = [
            ("monto", vec!["a", "b"]),
            ("email", vec!["c"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            fields.pairs().collect::<Vec<_>>(),
            vec![("monto", "a"), ("monto", "b"), ("email", "c")]
        );
    }
}
