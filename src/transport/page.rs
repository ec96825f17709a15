use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::Page;
use crate::transport::TransportError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PageJson<T> {
    Envelope {
        count: u64,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
    Bare(Vec<T>),
}

/// Decode a list response: either a `{count, next, previous, results}`
/// envelope or, for unpaginated endpoints, a bare JSON array.
pub fn decode_page<T: DeserializeOwned>(json: &str) -> Result<Page<T>, TransportError> {
    let parsed: PageJson<T> = serde_json::from_str(json)?;
    Ok(match parsed {
        PageJson::Envelope {
            count,
            next,
            previous,
            results,
        } => Page {
            count,
            next,
            previous,
            results,
        },
        PageJson::Bare(results) => Page {
            count: results.len() as u64,
            next: None,
            previous: None,
            results,
        },
    })
}

#[cfg(test)]
mod tests {
    use crate::domain::{Bank, Customer, TipoPersona};

    use super::*;

    #[test]
    fn decodes_paginated_envelope() {
        let json = r#"
        {
          "count": 41,
          "next": "https://api.example.invalid/clientes/?page=2",
          "previous": null,
          "results": [
            {
              "id": 1,
              "nombre": "Ana",
              "apellido": "López",
              "email": "ana@tucredito.mx",
              "telefono": "+525512345678",
              "fecha_nacimiento": "1990-04-12",
              "tipo_persona": "fisica"
            }
          ]
        }
        "#;

        let page: Page<Customer> = decode_page(json).unwrap();
        assert_eq!(page.count, 41);
        assert!(page.has_next());
        assert_eq!(page.previous, None);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].full_name(), "Ana López");
        assert_eq!(page.results[0].tipo_persona, TipoPersona::Fisica);
    }

    #[test]
    fn decodes_bare_array() {
        let json = r#"[{"id": 3, "nombre": "Banorte"}, {"id": 4, "nombre": "BBVA", "tipo": "privado"}]"#;
        let page: Page<Bank> = decode_page(json).unwrap();
        assert_eq!(page.count, 2);
        assert!(!page.has_next());
        assert_eq!(page.results[1].tipo.as_deref(), Some("privado"));
    }

    #[test]
    fn rejects_unexpected_shapes() {
        assert!(decode_page::<Bank>(r#"{"items": []}"#).is_err());
    }
}
