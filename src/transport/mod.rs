//! Transport layer: URL building and JSON wire formats.

mod error_payload;
mod page;

use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::ListQuery;

pub use error_payload::decode_api_error_payload;
pub use page::decode_page;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Parse a base URL and make sure relative joins append to its path.
pub fn normalize_base_url(base: &str) -> Result<Url, TransportError> {
    let mut url = Url::parse(base.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// `{base}{collection}/` or `{base}{collection}/{id}/`.
pub fn resource_url(base: &Url, collection: &str, id: Option<u64>) -> Result<Url, TransportError> {
    let path = match id {
        Some(id) => format!("{collection}/{id}/"),
        None => format!("{collection}/"),
    };
    Ok(base.join(&path)?)
}

pub fn list_url(base: &Url, collection: &str, query: &ListQuery) -> Result<Url, TransportError> {
    let mut url = resource_url(base, collection, None)?;
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(page) = query.page {
            pairs.append_pair("page", &page.to_string());
        }
        if let Some(page_size) = query.page_size {
            pairs.append_pair("page_size", &page_size.to_string());
        }
        if let Some(search) = query.search.as_deref() {
            pairs.append_pair("search", search);
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }
    Ok(url)
}

pub fn encode_json<T: Serialize>(value: &T) -> Result<String, TransportError> {
    Ok(serde_json::to_string(value)?)
}

pub fn decode_json<T: DeserializeOwned>(json: &str) -> Result<T, TransportError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let base = normalize_base_url("https://api.example.invalid/api/v1").unwrap();
        assert_eq!(base.as_str(), "https://api.example.invalid/api/v1/");

        let base = normalize_base_url(" https://api.example.invalid/ ").unwrap();
        assert_eq!(base.as_str(), "https://api.example.invalid/");
    }

    #[test]
    fn resource_urls_keep_the_base_path() {
        let base = normalize_base_url("https://api.example.invalid/api").unwrap();
        assert_eq!(
            resource_url(&base, "clientes", None).unwrap().as_str(),
            "https://api.example.invalid/api/clientes/"
        );
        assert_eq!(
            resource_url(&base, "prestamos", Some(12)).unwrap().as_str(),
            "https://api.example.invalid/api/prestamos/12/"
        );
    }

    #[test]
    fn list_url_encodes_pagination_and_search() {
        let base = normalize_base_url("https://api.example.invalid/api/").unwrap();
        let query = ListQuery::default().page(2).page_size(20).search("maría lópez");
        assert_eq!(
            list_url(&base, "clientes", &query).unwrap().as_str(),
            "https://api.example.invalid/api/clientes/?page=2&page_size=20&search=mar%C3%ADa+l%C3%B3pez"
        );

        assert_eq!(
            list_url(&base, "bancos", &ListQuery::default())
                .unwrap()
                .as_str(),
            "https://api.example.invalid/api/bancos/"
        );
    }

    #[test]
    fn invalid_base_url_is_reported() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(TransportError::Url(_))
        ));
    }
}
