//! Caller identity and paging values shared by every operation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Kind of principal a request is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorType {
    Owner,
    Agent,
    Admin,
    Application,
}

impl AuthorType {
    /// Wire form, as sent in the `author-type` header.
    pub fn as_str(self) -> &'static str {
        match self {
            AuthorType::Owner => "owner",
            AuthorType::Agent => "agent",
            AuthorType::Admin => "admin",
            AuthorType::Application => "application",
        }
    }
}

impl fmt::Display for AuthorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthorType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(AuthorType::Owner),
            "agent" => Ok(AuthorType::Agent),
            "admin" => Ok(AuthorType::Admin),
            "application" => Ok(AuthorType::Application),
            _ => Err(ValidationError::UnknownAuthorType(s.to_string())),
        }
    }
}

/// The principal a request is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestAuthor {
    pub name: String,
    #[serde(rename = "type")]
    pub author_type: AuthorType,
}

impl RequestAuthor {
    pub fn new(name: impl Into<String>, author_type: AuthorType) -> Self {
        Self {
            name: name.into(),
            author_type,
        }
    }
}

/// Who is calling: the client application code and the request author.
///
/// `author` is optional at the type level so a missing author can be
/// reported as a `ValidationError` rather than ruled out at compile time;
/// every operation requires it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
    pub client_code: String,
    pub author: Option<RequestAuthor>,
}

impl ClientContext {
    pub fn new(client_code: impl Into<String>, author: RequestAuthor) -> Self {
        Self {
            client_code: client_code.into(),
            author: Some(author),
        }
    }

    /// Context without an author. Operations will reject it.
    pub fn anonymous(client_code: impl Into<String>) -> Self {
        Self {
            client_code: client_code.into(),
            author: None,
        }
    }
}

/// Paging parameters for list and search operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageSpec {
    /// Upper bound on the number of results the service should consider.
    pub max: u32,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageSpec {
    pub fn new(max: u32) -> Self {
        Self {
            max,
            page: None,
            size: None,
        }
    }

    pub fn with_page(mut self, page: u32, size: u32) -> Self {
        self.page = Some(page);
        self.size = Some(size);
        self
    }

    /// Query pairs in wire order: `max`, then `page` and `size` when set.
    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("max".to_string(), self.max.to_string())];
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_type_parses_case_insensitively() {
        assert_eq!("ADMIN".parse::<AuthorType>().unwrap(), AuthorType::Admin);
        assert_eq!(" application ".parse::<AuthorType>().unwrap(), AuthorType::Application);
    }

    #[test]
    fn author_type_rejects_unknown_text() {
        let err = "robot".parse::<AuthorType>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownAuthorType("robot".to_string()));
    }

    #[test]
    fn author_serializes_type_field() {
        let author = RequestAuthor::new("jdoe", AuthorType::Agent);
        let json = serde_json::to_value(&author).unwrap();
        assert_eq!(json["name"], "jdoe");
        assert_eq!(json["type"], "agent");
    }

    #[test]
    fn page_spec_emits_max_only_by_default() {
        assert_eq!(
            PageSpec::new(100).query_pairs(),
            vec![("max".to_string(), "100".to_string())]
        );
    }

    #[test]
    fn page_spec_page_and_size_are_independent() {
        let spec = PageSpec {
            max: 10,
            page: None,
            size: Some(5),
        };
        assert_eq!(
            spec.query_pairs(),
            vec![
                ("max".to_string(), "10".to_string()),
                ("size".to_string(), "5".to_string()),
            ]
        );
        assert_eq!(PageSpec::new(10).with_page(2, 20).query_pairs().len(), 3);
    }
}
