//! Query strings from typed parameter structs.
//!
//! Each parameter struct implements [`QueryParams`] by listing its fields in
//! declaration order. Only present values are emitted:
//!
//! - integers greater than zero
//! - non-empty strings
//! - timestamps that are set, as RFC 3339
//!
//! Booleans, floats and nested structs are never emitted, so the server-side
//! default always applies to them.

use chrono::{DateTime, SecondsFormat, Utc};

/// A struct whose fields project onto URL query parameters.
pub trait QueryParams {
    /// Write every field into `query`, in declaration order.
    fn write_query(&self, query: &mut QueryBuilder);

    /// The emitted `(name, value)` pairs.
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut query = QueryBuilder::default();
        self.write_query(&mut query);
        query.into_pairs()
    }
}

/// Collects query pairs, skipping values that are not present.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryBuilder {
    pairs: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Emit `value` if it is greater than zero.
    pub fn int(&mut self, name: &str, value: impl Into<i64>) -> &mut Self {
        let value = value.into();
        if value > 0 {
            self.pairs.push((name.to_string(), value.to_string()));
        }
        self
    }

    /// Emit `value` if it is non-empty.
    pub fn string(&mut self, name: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.pairs.push((name.to_string(), value.to_string()));
        }
        self
    }

    /// Emit an optional string if it is set and non-empty.
    pub fn opt_string(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) => self.string(name, v),
            None => self,
        }
    }

    /// Emit a timestamp as RFC 3339 if it is set.
    pub fn timestamp(&mut self, name: &str, value: Option<&DateTime<Utc>>) -> &mut Self {
        if let Some(ts) = value {
            self.pairs
                .push((name.to_string(), ts.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        self
    }

    /// True when nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The emitted pairs.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Consume into the emitted pairs.
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }

    /// Form-encode the pairs, keeping their order.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// Append the encoded pairs to `path`, adding `?` only when something was emitted.
    pub fn append_to(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, self.encode())
        }
    }
}

/// Append the query for `params` to `path`.
pub fn with_query<P: QueryParams + ?Sized>(path: &str, params: &P) -> String {
    let mut query = QueryBuilder::default();
    params.write_query(&mut query);
    query.append_to(path)
}
