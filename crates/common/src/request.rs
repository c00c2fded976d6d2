//! Read-only view of an inbound portal request.
//!
//! The processor never consumes the request: the body is held as [`Bytes`]
//! so a deferred pass (portlet gate not ready yet) can re-read everything on
//! retry.

use std::{collections::HashMap, fmt};

use {bytes::Bytes, http::Method};

/// Identifies one inbound request across retry passes.
///
/// Committed parameter state is keyed by this id rather than by the request
/// value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(uuid::Uuid);

impl RequestId {
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Inbound request as seen by target resolution and parameter collection:
/// named multi-valued parameters, an optional multipart body, a declared
/// character encoding, and the structured portal-path segment.
#[derive(Debug, Clone)]
pub struct PortalRequest {
    id: RequestId,
    method: Method,
    parameters: HashMap<String, Vec<String>>,
    content_type: Option<String>,
    body: Bytes,
    character_encoding: Option<String>,
    portal_path: Option<String>,
}

impl PortalRequest {
    #[must_use]
    pub fn builder() -> PortalRequestBuilder {
        PortalRequestBuilder::default()
    }

    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// First value of the named parameter, if present.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    #[must_use]
    pub fn parameter_values(&self, name: &str) -> Option<&[String]> {
        self.parameters.get(name).map(Vec::as_slice)
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.parameters
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Character encoding declared on the request, if any.
    #[must_use]
    pub fn character_encoding(&self) -> Option<&str> {
        self.character_encoding.as_deref()
    }

    /// Raw structured portal-path segment ("uP file"), if the URL carried one.
    #[must_use]
    pub fn portal_path(&self) -> Option<&str> {
        self.portal_path.as_deref()
    }

    /// True when the body should go through multipart absorption: a POST
    /// whose declared content type is `multipart/*`.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.method == Method::POST
            && self
                .content_type
                .as_deref()
                .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/"))
    }
}

/// Builder for [`PortalRequest`]; used by the container adapter and tests.
#[derive(Debug, Default)]
pub struct PortalRequestBuilder {
    method: Option<Method>,
    parameters: HashMap<String, Vec<String>>,
    content_type: Option<String>,
    body: Option<Bytes>,
    character_encoding: Option<String>,
    portal_path: Option<String>,
}

impl PortalRequestBuilder {
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Append one value to the named parameter.
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Replace the named parameter with the given value array.
    #[must_use]
    pub fn parameters<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.parameters
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn character_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.character_encoding = Some(encoding.into());
        self
    }

    #[must_use]
    pub fn portal_path(mut self, path: impl Into<String>) -> Self {
        self.portal_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn build(self) -> PortalRequest {
        PortalRequest {
            id: RequestId::new(),
            method: self.method.unwrap_or(Method::GET),
            parameters: self.parameters,
            content_type: self.content_type,
            body: self.body.unwrap_or_default(),
            character_encoding: self.character_encoding,
            portal_path: self.portal_path,
        }
    }
}
