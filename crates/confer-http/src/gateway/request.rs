//! Request description handed to the gateway.
//!
//! An [`ApiRequest`] is plain data so the refresh coordinator can send the
//! same request a second time after minting a new token.

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use confer_core::GatewayError;

use super::endpoints::Operation;

/// One call against a logical operation.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    operation: Operation,
    path_params: Vec<(&'static str, String)>,
    query: Vec<(String, String)>,
    body: RequestBody,
}

/// Request payload.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

impl ApiRequest {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            path_params: Vec::new(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Bind a `{name}` placeholder in the path template.
    pub fn path(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.path_params.push((name, value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Expand the path template into URL segments.
    pub(crate) fn path_segments(&self) -> Result<Vec<&str>, GatewayError> {
        let template = self.operation.path_template();

        template
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let Some(name) = segment
                    .strip_prefix('{')
                    .and_then(|rest| rest.strip_suffix('}'))
                else {
                    return Ok(segment);
                };

                self.path_params
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| value.as_str())
                    .filter(|value| !value.is_empty())
                    .ok_or_else(|| GatewayError::InvalidRequest {
                        message: format!("missing path parameter '{}' for {}", name, template),
                    })
            })
            .collect()
    }
}

/// A multipart body that can be rebuilt for every send.
///
/// `reqwest`'s own form is consumed on send, which rules out the retry after
/// a token refresh.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<MultipartPart>,
}

#[derive(Debug, Clone)]
struct MultipartPart {
    name: String,
    value: PartValue,
}

#[derive(Clone)]
enum PartValue {
    Text(String),
    File {
        bytes: Vec<u8>,
        file_name: String,
        mime: String,
    },
}

impl std::fmt::Debug for PartValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartValue::Text(text) => f.debug_tuple("Text").field(text).finish(),
            PartValue::File {
                bytes,
                file_name,
                mime,
            } => f
                .debug_struct("File")
                .field("len", &bytes.len())
                .field("file_name", file_name)
                .field("mime", mime)
                .finish(),
        }
    }
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(MultipartPart {
            name: name.into(),
            value: PartValue::Text(value.into()),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        bytes: Vec<u8>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
    ) -> Self {
        self.parts.push(MultipartPart {
            name: name.into(),
            value: PartValue::File {
                bytes,
                file_name: file_name.into(),
                mime: mime.into(),
            },
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Names of the parts, in order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|part| part.name.as_str())
    }

    pub(crate) fn to_form(&self) -> Result<Form, GatewayError> {
        self.parts.iter().try_fold(Form::new(), |form, part| {
            let name = part.name.clone();
            match &part.value {
                PartValue::Text(text) => Ok(form.text(name, text.clone())),
                PartValue::File {
                    bytes,
                    file_name,
                    mime,
                } => {
                    let file = Part::bytes(bytes.clone())
                        .file_name(file_name.clone())
                        .mime_str(mime)
                        .map_err(|e| GatewayError::InvalidRequest {
                            message: format!("invalid mime type '{}': {}", mime, e),
                        })?;
                    Ok(form.part(name, file))
                }
            }
        })
    }
}
