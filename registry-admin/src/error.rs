use thiserror::Error;

/// Coarse failure class of a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request never produced a usable response.
    Network,
    /// 4xx: bad or duplicate input.
    Client,
    /// 5xx: internal fault, usually a duplicate key.
    Server,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Network => "network-error",
            ErrorClass::Client => "client-error",
            ErrorClass::Server => "server-error",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    #[error("Network error: {detail}")]
    Network { detail: String },
    #[error("Client error: {status}")]
    Client { status: u16, message: Option<String> },
    #[error("Server error: {status}")]
    Server { status: u16, message: Option<String> },
}

impl RemoteError {
    /// Classifies a non-2xx response, keeping the server's message if the body carries one.
    /// Statuses outside 4xx and 5xx mean no usable answer came back.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = server_message(body);
        match status {
            400..=499 => RemoteError::Client { status, message },
            500..=599 => RemoteError::Server { status, message },
            _ => RemoteError::network(format!("unexpected status {}", status)),
        }
    }

    /// The outgoing payload could not be turned into JSON; nothing was sent.
    pub fn encoding(err: serde_json::Error) -> Self {
        RemoteError::network(format!("could not encode request body: {}", err))
    }

    pub fn network(detail: impl Into<String>) -> Self {
        RemoteError::Network {
            detail: detail.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            RemoteError::Network { .. } => ErrorClass::Network,
            RemoteError::Client { .. } => ErrorClass::Client,
            RemoteError::Server { .. } => ErrorClass::Server,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Network { .. } => None,
            RemoteError::Client { status, .. } | RemoteError::Server { status, .. } => Some(*status),
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            RemoteError::Network { .. } => None,
            RemoteError::Client { message, .. } | RemoteError::Server { message, .. } => {
                message.as_deref()
            }
        }
    }

    /// Text shown in the error banner: the server's words when it gave any.
    pub fn user_message(&self) -> String {
        if let Some(message) = self.server_message() {
            return message.to_string();
        }
        match self {
            RemoteError::Network { detail } => format!("could not reach the server ({})", detail),
            RemoteError::Client { .. } => {
                "invalid data, check that all required fields are filled in correctly".to_string()
            }
            RemoteError::Server { .. } => {
                "internal server error, check for duplicate data (national ID / email)".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::network(err.to_string())
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::network(format!("invalid response body: {}", err))
    }
}

fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}

/// Rejected input at the form boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown field `{0}`")]
    Unknown(String),
    #[error("`{field}` expects a numeric identifier, got `{value}`")]
    InvalidId { field: &'static str, value: String },
    #[error("`{field}` expects a date as YYYY-MM-DD, got `{value}`")]
    InvalidDate { field: &'static str, value: String },
}

impl FieldError {
    /// The known field whose input was rejected; `None` for unknown names.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            FieldError::Unknown(_) => None,
            FieldError::InvalidId { field, .. } | FieldError::InvalidDate { field, .. } => {
                Some(*field)
            }
        }
    }

    pub fn rejected_value(&self) -> Option<&str> {
        match self {
            FieldError::Unknown(_) => None,
            FieldError::InvalidId { value, .. } | FieldError::InvalidDate { value, .. } => {
                Some(value.as_str())
            }
        }
    }
}

/// Why a draft cannot be submitted: empty required fields and inputs that
/// were rejected by `set_field` and not corrected since.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", describe_validation(.missing, .invalid))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
    pub invalid: Vec<FieldError>,
}

impl ValidationError {
    pub fn missing(missing: Vec<&'static str>) -> Self {
        Self {
            missing,
            invalid: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

fn describe_validation(missing: &[&'static str], invalid: &[FieldError]) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("required fields missing: {}", missing.join(", ")));
    }
    if !invalid.is_empty() {
        let reasons: Vec<String> = invalid.iter().map(ToString::to_string).collect();
        parts.push(format!("invalid values: {}", reasons.join("; ")));
    }
    parts.join("; ")
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("the student has no linked person record")]
    MissingPerson,
}

impl SubmitError {
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Remote(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}
