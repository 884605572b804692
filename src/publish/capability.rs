use serde::Serialize;
use std::fmt;

/// Opaque access token for a platform API
///
/// Never printed: `Debug` is redacted and serialization is skipped
/// wherever a record holding one is returned to callers.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Empty tokens are treated as absent
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// What the dispatcher can do for one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// No credential resolved; publishing is simulated and always succeeds
    Simulated,
    Live(Credential),
}

impl Capability {
    pub fn from_credential(credential: Option<Credential>) -> Self {
        match credential {
            Some(credential) => Capability::Live(credential),
            None => Capability::Simulated,
        }
    }

    pub fn mode(&self) -> PublishMode {
        match self {
            Capability::Simulated => PublishMode::Simulation,
            Capability::Live(_) => PublishMode::Live,
        }
    }
}

/// Mode tag reported in every publish result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishMode {
    Simulation,
    Live,
    Error,
}
