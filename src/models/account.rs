//! Account entity with a role discriminator.
//!
//! Providers and clients share one entity and one canonical lookup path
//! (by id); provider-role accounts additionally carry a [`ProviderProfile`]
//! with rate and offering configuration.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role discriminator for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Client,
    Provider,
}

/// How a session is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationMethod {
    Video,
    Audio,
    Chat,
    InPerson,
}

/// Whether a session is individual or a group class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    OneOnOne,
    OneToMany,
}

/// Provider-specific configuration.
///
/// Empty `consultation_methods` / `session_types` mean "no restriction":
/// the provider accepts any value a client requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProfile {
    /// Rate used for price computation, in the platform currency per hour.
    pub hourly_rate: f64,
    #[serde(default)]
    pub consultation_methods: Vec<ConsultationMethod>,
    #[serde(default)]
    pub session_types: Vec<SessionType>,
}

impl ProviderProfile {
    /// Whether the given method is accepted by this provider.
    pub fn accepts_method(&self, method: ConsultationMethod) -> bool {
        self.consultation_methods.is_empty() || self.consultation_methods.contains(&method)
    }

    /// Whether the given session type is accepted by this provider.
    pub fn accepts_session_type(&self, session_type: SessionType) -> bool {
        self.session_types.is_empty() || self.session_types.contains(&session_type)
    }
}

/// A platform account (client or provider).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub role: AccountRole,
    pub display_name: String,
    /// Present only for provider-role accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_profile: Option<ProviderProfile>,
}

impl Account {
    /// Create a client-role account.
    pub fn client(id: Uuid, display_name: impl Into<String>) -> Self {
        Self {
            id,
            role: AccountRole::Client,
            display_name: display_name.into(),
            provider_profile: None,
        }
    }

    /// Create a provider-role account with the given profile.
    pub fn provider(id: Uuid, display_name: impl Into<String>, profile: ProviderProfile) -> Self {
        Self {
            id,
            role: AccountRole::Provider,
            display_name: display_name.into(),
            provider_profile: Some(profile),
        }
    }
}
