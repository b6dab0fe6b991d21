//! Real-time communication collaborator: join-token minting.
//!
//! Invoked only after [`crate::scheduling::access::can_join_now`] admits the
//! request; the vendor integration itself is external to this engine.

use async_trait::async_trait;
use uuid::Uuid;

/// Participant role inside the live-session room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantRole {
    Host,
    Attendee,
}

impl ParticipantRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Attendee => "attendee",
        }
    }
}

/// Mints join tokens for live-session rooms.
#[async_trait]
pub trait TokenMinter: Send + Sync {
    async fn mint_join_token(
        &self,
        channel_name: &str,
        participant_id: Uuid,
        role: ParticipantRole,
        ttl_seconds: u64,
    ) -> anyhow::Result<String>;
}

/// Deterministic token minter for development and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTokenMinter;

#[async_trait]
impl TokenMinter for StaticTokenMinter {
    async fn mint_join_token(
        &self,
        channel_name: &str,
        participant_id: Uuid,
        role: ParticipantRole,
        ttl_seconds: u64,
    ) -> anyhow::Result<String> {
        Ok(format!(
            "tok:{}:{}:{}:{}",
            channel_name,
            participant_id,
            role.as_str(),
            ttl_seconds
        ))
    }
}
