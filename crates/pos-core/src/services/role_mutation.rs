// ============================================================================
// POS Core - Role Mutation State
// File: crates/pos-core/src/services/role_mutation.rs
// Description: Optimistic permission update lifecycle for one role
// ============================================================================
//! `Idle -> Pending -> {Committed | RolledBack}`
//!
//! `Pending` holds the pre-mutation snapshot so a failed submission restores
//! exactly what was on screen before the click.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationPhase {
    Idle,
    Pending {
        snapshot: BTreeSet<Uuid>,
        optimistic: BTreeSet<Uuid>,
    },
    Committed,
    RolledBack,
}

impl MutationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationPhase::Idle => "idle",
            MutationPhase::Pending { .. } => "pending",
            MutationPhase::Committed => "committed",
            MutationPhase::RolledBack => "rolled_back",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoleMutation {
    role_id: Uuid,
    confirmed: BTreeSet<Uuid>,
    phase: MutationPhase,
}

impl RoleMutation {
    pub fn new(role_id: Uuid, confirmed: BTreeSet<Uuid>) -> Self {
        Self {
            role_id,
            confirmed,
            phase: MutationPhase::Idle,
        }
    }

    pub fn role_id(&self) -> Uuid {
        self.role_id
    }

    pub fn phase(&self) -> &MutationPhase {
        &self.phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, MutationPhase::Pending { .. })
    }

    pub fn confirmed(&self) -> &BTreeSet<Uuid> {
        &self.confirmed
    }

    /// What the matrix shows: the optimistic set while pending, else confirmed.
    pub fn displayed(&self) -> &BTreeSet<Uuid> {
        match &self.phase {
            MutationPhase::Pending { optimistic, .. } => optimistic,
            _ => &self.confirmed,
        }
    }

    pub fn begin(&mut self, optimistic: BTreeSet<Uuid>) -> Result<(), DomainError> {
        if self.is_pending() {
            return Err(DomainError::MutationAlreadyPending(self.role_id));
        }
        self.phase = MutationPhase::Pending {
            snapshot: self.confirmed.clone(),
            optimistic,
        };
        Ok(())
    }

    /// Adopts `server` when the API echoed the role back, else the optimistic set.
    pub fn commit(&mut self, server: Option<BTreeSet<Uuid>>) -> Result<&BTreeSet<Uuid>, DomainError> {
        let phase = std::mem::replace(&mut self.phase, MutationPhase::Committed);
        match phase {
            MutationPhase::Pending { optimistic, .. } => {
                self.confirmed = server.unwrap_or(optimistic);
                Ok(&self.confirmed)
            }
            other => {
                self.phase = other;
                Err(DomainError::NoPendingMutation(self.role_id))
            }
        }
    }

    pub fn rollback(&mut self) -> Result<&BTreeSet<Uuid>, DomainError> {
        let phase = std::mem::replace(&mut self.phase, MutationPhase::RolledBack);
        match phase {
            MutationPhase::Pending { snapshot, .. } => {
                self.confirmed = snapshot;
                Ok(&self.confirmed)
            }
            other => {
                self.phase = other;
                Err(DomainError::NoPendingMutation(self.role_id))
            }
        }
    }

    /// Server refresh. Ignored while a submission is in flight.
    pub fn reconcile(&mut self, server: BTreeSet<Uuid>) -> bool {
        if self.is_pending() {
            return false;
        }
        self.confirmed = server;
        true
    }
}
