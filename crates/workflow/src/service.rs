//! Command boundary for document creation.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use erha_auth::{AuthorizationResolver, CommandAuthorization, Principal, authorize_command};
use erha_core::DocumentId;
use erha_numbering::{SequenceGenerator, SequenceStore};

use crate::{DocumentKind, NumberedCommand, WorkflowError};

/// A created document and the number it was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedDocument {
    pub id: DocumentId,
    pub kind: DocumentKind,
    /// Formatted number, e.g. `QUO-2025-00001`.
    pub number: String,
    pub sequence_value: i64,
}

/// Authorizes commands against the role table and allocates document numbers.
///
/// The allocated number is committed before it is returned; persisting the
/// document itself is the caller's job. A failure after allocation leaves a
/// gap in the sequence, never a duplicate.
#[derive(Debug, Clone)]
pub struct DocumentService<S> {
    resolver: AuthorizationResolver,
    numbers: SequenceGenerator<S>,
}

impl<S> DocumentService<S>
where
    S: SequenceStore,
{
    pub fn new(resolver: AuthorizationResolver, store: S) -> Self {
        Self {
            resolver,
            numbers: SequenceGenerator::new(store),
        }
    }

    pub fn resolver(&self) -> &AuthorizationResolver {
        &self.resolver
    }

    pub fn numbers(&self) -> &SequenceGenerator<S> {
        &self.numbers
    }

    /// Authorize, validate, then allocate the next number for `year`.
    #[instrument(
        skip(self, principal, command),
        fields(principal_id = %principal.principal_id(), kind = %command.kind()),
        err
    )]
    pub async fn create<C>(
        &self,
        principal: &Principal,
        command: &C,
        year: i32,
    ) -> Result<NumberedDocument, WorkflowError>
    where
        C: NumberedCommand + Sync,
    {
        authorize_command(&self.resolver, principal, command)?;
        command.validate()?;

        let kind = command.kind();
        let key = kind.sequence_key(year)?;
        let allocated = self
            .numbers
            .next_number(&key, &kind.number_format(year))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "number allocation failed"))?;

        let document = NumberedDocument {
            id: DocumentId::new(),
            kind,
            number: allocated.formatted,
            sequence_value: allocated.value,
        };
        tracing::info!(document_id = %document.id, number = %document.number, "document numbered");
        Ok(document)
    }

    /// Authorization-only gate for commands that allocate nothing.
    pub fn perform<C>(&self, principal: &Principal, command: &C) -> Result<(), WorkflowError>
    where
        C: CommandAuthorization + ?Sized,
    {
        authorize_command(&self.resolver, principal, command)?;
        Ok(())
    }
}
