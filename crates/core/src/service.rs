//! Customer intake service.
//!
//! [`CustomerService`] is the entry point for creating and reading customer records. It owns
//! the storage port and the identifier generator, both injectable, and is cheap to clone.

use crate::config::CoreConfig;
use crate::constants::MAX_ID_ATTEMPTS;
use crate::customer::{CustomerRecord, CustomerSubmission, Job};
use crate::storage::{CustomerStore, FsCustomerStore};
use crate::{IntakeError, IntakeResult};
use intake_uuid::{ClientId, ClientIdGenerator, RandomClientIdGenerator};
use std::sync::Arc;

#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
    ids: Arc<dyn ClientIdGenerator>,
}

impl std::fmt::Debug for CustomerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerService").finish_non_exhaustive()
    }
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>, ids: Arc<dyn ClientIdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Filesystem store under the configured data directory and random UUID v4 identifiers.
    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(
            Arc::new(FsCustomerStore::new(cfg.customers_dir())),
            Arc::new(RandomClientIdGenerator),
        )
    }

    /// Validates a submission and persists it as a new customer record.
    ///
    /// # Process
    ///
    /// 1. Validates every field; nothing is written if any field is rejected.
    /// 2. Allocates a fresh client id.
    /// 3. Computes the follow-up date (service date plus three calendar months).
    /// 4. Writes the record as one pretty JSON document.
    ///
    /// If the store reports the id as taken, a new id is generated, up to
    /// [`MAX_ID_ATTEMPTS`] times. Existing records are never overwritten.
    ///
    /// # Errors
    ///
    /// - [`IntakeError::Validation`] naming each rejected field.
    /// - [`IntakeError::IdentifierSpaceExhausted`] if every attempted id was taken.
    /// - Any storage error from the store; in that case no partial record remains.
    pub fn create_customer(&self, submission: CustomerSubmission) -> IntakeResult<ClientId> {
        let validated = submission.validate_into()?;

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let client_id = self.ids.generate();
            let record = CustomerRecord::new(client_id, validated.clone());
            let document = record.to_document()?;

            match self.store.write(&client_id, &document) {
                Ok(()) => {
                    tracing::info!(%client_id, "customer record created");
                    return Ok(client_id);
                }
                Err(IntakeError::IdentifierCollision(taken)) => {
                    tracing::warn!(client_id = %taken, attempt, "client id already in use, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(IntakeError::IdentifierSpaceExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    /// Returns the stored document for `client_id` exactly as it was written.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::NotFound`] if no record exists.
    pub fn get_customer(&self, client_id: &ClientId) -> IntakeResult<String> {
        self.store
            .read(client_id)?
            .ok_or(IntakeError::NotFound(*client_id))
    }

    /// Like [`get_customer`](Self::get_customer), but decoded.
    pub fn get_record(&self, client_id: &ClientId) -> IntakeResult<CustomerRecord> {
        CustomerRecord::from_document(&self.get_customer(client_id)?)
    }

    /// Every stored record as a [`Job`], most recent service date first.
    ///
    /// Documents that no longer decode are skipped with a warning.
    pub fn list_jobs(&self) -> IntakeResult<Vec<Job>> {
        let mut jobs: Vec<Job> = self
            .store
            .list()?
            .into_iter()
            .filter_map(|(client_id, document)| {
                match CustomerRecord::from_document(&document) {
                    Ok(record) => Some(Job::from(&record)),
                    Err(e) => {
                        tracing::warn!(%client_id, "skipping unreadable customer record: {}", e);
                        None
                    }
                }
            })
            .collect();

        jobs.sort_by(|a, b| {
            b.last_service_date
                .cmp(&a.last_service_date)
                .then_with(|| a.client_id.cmp(&b.client_id))
        });
        Ok(jobs)
    }
}
