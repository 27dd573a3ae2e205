//! Dependencies shared by every application service

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::overlap::Claim;
use crate::domain::rental::RentalRepository;
use crate::domain::reservation::ReservationRepository;
use crate::domain::RepositoryProvider;
use crate::shared::{Clock, DomainError, DomainResult};

#[derive(Clone)]
pub struct ServiceContext {
    pub repos: Arc<dyn RepositoryProvider>,
    pub clock: Arc<dyn Clock>,
    /// Upper bound for one state-changing transaction
    pub operation_timeout: Duration,
}

impl ServiceContext {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        clock: Arc<dyn Clock>,
        operation_timeout: Duration,
    ) -> Self {
        Self {
            repos,
            clock,
            operation_timeout,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Run a transactional operation under the configured timeout.
    ///
    /// `op` is expected to open a unit of work and commit it. When the
    /// deadline passes, `op` is dropped together with its uncommitted
    /// transaction and the caller gets a retryable `Conflict`.
    pub async fn atomically<T, F>(&self, operation: &'static str, op: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        match tokio::time::timeout(self.operation_timeout, op).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.operation_timeout.as_millis() as u64,
                    "Operation timed out, rolled back"
                );
                Err(DomainError::Conflict(format!(
                    "{} timed out, retry",
                    operation
                )))
            }
        }
    }
}

/// Pending/confirmed reservations and active rentals holding `car_id`.
pub(crate) async fn blocking_claims(
    reservations: &dyn ReservationRepository,
    rentals: &dyn RentalRepository,
    car_id: i32,
) -> DomainResult<Vec<Claim>> {
    let mut claims: Vec<Claim> = reservations
        .find_blocking_for_cars(&[car_id])
        .await?
        .iter()
        .map(|r| r.claim())
        .collect();
    claims.extend(
        rentals
            .find_active_for_cars(&[car_id])
            .await?
            .iter()
            .map(|r| r.claim()),
    );
    Ok(claims)
}

/// Active rentals holding `car_id`.
pub(crate) async fn rental_claims(
    rentals: &dyn RentalRepository,
    car_id: i32,
) -> DomainResult<Vec<Claim>> {
    Ok(rentals
        .find_active_for_cars(&[car_id])
        .await?
        .iter()
        .map(|r| r.claim())
        .collect())
}
