//! Services shared by every API handler

use std::sync::Arc;

use crate::application::{
    CarRegistry, CustomerService, IdentityService, InsuranceService, LocationService,
    MaintenanceService, PaymentService, RentalService, ReservationService, ServiceContext,
};
use crate::domain::PricingPolicy;
use crate::infrastructure::crypto::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub cars: Arc<CarRegistry>,
    pub customers: Arc<CustomerService>,
    pub locations: Arc<LocationService>,
    pub reservations: Arc<ReservationService>,
    pub rentals: Arc<RentalService>,
    pub payments: Arc<PaymentService>,
    pub maintenance: Arc<MaintenanceService>,
    pub insurance: Arc<InsuranceService>,
    pub identity: Arc<IdentityService>,
}

impl AppState {
    pub fn new(ctx: ServiceContext, pricing: PricingPolicy, jwt_config: JwtConfig) -> Self {
        Self::with_identity(
            ctx.clone(),
            pricing,
            IdentityService::new(ctx, jwt_config),
        )
    }

    /// Same as [`AppState::new`] with a preconfigured identity service.
    pub fn with_identity(
        ctx: ServiceContext,
        pricing: PricingPolicy,
        identity: IdentityService,
    ) -> Self {
        Self {
            cars: Arc::new(CarRegistry::new(ctx.clone())),
            customers: Arc::new(CustomerService::new(ctx.clone())),
            locations: Arc::new(LocationService::new(ctx.clone())),
            reservations: Arc::new(ReservationService::new(ctx.clone())),
            rentals: Arc::new(RentalService::new(ctx.clone(), pricing)),
            payments: Arc::new(PaymentService::new(ctx.clone())),
            maintenance: Arc::new(MaintenanceService::new(ctx.clone())),
            insurance: Arc::new(InsuranceService::new(ctx)),
            identity: Arc::new(identity),
        }
    }
}
