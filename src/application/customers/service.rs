//! Customer records. Plain CRUD guarded by the access policy.

use tracing::info;

use crate::application::context::ServiceContext;
use crate::domain::customer::{Customer, CustomerChanges, NewCustomer};
use crate::domain::{AccessPolicy, Principal};
use crate::shared::{DomainError, DomainResult};

pub struct CustomerService {
    ctx: ServiceContext,
}

impl CustomerService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn create(&self, new: NewCustomer, principal: &Principal) -> DomainResult<Customer> {
        principal.ensure(AccessPolicy::StaffOnly, "create customer")?;
        new.validate()?;
        let customer = self.ctx.repos.customers().insert(new, self.ctx.now()).await?;
        info!(customer_id = customer.id, "Customer created");
        Ok(customer)
    }

    pub async fn get(&self, customer_id: i32, principal: &Principal) -> DomainResult<Customer> {
        principal.ensure(AccessPolicy::OwnerOrStaff(customer_id), "view customer")?;
        self.find(customer_id).await
    }

    pub async fn list(&self, principal: &Principal) -> DomainResult<Vec<Customer>> {
        principal.ensure(AccessPolicy::StaffOnly, "list customers")?;
        self.ctx.repos.customers().find_all().await
    }

    pub async fn update(
        &self,
        customer_id: i32,
        changes: CustomerChanges,
        principal: &Principal,
    ) -> DomainResult<Customer> {
        principal.ensure(AccessPolicy::OwnerOrStaff(customer_id), "update customer")?;
        let mut customer = self.find(customer_id).await?;
        changes.apply(&mut customer);
        if customer.first_name.trim().is_empty() || customer.last_name.trim().is_empty() {
            return Err(DomainError::Validation("Customer name is required".into()));
        }
        self.ctx.repos.customers().update(&customer).await?;
        info!(customer_id, "Customer updated");
        Ok(customer)
    }

    pub async fn update_driver_license(
        &self,
        customer_id: i32,
        license: String,
        principal: &Principal,
    ) -> DomainResult<Customer> {
        if license.trim().is_empty() {
            return Err(DomainError::Validation("Driver license cannot be empty".into()));
        }
        let changes = CustomerChanges {
            driver_license: Some(license),
            ..Default::default()
        };
        self.update(customer_id, changes, principal).await
    }

    async fn find(&self, customer_id: i32) -> DomainResult<Customer> {
        self.ctx
            .repos
            .customers()
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Customer", customer_id))
    }
}
