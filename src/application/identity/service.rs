//! Accounts, login and token issuance
//!
//! HTTP handlers stay thin and delegate here.

use tracing::{info, warn};

use crate::application::context::ServiceContext;
use crate::domain::customer::NewCustomer;
use crate::domain::user::{NewUser, User, UserRepository};
use crate::domain::{AccessPolicy, Principal, UserRole};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password_with_cost, verify_password};
use crate::shared::{DomainError, DomainResult};

const MIN_PASSWORD_LEN: usize = 8;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Customer self sign-up
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
    pub driver_license: Option<String>,
}

/// Head counts for the admin dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    pub total: u64,
    pub active: u64,
    pub by_role: Vec<(UserRole, u64)>,
}

pub struct IdentityService {
    ctx: ServiceContext,
    jwt_config: JwtConfig,
    password_cost: u32,
}

impl IdentityService {
    pub fn new(ctx: ServiceContext, jwt_config: JwtConfig) -> Self {
        Self {
            ctx,
            jwt_config,
            password_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Lower bcrypt cost, for tests.
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Authentication ──────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let email = normalize_email(email);
        let Some(user) = self.ctx.repos.users().find_by_email(&email).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            warn!(user_id = user.id, "Failed login attempt");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(&user.principal(), &user.email, &self.jwt_config)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;

        self.ctx
            .repos
            .users()
            .touch_last_login(user.id, self.ctx.now())
            .await?;

        info!(user_id = user.id, role = %user.role, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Registration ────────────────────────────────────────────

    /// Create a customer account together with its customer record.
    pub async fn register(&self, registration: Registration) -> DomainResult<User> {
        let email = normalize_email(&registration.email);
        validate_credentials(&email, &registration.password)?;
        let customer = NewCustomer {
            first_name: registration.first_name,
            last_name: registration.last_name,
            phone_number: registration.phone_number,
            address: registration.address,
            driver_license: registration.driver_license,
        };
        customer.validate()?;

        if self.ctx.repos.users().find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".into()));
        }
        let password_hash = self.hash(&registration.password)?;

        let now = self.ctx.now();
        let uow = self.ctx.repos.begin().await?;
        let customer = uow.customers().insert(customer, now).await?;
        let user = uow
            .users()
            .insert(
                NewUser {
                    email,
                    password_hash,
                    role: UserRole::Customer,
                    customer_id: Some(customer.id),
                },
                now,
            )
            .await?;
        uow.commit().await?;

        info!(user_id = user.id, customer_id = customer.id, "New customer registered");
        Ok(user)
    }

    /// Admin-created employee, manager or admin account.
    pub async fn create_staff_account(
        &self,
        email: &str,
        password: &str,
        role: UserRole,
        principal: &Principal,
    ) -> DomainResult<User> {
        principal.ensure(AccessPolicy::AdminOnly, "create staff account")?;
        if !role.is_staff() {
            return Err(DomainError::Validation(
                "Customer accounts are created through registration".into(),
            ));
        }
        let email = normalize_email(email);
        validate_credentials(&email, password)?;
        if self.ctx.repos.users().find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".into()));
        }

        let user = self
            .ctx
            .repos
            .users()
            .insert(
                NewUser {
                    email,
                    password_hash: self.hash(password)?,
                    role,
                    customer_id: None,
                },
                self.ctx.now(),
            )
            .await?;
        info!(user_id = user.id, role = %user.role, "Staff account created");
        Ok(user)
    }

    /// Create the first admin when no account exists yet.
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> DomainResult<Option<User>> {
        if self.ctx.repos.users().count().await? > 0 {
            return Ok(None);
        }
        let email = normalize_email(email);
        validate_credentials(&email, password)?;
        let user = self
            .ctx
            .repos
            .users()
            .insert(
                NewUser {
                    email,
                    password_hash: self.hash(password)?,
                    role: UserRole::Admin,
                    customer_id: None,
                },
                self.ctx.now(),
            )
            .await?;
        info!(user_id = user.id, email = %user.email, "Bootstrap admin created");
        Ok(Some(user))
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn me(&self, principal: &Principal) -> DomainResult<User> {
        self.ctx
            .repos
            .users()
            .find_by_id(principal.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", principal.user_id))
    }

    // ── Account administration ──────────────────────────────────

    pub async fn list_users(
        &self,
        role: Option<UserRole>,
        principal: &Principal,
    ) -> DomainResult<Vec<User>> {
        principal.ensure(AccessPolicy::ManagerOrAdmin, "list users")?;
        self.ctx.repos.users().find_all(role).await
    }

    pub async fn get_user(&self, user_id: i32, principal: &Principal) -> DomainResult<User> {
        if principal.user_id != user_id {
            principal.ensure(AccessPolicy::ManagerOrAdmin, "view user")?;
        }
        find_user(self.ctx.repos.users(), user_id).await
    }

    pub async fn update_role(
        &self,
        user_id: i32,
        role: UserRole,
        principal: &Principal,
    ) -> DomainResult<User> {
        principal.ensure(AccessPolicy::AdminOnly, "change user role")?;

        let user = self
            .ctx
            .atomically("update user role", async {
                let uow = self.ctx.repos.begin().await?;
                let mut user = find_user(uow.users(), user_id).await?;
                user.check_role_change(role)?;
                if role != UserRole::Admin {
                    ensure_not_last_admin(uow.users(), &user, "demote").await?;
                }
                user.role = role;
                uow.users().update(&user).await?;
                uow.commit().await?;
                Ok(user)
            })
            .await?;

        info!(user_id, role = %role, by = principal.user_id, "User role changed");
        Ok(user)
    }

    pub async fn update_status(
        &self,
        user_id: i32,
        is_active: bool,
        principal: &Principal,
    ) -> DomainResult<User> {
        principal.ensure(AccessPolicy::ManagerOrAdmin, "change user status")?;

        let user = self
            .ctx
            .atomically("update user status", async {
                let uow = self.ctx.repos.begin().await?;
                let mut user = find_user(uow.users(), user_id).await?;
                if !is_active {
                    ensure_not_last_admin(uow.users(), &user, "deactivate").await?;
                }
                user.is_active = is_active;
                uow.users().update(&user).await?;
                uow.commit().await?;
                Ok(user)
            })
            .await?;

        info!(user_id, is_active, by = principal.user_id, "User status changed");
        Ok(user)
    }

    /// Self-service password change; the current password must match.
    pub async fn change_password(
        &self,
        principal: &Principal,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let mut user = find_user(self.ctx.repos.users(), principal.user_id).await?;
        if !verify_password(current_password, &user.password_hash).unwrap_or(false) {
            warn!(user_id = user.id, "Password change with wrong current password");
            return Err(DomainError::Validation("Current password is incorrect".into()));
        }
        validate_password(new_password)?;
        user.password_hash = self.hash(new_password)?;
        self.ctx.repos.users().update(&user).await?;
        info!(user_id = user.id, "Password changed");
        Ok(())
    }

    pub async fn remove_user(&self, user_id: i32, principal: &Principal) -> DomainResult<()> {
        principal.ensure(AccessPolicy::AdminOnly, "delete user")?;

        self.ctx
            .atomically("delete user", async {
                let uow = self.ctx.repos.begin().await?;
                let user = find_user(uow.users(), user_id).await?;
                ensure_not_last_admin(uow.users(), &user, "delete").await?;
                uow.users().delete(user_id).await?;
                uow.commit().await?;
                Ok(())
            })
            .await?;

        info!(user_id, by = principal.user_id, "User deleted");
        Ok(())
    }

    pub async fn user_stats(&self, principal: &Principal) -> DomainResult<UserStats> {
        principal.ensure(AccessPolicy::ManagerOrAdmin, "view user statistics")?;
        let users = self.ctx.repos.users().find_all(None).await?;
        let by_role = [
            UserRole::Admin,
            UserRole::Manager,
            UserRole::Employee,
            UserRole::Customer,
        ]
        .into_iter()
        .map(|role| (role, users.iter().filter(|u| u.role == role).count() as u64))
        .collect();
        Ok(UserStats {
            total: users.len() as u64,
            active: users.iter().filter(|u| u.is_active).count() as u64,
            by_role,
        })
    }

    fn hash(&self, password: &str) -> DomainResult<String> {
        hash_password_with_cost(password, self.password_cost)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))
    }
}

async fn find_user(users: &dyn UserRepository, user_id: i32) -> DomainResult<User> {
    users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("User", user_id))
}

/// Refuse to take away the last active admin.
async fn ensure_not_last_admin(
    users: &dyn UserRepository,
    user: &User,
    action: &str,
) -> DomainResult<()> {
    if user.is_active_admin() && users.count_active_with_role(UserRole::Admin).await? <= 1 {
        return Err(DomainError::Validation(format!(
            "Cannot {} the last active admin",
            action
        )));
    }
    Ok(())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_credentials(email: &str, password: &str) -> DomainResult<()> {
    if !email.contains('@') {
        return Err(DomainError::Validation("Invalid email address".into()));
    }
    validate_password(password)
}

fn validate_password(password: &str) -> DomainResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
