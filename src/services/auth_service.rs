use crate::entities::{UserRole, user_entity as users, user_profile_entity as profiles};
use crate::error::{AppError, AppResult};
use crate::external::{AdminNotification, EmailService};
use crate::models::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest};
use crate::utils::{JwtService, hash_password, validate_password, verify_password};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    email_service: EmailService,
}

impl AuthService {
    pub fn new(
        pool: DatabaseConnection,
        jwt_service: JwtService,
        email_service: EmailService,
    ) -> Self {
        Self {
            pool,
            jwt_service,
            email_service,
        }
    }

    fn issue_tokens(&self, user_id: i64, email: &str, profile: ProfileResponse) -> AppResult<AuthResponse> {
        Ok(AuthResponse {
            access_token: self.jwt_service.generate_access_token(user_id, email)?,
            refresh_token: self.jwt_service.generate_refresh_token(user_id, email)?,
            expires_in: self.jwt_service.get_access_token_expires_in(),
            user: profile,
        })
    }

    pub async fn register(&self, req: RegisterRequest) -> AppResult<AuthResponse> {
        let email = req.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AppError::ValidationError("Invalid email".to_string()));
        }
        validate_password(&req.password)?;
        let user_name = req.user_name.trim().to_string();
        if user_name.is_empty() {
            return Err(AppError::ValidationError(
                "User name is required".to_string(),
            ));
        }
        let role = match req.role.unwrap_or(UserRole::Reader) {
            UserRole::Admin => {
                return Err(AppError::ValidationError(
                    "Cannot self-register as admin".to_string(),
                ));
            }
            role => role,
        };

        let taken = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.pool)
            .await?;
        if taken.is_some() {
            return Err(AppError::ValidationError(
                "Email already registered".to_string(),
            ));
        }

        let user = users::ActiveModel {
            email: Set(email.clone()),
            password_hash: Set(hash_password(&req.password)?),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        // 作者账号需管理员审核后才能发布
        let profile = profiles::ActiveModel {
            user_id: Set(user.id),
            user_name: Set(user_name.clone()),
            pen_name: Set(req.pen_name),
            email: Set(email.clone()),
            role: Set(role),
            approved: Set(role == UserRole::Reader),
            ip: Set(req.ip),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        let notification = match role {
            UserRole::Author => AdminNotification::NewAuthor {
                username: user_name.clone(),
                email: email.clone(),
            },
            _ => AdminNotification::NewUser {
                username: user_name.clone(),
                email: email.clone(),
                role: role.to_string(),
            },
        };
        if let Err(e) = self.email_service.send_admin_notification(notification).await {
            log::error!("Failed to send signup notification: {e}");
        }

        self.issue_tokens(user.id, &email, ProfileResponse::from(profile))
    }

    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        let email = req.email.trim().to_lowercase();
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        if !verify_password(&req.password, &user.password_hash)? {
            return Err(AppError::AuthError(
                "Invalid email or password".to_string(),
            ));
        }

        let profile = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(user.id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))?;

        self.issue_tokens(user.id, &user.email, ProfileResponse::from(profile))
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;
        let profile = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(user.id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))?;

        self.issue_tokens(user.id, &user.email, ProfileResponse::from(profile))
    }
}
