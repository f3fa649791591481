use tracing::{info, instrument, warn};

use quill_auth::{Role, Status, create_access_token};
use quill_config::JwtConfig;
use quill_core::{AppError, hash_password, verify_password};
use quill_models::{LoginDto, NewUser, RegisterDto, TokenResponse, User};

use crate::repository::UserRepository;

pub struct AuthService;

impl AuthService {
    /// Self-registration always yields an active `registered` account.
    #[instrument(skip(users, jwt_config, dto), fields(username = %dto.username))]
    pub async fn register(
        users: &dyn UserRepository,
        jwt_config: &JwtConfig,
        dto: RegisterDto,
    ) -> Result<TokenResponse, AppError> {
        let password_hash = hash_password(&dto.password)?;

        let user = users
            .create(NewUser {
                username: dto.username,
                email: dto.email,
                password_hash,
                role: Role::Registered,
                status: Status::Active,
            })
            .await?;

        info!(user_id = user.id, "User registered");
        Self::issue_token(&user, jwt_config)
    }

    #[instrument(skip(users, jwt_config, dto))]
    pub async fn login(
        users: &dyn UserRepository,
        jwt_config: &JwtConfig,
        dto: LoginDto,
    ) -> Result<TokenResponse, AppError> {
        let Some(user) = users.read_by_email(&dto.email).await? else {
            warn!("Login attempt for unknown email");
            return Err(AppError::login_failed());
        };

        if !verify_password(&dto.password, &user.password_hash)? {
            warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(AppError::login_failed());
        }

        if !user.is_active() {
            warn!(user_id = user.id, "Login attempt by passive user");
            return Err(AppError::user_disabled());
        }

        info!(user_id = user.id, "User logged in");
        Self::issue_token(&user, jwt_config)
    }

    fn issue_token(user: &User, jwt_config: &JwtConfig) -> Result<TokenResponse, AppError> {
        let token =
            create_access_token(user.id, user.role, &user.username, &user.email, jwt_config)?;
        Ok(TokenResponse { token })
    }
}
