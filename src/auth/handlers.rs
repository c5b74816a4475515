use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use super::{
    dto::{
        AuthResponse, ChangePasswordRequest, LoginRequest, RegisterAdminRequest,
        RegisterUserRequest, Registration, UpdateAdminProfile, UpdateUserProfile,
        VerifyPhoneRequest,
    },
    extractors::{AdminUser, AuthUser, MemberUser},
    jwt::JwtKeys,
    otp::{contact_candidates, generate_otp, otp_expiry},
    password::{hash_password, verify_password},
    repo::AccountStore,
    repo_types::{Account, NewAdmin, Role},
    sms::dispatch_otp,
};
use crate::{
    crud::listing,
    error::{ApiResult, AppError},
    response::ApiResponse,
    state::AppState,
    store::Collection,
    upload::{commit_replacing, ImageForm, JsonBody, ProfileImage},
    validate::{is_valid_email, parse_id},
};

const DUPLICATE_ACCOUNT: &str = "Email or contactNo already registered";

fn check_email(email: &str) -> Result<String, AppError> {
    let email = email.to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::bad_request("Invalid email"));
    }
    Ok(email)
}

/// Enforced when a password is changed.
const MIN_PASSWORD_LEN: usize = 8;

fn check_password_len(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn register_admin(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterAdminRequest>,
) -> ApiResult<Account> {
    let password = payload.password.filter(|p| !p.is_empty());
    let (Some(name), Some(gender), Some(email), Some(contact_no), Some(password)) = (
        payload.name,
        payload.gender,
        payload.email,
        payload.contact_no,
        password,
    ) else {
        warn!("admin registration with missing fields");
        return Err(AppError::bad_request(
            "All fields (name, gender, email, contactNo, password) are required",
        ));
    };
    let email = check_email(&email)?;

    // Checked up front to skip hashing; the store still enforces it.
    if state
        .accounts
        .find_by_email_or_contact(&email, &contact_no)
        .await?
        .is_some()
    {
        warn!("admin registration with a taken email or contactNo");
        return Err(AppError::Conflict(DUPLICATE_ACCOUNT.into()));
    }

    let password_hash = hash_password(&password)?;
    let admin = state
        .accounts
        .insert(Account::admin(NewAdmin {
            name,
            gender,
            email,
            contact_no,
            password_hash,
        }))
        .await
        .map_err(|e| e.or_conflict(DUPLICATE_ACCOUNT))?;

    info!(account_id = %admin.id, "admin registered");
    Ok(ApiResponse::created("Admin registered", admin))
}

#[instrument(skip(state, payload))]
pub async fn register_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterUserRequest>,
) -> ApiResult<Registration> {
    let contact_no = payload
        .contact_no
        .ok_or_else(|| AppError::bad_request("contactNo is required"))?;
    let now = OffsetDateTime::now_utc();
    let otp = generate_otp();

    if let Some(mut existing) = state
        .accounts
        .find_by_contact(&contact_candidates(&contact_no))
        .await?
    {
        if existing.role != Role::User {
            warn!(account_id = %existing.id, "contact number belongs to an admin");
            return Err(AppError::Conflict("contactNo already registered".into()));
        }
        existing.issue_otp(otp.clone(), otp_expiry(now));
        let existing = state.accounts.update(existing).await?;
        dispatch_otp(state.sms.clone(), existing.contact_no.clone(), otp);
        info!(account_id = %existing.id, "otp resent");
        return Ok(ApiResponse::with_status(
            StatusCode::BAD_REQUEST,
            "contactNo already registered. A new OTP has been sent.",
            Some(Registration::Resent { otp_resent: true }),
        ));
    }

    let user = state
        .accounts
        .insert(Account::pending_user(contact_no, otp.clone(), otp_expiry(now)))
        .await
        .map_err(|e| e.or_conflict("contactNo already registered"))?;
    dispatch_otp(state.sms.clone(), user.contact_no.clone(), otp);

    info!(account_id = %user.id, "user registered");
    Ok(ApiResponse::created(
        "User registered. OTP sent.",
        Registration::Created(user),
    ))
}

#[instrument(skip(state, payload))]
pub async fn verify_phone(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<VerifyPhoneRequest>,
) -> ApiResult<AuthResponse> {
    let (Some(contact_no), Some(otp)) = (payload.contact_no, payload.otp) else {
        return Err(AppError::bad_request("Please provide contactNo and OTP."));
    };

    let mut account = state
        .accounts
        .find_by_contact(&contact_candidates(&contact_no))
        .await?
        .ok_or_else(|| AppError::not_found("User not found."))?;

    let Some(expected) = account.otp.as_deref() else {
        return Err(AppError::bad_request("No OTP found. Please request a new OTP."));
    };
    if account
        .otp_expires_at
        .is_some_and(|exp| exp < OffsetDateTime::now_utc())
    {
        warn!(account_id = %account.id, "expired otp");
        return Err(AppError::bad_request("OTP has expired. Please request a new OTP."));
    }
    if expected != otp {
        warn!(account_id = %account.id, "otp mismatch");
        return Err(AppError::bad_request("Invalid OTP."));
    }

    account.clear_otp();
    let account = state.accounts.update(account).await?;
    let token = JwtKeys::from_ref(&state).sign(&account)?;

    info!(account_id = %account.id, "phone verified");
    Ok(ApiResponse::ok(
        "OTP verified successfully.",
        AuthResponse {
            token,
            account: None,
        },
    ))
}

#[instrument(skip(state, payload))]
pub async fn admin_login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(AppError::bad_request("Email and password are required"));
    };
    let invalid = || AppError::Unauthorized("Invalid email or password".into());

    let account = match state.accounts.find_by_email(&email).await? {
        Some(a) if a.role == Role::Admin => a,
        _ => {
            warn!(email = %email, "login unknown admin email");
            return Err(invalid());
        }
    };
    let hash = account.password_hash.as_deref().ok_or_else(invalid)?;
    if !verify_password(&password, hash)? {
        warn!(account_id = %account.id, "login invalid password");
        return Err(invalid());
    }

    let token = JwtKeys::from_ref(&state).sign(&account)?;
    info!(account_id = %account.id, "admin logged in");
    Ok(ApiResponse::ok(
        "Login successful",
        AuthResponse {
            token,
            account: Some(account),
        },
    ))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<ChangePasswordRequest>,
) -> ApiResult {
    let (Some(old_password), Some(new_password)) = (payload.old_password, payload.new_password)
    else {
        return Err(AppError::bad_request("oldPassword and newPassword are required"));
    };
    check_password_len(&new_password)?;

    let mut account = state
        .accounts
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let hash = account
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::bad_request("This account has no password set"))?;
    if !verify_password(&old_password, hash)? {
        warn!(account_id = %account.id, "change password with wrong old password");
        return Err(AppError::bad_request("Old password is incorrect"));
    }

    account.password_hash = Some(hash_password(&new_password)?);
    state.accounts.update(account).await?;

    info!(account_id = %user.id, "password changed");
    Ok(ApiResponse::message("Password changed successfully"))
}

#[instrument(skip(state))]
pub async fn get_register_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Account> {
    let id = parse_id(&id, "user")?;
    user.ensure_self_or_admin(id, "Access denied. You can only view your own profile.")?;
    let account = state
        .accounts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(ApiResponse::ok("User retrieved successfully", account))
}

#[instrument(skip(state))]
pub async fn get_all_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Vec<Account>> {
    let users = state.accounts.list_by_role(Role::User).await?;
    Ok(listing(users, "No users found", "Users fetched successfully"))
}

#[instrument(skip(state, form))]
pub async fn update_profile_user(
    State(state): State<AppState>,
    MemberUser(user): MemberUser,
    Path(id): Path<String>,
    form: ImageForm<ProfileImage>,
) -> ApiResult<Account> {
    let id = parse_id(&id, "user")?;
    let (payload, image) = form.into_parts::<UpdateUserProfile>()?;
    user.ensure_self(id, "Access denied. You can only update your own profile.")?;

    let mut account = state
        .accounts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if let Some(email) = payload.email {
        account.email = Some(check_email(&email)?);
    }
    if let Some(name) = payload.name {
        account.name = Some(name);
    }
    if let Some(contact_no) = payload.contact_no {
        account.contact_no = contact_no;
    }
    if let Some(address) = payload.address {
        account.address = Some(address);
    }
    let previous = image.as_ref().and_then(|img| img.swap_into(&mut account.image));

    let account = state
        .accounts
        .update(account)
        .await
        .map_err(|e| e.or_conflict(DUPLICATE_ACCOUNT))?;
    commit_replacing(state.media.as_ref(), image, previous).await;

    info!(account_id = %account.id, "user profile updated");
    Ok(ApiResponse::ok("User updated successfully", account))
}

#[instrument(skip(state, form))]
pub async fn update_profile_admin(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    form: ImageForm<ProfileImage>,
) -> ApiResult<Account> {
    let id = parse_id(&id, "admin")?;
    let (payload, image) = form.into_parts::<UpdateAdminProfile>()?;
    admin.ensure_self(id, "Access denied. Admins can only update their own profile.")?;

    let mut account = state
        .accounts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Admin not found"))?;

    if let Some(email) = payload.email {
        account.email = Some(check_email(&email)?);
    }
    if let Some(name) = payload.name {
        account.name = Some(name);
    }
    if let Some(gender) = payload.gender {
        account.gender = Some(gender);
    }
    if let Some(contact_no) = payload.contact_no {
        account.contact_no = contact_no;
    }
    let previous = image.as_ref().and_then(|img| img.swap_into(&mut account.image));

    let account = state
        .accounts
        .update(account)
        .await
        .map_err(|e| e.or_conflict(DUPLICATE_ACCOUNT))?;
    commit_replacing(state.media.as_ref(), image, previous).await;

    info!(account_id = %account.id, "admin profile updated");
    Ok(ApiResponse::ok("Admin updated successfully", account))
}
