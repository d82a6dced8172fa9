use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;
use tracing::error;

pub type ServiceResult<T> = Result<T, AppError>;

pub const LOGIN_PATH: &str = "/auth/login";

#[track_caller]
pub fn unexpected<T, E: Into<anyhow::Error>>(e: E) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    error!("An unexpected error has occurred at {caller}: {}", e.into());
    Err(AppError::Unexpected)
}

#[derive(Debug, PartialEq)]
pub enum AppError {
    Unexpected,
    Unauthenticated,
    DecodingRequestFailed,
    InternalServerError(&'static str),

    CredentialsInvalidPassword,
    CredentialsPasswordMismatch,
    CredentialsPasswordTooShort,

    MessagesNotFound,
    MessagesMissingFields,
    MessagesEmptyReply,
    MessagesInvalidRecipient,
    MessagesDuplicatePublicationRequest,

    PasswordResetMissingIdentity,
    PasswordResetMissingPassword,
    PasswordResetNoMatch,

    RegistrationMissingFields,
    RegistrationInvalidIdNumber,
    RegistrationInvalidEmail,
    RegistrationInvalidRole,
    RegistrationTermsNotAccepted,
    RegistrationAlreadyExists,

    SessionsMissingCredentials,
    SessionsInvalidCredentials,

    UsersNotFound,
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    #[track_caller]
    fn from(e: E) -> Self {
        unexpected::<(), E>(e).unwrap_err()
    }
}

impl AppError {
    pub const fn as_str(&self) -> &str {
        self.code()
    }

    pub const fn code(&self) -> &'static str {
        match self {
            AppError::Unexpected => "unexpected",
            AppError::Unauthenticated => "unauthenticated",
            AppError::DecodingRequestFailed => "decoding_request_failed",
            AppError::InternalServerError(_) => "internal_server_error",

            AppError::CredentialsInvalidPassword => "credentials.invalid_password",
            AppError::CredentialsPasswordMismatch => "credentials.password_mismatch",
            AppError::CredentialsPasswordTooShort => "credentials.password_too_short",

            AppError::MessagesNotFound => "messages.not_found",
            AppError::MessagesMissingFields => "messages.missing_fields",
            AppError::MessagesEmptyReply => "messages.empty_reply",
            AppError::MessagesInvalidRecipient => "messages.invalid_recipient",
            AppError::MessagesDuplicatePublicationRequest => {
                "messages.duplicate_publication_request"
            }

            AppError::PasswordResetMissingIdentity => "password_reset.missing_identity",
            AppError::PasswordResetMissingPassword => "password_reset.missing_password",
            AppError::PasswordResetNoMatch => "password_reset.no_match",

            AppError::RegistrationMissingFields => "registration.missing_fields",
            AppError::RegistrationInvalidIdNumber => "registration.invalid_id_number",
            AppError::RegistrationInvalidEmail => "registration.invalid_email",
            AppError::RegistrationInvalidRole => "registration.invalid_role",
            AppError::RegistrationTermsNotAccepted => "registration.terms_not_accepted",
            AppError::RegistrationAlreadyExists => "registration.already_exists",

            AppError::SessionsMissingCredentials => "sessions.missing_credentials",
            AppError::SessionsInvalidCredentials => "sessions.invalid_credentials",

            AppError::UsersNotFound => "users.not_found",
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            AppError::Unexpected => "An unexpected error has occurred.",
            AppError::Unauthenticated => "Please log in to access this page.",
            AppError::DecodingRequestFailed => "Failed to decode request",
            AppError::InternalServerError(_) => "An internal server error has occurred.",

            AppError::CredentialsInvalidPassword => {
                "Password can only contain letters (a-z, A-Z) and numbers, no special symbols"
            }
            AppError::CredentialsPasswordMismatch => "Passwords do not match",
            AppError::CredentialsPasswordTooShort => "Password must be at least 6 characters long",

            AppError::MessagesNotFound => "Message not found or access denied.",
            AppError::MessagesMissingFields => "All fields are required.",
            AppError::MessagesEmptyReply => "Message content is required.",
            AppError::MessagesInvalidRecipient => "The selected recipient does not exist.",
            AppError::MessagesDuplicatePublicationRequest => {
                "You have already sent a publication request for this content. Please wait for admin review."
            }

            AppError::PasswordResetMissingIdentity => "Please provide both email and ID number",
            AppError::PasswordResetMissingPassword => {
                "Please provide and confirm your new password"
            }
            AppError::PasswordResetNoMatch => "Invalid email or ID number combination.",

            AppError::RegistrationMissingFields => "Please fill in all required fields",
            AppError::RegistrationInvalidIdNumber => "ID number must contain numbers only",
            AppError::RegistrationInvalidEmail => "Email must be in format username@domain.com",
            AppError::RegistrationInvalidRole => "Please choose a valid role",
            AppError::RegistrationTermsNotAccepted => {
                "You must agree to the terms and conditions"
            }
            AppError::RegistrationAlreadyExists => "Username, email, or ID number already exists",

            AppError::SessionsMissingCredentials => "Please enter both email and password",
            AppError::SessionsInvalidCredentials => "Invalid email or password",

            AppError::UsersNotFound => "This user does not exist.",
        }
    }

    pub const fn http_status_code(&self) -> StatusCode {
        match self {
            AppError::DecodingRequestFailed
            | AppError::CredentialsInvalidPassword
            | AppError::CredentialsPasswordMismatch
            | AppError::CredentialsPasswordTooShort
            | AppError::MessagesMissingFields
            | AppError::MessagesEmptyReply
            | AppError::MessagesInvalidRecipient
            | AppError::MessagesDuplicatePublicationRequest
            | AppError::PasswordResetMissingIdentity
            | AppError::PasswordResetMissingPassword
            | AppError::RegistrationMissingFields
            | AppError::RegistrationInvalidIdNumber
            | AppError::RegistrationInvalidEmail
            | AppError::RegistrationInvalidRole
            | AppError::RegistrationTermsNotAccepted
            | AppError::SessionsMissingCredentials => StatusCode::BAD_REQUEST,

            AppError::Unauthenticated | AppError::SessionsInvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }

            AppError::MessagesNotFound
            | AppError::PasswordResetNoMatch
            | AppError::UsersNotFound => StatusCode::NOT_FOUND,

            AppError::RegistrationAlreadyExists => StatusCode::CONFLICT,

            AppError::Unexpected | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub const fn response_parts(&self) -> (StatusCode, Json<ErrorResponse>) {
        let status = self.http_status_code();
        let response = ErrorResponse {
            code: self.code(),
            message: self.message(),
        };
        (status, Json(response))
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthenticated => Redirect::to(LOGIN_PATH).into_response(),
            e => e.response_parts().into_response(),
        }
    }
}
