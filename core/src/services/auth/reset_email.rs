//! Password reset email content

pub const RESET_EMAIL_SUBJECT: &str = "Reset Your Password";

/// Link sent to the user; the base URL is used verbatim
pub fn reset_link(app_base_url: &str, raw_token: &str) -> String {
    format!("{app_base_url}ResetPassword?token={raw_token}")
}

pub fn reset_email_body(reset_link: &str) -> String {
    format!(
        "<p>Hello,</p>\n\
         <p>We received a request to reset your password. Click the link below to reset it:</p>\n\
         <p><a href='{reset_link}'>Reset Password</a></p>\n\
         <p>This link will expire in 1 hour.</p>\n\
         <p>If you did not request this, please ignore this email.</p>"
    )
}
