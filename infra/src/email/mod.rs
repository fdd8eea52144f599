//! Outbound email over SMTP.

mod smtp;

pub use smtp::SmtpEmailSender;
