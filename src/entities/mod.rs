pub mod activity_log;
pub mod business_inquiry;
pub mod checkout_draft;
pub mod contact_message;
pub mod coverage_notification;
pub mod coverage_zip;
pub mod order;
pub mod otp_code;
pub mod pharmacy;
pub mod service_request;
pub mod user;
