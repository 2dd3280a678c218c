// Route path constants - single source of truth for all dispatcher paths

pub const FORM_SUBMIT: &str = "/form-submit";
pub const UPLOAD_TO_GITHUB: &str = "/upload-to-github";
pub const CREATE_STRIPE_SESSION: &str = "/create-stripe-session";
pub const AUTH_CHECK: &str = "/auth-check";
pub const SIGNUP: &str = "/signup";
pub const API_DOCS: &str = "/docs";
