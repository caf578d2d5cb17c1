/// Authenticated caller, resolved from the API key by the web middleware
/// and attached to the request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub name: String,
    pub admin: bool,
}
