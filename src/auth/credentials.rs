use crate::config::AdminAccount;

/// Checks submitted credentials against the single configured admin identity.
#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    admin: AdminAccount,
}

impl CredentialVerifier {
    pub fn new(admin: AdminAccount) -> Self {
        Self { admin }
    }

    /// Exact comparison of both fields. Empty input never verifies.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        if username.is_empty() || password.is_empty() {
            return false;
        }
        username == self.admin.username && password == self.admin.password
    }
}
