use crate::models::Role;

// Single source of truth for the role -> landing page mapping. Used after
// login, when an authenticated user revisits /login or /, and as the safe
// fallback when the guard denies access. Call sites must not re-derive it.
pub fn landing_for(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin/dashboard",
        Role::Client => "/client/dashboard",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_is_total_over_both_roles() {
        assert_eq!(landing_for(Role::Admin), "/admin/dashboard");
        assert_eq!(landing_for(Role::Client), "/client/dashboard");
    }

    #[test]
    fn test_landing_pages_are_distinct() {
        assert_ne!(landing_for(Role::Admin), landing_for(Role::Client));
    }
}
