use crate::errors::AppError;
use crate::models::{Role, User};

// Role check for a protected operation. The two roles are disjoint: there is
// no hierarchy, an admin does not pass a client-only check. The middleware
// guarantees the identity is authenticated before this runs.
pub fn authorize(user: &User, required: Role) -> Result<(), AppError> {
    if user.role == required {
        Ok(())
    } else {
        Err(AppError::Forbidden { role: user.role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_role(role: Role) -> User {
        User {
            id: 1,
            username: "someone".to_string(),
            email: "someone@example.com".to_string(),
            password_hash: String::new(),
            role,
            first_name: None,
            last_name: None,
            phone: None,
            active: true,
            created_at: Utc::now(),
        }
    }

    // Exhaustive over the two-role square: allow iff roles match.
    #[test]
    fn test_authorize_exhaustive() {
        let roles = [Role::Admin, Role::Client];
        for &held in &roles {
            for &required in &roles {
                let result = authorize(&user_with_role(held), required);
                if held == required {
                    assert!(result.is_ok(), "{:?} should pass a {:?} check", held, required);
                } else {
                    assert!(result.is_err(), "{:?} should fail a {:?} check", held, required);
                }
            }
        }
    }

    #[test]
    fn test_denial_carries_the_denied_identitys_role() {
        let err = authorize(&user_with_role(Role::Client), Role::Admin).unwrap_err();
        match err {
            AppError::Forbidden { role } => assert_eq!(role, Role::Client),
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }
}
