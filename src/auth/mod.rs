mod guard;
mod router;
mod session;

pub use guard::authorize;
pub use router::landing_for;
pub use session::{establish, require_user, resolve, terminate, SESSION_USER_KEY};
