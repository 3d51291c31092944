mod session;

pub use session::SessionManager;
pub use session::SharedSession;
pub use session::basic_auth_value;
