//! Access control: the device shared-secret guard and operator sessions.
//!
//! The two guards are independent. Device endpoints only ever consult the
//! [`DeviceGuard`]; operator login, session tokens, and roles only gate LED
//! control and the admin listing.

pub mod crypto;
pub mod device_guard;
pub mod password;
pub mod token;
pub mod users;

pub use device_guard::{DEVICE_KEY_HEADER, DeviceGuard};
pub use password::PasswordHash;
pub use token::{Claims, TokenSigner};
pub use users::{Role, UserRecord, UserStore, UserSummary};
