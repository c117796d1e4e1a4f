pub mod db;
pub mod memory;
pub mod password;
pub mod token;

pub use db::DbAdapter;
pub use memory::InMemoryStore;
pub use password::Argon2Hasher;
pub use token::JwtTokenService;
