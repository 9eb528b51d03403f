pub mod chat;
pub mod login;
pub mod logout;
pub mod router;
pub mod traits;
