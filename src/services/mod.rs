pub mod login;

pub use login::LoginService;
