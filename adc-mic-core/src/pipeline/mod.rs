pub mod acquisition;
pub mod buffer;
pub mod device;
pub mod validator;
