mod admin;
mod decisions;
mod root;
mod twilio;

pub use admin::*;
pub use decisions::*;
pub use root::*;
pub use twilio::*;
