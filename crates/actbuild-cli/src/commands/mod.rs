pub mod hosts;
pub mod install;
