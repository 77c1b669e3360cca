pub mod view;

#[cfg(feature = "desktop")]
pub mod components;
#[cfg(feature = "desktop")]
pub mod state;
