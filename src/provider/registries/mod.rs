//! Registry implementations for listing upstream releases

pub mod github;

pub use github::GitHubRegistry;
