//! Authentication throttling flow.

mod guard;

pub use guard::LoginGuard;

#[cfg(test)]
mod tests;
