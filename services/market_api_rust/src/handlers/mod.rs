pub mod compare;
pub mod health;
pub mod markets;
pub mod metrics;
