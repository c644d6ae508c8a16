//! Deployment constants for the hosted backend. These are baked into the
//! bundle; the anon key only grants what the backend's row-level policies
//! allow anyway.

pub const BACKEND_URL: &str = "https://tribune-backend.example.org";
pub const BACKEND_ANON_KEY: &str = "anon-public-key";

/// Mutations that hang past this are reported as timed out; the next
/// refetch shows whatever actually happened.
pub const MUTATION_TIMEOUT_SECS: u64 = 10;
