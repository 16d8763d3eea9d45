//! Testability ports for injecting randomness.

use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    fn gen_uuid(&self) -> Uuid;
}

/// Thread-local RNG backed implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRandom;

impl RandomPort for SystemRandom {
    fn gen_uuid(&self) -> Uuid {
        uuid::Builder::from_random_bytes(rand::random::<[u8; 16]>()).into_uuid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_random_produces_v4_uuids() {
        let random = SystemRandom;
        let a = random.gen_uuid();
        let b = random.gen_uuid();
        assert_eq!(a.get_version_num(), 4);
        assert_ne!(a, b);
    }
}
