//! Pluggable identifier allocation.

use crate::ClientId;

/// Source of fresh client identifiers.
///
/// Generators only need to make collisions *unlikely*; the storage layer detects an
/// identifier that is already taken and the caller asks for another one. Any
/// `Fn() -> ClientId` closure is a generator, which keeps scripted sequences in tests short.
pub trait ClientIdGenerator: Send + Sync {
    fn generate(&self) -> ClientId;
}

/// Random UUID v4 generator. 122 random bits per identifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomClientIdGenerator;

impl ClientIdGenerator for RandomClientIdGenerator {
    fn generate(&self) -> ClientId {
        ClientId::new()
    }
}

impl<F> ClientIdGenerator for F
where
    F: Fn() -> ClientId + Send + Sync,
{
    fn generate(&self) -> ClientId {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_generator_does_not_repeat() {
        let generator = RandomClientIdGenerator;
        let ids: HashSet<ClientId> = (0..1_000).map(|_| generator.generate()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn test_closure_is_a_generator() {
        let fixed = ClientId::parse("00000000000000000000000000000001").unwrap();
        let generator = move || fixed;

        assert_eq!(generator.generate(), fixed);
        assert_eq!(generator.generate(), fixed);
    }
}
