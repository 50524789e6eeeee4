//! Stand-in for a service without credentials. Always fails, never touches the network.

use crate::domain::{AdapterFailure, ServiceDescriptor, ServiceOutcome};
use crate::ports::AiServicePort;
use std::time::Duration;

pub struct UnconfiguredAdapter {
    descriptor: ServiceDescriptor,
}

impl UnconfiguredAdapter {
    pub fn new(descriptor: ServiceDescriptor) -> Self {
        Self { descriptor }
    }
}

#[async_trait::async_trait]
impl AiServicePort for UnconfiguredAdapter {
    fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    fn is_configured(&self) -> bool {
        false
    }

    async fn ask(&self, _message: &str, _timeout: Duration) -> ServiceOutcome {
        AdapterFailure::not_configured(&self.descriptor.name).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_not_configured() {
        let adapter = UnconfiguredAdapter::new(ServiceDescriptor::together());
        let outcome = adapter.ask("Hello", Duration::from_secs(1)).await;
        assert_eq!(
            outcome,
            ServiceOutcome::failure("Together API key not configured")
        );
        assert!(!adapter.is_configured());
    }
}
