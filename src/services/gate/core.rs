use std::sync::Arc;

use tracing::{debug, warn};

use crate::services::auth::{CredentialCodec, IdentityContext};
use crate::services::gate::stage::{Authenticate, GateError, GateStage, RequestScope, RequireRole};

/// Run one stage, logging where the request was stopped.
pub fn run_stage(stage: &dyn GateStage, scope: &mut RequestScope) -> Result<(), GateError> {
    match stage.check(scope) {
        Ok(()) => {
            debug!(stage = stage.name(), "gate stage passed");
            Ok(())
        }
        Err(err) => {
            warn!(stage = stage.name(), error = %err, "gate stage rejected request");
            Err(err)
        }
    }
}

/// Ordered list of gate stages. The first failing stage stops the run.
#[derive(Clone, Default)]
pub struct GatePipeline {
    stages: Vec<Arc<dyn GateStage>>,
}

impl std::fmt::Debug for GatePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.stages.iter().map(|s| s.name()).collect();
        f.debug_struct("GatePipeline").field("stages", &names).finish()
    }
}

impl GatePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: impl GateStage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn stages(&self) -> &[Arc<dyn GateStage>] {
        &self.stages
    }

    pub fn run(&self, scope: &mut RequestScope) -> Result<(), GateError> {
        for stage in &self.stages {
            run_stage(stage.as_ref(), scope)?;
        }
        Ok(())
    }
}

/// Authenticate-then-authorize gate in front of the order handler.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    authenticate: Authenticate,
}

impl AuthorizationGate {
    pub fn new(codec: Arc<CredentialCodec>) -> Self {
        Self {
            authenticate: Authenticate::new(codec),
        }
    }

    /// Inline form: both stages are invoked here, one after the other.
    pub fn authorize(
        &self,
        raw_credential: Option<&str>,
        required_role: &str,
    ) -> Result<IdentityContext, GateError> {
        let mut scope = RequestScope::new(raw_credential);

        run_stage(&self.authenticate, &mut scope)?;
        run_stage(&RequireRole::new(required_role), &mut scope)?;

        scope.into_identity().ok_or(GateError::Unauthenticated)
    }

    /// Staged form: the same two stages, as reusable filters.
    pub fn pipeline(&self, required_role: &str) -> GatePipeline {
        GatePipeline::new()
            .with_stage(self.authenticate.clone())
            .with_stage(RequireRole::new(required_role))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::services::auth::credential::tests::codec;

    struct Counting {
        calls: Arc<AtomicUsize>,
        result: Result<(), GateError>,
    }

    impl GateStage for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn check(&self, _scope: &mut RequestScope) -> Result<(), GateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn gate() -> (AuthorizationGate, Arc<CredentialCodec>) {
        let codec = Arc::new(codec());
        (AuthorizationGate::new(codec.clone()), codec)
    }

    #[test]
    fn absent_credential_is_unauthenticated() {
        let (gate, _) = gate();
        assert_eq!(gate.authorize(None, "Customer"), Err(GateError::Unauthenticated));
    }

    #[test]
    fn invalid_credential_is_unauthenticated() {
        let (gate, _) = gate();
        assert_eq!(
            gate.authorize(Some("definitely.not.valid"), "Customer"),
            Err(GateError::Unauthenticated)
        );
    }

    #[test]
    fn empty_role_is_forbidden() {
        let (gate, codec) = gate();
        let token = codec.issue(Some("John"), "").unwrap();

        assert!(matches!(
            gate.authorize(Some(token.as_str()), "Customer"),
            Err(GateError::Forbidden { .. })
        ));
    }

    #[test]
    fn role_match_is_exact() {
        let (gate, codec) = gate();
        let token = codec.issue(Some("John"), "customer").unwrap();

        assert!(matches!(
            gate.authorize(Some(token.as_str()), "Customer"),
            Err(GateError::Forbidden { .. })
        ));
    }

    #[test]
    fn role_only_credential_is_authorized() {
        let (gate, codec) = gate();
        let token = codec.issue(None, "Customer").unwrap();

        let identity = gate.authorize(Some(token.as_str()), "Customer").unwrap();
        assert!(identity.is_authenticated);
        assert!(identity.subject.is_none());
    }

    #[test]
    fn pipeline_matches_inline_gate() {
        let (gate, codec) = gate();
        let pipeline = gate.pipeline("Customer");
        let customer = codec.issue(Some("John"), "Customer").unwrap();
        let no_role = codec.issue(Some("John"), "").unwrap();

        for raw in [None, Some("garbage"), Some(customer.as_str()), Some(no_role.as_str())] {
            let inline = gate.authorize(raw, "Customer");

            let mut scope = RequestScope::new(raw);
            let staged = pipeline
                .run(&mut scope)
                .and_then(|()| scope.into_identity().ok_or(GateError::Unauthenticated));

            assert_eq!(inline, staged);
        }
    }

    #[test]
    fn pipeline_stops_at_first_failure() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let pipeline = GatePipeline::new()
            .with_stage(Counting {
                calls: first.clone(),
                result: Err(GateError::Unauthenticated),
            })
            .with_stage(Counting {
                calls: second.clone(),
                result: Ok(()),
            });

        let result = pipeline.run(&mut RequestScope::new(None));

        assert_eq!(result, Err(GateError::Unauthenticated));
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn pipeline_keeps_registration_order() {
        let (gate, _) = gate();
        let names: Vec<_> = gate
            .pipeline("Customer")
            .stages()
            .iter()
            .map(|s| s.name())
            .collect();

        assert_eq!(names, ["authenticate", "authorize"]);
    }
}
