//! Navigation capability. Fire-and-forget: the shell performs the transition
//! and nothing comes back to the core.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

pub struct Router<E> {
    context: CapabilityContext<RouterOperation, E>,
}

impl<Ev> Capability<Ev> for Router<Ev> {
    type Operation = RouterOperation;
    type MappedSelf<MappedEv> = Router<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Router::new(self.context.map_event(f))
    }
}

impl<E> Router<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<RouterOperation, E>) -> Self {
        Self { context }
    }

    pub fn navigate(&self, route: impl Into<String>) {
        let route = route.into();
        let context = self.context.clone();
        self.context.spawn(async move {
            context
                .notify_shell(RouterOperation::Navigate { route })
                .await;
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RouterOperation {
    Navigate { route: String },
}

impl Operation for RouterOperation {
    type Output = ();
}

impl RouterOperation {
    pub fn route(&self) -> &str {
        match self {
            Self::Navigate { route } => route,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_accessor() {
        let op = RouterOperation::Navigate {
            route: "Login".to_string(),
        };
        assert_eq!(op.route(), "Login");
    }

    #[test]
    fn test_wire_shape() {
        let op = RouterOperation::Navigate {
            route: "Login".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&op).unwrap(),
            r#"{"navigate":{"route":"Login"}}"#
        );
    }
}
