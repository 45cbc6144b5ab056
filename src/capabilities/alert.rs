//! Blocking alert dialog. The shell shows it modally; dismissal is local to
//! the shell and produces no event.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

pub struct Alert<E> {
    context: CapabilityContext<AlertOperation, E>,
}

impl<Ev> Capability<Ev> for Alert<Ev> {
    type Operation = AlertOperation;
    type MappedSelf<MappedEv> = Alert<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Alert::new(self.context.map_event(f))
    }
}

impl<E> Alert<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<AlertOperation, E>) -> Self {
        Self { context }
    }

    pub fn show(&self, title: impl Into<String>, message: impl Into<String>) {
        let operation = AlertOperation::Show {
            title: title.into(),
            message: message.into(),
        };
        let context = self.context.clone();
        self.context.spawn(async move {
            context.notify_shell(operation).await;
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AlertOperation {
    Show { title: String, message: String },
}

impl Operation for AlertOperation {
    type Output = ();
}
