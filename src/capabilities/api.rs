//! Remote profile service capability.
//!
//! The shell owns transport, base URL and headers. The core only asks whether
//! a token is still good and, if so, for the user it belongs to. Transport
//! failures are reported by the shell through the same `error` field the
//! service itself uses.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::model::UserRecord;

pub struct ProfileApi<E> {
    context: CapabilityContext<ApiOperation, E>,
}

impl<Ev> Capability<Ev> for ProfileApi<Ev> {
    type Operation = ApiOperation;
    type MappedSelf<MappedEv> = ProfileApi<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        ProfileApi::new(self.context.map_event(f))
    }
}

impl<E> ProfileApi<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<ApiOperation, E>) -> Self {
        Self { context }
    }

    /// `token` is `None` when nothing is cached; the request is still sent.
    pub fn check_token<F>(&self, token: Option<String>, callback: F)
    where
        F: FnOnce(CheckTokenResponse) -> E + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let response = context
                .request_from_shell(ApiOperation::CheckToken { token })
                .await;
            context.update_app(callback(response));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ApiOperation {
    CheckToken { token: Option<String> },
}

impl Operation for ApiOperation {
    type Output = CheckTokenResponse;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CheckTokenResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<UserRecord>,
}

impl CheckTokenResponse {
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            data: None,
        }
    }

    pub fn verified(user: UserRecord) -> Self {
        Self {
            error: None,
            data: Some(user),
        }
    }

    /// An empty `error` string does not count as an error; `error` wins over
    /// `data` when both are present.
    pub fn into_check(self) -> TokenCheck {
        match (self.error, self.data) {
            (Some(error), _) if !error.is_empty() => TokenCheck::Rejected(error),
            (_, Some(user)) => TokenCheck::Verified(user),
            _ => TokenCheck::Empty,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenCheck {
    Rejected(String),
    Verified(UserRecord),
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserRecord {
        UserRecord {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_error_is_rejected() {
        let check = CheckTokenResponse::rejected("bad token").into_check();
        assert_eq!(check, TokenCheck::Rejected("bad token".to_string()));
    }

    #[test]
    fn test_data_is_verified() {
        let check = CheckTokenResponse::verified(alice()).into_check();
        assert_eq!(check, TokenCheck::Verified(alice()));
    }

    #[test]
    fn test_error_wins_over_data() {
        let response = CheckTokenResponse {
            error: Some("expired".to_string()),
            data: Some(alice()),
        };
        assert_eq!(
            response.into_check(),
            TokenCheck::Rejected("expired".to_string())
        );
    }

    #[test]
    fn test_empty_error_string_is_not_an_error() {
        let response = CheckTokenResponse {
            error: Some(String::new()),
            data: Some(alice()),
        };
        assert_eq!(response.into_check(), TokenCheck::Verified(alice()));
    }

    #[test]
    fn test_neither_field_is_empty() {
        assert_eq!(CheckTokenResponse::default().into_check(), TokenCheck::Empty);
    }

    #[test]
    fn test_wire_shape() {
        let response: CheckTokenResponse = serde_json::from_str(
            r#"{"data":{"name":"A","email":"a@x.com","avatar":null}}"#,
        )
        .unwrap();
        assert_eq!(response.error, None);
        assert_eq!(response.data.unwrap().name, "A");

        let response: CheckTokenResponse =
            serde_json::from_str(r#"{"error":"bad token"}"#).unwrap();
        assert_eq!(response.error.as_deref(), Some("bad token"));
    }

    #[test]
    fn test_operation_wire_shape() {
        let op = ApiOperation::CheckToken { token: None };
        assert_eq!(
            serde_json::to_string(&op).unwrap(),
            r#"{"checkToken":{"token":null}}"#
        );
    }
}
