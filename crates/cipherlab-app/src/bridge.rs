//! API-to-application translation layer.
//!
//! The [`Bridge`] turns [`ApiCall`]s into futures against an [`Api`] and
//! wraps their outcome back into [`AppEvent::Reply`] with the issuing
//! ticket. It holds no state besides the API handle, so the runtime can keep
//! any number of calls in flight.

use cipherlab_client::{Api, ApiError};
use futures::{FutureExt, future::BoxFuture};

use crate::{ApiCall, AppEvent, Ticket, event::ApiReply};

/// Bridge between App actions and the HTTP API.
#[derive(Debug, Clone)]
pub struct Bridge<A> {
    api: A,
}

impl<A: Api> Bridge<A> {
    /// Bridge over `api`.
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Future that performs `call` and yields the reply event.
    pub fn dispatch(&self, ticket: Ticket, call: ApiCall) -> BoxFuture<'static, AppEvent> {
        tracing::debug!(%ticket, call = call.name(), "dispatch");
        let api = self.api.clone();
        async move {
            let outcome = execute(&api, call).await;
            if let Err(err) = &outcome {
                tracing::debug!(%ticket, error = %err, "call failed");
            }
            AppEvent::Reply { ticket, outcome }
        }
        .boxed()
    }
}

async fn execute<A: Api>(api: &A, call: ApiCall) -> Result<ApiReply, ApiError> {
    match call {
        ApiCall::CipherAttack(request) => api.cipher_attack(request).await.map(ApiReply::CipherAttack),
        ApiCall::Encrypt(request) => api.encrypt(request).await.map(ApiReply::Encrypted),
        ApiCall::Decrypt(request) => api.decrypt(request).await.map(ApiReply::Decrypted),
        ApiCall::CheckUser(request) => api.check_user(request).await.map(ApiReply::UserCheck),
        ApiCall::StartAttack(request) => api.start_attack(request).await.map(ApiReply::Attack),
        ApiCall::SignUp(credentials) => api.sign_up(credentials).await.map(ApiReply::Ack),
        ApiCall::SignIn(credentials) => api.sign_in(credentials).await.map(ApiReply::Ack),
        ApiCall::Users { except } => api.users(except).await.map(ApiReply::Users),
        ApiCall::Conversation { peer } => api.conversation(peer).await.map(ApiReply::Conversation),
        ApiCall::SendMessage(request) => api.send_message(request).await.map(ApiReply::Ack),
        ApiCall::StegoSend(upload) => api.stego_send(upload).await.map(ApiReply::StegoReceipt),
        ApiCall::StegoExtract { message } => {
            api.stego_extract(message).await.map(ApiReply::StegoExtraction)
        },
    }
}
