//! `reqwest` implementation of [`Api`].

use cipherlab_proto::{
    Ack, AttackOutcome, CipherAttackReport, Conversation, Decrypted, Encrypted, Endpoint,
    MessageId, Method, Reply, StegoExtraction, StegoReceipt, UserCheck, UserId, UserList,
    requests::{
        CheckUserRequest, CipherAttackRequest, Credentials, DecryptRequest, EncryptRequest,
        SendMessageRequest, StartAttackRequest, StegoUpload,
    },
};
use reqwest::{
    RequestBuilder, Response,
    multipart::{Form, Part},
};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::{Api, ApiError, ClientConfig};

/// HTTP client bound to one server.
///
/// Cloning is cheap and clones share the connection pool and the session
/// cookie, so a sign-in through one clone authenticates all of them.
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    base: Url,
}

impl HttpApi {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL does not parse or is not
    /// an `http(s)` URL, and [`ApiError::Transport`] if the TLS backend
    /// cannot be initialised.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut base = Url::parse(&config.base_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!("unsupported scheme: {}", base.scheme())));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { http, base })
    }

    /// Server root every route is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL of `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] for a path segment that would escape its
    /// route.
    pub fn url(&self, endpoint: &Endpoint) -> Result<Url, ApiError> {
        Ok(self.base.join(&endpoint.path()?)?)
    }

    /// Request for `endpoint` with the route's method.
    fn request(&self, endpoint: &Endpoint) -> Result<RequestBuilder, ApiError> {
        let url = self.url(endpoint)?;
        let method = endpoint.method();
        tracing::debug!(%url, ?method, "request");
        Ok(match method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
        })
    }

    async fn post_json<B, T>(&self, endpoint: Endpoint, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self.request(&endpoint)?.json(body).send().await?;
        Self::decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ApiError> {
        let response = self.request(&endpoint)?.send().await?;
        Self::decode(response).await
    }

    /// Fold the response into the payload or an error.
    ///
    /// The server answers rejections with a 4xx status and a JSON envelope,
    /// so the body is decoded first and the status only matters when the
    /// body is unusable.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.bytes().await?;

        match Reply::<T>::decode(&body) {
            Ok(Reply::Ok(payload)) => Ok(payload),
            Ok(Reply::Err { message }) => {
                tracing::debug!(status = status.as_u16(), %message, "request rejected");
                Err(ApiError::Rejected { message })
            },
            Err(_) if !status.is_success() => Err(ApiError::Status(status.as_u16())),
            Err(err) => Err(err.into()),
        }
    }
}

impl Api for HttpApi {
    async fn cipher_attack(
        &self,
        request: CipherAttackRequest,
    ) -> Result<CipherAttackReport, ApiError> {
        self.post_json(Endpoint::CipherAttack, &request).await
    }

    async fn encrypt(&self, request: EncryptRequest) -> Result<Encrypted, ApiError> {
        self.post_json(Endpoint::Encrypt, &request).await
    }

    async fn decrypt(&self, request: DecryptRequest) -> Result<Decrypted, ApiError> {
        self.post_json(Endpoint::Decrypt, &request).await
    }

    async fn check_user(&self, request: CheckUserRequest) -> Result<UserCheck, ApiError> {
        self.post_json(Endpoint::CheckUser, &request).await
    }

    async fn start_attack(&self, request: StartAttackRequest) -> Result<AttackOutcome, ApiError> {
        self.post_json(Endpoint::StartAttack, &request).await
    }

    async fn sign_up(&self, credentials: Credentials) -> Result<Ack, ApiError> {
        self.post_json(Endpoint::SignUp, &credentials).await
    }

    async fn sign_in(&self, credentials: Credentials) -> Result<Ack, ApiError> {
        self.post_json(Endpoint::SignIn, &credentials).await
    }

    async fn users(&self, except: Option<UserId>) -> Result<UserList, ApiError> {
        let endpoint = except.map_or(Endpoint::Users, Endpoint::OtherUsers);
        self.get_json(endpoint).await
    }

    async fn conversation(&self, peer: UserId) -> Result<Conversation, ApiError> {
        self.get_json(Endpoint::Conversation(peer)).await
    }

    async fn send_message(&self, request: SendMessageRequest) -> Result<Ack, ApiError> {
        self.post_json(Endpoint::SendMessage, &request).await
    }

    async fn stego_send(&self, upload: StegoUpload) -> Result<StegoReceipt, ApiError> {
        let audio = Part::bytes(upload.audio).file_name(upload.file_name).mime_str(&upload.mime)?;
        let form = Form::new()
            .part("audio_file", audio)
            .text("secret_message", upload.secret_message)
            .text("receiver_id", upload.receiver_id.to_string());

        let response = self.request(&Endpoint::StegoSend)?.multipart(form).send().await?;
        Self::decode(response).await
    }

    async fn stego_extract(&self, message: MessageId) -> Result<StegoExtraction, ApiError> {
        self.get_json(Endpoint::StegoExtract(message)).await
    }

    async fn stego_audio(&self, file_name: String) -> Result<Vec<u8>, ApiError> {
        let response = self.request(&Endpoint::StegoAudio(file_name))?.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let api = HttpApi::new(&ClientConfig::with_base_url("http://host:5000/lab")).unwrap();
        assert_eq!(api.base_url().as_str(), "http://host:5000/lab/");
        assert_eq!(
            api.url(&Endpoint::Conversation(3)).unwrap().as_str(),
            "http://host:5000/lab/api/messages/conversation/3"
        );
    }

    #[test]
    fn rejects_non_http_base() {
        let err = HttpApi::new(&ClientConfig::with_base_url("ftp://host/")).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
        assert!(matches!(
            HttpApi::new(&ClientConfig::with_base_url("not a url")),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn audio_name_with_separator_is_refused_before_sending() {
        let api = HttpApi::new(&ClientConfig::default()).unwrap();
        let err = api.url(&Endpoint::StegoAudio("../db.sqlite".into())).unwrap_err();
        assert!(matches!(err, ApiError::Decode(cipherlab_proto::ProtoError::InvalidPathSegment(_))));
    }
}
