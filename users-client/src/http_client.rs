use reqwest::Client;
use serde::Deserialize;

use crate::error::UsersClientError;
use crate::{NewUser, User, UserPatch};

#[derive(Clone)]
pub struct UsersClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CollectionEnvelope {
    data: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct RecordEnvelope {
    data: User,
}

impl UsersClient {
    pub fn new(endpoint: &str) -> Result<Self, UsersClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub async fn list(&self) -> Result<Vec<User>, UsersClientError> {
        let resp = self
            .client
            .get(format!("{}/api/users", self.base_url))
            .send()
            .await?;

        if resp.status().is_success() {
            let envelope: CollectionEnvelope = resp.json().await?;
            Ok(envelope.data)
        } else {
            Err(UsersClientError::from_response(resp).await)
        }
    }

    pub async fn get(&self, id: u64) -> Result<User, UsersClientError> {
        let resp = self
            .client
            .get(format!("{}/api/users/{}", self.base_url, id))
            .send()
            .await?;

        if resp.status().is_success() {
            let envelope: RecordEnvelope = resp.json().await?;
            Ok(envelope.data)
        } else {
            Err(UsersClientError::from_response(resp).await)
        }
    }

    pub async fn create(&self, user: &NewUser) -> Result<User, UsersClientError> {
        let resp = self
            .client
            .post(format!("{}/api/users", self.base_url))
            .json(user)
            .send()
            .await?;

        if resp.status().is_success() {
            let envelope: RecordEnvelope = resp.json().await?;
            Ok(envelope.data)
        } else {
            Err(UsersClientError::from_response(resp).await)
        }
    }

    pub async fn update(&self, id: u64, patch: &UserPatch) -> Result<User, UsersClientError> {
        let resp = self
            .client
            .put(format!("{}/api/users/{}", self.base_url, id))
            .json(patch)
            .send()
            .await?;

        if resp.status().is_success() {
            let envelope: RecordEnvelope = resp.json().await?;
            Ok(envelope.data)
        } else {
            Err(UsersClientError::from_response(resp).await)
        }
    }

    /// Returns the removed record, as the server echoes it back.
    pub async fn delete(&self, id: u64) -> Result<User, UsersClientError> {
        let resp = self
            .client
            .delete(format!("{}/api/users/{}", self.base_url, id))
            .send()
            .await?;

        if resp.status().is_success() {
            let envelope: RecordEnvelope = resp.json().await?;
            Ok(envelope.data)
        } else {
            Err(UsersClientError::from_response(resp).await)
        }
    }
}
