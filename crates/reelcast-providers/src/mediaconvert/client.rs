//! MediaConvert transport
//!
//! [`MediaConvertApi`] is the seam adapter logic talks to. The production
//! implementation, [`HttpMediaConvertClient`], speaks the REST/JSON API
//! directly and signs every request with SigV4.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::{Duration, SystemTime};
use tokio::sync::OnceCell;

use super::types::{
    CreateJobRequest, CreatePresetRequest, Job, JobResponse, ListJobsResponse, Preset,
    PresetResponse,
};
use reelcast_core::MediaConvertConfig;

const API_VERSION: &str = "2017-08-29";
const SIGNING_NAME: &str = "mediaconvert";

#[async_trait]
pub trait MediaConvertApi: Send + Sync {
    async fn create_job(&self, request: &CreateJobRequest) -> Result<Job>;
    async fn get_job(&self, id: &str) -> Result<Job>;
    async fn cancel_job(&self, id: &str) -> Result<()>;
    async fn list_jobs(&self, max_results: u32) -> Result<Vec<Job>>;
    async fn create_preset(&self, request: &CreatePresetRequest) -> Result<Preset>;
    async fn get_preset(&self, name: &str) -> Result<Preset>;
    async fn delete_preset(&self, name: &str) -> Result<()>;
}

/// SigV4-signed HTTP client for the MediaConvert account endpoint.
pub struct HttpMediaConvertClient {
    http: Client,
    endpoint: String,
    region: Option<String>,
    credentials: Option<Credentials>,
    sdk_config: OnceCell<aws_config::SdkConfig>,
}

impl Debug for HttpMediaConvertClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("HttpMediaConvertClient")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .finish()
    }
}

impl HttpMediaConvertClient {
    pub fn new(config: &MediaConvertConfig, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let credentials = match (&config.access_key_id, &config.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Some(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "reelcast-config",
            )),
            _ => None,
        };

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            region: config.region.clone(),
            credentials,
            sdk_config: OnceCell::new(),
        })
    }

    /// Region and credentials to sign with.
    ///
    /// Explicit configuration wins; anything missing is resolved once through
    /// the AWS default provider chain.
    async fn signing_identity(&self) -> Result<(String, Credentials)> {
        if let (Some(region), Some(credentials)) = (&self.region, &self.credentials) {
            return Ok((region.clone(), credentials.clone()));
        }

        let sdk_config = self
            .sdk_config
            .get_or_init(|| async { aws_config::defaults(BehaviorVersion::latest()).load().await })
            .await;

        let region = match &self.region {
            Some(region) => region.clone(),
            None => sdk_config
                .region()
                .map(|region| region.to_string())
                .context("No AWS region configured for MediaConvert")?,
        };

        let credentials = match &self.credentials {
            Some(credentials) => credentials.clone(),
            None => sdk_config
                .credentials_provider()
                .context("No AWS credentials provider available")?
                .provide_credentials()
                .await
                .context("Failed to resolve AWS credentials")?,
        };

        Ok((region, credentials))
    }

    async fn send(&self, method: Method, path: &str, body: Vec<u8>) -> Result<reqwest::Response> {
        let url = format!("{}/{}/{}", self.endpoint, API_VERSION, path);
        let (region, credentials) = self.signing_identity().await?;

        let identity = credentials.into();
        let signing_params = v4::SigningParams::builder()
            .identity(&identity)
            .region(&region)
            .name(SIGNING_NAME)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .context("Failed to build SigV4 signing parameters")?
            .into();

        let headers = [("content-type", "application/json")];
        let signable = SignableRequest::new(
            method.as_str(),
            &url,
            headers.iter().copied(),
            SignableBody::Bytes(&body),
        )
        .context("Failed to prepare request for signing")?;

        let (instructions, _signature) = sign(signable, &signing_params)
            .context("Failed to sign MediaConvert request")?
            .into_parts();

        let mut request = self
            .http
            .request(method, &url)
            .header("content-type", "application/json");
        for (name, value) in instructions.headers() {
            request = request.header(name, value);
        }

        request
            .body(body)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Vec<u8>,
    ) -> Result<T> {
        let response = self.send(method, path, body).await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("MediaConvert API error: {} - {}", status, error_text);
        }

        response
            .json::<T>()
            .await
            .context("Failed to parse MediaConvert response")
    }

    async fn call_empty(&self, method: Method, path: &str) -> Result<()> {
        let response = self.send(method, path, Vec::new()).await?;
        let status = response.status();

        // DELETE answers 202 Accepted with an empty body.
        if !status.is_success() && status != StatusCode::ACCEPTED {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("MediaConvert API error: {} - {}", status, error_text);
        }
        Ok(())
    }
}

fn job_path(id: &str) -> String {
    format!("jobs/{}", urlencoding::encode(id))
}

fn preset_path(name: &str) -> String {
    format!("presets/{}", urlencoding::encode(name))
}

fn json_body<B: Serialize>(body: &B) -> Result<Vec<u8>> {
    serde_json::to_vec(body).context("Failed to serialize MediaConvert request")
}

#[async_trait]
impl MediaConvertApi for HttpMediaConvertClient {
    async fn create_job(&self, request: &CreateJobRequest) -> Result<Job> {
        let response: JobResponse = self.call(Method::POST, "jobs", json_body(request)?).await?;
        Ok(response.job)
    }

    async fn get_job(&self, id: &str) -> Result<Job> {
        let response: JobResponse = self
            .call(Method::GET, &job_path(id), Vec::new())
            .await?;
        Ok(response.job)
    }

    async fn cancel_job(&self, id: &str) -> Result<()> {
        self.call_empty(Method::DELETE, &job_path(id)).await
    }

    async fn list_jobs(&self, max_results: u32) -> Result<Vec<Job>> {
        let response: ListJobsResponse = self
            .call(
                Method::GET,
                &format!("jobs?maxResults={}", max_results),
                Vec::new(),
            )
            .await?;
        Ok(response.jobs)
    }

    async fn create_preset(&self, request: &CreatePresetRequest) -> Result<Preset> {
        let response: PresetResponse = self
            .call(Method::POST, "presets", json_body(request)?)
            .await?;
        Ok(response.preset)
    }

    async fn get_preset(&self, name: &str) -> Result<Preset> {
        let response: PresetResponse = self
            .call(Method::GET, &preset_path(name), Vec::new())
            .await?;
        Ok(response.preset)
    }

    async fn delete_preset(&self, name: &str) -> Result<()> {
        self.call_empty(Method::DELETE, &preset_path(name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> HttpMediaConvertClient {
        let config = MediaConvertConfig {
            endpoint: format!("{}/", server.url()),
            queue: "arn:aws:mediaconvert:us-east-1:1:queues/Default".to_string(),
            role: "arn:aws:iam::1:role/MediaConvert".to_string(),
            destination: "s3://bucket/out".to_string(),
            region: Some("us-east-1".to_string()),
            access_key_id: Some("AKIDEXAMPLE".to_string()),
            secret_access_key: Some("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string()),
        };
        HttpMediaConvertClient::new(&config, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_get_job_is_signed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/2017-08-29/jobs/1234-abcd")
            .match_header(
                "authorization",
                Matcher::Regex(r"^AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/\d{8}/us-east-1/mediaconvert/aws4_request".to_string()),
            )
            .match_header("x-amz-date", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"job": {"id": "1234-abcd", "status": "PROGRESSING", "jobPercentComplete": 10}}"#)
            .create_async()
            .await;

        let job = client_for(&server).get_job("1234-abcd").await.unwrap();
        assert_eq!(job.status.as_deref(), Some("PROGRESSING"));
        assert_eq!(job.job_percent_complete, Some(10));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_jobs_passes_max_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/2017-08-29/jobs")
            .match_query(Matcher::UrlEncoded("maxResults".into(), "1".into()))
            .with_status(200)
            .with_body(r#"{"jobs": []}"#)
            .create_async()
            .await;

        let jobs = client_for(&server).list_jobs(1).await.unwrap();
        assert!(jobs.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_includes_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2017-08-29/presets/missing")
            .with_status(404)
            .with_body(r#"{"message": "Preset missing not found"}"#)
            .create_async()
            .await;

        let err = client_for(&server).get_preset("missing").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("Preset missing not found"));
    }

    #[tokio::test]
    async fn test_delete_preset_accepts_202() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/2017-08-29/presets/720p")
            .with_status(202)
            .create_async()
            .await;

        client_for(&server).delete_preset("720p").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_preset_name_is_percent_encoded() {
        let mut server = mockito::Server::new_async().await;
        let get = server
            .mock("GET", "/2017-08-29/presets/My%20Preset")
            .match_header("authorization", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"preset": {"name": "My Preset", "settings": {"containerSettings": {"container": "MP4"}}}}"#)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/2017-08-29/presets/My%20Preset")
            .with_status(202)
            .create_async()
            .await;

        let client = client_for(&server);
        let preset = client.get_preset("My Preset").await.unwrap();
        assert_eq!(preset.name, "My Preset");
        client.delete_preset("My Preset").await.unwrap();

        get.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_job_id_is_percent_encoded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/2017-08-29/jobs/job%2F1%3Fx")
            .with_status(202)
            .create_async()
            .await;

        client_for(&server).cancel_job("job/1?x").await.unwrap();
        mock.assert_async().await;
    }
}
