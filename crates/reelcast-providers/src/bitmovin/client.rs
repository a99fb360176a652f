//! Bitmovin transport
//!
//! [`BitmovinApi`] is the seam the adapter talks to; [`HttpBitmovinClient`]
//! is the REST implementation authenticating with `X-Api-Key`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use urlencoding::encode;

use super::types::{
    AacAudioConfiguration, AudioMediaInfo, BitmovinResponse, CustomDataEnvelope, Encoding,
    Fmp4Muxing, H264VideoConfiguration, HlsManifest, HttpInput, InputSource, Mp4Muxing,
    Mp4MuxingInformation, PaginationResponse, PresetCustomData, ResponseEnvelope, S3Input,
    S3Output, StartEncodingRequest, Stream, StreamInfo, Task,
};

#[async_trait]
pub trait BitmovinApi: Send + Sync {
    async fn create_h264_configuration(
        &self,
        config: &H264VideoConfiguration,
    ) -> Result<H264VideoConfiguration>;
    async fn get_h264_configuration(&self, id: &str) -> Result<H264VideoConfiguration>;
    async fn get_h264_custom_data(&self, id: &str) -> Result<PresetCustomData>;
    async fn delete_h264_configuration(&self, id: &str) -> Result<()>;

    async fn create_aac_configuration(
        &self,
        config: &AacAudioConfiguration,
    ) -> Result<AacAudioConfiguration>;
    async fn get_aac_configuration(&self, id: &str) -> Result<AacAudioConfiguration>;
    async fn delete_aac_configuration(&self, id: &str) -> Result<()>;

    /// Create an input and return its ID.
    async fn create_input(&self, input: &InputSource) -> Result<String>;
    async fn create_s3_output(&self, output: &S3Output) -> Result<String>;

    async fn create_encoding(&self, encoding: &Encoding) -> Result<Encoding>;
    async fn list_encodings(&self, limit: u32) -> Result<PaginationResponse<Encoding>>;
    async fn create_stream(&self, encoding_id: &str, stream: &Stream) -> Result<String>;
    async fn create_mp4_muxing(&self, encoding_id: &str, muxing: &Mp4Muxing) -> Result<String>;
    async fn create_fmp4_muxing(&self, encoding_id: &str, muxing: &Fmp4Muxing) -> Result<String>;
    async fn list_mp4_muxings(
        &self,
        encoding_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<PaginationResponse<Mp4Muxing>>;
    async fn get_mp4_muxing_information(
        &self,
        encoding_id: &str,
        muxing_id: &str,
    ) -> Result<Mp4MuxingInformation>;

    async fn create_hls_manifest(&self, manifest: &HlsManifest) -> Result<String>;
    async fn create_hls_audio_media(
        &self,
        manifest_id: &str,
        media: &AudioMediaInfo,
    ) -> Result<String>;
    async fn create_hls_stream_info(&self, manifest_id: &str, info: &StreamInfo) -> Result<String>;

    async fn start_encoding(&self, encoding_id: &str, request: &StartEncodingRequest)
        -> Result<()>;
    async fn stop_encoding(&self, encoding_id: &str) -> Result<()>;
    async fn get_encoding_status(&self, encoding_id: &str) -> Result<Task>;
}

/// HTTP client for the Bitmovin API.
#[derive(Clone)]
pub struct HttpBitmovinClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl Debug for HttpBitmovinClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("HttpBitmovinClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpBitmovinClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("X-Api-Key", self.api_key.as_str())
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> Result<T> {
        let response = self
            .apply_auth(request)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", path))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Bitmovin API request to {} failed with status {}: {}",
                path,
                status,
                error_text
            ));
        }

        let envelope: ResponseEnvelope<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse Bitmovin response from {}", path))?;

        Ok(envelope.data.result)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let mut request = self.client.get(self.build_url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(request, path).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.client.post(self.build_url(path)).json(body);
        self.execute(request, path).await
    }

    async fn post_for_id<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
        let created: BitmovinResponse = self.post(path, body).await?;
        Ok(created.id)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let request = self.client.delete(self.build_url(path));
        let _: BitmovinResponse = self.execute(request, path).await?;
        Ok(())
    }
}

#[async_trait]
impl BitmovinApi for HttpBitmovinClient {
    async fn create_h264_configuration(
        &self,
        config: &H264VideoConfiguration,
    ) -> Result<H264VideoConfiguration> {
        self.post("/encoding/configurations/video/h264", config).await
    }

    async fn get_h264_configuration(&self, id: &str) -> Result<H264VideoConfiguration> {
        self.get(&format!("/encoding/configurations/video/h264/{}", encode(id)), &[])
            .await
    }

    async fn get_h264_custom_data(&self, id: &str) -> Result<PresetCustomData> {
        let envelope: CustomDataEnvelope = self
            .get(
                &format!("/encoding/configurations/video/h264/{}/customData", encode(id)),
                &[],
            )
            .await?;
        Ok(envelope.custom_data)
    }

    async fn delete_h264_configuration(&self, id: &str) -> Result<()> {
        self.delete(&format!("/encoding/configurations/video/h264/{}", encode(id)))
            .await
    }

    async fn create_aac_configuration(
        &self,
        config: &AacAudioConfiguration,
    ) -> Result<AacAudioConfiguration> {
        self.post("/encoding/configurations/audio/aac", config).await
    }

    async fn get_aac_configuration(&self, id: &str) -> Result<AacAudioConfiguration> {
        self.get(&format!("/encoding/configurations/audio/aac/{}", encode(id)), &[])
            .await
    }

    async fn delete_aac_configuration(&self, id: &str) -> Result<()> {
        self.delete(&format!("/encoding/configurations/audio/aac/{}", encode(id)))
            .await
    }

    async fn create_input(&self, input: &InputSource) -> Result<String> {
        match input {
            InputSource::S3(s3) => self.post_for_id::<S3Input>("/encoding/inputs/s3", s3).await,
            InputSource::Http(http) => {
                self.post_for_id::<HttpInput>("/encoding/inputs/http", http)
                    .await
            }
            InputSource::Https(https) => {
                self.post_for_id::<HttpInput>("/encoding/inputs/https", https)
                    .await
            }
        }
    }

    async fn create_s3_output(&self, output: &S3Output) -> Result<String> {
        self.post_for_id("/encoding/outputs/s3", output).await
    }

    async fn create_encoding(&self, encoding: &Encoding) -> Result<Encoding> {
        self.post("/encoding/encodings", encoding).await
    }

    async fn list_encodings(&self, limit: u32) -> Result<PaginationResponse<Encoding>> {
        self.get("/encoding/encodings", &[("limit", limit.to_string())])
            .await
    }

    async fn create_stream(&self, encoding_id: &str, stream: &Stream) -> Result<String> {
        self.post_for_id(&format!("/encoding/encodings/{}/streams", encode(encoding_id)), stream)
            .await
    }

    async fn create_mp4_muxing(&self, encoding_id: &str, muxing: &Mp4Muxing) -> Result<String> {
        self.post_for_id(
            &format!("/encoding/encodings/{}/muxings/mp4", encode(encoding_id)),
            muxing,
        )
        .await
    }

    async fn create_fmp4_muxing(&self, encoding_id: &str, muxing: &Fmp4Muxing) -> Result<String> {
        self.post_for_id(
            &format!("/encoding/encodings/{}/muxings/fmp4", encode(encoding_id)),
            muxing,
        )
        .await
    }

    async fn list_mp4_muxings(
        &self,
        encoding_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<PaginationResponse<Mp4Muxing>> {
        self.get(
            &format!("/encoding/encodings/{}/muxings/mp4", encode(encoding_id)),
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    async fn get_mp4_muxing_information(
        &self,
        encoding_id: &str,
        muxing_id: &str,
    ) -> Result<Mp4MuxingInformation> {
        self.get(
            &format!(
                "/encoding/encodings/{}/muxings/mp4/{}/information",
                encoding_id, muxing_id
            ),
            &[],
        )
        .await
    }

    async fn create_hls_manifest(&self, manifest: &HlsManifest) -> Result<String> {
        self.post_for_id("/encoding/manifests/hls", manifest).await
    }

    async fn create_hls_audio_media(
        &self,
        manifest_id: &str,
        media: &AudioMediaInfo,
    ) -> Result<String> {
        self.post_for_id(
            &format!("/encoding/manifests/hls/{}/media/audio", encode(manifest_id)),
            media,
        )
        .await
    }

    async fn create_hls_stream_info(&self, manifest_id: &str, info: &StreamInfo) -> Result<String> {
        self.post_for_id(
            &format!("/encoding/manifests/hls/{}/streams", encode(manifest_id)),
            info,
        )
        .await
    }

    async fn start_encoding(
        &self,
        encoding_id: &str,
        request: &StartEncodingRequest,
    ) -> Result<()> {
        let _: BitmovinResponse = self
            .post(&format!("/encoding/encodings/{}/start", encode(encoding_id)), request)
            .await?;
        Ok(())
    }

    async fn stop_encoding(&self, encoding_id: &str) -> Result<()> {
        let _: BitmovinResponse = self
            .post(
                &format!("/encoding/encodings/{}/stop", encode(encoding_id)),
                &serde_json::json!({}),
            )
            .await?;
        Ok(())
    }

    async fn get_encoding_status(&self, encoding_id: &str) -> Result<Task> {
        self.get(&format!("/encoding/encodings/{}/status", encode(encoding_id)), &[])
            .await
    }
}
