//! In-memory Bitmovin transport

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::bitmovin::types::{
    AacAudioConfiguration, AudioMediaInfo, Encoding, Fmp4Muxing, H264VideoConfiguration,
    HlsManifest, InputSource, Mp4Muxing, Mp4MuxingInformation, MuxingVideoTrack,
    PaginationResponse, PresetCustomData, S3Output, StartEncodingRequest, Stream, StreamInfo, Task,
};
use crate::bitmovin::BitmovinApi;

/// Fake Bitmovin account recording every call in order.
#[derive(Default)]
pub struct FakeBitmovin {
    calls: Mutex<Vec<String>>,
    h264: Mutex<HashMap<String, H264VideoConfiguration>>,
    aac: Mutex<HashMap<String, AacAudioConfiguration>>,
    inputs: Mutex<Vec<InputSource>>,
    tasks: Mutex<HashMap<String, Task>>,
    mp4_muxings: Mutex<HashMap<String, Vec<Mp4Muxing>>>,
    fmp4_muxings: Mutex<HashMap<String, Vec<Fmp4Muxing>>>,
    muxing_info: Mutex<HashMap<String, Mp4MuxingInformation>>,
    muxing_totals: Mutex<HashMap<String, i64>>,
    manifests: Mutex<Vec<HlsManifest>>,
    start_requests: Mutex<HashMap<String, StartEncodingRequest>>,
    list_encodings_error: Mutex<Option<String>>,
    h264_error: Mutex<Option<String>>,
    muxing_list_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl FakeBitmovin {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn custom_data(&self, id: &str) -> Option<PresetCustomData> {
        self.h264
            .lock()
            .unwrap()
            .get(id)
            .and_then(|config| config.custom_data.clone())
    }

    pub fn has_aac_configuration(&self, id: &str) -> bool {
        self.aac.lock().unwrap().contains_key(id)
    }

    pub fn created_inputs(&self) -> Vec<InputSource> {
        self.inputs.lock().unwrap().clone()
    }

    pub fn mp4_muxings(&self, encoding_id: &str) -> Vec<Mp4Muxing> {
        self.mp4_muxings
            .lock()
            .unwrap()
            .get(encoding_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn fmp4_muxings(&self, encoding_id: &str) -> Vec<Fmp4Muxing> {
        self.fmp4_muxings
            .lock()
            .unwrap()
            .get(encoding_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn hls_manifests(&self) -> Vec<HlsManifest> {
        self.manifests.lock().unwrap().clone()
    }

    pub fn start_request(&self, encoding_id: &str) -> Option<StartEncodingRequest> {
        self.start_requests.lock().unwrap().get(encoding_id).cloned()
    }

    pub fn muxing_list_calls(&self) -> usize {
        self.muxing_list_calls.load(Ordering::SeqCst)
    }

    pub fn fail_list_encodings(&self, message: &str) {
        *self.list_encodings_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_create_h264(&self, message: &str) {
        *self.h264_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn aac_configuration_ids(&self) -> Vec<String> {
        self.aac.lock().unwrap().keys().cloned().collect()
    }

    /// Register a finished MP4 muxing with its information.
    pub fn add_finished_muxing(
        &self,
        encoding_id: &str,
        filename: &str,
        video_tracks: Vec<MuxingVideoTrack>,
        file_size: i64,
    ) {
        let muxing_id = self.id("muxing");
        self.muxing_info.lock().unwrap().insert(
            muxing_id.clone(),
            Mp4MuxingInformation {
                file_size: Some(file_size),
                container_format: Some("mp4".to_string()),
                video_tracks,
            },
        );
        self.mp4_muxings
            .lock()
            .unwrap()
            .entry(encoding_id.to_string())
            .or_default()
            .push(Mp4Muxing {
                id: Some(muxing_id),
                filename: filename.to_string(),
                ..Default::default()
            });
    }

    /// Report `total` muxings in listings regardless of how many exist.
    pub fn overstate_muxing_total(&self, encoding_id: &str, total: i64) {
        self.muxing_totals
            .lock()
            .unwrap()
            .insert(encoding_id.to_string(), total);
    }

    /// Mark an encoding finished, reporting `track` for every MP4 muxing.
    pub fn finish_encoding(&self, encoding_id: &str, track: MuxingVideoTrack) {
        if let Some(task) = self.tasks.lock().unwrap().get_mut(encoding_id) {
            task.status = "FINISHED".to_string();
            task.progress = Some(100.0);
        }

        let muxings = self.mp4_muxings(encoding_id);
        let mut info = self.muxing_info.lock().unwrap();
        for muxing in muxings.iter().filter_map(|m| m.id.clone()) {
            info.insert(
                muxing,
                Mp4MuxingInformation {
                    file_size: Some(4_096),
                    container_format: Some("mp4".to_string()),
                    video_tracks: vec![track.clone()],
                },
            );
        }
    }

    fn set_status(&self, encoding_id: &str, status: &str) -> Result<()> {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .get_mut(encoding_id)
            .ok_or_else(|| anyhow!("encoding {} not found", encoding_id))?;
        task.status = status.to_string();
        Ok(())
    }
}

#[async_trait]
impl BitmovinApi for FakeBitmovin {
    async fn create_h264_configuration(
        &self,
        config: &H264VideoConfiguration,
    ) -> Result<H264VideoConfiguration> {
        self.record("create_h264_configuration");
        if let Some(message) = self.h264_error.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }
        let mut created = config.clone();
        created.id = Some(self.id("h264"));
        self.h264
            .lock()
            .unwrap()
            .insert(created.id.clone().unwrap_or_default(), created.clone());
        Ok(created)
    }

    async fn get_h264_configuration(&self, id: &str) -> Result<H264VideoConfiguration> {
        self.record("get_h264_configuration");
        self.h264
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("404 Not Found: video configuration {}", id))
    }

    async fn get_h264_custom_data(&self, id: &str) -> Result<PresetCustomData> {
        self.record("get_h264_custom_data");
        self.h264
            .lock()
            .unwrap()
            .get(id)
            .map(|config| config.custom_data.clone().unwrap_or_default())
            .ok_or_else(|| anyhow!("404 Not Found: video configuration {}", id))
    }

    async fn delete_h264_configuration(&self, id: &str) -> Result<()> {
        self.record("delete_h264_configuration");
        self.h264
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("404 Not Found: video configuration {}", id))
    }

    async fn create_aac_configuration(
        &self,
        config: &AacAudioConfiguration,
    ) -> Result<AacAudioConfiguration> {
        self.record("create_aac_configuration");
        let mut created = config.clone();
        created.id = Some(self.id("aac"));
        self.aac
            .lock()
            .unwrap()
            .insert(created.id.clone().unwrap_or_default(), created.clone());
        Ok(created)
    }

    async fn get_aac_configuration(&self, id: &str) -> Result<AacAudioConfiguration> {
        self.record("get_aac_configuration");
        self.aac
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("404 Not Found: audio configuration {}", id))
    }

    async fn delete_aac_configuration(&self, id: &str) -> Result<()> {
        self.record("delete_aac_configuration");
        self.aac
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("404 Not Found: audio configuration {}", id))
    }

    async fn create_input(&self, input: &InputSource) -> Result<String> {
        self.record("create_input");
        self.inputs.lock().unwrap().push(input.clone());
        Ok(self.id("input"))
    }

    async fn create_s3_output(&self, _output: &S3Output) -> Result<String> {
        self.record("create_s3_output");
        Ok(self.id("output"))
    }

    async fn create_encoding(&self, encoding: &Encoding) -> Result<Encoding> {
        self.record("create_encoding");
        let mut created = encoding.clone();
        let id = self.id("encoding");
        created.id = Some(id.clone());
        self.tasks.lock().unwrap().insert(
            id,
            Task {
                status: "CREATED".to_string(),
                progress: None,
                messages: Vec::new(),
            },
        );
        Ok(created)
    }

    async fn list_encodings(&self, limit: u32) -> Result<PaginationResponse<Encoding>> {
        self.record("list_encodings");
        if let Some(message) = self.list_encodings_error.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }
        Ok(PaginationResponse {
            total_count: Some(0),
            offset: 0,
            limit: i64::from(limit),
            items: Vec::new(),
        })
    }

    async fn create_stream(&self, _encoding_id: &str, _stream: &Stream) -> Result<String> {
        self.record("create_stream");
        Ok(self.id("stream"))
    }

    async fn create_mp4_muxing(&self, encoding_id: &str, muxing: &Mp4Muxing) -> Result<String> {
        self.record("create_mp4_muxing");
        let id = self.id("muxing");
        let mut created = muxing.clone();
        created.id = Some(id.clone());
        self.mp4_muxings
            .lock()
            .unwrap()
            .entry(encoding_id.to_string())
            .or_default()
            .push(created);
        Ok(id)
    }

    async fn create_fmp4_muxing(&self, encoding_id: &str, muxing: &Fmp4Muxing) -> Result<String> {
        self.record("create_fmp4_muxing");
        let id = self.id("muxing");
        let mut created = muxing.clone();
        created.id = Some(id.clone());
        self.fmp4_muxings
            .lock()
            .unwrap()
            .entry(encoding_id.to_string())
            .or_default()
            .push(created);
        Ok(id)
    }

    async fn list_mp4_muxings(
        &self,
        encoding_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<PaginationResponse<Mp4Muxing>> {
        self.record("list_mp4_muxings");
        self.muxing_list_calls.fetch_add(1, Ordering::SeqCst);

        let all = self.mp4_muxings(encoding_id);
        let total = self
            .muxing_totals
            .lock()
            .unwrap()
            .get(encoding_id)
            .copied()
            .unwrap_or(all.len() as i64);
        let items = all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        Ok(PaginationResponse {
            total_count: Some(total),
            offset: i64::from(offset),
            limit: i64::from(limit),
            items,
        })
    }

    async fn get_mp4_muxing_information(
        &self,
        _encoding_id: &str,
        muxing_id: &str,
    ) -> Result<Mp4MuxingInformation> {
        self.record("get_mp4_muxing_information");
        self.muxing_info
            .lock()
            .unwrap()
            .get(muxing_id)
            .cloned()
            .ok_or_else(|| anyhow!("404 Not Found: muxing {}", muxing_id))
    }

    async fn create_hls_manifest(&self, manifest: &HlsManifest) -> Result<String> {
        self.record("create_hls_manifest");
        self.manifests.lock().unwrap().push(manifest.clone());
        Ok(self.id("manifest"))
    }

    async fn create_hls_audio_media(
        &self,
        _manifest_id: &str,
        _media: &AudioMediaInfo,
    ) -> Result<String> {
        self.record("create_hls_audio_media");
        Ok(self.id("media"))
    }

    async fn create_hls_stream_info(&self, _manifest_id: &str, _info: &StreamInfo) -> Result<String> {
        self.record("create_hls_stream_info");
        Ok(self.id("stream-info"))
    }

    async fn start_encoding(&self, encoding_id: &str, request: &StartEncodingRequest) -> Result<()> {
        self.record("start_encoding");
        self.set_status(encoding_id, "QUEUED")?;
        self.start_requests
            .lock()
            .unwrap()
            .insert(encoding_id.to_string(), request.clone());
        Ok(())
    }

    async fn stop_encoding(&self, encoding_id: &str) -> Result<()> {
        self.record("stop_encoding");
        self.set_status(encoding_id, "CANCELED")
    }

    async fn get_encoding_status(&self, encoding_id: &str) -> Result<Task> {
        self.record("get_encoding_status");
        self.tasks
            .lock()
            .unwrap()
            .get(encoding_id)
            .cloned()
            .ok_or_else(|| anyhow!("404 Not Found: encoding {}", encoding_id))
    }
}
