//! In-memory MediaConvert transport

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::mediaconvert::types::{
    ContainerSettings, ContainerType, CreateJobRequest, CreatePresetRequest, Job,
    OutputDetail, OutputGroupDetail, Preset, PresetSettings, VideoDetail,
};
use crate::mediaconvert::MediaConvertApi;

/// Fake MediaConvert account keeping presets and jobs in memory.
#[derive(Default)]
pub struct FakeMediaConvert {
    presets: Mutex<HashMap<String, Preset>>,
    jobs: Mutex<HashMap<String, Job>>,
    created_jobs: Mutex<Vec<CreateJobRequest>>,
    created_presets: Mutex<Vec<CreatePresetRequest>>,
    list_jobs_error: Mutex<Option<String>>,
    get_preset_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl FakeMediaConvert {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a bare preset with the given container.
    pub fn add_preset(&self, name: &str, container: ContainerType) {
        let preset = Preset {
            name: name.to_string(),
            description: None,
            arn: None,
            settings: PresetSettings {
                container_settings: ContainerSettings { container },
                video_description: None,
                audio_descriptions: Vec::new(),
            },
        };
        self.presets
            .lock()
            .unwrap()
            .insert(name.to_string(), preset);
    }

    pub fn fail_list_jobs(&self, message: &str) {
        *self.list_jobs_error.lock().unwrap() = Some(message.to_string());
    }

    /// Mark a job complete, reporting every output at `width`x`height`.
    pub fn complete_job(&self, id: &str, width: i64, height: i64) {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(id).expect("job exists");
        job.status = Some("COMPLETE".to_string());
        job.job_percent_complete = None;
        job.output_group_details = job
            .settings
            .as_ref()
            .map(|settings| settings.output_groups.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|group| OutputGroupDetail {
                output_details: group
                    .outputs
                    .iter()
                    .map(|_| OutputDetail {
                        duration_in_ms: Some(10_000),
                        video_details: Some(VideoDetail {
                            width_in_px: width,
                            height_in_px: height,
                        }),
                    })
                    .collect(),
            })
            .collect();
    }

    pub fn get_preset_calls(&self) -> usize {
        self.get_preset_calls.load(Ordering::SeqCst)
    }

    pub fn created_jobs(&self) -> Vec<CreateJobRequest> {
        self.created_jobs.lock().unwrap().clone()
    }

    pub fn created_presets(&self) -> Vec<CreatePresetRequest> {
        self.created_presets.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaConvertApi for FakeMediaConvert {
    async fn create_job(&self, request: &CreateJobRequest) -> Result<Job> {
        let id = format!("mc-job-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let job = Job {
            id: Some(id.clone()),
            status: Some("SUBMITTED".to_string()),
            settings: Some(request.settings.clone()),
            ..Default::default()
        };

        self.created_jobs.lock().unwrap().push(request.clone());
        self.jobs.lock().unwrap().insert(id, job.clone());
        Ok(job)
    }

    async fn get_job(&self, id: &str) -> Result<Job> {
        self.jobs
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("NotFoundException: job {} not found", id))
    }

    async fn cancel_job(&self, id: &str) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| anyhow!("NotFoundException: job {} not found", id))?;
        job.status = Some("CANCELED".to_string());
        Ok(())
    }

    async fn list_jobs(&self, max_results: u32) -> Result<Vec<Job>> {
        if let Some(message) = self.list_jobs_error.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }
        let jobs = self.jobs.lock().unwrap();
        Ok(jobs.values().take(max_results as usize).cloned().collect())
    }

    async fn create_preset(&self, request: &CreatePresetRequest) -> Result<Preset> {
        let preset = Preset {
            name: request.name.clone(),
            description: Some(request.description.clone()),
            arn: Some(format!("arn:aws:mediaconvert:us-east-1:1:presets/{}", request.name)),
            settings: request.settings.clone(),
        };

        self.created_presets.lock().unwrap().push(request.clone());
        self.presets
            .lock()
            .unwrap()
            .insert(request.name.clone(), preset.clone());
        Ok(preset)
    }

    async fn get_preset(&self, name: &str) -> Result<Preset> {
        self.get_preset_calls.fetch_add(1, Ordering::SeqCst);
        self.presets
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("NotFoundException: preset {} not found", name))
    }

    async fn delete_preset(&self, name: &str) -> Result<()> {
        self.presets
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| anyhow!("NotFoundException: preset {} not found", name))
    }
}
