//! MediaConvert job state -> canonical status

use reelcast_core::models::{JobOutput, JobStatus, OutputFile, Status};
use reelcast_core::{ProviderError, ProviderResult};

use super::types::{Job, OutputGroupType};
use super::NAME;

/// Map a native MediaConvert status onto the canonical enumeration.
///
/// Unrecognized values become [`Status::Unknown`], never `Failed`.
pub fn normalize(native: &str) -> Status {
    match native {
        "SUBMITTED" => Status::Queued,
        "PROGRESSING" => Status::Started,
        "COMPLETE" => Status::Finished,
        "CANCELED" => Status::Canceled,
        "ERROR" => Status::Failed,
        _ => Status::Unknown,
    }
}

/// Build the canonical status of a fetched job.
///
/// `destination` is the job's own output directory, as produced by
/// [`crate::provider::job_destination`].
pub fn job_status(job_id: &str, job: &Job, destination: String) -> ProviderResult<JobStatus> {
    let native = job.status.as_deref().unwrap_or_default();
    let status = normalize(native);
    let progress = job.job_percent_complete.unwrap_or(0) as f64;

    let mut result = JobStatus::new(NAME, job_id, status, progress)
        .with_provider_status("status", native);

    if let Some(phase) = &job.current_phase {
        result = result.with_provider_status("currentPhase", phase.as_str());
    }
    if let Some(code) = job.error_code {
        result = result.with_provider_status("errorCode", code);
    }
    if let Some(message) = &job.error_message {
        result = result.with_message(message.as_str());
    }

    let files = match status {
        Status::Finished => output_files(job_id, job)?,
        _ => Vec::new(),
    };

    Ok(result.with_output(JobOutput { destination, files }))
}

/// Reconstruct output files of a completed job from its own settings.
///
/// Each output lives at `<group destination><name modifier>.<extension>`;
/// dimensions come from the matching entry of `outputGroupDetails`.
fn output_files(job_id: &str, job: &Job) -> ProviderResult<Vec<OutputFile>> {
    let operation = || format!("fetching job {}", job_id);
    let groups = job
        .settings
        .as_ref()
        .map(|settings| settings.output_groups.as_slice())
        .unwrap_or_default();

    if groups.len() != job.output_group_details.len() {
        return Err(ProviderError::inconsistent(
            operation(),
            format!(
                "{} output groups but {} output group details",
                groups.len(),
                job.output_group_details.len()
            ),
        ));
    }

    let mut files = Vec::new();
    for (group, details) in groups.iter().zip(&job.output_group_details) {
        if group.outputs.len() != details.output_details.len() {
            return Err(ProviderError::inconsistent(
                operation(),
                format!(
                    "output group has {} outputs but {} output details",
                    group.outputs.len(),
                    details.output_details.len()
                ),
            ));
        }

        let destination = group.destination().unwrap_or_default();
        for (output, detail) in group.outputs.iter().zip(&details.output_details) {
            let name_modifier = output.name_modifier.as_deref().unwrap_or_default();
            let extension = output.extension.as_deref().unwrap_or_default();
            let path = if extension.is_empty() {
                format!("{}{}", destination, name_modifier)
            } else {
                format!("{}{}.{}", destination, name_modifier, extension)
            };
            let (width, height) = detail
                .video_details
                .as_ref()
                .map(|video| (video.width_in_px, video.height_in_px))
                .unwrap_or((0, 0));
            let container = match group.output_group_settings.group_type {
                OutputGroupType::HlsGroupSettings => "m3u8".to_string(),
                _ => extension.to_string(),
            };

            files.push(OutputFile {
                path,
                container,
                video_codec: String::new(),
                width,
                height,
                file_size: 0,
            });
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mediaconvert::types::{
        FileGroupSettings, JobOutput as WireOutput, JobSettings, OutputDetail,
        OutputGroup, OutputGroupDetail, OutputGroupSettings, VideoDetail,
    };
    use reelcast_core::ErrorKind;

    #[test]
    fn test_status_mapping() {
        assert_eq!(normalize("SUBMITTED"), Status::Queued);
        assert_eq!(normalize("PROGRESSING"), Status::Started);
        assert_eq!(normalize("COMPLETE"), Status::Finished);
        assert_eq!(normalize("CANCELED"), Status::Canceled);
        assert_eq!(normalize("ERROR"), Status::Failed);
    }

    #[test]
    fn test_unknown_status_is_not_failure() {
        assert_eq!(normalize("ARCHIVED"), Status::Unknown);
        assert_eq!(normalize(""), Status::Unknown);
        assert_eq!(normalize("complete"), Status::Unknown);
    }

    #[test]
    fn test_progress_reported_verbatim_while_running() {
        let job = Job {
            status: Some("PROGRESSING".to_string()),
            job_percent_complete: Some(42),
            current_phase: Some("TRANSCODING".to_string()),
            ..Default::default()
        };

        let status = job_status("mc-1", &job, "s3://b/out/abc/".to_string()).unwrap();
        assert_eq!(status.status, Status::Started);
        assert_eq!(status.progress, 42.0);
        assert_eq!(status.provider_status["currentPhase"], "TRANSCODING");
        assert!(status.output.files.is_empty());
        assert_eq!(status.output.destination, "s3://b/out/abc/");
    }

    #[test]
    fn test_error_message_is_surfaced() {
        let job = Job {
            status: Some("ERROR".to_string()),
            error_code: Some(1030),
            error_message: Some("Unable to open input file".to_string()),
            ..Default::default()
        };

        let status = job_status("mc-1", &job, String::new()).unwrap();
        assert_eq!(status.status, Status::Failed);
        assert_eq!(status.status_message, "Unable to open input file");
        assert_eq!(status.provider_status["errorCode"], 1030);
    }

    fn completed_job() -> Job {
        Job {
            status: Some("COMPLETE".to_string()),
            job_percent_complete: None,
            settings: Some(JobSettings {
                inputs: Vec::new(),
                output_groups: vec![OutputGroup {
                    name: None,
                    output_group_settings: OutputGroupSettings {
                        group_type: OutputGroupType::FileGroupSettings,
                        hls_group_settings: None,
                        file_group_settings: Some(FileGroupSettings {
                            destination: "s3://b/out/abc/".to_string(),
                        }),
                    },
                    outputs: vec![WireOutput {
                        preset: Some("mp4-720p".to_string()),
                        name_modifier: Some("video_720p".to_string()),
                        extension: Some("mp4".to_string()),
                    }],
                }],
            }),
            output_group_details: vec![OutputGroupDetail {
                output_details: vec![OutputDetail {
                    duration_in_ms: Some(12_000),
                    video_details: Some(VideoDetail {
                        width_in_px: 1280,
                        height_in_px: 720,
                    }),
                }],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_finished_job_reports_outputs() {
        let status = job_status("mc-1", &completed_job(), "s3://b/out/abc/".to_string()).unwrap();

        assert_eq!(status.status, Status::Finished);
        assert_eq!(status.progress, 100.0);
        assert_eq!(status.output.files.len(), 1);
        let file = &status.output.files[0];
        assert_eq!(file.path, "s3://b/out/abc/video_720p.mp4");
        assert_eq!(file.container, "mp4");
        assert_eq!((file.width, file.height), (1280, 720));
    }

    #[test]
    fn test_finished_job_with_missing_details_is_inconsistent() {
        let mut job = completed_job();
        job.output_group_details.clear();

        let err = job_status("mc-1", &job, String::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentResponse);
        assert!(err.to_string().contains("fetching job mc-1"));
    }
}
