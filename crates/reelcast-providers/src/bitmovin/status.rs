//! Bitmovin encoding status -> canonical status, with output enrichment

use reelcast_core::models::{JobOutput, JobStatus, OutputFile, Status};
use reelcast_core::{ProviderError, ProviderResult, RemoteResultExt};

use super::client::BitmovinApi;
use super::types::{Mp4Muxing, Task};
use super::NAME;

const MUXING_PAGE_SIZE: u32 = 100;

/// Map a native encoding status onto the canonical enumeration.
pub fn normalize(native: &str) -> Status {
    match native {
        "CREATED" | "QUEUED" => Status::Queued,
        "RUNNING" => Status::Started,
        "FINISHED" => Status::Finished,
        "ERROR" | "TRANSFER_ERROR" => Status::Failed,
        "CANCELED" => Status::Canceled,
        _ => Status::Unknown,
    }
}

/// Canonical status of an encoding, enriched with output files once finished.
pub async fn job_status(
    client: &dyn BitmovinApi,
    encoding_id: &str,
    task: &Task,
    destination: String,
) -> ProviderResult<JobStatus> {
    let status = normalize(&task.status);
    let mut result = JobStatus::new(NAME, encoding_id, status, task.progress.unwrap_or(0.0))
        .with_provider_status("status", task.status.as_str());

    if let Some(message) = task
        .messages
        .iter()
        .rev()
        .find(|message| message.message_type == "ERROR")
    {
        result = result.with_message(message.text.as_str());
    }

    let files = match status {
        Status::Finished => output_files(client, encoding_id, &destination).await?,
        _ => Vec::new(),
    };

    Ok(result.with_output(JobOutput { destination, files }))
}

async fn output_files(
    client: &dyn BitmovinApi,
    encoding_id: &str,
    destination: &str,
) -> ProviderResult<Vec<OutputFile>> {
    let muxings = list_mp4_muxings(client, encoding_id).await?;
    let mut files = Vec::with_capacity(muxings.len());

    for muxing in muxings {
        let muxing_id = muxing.id.as_deref().ok_or_else(|| {
            ProviderError::inconsistent(
                format!("listing muxings of encoding {}", encoding_id),
                format!("muxing {} has no id", muxing.filename),
            )
        })?;

        let info = client
            .get_mp4_muxing_information(encoding_id, muxing_id)
            .await
            .with_remote(|| format!("fetching muxing information {}", muxing_id))?;

        let track = info
            .video_tracks
            .first()
            .ok_or_else(|| ProviderError::NoVideoTrack {
                output: muxing.filename.clone(),
            })?;

        files.push(OutputFile {
            path: format!("{}{}", destination, muxing.filename),
            container: "mp4".to_string(),
            video_codec: track.codec.clone().unwrap_or_default(),
            width: track.frame_width.unwrap_or_default(),
            height: track.frame_height.unwrap_or_default(),
            file_size: info.file_size.unwrap_or_default(),
        });
    }

    Ok(files)
}

/// Fetch every MP4 muxing of an encoding, following pagination until the
/// reported total has been retrieved.
async fn list_mp4_muxings(
    client: &dyn BitmovinApi,
    encoding_id: &str,
) -> ProviderResult<Vec<Mp4Muxing>> {
    let operation = || format!("listing muxings of encoding {}", encoding_id);
    let mut muxings: Vec<Mp4Muxing> = Vec::new();

    loop {
        let page = client
            .list_mp4_muxings(encoding_id, muxings.len() as u32, MUXING_PAGE_SIZE)
            .await
            .with_remote(operation)?;
        let received = page.items.len();
        muxings.extend(page.items);

        match page.total_count {
            Some(total) if muxings.len() as i64 >= total => break,
            Some(total) if received == 0 => {
                return Err(ProviderError::inconsistent(
                    operation(),
                    format!(
                        "empty page after {} of {} muxings",
                        muxings.len(),
                        total
                    ),
                ))
            }
            Some(_) => {}
            None if received < MUXING_PAGE_SIZE as usize => break,
            None => {}
        }
    }

    tracing::debug!(encoding_id = %encoding_id, count = muxings.len(), "Listed MP4 muxings");
    Ok(muxings)
}
