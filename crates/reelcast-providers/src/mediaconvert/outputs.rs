//! Job -> MediaConvert output groups

use reelcast_core::models::Job;
use reelcast_core::{ProviderError, ProviderResult};
use std::collections::HashMap;

use super::types::{
    ContainerType, FileGroupSettings, HlsDirectoryStructure, HlsGroupSettings,
    HlsManifestDurationFormat, HlsOutputSelection, HlsSegmentControl, JobOutput, OutputGroup,
    OutputGroupSettings, OutputGroupType, Preset,
};
use crate::provider::job_destination;

/// File-name prefix for frame captures, under the job destination.
const THUMBNAIL_PATH: &str = "thumb/thumbnail";

/// Build one output group per distinct preset container.
///
/// Groups appear in the order their container is first seen in the job's
/// outputs, and each group keeps its outputs in job order. `preset_ids` holds
/// the provider preset ID of each output, aligned with `job.outputs`.
pub fn output_groups(
    job: &Job,
    preset_ids: &[String],
    presets: &HashMap<String, Preset>,
    destination_base: &str,
) -> ProviderResult<Vec<OutputGroup>> {
    let mut grouped: Vec<(ContainerType, Vec<JobOutput>)> = Vec::new();

    for (output, preset_id) in job.outputs.iter().zip(preset_ids) {
        let preset = presets.get(preset_id).ok_or_else(|| {
            ProviderError::inconsistent(
                format!("fetching preset {}", preset_id),
                "preset missing from resolved set",
            )
        })?;
        let container = preset.settings.container().clone();

        let entry = JobOutput {
            preset: Some(preset_id.clone()),
            name_modifier: Some(output.name_modifier().to_string()),
            extension: Some(output.extension().to_string()),
        };

        match grouped.iter_mut().find(|(c, _)| *c == container) {
            Some((_, outputs)) => outputs.push(entry),
            None => grouped.push((container, vec![entry])),
        }
    }

    let destination = job_destination(destination_base, &job.id);

    grouped
        .into_iter()
        .map(|(container, outputs)| {
            let output_group_settings = match container {
                ContainerType::M3u8 => hls_group(job, &destination),
                ContainerType::Mp4 => file_group(destination.clone()),
                ContainerType::Raw => file_group(format!("{}{}", destination, THUMBNAIL_PATH)),
                ContainerType::Other(other) => {
                    return Err(ProviderError::UnsupportedContainer(other))
                }
            };
            Ok(OutputGroup {
                name: None,
                output_group_settings,
                outputs,
            })
        })
        .collect()
}

fn hls_group(job: &Job, destination: &str) -> OutputGroupSettings {
    let params = &job.streaming_params;
    OutputGroupSettings {
        group_type: OutputGroupType::HlsGroupSettings,
        hls_group_settings: Some(HlsGroupSettings {
            destination: format!("{}{}", destination, params.playlist_base_name()),
            segment_length: i64::from(params.segment_duration),
            min_segment_length: 0,
            directory_structure: HlsDirectoryStructure::SingleDirectory,
            manifest_duration_format: HlsManifestDurationFormat::Integer,
            segment_control: HlsSegmentControl::SegmentedFiles,
            output_selection: HlsOutputSelection::ManifestsAndSegments,
        }),
        file_group_settings: None,
    }
}

fn file_group(destination: String) -> OutputGroupSettings {
    OutputGroupSettings {
        group_type: OutputGroupType::FileGroupSettings,
        hls_group_settings: None,
        file_group_settings: Some(FileGroupSettings { destination }),
    }
}
