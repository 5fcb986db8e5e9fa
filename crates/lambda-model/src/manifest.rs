use std::fmt;

use serde::Serialize;

use crate::error::ModelError;

/// Application name every lambda deployment is registered under.
pub const APP_NAME: &str = "lambda";

#[derive(Serialize)]
struct VolumeBlock<'a> {
    volumes: &'a [String],
}

/// Deployment manifest text submitted alongside a run request.
///
/// The document has one entrypoint keyed by the logical name and, only when volumes
/// are requested, a trailing `volumes:` block. It is regenerated from its inputs,
/// never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentManifest(String);

impl DeploymentManifest {
    /// Render the manifest for one entrypoint.
    ///
    /// `cmd` and `working_dir` are emitted as escaped double-quoted scalars. The entrypoint
    /// key stays plain when it is a simple name and is quoted otherwise.
    pub fn render(
        entrypoint: &str,
        command: &str,
        working_dir: &str,
        volumes: &[String],
    ) -> Result<Self, ModelError> {
        let mut text = format!(
            "appname: \"{APP_NAME}\"\nentrypoints:\n  {}:\n    cmd: {}\n    working_dir: {}\n",
            key(entrypoint)?,
            quoted(command)?,
            quoted(working_dir)?,
        );

        if !volumes.is_empty() {
            let block = serde_yaml::to_string(&VolumeBlock { volumes })
                .map_err(|e| ModelError::Encoding(format!("volumes: {e}")))?;
            text.push_str(&block);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DeploymentManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// A JSON string literal is a valid YAML double-quoted scalar.
fn quoted(value: &str) -> Result<String, ModelError> {
    serde_json::to_string(value).map_err(|e| ModelError::Encoding(e.to_string()))
}

// Plain only if the name reads back as the same string (`true`, `1`, `null` do not).
fn key(name: &str) -> Result<String, ModelError> {
    let simple = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    let plain = simple
        && serde_yaml::from_str::<serde_yaml::Value>(name)
            .is_ok_and(|v| v.as_str() == Some(name));
    if plain { Ok(name.to_string()) } else { quoted(name) }
}
