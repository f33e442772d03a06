use super::settings::RawSettings;

/// Checks the raw config and returns every problem found, path-qualified.
/// An empty list means the config is usable.
pub fn validate(raw: &RawSettings) -> Vec<String> {
    let mut issues = Vec::new();

    match &raw.openai {
        Some(openai) => {
            require_string(&mut issues, "openai.api_key", &openai.api_key);
            require_string(&mut issues, "openai.embedding_model", &openai.embedding_model);
            require_string(&mut issues, "openai.chat_model", &openai.chat_model);
            check_optional_string(&mut issues, "openai.base_url", &openai.base_url);
            if let Some(secs) = openai.request_timeout_secs {
                if secs == 0 || secs > 600 {
                    issues.push(range_issue("openai.request_timeout_secs", 1, 600));
                }
            }
        }
        None => issues.push(missing_section("openai")),
    }

    match &raw.gcs {
        Some(gcs) => {
            require_string(&mut issues, "gcs.bucket_name", &gcs.bucket_name);
            require_string(
                &mut issues,
                "gcs.document_vectors_file",
                &gcs.document_vectors_file,
            );
        }
        None => issues.push(missing_section("gcs")),
    }

    if let Some(drive) = &raw.google_drive {
        require_string(&mut issues, "google_drive.folder_id", &drive.folder_id);
    }

    if let Some(slack) = &raw.slack {
        require_string(&mut issues, "slack.bot_token", &slack.bot_token);
        if let Some(channels) = &slack.allowed_channels {
            for (index, channel) in channels.iter().enumerate() {
                if channel.trim().is_empty() {
                    issues.push(format!(
                        "invalid config at 'slack.allowed_channels[{index}]': value cannot be empty"
                    ));
                }
            }
        }
    }

    require_string(&mut issues, "system_prompt", &raw.system_prompt);

    if let Some(retrieval) = &raw.retrieval {
        if let Some(top_k) = retrieval.top_k {
            if top_k == 0 || top_k > 50 {
                issues.push(range_issue("retrieval.top_k", 1, 50));
            }
        }
    }

    if let Some(server) = &raw.server {
        check_optional_string(&mut issues, "server.host", &server.host);
        if let Some(origins) = &server.cors_allowed_origins {
            for (index, origin) in origins.iter().enumerate() {
                if origin.trim().is_empty() {
                    issues.push(format!(
                        "invalid config at 'server.cors_allowed_origins[{index}]': value cannot be empty"
                    ));
                }
            }
        }
    }

    issues
}

fn require_string(issues: &mut Vec<String>, path: &str, value: &Option<String>) {
    match value {
        Some(text) if !text.trim().is_empty() => {}
        Some(_) => issues.push(format!(
            "invalid config at '{path}': value cannot be empty"
        )),
        None => issues.push(format!("missing required key '{path}'")),
    }
}

fn check_optional_string(issues: &mut Vec<String>, path: &str, value: &Option<String>) {
    if let Some(text) = value {
        if text.trim().is_empty() {
            issues.push(format!(
                "invalid config at '{path}': value cannot be empty"
            ));
        }
    }
}

fn missing_section(key: &str) -> String {
    format!("missing required section '{key}'")
}

fn range_issue(path: &str, min: u64, max: u64) -> String {
    format!("invalid config at '{path}': must be between {min} and {max}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::settings::RawSettings;

    #[test]
    fn empty_config_reports_every_required_section() {
        let issues = validate(&RawSettings::default());

        assert!(issues.iter().any(|i| i.contains("'openai'")));
        assert!(issues.iter().any(|i| i.contains("'gcs'")));
        assert!(issues.iter().any(|i| i.contains("'system_prompt'")));
    }

    #[test]
    fn out_of_range_top_k_is_rejected() {
        let raw: RawSettings = serde_yaml::from_str("retrieval:\n  top_k: 0\n").expect("yaml");
        let issues = validate(&raw);
        assert!(issues.iter().any(|i| i.contains("retrieval.top_k")));
    }

    #[test]
    fn blank_allowed_channel_is_rejected() {
        let raw: RawSettings = serde_yaml::from_str(
            "slack:\n  bot_token: xoxb-1\n  allowed_channels:\n    - C123\n    - \"  \"\n",
        )
        .expect("yaml");
        let issues = validate(&raw);
        assert!(issues
            .iter()
            .any(|i| i.contains("slack.allowed_channels[1]")));
    }
}
