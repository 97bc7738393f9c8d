//! Model configuration policy: which configuration is "active", and how
//! admin-submitted registrations are normalized before they hit the store.

use digest_datastore::{ModelConfiguration, ModelStoreError, NewModelConfiguration, ProviderKind};

/// Picks the configuration the dispatcher should use.
///
/// The flagged configuration wins. Without one, the first configuration of the
/// default provider in store order is used. That positional fallback depends on
/// insertion order; an explicit "default" flag would make it unambiguous.
pub fn select_active_model(models: &[ModelConfiguration]) -> Option<&ModelConfiguration> {
    models
        .iter()
        .find(|m| m.is_active)
        .or_else(|| models.iter().find(|m| m.provider == ProviderKind::DEFAULT))
}

/// Infers the vendor from well-known credential prefixes.
pub fn detect_provider(api_key: &str) -> Option<ProviderKind> {
    let key = api_key.trim();
    if key.starts_with("sk-ant-") {
        Some(ProviderKind::Anthropic)
    } else if key.starts_with("sk-") {
        Some(ProviderKind::OpenAI)
    } else {
        None
    }
}

/// Trims and validates submitted fields. A credential with a recognizable
/// prefix overrides the submitted provider kind.
pub fn prepare_registration(
    name: &str,
    provider: ProviderKind,
    model_id: &str,
    api_key: &str,
) -> Result<NewModelConfiguration, ModelStoreError> {
    let required = |field: &str, value: &str| {
        let value = value.trim();
        if value.is_empty() {
            Err(ModelStoreError::Validation(format!("{field} is required")))
        } else {
            Ok(value.to_string())
        }
    };

    let name = required("name", name)?;
    let model_id = required("model id", model_id)?;
    let api_key = required("api key", api_key)?;

    let provider = match detect_provider(&api_key) {
        Some(detected) if detected != provider => {
            tracing::warn!(
                submitted = %provider,
                detected = %detected,
                "Credential prefix overrides submitted provider"
            );
            detected
        }
        _ => provider,
    };

    Ok(NewModelConfiguration {
        name,
        provider,
        model_id,
        api_key,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn model(id: i64, provider: &str, is_active: bool) -> ModelConfiguration {
        ModelConfiguration {
            id,
            name: format!("model-{id}"),
            provider: provider.into(),
            model_id: format!("m{id}"),
            api_key: "key".into(),
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn active_flag_wins_regardless_of_order() {
        let models = vec![model(1, "openai", false), model(2, "anthropic", true)];
        assert_eq!(select_active_model(&models).map(|m| m.id), Some(2));

        let models = vec![model(2, "anthropic", true), model(1, "openai", false)];
        assert_eq!(select_active_model(&models).map(|m| m.id), Some(2));
    }

    #[test]
    fn falls_back_to_first_default_provider() {
        let models = vec![
            model(1, "anthropic", false),
            model(2, "openai", false),
            model(3, "openai", false),
        ];
        assert_eq!(select_active_model(&models).map(|m| m.id), Some(2));
    }

    #[test]
    fn nothing_selected_without_active_or_default_provider() {
        let models = vec![model(1, "anthropic", false), model(2, "gemini", false)];
        assert!(select_active_model(&models).is_none());
        assert!(select_active_model(&[]).is_none());
    }

    #[test]
    fn detects_vendor_from_key_prefix() {
        assert_eq!(detect_provider("sk-ant-api03-abc"), Some(ProviderKind::Anthropic));
        assert_eq!(detect_provider("sk-proj-abc"), Some(ProviderKind::OpenAI));
        assert_eq!(detect_provider("sk-abc"), Some(ProviderKind::OpenAI));
        assert_eq!(detect_provider("AIzaSyabc"), None);
    }

    #[test]
    fn detected_provider_overrides_submitted_one() {
        let new = prepare_registration(
            " Claude ",
            ProviderKind::OpenAI,
            "claude-3-5-sonnet-latest",
            "sk-ant-api03-abc",
        )
        .unwrap();

        assert_eq!(new.provider, ProviderKind::Anthropic);
        assert_eq!(new.name, "Claude");
    }

    #[test]
    fn unrecognized_key_keeps_submitted_provider() {
        let new =
            prepare_registration("Gemini", "gemini".into(), "gemini-1.5-pro", "AIzaSyabc").unwrap();
        assert_eq!(new.provider, ProviderKind::Other("gemini".into()));
    }

    #[test]
    fn blank_fields_are_rejected() {
        let err = prepare_registration("name", ProviderKind::OpenAI, "  ", "sk-abc").unwrap_err();
        assert!(matches!(err, ModelStoreError::Validation(msg) if msg == "model id is required"));
    }
}
