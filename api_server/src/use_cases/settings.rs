use crate::domain::upstream::parse_settings;
use crate::domain::validation::Validator;
use crate::domain::{Settings, SettingsError, SettingsPatch, Webhook, WorkflowGateway};
use crate::interface_adapters::protocol::SettingsSource;
use crate::use_cases::to_payload;

#[derive(Debug)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub source: SettingsSource,
}

// Reads site settings from the workflow, falling back to the configured defaults.
pub struct GetSettingsUseCase<'a, G: ?Sized> {
    pub gateway: &'a G,
    pub defaults: &'a Settings,
}

impl<G> GetSettingsUseCase<'_, G>
where
    G: WorkflowGateway + ?Sized,
{
    pub async fn execute(&self) -> LoadedSettings {
        let fallback = || LoadedSettings {
            settings: self.defaults.clone(),
            source: SettingsSource::Defaults,
        };

        let value = match self.gateway.get(Webhook::GetSettings).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "settings workflow unavailable; using defaults");
                return fallback();
            }
        };

        match parse_settings(value) {
            Ok(patch) => LoadedSettings {
                settings: self.defaults.clone().merged(patch),
                source: SettingsSource::Workflow,
            },
            Err(err) => {
                tracing::warn!(error = %err, "settings reply had an unknown shape; using defaults");
                fallback()
            }
        }
    }
}

// Validates a partial update and forwards it to the settings workflow.
pub struct UpdateSettingsUseCase<'a, G: ?Sized> {
    pub gateway: &'a G,
    pub defaults: &'a Settings,
}

impl<G> UpdateSettingsUseCase<'_, G>
where
    G: WorkflowGateway + ?Sized,
{
    pub async fn execute(&self, patch: SettingsPatch) -> Result<Settings, SettingsError> {
        let patch = validate_patch(patch)?;

        let reply = self
            .gateway
            .post(Webhook::UpdateSettings, to_payload(&patch))
            .await?;

        // Prefer the workflow's view of the stored settings when it echoes them back.
        let echoed = parse_settings(reply).ok().filter(|echo| !echo.is_empty());
        let settings = self.defaults.clone().merged(patch);
        Ok(match echoed {
            Some(echo) => settings.merged(echo),
            None => settings,
        })
    }
}

fn validate_patch(patch: SettingsPatch) -> Result<SettingsPatch, SettingsError> {
    let mut validator = Validator::new();
    if patch.is_empty() {
        validator.reject("settings", "At least one setting must be provided");
    }
    validator.optional_non_negative("price", patch.price);
    validator.optional_non_negative("original_price", patch.original_price);
    if patch.seats_total == Some(0) {
        validator.reject("seats_total", "Seats total must be at least 1");
    }
    validator.optional_url("whatsapp_link", patch.whatsapp_link.as_deref());
    validator.optional_url("instagram_url", patch.instagram_url.as_deref());
    validator.optional_url("youtube_url", patch.youtube_url.as_deref());
    validator.optional_email("contact_email", patch.contact_email.as_deref());
    validator.optional_text("currency", patch.currency.as_deref(), 10);
    validator.finish()?;
    Ok(patch)
}
