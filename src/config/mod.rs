use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, MAX_RECENT_DOCUMENTS};
use crate::marker::MarkerSettings;

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Canvas size for new documents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSizeConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasSizeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

impl CanvasSizeConfig {
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfigData {
    /// Marker defaults and option sets for the toolbox panels
    #[serde(default)]
    pub marker_settings: MarkerSettings,

    #[serde(default)]
    pub canvas_size: CanvasSizeConfig,

    /// Last opened document (not auto-loaded, just remembered for quick access)
    #[serde(default)]
    pub last_document_path: Option<PathBuf>,

    #[serde(default)]
    pub recent_documents: Vec<PathBuf>,
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Resource for the "document file missing" warning dialog
#[derive(Resource, Default)]
pub struct MissingDocumentWarning {
    pub show: bool,
    pub path: Option<PathBuf>,
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to remember a saved or opened document
#[derive(Message)]
pub struct UpdateLastDocumentPathRequest {
    pub path: PathBuf,
}

/// Message to persist new pen defaults (color and width)
#[derive(Message)]
pub struct UpdateMarkerDefaultsRequest {
    pub color: String,
    pub stroke_width: f32,
}

/// Result of loading config from disk
struct LoadConfigResult {
    data: AppConfigData,
    config_path: PathBuf,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
}

/// Parse config JSON, describing the failure for the reset notification.
fn parse_config(json: &str) -> Result<AppConfigData, String> {
    serde_json::from_str(json).map_err(|e| format!("Configuration file was corrupted: {}", e))
}

/// Load configuration from disk
fn load_config() -> LoadConfigResult {
    let config_path = crate::paths::config_file();

    let (data, reset_reason) = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(json) => match parse_config(&json) {
                Ok(data) => {
                    info!("Loaded config from {:?}", config_path);
                    (data, None)
                }
                Err(reason) => {
                    warn!("{}", reason);
                    (AppConfigData::default(), Some(reason))
                }
            },
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                (
                    AppConfigData::default(),
                    Some(format!("Could not read configuration file: {}", e)),
                )
            }
        }
    } else {
        info!("No config file found, using defaults");
        (AppConfigData::default(), None)
    };

    LoadConfigResult {
        data,
        config_path,
        reset_reason,
    }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Move `path` to the front of the recent list, trimming it to size.
fn push_recent(recent: &mut Vec<PathBuf>, path: &PathBuf) {
    recent.retain(|p| p != path);
    recent.insert(0, path.clone());
    recent.truncate(MAX_RECENT_DOCUMENTS);
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let result = load_config();
    config.data = result.data;
    config.config_path = result.config_path;
    config.dirty = false;

    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// Startup system to check if the last document still exists
fn check_last_document_exists(
    config: Res<AppConfig>,
    mut warning: ResMut<MissingDocumentWarning>,
) {
    if let Some(ref path) = config.data.last_document_path
        && !path.exists()
    {
        warning.show = true;
        warning.path = Some(path.clone());
        info!("Last opened document no longer exists: {:?}", path);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

fn update_last_document_path_system(
    mut events: MessageReader<UpdateLastDocumentPathRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        config.data.last_document_path = Some(event.path.clone());
        push_recent(&mut config.data.recent_documents, &event.path);
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

fn update_marker_defaults_system(
    mut events: MessageReader<UpdateMarkerDefaultsRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        let settings = &mut config.data.marker_settings;
        settings.default_color = event.color.clone();
        if event.stroke_width.is_finite() && event.stroke_width > 0.0 {
            settings.default_stroke_width = event.stroke_width;
        }
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<MissingDocumentWarning>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<UpdateLastDocumentPathRequest>()
            .add_message::<UpdateMarkerDefaultsRequest>()
            .add_systems(
                Startup,
                (load_config_system, check_last_document_exists)
                    .chain()
                    .in_set(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                    update_last_document_path_system
                        .run_if(on_message::<UpdateLastDocumentPathRequest>),
                    update_marker_defaults_system.run_if(on_message::<UpdateMarkerDefaultsRequest>),
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert!(data.last_document_path.is_none());
        assert!(data.recent_documents.is_empty());
        assert_eq!(data.canvas_size, CanvasSizeConfig::default());
        assert_eq!(data.marker_settings, MarkerSettings::default());
    }

    #[test]
    fn test_app_config_data_serialization() {
        let mut data = AppConfigData {
            last_document_path: Some(PathBuf::from("/path/to/doc.json")),
            recent_documents: vec![PathBuf::from("/path/one"), PathBuf::from("/path/two")],
            canvas_size: CanvasSizeConfig {
                width: 640.0,
                height: 480.0,
            },
            ..Default::default()
        };
        data.marker_settings.default_color = "#000000".to_string();

        let json = serde_json::to_string(&data).unwrap();
        let parsed: AppConfigData = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.last_document_path, data.last_document_path);
        assert_eq!(parsed.recent_documents, data.recent_documents);
        assert_eq!(parsed.canvas_size, data.canvas_size);
        assert_eq!(parsed.marker_settings.default_color, "#000000");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed = parse_config(r#"{"marker_settings": {"default_color": "blue"}}"#).unwrap();
        assert_eq!(parsed.marker_settings.default_color, "blue");
        assert_eq!(
            parsed.marker_settings.default_stroke_widths,
            MarkerSettings::default().default_stroke_widths
        );
        assert_eq!(parsed.canvas_size, CanvasSizeConfig::default());
    }

    #[test]
    fn test_corrupt_config_reports_reason() {
        let reason = parse_config("{not json").unwrap_err();
        assert!(reason.starts_with("Configuration file was corrupted"));
    }

    #[test]
    fn test_push_recent_moves_to_front_and_trims() {
        let mut recent: Vec<PathBuf> = (0..MAX_RECENT_DOCUMENTS)
            .map(|i| PathBuf::from(format!("doc{}.json", i)))
            .collect();
        push_recent(&mut recent, &PathBuf::from("doc3.json"));
        assert_eq!(recent[0], PathBuf::from("doc3.json"));
        assert_eq!(recent.len(), MAX_RECENT_DOCUMENTS);

        push_recent(&mut recent, &PathBuf::from("new.json"));
        assert_eq!(recent[0], PathBuf::from("new.json"));
        assert_eq!(recent.len(), MAX_RECENT_DOCUMENTS);
    }

    #[test]
    fn test_missing_document_warning_default() {
        let warning = MissingDocumentWarning::default();
        assert!(!warning.show);
        assert!(warning.path.is_none());
    }
}
