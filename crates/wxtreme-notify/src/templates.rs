//! Message template table, keyed by language, tense, and situation

use crate::{NotifyError, NotifyResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Why a notification line is being sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Situation {
    Hot,
    Cold,
    /// Both temperature extremes on the same day
    Both,
    Humid,
    Dry,
    /// Both dew point extremes on the same day
    DewPointBoth,
    Wind,
    Rain,
}

/// Whether the extreme already happened at run time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tense {
    Current,
    Past,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SituationTemplates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub both: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dew_point_both: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain: Option<String>,
}

impl SituationTemplates {
    pub fn get(&self, situation: Situation) -> Option<&str> {
        let slot = match situation {
            Situation::Hot => &self.hot,
            Situation::Cold => &self.cold,
            Situation::Both => &self.both,
            Situation::Humid => &self.humid,
            Situation::Dry => &self.dry,
            Situation::DewPointBoth => &self.dew_point_both,
            Situation::Wind => &self.wind,
            Situation::Rain => &self.rain,
        };
        slot.as_deref()
    }
}

/// Templates for one language
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageTemplates {
    pub current: SituationTemplates,
    #[serde(default)]
    pub past: SituationTemplates,
}

impl LanguageTemplates {
    /// A missing past variant falls back to the current one
    pub fn get(&self, situation: Situation, tense: Tense) -> Option<&str> {
        match tense {
            Tense::Past => self
                .past
                .get(situation)
                .or_else(|| self.current.get(situation)),
            Tense::Current => self.current.get(situation),
        }
    }
}

/// Every language's templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateTable {
    languages: BTreeMap<String, LanguageTemplates>,
}

impl TemplateTable {
    /// Parse a table shaped `{ "<lang>": { "current": {..}, "past": {..} } }`
    pub fn from_json(json: &str) -> NotifyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> NotifyResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn language(&self, lang: &str) -> NotifyResult<&LanguageTemplates> {
        self.languages
            .get(lang)
            .ok_or_else(|| NotifyError::UnknownLanguage(lang.to_string()))
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// The built-in Swedish and English tables
    pub fn builtin() -> Self {
        let mut languages = BTreeMap::new();
        languages.insert("sv".to_string(), swedish());
        languages.insert("en".to_string(), english());
        Self { languages }
    }
}

impl Default for TemplateTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn text(s: &str) -> Option<String> {
    Some(s.to_string())
}

fn swedish() -> LanguageTemplates {
    LanguageTemplates {
        current: SituationTemplates {
            hot: text(
                "🔥 Extremt varmt idag!\n\
                 Högsta temperatur: TEMPERATURE_HIGH °C kl. TEMPERATURE_HIGH_TIME\n\
                 Just nu: CURRENT_TEMPERATURE °C",
            ),
            cold: text(
                "🥶 Extremt kallt idag!\n\
                 Lägsta temperatur: TEMPERATURE_LOW °C kl. TEMPERATURE_LOW_TIME",
            ),
            both: text(
                "🌡️ Extrema temperaturer idag!\n\
                 Högsta temperatur: TEMPERATURE_HIGH °C kl. TEMPERATURE_HIGH_TIME\n\
                 Lägsta temperatur: TEMPERATURE_LOW °C kl. TEMPERATURE_LOW_TIME",
            ),
            humid: text(
                "💧 Ovanligt kvavt idag!\n\
                 Daggpunkt: DEW_POINT_HIGH °C kl. DEW_POINT_HIGH_TIME (HUMIDITY_AT_DEW_POINT_HIGH % luftfuktighet)",
            ),
            dry: text(
                "🏜️ Ovanligt torr luft idag!\n\
                 Daggpunkt: DEW_POINT_LOW °C kl. DEW_POINT_LOW_TIME (HUMIDITY_AT_DEW_POINT_LOW % luftfuktighet)",
            ),
            dew_point_both: text(
                "💧 Stora skiftningar i luftfuktigheten idag!\n\
                 Högsta daggpunkt: DEW_POINT_HIGH °C kl. DEW_POINT_HIGH_TIME\n\
                 Lägsta daggpunkt: DEW_POINT_LOW °C kl. DEW_POINT_LOW_TIME",
            ),
            wind: text(
                "💨 Kraftig vind idag!\n\
                 Vindhastighet upp till WIND_SPEED_HIGH m/s kl. WIND_SPEED_HIGH_TIME",
            ),
            rain: text("🌧️ Ovanligt mycket regn idag: RAIN_AMOUNT mm"),
        },
        past: SituationTemplates {
            hot: text(
                "🔥 Det var extremt varmt idag!\n\
                 Högsta temperatur: TEMPERATURE_HIGH °C uppmättes kl. TEMPERATURE_HIGH_TIME",
            ),
            cold: text(
                "🥶 Det var extremt kallt i natt!\n\
                 Lägsta temperatur: TEMPERATURE_LOW °C uppmättes kl. TEMPERATURE_LOW_TIME",
            ),
            humid: text(
                "💧 Det var ovanligt kvavt idag!\n\
                 Daggpunkt: DEW_POINT_HIGH °C kl. DEW_POINT_HIGH_TIME",
            ),
            dry: text(
                "🏜️ Luften var ovanligt torr idag!\n\
                 Daggpunkt: DEW_POINT_LOW °C kl. DEW_POINT_LOW_TIME",
            ),
            wind: text(
                "💨 Det blåste kraftigt idag!\n\
                 Vindhastighet upp till WIND_SPEED_HIGH m/s kl. WIND_SPEED_HIGH_TIME",
            ),
            rain: text("🌧️ Det har regnat ovanligt mycket idag: RAIN_AMOUNT mm"),
            ..Default::default()
        },
    }
}

fn english() -> LanguageTemplates {
    LanguageTemplates {
        current: SituationTemplates {
            hot: text(
                "🔥 Extremely hot today!\n\
                 High: TEMPERATURE_HIGH °C at TEMPERATURE_HIGH_TIME\n\
                 Right now: CURRENT_TEMPERATURE °C",
            ),
            cold: text(
                "🥶 Extremely cold today!\n\
                 Low: TEMPERATURE_LOW °C at TEMPERATURE_LOW_TIME",
            ),
            both: text(
                "🌡️ Extreme temperatures today!\n\
                 High: TEMPERATURE_HIGH °C at TEMPERATURE_HIGH_TIME\n\
                 Low: TEMPERATURE_LOW °C at TEMPERATURE_LOW_TIME",
            ),
            humid: text(
                "💧 Unusually muggy today!\n\
                 Dew point: DEW_POINT_HIGH °C at DEW_POINT_HIGH_TIME (HUMIDITY_AT_DEW_POINT_HIGH % humidity)",
            ),
            dry: text(
                "🏜️ Unusually dry air today!\n\
                 Dew point: DEW_POINT_LOW °C at DEW_POINT_LOW_TIME (HUMIDITY_AT_DEW_POINT_LOW % humidity)",
            ),
            dew_point_both: text(
                "💧 Large swings in humidity today!\n\
                 Highest dew point: DEW_POINT_HIGH °C at DEW_POINT_HIGH_TIME\n\
                 Lowest dew point: DEW_POINT_LOW °C at DEW_POINT_LOW_TIME",
            ),
            wind: text(
                "💨 Strong wind today!\n\
                 Wind speed up to WIND_SPEED_HIGH m/s at WIND_SPEED_HIGH_TIME",
            ),
            rain: text("🌧️ Unusually heavy rain today: RAIN_AMOUNT mm"),
        },
        past: SituationTemplates {
            hot: text(
                "🔥 It was extremely hot today!\n\
                 High: TEMPERATURE_HIGH °C, reached at TEMPERATURE_HIGH_TIME",
            ),
            cold: text(
                "🥶 It was extremely cold last night!\n\
                 Low: TEMPERATURE_LOW °C, reached at TEMPERATURE_LOW_TIME",
            ),
            wind: text(
                "💨 It was very windy today!\n\
                 Wind speed up to WIND_SPEED_HIGH m/s at WIND_SPEED_HIGH_TIME",
            ),
            rain: text("🌧️ Unusually heavy rain has fallen today: RAIN_AMOUNT mm"),
            ..Default::default()
        },
    }
}
