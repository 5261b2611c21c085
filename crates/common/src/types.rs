use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifier assigned by the CRM store to a candidate or licence record.
///
/// Wraps a UUID so candidate ids and licence ids cannot be confused with
/// arbitrary strings coming from forms or remote payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrmId(Uuid);

impl CrmId {
    /// Creates a new random CRM id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

}

impl Default for CrmId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CrmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returned when a textual enum value is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Licensing jurisdiction a candidate books under.
///
/// Great Britain is the primary jurisdiction (16-character licence numbers,
/// 6-digit personal reference numbers); Northern Ireland is the secondary one
/// (8-digit licence numbers, 16-digit payment receipt numbers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Jurisdiction {
    #[default]
    GreatBritain,
    NorthernIreland,
}

impl Jurisdiction {
    /// Returns the licensing agency responsible for this jurisdiction.
    pub fn agency(&self) -> Agency {
        match self {
            Jurisdiction::GreatBritain => Agency::Dvsa,
            Jurisdiction::NorthernIreland => Agency::Dva,
        }
    }

    /// Returns true for the primary (GB) jurisdiction.
    pub fn is_primary(&self) -> bool {
        matches!(self, Jurisdiction::GreatBritain)
    }

    /// Returns the short code used in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Jurisdiction::GreatBritain => "gb",
            Jurisdiction::NorthernIreland => "ni",
        }
    }
}

impl std::fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Jurisdiction {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gb" | "great_britain" => Ok(Jurisdiction::GreatBritain),
            "ni" | "northern_ireland" => Ok(Jurisdiction::NorthernIreland),
            _ => Err(UnknownVariant {
                kind: "jurisdiction",
                value: s.to_string(),
            }),
        }
    }
}

/// Government agency owning a candidate's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Agency {
    /// Driver and Vehicle Standards Agency (Great Britain).
    Dvsa,
    /// Driver and Vehicle Agency (Northern Ireland).
    Dva,
}

impl Agency {
    /// Returns the agency's acronym.
    pub fn as_str(&self) -> &'static str {
        match self {
            Agency::Dvsa => "DVSA",
            Agency::Dva => "DVA",
        }
    }
}

impl std::fmt::Display for Agency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Language the candidate is using; forwarded to the eligibility service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "cy")]
    Welsh,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Welsh => "cy",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who is booking: a member of the public or a driving instructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Journey {
    #[default]
    Citizen,
    Instructor,
}

impl Journey {
    /// Returns true for the instructor journey.
    pub fn is_instructor(&self) -> bool {
        matches!(self, Journey::Instructor)
    }

    /// Returns the journey name used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Journey::Citizen => "citizen",
            Journey::Instructor => "instructor",
        }
    }
}

impl std::fmt::Display for Journey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crm_id_new_creates_unique_ids() {
        let id1 = CrmId::new();
        let id2 = CrmId::default();
        assert_ne!(id1, id2);
    }

    #[test]
    fn crm_id_serialization_is_transparent() {
        let id = CrmId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let deserialized: CrmId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn jurisdiction_defaults_to_great_britain() {
        assert_eq!(Jurisdiction::default(), Jurisdiction::GreatBritain);
        assert!(Jurisdiction::default().is_primary());
    }

    #[test]
    fn jurisdiction_maps_to_agency() {
        assert_eq!(Jurisdiction::GreatBritain.agency(), Agency::Dvsa);
        assert_eq!(Jurisdiction::NorthernIreland.agency(), Agency::Dva);
    }

    #[test]
    fn jurisdiction_parses_short_codes() {
        assert_eq!("gb".parse::<Jurisdiction>().unwrap(), Jurisdiction::GreatBritain);
        assert_eq!(" NI ".parse::<Jurisdiction>().unwrap(), Jurisdiction::NorthernIreland);
        let err = "fr".parse::<Jurisdiction>().unwrap_err();
        assert_eq!(err.kind, "jurisdiction");
    }

    #[test]
    fn unknown_variant_names_kind_and_value() {
        let err = "fr".parse::<Jurisdiction>().unwrap_err();
        assert_eq!(err.to_string(), "unknown jurisdiction: \"fr\"");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn locale_serializes_as_language_code() {
        assert_eq!(serde_json::to_string(&Locale::Welsh).unwrap(), "\"cy\"");
        assert_eq!(Locale::English.to_string(), "en");
    }

    #[test]
    fn agency_display() {
        assert_eq!(Agency::Dvsa.to_string(), "DVSA");
        assert_eq!(Agency::Dva.to_string(), "DVA");
    }
}
