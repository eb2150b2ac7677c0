//! Static vocabulary mapping tables.
//!
//! Local vocabulary values (update intervals, license ids, group slugs) are
//! translated to the terms the national open data portal expects. Lookups
//! of unknown values return nothing; callers emit no triple in that case.

/// Base of the DCMI collection frequency vocabulary.
pub const FREQUENCY_BASE: &str = "http://purl.org/cld/freq/";

/// Tag on datasets that always belong to the `geography` theme.
pub const GEODATA_TAG: &str = "geodaten";

/// Theme added for datasets carrying [`GEODATA_TAG`].
pub const GEOGRAPHY_THEME: &str = "geography";

/// Formats describing live services rather than downloadable files.
pub const SERVICE_FORMATS: &[&str] = &["xml", "wms", "wmts", "wfs"];

/// Maps an `updateInterval` vocabulary value to a DCMI frequency URI.
#[must_use]
pub fn accrual_periodicity(update_interval: &str) -> Option<String> {
    let frequency = match update_interval {
        "halbjaehrlich" => "semiannual",
        "jaehrlich" => "annual",
        "laufend" | "stuendlich" => "continuous",
        "monatlich" => "monthly",
        "quartalsweise" => "quarterly",
        "taeglich" => "daily",
        "woechentlich" => "weekly",
        "vierzehntaeglich" | "vierzehntäglich" => "bimonthly",
        "keines" | "alle 4 Jahre" | "sporadisch oder unregelmaessig" => "irregular",
        _ => return None,
    };
    Some(format!("{FREQUENCY_BASE}{frequency}"))
}

/// Maps a license id to the portal's terms-of-use string.
#[must_use]
pub fn rights(license_id: &str) -> Option<&'static str> {
    match license_id {
        "cc-by" | "cc-by-sa" => Some("NonCommercialAllowed-CommercialAllowed-ReferenceRequired"),
        "cc-zero" => Some("NonCommercialAllowed-CommercialAllowed-ReferenceNotRequired"),
        _ => None,
    }
}

/// Maps a local group slug to the portal themes it implies.
#[must_use]
pub fn themes(group_name: &str) -> &'static [&'static str] {
    match group_name {
        "arbeit-und-erwerb" => &["work"],
        "finanzen" => &["finances"],
        "preise" => &["prices"],
        "tourismus" => &["tourism"],
        "volkswirtschaft" | "wirtschaft" => &["national-economy"],
        "verwaltung" => &["administration"],
        "soziales" => &["social-security"],
        "freizeit" | "umwelt" => &["territory"],
        "politik" => &["politics"],
        "mobilitat" => &["mobility"],
        "kultur" => &["culture"],
        "kriminalitat" => &["crime", "public-order"],
        "gesundheit" => &["health"],
        "basiskarten" => &["territory", "geography"],
        "energie" => &["energy"],
        "bildung" => &["education"],
        "bevolkerung" => &["population"],
        "bauen-und-wohnen" => &["construction"],
        _ => &[],
    }
}

/// Returns true if a (case-insensitive) format denotes a live service.
#[must_use]
pub fn is_service_format(format: &str) -> bool {
    let format = format.to_lowercase();
    SERVICE_FORMATS.contains(&format.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accrual_periodicity() {
        assert_eq!(
            accrual_periodicity("jaehrlich").as_deref(),
            Some("http://purl.org/cld/freq/annual")
        );
        assert_eq!(
            accrual_periodicity("stuendlich").as_deref(),
            Some("http://purl.org/cld/freq/continuous")
        );
        assert_eq!(
            accrual_periodicity("alle 4 Jahre").as_deref(),
            Some("http://purl.org/cld/freq/irregular")
        );
        assert!(accrual_periodicity("Echtzeit").is_none());
        assert!(accrual_periodicity("   ").is_none());
    }

    #[test]
    fn test_rights() {
        assert_eq!(
            rights("cc-by"),
            Some("NonCommercialAllowed-CommercialAllowed-ReferenceRequired")
        );
        assert_eq!(
            rights("cc-zero"),
            Some("NonCommercialAllowed-CommercialAllowed-ReferenceNotRequired")
        );
        assert!(rights("odc-odbl").is_none());
    }

    #[test]
    fn test_themes() {
        assert_eq!(themes("kriminalitat"), &["crime", "public-order"]);
        assert_eq!(themes("basiskarten"), &["territory", "geography"]);
        assert!(themes("unbekannt").is_empty());
    }

    #[test]
    fn test_service_formats() {
        assert!(is_service_format("XML"));
        assert!(is_service_format("wmts"));
        assert!(!is_service_format("CSV"));
        assert!(!is_service_format("application/xml"));
    }
}
