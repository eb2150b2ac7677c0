//! Template helpers.

use serde_json::Value;

use crate::host::CatalogApi;
use crate::record::{value_text, Dataset, Group};

/// The `n` groups with the most datasets, biggest first.
///
/// Groups with equal counts keep the reverse of their listing order.
#[must_use]
pub fn biggest_groups(mut groups: Vec<Group>, n: usize) -> Vec<Group> {
    groups.sort_by_key(|g| g.package_count.unwrap_or(0));
    groups.reverse();
    groups.truncate(n);
    groups
}

/// Returns true if `groups` contains a group named `group_name`.
#[must_use]
pub fn package_has_group(group_name: &str, groups: &[Group]) -> bool {
    groups.iter().any(|g| g.name == group_name)
}

/// Parses the attribute list stored in `sszFields`.
///
/// The field holds a JSON list of `[name, description]` pairs. Returns
/// `None` when the text is not such a list.
#[must_use]
pub fn load_json(json_data: &str) -> Option<Vec<(String, String)>> {
    let parsed: Value = serde_json::from_str(json_data).ok()?;
    parsed
        .as_array()?
        .iter()
        .map(|pair| match pair.as_array()?.as_slice() {
            [name, description] => Some((
                value_text(name)?.into_owned(),
                value_text(description).map(|d| d.into_owned()).unwrap_or_default(),
            )),
            _ => None,
        })
        .collect()
}

/// Fetches a dataset, or an empty record if it cannot be read.
#[must_use]
pub fn get_package_dict<C: CatalogApi + ?Sized>(catalog: &C, dataset_id: &str) -> Dataset {
    catalog.package_show(dataset_id).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str, count: u64) -> Group {
        Group {
            package_count: Some(count),
            ..Group::new(name)
        }
    }

    #[test]
    fn test_biggest_groups() {
        let groups = vec![group("a", 3), group("b", 10), group("c", 1), group("d", 7)];
        let names: Vec<_> = biggest_groups(groups.clone(), 2)
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["b", "d"]);
        assert_eq!(biggest_groups(groups, 10).len(), 4);
    }

    #[test]
    fn test_package_has_group() {
        let groups = vec![Group::new("mobilitat")];
        assert!(package_has_group("mobilitat", &groups));
        assert!(!package_has_group("kultur", &groups));
    }

    #[test]
    fn test_load_json() {
        let attributes =
            load_json(r#"[["Jahr", "Erhebungsjahr"], ["Anzahl", "Anzahl Velos"]]"#).unwrap();
        assert_eq!(attributes[0], ("Jahr".to_string(), "Erhebungsjahr".to_string()));
        assert_eq!(attributes.len(), 2);

        assert!(load_json("kein json").is_none());
        assert!(load_json(r#"{"Jahr": "x"}"#).is_none());
        assert!(load_json(r#"[["nur ein Wert"]]"#).is_none());
    }
}
