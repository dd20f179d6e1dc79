//! Category records and the meeting lists they point at

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the host application needs from a meeting list descriptor
pub trait MeetingList {
    /// Human readable description of the list
    fn describe(&self) -> String;

    /// Event server the list is fetched from, if it lives on one
    fn server(&self) -> Option<&str>;
}

/// Reference to one of the concrete meeting list descriptors.
///
/// Serialized with a `"type"` field so a stored reference always comes
/// back as the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MeetingListRef {
    /// Events of a category on an event server
    Category {
        server: String,
        #[serde(rename = "categoryId")]
        category_id: String,
    },
    /// Events the user marked as favourite
    Favorites,
    /// Saved search on an event server
    Search { server: String, query: String },
    /// List discovered from a URL
    Url { url: String },
}

impl MeetingList for MeetingListRef {
    fn describe(&self) -> String {
        match self {
            Self::Category {
                server,
                category_id,
            } => format!("category {} on {}", category_id, server),
            Self::Favorites => "favourite events".to_string(),
            Self::Search { server, query } => format!("search \"{}\" on {}", query, server),
            Self::Url { url } => url.clone(),
        }
    }

    fn server(&self) -> Option<&str> {
        match self {
            Self::Category { server, .. } | Self::Search { server, .. } => Some(server.as_str()),
            Self::Favorites | Self::Url { .. } => None,
        }
    }
}

impl fmt::Display for MeetingListRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A user-defined grouping of meetings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Display name
    pub category_title: String,

    /// Whether the category is shown on the home page
    pub display_on_home_page: bool,

    /// Where the meetings of this category come from
    pub meeting_list_ref: MeetingListRef,
}

impl Category {
    pub fn new(
        category_title: impl Into<String>,
        display_on_home_page: bool,
        meeting_list_ref: MeetingListRef,
    ) -> Self {
        Self {
            category_title: category_title.into(),
            display_on_home_page,
            meeting_list_ref,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn references_carry_a_type_tag() {
        let category = Category::new(
            "Physics",
            true,
            MeetingListRef::Category {
                server: "indico.example.org".to_string(),
                category_id: "72".to_string(),
            },
        );

        let value = serde_json::to_value(&category).unwrap();
        assert_eq!(
            value,
            json!({
                "categoryTitle": "Physics",
                "displayOnHomePage": true,
                "meetingListRef": {
                    "type": "category",
                    "server": "indico.example.org",
                    "categoryId": "72"
                }
            })
        );
    }

    #[test]
    fn tag_selects_variant_on_load() {
        let reference: MeetingListRef =
            serde_json::from_value(json!({ "type": "favorites" })).unwrap();
        assert_eq!(reference, MeetingListRef::Favorites);

        let reference: MeetingListRef = serde_json::from_value(json!({
            "type": "search",
            "server": "indico.example.org",
            "query": "detector"
        }))
        .unwrap();
        assert_eq!(reference.server(), Some("indico.example.org"));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let result = serde_json::from_value::<MeetingListRef>(json!({ "type": "calendar" }));
        assert!(result.is_err());
    }

    #[test]
    fn describe_names_the_source() {
        let url = MeetingListRef::Url {
            url: "https://indico.example.org/export/categ/1.ics".to_string(),
        };
        assert_eq!(url.to_string(), "https://indico.example.org/export/categ/1.ics");
        assert_eq!(url.server(), None);
        assert_eq!(MeetingListRef::Favorites.describe(), "favourite events");
    }
}
