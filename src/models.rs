use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    pub fn admits(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown status filter '{}'", other)),
        }
    }
}

/// Restricts the visible todos to one author, or to none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UserScope {
    #[default]
    All,
    User(i64),
}

impl UserScope {
    pub fn admits(self, user_id: i64) -> bool {
        match self {
            Self::All => true,
            Self::User(scoped) => scoped == user_id,
        }
    }
}

impl fmt::Display for UserScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::User(id) => write!(f, "{}", id),
        }
    }
}

// Wire form matches the select box: the literal "All" or a numeric user id.
impl Serialize for UserScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str("All"),
            Self::User(id) => serializer.serialize_i64(*id),
        }
    }
}

impl<'de> Deserialize<'de> for UserScope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Id(i64),
            Label(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Id(id) => Ok(Self::User(id)),
            Raw::Label(label) if label.eq_ignore_ascii_case("all") => Ok(Self::All),
            Raw::Label(label) => label
                .trim()
                .parse::<i64>()
                .map(Self::User)
                .map_err(|_| serde::de::Error::custom(format!("invalid user scope '{}'", label))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub status: StatusFilter,
    pub search_text: String,
    pub scoped_user_id: UserScope,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadState {
    pub todos: Vec<Todo>,
    pub is_loading: bool,
    pub is_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoView {
    pub items: Vec<Todo>,
    pub page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    pub stats: TodoStats,
    pub has_previous: bool,
    pub has_next: bool,
    pub show_pagination: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MutationOutcome {
    Added { id: i64 },
    Toggled { id: i64, completed: bool },
    Deleted { id: i64 },
    Updated { id: i64 },
    Rejected,
    NotFound { id: i64 },
}

impl MutationOutcome {
    pub fn changed(self) -> bool {
        !matches!(self, Self::Rejected | Self::NotFound { .. })
    }
}
