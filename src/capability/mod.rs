pub mod effects;
pub mod validate;

use effects::SideEffects;

/// Which adapter operation a capability routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    ListApplications,
    LaunchApp,
    OpenWithApp,
}

impl CapabilityKind {
    /// Declared input fields, in order.
    pub const fn input(self) -> &'static [FieldSpec] {
        match self {
            CapabilityKind::ListApplications => &[],
            CapabilityKind::LaunchApp => &[APP_NAME],
            CapabilityKind::OpenWithApp => &[APP_NAME, FILE_PATH],
        }
    }
}

/// One declared input field. Every field in this server is a required string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub description: &'static str,
}

/// A named, schema-described operation offered to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub name: &'static str,
    pub description: &'static str,
    pub effects: SideEffects,
    pub kind: CapabilityKind,
}

impl Capability {
    pub fn input(&self) -> &'static [FieldSpec] {
        self.kind.input()
    }

    /// JSON Schema object describing `input`.
    pub fn input_schema(&self) -> serde_json::Map<String, serde_json::Value> {
        let properties: serde_json::Map<String, serde_json::Value> = self
            .input()
            .iter()
            .map(|field| {
                (
                    field.name.to_owned(),
                    serde_json::json!({
                        "type": "string",
                        "description": field.description,
                    }),
                )
            })
            .collect();
        let required: Vec<&str> = self.input().iter().map(|field| field.name).collect();

        let mut schema = serde_json::Map::new();
        schema.insert("type".to_owned(), "object".into());
        schema.insert("properties".to_owned(), properties.into());
        schema.insert("required".to_owned(), required.into());
        schema
    }
}

pub const APP_NAME: FieldSpec = FieldSpec {
    name: "appName",
    description: "Application name, with or without the bundle suffix",
};

pub const FILE_PATH: FieldSpec = FieldSpec {
    name: "filePath",
    description: "Path of the file or folder to open",
};

/// Registration order is the order clients see.
static CAPABILITIES: [Capability; 3] = [
    Capability {
        name: "list_applications",
        description: "List all applications installed in the applications folder",
        effects: SideEffects::OBSERVE,
        kind: CapabilityKind::ListApplications,
    },
    Capability {
        name: "launch_app",
        description: "Launch an application by name",
        effects: SideEffects::ACT,
        kind: CapabilityKind::LaunchApp,
    },
    Capability {
        name: "open_with_app",
        description: "Open a file or folder with a specific application",
        effects: SideEffects::ACT,
        kind: CapabilityKind::OpenWithApp,
    },
];

/// All registered capabilities, in stable order.
pub fn list() -> &'static [Capability] {
    &CAPABILITIES
}

/// Exact-name lookup.
pub fn resolve(name: &str) -> Option<&'static Capability> {
    CAPABILITIES.iter().find(|c| c.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_is_stable_and_ordered() {
        let names: Vec<&str> = list().iter().map(|c| c.name).collect();
        assert_eq!(names, ["list_applications", "launch_app", "open_with_app"]);
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = list().iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), list().len());
    }

    #[test]
    fn resolve_known_names() {
        assert_eq!(
            resolve("launch_app").map(|c| c.kind),
            Some(CapabilityKind::LaunchApp)
        );
        assert_eq!(
            resolve("open_with_app").map(|c| c.input().len()),
            Some(2)
        );
    }

    #[test]
    fn resolve_is_exact() {
        assert!(resolve("Launch_App").is_none());
        assert!(resolve("launch_app ").is_none());
        assert!(resolve("").is_none());
    }

    #[test]
    fn listing_is_observe_only() {
        let cap = resolve("list_applications").unwrap();
        assert_eq!(cap.effects, SideEffects::OBSERVE);
        assert!(cap.input().is_empty());
    }

    #[test]
    fn input_schema_lists_required_fields() {
        let schema = resolve("open_with_app").unwrap().input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], serde_json::json!(["appName", "filePath"]));
        assert_eq!(schema["properties"]["filePath"]["type"], "string");
    }

    #[test]
    fn empty_input_schema() {
        let schema = resolve("list_applications").unwrap().input_schema();
        assert_eq!(schema["properties"], serde_json::json!({}));
        assert_eq!(schema["required"], serde_json::json!([]));
    }
}
