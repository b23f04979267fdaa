use serde::{Deserialize, Serialize};

use crate::model::ids::ClassId;

/// A class as returned by the remote API.
///
/// The client only ever holds transient copies; the server owns persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: ClassId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f32>,
    #[serde(default)]
    pub enrolled: bool,
}

/// An ordered outline entry of a class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// The `classData` JSON part sent when creating or updating a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassPayload {
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub contact_email: String,
    pub requirements: Vec<String>,
    pub sections: Vec<Section>,
    /// Existing thumbnail kept when no new image is uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_tolerates_missing_optional_fields() {
        let class: Class = serde_json::from_str(r#"{"id": 3, "title": "Pottery"}"#).unwrap();
        assert_eq!(class.id, ClassId::new(3));
        assert!(class.requirements.is_empty());
        assert!(!class.enrolled);
    }

    #[test]
    fn payload_uses_camel_case_keys() {
        let payload = ClassPayload {
            title: "Knots".into(),
            description: "Sailing knots".into(),
            category: "Outdoors".into(),
            level: "Beginner".into(),
            duration_minutes: Some(45),
            contact_email: "sailor@example.com".into(),
            requirements: vec!["Rope".into()],
            sections: vec![Section {
                title: "Basics".into(),
                description: String::new(),
            }],
            thumbnail_url: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["contactEmail"], "sailor@example.com");
        assert_eq!(json["durationMinutes"], 45);
        assert!(json.get("thumbnailUrl").is_none());
    }
}
