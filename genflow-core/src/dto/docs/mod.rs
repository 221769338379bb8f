//! DocsAutomator DTOs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request to render a document from a template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocument {
    /// Automation/template ID
    pub doc_id: String,
    /// Placeholder values
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
}

/// Locations of a rendered document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUrls {
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub google_doc_url: Option<String>,
    #[serde(default)]
    pub save_pdf_google_drive_folder_id: Option<String>,
}

/// A template configured in the DocsAutomator workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Automation {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Remaining settings, passed through untouched
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

/// Envelope of the automation listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutomationList {
    #[serde(default)]
    pub automations: Vec<Automation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_document_body() {
        let mut data = Map::new();
        data.insert("title".to_string(), json!("Guide"));

        let req = CreateDocument {
            doc_id: "tpl-1".to_string(),
            data,
            document_name: None,
        };

        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, json!({"docId": "tpl-1", "data": {"title": "Guide"}}));
    }

    #[test]
    fn test_automation_list_tolerates_missing_envelope() {
        let list: AutomationList = serde_json::from_value(json!({})).unwrap();
        assert!(list.automations.is_empty());

        let list: AutomationList = serde_json::from_value(json!({
            "automations": [{"_id": "a1", "title": "Report", "dataSource": "api"}]
        }))
        .unwrap();
        assert_eq!(list.automations[0].id, "a1");
        assert_eq!(list.automations[0].title.as_deref(), Some("Report"));
        assert_eq!(list.automations[0].settings["dataSource"], "api");
    }
}
